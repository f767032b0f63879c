//! Enumeration types shared across the compliance workspace.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Compliance status
// ---------------------------------------------------------------------------

/// Whether a ship-year meets the intensity target after banking.
///
/// Serialized as `"COMPLIANT"` / `"NON_COMPLIANT"` to match the registry's
/// reporting vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplianceStatus {
    /// Adjusted balance is zero or positive.
    Compliant,
    /// Adjusted balance is negative.
    NonCompliant,
}

impl ComplianceStatus {
    /// Return the registry string for this status.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Compliant => "COMPLIANT",
            Self::NonCompliant => "NON_COMPLIANT",
        }
    }
}

impl core::fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Pool status
// ---------------------------------------------------------------------------

/// Lifecycle status of a pool returned to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PoolStatus {
    /// The allocation succeeded and the pool was persisted.
    Formed,
}

// ---------------------------------------------------------------------------
// Banking eligibility
// ---------------------------------------------------------------------------

/// Which bank entries count toward a ship's available banked surplus for
/// a given target year.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum BankEligibility {
    /// Every entry counts, regardless of the year it was banked in.
    AnyYear,
    /// Only entries banked in the target year or earlier count.
    #[default]
    UpToTargetYear,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_in_registry_vocabulary() {
        let compliant = serde_json::to_string(&ComplianceStatus::Compliant).ok();
        let non_compliant = serde_json::to_string(&ComplianceStatus::NonCompliant).ok();
        assert_eq!(compliant.as_deref(), Some("\"COMPLIANT\""));
        assert_eq!(non_compliant.as_deref(), Some("\"NON_COMPLIANT\""));
        assert_eq!(ComplianceStatus::NonCompliant.to_string(), "NON_COMPLIANT");
    }

    #[test]
    fn pool_status_serializes_as_formed() {
        let json = serde_json::to_string(&PoolStatus::Formed).ok();
        assert_eq!(json.as_deref(), Some("\"FORMED\""));
    }

    #[test]
    fn eligibility_parses_snake_case() {
        let parsed: Option<BankEligibility> = serde_json::from_str("\"any_year\"").ok();
        assert_eq!(parsed, Some(BankEligibility::AnyYear));
        assert_eq!(BankEligibility::default(), BankEligibility::UpToTargetYear);
    }
}

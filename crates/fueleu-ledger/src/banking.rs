//! Banking ledger rules.
//!
//! A bank entry is a claim on surplus from one year that can be applied
//! against a later year. These functions decide how much of a ship's
//! banked surplus is available, what its adjusted balance is, and which
//! entries an application draws from. They never mutate storage; the
//! banking service persists their results.

use rust_decimal::Decimal;

use fueleu_types::{
    AdjustedBalance, BankEligibility, BankEntry, BankEntryId, ComplianceStatus, ShipId, Year,
};

use crate::BankingRuleError;

/// A planned draw of `amount` from one bank entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawDown {
    /// The entry to draw from.
    pub entry_id: BankEntryId,
    /// How much to add to the entry's `amount_used`.
    pub amount: Decimal,
}

/// Whether `entry` may be applied against `target_year`.
pub const fn is_eligible(entry: &BankEntry, eligibility: BankEligibility, target_year: Year) -> bool {
    match eligibility {
        BankEligibility::AnyYear => true,
        BankEligibility::UpToTargetYear => entry.year <= target_year,
    }
}

/// Sum of available amounts over the eligible entries.
///
/// # Errors
///
/// Returns [`BankingRuleError::Overflow`] if the sum overflows.
pub fn banked_available(
    entries: &[BankEntry],
    eligibility: BankEligibility,
    target_year: Year,
) -> Result<Decimal, BankingRuleError> {
    entries
        .iter()
        .filter(|e| is_eligible(e, eligibility, target_year))
        .try_fold(Decimal::ZERO, |acc, e| {
            acc.checked_add(e.available())
                .ok_or(BankingRuleError::Overflow)
        })
}

/// Total ever banked from `year`, including amounts since used.
///
/// # Errors
///
/// Returns [`BankingRuleError::Overflow`] if the sum overflows.
pub fn banked_from_year(entries: &[BankEntry], year: Year) -> Result<Decimal, BankingRuleError> {
    entries
        .iter()
        .filter(|e| e.year == year)
        .try_fold(Decimal::ZERO, |acc, e| {
            acc.checked_add(e.amount_banked)
                .ok_or(BankingRuleError::Overflow)
        })
}

/// Combine a raw balance with available banked surplus.
pub fn adjusted_balance(
    ship_id: ShipId,
    year: Year,
    raw_cb: Decimal,
    banked_available: Decimal,
) -> AdjustedBalance {
    let adjusted_cb = raw_cb.saturating_add(banked_available);
    let status = if adjusted_cb >= Decimal::ZERO {
        ComplianceStatus::Compliant
    } else {
        ComplianceStatus::NonCompliant
    };

    AdjustedBalance {
        ship_id,
        year,
        raw_cb,
        banked_available,
        adjusted_cb,
        status,
    }
}

/// Plan a FIFO draw-down of `amount` across `entries`.
///
/// Entries are consumed oldest banked year first, then by creation time.
/// Entries with nothing available are skipped. The plan covers `amount`
/// exactly.
///
/// # Errors
///
/// Returns [`BankingRuleError::Overdrawn`] if the entries hold less than
/// `amount` in total.
pub fn plan_draw_down(
    entries: &[BankEntry],
    amount: Decimal,
) -> Result<Vec<DrawDown>, BankingRuleError> {
    let mut ordered: Vec<&BankEntry> = entries
        .iter()
        .filter(|e| e.available() > Decimal::ZERO)
        .collect();
    ordered.sort_by_key(|e| (e.year, e.created_at, e.id));

    let mut remaining = amount;
    let mut plan = Vec::new();

    for entry in ordered {
        if remaining <= Decimal::ZERO {
            break;
        }
        let take = entry.available().min(remaining);
        remaining = remaining
            .checked_sub(take)
            .ok_or(BankingRuleError::Overflow)?;
        plan.push(DrawDown {
            entry_id: entry.id,
            amount: take,
        });
    }

    if remaining > Decimal::ZERO {
        let available = banked_available(entries, BankEligibility::AnyYear, 0)?;
        return Err(BankingRuleError::Overdrawn {
            requested: amount,
            available,
        });
    }

    Ok(plan)
}

//! Configuration loading and typed config structures.
//!
//! The canonical configuration lives in `fueleu-config.yaml` at the
//! project root. Every field has a default, so an empty file (or no file)
//! yields the published 2025 policy with source-compatible banking.

use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;

use fueleu_ledger::{REFERENCE_ENERGY_MJ, REGULATORY_TARGET_2025};
use fueleu_types::BankEligibility;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ComplianceConfig {
    /// Regulatory target and calculation defaults.
    #[serde(default)]
    pub policy: PolicyConfig,

    /// Banking rules.
    #[serde(default)]
    pub banking: BankingConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ComplianceConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `FUELEU_LOG_LEVEL` overrides `logging.level`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.logging.apply_env_overrides();
        Ok(config)
    }
}

/// Regulatory target and calculation defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PolicyConfig {
    /// Intensity target in gCO2e/MJ.
    #[serde(default = "default_target_intensity")]
    pub target_intensity: Decimal,

    /// Energy used when a caller does not report one, in MJ.
    #[serde(default = "default_reference_energy_mj")]
    pub reference_energy_mj: Decimal,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            target_intensity: default_target_intensity(),
            reference_energy_mj: default_reference_energy_mj(),
        }
    }
}

/// Banking rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct BankingConfig {
    /// Which entries count toward a target year's banked surplus.
    #[serde(default)]
    pub eligibility: BankEligibility,

    /// Cap new banking at the year's surplus minus what was already banked
    /// from it.
    #[serde(default)]
    pub cap_repeat_banking: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level or `EnvFilter` directive (e.g. `info`, `fueleu_core=debug`).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl LoggingConfig {
    /// Apply environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("FUELEU_LOG_LEVEL") {
            self.level = val;
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

const fn default_target_intensity() -> Decimal {
    REGULATORY_TARGET_2025
}

const fn default_reference_energy_mj() -> Decimal {
    REFERENCE_ENERGY_MJ
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_2025_policy() {
        let config = ComplianceConfig::default();
        assert_eq!(config.policy.target_intensity, Decimal::new(9116, 2));
        assert_eq!(config.policy.reference_energy_mj, Decimal::new(1_000_000, 0));
        assert_eq!(config.banking.eligibility, BankEligibility::UpToTargetYear);
        assert!(!config.banking.cap_repeat_banking);
        assert!(!config.logging.json);
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
policy:
  target_intensity: "89.3368"
  reference_energy_mj: "41000"

banking:
  eligibility: any_year
  cap_repeat_banking: true

logging:
  level: "debug"
  json: true
"#;

        let config = ComplianceConfig::parse(yaml);
        assert!(config.is_ok(), "{config:?}");
        let config = config.ok().unwrap_or_default();

        assert_eq!(config.policy.target_intensity, Decimal::new(893_368, 4));
        assert_eq!(config.policy.reference_energy_mj, Decimal::new(41_000, 0));
        assert_eq!(config.banking.eligibility, BankEligibility::AnyYear);
        assert!(config.banking.cap_repeat_banking);
        assert!(config.logging.json);
    }

    #[test]
    fn parse_minimal_yaml() {
        let yaml = "banking:\n  cap_repeat_banking: true\n";
        let config = ComplianceConfig::parse(yaml).ok().unwrap_or_default();

        assert!(config.banking.cap_repeat_banking);
        // Everything else uses defaults
        assert_eq!(config.banking.eligibility, BankEligibility::UpToTargetYear);
        assert_eq!(config.policy.target_intensity, REGULATORY_TARGET_2025);
    }

    #[test]
    fn parse_empty_yaml() {
        assert!(ComplianceConfig::parse("").is_ok());
    }

    #[test]
    fn unknown_eligibility_is_rejected() {
        let yaml = "banking:\n  eligibility: sometimes\n";
        assert!(matches!(
            ComplianceConfig::parse(yaml),
            Err(ConfigError::Yaml { .. })
        ));
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("fueleu-config.yaml");
        if path.exists() {
            let config = ComplianceConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
        }
    }
}

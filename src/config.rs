use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{LedgerError, Result};

/// ledger configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    pub validation: ValidationConfig,
    pub import: ImportConfig,
}

/// rules applied before an entry or loan is accepted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// lowest accepted annual rate, inclusive
    pub min_rate: Option<Rate>,
    /// highest accepted annual rate, inclusive
    pub max_rate: Option<Rate>,
    pub allow_future_dates: bool,
    /// allowed gap between a custom split and the payment amount
    pub custom_split_tolerance: Money,
}

/// interchange import settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// a payment row is rejected unless |amount - (principal + interest)| is
    /// strictly below this
    pub payment_tolerance: Money,
    pub reject_duplicate_borrowers: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_rate: None,
            max_rate: None,
            allow_future_dates: false,
            custom_split_tolerance: Money::ZERO,
        }
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            payment_tolerance: Money::CENT,
            reject_duplicate_borrowers: true,
        }
    }
}

impl LedgerConfig {
    /// bounds used by interactive entry forms: 0.1% to 50%
    pub fn interactive() -> Self {
        Self {
            validation: ValidationConfig {
                min_rate: Some(Rate::from_decimal(dec!(0.001))),
                max_rate: Some(Rate::from_decimal(dec!(0.50))),
                ..ValidationConfig::default()
            },
            import: ImportConfig::default(),
        }
    }

    /// parse from json, missing sections fall back to defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: LedgerConfig =
            serde_json::from_str(json).map_err(|e| LedgerError::InvalidConfiguration {
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if let (Some(min), Some(max)) = (self.validation.min_rate, self.validation.max_rate) {
            if min > max {
                return Err(LedgerError::InvalidConfiguration {
                    message: format!("min_rate {} exceeds max_rate {}", min, max),
                });
            }
        }

        if self.validation.custom_split_tolerance.is_negative()
            || self.import.payment_tolerance.is_negative()
        {
            return Err(LedgerError::InvalidConfiguration {
                message: "tolerances cannot be negative".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LedgerConfig::default();
        assert_eq!(config.validation.custom_split_tolerance, Money::ZERO);
        assert_eq!(config.import.payment_tolerance, Money::CENT);
        assert!(config.validation.min_rate.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_interactive_bounds() {
        let config = LedgerConfig::interactive();
        assert_eq!(config.validation.min_rate, Some(Rate::from_decimal(dec!(0.001))));
        assert_eq!(config.validation.max_rate, Some(Rate::from_decimal(dec!(0.5))));
    }

    #[test]
    fn test_from_json_partial() {
        let config = LedgerConfig::from_json(r#"{"validation": {"allow_future_dates": true}}"#).unwrap();
        assert!(config.validation.allow_future_dates);
        assert_eq!(config.import, ImportConfig::default());
    }

    #[test]
    fn test_from_json_rejects_inverted_bounds() {
        let result = LedgerConfig::from_json(
            r#"{"validation": {"min_rate": "0.5", "max_rate": "0.1"}}"#,
        );
        assert!(matches!(result, Err(LedgerError::InvalidConfiguration { .. })));

        let garbage = LedgerConfig::from_json("not json");
        assert!(matches!(garbage, Err(LedgerError::InvalidConfiguration { .. })));
    }
}

use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::PaymentSplit;

/// how a payment is divided between accrued interest and principal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum PaymentStrategy {
    /// settle accrued interest, the remainder goes to principal
    #[default]
    InterestFirst,
    /// everything goes to principal
    PrincipalOnly,
    /// caller-chosen split, not checked against the payment amount
    Custom { principal: Money, interest: Money },
}

impl PaymentStrategy {
    /// split `amount` given the interest accrued at the payment date
    pub fn split(&self, amount: Money, accrued_interest: Money) -> PaymentSplit {
        match *self {
            PaymentStrategy::InterestFirst => {
                if amount <= accrued_interest {
                    PaymentSplit::new(Money::ZERO, amount)
                } else {
                    PaymentSplit::new(amount - accrued_interest, accrued_interest)
                }
            }
            PaymentStrategy::PrincipalOnly => PaymentSplit::new(amount, Money::ZERO),
            PaymentStrategy::Custom {
                principal,
                interest,
            } => PaymentSplit::new(principal, interest),
        }
    }

    /// whether the strategy accounts for exactly `amount` (within `tolerance`).
    /// Only a custom split can fail this.
    pub fn is_balanced(&self, amount: Money, tolerance: Money) -> bool {
        match *self {
            PaymentStrategy::Custom {
                principal,
                interest,
            } => (principal + interest).approx_eq(amount, tolerance),
            PaymentStrategy::InterestFirst | PaymentStrategy::PrincipalOnly => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(v: i64) -> Money {
        Money::from_major(v)
    }

    #[test]
    fn test_interest_first_covers_interest_then_principal() {
        let split = PaymentStrategy::InterestFirst.split(m(500), m(200));
        assert_eq!(split, PaymentSplit::new(m(300), m(200)));
        assert_eq!(split.total(), m(500));
    }

    #[test]
    fn test_interest_first_small_payment_is_all_interest() {
        let split = PaymentStrategy::InterestFirst.split(m(150), m(200));
        assert_eq!(split, PaymentSplit::new(Money::ZERO, m(150)));
    }

    #[test]
    fn test_interest_first_exact_boundary() {
        let accrued = Money::from_str_exact("164.38356164").unwrap();
        let split = PaymentStrategy::InterestFirst.split(accrued, accrued);

        assert_eq!(split.to_principal, Money::ZERO);
        assert_eq!(split.to_interest, accrued);
    }

    #[test]
    fn test_interest_first_with_nothing_accrued() {
        let split = PaymentStrategy::InterestFirst.split(m(100), Money::ZERO);
        assert_eq!(split, PaymentSplit::new(m(100), Money::ZERO));
    }

    #[test]
    fn test_principal_only() {
        let split = PaymentStrategy::PrincipalOnly.split(m(500), m(200));
        assert_eq!(split.to_principal, m(500));
        assert_eq!(split.to_interest, Money::ZERO);
    }

    #[test]
    fn test_custom_split_is_taken_verbatim() {
        let strategy = PaymentStrategy::Custom {
            principal: m(70),
            interest: m(40),
        };
        let split = strategy.split(m(100), m(500));

        assert_eq!(split, PaymentSplit::new(m(70), m(40)));
        assert!(!strategy.is_balanced(m(100), Money::ZERO));
        assert!(strategy.is_balanced(m(110), Money::ZERO));
        assert!(PaymentStrategy::PrincipalOnly.is_balanced(m(1), Money::ZERO));
    }

    #[test]
    fn test_custom_tolerance() {
        let strategy = PaymentStrategy::Custom {
            principal: Money::from_str_exact("60.004").unwrap(),
            interest: m(40),
        };
        assert!(!strategy.is_balanced(m(100), Money::ZERO));
        assert!(strategy.is_balanced(m(100), Money::CENT));
    }
}

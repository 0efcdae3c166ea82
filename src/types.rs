use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;

/// unique identifier for a loan
pub type LoanId = Uuid;

/// unique identifier for a ledger entry
pub type EntryId = Uuid;

/// how a payment amount is divided between principal and interest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PaymentSplit {
    pub to_principal: Money,
    pub to_interest: Money,
}

impl PaymentSplit {
    pub fn new(to_principal: Money, to_interest: Money) -> Self {
        Self {
            to_principal,
            to_interest,
        }
    }

    pub fn total(&self) -> Money {
        self.to_principal + self.to_interest
    }

    /// true when the split adds up to `amount` within `tolerance`
    pub fn matches(&self, amount: Money, tolerance: Money) -> bool {
        self.total().approx_eq(amount, tolerance)
    }
}

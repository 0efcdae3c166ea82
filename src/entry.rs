use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;
use crate::types::{EntryId, LoanId, PaymentSplit};

/// what a ledger entry does to the loan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EntryKind {
    /// money lent to the borrower, increases principal
    CapitalAddition { amount: Money },
    /// money received from the borrower, already split
    Payment {
        to_principal: Money,
        to_interest: Money,
    },
}

impl EntryKind {
    pub fn payment(split: PaymentSplit) -> Self {
        EntryKind::Payment {
            to_principal: split.to_principal,
            to_interest: split.to_interest,
        }
    }

    /// label used in listings and the interchange format
    pub fn display_name(&self) -> &'static str {
        match self {
            EntryKind::CapitalAddition { .. } => "Investment",
            EntryKind::Payment { .. } => "Payment",
        }
    }

    pub fn total_amount(&self) -> Money {
        match self {
            EntryKind::CapitalAddition { amount } => *amount,
            EntryKind::Payment {
                to_principal,
                to_interest,
            } => *to_principal + *to_interest,
        }
    }

    /// signed effect on principal
    pub fn principal_delta(&self) -> Money {
        match self {
            EntryKind::CapitalAddition { amount } => *amount,
            EntryKind::Payment { to_principal, .. } => -*to_principal,
        }
    }

    pub fn is_payment(&self) -> bool {
        matches!(self, EntryKind::Payment { .. })
    }
}

/// a single transaction on a loan's ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: EntryId,
    /// owning loan, for lookups only
    pub loan_id: Option<LoanId>,
    pub date: DateTime<Utc>,
    pub kind: EntryKind,
    pub notes: String,
}

impl LedgerEntry {
    pub fn new(date: DateTime<Utc>, kind: EntryKind, notes: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            loan_id: None,
            date,
            kind,
            notes: notes.into(),
        }
    }

    pub fn capital_addition(date: DateTime<Utc>, amount: Money, notes: impl Into<String>) -> Self {
        Self::new(date, EntryKind::CapitalAddition { amount }, notes)
    }

    pub fn payment(
        date: DateTime<Utc>,
        to_principal: Money,
        to_interest: Money,
        notes: impl Into<String>,
    ) -> Self {
        Self::new(
            date,
            EntryKind::Payment {
                to_principal,
                to_interest,
            },
            notes,
        )
    }

    /// short description such as "-$350.00 (Split)"
    pub fn display_description(&self) -> String {
        match self.kind {
            EntryKind::CapitalAddition { amount } => format!("+${}", amount.to_fixed_2()),
            EntryKind::Payment {
                to_principal,
                to_interest,
            } => {
                if to_principal.is_positive() && to_interest.is_positive() {
                    format!("-${} (Split)", (to_principal + to_interest).to_fixed_2())
                } else if to_principal.is_positive() {
                    format!("-${} (Principal)", to_principal.to_fixed_2())
                } else {
                    format!("-${} (Interest)", to_interest.to_fixed_2())
                }
            }
        }
    }
}

//! serialization support for loans

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::entry::LedgerEntry;
use crate::interest::{compute_balances, LoanBalances};
use crate::loan::Loan;
use crate::types::LoanId;

/// serializable view of a loan as of a point in time
#[derive(Debug, Serialize, Deserialize)]
pub struct LoanView {
    pub id: LoanId,
    pub borrower_name: String,
    pub start_date: DateTime<Utc>,
    pub annual_rate: Rate,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub balances: LoanBalances,
    pub lifetime: LifetimeView,
    /// most recent first
    pub entries: Vec<EntryView>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LifetimeView {
    pub total_invested: Money,
    pub principal_paid: Money,
    pub interest_paid: Money,
    pub payment_count: usize,
    pub last_payment_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EntryView {
    #[serde(flatten)]
    pub entry: LedgerEntry,
    pub description: String,
}

impl LoanView {
    pub fn from_loan(loan: &Loan, as_of: DateTime<Utc>) -> Self {
        let payments: Vec<&LedgerEntry> = loan
            .chronological_ledger()
            .into_iter()
            .filter(|e| e.kind.is_payment())
            .collect();

        LoanView {
            id: loan.id,
            borrower_name: loan.borrower_name.clone(),
            start_date: loan.start_date,
            annual_rate: loan.annual_rate,
            notes: loan.notes.clone(),
            created_at: loan.created_at,
            balances: compute_balances(loan, as_of),
            lifetime: LifetimeView {
                total_invested: loan.total_invested(),
                principal_paid: loan.lifetime_principal_paid(),
                interest_paid: loan.lifetime_interest_paid(),
                payment_count: payments.len(),
                last_payment_date: payments.last().map(|e| e.date),
            },
            entries: loan
                .sorted_ledger()
                .into_iter()
                .map(|entry| EntryView {
                    description: entry.display_description(),
                    entry: entry.clone(),
                })
                .collect(),
        }
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

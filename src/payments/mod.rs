pub mod allocation;
pub mod preview;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::decimal::Money;
use crate::entry::{EntryKind, LedgerEntry};
use crate::loan::Loan;

pub use allocation::PaymentStrategy;
pub use preview::{preview_payment, PaymentImpact};

/// split a payment the way `preview_payment` does and append it to the
/// ledger. The caller is responsible for validating and persisting it.
pub fn commit_payment(
    loan: &mut Loan,
    amount: Money,
    strategy: PaymentStrategy,
    date: DateTime<Utc>,
    notes: impl Into<String>,
) -> LedgerEntry {
    let impact = preview_payment(loan, amount, strategy, date);
    let entry = LedgerEntry::new(date, EntryKind::payment(impact.split()), notes);

    debug!(
        loan_id = %loan.id,
        amount = %amount,
        to_principal = %impact.applied_to_principal,
        to_interest = %impact.applied_to_interest,
        "payment committed"
    );
    if impact.principal_after.is_negative() {
        warn!(
            loan_id = %loan.id,
            principal = %impact.principal_after,
            "payment leaves principal negative"
        );
    }

    append_and_return(loan, entry)
}

/// append a capital addition dated `date`
pub fn add_capital(
    loan: &mut Loan,
    amount: Money,
    date: DateTime<Utc>,
    notes: impl Into<String>,
) -> LedgerEntry {
    let entry = LedgerEntry::capital_addition(date, amount, notes);
    debug!(loan_id = %loan.id, amount = %amount, "capital added");
    append_and_return(loan, entry)
}

fn append_and_return(loan: &mut Loan, entry: LedgerEntry) -> LedgerEntry {
    let mut recorded = entry.clone();
    recorded.loan_id = Some(loan.id);
    loan.append(entry);
    recorded
}

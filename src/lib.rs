pub mod book;
pub mod config;
pub mod decimal;
pub mod entry;
pub mod errors;
pub mod events;
pub mod interchange;
pub mod interest;
pub mod loan;
pub mod payments;
pub mod types;
pub mod validation;
pub mod views;

// re-export key types
pub use book::LoanBook;
pub use config::{ImportConfig, LedgerConfig, ValidationConfig};
pub use decimal::{Money, Rate};
pub use entry::{EntryKind, LedgerEntry};
pub use errors::{ImportError, LedgerError, Result};
pub use events::{EventStore, LedgerEvent};
pub use interchange::{export_file_name, export_ledger, import_ledger, import_ledger_with, ImportedLoan};
pub use interest::{compute_balances, AccrualEngine, AccrualReplay, AccrualSegment, LoanBalances};
pub use loan::{Loan, LoanBuilder};
pub use payments::{add_capital, commit_payment, preview_payment, PaymentImpact, PaymentStrategy};
pub use types::{EntryId, LoanId, PaymentSplit};
pub use validation::Validator;
pub use views::LoanView;

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;

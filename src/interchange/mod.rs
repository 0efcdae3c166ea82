//! Text interchange format for a single loan and its ledger.
//!
//! ```text
//! Loan Export: <borrower name>
//! Start Date: <yyyy-MM-dd>
//! Interest Rate: <percentage, 2 decimals>%
//!
//! Date,Type,Amount,Principal Paid,Interest Paid,Notes
//! 2024-01-01,Investment,10000.00,,,Initial loan
//! 2024-03-01,Payment,350.00,300.00,50.00,
//! ```
//!
//! Parsing works on in-memory text only; reading and writing files is left
//! to the caller.

pub mod dates;
pub mod export;
pub mod import;

pub use dates::parse_date;
pub use export::{export_file_name, export_ledger};
pub use import::{import_ledger, import_ledger_with, ImportedLoan};

pub const NAME_PREFIX: &str = "Loan Export: ";
pub const START_DATE_PREFIX: &str = "Start Date: ";
pub const RATE_PREFIX: &str = "Interest Rate: ";
pub const COLUMN_HEADER: &str = "Date,Type,Amount,Principal Paid,Interest Paid,Notes";

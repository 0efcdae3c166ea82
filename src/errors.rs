use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::decimal::{Money, Rate};
use crate::types::{EntryId, LoanId};

/// failures while reading the interchange format; any of them rejects the
/// whole file
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    #[error("this file doesn't match the loan export format")]
    InvalidFormat,

    #[error("csv header row is missing or invalid")]
    MissingHeader,

    #[error("unable to read loan information: {reason}")]
    InvalidLoanInfo {
        reason: String,
    },

    #[error("invalid transaction on line {line}: {reason}")]
    InvalidTransaction {
        line: usize,
        reason: String,
    },

    #[error("the csv input is empty")]
    EmptyInput,
}

/// caller-level validation and loan book failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    #[error("date {date} is before loan start date {start_date}")]
    DateBeforeStart {
        date: DateTime<Utc>,
        start_date: DateTime<Utc>,
    },

    #[error("date {date} is in the future (now is {now})")]
    DateInFuture {
        date: DateTime<Utc>,
        now: DateTime<Utc>,
    },

    #[error("amount must be greater than zero: {amount}")]
    NonPositiveAmount {
        amount: Money,
    },

    #[error("split amounts cannot be negative: principal {principal}, interest {interest}")]
    NegativeSplit {
        principal: Money,
        interest: Money,
    },

    #[error("principal {principal} + interest {interest} must equal payment amount {amount}")]
    SplitMismatch {
        amount: Money,
        principal: Money,
        interest: Money,
    },

    #[error("interest rate {rate} outside allowed range")]
    RateOutOfRange {
        rate: Rate,
    },

    #[error("borrower name is required")]
    EmptyBorrowerName,

    #[error("a loan for {borrower_name} already exists")]
    DuplicateBorrower {
        borrower_name: String,
    },

    #[error("loan not found: {id}")]
    LoanNotFound {
        id: LoanId,
    },

    #[error("ledger entry not found: {id}")]
    EntryNotFound {
        id: EntryId,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error(transparent)]
    Import(#[from] ImportError),
}

pub type Result<T> = std::result::Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_error_messages() {
        let err = ImportError::InvalidTransaction {
            line: 7,
            reason: "Invalid amount".to_string(),
        };
        assert_eq!(err.to_string(), "invalid transaction on line 7: Invalid amount");
        assert_eq!(ImportError::EmptyInput.to_string(), "the csv input is empty");
    }

    #[test]
    fn test_import_error_converts_into_ledger_error() {
        let err: LedgerError = ImportError::MissingHeader.into();
        assert_eq!(err, LedgerError::Import(ImportError::MissingHeader));
        assert_eq!(err.to_string(), "csv header row is missing or invalid");
    }
}

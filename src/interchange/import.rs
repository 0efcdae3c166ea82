use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use csv::{ReaderBuilder, StringRecord, Trim};
use hourglass_rs::SafeTimeProvider;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::config::ImportConfig;
use crate::decimal::{Money, Rate};
use crate::entry::{EntryKind, LedgerEntry};
use crate::errors::{ImportError, Result};
use crate::loan::Loan;

use super::dates::{parse_date, start_of_day};
use super::{COLUMN_HEADER, NAME_PREFIX, RATE_PREFIX, START_DATE_PREFIX};

const HEADER_LINES: usize = 4;
const COLUMNS: usize = 6;

/// a parsed export, ready to be previewed and turned into a loan
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedLoan {
    pub borrower_name: String,
    pub start_date: NaiveDate,
    pub annual_rate: Rate,
    pub entries: Vec<LedgerEntry>,
}

impl ImportedLoan {
    pub fn start_datetime(&self) -> DateTime<Utc> {
        start_of_day(self.start_date)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_investments(&self) -> Money {
        self.entries
            .iter()
            .filter_map(|e| match e.kind {
                EntryKind::CapitalAddition { amount } => Some(amount),
                EntryKind::Payment { .. } => None,
            })
            .sum()
    }

    pub fn total_payments(&self) -> Money {
        self.entries
            .iter()
            .filter(|e| e.kind.is_payment())
            .map(|e| e.kind.total_amount())
            .sum()
    }

    /// build the loan, stamping every entry with its new id
    pub fn into_loan(self, time_provider: &SafeTimeProvider) -> Result<Loan> {
        let start_date = self.start_datetime();
        let mut builder = Loan::builder()
            .borrower_name(self.borrower_name)
            .start_date(start_date)
            .annual_rate(self.annual_rate);

        for entry in self.entries {
            builder = builder.entry(entry);
        }

        builder.build_with_time(time_provider)
    }
}

/// parse an export with default settings
pub fn import_ledger(text: &str) -> std::result::Result<ImportedLoan, ImportError> {
    import_ledger_with(text, &ImportConfig::default())
}

/// parse an export. Any malformed line rejects the whole file.
pub fn import_ledger_with(
    text: &str,
    config: &ImportConfig,
) -> std::result::Result<ImportedLoan, ImportError> {
    let result = parse(text, config);
    match &result {
        Ok(imported) => info!(
            borrower = %imported.borrower_name,
            entries = imported.entries.len(),
            "ledger imported"
        ),
        Err(e) => warn!(error = %e, "ledger import rejected"),
    }
    result
}

fn parse(text: &str, config: &ImportConfig) -> std::result::Result<ImportedLoan, ImportError> {
    // physical 1-based line numbers are kept for error reporting
    let lines: Vec<(usize, &str)> = text
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim_start_matches('\u{feff}').trim()))
        .filter(|(_, line)| !line.is_empty())
        .collect();

    if lines.len() < HEADER_LINES {
        return Err(ImportError::EmptyInput);
    }

    let borrower_name = lines[0]
        .1
        .strip_prefix(NAME_PREFIX)
        .ok_or(ImportError::InvalidFormat)?
        .trim()
        .to_string();
    if borrower_name.is_empty() {
        return Err(loan_info("borrower name is empty"));
    }

    let start_text = lines[1]
        .1
        .strip_prefix(START_DATE_PREFIX)
        .ok_or_else(|| loan_info("start date line missing"))?;
    let start_date =
        parse_date(start_text).ok_or_else(|| loan_info(&format!("invalid start date '{}'", start_text.trim())))?;

    let rate_text = lines[2]
        .1
        .strip_prefix(RATE_PREFIX)
        .ok_or_else(|| loan_info("interest rate line missing"))?
        .trim()
        .trim_end_matches('%')
        .trim();
    let percentage = Decimal::from_str(rate_text)
        .map_err(|_| loan_info(&format!("invalid interest rate '{}'", rate_text)))?;

    if lines[3].1 != COLUMN_HEADER {
        return Err(ImportError::MissingHeader);
    }

    let entries = lines[HEADER_LINES..]
        .iter()
        .map(|&(line_number, line)| parse_row(line_number, line, config))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(ImportedLoan {
        borrower_name,
        start_date,
        annual_rate: Rate::from_percentage(percentage),
        entries,
    })
}

fn parse_row(
    line: usize,
    text: &str,
    config: &ImportConfig,
) -> std::result::Result<LedgerEntry, ImportError> {
    debug!(line, row = text, "parsing ledger row");

    let record = read_record(text).map_err(|reason| invalid(line, &reason))?;
    if record.len() < COLUMNS {
        return Err(invalid(line, "Incorrect number of columns"));
    }

    let date_text = record[0].trim();
    let date = parse_date(date_text)
        .map(start_of_day)
        .ok_or_else(|| invalid(line, &format!("Invalid date format: '{}'", date_text)))?;

    // unquoted commas in the notes column spill into extra fields; the
    // pieces are joined untrimmed so spacing after those commas survives
    let notes = record
        .iter()
        .skip(COLUMNS - 1)
        .collect::<Vec<_>>()
        .join(",")
        .trim()
        .to_string();

    let kind = match record[1].trim() {
        "Investment" => {
            let amount = parse_amount(&record[2]).ok_or_else(|| invalid(line, "Invalid amount"))?;
            EntryKind::CapitalAddition { amount }
        }
        "Payment" => {
            let (Some(amount), Some(to_principal), Some(to_interest)) = (
                parse_amount(&record[2]),
                parse_amount(&record[3]),
                parse_amount(&record[4]),
            ) else {
                return Err(invalid(line, "Invalid payment amounts"));
            };

            let Some(difference) = to_principal
                .checked_add(to_interest)
                .and_then(|paid| amount.checked_sub(paid))
            else {
                return Err(invalid(line, "Invalid payment amounts"));
            };
            if difference.abs() >= config.payment_tolerance {
                return Err(invalid(line, "Payment total doesn't match principal + interest"));
            }

            EntryKind::Payment {
                to_principal,
                to_interest,
            }
        }
        other => {
            return Err(invalid(line, &format!("Unknown transaction type: {}", other)));
        }
    };

    Ok(LedgerEntry::new(date, kind, notes))
}

fn read_record(text: &str) -> std::result::Result<StringRecord, String> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::None)
        .from_reader(text.as_bytes());

    let mut record = StringRecord::new();
    match reader.read_record(&mut record) {
        Ok(true) => Ok(record),
        Ok(false) => Err("Incorrect number of columns".to_string()),
        Err(e) => Err(format!("Malformed row: {}", e)),
    }
}

fn parse_amount(text: &str) -> Option<Money> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    Money::from_str_exact(text).ok()
}

fn invalid(line: usize, reason: &str) -> ImportError {
    ImportError::InvalidTransaction {
        line,
        reason: reason.to_string(),
    }
}

fn loan_info(reason: &str) -> ImportError {
    ImportError::InvalidLoanInfo {
        reason: reason.to_string(),
    }
}

use chrono::{DateTime, Utc};
use hourglass_rs::{SafeTimeProvider, TimeSource};
use tracing::info;

use crate::config::LedgerConfig;
use crate::decimal::{Money, Rate};
use crate::entry::{EntryKind, LedgerEntry};
use crate::errors::{LedgerError, Result};
use crate::events::{EventStore, LedgerEvent};
use crate::interchange::{export_file_name, export_ledger, import_ledger_with};
use crate::loan::Loan;
use crate::payments::{self, PaymentStrategy};
use crate::types::{EntryId, LoanId};
use crate::validation::Validator;

/// every loan a lender tracks.
///
/// Entries written through the book pass the configured validation rules;
/// each accepted change is recorded as a [`LedgerEvent`].
#[derive(Debug, Default)]
pub struct LoanBook {
    loans: Vec<Loan>,
    config: LedgerConfig,
    events: EventStore,
}

impl LoanBook {
    pub fn new(config: LedgerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            loans: Vec::new(),
            config,
            events: EventStore::new(),
        })
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.loans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loans.is_empty()
    }

    /// newest loan first
    pub fn loans(&self) -> Vec<&Loan> {
        let mut loans: Vec<&Loan> = self.loans.iter().collect();
        loans.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        loans
    }

    pub fn loan(&self, id: LoanId) -> Result<&Loan> {
        self.loans
            .iter()
            .find(|l| l.id == id)
            .ok_or(LedgerError::LoanNotFound { id })
    }

    fn loan_mut(&mut self, id: LoanId) -> Result<&mut Loan> {
        self.loans
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or(LedgerError::LoanNotFound { id })
    }

    pub fn find_by_borrower(&self, borrower_name: &str) -> Option<&Loan> {
        let name = borrower_name.trim();
        self.loans.iter().find(|l| l.borrower_name == name)
    }

    /// create and store a new loan with an empty ledger
    pub fn create_loan(
        &mut self,
        borrower_name: &str,
        start_date: DateTime<Utc>,
        annual_rate: Rate,
        notes: &str,
        time_provider: &SafeTimeProvider,
    ) -> Result<LoanId> {
        let loan = Loan::builder()
            .borrower_name(borrower_name)
            .start_date(start_date)
            .annual_rate(annual_rate)
            .notes(notes)
            .build_with_time(time_provider)?;
        self.add_loan(loan, time_provider)
    }

    /// store an already built loan
    pub fn add_loan(&mut self, loan: Loan, time_provider: &SafeTimeProvider) -> Result<LoanId> {
        Validator::new(&self.config.validation, time_provider)
            .validate_new_loan(&loan.borrower_name, loan.annual_rate)?;

        let loan_id = loan.id;
        info!(loan_id = %loan_id, borrower = %loan.borrower_name, rate = %loan.annual_rate, "loan created");
        self.events.emit(LedgerEvent::LoanCreated {
            loan_id,
            borrower_name: loan.borrower_name.clone(),
            annual_rate: loan.annual_rate,
            start_date: loan.start_date,
            timestamp: time_provider.now(),
        });
        self.loans.push(loan);
        Ok(loan_id)
    }

    /// drop a loan together with its whole ledger
    pub fn remove_loan(&mut self, id: LoanId, time_provider: &SafeTimeProvider) -> Result<Loan> {
        let position = self
            .loans
            .iter()
            .position(|l| l.id == id)
            .ok_or(LedgerError::LoanNotFound { id })?;
        let loan = self.loans.remove(position);

        info!(loan_id = %id, entries = loan.len(), "loan removed");
        self.events.emit(LedgerEvent::LoanRemoved {
            loan_id: id,
            borrower_name: loan.borrower_name.clone(),
            entries_removed: loan.len(),
            timestamp: time_provider.now(),
        });
        Ok(loan)
    }

    /// parse an export and store it as a new loan. Rows are imported as
    /// written, only the file format is checked.
    pub fn import_csv(&mut self, text: &str, time_provider: &SafeTimeProvider) -> Result<LoanId> {
        let imported = import_ledger_with(text, &self.config.import)?;

        if self.config.import.reject_duplicate_borrowers
            && self.find_by_borrower(&imported.borrower_name).is_some()
        {
            return Err(LedgerError::DuplicateBorrower {
                borrower_name: imported.borrower_name,
            });
        }

        let loan = imported.into_loan(time_provider)?;
        let loan_id = loan.id;
        self.events.emit(LedgerEvent::LoanImported {
            loan_id,
            borrower_name: loan.borrower_name.clone(),
            entry_count: loan.len(),
            timestamp: time_provider.now(),
        });
        info!(loan_id = %loan_id, borrower = %loan.borrower_name, entries = loan.len(), "loan imported");
        self.loans.push(loan);
        Ok(loan_id)
    }

    pub fn export_csv(&self, id: LoanId) -> Result<String> {
        Ok(export_ledger(self.loan(id)?))
    }

    /// suggested file name for an export written today
    pub fn export_file_name(&self, id: LoanId, time_provider: &SafeTimeProvider) -> Result<String> {
        let loan = self.loan(id)?;
        Ok(export_file_name(loan, time_provider.now().date_naive()))
    }

    /// validate and append a capital addition
    pub fn add_capital(
        &mut self,
        id: LoanId,
        amount: Money,
        date: DateTime<Utc>,
        notes: &str,
        time_provider: &SafeTimeProvider,
    ) -> Result<LedgerEntry> {
        let validation = self.config.validation.clone();
        let loan = self.loan_mut(id)?;
        Validator::new(&validation, time_provider).validate_capital_addition(loan, amount, date)?;

        let entry = payments::add_capital(loan, amount, date, notes);
        let event = LedgerEvent::CapitalAdded {
            loan_id: id,
            entry_id: entry.id,
            amount,
            new_principal: loan.current_principal(),
            timestamp: time_provider.now(),
        };
        self.events.emit(event);
        Ok(entry)
    }

    /// validate, split and append a payment
    pub fn record_payment(
        &mut self,
        id: LoanId,
        amount: Money,
        strategy: PaymentStrategy,
        date: DateTime<Utc>,
        notes: &str,
        time_provider: &SafeTimeProvider,
    ) -> Result<LedgerEntry> {
        let validation = self.config.validation.clone();
        let loan = self.loan_mut(id)?;
        Validator::new(&validation, time_provider).validate_payment(loan, amount, &strategy, date)?;

        let entry = payments::commit_payment(loan, amount, strategy, date, notes);
        let (applied_to_principal, applied_to_interest) = match entry.kind {
            EntryKind::Payment {
                to_principal,
                to_interest,
            } => (to_principal, to_interest),
            EntryKind::CapitalAddition { .. } => (Money::ZERO, Money::ZERO),
        };
        let event = LedgerEvent::PaymentRecorded {
            loan_id: id,
            entry_id: entry.id,
            amount,
            applied_to_principal,
            applied_to_interest,
            new_principal: loan.current_principal(),
            timestamp: time_provider.now(),
        };
        self.events.emit(event);
        Ok(entry)
    }

    /// record a payment dated now, using system time
    pub fn record_payment_now(
        &mut self,
        id: LoanId,
        amount: Money,
        strategy: PaymentStrategy,
        notes: &str,
    ) -> Result<LedgerEntry> {
        let time = SafeTimeProvider::new(TimeSource::System);
        let now = time.now();
        self.record_payment(id, amount, strategy, now, notes, &time)
    }

    /// replace the date, kind and notes of an entry after validating them
    pub fn update_entry(
        &mut self,
        loan_id: LoanId,
        entry_id: EntryId,
        date: DateTime<Utc>,
        kind: EntryKind,
        notes: &str,
        time_provider: &SafeTimeProvider,
    ) -> Result<LedgerEntry> {
        let validation = self.config.validation.clone();
        let loan = self.loan_mut(loan_id)?;
        Validator::new(&validation, time_provider).validate_entry(loan, date, &kind)?;

        let updated = loan.update_entry(entry_id, date, kind, notes)?.clone();
        info!(loan_id = %loan_id, entry_id = %entry_id, "ledger entry updated");
        self.events.emit(LedgerEvent::EntryUpdated {
            loan_id,
            entry_id,
            timestamp: time_provider.now(),
        });
        Ok(updated)
    }

    pub fn remove_entry(
        &mut self,
        loan_id: LoanId,
        entry_id: EntryId,
        time_provider: &SafeTimeProvider,
    ) -> Result<LedgerEntry> {
        let loan = self.loan_mut(loan_id)?;
        let removed = loan
            .remove_entry(entry_id)
            .ok_or(LedgerError::EntryNotFound { id: entry_id })?;

        info!(loan_id = %loan_id, entry_id = %entry_id, "ledger entry removed");
        self.events.emit(LedgerEvent::EntryRemoved {
            loan_id,
            entry_id,
            timestamp: time_provider.now(),
        });
        Ok(removed)
    }

    /// total principal outstanding across all loans
    pub fn total_principal(&self) -> Money {
        self.loans.iter().map(Loan::current_principal).sum()
    }

    /// total owed across all loans as of `as_of`
    pub fn total_owed(&self, as_of: DateTime<Utc>) -> Money {
        self.loans.iter().map(|l| l.total_owed(as_of)).sum()
    }

    pub fn events(&self) -> &[LedgerEvent] {
        self.events.events()
    }

    pub fn take_events(&mut self) -> Vec<LedgerEvent> {
        self.events.take_events()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ImportError;
    use chrono::{Duration, TimeZone};
    use rust_decimal_macros::dec;

    const CSV: &str = "Loan Export: Jane Doe
Start Date: 2024-01-01
Interest Rate: 8.00%

Date,Type,Amount,Principal Paid,Interest Paid,Notes
2024-01-01,Investment,10000.00,,,Initial loan
2024-02-15,Payment,350.00,300.00,50.00,February
";

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn time() -> SafeTimeProvider {
        SafeTimeProvider::new(TimeSource::Test(start() + Duration::days(90)))
    }

    fn book_with_loan(time: &SafeTimeProvider) -> (LoanBook, LoanId) {
        let mut book = LoanBook::default();
        let id = book
            .create_loan("Alice", start(), Rate::from_decimal(dec!(0.10)), "", time)
            .unwrap();
        (book, id)
    }

    #[test]
    fn test_record_payment_flow() {
        let time = time();
        let (mut book, id) = book_with_loan(&time);

        book.add_capital(id, Money::from_major(10_000), start(), "initial", &time)
            .unwrap();
        let entry = book
            .record_payment(
                id,
                Money::from_major(100),
                PaymentStrategy::InterestFirst,
                start() + Duration::days(73),
                "",
                &time,
            )
            .unwrap();

        // 10000 * 0.10 / 365 * 73 = 200 accrued, so the whole payment is interest
        assert_eq!(
            entry.kind,
            EntryKind::Payment {
                to_principal: Money::ZERO,
                to_interest: Money::from_major(100),
            }
        );
        assert_eq!(entry.loan_id, Some(id));

        let loan = book.loan(id).unwrap();
        assert_eq!(loan.current_principal(), Money::from_major(10_000));
        assert_eq!(loan.len(), 2);

        let events = book.take_events();
        assert_eq!(events.len(), 3);
        assert!(matches!(events[0], LedgerEvent::LoanCreated { .. }));
        assert!(matches!(events[1], LedgerEvent::CapitalAdded { .. }));
        assert!(matches!(events[2], LedgerEvent::PaymentRecorded { .. }));
        assert!(book.events().is_empty());
    }

    #[test]
    fn test_rejected_entries_leave_ledger_untouched() {
        let time = time();
        let (mut book, id) = book_with_loan(&time);

        let before_start = book.add_capital(id, Money::from_major(5), start() - Duration::days(1), "", &time);
        assert!(matches!(before_start, Err(LedgerError::DateBeforeStart { .. })));

        let unbalanced = book.record_payment(
            id,
            Money::from_major(100),
            PaymentStrategy::Custom {
                principal: Money::from_major(10),
                interest: Money::from_major(10),
            },
            start() + Duration::days(1),
            "",
            &time,
        );
        assert!(matches!(unbalanced, Err(LedgerError::SplitMismatch { .. })));

        assert!(book.loan(id).unwrap().is_empty());
        assert_eq!(book.events().len(), 1);
    }

    #[test]
    fn test_import_and_duplicates() {
        let time = time();
        let mut book = LoanBook::default();

        let id = book.import_csv(CSV, &time).unwrap();
        let loan = book.loan(id).unwrap();
        assert_eq!(loan.borrower_name, "Jane Doe");
        assert_eq!(loan.len(), 2);
        assert!(loan.entries().iter().all(|e| e.loan_id == Some(id)));

        assert_eq!(
            book.import_csv(CSV, &time),
            Err(LedgerError::DuplicateBorrower {
                borrower_name: "Jane Doe".to_string()
            })
        );

        let mut config = LedgerConfig::default();
        config.import.reject_duplicate_borrowers = false;
        let mut lenient = LoanBook::new(config).unwrap();
        lenient.import_csv(CSV, &time).unwrap();
        lenient.import_csv(CSV, &time).unwrap();
        assert_eq!(lenient.len(), 2);
    }

    #[test]
    fn test_import_error_is_wrapped() {
        let time = time();
        let mut book = LoanBook::default();
        assert_eq!(
            book.import_csv("", &time),
            Err(LedgerError::Import(ImportError::EmptyInput))
        );
        assert!(book.is_empty());
    }

    #[test]
    fn test_remove_loan_cascades() {
        let time = time();
        let mut book = LoanBook::default();
        let id = book.import_csv(CSV, &time).unwrap();

        let removed = book.remove_loan(id, &time).unwrap();
        assert_eq!(removed.len(), 2);
        assert!(book.is_empty());
        assert_eq!(book.loan(id), Err(LedgerError::LoanNotFound { id }));

        match book.events().last() {
            Some(LedgerEvent::LoanRemoved { entries_removed, .. }) => assert_eq!(*entries_removed, 2),
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_remove_and_update_entry() {
        let time = time();
        let (mut book, id) = book_with_loan(&time);
        let capital = book
            .add_capital(id, Money::from_major(1_000), start(), "", &time)
            .unwrap();

        let updated = book
            .update_entry(
                id,
                capital.id,
                start() + Duration::days(1),
                EntryKind::CapitalAddition {
                    amount: Money::from_major(2_000),
                },
                "corrected",
                &time,
            )
            .unwrap();
        assert_eq!(updated.notes, "corrected");
        assert_eq!(book.loan(id).unwrap().current_principal(), Money::from_major(2_000));

        book.remove_entry(id, capital.id, &time).unwrap();
        assert!(book.loan(id).unwrap().is_empty());
        assert_eq!(
            book.remove_entry(id, capital.id, &time),
            Err(LedgerError::EntryNotFound { id: capital.id })
        );
        // the loan survives losing its entries
        assert_eq!(book.len(), 1);
    }

    #[test]
    fn test_listing_and_totals() {
        let time = time();
        let mut book = LoanBook::default();
        let first = book
            .create_loan("First", start(), Rate::from_decimal(dec!(0.05)), "", &time)
            .unwrap();
        time.test_control().unwrap().advance(Duration::hours(1));
        let second = book
            .create_loan("Second", start(), Rate::ZERO, "", &time)
            .unwrap();

        let order: Vec<LoanId> = book.loans().iter().map(|l| l.id).collect();
        assert_eq!(order, vec![second, first]);

        book.add_capital(first, Money::from_major(100), start(), "", &time).unwrap();
        book.add_capital(second, Money::from_major(50), start(), "", &time).unwrap();
        assert_eq!(book.total_principal(), Money::from_major(150));
        assert!(book.total_owed(time.now()) > Money::from_major(150));
    }

    #[test]
    fn test_rate_bounds_apply_to_new_loans() {
        let time = time();
        let mut book = LoanBook::new(LedgerConfig::interactive()).unwrap();
        let result = book.create_loan("Usurer", start(), Rate::from_decimal(dec!(0.75)), "", &time);
        assert!(matches!(result, Err(LedgerError::RateOutOfRange { .. })));

        // imports keep whatever rate the file carries
        let id = book
            .import_csv(&CSV.replace("8.00%", "75.00%"), &time)
            .unwrap();
        assert_eq!(book.loan(id).unwrap().annual_rate, Rate::from_decimal(dec!(0.75)));
    }

    #[test]
    fn test_export_through_book() {
        let time = time();
        let mut book = LoanBook::default();
        let id = book.import_csv(CSV, &time).unwrap();

        assert_eq!(book.export_csv(id).unwrap(), CSV);
        assert_eq!(
            book.export_file_name(id, &time).unwrap(),
            "Jane Doe_Export_2024-03-31.csv"
        );
    }
}

use chrono::{DateTime, Utc};
use hourglass_rs::{SafeTimeProvider, TimeSource};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::{Money, Rate};
use crate::entry::{EntryKind, LedgerEntry};
use crate::errors::{LedgerError, Result};
use crate::interest::{self, AccrualEngine};
use crate::types::{EntryId, LoanId};

/// a loan you made, tracked through its ledger.
///
/// Balances are never stored: principal and interest are always derived from
/// the entries, so inserting or deleting a backdated entry is enough to
/// correct every figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub id: LoanId,
    pub borrower_name: String,
    pub start_date: DateTime<Utc>,
    pub annual_rate: Rate,
    pub notes: String,
    /// when the loan was recorded, used only to order listings
    pub created_at: DateTime<Utc>,
    ledger: Vec<LedgerEntry>,
}

impl Loan {
    pub fn builder() -> LoanBuilder {
        LoanBuilder::new()
    }

    /// entries in insertion order
    pub fn entries(&self) -> &[LedgerEntry] {
        &self.ledger
    }

    pub fn len(&self) -> usize {
        self.ledger.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ledger.is_empty()
    }

    pub fn entry(&self, id: EntryId) -> Option<&LedgerEntry> {
        self.ledger.iter().find(|e| e.id == id)
    }

    /// append an entry, stamping it with this loan's id
    pub fn append(&mut self, mut entry: LedgerEntry) -> EntryId {
        entry.loan_id = Some(self.id);
        let id = entry.id;
        self.ledger.push(entry);
        id
    }

    /// remove an entry; the loan itself is untouched
    pub fn remove_entry(&mut self, id: EntryId) -> Option<LedgerEntry> {
        let position = self.ledger.iter().position(|e| e.id == id)?;
        Some(self.ledger.remove(position))
    }

    /// edit an existing entry in place, keeping its id and ledger position
    pub fn update_entry(
        &mut self,
        id: EntryId,
        date: DateTime<Utc>,
        kind: EntryKind,
        notes: impl Into<String>,
    ) -> Result<&LedgerEntry> {
        let entry = self
            .ledger
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(LedgerError::EntryNotFound { id })?;

        entry.date = date;
        entry.kind = kind;
        entry.notes = notes.into();
        Ok(entry)
    }

    /// capital added minus principal repaid, over the whole ledger
    pub fn current_principal(&self) -> Money {
        self.ledger.iter().map(|e| e.kind.principal_delta()).sum()
    }

    pub fn accrual_engine(&self) -> AccrualEngine {
        AccrualEngine::new(self.start_date, self.annual_rate)
    }

    /// interest owed and not yet paid as of `as_of`
    pub fn accrued_interest(&self, as_of: DateTime<Utc>) -> Money {
        self.accrual_engine().accrued_interest(&self.ledger, as_of)
    }

    /// accrued interest as of the provider's current time
    pub fn accrued_interest_now(&self, time_provider: &SafeTimeProvider) -> Money {
        self.accrued_interest(time_provider.now())
    }

    pub fn total_owed(&self, as_of: DateTime<Utc>) -> Money {
        self.current_principal() + self.accrued_interest(as_of)
    }

    /// one day of interest on today's principal
    pub fn daily_interest_amount(&self) -> Money {
        interest::daily_interest(self.current_principal(), self.annual_rate)
    }

    /// interest received over the life of the loan (taxable income)
    pub fn lifetime_interest_paid(&self) -> Money {
        self.ledger
            .iter()
            .map(|e| match e.kind {
                EntryKind::Payment { to_interest, .. } => to_interest,
                EntryKind::CapitalAddition { .. } => Money::ZERO,
            })
            .sum()
    }

    pub fn lifetime_principal_paid(&self) -> Money {
        self.ledger
            .iter()
            .map(|e| match e.kind {
                EntryKind::Payment { to_principal, .. } => to_principal,
                EntryKind::CapitalAddition { .. } => Money::ZERO,
            })
            .sum()
    }

    pub fn total_invested(&self) -> Money {
        self.ledger
            .iter()
            .map(|e| match e.kind {
                EntryKind::CapitalAddition { amount } => amount,
                EntryKind::Payment { .. } => Money::ZERO,
            })
            .sum()
    }

    /// most recent first; among equal dates the latest inserted comes first
    pub fn sorted_ledger(&self) -> Vec<&LedgerEntry> {
        let mut entries: Vec<&LedgerEntry> = self.ledger.iter().rev().collect();
        entries.sort_by(|a, b| b.date.cmp(&a.date));
        entries
    }

    /// oldest first; among equal dates insertion order is kept
    pub fn chronological_ledger(&self) -> Vec<&LedgerEntry> {
        let mut entries: Vec<&LedgerEntry> = self.ledger.iter().collect();
        entries.sort_by_key(|e| e.date);
        entries
    }
}

/// builder for loans
#[derive(Debug, Default)]
pub struct LoanBuilder {
    borrower_name: Option<String>,
    start_date: Option<DateTime<Utc>>,
    annual_rate: Option<Rate>,
    notes: String,
    entries: Vec<LedgerEntry>,
}

impl LoanBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn borrower_name(mut self, name: impl Into<String>) -> Self {
        self.borrower_name = Some(name.into());
        self
    }

    pub fn start_date(mut self, date: DateTime<Utc>) -> Self {
        self.start_date = Some(date);
        self
    }

    pub fn annual_rate(mut self, rate: Rate) -> Self {
        self.annual_rate = Some(rate);
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// seed the ledger, e.g. with the initial disbursement
    pub fn entry(mut self, entry: LedgerEntry) -> Self {
        self.entries.push(entry);
        self
    }

    /// build using system time for bookkeeping timestamps
    pub fn build(self) -> Result<Loan> {
        let time = SafeTimeProvider::new(TimeSource::System);
        self.build_with_time(&time)
    }

    /// build with explicit time provider
    pub fn build_with_time(self, time_provider: &SafeTimeProvider) -> Result<Loan> {
        let borrower_name = self
            .borrower_name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .ok_or(LedgerError::EmptyBorrowerName)?;

        let annual_rate = self.annual_rate.ok_or(LedgerError::InvalidConfiguration {
            message: "Rate required".to_string(),
        })?;

        let now = time_provider.now();
        let mut loan = Loan {
            id: Uuid::new_v4(),
            borrower_name,
            start_date: self.start_date.unwrap_or(now),
            annual_rate,
            notes: self.notes,
            created_at: now,
            ledger: Vec::with_capacity(self.entries.len()),
        };

        for entry in self.entries {
            loan.append(entry);
        }

        Ok(loan)
    }
}

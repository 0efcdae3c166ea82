use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::types::{EntryId, LoanId};

/// everything the loan book records about changes to its loans
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LedgerEvent {
    // loan lifecycle
    LoanCreated {
        loan_id: LoanId,
        borrower_name: String,
        annual_rate: Rate,
        start_date: DateTime<Utc>,
        timestamp: DateTime<Utc>,
    },
    LoanImported {
        loan_id: LoanId,
        borrower_name: String,
        entry_count: usize,
        timestamp: DateTime<Utc>,
    },
    LoanRemoved {
        loan_id: LoanId,
        borrower_name: String,
        entries_removed: usize,
        timestamp: DateTime<Utc>,
    },

    // ledger entries
    CapitalAdded {
        loan_id: LoanId,
        entry_id: EntryId,
        amount: Money,
        new_principal: Money,
        timestamp: DateTime<Utc>,
    },
    PaymentRecorded {
        loan_id: LoanId,
        entry_id: EntryId,
        amount: Money,
        applied_to_principal: Money,
        applied_to_interest: Money,
        new_principal: Money,
        timestamp: DateTime<Utc>,
    },
    EntryUpdated {
        loan_id: LoanId,
        entry_id: EntryId,
        timestamp: DateTime<Utc>,
    },
    EntryRemoved {
        loan_id: LoanId,
        entry_id: EntryId,
        timestamp: DateTime<Utc>,
    },
}

impl LedgerEvent {
    pub fn loan_id(&self) -> LoanId {
        match self {
            LedgerEvent::LoanCreated { loan_id, .. }
            | LedgerEvent::LoanImported { loan_id, .. }
            | LedgerEvent::LoanRemoved { loan_id, .. }
            | LedgerEvent::CapitalAdded { loan_id, .. }
            | LedgerEvent::PaymentRecorded { loan_id, .. }
            | LedgerEvent::EntryUpdated { loan_id, .. }
            | LedgerEvent::EntryRemoved { loan_id, .. } => *loan_id,
        }
    }
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<LedgerEvent>,
}

impl EventStore {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: LedgerEvent) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<LedgerEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::decimal::{Money, Rate};
use crate::entry::{EntryKind, LedgerEntry};

const MILLIS_PER_DAY: i64 = 86_400_000;

/// fractional days between two instants, negative when `to` precedes `from`
pub fn elapsed_days(from: DateTime<Utc>, to: DateTime<Utc>) -> Decimal {
    Decimal::from((to - from).num_milliseconds()) / Decimal::from(MILLIS_PER_DAY)
}

/// engine that replays a ledger to find the interest owed at a point in time.
///
/// Interest is simple: each period between two ledger events earns
/// `principal * rate / 365 * days` on the principal in force during that
/// period. Accrued interest is kept apart from principal and is only reduced
/// by the interest portion of payments. Nothing is cached; every query walks
/// the ledger from the loan's start so backdated edits are always honoured.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccrualEngine {
    pub start_date: DateTime<Utc>,
    pub annual_rate: Rate,
}

impl AccrualEngine {
    pub fn new(start_date: DateTime<Utc>, annual_rate: Rate) -> Self {
        Self {
            start_date,
            annual_rate,
        }
    }

    /// interest earned by `principal` between two instants; zero if `to` is
    /// not after `from`
    pub fn interest_for_period(
        &self,
        principal: Money,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Money {
        let days = elapsed_days(from, to);
        if days > Decimal::ZERO {
            principal.prorate(self.annual_rate, days)
        } else {
            Money::ZERO
        }
    }

    /// walk the ledger chronologically up to `as_of`
    pub fn replay(&self, entries: &[LedgerEntry], as_of: DateTime<Utc>) -> AccrualReplay {
        let mut ordered: Vec<&LedgerEntry> = entries.iter().collect();
        // stable, so same-date entries keep insertion order
        ordered.sort_by_key(|entry| entry.date);

        let mut principal = Money::ZERO;
        let mut accrued = Money::ZERO;
        let mut cursor = self.start_date;
        let mut segments = Vec::new();

        for entry in ordered {
            if let Some(segment) = self.segment(principal, cursor, entry.date) {
                accrued += segment.interest;
                segments.push(segment);
            }

            match entry.kind {
                EntryKind::CapitalAddition { amount } => {
                    principal += amount;
                }
                EntryKind::Payment {
                    to_principal,
                    to_interest,
                } => {
                    accrued -= to_interest;
                    principal -= to_principal;
                }
            }

            cursor = entry.date;
        }

        if let Some(segment) = self.segment(principal, cursor, as_of) {
            accrued += segment.interest;
            segments.push(segment);
        }

        trace!(
            entries = entries.len(),
            segments = segments.len(),
            raw_accrued = %accrued,
            "ledger replayed"
        );

        AccrualReplay {
            as_of,
            principal,
            raw_accrued: accrued,
            segments,
        }
    }

    /// accrued interest as of `as_of`, never negative
    pub fn accrued_interest(&self, entries: &[LedgerEntry], as_of: DateTime<Utc>) -> Money {
        self.replay(entries, as_of).accrued_interest()
    }

    fn segment(
        &self,
        principal: Money,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Option<AccrualSegment> {
        let days = elapsed_days(from, to);
        if days <= Decimal::ZERO {
            return None;
        }

        Some(AccrualSegment {
            from,
            to,
            principal_base: principal,
            days,
            interest: principal.prorate(self.annual_rate, days),
        })
    }
}

/// interest earned over one stretch of constant principal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccrualSegment {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    pub principal_base: Money,
    pub days: Decimal,
    pub interest: Money,
}

/// result of a full ledger replay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccrualReplay {
    pub as_of: DateTime<Utc>,
    /// principal after applying every entry
    pub principal: Money,
    /// running accumulator before the non-negative clamp
    pub raw_accrued: Money,
    pub segments: Vec<AccrualSegment>,
}

impl AccrualReplay {
    pub fn accrued_interest(&self) -> Money {
        self.raw_accrued.max(Money::ZERO)
    }

    /// interest earned across all segments, ignoring payments
    pub fn interest_earned(&self) -> Money {
        self.segments.iter().map(|s| s.interest).sum()
    }
}

use chrono::{DateTime, Utc};
use hourglass_rs::SafeTimeProvider;

use crate::config::ValidationConfig;
use crate::decimal::{Money, Rate};
use crate::entry::EntryKind;
use crate::errors::{LedgerError, Result};
use crate::loan::Loan;
use crate::payments::PaymentStrategy;

/// business rules for what may be written to a ledger.
///
/// The accrual engine accepts any ledger; these checks belong to whoever
/// records entries on behalf of a user.
#[derive(Clone, Copy)]
pub struct Validator<'a> {
    config: &'a ValidationConfig,
    time_provider: &'a SafeTimeProvider,
}

impl<'a> Validator<'a> {
    pub fn new(config: &'a ValidationConfig, time_provider: &'a SafeTimeProvider) -> Self {
        Self {
            config,
            time_provider,
        }
    }

    /// name must be non-blank and the rate inside the configured bounds
    pub fn validate_new_loan(&self, borrower_name: &str, annual_rate: Rate) -> Result<()> {
        if borrower_name.trim().is_empty() {
            return Err(LedgerError::EmptyBorrowerName);
        }
        self.validate_rate(annual_rate)
    }

    pub fn validate_rate(&self, rate: Rate) -> Result<()> {
        let below = self.config.min_rate.is_some_and(|min| rate < min);
        let above = self.config.max_rate.is_some_and(|max| rate > max);
        if below || above {
            return Err(LedgerError::RateOutOfRange { rate });
        }
        Ok(())
    }

    /// entries may fall on the start day or later, and not after now unless
    /// future dates are allowed
    pub fn validate_date(&self, loan: &Loan, date: DateTime<Utc>) -> Result<()> {
        if date.date_naive() < loan.start_date.date_naive() {
            return Err(LedgerError::DateBeforeStart {
                date,
                start_date: loan.start_date,
            });
        }

        let now = self.time_provider.now();
        if !self.config.allow_future_dates && date > now {
            return Err(LedgerError::DateInFuture { date, now });
        }

        Ok(())
    }

    pub fn validate_capital_addition(
        &self,
        loan: &Loan,
        amount: Money,
        date: DateTime<Utc>,
    ) -> Result<()> {
        validate_amount(amount)?;
        self.validate_date(loan, date)
    }

    /// a custom split must be non-negative and add up to the amount within
    /// `custom_split_tolerance`
    pub fn validate_payment(
        &self,
        loan: &Loan,
        amount: Money,
        strategy: &PaymentStrategy,
        date: DateTime<Utc>,
    ) -> Result<()> {
        validate_amount(amount)?;
        self.validate_date(loan, date)?;

        if let PaymentStrategy::Custom {
            principal,
            interest,
        } = *strategy
        {
            self.validate_split(amount, principal, interest)?;
        }

        Ok(())
    }

    /// validate an entry as it would be stored, used when editing
    pub fn validate_entry(&self, loan: &Loan, date: DateTime<Utc>, kind: &EntryKind) -> Result<()> {
        match *kind {
            EntryKind::CapitalAddition { amount } => {
                self.validate_capital_addition(loan, amount, date)
            }
            EntryKind::Payment {
                to_principal,
                to_interest,
            } => {
                let amount = to_principal + to_interest;
                validate_amount(amount)?;
                self.validate_date(loan, date)?;
                self.validate_split(amount, to_principal, to_interest)
            }
        }
    }

    fn validate_split(&self, amount: Money, principal: Money, interest: Money) -> Result<()> {
        if principal.is_negative() || interest.is_negative() {
            return Err(LedgerError::NegativeSplit {
                principal,
                interest,
            });
        }

        if !(principal + interest).approx_eq(amount, self.config.custom_split_tolerance) {
            return Err(LedgerError::SplitMismatch {
                amount,
                principal,
                interest,
            });
        }

        Ok(())
    }
}

fn validate_amount(amount: Money) -> Result<()> {
    if !amount.is_positive() {
        return Err(LedgerError::NonPositiveAmount { amount });
    }
    Ok(())
}

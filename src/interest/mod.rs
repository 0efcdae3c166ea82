pub mod accrual;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::loan::Loan;

pub use accrual::{elapsed_days, AccrualEngine, AccrualReplay, AccrualSegment};

/// balances of a loan at a point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanBalances {
    pub as_of: DateTime<Utc>,
    pub principal: Money,
    pub accrued_interest: Money,
    pub total_owed: Money,
    pub daily_interest: Money,
}

impl LoanBalances {
    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// interest earned by `principal` in one day at `annual_rate`
pub fn daily_interest(principal: Money, annual_rate: Rate) -> Money {
    principal * annual_rate.daily_rate().as_decimal()
}

/// principal, accrued interest, total owed and daily interest as of `as_of`
pub fn compute_balances(loan: &Loan, as_of: DateTime<Utc>) -> LoanBalances {
    let replay = loan.accrual_engine().replay(loan.entries(), as_of);
    let principal = loan.current_principal();
    let accrued_interest = replay.accrued_interest();

    LoanBalances {
        as_of,
        principal,
        accrued_interest,
        total_owed: principal + accrued_interest,
        daily_interest: daily_interest(principal, loan.annual_rate),
    }
}

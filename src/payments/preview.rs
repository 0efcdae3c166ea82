use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::interest::{compute_balances, daily_interest};
use crate::loan::Loan;
use crate::types::PaymentSplit;

use super::PaymentStrategy;

/// before and after figures for a payment that has not been recorded.
///
/// `interest_after` is floored at zero the same way accrued interest is, so a
/// custom split that pays more interest than has accrued shows zero rather
/// than `interest_before - applied_to_interest`. Principal is never floored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentImpact {
    pub payment_date: DateTime<Utc>,
    pub payment_amount: Money,
    pub applied_to_principal: Money,
    pub applied_to_interest: Money,

    pub principal_before: Money,
    pub principal_after: Money,

    pub interest_before: Money,
    pub interest_after: Money,

    pub total_before: Money,
    pub total_after: Money,

    pub daily_interest_before: Money,
    pub daily_interest_after: Money,
}

impl PaymentImpact {
    pub fn split(&self) -> PaymentSplit {
        PaymentSplit::new(self.applied_to_principal, self.applied_to_interest)
    }

    pub fn principal_change(&self) -> Money {
        self.principal_after - self.principal_before
    }

    pub fn interest_change(&self) -> Money {
        self.interest_after - self.interest_before
    }

    pub fn total_change(&self) -> Money {
        self.total_after - self.total_before
    }

    pub fn daily_interest_change(&self) -> Money {
        self.daily_interest_after - self.daily_interest_before
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// what recording `amount` on `date` would do, without touching the ledger
pub fn preview_payment(
    loan: &Loan,
    amount: Money,
    strategy: PaymentStrategy,
    date: DateTime<Utc>,
) -> PaymentImpact {
    let before = compute_balances(loan, date);
    let split = strategy.split(amount, before.accrued_interest);

    let principal_after = before.principal - split.to_principal;
    // accrued interest is never shown below zero, principal may be
    let interest_after = (before.accrued_interest - split.to_interest).max(Money::ZERO);

    PaymentImpact {
        payment_date: date,
        payment_amount: amount,
        applied_to_principal: split.to_principal,
        applied_to_interest: split.to_interest,
        principal_before: before.principal,
        principal_after,
        interest_before: before.accrued_interest,
        interest_after,
        total_before: before.total_owed,
        total_after: principal_after + interest_after,
        daily_interest_before: before.daily_interest,
        daily_interest_after: daily_interest(principal_after, loan.annual_rate),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Rate;
    use crate::entry::LedgerEntry;
    use chrono::{Duration, TimeZone};
    use rust_decimal_macros::dec;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn funded_loan() -> Loan {
        Loan::builder()
            .borrower_name("Preview")
            .start_date(start())
            .annual_rate(Rate::from_decimal(dec!(0.073)))
            .entry(LedgerEntry::capital_addition(start(), Money::from_major(1_000), ""))
            .build()
            .unwrap()
    }

    #[test]
    fn test_preview_interest_first() {
        let loan = funded_loan();
        let date = start() + Duration::days(10);

        let impact = preview_payment(&loan, Money::from_major(102), PaymentStrategy::InterestFirst, date);

        assert_eq!(impact.interest_before, Money::from_major(2));
        assert_eq!(impact.applied_to_interest, Money::from_major(2));
        assert_eq!(impact.applied_to_principal, Money::from_major(100));
        assert_eq!(impact.principal_after, Money::from_major(900));
        assert_eq!(impact.interest_after, Money::ZERO);
        assert_eq!(impact.total_before, Money::from_major(1_002));
        assert_eq!(impact.total_after, Money::from_major(900));
        assert_eq!(impact.total_change(), Money::from_major(-102));
        assert_eq!(impact.principal_change(), Money::from_major(-100));
        assert_eq!(impact.interest_change(), Money::from_major(-2));
        assert_eq!(impact.daily_interest_before, Money::from_str_exact("0.2").unwrap());
        assert_eq!(impact.daily_interest_after, Money::from_str_exact("0.18").unwrap());
        assert_eq!(impact.daily_interest_change(), Money::from_str_exact("-0.02").unwrap());
    }

    #[test]
    fn test_preview_does_not_mutate() {
        let loan = funded_loan();
        let snapshot = loan.clone();

        let _ = preview_payment(
            &loan,
            Money::from_major(500),
            PaymentStrategy::PrincipalOnly,
            start() + Duration::days(3),
        );

        assert_eq!(loan, snapshot);
    }

    #[test]
    fn test_preview_principal_only_with_accrued_interest() {
        let loan = funded_loan();
        let date = start() + Duration::days(1_000);

        let impact = preview_payment(&loan, Money::from_major(500), PaymentStrategy::PrincipalOnly, date);

        assert_eq!(impact.interest_before, Money::from_major(200));
        assert_eq!(impact.applied_to_principal, Money::from_major(500));
        assert_eq!(impact.applied_to_interest, Money::ZERO);
        assert_eq!(impact.interest_after, Money::from_major(200));
    }

    #[test]
    fn test_preview_custom_overpaying_interest() {
        let loan = funded_loan();
        let strategy = PaymentStrategy::Custom {
            principal: Money::ZERO,
            interest: Money::from_major(5),
        };

        let impact = preview_payment(&loan, Money::from_major(5), strategy, start() + Duration::days(10));

        assert_eq!(impact.applied_to_interest, Money::from_major(5));
        assert_eq!(impact.interest_after, Money::ZERO);
        assert_eq!(impact.principal_after, Money::from_major(1_000));
    }

    #[test]
    fn test_preview_json() {
        let loan = funded_loan();
        let impact = preview_payment(&loan, Money::from_major(5), PaymentStrategy::InterestFirst, start());
        let json = impact.to_json_pretty().unwrap();
        assert!(json.contains("applied_to_principal"));
    }
}

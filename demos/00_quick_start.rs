/// quick start - minimal example to get started
use chrono::{Duration, TimeZone, Utc};
use loan_ledger_rs::{compute_balances, LedgerEntry, Loan, Money, Rate};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

    // lend $10,000 at 8%
    let mut loan = Loan::builder()
        .borrower_name("Jane Doe")
        .start_date(start)
        .annual_rate(Rate::from_percentage(dec!(8)))
        .build()?;
    loan.append(LedgerEntry::capital_addition(start, Money::from_major(10_000), "initial loan"));

    // balances 90 days later
    let balances = compute_balances(&loan, start + Duration::days(90));
    println!("{}", balances.to_json_pretty()?);

    Ok(())
}

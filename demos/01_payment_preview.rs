/// payment preview - see what a payment would do before recording it
use chrono::{Duration, TimeZone, Utc};
use loan_ledger_rs::{commit_payment, preview_payment, LedgerEntry, Loan, Money, PaymentStrategy, Rate};
use rust_decimal_macros::dec;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== payment preview example ===\n");

    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let mut loan = Loan::builder()
        .borrower_name("Preview Co")
        .start_date(start)
        .annual_rate(Rate::from_percentage(dec!(10)))
        .build()?;
    loan.append(LedgerEntry::capital_addition(start, Money::from_major(10_000), ""));

    let pay_date = start + Duration::days(73);
    println!("accrued on {}: ${}", pay_date.format("%Y-%m-%d"), loan.accrued_interest(pay_date).to_fixed_2());

    for (label, strategy) in [
        ("interest first", PaymentStrategy::InterestFirst),
        ("principal only", PaymentStrategy::PrincipalOnly),
        (
            "custom 50/50",
            PaymentStrategy::Custom {
                principal: Money::from_major(250),
                interest: Money::from_major(250),
            },
        ),
    ] {
        let impact = preview_payment(&loan, Money::from_major(500), strategy, pay_date);
        println!(
            "{:<15} principal ${} -> ${}, interest ${} -> ${}, daily ${} -> ${}",
            label,
            impact.principal_before.to_fixed_2(),
            impact.principal_after.to_fixed_2(),
            impact.interest_before.to_fixed_2(),
            impact.interest_after.to_fixed_2(),
            impact.daily_interest_before.to_fixed_2(),
            impact.daily_interest_after.to_fixed_2(),
        );
    }

    // previewing never touches the ledger
    assert_eq!(loan.len(), 1);

    let entry = commit_payment(&mut loan, Money::from_major(500), PaymentStrategy::InterestFirst, pay_date, "march");
    println!("\nrecorded: {}", entry.display_description());
    println!("principal now ${}", loan.current_principal().to_fixed_2());

    Ok(())
}

/// csv round trip - export a loan and read it back
use chrono::{Duration, TimeZone, Utc};
use loan_ledger_rs::{
    export_file_name, export_ledger, import_ledger, LedgerEntry, Loan, Money, Rate, SafeTimeProvider,
    TimeSource,
};
use rust_decimal_macros::dec;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let time = SafeTimeProvider::new(TimeSource::Test(start + Duration::days(120)));

    let mut loan = Loan::builder()
        .borrower_name("Acme, Inc.")
        .start_date(start)
        .annual_rate(Rate::from_percentage(dec!(7.25)))
        .build_with_time(&time)?;
    loan.append(LedgerEntry::capital_addition(start, Money::from_major(25_000), "wire, ref 1001"));
    loan.append(LedgerEntry::payment(
        start + Duration::days(31),
        Money::from_major(800),
        Money::from_str_exact("153.70")?,
        "january",
    ));

    let csv = export_ledger(&loan);
    println!("{}:\n\n{}", export_file_name(&loan, time.now().date_naive()), csv);

    let imported = import_ledger(&csv)?;
    println!(
        "imported {} entries for {}: invested ${}, paid ${}",
        imported.len(),
        imported.borrower_name,
        imported.total_investments().to_fixed_2(),
        imported.total_payments().to_fixed_2(),
    );

    let restored = imported.into_loan(&time)?;
    assert_eq!(restored.current_principal(), loan.current_principal());
    println!("principal after round trip: ${}", restored.current_principal().to_fixed_2());

    // a broken row rejects the whole file
    let broken = csv.replace("153.70,january", "153.00,january");
    if let Err(e) = import_ledger(&broken) {
        println!("rejected: {e}");
    }

    Ok(())
}

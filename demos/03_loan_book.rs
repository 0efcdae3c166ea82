/// loan book - validated entries, events and time control
use chrono::{Duration, TimeZone, Utc};
use loan_ledger_rs::{LedgerConfig, LoanBook, LoanView, Money, PaymentStrategy, Rate, SafeTimeProvider, TimeSource};
use rust_decimal_macros::dec;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== loan book example ===\n");

    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let time = SafeTimeProvider::new(TimeSource::Test(start));
    let controller = time.test_control().unwrap();

    let mut book = LoanBook::new(LedgerConfig::interactive())?;
    let id = book.create_loan("Bob", start, Rate::from_percentage(dec!(6)), "family loan", &time)?;
    book.add_capital(id, Money::from_major(5_000), start, "initial", &time)?;

    // a payment dated in the future is refused
    let early = book.record_payment(
        id,
        Money::from_major(100),
        PaymentStrategy::InterestFirst,
        start + Duration::days(30),
        "",
        &time,
    );
    println!("before time passes: {}", early.unwrap_err());

    controller.advance(Duration::days(30));
    book.record_payment(id, Money::from_major(100), PaymentStrategy::InterestFirst, time.now(), "", &time)?;

    controller.advance(Duration::days(15));
    let view = LoanView::from_loan(book.loan(id)?, time.now());
    println!("{}", view.to_json_pretty()?);

    for event in book.take_events() {
        println!("event: {:?}", event);
    }

    let csv = book.export_csv(id)?;
    book.remove_loan(id, &time)?;
    let restored = book.import_csv(&csv, &time)?;
    println!("\nreimported as {} with {} entries", restored, book.loan(restored)?.len());

    Ok(())
}

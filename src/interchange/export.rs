use chrono::NaiveDate;
use csv::{Terminator, WriterBuilder};
use rust_decimal::RoundingStrategy;
use tracing::{info, warn};

use crate::entry::{EntryKind, LedgerEntry};
use crate::loan::Loan;

use super::dates::{format_date, EXPORT_DATE_FORMAT};
use super::{COLUMN_HEADER, NAME_PREFIX, RATE_PREFIX, START_DATE_PREFIX};

/// render a loan and its ledger in the interchange format, oldest entry first
pub fn export_ledger(loan: &Loan) -> String {
    let rate = loan
        .annual_rate
        .as_percentage()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

    let mut out = String::new();
    out.push_str(&format!("{}{}\n", NAME_PREFIX, loan.borrower_name));
    out.push_str(&format!("{}{}\n", START_DATE_PREFIX, format_date(loan.start_date)));
    out.push_str(&format!("{}{:.2}%\n\n", RATE_PREFIX, rate));
    out.push_str(COLUMN_HEADER);
    out.push('\n');

    for entry in loan.chronological_ledger() {
        out.push_str(&encode_row(entry));
    }

    info!(loan_id = %loan.id, entries = loan.len(), "ledger exported");
    out
}

/// `<name>_Export_<yyyy-MM-dd>.csv` with path separators removed from the name
pub fn export_file_name(loan: &Loan, today: NaiveDate) -> String {
    let name: String = loan
        .borrower_name
        .chars()
        .map(|c| match c {
            ':' | '/' | '\\' => '-',
            other => other,
        })
        .collect();

    format!("{}_Export_{}.csv", name.trim(), today.format(EXPORT_DATE_FORMAT))
}

fn encode_row(entry: &LedgerEntry) -> String {
    let date = format_date(entry.date);
    // rows are one line each, so line breaks inside notes are flattened
    let notes = entry.notes.trim().replace(['\r', '\n'], " ");

    let fields = match entry.kind {
        EntryKind::CapitalAddition { amount } => [
            date,
            entry.kind.display_name().to_string(),
            amount.to_fixed_2(),
            String::new(),
            String::new(),
            notes,
        ],
        EntryKind::Payment {
            to_principal,
            to_interest,
        } => {
            // round the parts first so the written amount is their exact sum
            let (principal, interest) = (to_principal.to_cents(), to_interest.to_cents());
            [
                date,
                entry.kind.display_name().to_string(),
                (principal + interest).to_fixed_2(),
                principal.to_fixed_2(),
                interest.to_fixed_2(),
                notes,
            ]
        }
    };

    encode_record(&fields)
}

fn encode_record(fields: &[String]) -> String {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    let encoded = writer
        .write_record(fields)
        .map_err(|e| e.to_string())
        .and_then(|_| writer.into_inner().map_err(|e| e.to_string()))
        .and_then(|bytes| String::from_utf8(bytes).map_err(|e| e.to_string()));

    match encoded {
        Ok(line) => line,
        Err(error) => {
            warn!(%error, "csv writer failed, writing row unquoted");
            format!("{}\n", fields.join(","))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::{Money, Rate};
    use crate::interchange::dates::start_of_day;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn day(d: u32) -> chrono::DateTime<chrono::Utc> {
        start_of_day(NaiveDate::from_ymd_opt(2024, 1, d).unwrap())
    }

    fn loan() -> Loan {
        Loan::builder()
            .borrower_name("Jane Doe")
            .start_date(day(1))
            .annual_rate(Rate::from_decimal(dec!(0.08)))
            .build()
            .unwrap()
    }

    #[test]
    fn test_export_layout() {
        let mut loan = loan();
        loan.append(LedgerEntry::payment(
            day(20) + Duration::hours(13),
            Money::from_major(300),
            Money::from_str_exact("50.5").unwrap(),
            "January",
        ));
        loan.append(LedgerEntry::capital_addition(day(1), Money::from_major(10_000), " Initial loan "));

        let expected = "Loan Export: Jane Doe
Start Date: 2024-01-01
Interest Rate: 8.00%

Date,Type,Amount,Principal Paid,Interest Paid,Notes
2024-01-01,Investment,10000.00,,,Initial loan
2024-01-20,Payment,350.50,300.00,50.50,January
";
        assert_eq!(export_ledger(&loan), expected);
    }

    #[test]
    fn test_export_quotes_notes_with_commas() {
        let mut loan = loan();
        loan.append(LedgerEntry::capital_addition(day(2), Money::from_major(5), "wire, ref \"42\"\nsecond line"));

        let csv = export_ledger(&loan);
        assert!(csv.ends_with("2024-01-02,Investment,5.00,,,\"wire, ref \"\"42\"\" second line\"\n"));
    }

    #[test]
    fn test_export_sub_cent_split_stays_balanced() {
        let mut loan = loan();
        loan.append(LedgerEntry::payment(
            day(1),
            Money::from_str_exact("87.655").unwrap(),
            Money::from_str_exact("12.345").unwrap(),
            "",
        ));

        let csv = export_ledger(&loan);
        assert!(csv.ends_with("2024-01-01,Payment,100.01,87.66,12.35,\n"));

        let imported = crate::interchange::import_ledger(&csv).unwrap();
        assert_eq!(
            imported.entries[0].kind,
            EntryKind::Payment {
                to_principal: Money::from_str_exact("87.66").unwrap(),
                to_interest: Money::from_str_exact("12.35").unwrap(),
            }
        );
    }

    #[test]
    fn test_export_rate_rounding() {
        let mut loan = loan();
        loan.annual_rate = Rate::from_decimal(dec!(0.123456));
        assert!(export_ledger(&loan).contains("Interest Rate: 12.35%\n"));

        loan.annual_rate = Rate::from_decimal(dec!(-0.02));
        assert!(export_ledger(&loan).contains("Interest Rate: -2.00%\n"));
    }

    #[test]
    fn test_export_file_name() {
        let mut loan = loan();
        loan.borrower_name = "Acme: West/East\\Co ".to_string();
        let today = NaiveDate::from_ymd_opt(2024, 7, 4).unwrap();

        assert_eq!(export_file_name(&loan, today), "Acme- West-East-Co_Export_2024-07-04.csv");
    }
}

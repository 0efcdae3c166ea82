use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};

/// the only format written on export
pub const EXPORT_DATE_FORMAT: &str = "%Y-%m-%d";

/// formats accepted on import, tried in order
const IMPORT_DATE_FORMATS: &[&str] = &[
    EXPORT_DATE_FORMAT, // 2015-01-26
    "%b %d, %Y",        // Jan 26, 2015
    "%b %d,%Y",         // Jan 26,2015
    "%B %d, %Y",        // January 26, 2015
    "%B %d,%Y",         // January 26,2015
    "%m/%d/%Y",         // 1/26/2015 or 01/26/2015
];

/// parse a calendar date written in any of the accepted formats
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    IMPORT_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| dt.with_timezone(&Utc).date_naive())
        })
}

pub fn format_date(date: DateTime<Utc>) -> String {
    date.format(EXPORT_DATE_FORMAT).to_string()
}

/// midnight UTC on `date`
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

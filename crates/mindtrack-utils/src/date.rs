use chrono::{DateTime, FixedOffset, NaiveDate};

/// Calendar day of `date` as seen in the time zone `offset`.
#[must_use]
pub fn local_day(date: DateTime<FixedOffset>, offset: FixedOffset) -> NaiveDate {
    date.with_timezone(&offset).date_naive()
}

/// `YYYY-MM-DD` stamp used in export file names.
#[must_use]
pub fn file_date(date: DateTime<FixedOffset>) -> String {
    date.format("%Y-%m-%d").to_string()
}

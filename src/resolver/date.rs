use chrono::{Local, NaiveDate};

/// Eight digits, zero-padded, year first.
pub const DATE_FORMAT: &str = "%Y%m%d";

#[must_use]
pub fn format_date(date: NaiveDate) -> String { date.format(DATE_FORMAT).to_string() }

/// Today's date in the local time zone.
#[must_use]
pub fn today() -> NaiveDate { Local::now().date_naive() }

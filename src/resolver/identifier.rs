use std::fmt;

use chrono::NaiveDate;

use crate::format_date;

/// `YYYYMMDD-COMMIT`, computed once per build.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BuildIdentifier {
	date: String,
	commit: String,
}

impl BuildIdentifier {
	#[must_use]
	pub fn new(date: NaiveDate, commit: impl Into<String>) -> Self {
		Self {
			date: format_date(date),
			commit: commit.into(),
		}
	}

	#[inline]
	#[must_use]
	pub fn date(&self) -> &str { &self.date }

	#[inline]
	#[must_use]
	pub fn commit(&self) -> &str { &self.commit }
}

impl fmt::Display for BuildIdentifier {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}-{}", self.date, self.commit)
	}
}

/// The first `len` characters of `revision`, or all of it when shorter.
#[must_use]
pub fn short_commit(revision: &str, len: usize) -> &str {
	revision
		.char_indices()
		.nth(len)
		.and_then(|(end, _)| revision.get(..end))
		.unwrap_or(revision)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_short_commit() {
		assert_eq!(short_commit("abc1234567", 5), "abc12");
		assert_eq!(short_commit("23701cf0e1d2c3b4a5f60718293a4b5c6d7e8f90", 5), "23701");
		assert_eq!(short_commit("abc12", 5), "abc12");
		assert_eq!(short_commit("abc", 5), "abc");
		assert_eq!(short_commit("abc1234567", 7), "abc1234");
	}

	#[test]
	fn test_display() {
		let date = NaiveDate::from_ymd_opt(2024, 1, 15).expect("valid date");

		let id = BuildIdentifier::new(date, "abc12");
		assert_eq!(id.to_string(), "20240115-abc12");
		assert_eq!(id.date(), "20240115");
		assert_eq!(id.commit(), "abc12");

		assert_eq!(BuildIdentifier::new(date, "dev").to_string(), "20240115-dev");
	}
}

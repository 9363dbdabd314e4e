use std::fmt::{self, Write as _};

use buildvars_core::Result;
use serde::{Serialize, Serializer, ser::SerializeMap};

pub const NODE_ENV: &str = "NODE_ENV";
pub const VERSION: &str = "VERSION";
pub const USE_SENTRY: &str = "USE_SENTRY";

/// A value as the bundler substitutes it into source.
///
/// A `Literal` holds the content of a string literal; its source text is that
/// content wrapped in double quotes, so `development` is injected as
/// `"development"`. A `Raw` value is injected verbatim, e.g. an expression or
/// a number.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DefineValue {
	Literal(String),
	Raw(String),
}

impl DefineValue {
	#[must_use]
	pub fn literal(value: impl Into<String>) -> Self { Self::Literal(value.into()) }

	#[must_use]
	pub fn raw(value: impl Into<String>) -> Self { Self::Raw(value.into()) }

	/// The unquoted content.
	#[must_use]
	pub fn value(&self) -> &str {
		match self {
			| Self::Literal(value) | Self::Raw(value) => value,
		}
	}

	#[must_use]
	pub fn is_literal(&self) -> bool { matches!(self, Self::Literal(_)) }

	/// The exact text substituted into source.
	#[must_use]
	pub fn source_text(&self) -> String {
		match self {
			| Self::Literal(value) => serde_json::Value::String(value.clone()).to_string(),
			| Self::Raw(value) => value.clone(),
		}
	}
}

impl fmt::Display for DefineValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.source_text()) }
}

/// Keys and values handed to the bundler, kept in insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DefineMap {
	entries: Vec<(String, DefineValue)>,
}

impl DefineMap {
	#[must_use]
	pub fn new() -> Self { Self::default() }

	/// Sets `key`, replacing any previous value in place.
	pub fn insert(&mut self, key: impl Into<String>, value: DefineValue) {
		let key = key.into();
		match self.entries.iter_mut().find(|(k, _)| *k == key) {
			| Some((_, existing)) => *existing = value,
			| None => self.entries.push((key, value)),
		}
	}

	#[must_use]
	pub fn get(&self, key: &str) -> Option<&DefineValue> {
		self.entries
			.iter()
			.find(|(k, _)| k == key)
			.map(|(_, v)| v)
	}

	#[inline]
	#[must_use]
	pub fn len(&self) -> usize { self.entries.len() }

	#[inline]
	#[must_use]
	pub fn is_empty(&self) -> bool { self.entries.is_empty() }

	pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
		self.entries.iter().map(|(k, _)| k.as_str())
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &DefineValue)> + '_ {
		self.entries.iter().map(|(k, v)| (k.as_str(), v))
	}

	/// JSON object of key to source text, the shape a bundler's `define`
	/// option takes.
	pub fn to_json(&self, pretty: bool) -> Result<String> {
		let json = if pretty {
			serde_json::to_string_pretty(self)?
		} else {
			serde_json::to_string(self)?
		};

		Ok(json)
	}

	/// One `KEY=source text` line per entry.
	#[must_use]
	pub fn to_env(&self) -> String {
		self.iter().fold(String::new(), |mut out, (key, value)| {
			writeln!(out, "{key}={value}").ok();
			out
		})
	}
}

impl Serialize for DefineMap {
	fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
		let mut map = serializer.serialize_map(Some(self.len()))?;
		for (key, value) in self.iter() {
			map.serialize_entry(key, &value.source_text())?;
		}

		map.end()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sample() -> DefineMap {
		let mut map = DefineMap::new();
		map.insert(NODE_ENV, DefineValue::literal("development"));
		map.insert(VERSION, DefineValue::literal("20240115-abc12"));
		map.insert(USE_SENTRY, DefineValue::literal("0"));
		map
	}

	#[test]
	fn test_source_text() {
		assert_eq!(DefineValue::literal("development").source_text(), r#""development""#);
		assert_eq!(DefineValue::raw("0").source_text(), "0");
		assert_eq!(DefineValue::literal(r#"say "hi""#).source_text(), r#""say \"hi\"""#);
		assert_eq!(DefineValue::literal("0").value(), "0");
		assert!(!DefineValue::raw("0").is_literal(), "raw values are bare");
	}

	#[test]
	fn test_insert_replaces() {
		let mut map = sample();
		map.insert(NODE_ENV, DefineValue::literal("production"));

		assert_eq!(map.len(), 3);
		assert_eq!(map.keys().collect::<Vec<_>>(), [NODE_ENV, VERSION, USE_SENTRY]);
		assert_eq!(map.get(NODE_ENV).map(DefineValue::value), Some("production"));
		assert!(map.get("MISSING").is_none(), "unknown key");
	}

	#[test]
	fn test_to_json() {
		let json = sample().to_json(false).expect("serializes");
		assert_eq!(
			json,
			r#"{"NODE_ENV":"\"development\"","VERSION":"\"20240115-abc12\"","USE_SENTRY":"\"0\""}"#
		);

		let parsed: serde_json::Value =
			serde_json::from_str(&sample().to_json(true).expect("serializes")).expect("parses");
		assert_eq!(parsed["VERSION"], r#""20240115-abc12""#);
	}

	#[test]
	fn test_to_env() {
		assert_eq!(
			sample().to_env(),
			"NODE_ENV=\"development\"\nVERSION=\"20240115-abc12\"\nUSE_SENTRY=\"0\"\n"
		);
		assert_eq!(DefineMap::new().to_env(), "");
	}
}

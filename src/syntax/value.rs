//! Literal values and value types.
//!
//! Date and date-time literals are held at millisecond precision; anything
//! finer is rejected at construction. A date-only literal lifts to the
//! date-time at midnight.

use std::fmt;
use std::fmt::Write as _;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

use crate::error::Error;
use crate::parser::keywords;

/// A literal value carried by a value operation or compute argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Long(i64),
    Double(f64),
    Boolean(bool),
    String(String),
    DateTime(NaiveDateTime),
}

// The grammar cannot produce NaN, so equality is total in practice.
impl Eq for Value {}

impl Value {
    /// Construct a date-time value, rejecting sub-millisecond precision.
    pub fn date_time(value: NaiveDateTime) -> Result<Self, Error> {
        if value.nanosecond() % 1_000_000 != 0 {
            return Err(Error::InvalidDateTimeNanos);
        }
        Ok(Self::DateTime(value))
    }

    pub fn variant_name(&self) -> &'static str {
        match self {
            Self::Long(_) => "long",
            Self::Double(_) => "double",
            Self::Boolean(_) => "boolean",
            Self::String(_) => "string",
            Self::DateTime(_) => "datetime",
        }
    }

    pub fn as_long(&self) -> Result<i64, Error> {
        match self {
            Self::Long(value) => Ok(*value),
            other => Err(Error::invalid_casting(other.variant_name(), "long")),
        }
    }

    pub fn as_double(&self) -> Result<f64, Error> {
        match self {
            Self::Double(value) => Ok(*value),
            other => Err(Error::invalid_casting(other.variant_name(), "double")),
        }
    }

    pub fn as_boolean(&self) -> Result<bool, Error> {
        match self {
            Self::Boolean(value) => Ok(*value),
            other => Err(Error::invalid_casting(other.variant_name(), "boolean")),
        }
    }

    pub fn as_string(&self) -> Result<&str, Error> {
        match self {
            Self::String(value) => Ok(value),
            other => Err(Error::invalid_casting(other.variant_name(), "string")),
        }
    }

    pub fn as_date_time(&self) -> Result<NaiveDateTime, Error> {
        match self {
            Self::DateTime(value) => Ok(*value),
            other => Err(Error::invalid_casting(other.variant_name(), "datetime")),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Long(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Long(value as i64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<NaiveDate> for Value {
    /// Lifts a date to the date-time at midnight.
    fn from(value: NaiveDate) -> Self {
        Self::DateTime(value.and_hms_opt(0, 0, 0).expect("midnight is always valid"))
    }
}

impl TryFrom<NaiveDateTime> for Value {
    type Error = Error;

    fn try_from(value: NaiveDateTime) -> Result<Self, Error> {
        Self::date_time(value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Long(value) => write!(f, "{}", value),
            Self::Double(value) => {
                let text = format!("{}", value);
                if text.contains('.') {
                    f.write_str(&text)
                } else {
                    write!(f, "{}.0", text)
                }
            }
            Self::Boolean(value) => write!(f, "{}", value),
            Self::String(value) => f.write_str(&quoted(value)),
            Self::DateTime(value) => f.write_str(&format_date_time(value)),
        }
    }
}

/// Canonical date-time rendering.
///
/// Seconds print only when the second or millisecond component is
/// non-zero; milliseconds print only when non-zero. Years in [0, 9999]
/// are zero-padded to four digits, years above 9999 carry a leading `+`,
/// negative years a leading `-`.
pub(crate) fn format_date_time(value: &NaiveDateTime) -> String {
    let mut out = String::new();
    let year = value.year();
    if year < 0 {
        out.push('-');
    } else if year > 9999 {
        out.push('+');
    }
    let _ = write!(out, "{:04}", (year as i64).abs());
    let _ = write!(
        out,
        "-{:02}-{:02}T{:02}:{:02}",
        value.month(),
        value.day(),
        value.hour(),
        value.minute()
    );
    let millis = value.nanosecond() / 1_000_000;
    if value.second() != 0 || millis != 0 {
        let _ = write!(out, ":{:02}", value.second());
    }
    if millis != 0 {
        let _ = write!(out, ".{:03}", millis);
    }
    out
}

/// Double-quote a string, escaping quotes, backslashes, and control
/// characters the lexer recognises.
pub(crate) fn quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

/// The value type of an attribute type, as declared with `value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Long,
    Double,
    String,
    Boolean,
    DateTime,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Long => keywords::LONG,
            Self::Double => keywords::DOUBLE,
            Self::String => keywords::STRING,
            Self::Boolean => keywords::BOOLEAN,
            Self::DateTime => keywords::DATETIME,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date_time(text: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f").unwrap()
    }

    #[test]
    fn test_sub_millisecond_rejected() {
        let value = date_time("1000-11-12T13:14:15.000123456");
        assert_eq!(Value::date_time(value), Err(Error::InvalidDateTimeNanos));
    }

    #[test]
    fn test_millisecond_accepted_and_printed() {
        let value = Value::date_time(date_time("1000-11-12T13:14:15.100")).unwrap();
        assert_eq!(value.to_string(), "1000-11-12T13:14:15.100");
    }

    #[test]
    fn test_midnight_prints_without_seconds() {
        let value = Value::from(NaiveDate::from_ymd_opt(2020, 2, 1).unwrap());
        assert_eq!(value.to_string(), "2020-02-01T00:00");
    }

    #[test]
    fn test_large_and_negative_years() {
        let late = NaiveDate::from_ymd_opt(12345, 1, 2).unwrap();
        assert_eq!(Value::from(late).to_string(), "+12345-01-02T00:00");
        let early = NaiveDate::from_ymd_opt(-42, 1, 2).unwrap();
        assert_eq!(Value::from(early).to_string(), "-0042-01-02T00:00");
    }

    #[test]
    fn test_double_always_prints_a_fraction() {
        assert_eq!(Value::from(5.0).to_string(), "5.0");
        assert_eq!(Value::from(3.14).to_string(), "3.14");
    }

    #[test]
    fn test_string_quoting() {
        assert_eq!(Value::from("say \"hi\"").to_string(), r#""say \"hi\"""#);
        assert_eq!(Value::from("a\\d+").to_string(), r#""a\\d+""#);
    }

    #[test]
    fn test_casting() {
        assert_eq!(Value::from(7).as_long(), Ok(7));
        assert!(Value::from(7).as_string().is_err());
    }
}

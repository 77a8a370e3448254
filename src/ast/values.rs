use chrono::{DateTime, Duration, Utc};
use regex::Regex;
use std::sync::LazyLock;

use crate::error::CritError;

/// Output format for date literals, e.g. `2021-06-15 9:05PM`.
pub const SQL_DATE_FORMAT: &str = "%Y-%m-%d %-I:%M%p";

// Minutes, seconds or fractional-seconds precision, `Z` or a numeric offset.
static ISO_DATETIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(\d{4}-[01]\d-[0-3]\d)T([0-2]\d:[0-5]\d)(:[0-5]\d(?:\.\d+)?)?([+-][0-2]\d:[0-5]\d|Z)$",
    )
    .expect("unable to compile iso datetime regex")
});

/// An ISO-8601 date-time string together with the UTC instant it denotes.
#[derive(Debug, Clone, PartialEq)]
pub struct IsoDateTime {
    text: String,
    instant: DateTime<Utc>,
}

impl IsoDateTime {
    /// Recognize an ISO-8601 date-time.
    ///
    /// Returns `None` when the text does not have the shape, or has the shape
    /// but names no real instant (e.g. month 19).
    pub fn parse(text: &str) -> Option<Self> {
        let caps = ISO_DATETIME_RE.captures(text)?;
        let seconds = caps.get(3).map_or(":00", |m| m.as_str());
        let normalized = format!("{}T{}{}{}", &caps[1], &caps[2], seconds, &caps[4]);

        match DateTime::parse_from_rfc3339(&normalized) {
            Ok(dt) => Some(Self {
                text: text.to_string(),
                instant: dt.with_timezone(&Utc),
            }),
            Err(e) => {
                tracing::warn!(value = text, error = %e, "date-shaped value is not a valid instant, treating as text");
                None
            }
        }
    }

    /// The text as it was supplied.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The instant, normalized to UTC.
    pub fn instant(&self) -> DateTime<Utc> {
        self.instant
    }

    /// The 24 hour window starting at this instant, ending 1ms before the next day.
    pub fn day_window(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        let end = self.instant + Duration::days(1) - Duration::milliseconds(1);
        (self.instant, end)
    }

    /// The instant rendered in [`SQL_DATE_FORMAT`].
    pub fn to_sql_date(&self) -> String {
        format_sql_date(self.instant)
    }
}

impl std::fmt::Display for IsoDateTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

/// Format a UTC instant the way date literals are written into SQL.
pub fn format_sql_date(instant: DateTime<Utc>) -> String {
    instant.format(SQL_DATE_FORMAT).to_string()
}

/// One element of a list value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Int(n) => write!(f, "{}", n),
            Scalar::Float(n) => write!(f, "{}", n),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

impl Scalar {
    fn from_json(json: &serde_json::Value) -> Option<Self> {
        match json {
            serde_json::Value::Bool(b) => Some(Scalar::Bool(*b)),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Some(Scalar::Int(i)),
                None => n.as_f64().map(Scalar::Float),
            },
            serde_json::Value::String(s) => Some(Scalar::Text(s.clone())),
            _ => None,
        }
    }
}

/// The value side of a criterion.
///
/// Closed on purpose: every variant has a rendering rule.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    /// Finite float. Use `Value::from(f64)` to turn NaN and infinities into text.
    Float(f64),
    /// Plain text, quoted when rendered
    Text(String),
    /// Ordered list, rendered as a parenthesized set
    List(Vec<Scalar>),
    /// ISO-8601 date-time, rendered as a formatted date literal
    DateTime(IsoDateTime),
}

impl Value {
    /// Classify a string: ISO-8601 date-times become [`Value::DateTime`],
    /// everything else [`Value::Text`].
    pub fn classify(text: impl Into<String>) -> Value {
        let text = text.into();
        match IsoDateTime::parse(&text) {
            Some(dt) => Value::DateTime(dt),
            None => Value::Text(text),
        }
    }

    /// Plain text, without date recognition.
    pub fn literal(text: impl Into<String>) -> Value {
        Value::Text(text.into())
    }

    /// Join list elements with `sep`. Non-list values render as themselves.
    pub fn join(&self, sep: &str) -> String {
        match self {
            Value::List(items) => items
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
                .join(sep),
            other => other.to_string(),
        }
    }

    /// Convert a JSON value, `None` for shapes with no SQL literal form
    /// (null, objects, nested arrays).
    pub fn from_json(json: &serde_json::Value) -> Option<Value> {
        match json {
            serde_json::Value::Bool(b) => Some(Value::Bool(*b)),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Some(Value::Int(i)),
                None => n.as_f64().map(Value::Float),
            },
            serde_json::Value::String(s) => Some(Value::classify(s.as_str())),
            serde_json::Value::Array(items) => items
                .iter()
                .map(Scalar::from_json)
                .collect::<Option<Vec<_>>>()
                .map(Value::List),
            serde_json::Value::Null | serde_json::Value::Object(_) => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::Text(s) => f.write_str(s),
            Value::List(_) => f.write_str(&self.join(",")),
            Value::DateTime(dt) => write!(f, "{}", dt),
        }
    }
}

impl TryFrom<serde_json::Value> for Value {
    type Error = CritError;

    fn try_from(json: serde_json::Value) -> Result<Self, Self::Error> {
        Value::from_json(&json).ok_or_else(|| CritError::InvalidValue(json.to_string()))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n as i64)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Int(n as i64)
    }
}

impl From<f64> for Value {
    /// NaN and infinities have no SQL literal, they become text.
    fn from(n: f64) -> Self {
        if n.is_finite() {
            Value::Float(n)
        } else {
            Value::Text(n.to_string())
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::classify(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::classify(s)
    }
}

impl From<IsoDateTime> for Value {
    fn from(dt: IsoDateTime) -> Self {
        Value::DateTime(dt)
    }
}

impl<T: Into<Scalar>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

impl From<i32> for Scalar {
    fn from(n: i32) -> Self {
        Scalar::Int(n as i64)
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Scalar::Int(n)
    }
}

impl From<f64> for Scalar {
    fn from(n: f64) -> Self {
        if n.is_finite() {
            Scalar::Float(n)
        } else {
            Scalar::Text(n.to_string())
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Text(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_iso_precisions() {
        assert!(IsoDateTime::parse("2021-06-15T10:00:00.123Z").is_some());
        assert!(IsoDateTime::parse("2021-06-15T10:00:00Z").is_some());
        assert!(IsoDateTime::parse("2021-06-15T10:00Z").is_some());
        assert!(IsoDateTime::parse("2021-06-15T10:00+02:00").is_some());
        assert!(IsoDateTime::parse("2021-06-15").is_none());
        assert!(IsoDateTime::parse("2021-06-15T10:00:00").is_none());
        assert!(IsoDateTime::parse("due 2021-06-15T10:00:00Z").is_none());
    }

    #[test]
    fn test_offset_normalized_to_utc() {
        let dt = IsoDateTime::parse("2021-06-15T12:30:00+02:00").unwrap();
        assert_eq!(dt.instant(), Utc.with_ymd_and_hms(2021, 6, 15, 10, 30, 0).unwrap());
        assert_eq!(dt.to_sql_date(), "2021-06-15 10:30AM");
        assert_eq!(dt.as_str(), "2021-06-15T12:30:00+02:00");
    }

    #[test]
    fn test_shape_without_instant_is_text() {
        assert_eq!(
            Value::from("2021-19-15T10:00:00Z"),
            Value::Text("2021-19-15T10:00:00Z".to_string())
        );
    }

    #[test]
    fn test_day_window() {
        let dt = IsoDateTime::parse("2021-06-15T10:00:00Z").unwrap();
        let (start, end) = dt.day_window();
        assert_eq!(format_sql_date(start), "2021-06-15 10:00AM");
        assert_eq!(format_sql_date(end), "2021-06-16 9:59AM");
    }

    #[test]
    fn test_twelve_hour_clock() {
        let midnight = IsoDateTime::parse("2021-06-15T00:05:00Z").unwrap();
        assert_eq!(midnight.to_sql_date(), "2021-06-15 12:05AM");
        let evening = IsoDateTime::parse("2021-06-15T21:45Z").unwrap();
        assert_eq!(evening.to_sql_date(), "2021-06-15 9:45PM");
    }

    #[test]
    fn test_classify() {
        assert!(matches!(Value::from("2021-06-15T10:00:00Z"), Value::DateTime(_)));
        assert_eq!(Value::from("active"), Value::Text("active".to_string()));
        assert_eq!(
            Value::literal("2021-06-15T10:00:00Z"),
            Value::Text("2021-06-15T10:00:00Z".to_string())
        );
    }

    #[test]
    fn test_list_join() {
        let v = Value::from(vec![1, 2, 3]);
        assert_eq!(v.join(", "), "1, 2, 3");
        assert_eq!(v.to_string(), "1,2,3");
    }

    #[test]
    fn test_non_finite_floats_become_text() {
        assert_eq!(Value::from(f64::NAN), Value::Text("NaN".to_string()));
        assert_eq!(Value::from(f64::INFINITY), Value::Text("inf".to_string()));
        assert_eq!(Scalar::from(f64::NEG_INFINITY), Scalar::Text("-inf".to_string()));
        assert_eq!(Value::from(1.5), Value::Float(1.5));
    }

    #[test]
    fn test_from_json() {
        use serde_json::json;
        assert_eq!(Value::from_json(&json!(true)), Some(Value::Bool(true)));
        assert_eq!(Value::from_json(&json!(21)), Some(Value::Int(21)));
        assert_eq!(Value::from_json(&json!(2.5)), Some(Value::Float(2.5)));
        assert_eq!(
            Value::from_json(&json!(["a", 1])),
            Some(Value::List(vec![Scalar::Text("a".into()), Scalar::Int(1)]))
        );
        assert_eq!(Value::from_json(&json!(null)), None);
        assert_eq!(Value::from_json(&json!({"a": 1})), None);
        assert_eq!(Value::from_json(&json!([[1]])), None);
        assert!(Value::try_from(json!(null)).is_err());
    }
}

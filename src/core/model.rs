// CobbleLog - core/model.rs
//
// Core data model types. Pure data definitions with no I/O, no UI,
// no platform dependencies.
//
// Records arrive from the store as loosely typed JSON objects. Only a handful
// of fields are ever interpreted; everything else is carried through verbatim
// so search can see it.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Field names the store uses for the record identifier, in lookup order.
const ID_FIELDS: &[&str] = &["_id", "id"];

// =============================================================================
// LogRecord
// =============================================================================

/// One cobble report as returned by the log store.
///
/// Known fields: `_id`, `time`, `createdAt`, `author.username`, `duration`,
/// `region`, `sensorID`, `profile`, `stoppage`, `measure`, `comment`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogRecord {
    fields: Map<String, Value>,
}

impl LogRecord {
    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Wrap a JSON value. Returns `None` for anything that is not an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self { fields }),
            _ => None,
        }
    }

    /// Record identifier as text, if the record carries a usable one.
    pub fn id(&self) -> Option<String> {
        ID_FIELDS
            .iter()
            .find_map(|name| self.fields.get(*name))
            .and_then(|value| match value {
                Value::String(s) if !s.is_empty() => Some(s.clone()),
                Value::Number(n) => Some(number_text(n)),
                _ => None,
            })
    }

    /// Raw value of a top-level field.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// All top-level fields.
    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    /// All top-level field values.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.fields.values()
    }

    /// `author.username` as text. Numbers and booleans use their text form;
    /// an absent author, an absent or null username, or a nested value
    /// yields `None`.
    pub fn author_username(&self) -> Option<String> {
        match self.fields.get("author")?.get("username")? {
            Value::String(s) => Some(s.clone()),
            scalar @ (Value::Number(_) | Value::Bool(_)) => Some(value_text(scalar)),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }
}

// =============================================================================
// Value text forms
// =============================================================================

/// Default text form of a JSON value.
///
/// Strings are verbatim, numbers use their shortest form, arrays join their
/// elements with `,` (nulls render empty), objects are opaque.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_text(n),
        Value::String(s) => s.clone(),
        Value::Array(items) => join_values(items, ","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Text form used for a table/CSV cell: absent and null render empty.
pub fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(v) => value_text(v),
    }
}

/// Join array elements with `separator`, rendering nulls as empty strings.
pub fn join_values(items: &[Value], separator: &str) -> String {
    items
        .iter()
        .map(|item| cell_text(Some(item)))
        .collect::<Vec<_>>()
        .join(separator)
}

/// False for values that can never take part in a search match:
/// `null`, `false`, `0`, NaN and the empty string.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Shortest text form of a number: `5`, `-3`, `1.5`.
fn number_text(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        i.to_string()
    } else if let Some(u) = n.as_u64() {
        u.to_string()
    } else {
        // f64's Display drops a zero fraction ("5" not "5.0").
        n.as_f64().map(|f| f.to_string()).unwrap_or_default()
    }
}

// =============================================================================
// Timestamps
// =============================================================================

/// Offset-less date-time forms, read as wall-clock time in the rendering zone.
const LOCAL_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse a stored timestamp into `tz`.
///
/// Accepts:
/// - RFC 3339 strings (what the store emits),
/// - offset-less date-times with or without seconds (`datetime-local` form),
///   taken as wall-clock time in `tz`,
/// - date-only strings, taken as midnight UTC,
/// - integer milliseconds since the Unix epoch.
pub fn parse_timestamp<Tz: TimeZone>(value: &Value, tz: &Tz) -> Option<DateTime<Tz>> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.with_timezone(tz));
            }
            if let Some(naive) = LOCAL_DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
            {
                return local_in(tz, naive);
            }
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|midnight| midnight.and_utc().with_timezone(tz))
        }
        Value::Number(n) => n
            .as_i64()
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single())
            .map(|dt| dt.with_timezone(tz)),
        _ => None,
    }
}

/// Resolve a wall-clock time in `tz`. Ambiguous times take the earlier
/// instant; times skipped by a DST jump move forward an hour.
fn local_in<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> Option<DateTime<Tz>> {
    tz.from_local_datetime(&naive).earliest().or_else(|| {
        tz.from_local_datetime(&(naive + TimeDelta::hours(1)))
            .earliest()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use serde_json::json;

    fn record(value: Value) -> LogRecord {
        LogRecord::from_value(value).unwrap()
    }

    #[test]
    fn test_id_prefers_underscore_field() {
        let r = record(json!({"_id": "65a1", "id": "other"}));
        assert_eq!(r.id().as_deref(), Some("65a1"));

        let r = record(json!({"id": 42}));
        assert_eq!(r.id().as_deref(), Some("42"));

        let r = record(json!({"_id": ""}));
        assert_eq!(r.id(), None);
    }

    #[test]
    fn test_from_value_rejects_non_objects() {
        assert!(LogRecord::from_value(json!([1, 2])).is_none());
        assert!(LogRecord::from_value(Value::Null).is_none());
    }

    #[test]
    fn test_author_username() {
        let r = record(json!({"author": {"username": "bob"}}));
        assert_eq!(r.author_username().as_deref(), Some("bob"));

        let r = record(json!({"author": {"username": 1042}}));
        assert_eq!(r.author_username().as_deref(), Some("1042"));

        let r = record(json!({"author": {"username": true}}));
        assert_eq!(r.author_username().as_deref(), Some("true"));
    }

    #[test]
    fn test_author_username_missing() {
        assert_eq!(record(json!({})).author_username(), None);
        assert_eq!(record(json!({"author": {}})).author_username(), None);
        assert_eq!(
            record(json!({"author": {"username": null}})).author_username(),
            None
        );
        assert_eq!(
            record(json!({"author": {"username": {"first": "b"}}})).author_username(),
            None
        );
    }

    #[test]
    fn test_value_text_forms() {
        assert_eq!(value_text(&json!("Acme")), "Acme");
        assert_eq!(value_text(&json!(5)), "5");
        assert_eq!(value_text(&json!(5.0)), "5");
        assert_eq!(value_text(&json!(1.5)), "1.5");
        assert_eq!(value_text(&json!(true)), "true");
        assert_eq!(value_text(&json!([1, null, "x"])), "1,,x");
        assert_eq!(value_text(&json!({"a": 1})), "[object Object]");
    }

    #[test]
    fn test_cell_text_blank_for_missing_and_null() {
        assert_eq!(cell_text(None), "");
        assert_eq!(cell_text(Some(&Value::Null)), "");
        assert_eq!(cell_text(Some(&json!(0))), "0");
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&Value::Null));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!("0")));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!(-1)));
    }

    #[test]
    fn test_parse_timestamp_variants() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 14, 9, 5, 0).unwrap();
        let parse = |v: Value| parse_timestamp(&v, &Utc);
        assert_eq!(parse(json!("2024-03-14T09:05:00.000Z")), Some(expected));
        assert_eq!(parse(json!("2024-03-14T10:05:00+01:00")), Some(expected));
        assert_eq!(parse(json!("2024-03-14T09:05:00")), Some(expected));
        assert_eq!(parse(json!("2024-03-14 09:05:00")), Some(expected));
        assert_eq!(parse(json!(expected.timestamp_millis())), Some(expected));
        assert_eq!(parse(json!("yesterday")), None);
        assert_eq!(parse(Value::Null), None);
    }

    #[test]
    fn test_parse_timestamp_minute_precision() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 14, 9, 5, 0).unwrap();
        assert_eq!(
            parse_timestamp(&json!("2024-03-14T09:05"), &Utc),
            Some(expected)
        );
        assert_eq!(
            parse_timestamp(&json!("2024-03-14 09:05"), &Utc),
            Some(expected)
        );
    }

    #[test]
    fn test_parse_timestamp_date_only_is_utc_midnight() {
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        let parsed = parse_timestamp(&json!("2024-03-14"), &plus_two).unwrap();
        assert_eq!(
            parsed,
            Utc.with_ymd_and_hms(2024, 3, 14, 0, 0, 0).unwrap()
        );
        assert_eq!(parsed.format("%H:%M").to_string(), "02:00");
    }

    #[test]
    fn test_offset_less_times_use_rendering_zone() {
        let plus_one = FixedOffset::east_opt(3600).unwrap();

        let wall_clock = parse_timestamp(&json!("2024-03-14T09:05:00"), &plus_one).unwrap();
        assert_eq!(wall_clock.format("%H:%M").to_string(), "09:05");
        assert_eq!(
            wall_clock,
            Utc.with_ymd_and_hms(2024, 3, 14, 8, 5, 0).unwrap()
        );

        let zulu = parse_timestamp(&json!("2024-03-14T09:05:00Z"), &plus_one).unwrap();
        assert_eq!(zulu.format("%H:%M").to_string(), "10:05");
    }
}

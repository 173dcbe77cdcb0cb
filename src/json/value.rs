//! The closed set of shapes a [`Json`](super::Json) can hold.
//!
//! [`JsonValue`] is a plain sum type: every typed projection on `Json` is a
//! pattern match over it. Untyped input (a decoded `serde_json::Value`) is
//! sorted into a variant by [`JsonValue::classify`], which tests the narrower
//! shapes before falling back to the generic ones.
//!
//! # Classification order
//!
//! | Input | Variant |
//! |-------|---------|
//! | object | `Object` (members classified recursively) |
//! | integer in `i32` range | `Int32` |
//! | integer in `i64` range | `Int64` |
//! | string | `String` |
//! | any other number | `Float64` |
//! | bool | `Bool` |
//! | array of objects (or empty) | `ObjectArray` |
//! | array of `i32` | `Int32Array` |
//! | array of `i64` | `Int64Array` |
//! | array of strings | `StringArray` |
//! | array of numbers | `Float64Array` |
//! | array of string arrays | `StringMatrix` |
//! | any other array | `Array` |
//! | `null` | no match |

use super::date::format_iso;
use chrono::{DateTime, Utc};
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;

/// String-keyed object map. Key order carries no meaning.
pub type JsonDict = BTreeMap<String, JsonValue>;

/// The underlying content of a [`Json`](super::Json).
///
/// Equality compares content rather than storage width: `Int32(5)` equals
/// `Int64(5)`, integer arrays compare element-wise across widths, and empty
/// arrays are equal whatever their variant. This keeps values equal across a
/// trip through JSON text, which cannot preserve those distinctions.
#[derive(Debug, Clone)]
pub enum JsonValue {
    /// No value: a missing key, a JSON `null` member, or a failed lookup
    Null,
    /// String-keyed object
    Object(JsonDict),
    /// Text
    String(String),
    /// Integer that fits in 32 bits
    Int32(i32),
    /// Integer that needs 64 bits
    Int64(i64),
    /// Floating point number
    Float64(f64),
    /// Boolean
    Bool(bool),
    /// Point in time, serialized as ISO-8601 text
    Date(DateTime<Utc>),
    /// Homogeneous array of strings
    StringArray(Vec<String>),
    /// Homogeneous array of 32-bit integers
    Int32Array(Vec<i32>),
    /// Homogeneous array of 64-bit integers
    Int64Array(Vec<i64>),
    /// Homogeneous array of floating point numbers
    Float64Array(Vec<f64>),
    /// Homogeneous array of objects
    ObjectArray(Vec<JsonDict>),
    /// Array of string arrays
    StringMatrix(Vec<Vec<String>>),
    /// Heterogeneous array
    Array(Vec<JsonValue>),
}

impl JsonValue {
    /// Sort an untyped value into a variant.
    ///
    /// Returns `None` for a top-level `null`. Nested `null`s inside objects
    /// and heterogeneous arrays are kept as [`JsonValue::Null`].
    pub fn classify(source: &Value) -> Option<JsonValue> {
        match source {
            Value::Null => None,
            Value::Object(members) => Some(JsonValue::Object(classify_members(members))),
            Value::Number(number) => classify_number(number),
            Value::String(text) => Some(JsonValue::String(text.clone())),
            Value::Bool(flag) => Some(JsonValue::Bool(*flag)),
            Value::Array(items) => Some(classify_array(items)),
        }
    }

    /// Whether this is the [`JsonValue::Null`] sentinel.
    pub fn is_null(&self) -> bool {
        matches!(self, JsonValue::Null)
    }

    /// Convert back to an untyped value, rendering dates as ISO-8601 text.
    ///
    /// Returns `None` if the value holds a non-finite float, which has no
    /// JSON representation.
    pub fn to_serde_value(&self) -> Option<Value> {
        let value = match self {
            JsonValue::Null => Value::Null,
            JsonValue::Object(members) => Value::Object(dict_to_serde(members)?),
            JsonValue::String(text) => Value::String(text.clone()),
            JsonValue::Int32(n) => Value::from(*n),
            JsonValue::Int64(n) => Value::from(*n),
            JsonValue::Float64(n) => float_to_serde(*n)?,
            JsonValue::Bool(flag) => Value::Bool(*flag),
            JsonValue::Date(instant) => Value::String(format_iso(instant)),
            JsonValue::StringArray(items) => Value::from(items.clone()),
            JsonValue::Int32Array(items) => Value::from(items.clone()),
            JsonValue::Int64Array(items) => Value::from(items.clone()),
            JsonValue::Float64Array(items) => Value::Array(
                items
                    .iter()
                    .map(|n| float_to_serde(*n))
                    .collect::<Option<_>>()?,
            ),
            JsonValue::ObjectArray(items) => Value::Array(
                items
                    .iter()
                    .map(|members| dict_to_serde(members).map(Value::Object))
                    .collect::<Option<_>>()?,
            ),
            JsonValue::StringMatrix(rows) => Value::from(rows.clone()),
            JsonValue::Array(items) => Value::Array(
                items
                    .iter()
                    .map(JsonValue::to_serde_value)
                    .collect::<Option<_>>()?,
            ),
        };
        Some(value)
    }

    /// Whether this is an array variant with no elements.
    pub fn is_empty_array(&self) -> bool {
        match self {
            JsonValue::StringArray(items) => items.is_empty(),
            JsonValue::Int32Array(items) => items.is_empty(),
            JsonValue::Int64Array(items) => items.is_empty(),
            JsonValue::Float64Array(items) => items.is_empty(),
            JsonValue::ObjectArray(items) => items.is_empty(),
            JsonValue::StringMatrix(rows) => rows.is_empty(),
            JsonValue::Array(items) => items.is_empty(),
            _ => false,
        }
    }

    fn integer(&self) -> Option<i64> {
        match self {
            JsonValue::Int32(n) => Some(i64::from(*n)),
            JsonValue::Int64(n) => Some(*n),
            _ => None,
        }
    }

    fn integer_array(&self) -> Option<Vec<i64>> {
        match self {
            JsonValue::Int32Array(items) => Some(items.iter().copied().map(i64::from).collect()),
            JsonValue::Int64Array(items) => Some(items.clone()),
            _ => None,
        }
    }

    /// Elements of any array variant as generic values.
    pub(crate) fn array_elements(&self) -> Option<Vec<JsonValue>> {
        let elements = match self {
            JsonValue::StringArray(items) => items.iter().cloned().map(JsonValue::String).collect(),
            JsonValue::Int32Array(items) => items.iter().copied().map(JsonValue::Int32).collect(),
            JsonValue::Int64Array(items) => items.iter().copied().map(JsonValue::Int64).collect(),
            JsonValue::Float64Array(items) => {
                items.iter().copied().map(JsonValue::Float64).collect()
            }
            JsonValue::ObjectArray(items) => items.iter().cloned().map(JsonValue::Object).collect(),
            JsonValue::StringMatrix(rows) => rows.iter().cloned().map(JsonValue::StringArray).collect(),
            JsonValue::Array(items) => items.clone(),
            _ => return None,
        };
        Some(elements)
    }
}

impl PartialEq for JsonValue {
    fn eq(&self, other: &Self) -> bool {
        if self.is_empty_array() && other.is_empty_array() {
            return true;
        }
        match (self, other) {
            (JsonValue::Null, JsonValue::Null) => true,
            (JsonValue::Object(a), JsonValue::Object(b)) => a == b,
            (JsonValue::String(a), JsonValue::String(b)) => a == b,
            (JsonValue::Float64(a), JsonValue::Float64(b)) => a == b,
            (JsonValue::Bool(a), JsonValue::Bool(b)) => a == b,
            (JsonValue::Date(a), JsonValue::Date(b)) => a == b,
            (JsonValue::StringArray(a), JsonValue::StringArray(b)) => a == b,
            (JsonValue::Float64Array(a), JsonValue::Float64Array(b)) => a == b,
            (JsonValue::ObjectArray(a), JsonValue::ObjectArray(b)) => a == b,
            (JsonValue::StringMatrix(a), JsonValue::StringMatrix(b)) => a == b,
            (JsonValue::Array(a), JsonValue::Array(b)) => a == b,
            _ => match (self.integer(), other.integer()) {
                (Some(a), Some(b)) => a == b,
                _ => match (self.integer_array(), other.integer_array()) {
                    (Some(a), Some(b)) => a == b,
                    _ => false,
                },
            },
        }
    }
}

fn classify_members(members: &Map<String, Value>) -> JsonDict {
    members
        .iter()
        .map(|(key, value)| (key.clone(), classify_member(value)))
        .collect()
}

fn classify_member(value: &Value) -> JsonValue {
    JsonValue::classify(value).unwrap_or(JsonValue::Null)
}

fn classify_number(number: &Number) -> Option<JsonValue> {
    if let Some(n) = number.as_i64() {
        return Some(match i32::try_from(n) {
            Ok(small) => JsonValue::Int32(small),
            Err(_) => JsonValue::Int64(n),
        });
    }
    number.as_f64().map(JsonValue::Float64)
}

fn as_i32(value: &Value) -> Option<i32> {
    value.as_i64().and_then(|n| i32::try_from(n).ok())
}

fn as_string(value: &Value) -> Option<String> {
    value.as_str().map(str::to_owned)
}

fn collect_all<T>(items: &[Value], project: impl Fn(&Value) -> Option<T>) -> Option<Vec<T>> {
    items.iter().map(project).collect()
}

fn classify_array(items: &[Value]) -> JsonValue {
    if let Some(objects) = collect_all(items, |v| v.as_object().map(classify_members)) {
        return JsonValue::ObjectArray(objects);
    }
    if let Some(ints) = collect_all(items, as_i32) {
        return JsonValue::Int32Array(ints);
    }
    if let Some(longs) = collect_all(items, Value::as_i64) {
        return JsonValue::Int64Array(longs);
    }
    if let Some(strings) = collect_all(items, as_string) {
        return JsonValue::StringArray(strings);
    }
    if let Some(doubles) = collect_all(items, Value::as_f64) {
        return JsonValue::Float64Array(doubles);
    }
    if let Some(rows) = collect_all(items, |v| {
        v.as_array().and_then(|row| collect_all(row, as_string))
    }) {
        return JsonValue::StringMatrix(rows);
    }
    JsonValue::Array(items.iter().map(classify_member).collect())
}

fn dict_to_serde(members: &JsonDict) -> Option<Map<String, Value>> {
    members
        .iter()
        .map(|(key, value)| value.to_serde_value().map(|v| (key.clone(), v)))
        .collect()
}

fn float_to_serde(n: f64) -> Option<Value> {
    Number::from_f64(n).map(Value::Number)
}

macro_rules! impl_from_for_json_value {
    ($($source:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$source> for JsonValue {
                fn from(value: $source) -> Self {
                    JsonValue::$variant(value)
                }
            }
        )*
    };
}

impl_from_for_json_value! {
    JsonDict => Object,
    String => String,
    i32 => Int32,
    i64 => Int64,
    f64 => Float64,
    bool => Bool,
    DateTime<Utc> => Date,
    Vec<String> => StringArray,
    Vec<i32> => Int32Array,
    Vec<i64> => Int64Array,
    Vec<f64> => Float64Array,
    Vec<JsonDict> => ObjectArray,
    Vec<Vec<String>> => StringMatrix,
    Vec<JsonValue> => Array,
}

impl From<&str> for JsonValue {
    fn from(value: &str) -> Self {
        JsonValue::String(value.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classify_scalars() {
        assert_eq!(JsonValue::classify(&json!(7)), Some(JsonValue::Int32(7)));
        assert_eq!(
            JsonValue::classify(&json!(5_000_000_000i64)),
            Some(JsonValue::Int64(5_000_000_000))
        );
        assert_eq!(JsonValue::classify(&json!(1.5)), Some(JsonValue::Float64(1.5)));
        assert_eq!(JsonValue::classify(&json!(u64::MAX)), Some(JsonValue::Float64(u64::MAX as f64)));
        assert_eq!(JsonValue::classify(&json!("hi")), Some(JsonValue::String("hi".into())));
        assert_eq!(JsonValue::classify(&json!(true)), Some(JsonValue::Bool(true)));
        assert_eq!(JsonValue::classify(&Value::Null), None);
    }

    #[test]
    fn test_classify_homogeneous_arrays() {
        assert_eq!(
            JsonValue::classify(&json!([1, 2])),
            Some(JsonValue::Int32Array(vec![1, 2]))
        );
        assert_eq!(
            JsonValue::classify(&json!([1, 5_000_000_000i64])),
            Some(JsonValue::Int64Array(vec![1, 5_000_000_000]))
        );
        assert_eq!(
            JsonValue::classify(&json!(["a", "b"])),
            Some(JsonValue::StringArray(vec!["a".into(), "b".into()]))
        );
        assert_eq!(
            JsonValue::classify(&json!([1, 2.5])),
            Some(JsonValue::Float64Array(vec![1.0, 2.5]))
        );
        assert_eq!(
            JsonValue::classify(&json!([["a"], ["b", "c"]])),
            Some(JsonValue::StringMatrix(vec![
                vec!["a".into()],
                vec!["b".into(), "c".into()]
            ]))
        );
    }

    #[test]
    fn test_empty_array_is_object_array() {
        assert_eq!(JsonValue::classify(&json!([])), Some(JsonValue::ObjectArray(vec![])));
    }

    #[test]
    fn test_equality_ignores_integer_width() {
        assert_eq!(JsonValue::Int32(5), JsonValue::Int64(5));
        assert_ne!(JsonValue::Int32(5), JsonValue::Int64(6));
        assert_ne!(JsonValue::Int32(5), JsonValue::Float64(5.0));
        assert_eq!(JsonValue::Int64Array(vec![1, 2]), JsonValue::Int32Array(vec![1, 2]));
        assert_ne!(JsonValue::Int64Array(vec![1, 2]), JsonValue::Int32Array(vec![1]));
    }

    #[test]
    fn test_empty_arrays_are_equal_across_variants() {
        assert_eq!(JsonValue::StringArray(vec![]), JsonValue::ObjectArray(vec![]));
        assert_eq!(JsonValue::Array(vec![]), JsonValue::Float64Array(vec![]));
        assert_ne!(JsonValue::StringArray(vec![]), JsonValue::StringArray(vec!["a".into()]));
        assert_ne!(JsonValue::Array(vec![]), JsonValue::Object(JsonDict::new()));
    }

    #[test]
    fn test_classify_heterogeneous_array_keeps_nulls() {
        assert_eq!(
            JsonValue::classify(&json!([1, "a", null])),
            Some(JsonValue::Array(vec![
                JsonValue::Int32(1),
                JsonValue::String("a".into()),
                JsonValue::Null,
            ]))
        );
    }

    #[test]
    fn test_classify_object_members() {
        let value = JsonValue::classify(&json!({"a": 1, "b": null, "c": [{"d": true}]})).unwrap();
        let JsonValue::Object(members) = value else {
            panic!("expected object");
        };
        assert_eq!(members["a"], JsonValue::Int32(1));
        assert_eq!(members["b"], JsonValue::Null);
        assert!(matches!(members["c"], JsonValue::ObjectArray(ref items) if items.len() == 1));
    }

    #[test]
    fn test_to_serde_value_renders_dates() {
        use chrono::TimeZone;
        let instant = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let mut members = JsonDict::new();
        members.insert("at".into(), JsonValue::Date(instant));
        members.insert("list".into(), JsonValue::Array(vec![JsonValue::Date(instant)]));

        let rendered = JsonValue::Object(members).to_serde_value().unwrap();
        assert_eq!(
            rendered,
            json!({"at": "2024-01-02T03:04:05.000000Z", "list": ["2024-01-02T03:04:05.000000Z"]})
        );
    }

    #[test]
    fn test_to_serde_value_rejects_non_finite() {
        assert_eq!(JsonValue::Float64(f64::NAN).to_serde_value(), None);
        assert_eq!(
            JsonValue::Array(vec![JsonValue::Float64(f64::INFINITY)]).to_serde_value(),
            None
        );
    }
}

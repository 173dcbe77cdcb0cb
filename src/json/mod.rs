//! Dynamically-typed JSON values with fail-soft accessors.
//!
//! A [`Json`] wraps one [`JsonValue`] plus an optional integer tag. The tag is
//! out-of-band metadata: the REST client uses it to carry the HTTP status code
//! of the response the value was parsed from. It never takes part in equality
//! or serialization.
//!
//! Every accessor is total. Asking for the wrong shape, or reading a key that
//! is not there, yields `None` (or a [`Json`] holding [`JsonValue::Null`] for
//! path reads) instead of an error.
//!
//! # Module Organization
//!
//! ```text
//! json/
//! ├── mod    - Json wrapper, projections, path access, serialization
//! ├── value  - JsonValue variants and classification of untyped input
//! └── date   - ISO-8601 codec with microsecond precision
//! ```
//!
//! # Examples
//!
//! ```
//! use rest_json::Json;
//!
//! let mut body = Json::from_string(r#"{"id": 42, "name": "widget"}"#).unwrap();
//! assert_eq!(body.get("id").int(), Some(42));
//! assert_eq!(body.get("name").string(), Some("widget"));
//! assert_eq!(body.get("missing").string(), None);
//!
//! body.set("price", 9.5);
//! assert_eq!(body.get("price").double(), Some(9.5));
//! ```

pub mod date;
mod value;

pub use value::{JsonDict, JsonValue};

use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

const EMPTY_OBJECT_TEXT: &str = "{}";

/// A loosely-typed JSON value with an optional tag.
#[derive(Debug, Clone)]
pub struct Json {
    value: JsonValue,
    tag: Option<i32>,
}

impl Json {
    /// Wrap an already-typed value.
    pub fn new(value: JsonValue) -> Self {
        Json { value, tag: None }
    }

    /// The empty object `{}`.
    pub fn empty() -> Self {
        Json::new(JsonValue::Object(JsonDict::new()))
    }

    /// The "no value" sentinel returned by failed path reads.
    pub fn null() -> Self {
        Json::new(JsonValue::Null)
    }

    /// Classify an untyped value. `None` if it matches no variant.
    pub fn parse(source: &serde_json::Value) -> Option<Self> {
        JsonValue::classify(source).map(Json::new)
    }

    /// Decode raw bytes.
    ///
    /// Structural JSON (bare scalars included) is classified as usual. Bytes
    /// that are not JSON but are valid UTF-8 become a string value. Anything
    /// else yields `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rest_json::Json;
    ///
    /// assert_eq!(Json::from_bytes(b"12").unwrap().int(), Some(12));
    /// assert_eq!(Json::from_bytes(b"not json").unwrap().string(), Some("not json"));
    /// assert!(Json::from_bytes(&[0xff, 0xfe]).is_none());
    /// ```
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        match serde_json::from_slice::<serde_json::Value>(bytes) {
            Ok(decoded) => Json::parse(&decoded),
            Err(_) => std::str::from_utf8(bytes)
                .ok()
                .map(|text| Json::new(JsonValue::String(text.to_owned()))),
        }
    }

    /// Decode a string. Same rules as [`Json::from_bytes`].
    pub fn from_string(text: &str) -> Option<Self> {
        Json::from_bytes(text.as_bytes())
    }

    /// The underlying value.
    pub fn value(&self) -> &JsonValue {
        &self.value
    }

    /// Consume the wrapper, returning the underlying value.
    pub fn into_value(self) -> JsonValue {
        self.value
    }

    /// The tag, if one was attached.
    pub fn tag(&self) -> Option<i32> {
        self.tag
    }

    /// A copy of this value carrying `tag`.
    pub fn tagged(&self, tag: i32) -> Self {
        Json {
            value: self.value.clone(),
            tag: Some(tag),
        }
    }

    /// True only for an object with no entries.
    pub fn is_empty(&self) -> bool {
        matches!(&self.value, JsonValue::Object(members) if members.is_empty())
    }

    /// Whether this is the "no value" sentinel.
    pub fn is_null(&self) -> bool {
        self.value.is_null()
    }

    // ========== Typed projections ==========

    /// The object map.
    pub fn object(&self) -> Option<&JsonDict> {
        match &self.value {
            JsonValue::Object(members) => Some(members),
            _ => None,
        }
    }

    /// The string.
    pub fn string(&self) -> Option<&str> {
        match &self.value {
            JsonValue::String(text) => Some(text),
            _ => None,
        }
    }

    /// The floating point number.
    pub fn double(&self) -> Option<f64> {
        match self.value {
            JsonValue::Float64(n) => Some(n),
            _ => None,
        }
    }

    /// The floating point number narrowed to single precision.
    pub fn float(&self) -> Option<f32> {
        self.double().map(|n| n as f32)
    }

    /// The integer as 64 bits. 32-bit integers widen losslessly.
    pub fn int64(&self) -> Option<i64> {
        match self.value {
            JsonValue::Int64(n) => Some(n),
            JsonValue::Int32(n) => Some(i64::from(n)),
            _ => None,
        }
    }

    /// The 32-bit integer.
    ///
    /// Integers outside the `i32` range are stored as `Int64` and are absent
    /// here. Use [`Json::int64`] for identifiers that may exceed it.
    pub fn int(&self) -> Option<i32> {
        match self.value {
            JsonValue::Int32(n) => Some(n),
            _ => None,
        }
    }

    /// The boolean.
    pub fn bool(&self) -> Option<bool> {
        match self.value {
            JsonValue::Bool(flag) => Some(flag),
            _ => None,
        }
    }

    /// The stored date, or the string parsed as an ISO-8601 timestamp.
    pub fn date(&self) -> Option<DateTime<Utc>> {
        match &self.value {
            JsonValue::Date(instant) => Some(*instant),
            JsonValue::String(text) => date::parse_iso(text),
            _ => None,
        }
    }

    /// The string array. Any empty array matches.
    pub fn string_array(&self) -> Option<&[String]> {
        match &self.value {
            JsonValue::StringArray(items) => Some(items),
            other if other.is_empty_array() => Some(&[]),
            _ => None,
        }
    }

    /// The floating point array. Any empty array matches.
    pub fn double_array(&self) -> Option<&[f64]> {
        match &self.value {
            JsonValue::Float64Array(items) => Some(items),
            other if other.is_empty_array() => Some(&[]),
            _ => None,
        }
    }

    /// Any array, each element wrapped as its own [`Json`].
    ///
    /// Elements with no value are replaced by [`Json::empty`].
    pub fn json_array(&self) -> Option<Vec<Json>> {
        self.any_array().map(|items| {
            items
                .into_iter()
                .map(|item| match item {
                    JsonValue::Null => Json::empty(),
                    other => Json::new(other),
                })
                .collect()
        })
    }

    /// Any array, as generic elements.
    pub fn any_array(&self) -> Option<Vec<JsonValue>> {
        self.value.array_elements()
    }

    /// The array of object maps. Any empty array matches.
    pub fn dict_array(&self) -> Option<&[JsonDict]> {
        match &self.value {
            JsonValue::ObjectArray(items) => Some(items),
            other if other.is_empty_array() => Some(&[]),
            _ => None,
        }
    }

    // ========== Path access ==========

    /// Read one key of the object.
    ///
    /// Returns the "no value" sentinel if this is not an object or the key is
    /// missing.
    pub fn get(&self, key: &str) -> Json {
        self.object()
            .and_then(|members| members.get(key))
            .cloned()
            .map_or_else(Json::null, Json::new)
    }

    /// Set one key, promoting this value to an object if it is not one.
    ///
    /// Non-object content is discarded. The tag is kept.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Json>) {
        let mut members = self.object().cloned().unwrap_or_default();
        members.insert(key.into(), value.into().value);
        self.value = JsonValue::Object(members);
    }

    // ========== Serialization ==========

    /// Untyped form with dates rendered as text. `None` for non-finite floats.
    pub fn to_serde_value(&self) -> Option<serde_json::Value> {
        self.value.to_serde_value()
    }

    /// JSON bytes, or `{}` if the value cannot be encoded.
    pub fn to_json_bytes(&self) -> Vec<u8> {
        self.to_serde_value()
            .and_then(|rendered| serde_json::to_vec(&rendered).ok())
            .unwrap_or_else(|| EMPTY_OBJECT_TEXT.as_bytes().to_vec())
    }

    /// JSON text, or `{}` if the value cannot be encoded.
    pub fn to_json_text(&self) -> String {
        self.to_serde_value()
            .and_then(|rendered| serde_json::to_string(&rendered).ok())
            .unwrap_or_else(|| EMPTY_OBJECT_TEXT.to_owned())
    }
}

impl Default for Json {
    fn default() -> Self {
        Json::empty()
    }
}

impl PartialEq for Json {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl fmt::Display for Json {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_json_text())
    }
}

impl Serialize for Json {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.to_serde_value() {
            Some(rendered) => rendered.serialize(serializer),
            None => serde_json::Map::new().serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Json {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        Json::parse(&raw).ok_or_else(|| D::Error::custom("null is not a JSON value variant"))
    }
}

impl From<JsonValue> for Json {
    fn from(value: JsonValue) -> Self {
        Json::new(value)
    }
}

macro_rules! impl_from_for_json {
    ($($source:ty),* $(,)?) => {
        $(
            impl From<$source> for Json {
                fn from(value: $source) -> Self {
                    Json::new(JsonValue::from(value))
                }
            }
        )*
    };
}

impl_from_for_json! {
    JsonDict,
    String,
    &str,
    i32,
    i64,
    f64,
    bool,
    DateTime<Utc>,
    Vec<String>,
    Vec<i32>,
    Vec<i64>,
    Vec<f64>,
    Vec<JsonDict>,
    Vec<Vec<String>>,
    Vec<JsonValue>,
}

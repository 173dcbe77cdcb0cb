//! Query-string encoding for body-less requests.
//!
//! Keys and values are percent-encoded with [`QUERY_ENCODE_SET`]: only ASCII
//! alphanumerics and `-._~!'()*` pass through. The URL reserved characters
//! `;/?:@&=+$,` and space are always escaped, even where a generic
//! query-safe set would let some of them through.

use crate::json::date::format_iso;
use crate::json::{Json, JsonDict, JsonValue};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters escaped in query keys and values.
pub const QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'!')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'*');

/// Build `k1=v1&k2=v2` from a parameter map, without the leading `?`.
///
/// Keys appear in map order. An empty map gives an empty string.
///
/// # Examples
///
/// ```
/// use rest_json::client::encode_query;
/// use rest_json::{JsonDict, JsonValue};
///
/// let mut params = JsonDict::new();
/// params.insert("a".into(), JsonValue::from("b c"));
/// params.insert("q".into(), JsonValue::from("1;2"));
/// assert_eq!(encode_query(&params), "a=b%20c&q=1%3B2");
/// ```
pub fn encode_query(params: &JsonDict) -> String {
    params
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                utf8_percent_encode(key, QUERY_ENCODE_SET),
                utf8_percent_encode(&query_value_text(value), QUERY_ENCODE_SET)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Text form of a parameter value before escaping.
///
/// Strings are used raw, `Null` becomes the empty string, dates use the ISO
/// codec and containers are written as JSON text.
pub fn query_value_text(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => String::new(),
        JsonValue::String(text) => text.clone(),
        JsonValue::Int32(n) => n.to_string(),
        JsonValue::Int64(n) => n.to_string(),
        JsonValue::Float64(n) => n.to_string(),
        JsonValue::Bool(flag) => flag.to_string(),
        JsonValue::Date(instant) => format_iso(instant),
        container => Json::new(container.clone()).to_json_text(),
    }
}

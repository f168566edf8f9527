#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use indexmap::IndexMap;

/// Synthesized key holding the method of a request line.
pub const REQUEST_METHOD: &str = "Request Method";
/// Synthesized key holding the target of a request line.
pub const REQUEST_URL: &str = "Request Url";
/// Synthesized key holding the numeric code of a status line.
pub const RESPONSE_CODE: &str = "Response Code";
/// Synthesized key holding the reason phrase of a status line.
pub const RESPONSE_STATUS: &str = "Response Status";

/// Parsed header fields keyed by canonical name, in first occurrence order.
///
/// Request and status line metadata share this map under the
/// `REQUEST_*` / `RESPONSE_*` keys.
pub type Headers = IndexMap<String, HeaderValue>;

/// Parsed query parameters keyed by decoded name, in first occurrence order.
pub type QueryParams = IndexMap<String, ParamValue>;

/// Input for `Serializer::build_query_string`.
pub type QueryParameters = IndexMap<String, Value>;

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum HeaderValue {
    Text(String),
    List(Vec<String>),
    // only used for `Response Code`
    Code(u16),
}

impl HeaderValue {
    /// Appends another occurrence, turning a single value into a list.
    pub(crate) fn push(&mut self, value: String) {
        match self {
            HeaderValue::List(values) => values.push(value),
            HeaderValue::Text(first) => {
                let first = std::mem::take(first);
                *self = HeaderValue::List(vec![first, value]);
            }
            HeaderValue::Code(code) => {
                *self = HeaderValue::List(vec![code.to_string(), value]);
            }
        }
    }

    pub fn first(&self) -> Option<String> {
        match self {
            HeaderValue::Text(value) => Some(value.clone()),
            HeaderValue::List(values) => values.first().cloned(),
            HeaderValue::Code(code) => Some(code.to_string()),
        }
    }

    pub fn values(&self) -> Vec<String> {
        match self {
            HeaderValue::Text(value) => vec![value.clone()],
            HeaderValue::List(values) => values.clone(),
            HeaderValue::Code(code) => vec![code.to_string()],
        }
    }

    pub fn as_code(&self) -> Option<u16> {
        match self {
            HeaderValue::Code(code) => Some(*code),
            _ => None,
        }
    }
}

impl std::fmt::Display for HeaderValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HeaderValue::Text(value) => f.write_str(value),
            HeaderValue::List(values) => f.write_str(&values.join(", ")),
            HeaderValue::Code(code) => write!(f, "{}", code),
        }
    }
}

impl From<&str> for HeaderValue {
    fn from(value: &str) -> Self {
        HeaderValue::Text(value.to_string())
    }
}

impl From<String> for HeaderValue {
    fn from(value: String) -> Self {
        HeaderValue::Text(value)
    }
}

impl From<Vec<&str>> for HeaderValue {
    fn from(values: Vec<&str>) -> Self {
        HeaderValue::List(values.into_iter().map(str::to_string).collect())
    }
}

impl From<u16> for HeaderValue {
    fn from(code: u16) -> Self {
        HeaderValue::Code(code)
    }
}

/// A query parameter value as found in a url.
///
/// The parsers use this as the accumulator state of a name: a vacant map
/// entry is a name not seen yet, `Single` a name stored as one value and
/// `List` a name that collects every occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum ParamValue {
    Single(String),
    List(Vec<String>),
}

impl ParamValue {
    pub(crate) fn push(&mut self, value: String) {
        match self {
            ParamValue::List(values) => values.push(value),
            ParamValue::Single(first) => {
                let first = std::mem::take(first);
                *self = ParamValue::List(vec![first, value]);
            }
        }
    }

    pub fn first(&self) -> Option<&str> {
        match self {
            ParamValue::Single(value) => Some(value),
            ParamValue::List(values) => values.first().map(String::as_str),
        }
    }

    pub fn values(&self) -> Vec<&str> {
        match self {
            ParamValue::Single(value) => vec![value.as_str()],
            ParamValue::List(values) => values.iter().map(String::as_str).collect(),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Single(value.to_string())
    }
}

impl From<Vec<&str>> for ParamValue {
    fn from(values: Vec<&str>) -> Self {
        ParamValue::List(values.into_iter().map(str::to_string).collect())
    }
}

/// A value accepted by the query string builder.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Value {
    Scalar(String),
    List(Vec<String>),
    Bool(bool),
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Scalar(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Scalar(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

macro_rules! value_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Scalar(value.to_string())
                }
            }
        )*
    };
}

value_from_number!(i32, i64, u16, u32, u64, usize, f64);

impl<S: Into<String>> From<Vec<S>> for Value {
    fn from(values: Vec<S>) -> Self {
        Value::List(values.into_iter().map(Into::into).collect())
    }
}

impl From<&[&str]> for Value {
    fn from(values: &[&str]) -> Self {
        Value::List(values.iter().map(|value| value.to_string()).collect())
    }
}

impl From<&ParamValue> for Value {
    fn from(value: &ParamValue) -> Self {
        match value {
            ParamValue::Single(value) => Value::Scalar(value.clone()),
            ParamValue::List(values) => Value::List(values.clone()),
        }
    }
}

/// Turns parsed parameters back into builder input.
pub fn query_parameters_from(params: &QueryParams) -> QueryParameters {
    params
        .iter()
        .map(|(name, value)| (name.clone(), Value::from(value)))
        .collect()
}

//! [`Value`], the JSON-like value that is written to and read from Ion.

use base64::Engine;
use bigdecimal::BigDecimal;
use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use num_traits::ToPrimitive;

/// A JSON-like value with the extra scalar types the ledger stores natively.
///
/// Covers what the encoder accepts and what the decoders produce:
/// - JSON primitives (null, bool, numbers, strings, lists, structs)
/// - Arbitrary-precision decimals
/// - Timestamps with a UTC offset
/// - Binary data
///
/// Ion symbols decode to [`Value::Str`], clobs to [`Value::Blob`] and
/// s-expressions to [`Value::List`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Ion null (any typed null decodes to this)
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer that fits in i64; wider Ion ints decode to [`Value::Decimal`]
    Int(i64),
    /// Binary floating-point number
    Float(f64),
    /// Arbitrary-precision decimal
    Decimal(BigDecimal),
    /// Point in time with its UTC offset
    Timestamp(DateTime<FixedOffset>),
    /// String
    Str(String),
    /// Binary data
    Blob(Vec<u8>),
    /// Ordered sequence of values
    List(Vec<Value>),
    /// Struct (ordered field-value pairs; duplicate names are allowed)
    Struct(Vec<(String, Value)>),
}

impl Value {
    /// Builds a struct from borrowed field names.
    pub fn structure<'a, I>(fields: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, Value)>,
    {
        Value::Struct(
            fields
                .into_iter()
                .map(|(name, value)| (name.to_owned(), value))
                .collect(),
        )
    }

    /// Parses an ISO-8601 / RFC 3339 timestamp.
    pub fn timestamp_from_rfc3339(text: &str) -> Result<Self, chrono::ParseError> {
        DateTime::parse_from_rfc3339(text).map(Value::Timestamp)
    }

    /// Returns the value of the first field called `name`, if this is a struct.
    pub fn get(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Struct(fields) => fields
                .iter()
                .find(|(field, _)| field == name)
                .map(|(_, value)| value),
            _ => None,
        }
    }

    /// Returns the string slice if this is a [`Value::Str`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(text) => Some(text),
            _ => None,
        }
    }

    /// Converts into a JSON value.
    ///
    /// Floats that JSON cannot carry (NaN, infinities) become `null`.
    /// Decimals become integers when integral and in range, otherwise
    /// the nearest `f64`. Timestamps become RFC 3339 strings with `Z` for
    /// UTC. Blobs become standard base64 strings. Later duplicate struct
    /// fields overwrite earlier ones.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::json!(i),
            Value::Float(f) => float_to_json(*f),
            Value::Decimal(d) => decimal_to_json(d),
            Value::Timestamp(ts) => {
                serde_json::Value::String(ts.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            Value::Str(s) => serde_json::Value::String(s.clone()),
            Value::Blob(b) => {
                serde_json::Value::String(base64::engine::general_purpose::STANDARD.encode(b))
            }
            Value::List(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Struct(fields) => serde_json::Value::Object(
                fields
                    .iter()
                    .map(|(name, value)| (name.clone(), value.to_json()))
                    .collect(),
            ),
        }
    }
}

fn float_to_json(f: f64) -> serde_json::Value {
    serde_json::Number::from_f64(f)
        .map(serde_json::Value::Number)
        .unwrap_or(serde_json::Value::Null)
}

/// Largest exponent magnitude for which a decimal is tried as an exact
/// `i64`/`u64`; wider ones go straight through `f64`.
const MAX_EXACT_EXPONENT: i64 = 20;

fn decimal_to_json(d: &BigDecimal) -> serde_json::Value {
    let (_, scale) = d.as_bigint_and_exponent();
    if scale.abs() <= MAX_EXACT_EXPONENT && d.is_integer() {
        if let Some(i) = d.to_i64() {
            return serde_json::json!(i);
        }
        if let Some(u) = d.to_u64() {
            return serde_json::json!(u);
        }
    }
    d.to_f64()
        .map(float_to_json)
        .unwrap_or(serde_json::Value::Null)
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::Decimal(BigDecimal::from(u))
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(arr) => {
                Value::List(arr.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(obj) => {
                Value::Struct(obj.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<&serde_json::Value> for Value {
    fn from(v: &serde_json::Value) -> Self {
        Value::from(v.clone())
    }
}

impl From<Value> for serde_json::Value {
    fn from(v: Value) -> Self {
        v.to_json()
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<BigDecimal> for Value {
    fn from(d: BigDecimal) -> Self {
        Value::Decimal(d)
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(ts: DateTime<FixedOffset>) -> Self {
        Value::Timestamp(ts)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(ts: DateTime<Utc>) -> Self {
        Value::Timestamp(ts.fixed_offset())
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Value::Blob(bytes)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

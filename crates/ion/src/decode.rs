//! Result decoder: turns ledger query results (binary Ion records or their
//! rendered text) into JSON.
//!
//! Results are parsed structurally, so field names that collide as
//! substrings (`id` / `identity` / `uid`) or contain `:`, `,`, braces or
//! quotes decode like any other.

use indexmap::IndexSet;
use serde_json::Value as JsonValue;

use crate::binary::BinaryReader;
use crate::error::DecodeError;
use crate::text::TextReader;
use crate::value::Value;

/// Folds decoded records into one JSON value.
///
/// No records is `None`, one record is that record, more than one is an
/// array in record order.
pub fn fold_records(mut records: Vec<Value>) -> Option<JsonValue> {
    match records.len() {
        0 => None,
        1 => records.pop().map(JsonValue::from),
        _ => Some(JsonValue::Array(records.iter().map(Value::to_json).collect())),
    }
}

/// Decodes one binary Ion stream, which may hold several top-level values.
pub fn decode_binary(data: &[u8]) -> Result<Option<JsonValue>, DecodeError> {
    let records = BinaryReader::read_all(data)
        .inspect_err(|e| tracing::error!(error = %e, bytes = data.len(), "failed to decode Ion binary"))?;
    tracing::debug!(records = records.len(), "decoded Ion binary");
    Ok(fold_records(records))
}

/// Decodes a result set: one binary Ion stream per record.
pub fn decode_records<'a, I>(records: I) -> Result<Option<JsonValue>, DecodeError>
where
    I: IntoIterator<Item = &'a [u8]>,
{
    let mut values = Vec::new();
    for (index, record) in records.into_iter().enumerate() {
        let decoded = BinaryReader::read_all(record)
            .inspect_err(|e| tracing::error!(error = %e, record = index, "failed to decode result record"))?;
        values.extend(decoded);
    }
    tracing::debug!(records = values.len(), "decoded result records");
    Ok(fold_records(values))
}

/// Decodes rendered Ion text (compact or pretty-printed).
///
/// Empty or whitespace-only text is `None`, not an error.
///
/// ```
/// let json = ledger_ion::decode_text("{a:1}\n{a:2}").unwrap();
/// assert_eq!(json, Some(serde_json::json!([{"a": 1}, {"a": 2}])));
/// ```
pub fn decode_text(text: &str) -> Result<Option<JsonValue>, DecodeError> {
    let records = TextReader::read_all(text)
        .inspect_err(|e| tracing::error!(error = %e, "failed to decode Ion text"))?;
    Ok(fold_records(records))
}

/// Distinct struct field names across `records`, in first-occurrence order.
///
/// Nested structs and lists are searched too.
pub fn field_names(records: &[Value]) -> Vec<String> {
    let mut names = IndexSet::new();
    for record in records {
        collect_field_names(record, &mut names);
    }
    names.into_iter().collect()
}

fn collect_field_names(value: &Value, names: &mut IndexSet<String>) {
    match value {
        Value::Struct(fields) => {
            for (name, field) in fields {
                if !names.contains(name) {
                    names.insert(name.clone());
                }
                collect_field_names(field, names);
            }
        }
        Value::List(items) => {
            for item in items {
                collect_field_names(item, names);
            }
        }
        _ => {}
    }
}

//! Value encoder: walks a [`Value`] and drives an [`IonWriter`].

use std::str::FromStr;

use bigdecimal::BigDecimal;

use crate::binary::BinaryWriter;
use crate::error::WriteError;
use crate::text::TextWriter;
use crate::value::Value;
use crate::writer::{ContainerType, IonWriter};

// 2^63 as f64: the exclusive upper bound of integral floats written as ints.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// Writes `value` (recursively) through `writer`.
///
/// Finite non-integral floats are written as decimals built from the
/// shortest text that round-trips the `f64`, so `1.5` becomes `15d-1`
/// rather than being truncated. Integral floats in `i64` range are written
/// as ints; NaN and infinities stay floats.
pub fn write_value<W: IonWriter + ?Sized>(value: &Value, writer: &mut W) -> Result<(), WriteError> {
    match value {
        Value::Null => writer.write_null(),
        Value::Bool(b) => writer.write_bool(*b),
        Value::Int(i) => writer.write_int(*i),
        Value::Float(f) => write_number(*f, writer),
        Value::Decimal(d) => writer.write_decimal(d),
        Value::Timestamp(ts) => writer.write_timestamp(ts),
        Value::Str(s) => writer.write_string(s),
        Value::Blob(b) => writer.write_blob(b),
        Value::List(items) => {
            writer.step_in(ContainerType::List)?;
            for item in items {
                write_value(item, writer)?;
            }
            writer.step_out()
        }
        Value::Struct(fields) => {
            writer.step_in(ContainerType::Struct)?;
            for (name, field) in fields {
                writer.write_field_name(name)?;
                write_value(field, writer)?;
            }
            writer.step_out()
        }
    }
}

fn write_number<W: IonWriter + ?Sized>(f: f64, writer: &mut W) -> Result<(), WriteError> {
    if !f.is_finite() {
        return writer.write_float(f);
    }
    if f.fract() == 0.0 && (-I64_BOUND..I64_BOUND).contains(&f) {
        return writer.write_int(f as i64);
    }
    match BigDecimal::from_str(&format!("{f:e}")) {
        Ok(decimal) => writer.write_decimal(&decimal),
        Err(_) => writer.write_float(f),
    }
}

/// Encodes one value as a complete Ion binary stream (version marker,
/// local symbol table when needed, then the value).
///
/// ```
/// let bytes = ledger_ion::encode(&ledger_ion::Value::Int(1)).unwrap();
/// assert_eq!(bytes, [0xe0, 0x01, 0x00, 0xea, 0x21, 0x01]);
/// ```
pub fn encode(value: &Value) -> Result<Vec<u8>, WriteError> {
    let mut writer = BinaryWriter::new();
    write_value(value, &mut writer)
        .and_then(|()| writer.finish())
        .inspect_err(|e| tracing::error!(error = %e, "failed to encode value as Ion binary"))
}

/// Renders one value as compact Ion text.
pub fn encode_text(value: &Value) -> Result<String, WriteError> {
    render(value, TextWriter::compact())
}

/// Renders one value as indented Ion text.
pub fn encode_pretty(value: &Value) -> Result<String, WriteError> {
    render(value, TextWriter::pretty())
}

fn render(value: &Value, mut writer: TextWriter) -> Result<String, WriteError> {
    write_value(value, &mut writer)
        .and_then(|()| writer.finish())
        .inspect_err(|e| tracing::error!(error = %e, "failed to render value as Ion text"))
}

//! Streaming Ion binary writer.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Datelike, FixedOffset, Timelike};
use num_bigint::{BigInt, Sign};

use super::{signed_magnitude_bytes, uint_bytes, write_header, write_var_int, write_var_uint};
use crate::constants::{
    TypeOverlay, ION_BVM, LEN_NULL, SID_ION_SYMBOL_TABLE, SID_SYMBOLS,
};
use crate::error::WriteError;
use crate::symbols::SymbolTable;
use crate::writer::{check_timestamp_range, ContainerType, IonWriter};

/// An open container: its content is buffered until `step_out` knows the length.
struct Frame {
    kind: ContainerType,
    /// Field SID this container is stored under in its parent struct.
    field: Option<u32>,
    /// Field SID waiting for its value (struct frames only).
    pending: Option<u32>,
    content: Vec<u8>,
}

/// Ion binary writer.
///
/// Values are buffered while field names are interned into a local symbol
/// table; [`finish`](BinaryWriter::finish) emits the version marker, the
/// symbol table (when any field names or symbols were written) and then
/// every top-level value in order.
pub struct BinaryWriter {
    symbols: SymbolTable,
    top: Vec<u8>,
    stack: Vec<Frame>,
}

impl Default for BinaryWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl BinaryWriter {
    pub fn new() -> Self {
        Self {
            symbols: SymbolTable::new(),
            top: Vec::new(),
            stack: Vec::new(),
        }
    }

    /// Returns the complete Ion binary stream.
    pub fn finish(self) -> Result<Vec<u8>, WriteError> {
        if !self.stack.is_empty() {
            return Err(WriteError::UnclosedContainer(self.stack.len()));
        }
        let mut out = Vec::with_capacity(self.top.len() + 64);
        out.extend_from_slice(&ION_BVM);
        if self.symbols.has_local_symbols() {
            write_symbol_table(&mut out, &self.symbols);
        }
        out.extend_from_slice(&self.top);
        Ok(out)
    }

    /// Claims the pending field name for the next value, enforcing struct rules.
    fn take_field(&mut self) -> Result<Option<u32>, WriteError> {
        match self.stack.last_mut() {
            Some(frame) if frame.kind == ContainerType::Struct => frame
                .pending
                .take()
                .map(Some)
                .ok_or(WriteError::MissingFieldName),
            _ => Ok(None),
        }
    }

    fn content_mut(&mut self) -> &mut Vec<u8> {
        match self.stack.last_mut() {
            Some(frame) => &mut frame.content,
            None => &mut self.top,
        }
    }

    /// Appends one fully encoded value to the current container.
    fn emit(&mut self, encoded: &[u8]) -> Result<(), WriteError> {
        let field = self.take_field()?;
        let out = self.content_mut();
        if let Some(sid) = field {
            write_var_uint(out, u64::from(sid));
        }
        out.extend_from_slice(encoded);
        Ok(())
    }
}

impl IonWriter for BinaryWriter {
    fn write_null(&mut self) -> Result<(), WriteError> {
        self.emit(&[TypeOverlay::NULL | LEN_NULL])
    }

    fn write_bool(&mut self, value: bool) -> Result<(), WriteError> {
        self.emit(&[TypeOverlay::BOOL | u8::from(value)])
    }

    fn write_int(&mut self, value: i64) -> Result<(), WriteError> {
        let overlay = if value < 0 {
            TypeOverlay::NINT
        } else {
            TypeOverlay::UINT
        };
        let magnitude = uint_bytes(value.unsigned_abs());
        let mut encoded = Vec::with_capacity(magnitude.len() + 1);
        write_header(&mut encoded, overlay, magnitude.len());
        encoded.extend_from_slice(&magnitude);
        self.emit(&encoded)
    }

    fn write_float(&mut self, value: f64) -> Result<(), WriteError> {
        let mut encoded = Vec::with_capacity(9);
        encoded.push(TypeOverlay::FLOT | 8);
        encoded.extend_from_slice(&value.to_be_bytes());
        self.emit(&encoded)
    }

    fn write_decimal(&mut self, value: &BigDecimal) -> Result<(), WriteError> {
        let (coefficient, scale) = value.as_bigint_and_exponent();
        let mut body = Vec::new();
        if scale != 0 || coefficient.sign() != Sign::NoSign {
            write_var_int(&mut body, -scale);
            body.extend_from_slice(&signed_magnitude_bytes(&coefficient));
        }
        let mut encoded = Vec::with_capacity(body.len() + 2);
        write_header(&mut encoded, TypeOverlay::DECI, body.len());
        encoded.extend_from_slice(&body);
        self.emit(&encoded)
    }

    fn write_timestamp(&mut self, value: &DateTime<FixedOffset>) -> Result<(), WriteError> {
        check_timestamp_range(value)?;
        let utc = value.naive_utc();
        let mut body = Vec::new();
        write_var_int(
            &mut body,
            i64::from(value.offset().local_minus_utc() / 60),
        );
        write_var_uint(&mut body, utc.year() as u64);
        write_var_uint(&mut body, u64::from(utc.month()));
        write_var_uint(&mut body, u64::from(utc.day()));
        write_var_uint(&mut body, u64::from(utc.hour()));
        write_var_uint(&mut body, u64::from(utc.minute()));
        write_var_uint(&mut body, u64::from(utc.second()));
        let nanos = utc.nanosecond() % 1_000_000_000;
        if nanos != 0 {
            let mut coefficient = nanos;
            let mut exponent: i64 = -9;
            while coefficient % 10 == 0 {
                coefficient /= 10;
                exponent += 1;
            }
            write_var_int(&mut body, exponent);
            body.extend_from_slice(&signed_magnitude_bytes(&BigInt::from(coefficient)));
        }
        let mut encoded = Vec::with_capacity(body.len() + 2);
        write_header(&mut encoded, TypeOverlay::TIME, body.len());
        encoded.extend_from_slice(&body);
        self.emit(&encoded)
    }

    fn write_string(&mut self, value: &str) -> Result<(), WriteError> {
        let bytes = value.as_bytes();
        let mut encoded = Vec::with_capacity(bytes.len() + 3);
        write_header(&mut encoded, TypeOverlay::STRI, bytes.len());
        encoded.extend_from_slice(bytes);
        self.emit(&encoded)
    }

    fn write_symbol(&mut self, value: &str) -> Result<(), WriteError> {
        let sid = self.symbols.intern(value);
        let magnitude = uint_bytes(u64::from(sid));
        let mut encoded = Vec::with_capacity(magnitude.len() + 1);
        write_header(&mut encoded, TypeOverlay::SYMB, magnitude.len());
        encoded.extend_from_slice(&magnitude);
        self.emit(&encoded)
    }

    fn write_blob(&mut self, value: &[u8]) -> Result<(), WriteError> {
        let mut encoded = Vec::with_capacity(value.len() + 3);
        write_header(&mut encoded, TypeOverlay::BINA, value.len());
        encoded.extend_from_slice(value);
        self.emit(&encoded)
    }

    fn write_field_name(&mut self, name: &str) -> Result<(), WriteError> {
        match self.stack.last() {
            Some(frame) if frame.kind == ContainerType::Struct => {
                if frame.pending.is_some() {
                    return Err(WriteError::DanglingFieldName);
                }
            }
            _ => return Err(WriteError::FieldNameOutsideStruct),
        }
        let sid = self.symbols.intern(name);
        if let Some(frame) = self.stack.last_mut() {
            frame.pending = Some(sid);
        }
        Ok(())
    }

    fn step_in(&mut self, container: ContainerType) -> Result<(), WriteError> {
        let field = self.take_field()?;
        self.stack.push(Frame {
            kind: container,
            field,
            pending: None,
            content: Vec::new(),
        });
        Ok(())
    }

    fn step_out(&mut self) -> Result<(), WriteError> {
        let frame = self.stack.pop().ok_or(WriteError::StepOutAtTopLevel)?;
        if frame.pending.is_some() {
            return Err(WriteError::PendingFieldName(frame.kind));
        }
        let overlay = match frame.kind {
            ContainerType::List => TypeOverlay::LIST,
            ContainerType::SExp => TypeOverlay::SEXP,
            ContainerType::Struct => TypeOverlay::STRU,
        };
        let len = frame.content.len();
        let out = self.content_mut();
        if let Some(sid) = frame.field {
            write_var_uint(out, u64::from(sid));
        }
        write_header(out, overlay, len);
        out.extend_from_slice(&frame.content);
        Ok(())
    }

    fn depth(&self) -> usize {
        self.stack.len()
    }
}

/// Writes `$ion_symbol_table::{symbols:[...]}` for the local symbols.
fn write_symbol_table(out: &mut Vec<u8>, symbols: &SymbolTable) {
    let mut list_content = Vec::new();
    for symbol in symbols.local_symbols() {
        match symbol {
            Some(text) => {
                write_header(&mut list_content, TypeOverlay::STRI, text.len());
                list_content.extend_from_slice(text.as_bytes());
            }
            None => list_content.push(TypeOverlay::STRI | LEN_NULL),
        }
    }

    let mut struct_content = Vec::new();
    write_var_uint(&mut struct_content, u64::from(SID_SYMBOLS));
    write_header(&mut struct_content, TypeOverlay::LIST, list_content.len());
    struct_content.extend_from_slice(&list_content);

    let mut wrapped = Vec::new();
    let mut annotations = Vec::new();
    write_var_uint(&mut annotations, u64::from(SID_ION_SYMBOL_TABLE));
    write_var_uint(&mut wrapped, annotations.len() as u64);
    wrapped.extend_from_slice(&annotations);
    write_header(&mut wrapped, TypeOverlay::STRU, struct_content.len());
    wrapped.extend_from_slice(&struct_content);

    write_header(out, TypeOverlay::ANNO, wrapped.len());
    out.extend_from_slice(&wrapped);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    const BVM: [u8; 4] = ION_BVM;

    fn finish_with(f: impl FnOnce(&mut BinaryWriter) -> Result<(), WriteError>) -> Vec<u8> {
        let mut writer = BinaryWriter::new();
        f(&mut writer).unwrap();
        writer.finish().unwrap()
    }

    fn body(bytes: &[u8]) -> &[u8] {
        assert_eq!(&bytes[..4], &BVM);
        &bytes[4..]
    }

    #[test]
    fn scalar_wire() {
        assert_eq!(body(&finish_with(|w| w.write_null())), &[0x0f]);
        assert_eq!(body(&finish_with(|w| w.write_bool(true))), &[0x11]);
        assert_eq!(body(&finish_with(|w| w.write_bool(false))), &[0x10]);
        assert_eq!(body(&finish_with(|w| w.write_int(0))), &[0x20]);
        assert_eq!(body(&finish_with(|w| w.write_int(256))), &[0x22, 0x01, 0x00]);
        assert_eq!(body(&finish_with(|w| w.write_int(-1))), &[0x31, 0x01]);
        assert_eq!(
            body(&finish_with(|w| w.write_int(i64::MIN))),
            &[0x38, 0x80, 0, 0, 0, 0, 0, 0, 0]
        );
        assert_eq!(
            body(&finish_with(|w| w.write_string("hi"))),
            &[0x82, b'h', b'i']
        );
        assert_eq!(
            body(&finish_with(|w| w.write_float(1.0))),
            &[0x48, 0x3f, 0xf0, 0, 0, 0, 0, 0, 0]
        );
    }

    #[test]
    fn decimal_wire() {
        let zero = BigDecimal::from(0);
        assert_eq!(body(&finish_with(|w| w.write_decimal(&zero))), &[0x50]);

        let d = BigDecimal::from_str("1.5").unwrap();
        assert_eq!(body(&finish_with(|w| w.write_decimal(&d))), &[0x52, 0xc1, 0x0f]);

        let d = BigDecimal::from_str("-1.5").unwrap();
        assert_eq!(body(&finish_with(|w| w.write_decimal(&d))), &[0x52, 0xc1, 0x8f]);
    }

    #[test]
    fn timestamp_wire() {
        let ts = DateTime::parse_from_rfc3339("2000-01-02T03:04:05Z").unwrap();
        assert_eq!(
            body(&finish_with(|w| w.write_timestamp(&ts))),
            &[0x68, 0x80, 0x0f, 0xd0, 0x81, 0x82, 0x83, 0x84, 0x85]
        );

        let ts = DateTime::parse_from_rfc3339("2000-01-02T03:04:05.5+01:00").unwrap();
        assert_eq!(
            body(&finish_with(|w| w.write_timestamp(&ts))),
            &[0x6a, 0xbc, 0x0f, 0xd0, 0x81, 0x82, 0x82, 0x84, 0x85, 0xc1, 0x05]
        );
    }

    #[test]
    fn struct_emits_symbol_table_and_field_sids() {
        let bytes = finish_with(|w| {
            w.step_in(ContainerType::Struct)?;
            w.write_field_name("a")?;
            w.write_int(1)?;
            w.step_out()
        });
        assert_eq!(
            bytes,
            vec![
                0xe0, 0x01, 0x00, 0xea, // BVM
                0xe7, 0x81, 0x83, // $ion_symbol_table::
                0xd4, 0x87, 0xb2, 0x81, b'a', // {symbols:["a"]}
                0xd3, 0x8a, 0x21, 0x01, // {a:1}
            ]
        );
    }

    #[test]
    fn nested_containers_and_system_field_names() {
        let mut writer = BinaryWriter::new();
        writer.step_in(ContainerType::List).unwrap();
        writer.step_in(ContainerType::Struct).unwrap();
        writer.step_out().unwrap();
        writer.step_out().unwrap();
        assert_eq!(body(&writer.finish().unwrap()), &[0xb1, 0xd0]);

        let bytes = finish_with(|w| {
            w.step_in(ContainerType::Struct)?;
            w.write_field_name("$ion")?;
            w.step_in(ContainerType::Struct)?;
            w.step_out()?;
            w.step_out()
        });
        // `$ion` is a system symbol, so no local symbol table is needed.
        assert_eq!(body(&bytes), &[0xd2, 0x81, 0xd0]);
    }

    #[test]
    fn misuse_is_reported() {
        let mut writer = BinaryWriter::new();
        assert_eq!(
            writer.write_field_name("a"),
            Err(WriteError::FieldNameOutsideStruct)
        );
        assert_eq!(writer.step_out(), Err(WriteError::StepOutAtTopLevel));

        writer.step_in(ContainerType::Struct).unwrap();
        assert_eq!(writer.write_int(1), Err(WriteError::MissingFieldName));
        writer.write_field_name("a").unwrap();
        assert_eq!(
            writer.write_field_name("b"),
            Err(WriteError::DanglingFieldName)
        );
        assert_eq!(
            writer.step_out(),
            Err(WriteError::PendingFieldName(ContainerType::Struct))
        );
        assert_eq!(writer.depth(), 0);

        let mut writer = BinaryWriter::new();
        writer.step_in(ContainerType::List).unwrap();
        assert_eq!(writer.finish(), Err(WriteError::UnclosedContainer(1)));
    }

    #[test]
    fn timestamp_year_must_fit_ion() {
        let ts = DateTime::parse_from_rfc3339("0000-01-01T00:00:00Z").unwrap();
        let mut writer = BinaryWriter::new();
        assert_eq!(
            writer.write_timestamp(&ts),
            Err(WriteError::TimestampOutOfRange(0))
        );

        // The local year is in range but the stored UTC year is not.
        let ts = DateTime::parse_from_rfc3339("0001-01-01T00:30:00+01:00").unwrap();
        assert_eq!(
            writer.write_timestamp(&ts),
            Err(WriteError::TimestampOutOfRange(0))
        );
    }
}

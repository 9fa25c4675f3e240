//! Ion binary reader.
//!
//! Walks an Ion binary stream and yields each top-level user value as a
//! [`Value`]. Version markers reset the symbol table, local symbol tables are
//! applied (including `imports: $ion_symbol_table` append semantics),
//! annotations are dropped and NOP padding is skipped.

use bigdecimal::BigDecimal;
use chrono::{FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use num_bigint::{BigInt, Sign};
use num_traits::ToPrimitive;

use crate::constants::{Type, ION_BVM, LEN_NULL, LEN_VAR, MAX_DEPTH, SID_ION_SYMBOL_TABLE};
use crate::error::DecodeError;
use crate::symbols::SymbolTable;
use crate::value::Value;

/// Ion binary reader over a borrowed byte stream.
pub struct BinaryReader<'a> {
    data: &'a [u8],
    pos: usize,
    symbols: SymbolTable,
    depth: usize,
    failed: bool,
}

impl<'a> BinaryReader<'a> {
    /// Creates a reader, validating the leading version marker.
    ///
    /// An empty stream is accepted and yields no values.
    pub fn new(data: &'a [u8]) -> Result<Self, DecodeError> {
        let reader = Self {
            data,
            pos: 0,
            symbols: SymbolTable::new(),
            depth: 0,
            failed: false,
        };
        if !data.is_empty() && !reader.at_bvm() {
            return Err(if data.len() < ION_BVM.len() {
                DecodeError::EndOfInput
            } else {
                DecodeError::InvalidBvm
            });
        }
        Ok(reader)
    }

    /// Decodes every top-level value in `data`.
    pub fn read_all(data: &'a [u8]) -> Result<Vec<Value>, DecodeError> {
        Self::new(data)?.collect()
    }

    /// Reads the next top-level user value.
    pub fn next_value(&mut self) -> Result<Option<Value>, DecodeError> {
        loop {
            if !self.has_remaining() {
                return Ok(None);
            }
            if self.at_bvm() {
                self.pos += ION_BVM.len();
                self.symbols.reset();
                continue;
            }
            let (annotations, value) = self.read_annotated()?;
            let Some(value) = value else {
                continue;
            };
            match value {
                Value::Struct(fields) if annotations.first() == Some(&SID_ION_SYMBOL_TABLE) => {
                    self.apply_symbol_table(fields);
                }
                value => return Ok(Some(value)),
            }
        }
    }

    fn at_bvm(&self) -> bool {
        self.data[self.pos..].starts_with(&ION_BVM)
    }

    fn has_remaining(&self) -> bool {
        self.pos < self.data.len()
    }

    fn apply_symbol_table(&mut self, fields: Vec<(String, Value)>) {
        let mut append = false;
        let mut declared = Vec::new();
        for (name, value) in fields {
            match (name.as_str(), value) {
                ("imports", Value::Str(import)) if import == "$ion_symbol_table" => {
                    append = true;
                }
                ("symbols", Value::List(items)) => {
                    declared = items
                        .into_iter()
                        .map(|item| match item {
                            Value::Str(text) => Some(text),
                            _ => None,
                        })
                        .collect();
                }
                _ => {}
            }
        }
        if !append {
            self.symbols.reset();
        }
        self.symbols.append(declared);
    }

    /// Reads one value with its annotation SIDs. `None` means NOP padding.
    fn read_annotated(&mut self) -> Result<(Vec<u32>, Option<Value>), DecodeError> {
        let descriptor = self.peek_byte()?;
        if descriptor >> 4 != Type::ANNO {
            return Ok((Vec::new(), self.read_value()?));
        }
        self.pos += 1;
        let length = self.read_length(descriptor & 0x0f)?;
        if length < 3 {
            return Err(DecodeError::AnnotationTooShort(length));
        }
        let end = self.checked_end(length)?;
        let annot_length = self.read_var_uint()? as usize;
        let annot_end = self.checked_end(annot_length)?;
        let mut annotations = Vec::new();
        while self.pos < annot_end {
            annotations.push(self.read_var_uint()?);
        }
        if self.pos != annot_end {
            return Err(DecodeError::ContainerLengthMismatch);
        }
        let value = self.nested(Self::read_value)?;
        if self.pos != end {
            return Err(DecodeError::ContainerLengthMismatch);
        }
        Ok((annotations, value))
    }

    /// Runs `read` one level deeper, failing once [`MAX_DEPTH`] is reached.
    fn nested<T>(
        &mut self,
        read: impl FnOnce(&mut Self) -> Result<T, DecodeError>,
    ) -> Result<T, DecodeError> {
        if self.depth == MAX_DEPTH {
            return Err(DecodeError::NestingTooDeep);
        }
        self.depth += 1;
        let result = read(self);
        self.depth -= 1;
        result
    }

    /// Reads one value, dropping any annotations. `None` means NOP padding.
    fn read_value(&mut self) -> Result<Option<Value>, DecodeError> {
        let descriptor = self.peek_byte()?;
        let type_id = descriptor >> 4;
        if type_id == Type::ANNO {
            return Ok(self.read_annotated()?.1);
        }
        self.pos += 1;
        let nibble = descriptor & 0x0f;

        if nibble == LEN_NULL && type_id != Type::BOOL {
            return match type_id {
                0xf => Err(DecodeError::UnsupportedType(type_id)),
                _ => Ok(Some(Value::Null)),
            };
        }

        let value = match type_id {
            t if t == Type::NULL => {
                let length = self.read_length(nibble)?;
                self.skip(length)?;
                return Ok(None);
            }
            t if t == Type::BOOL => match nibble {
                0 => Value::Bool(false),
                1 => Value::Bool(true),
                LEN_NULL => Value::Null,
                _ => return Err(DecodeError::InvalidBoolLen(nibble)),
            },
            t if t == Type::UINT => {
                let length = self.read_length(nibble)?;
                self.read_int(length, false)?
            }
            t if t == Type::NINT => {
                let length = self.read_length(nibble)?;
                self.read_int(length, true)?
            }
            t if t == Type::FLOT => {
                let length = self.read_length(nibble)?;
                self.read_float(length)?
            }
            t if t == Type::DECI => {
                let length = self.read_length(nibble)?;
                Value::Decimal(self.read_decimal(length)?)
            }
            t if t == Type::TIME => {
                let length = self.read_length(nibble)?;
                self.read_timestamp(length)?
            }
            t if t == Type::SYMB => {
                let length = self.read_length(nibble)?;
                let sid = self.read_uint_u32(length)?;
                let text = self
                    .symbols
                    .get_text(sid)
                    .ok_or(DecodeError::UnknownSymbol(sid))?;
                Value::Str(text.to_owned())
            }
            t if t == Type::STRI => {
                let length = self.read_length(nibble)?;
                let bytes = self.read_bytes(length)?;
                let text =
                    std::str::from_utf8(bytes).map_err(|_| DecodeError::InvalidUtf8)?;
                Value::Str(text.to_owned())
            }
            t if t == Type::CLOB || t == Type::BINA => {
                let length = self.read_length(nibble)?;
                Value::Blob(self.read_bytes(length)?.to_vec())
            }
            t if t == Type::LIST || t == Type::SEXP => {
                let length = self.read_length(nibble)?;
                self.nested(|r| r.read_list(length))?
            }
            t if t == Type::STRU => {
                // Length nibble 1 marks a sorted struct whose length always follows.
                let length = if nibble == 1 {
                    self.read_var_uint()? as usize
                } else {
                    self.read_length(nibble)?
                };
                self.nested(|r| r.read_struct(length))?
            }
            _ => return Err(DecodeError::UnsupportedType(type_id)),
        };
        Ok(Some(value))
    }

    fn read_int(&mut self, length: usize, negative: bool) -> Result<Value, DecodeError> {
        if length == 0 {
            if negative {
                return Err(DecodeError::NegativeZero);
            }
            return Ok(Value::Int(0));
        }
        let bytes = self.read_bytes(length)?;
        let magnitude = BigInt::from_bytes_be(Sign::Plus, bytes);
        if negative && magnitude.sign() == Sign::NoSign {
            return Err(DecodeError::NegativeZero);
        }
        let n = if negative { -magnitude } else { magnitude };
        Ok(match n.to_i64() {
            Some(i) => Value::Int(i),
            None => Value::Decimal(BigDecimal::from(n)),
        })
    }

    fn read_float(&mut self, length: usize) -> Result<Value, DecodeError> {
        match length {
            0 => Ok(Value::Float(0.0)),
            4 => {
                let bytes: [u8; 4] = self
                    .read_bytes(4)?
                    .try_into()
                    .map_err(|_| DecodeError::EndOfInput)?;
                Ok(Value::Float(f64::from(f32::from_be_bytes(bytes))))
            }
            8 => {
                let bytes: [u8; 8] = self
                    .read_bytes(8)?
                    .try_into()
                    .map_err(|_| DecodeError::EndOfInput)?;
                Ok(Value::Float(f64::from_be_bytes(bytes)))
            }
            _ => Err(DecodeError::UnsupportedFloatLen(length)),
        }
    }

    fn read_decimal(&mut self, length: usize) -> Result<BigDecimal, DecodeError> {
        if length == 0 {
            return Ok(BigDecimal::from(0));
        }
        let end = self.checked_end(length)?;
        let exponent = self.read_var_int()?;
        if self.pos > end {
            return Err(DecodeError::ContainerLengthMismatch);
        }
        let coefficient = self.read_signed_int(end - self.pos)?;
        Ok(BigDecimal::new(coefficient, -exponent))
    }

    fn read_timestamp(&mut self, length: usize) -> Result<Value, DecodeError> {
        let end = self.checked_end(length)?;
        let offset_minutes = self.read_var_int()?;
        let year = self.read_var_uint()?;
        let mut components = [1u32, 1, 0, 0, 0];
        let mut nanos = 0u32;
        for (i, slot) in components.iter_mut().enumerate() {
            if self.pos >= end {
                // Hour and minute only ever appear together.
                if i == 3 {
                    return Err(DecodeError::InvalidTimestamp);
                }
                break;
            }
            *slot = self.read_var_uint()?;
        }
        if self.pos < end {
            let exponent = self.read_var_int()?;
            if self.pos > end {
                return Err(DecodeError::InvalidTimestamp);
            }
            let coefficient = self.read_signed_int(end - self.pos)?;
            nanos = fraction_to_nanos(&coefficient, exponent)?;
        }
        if self.pos != end {
            return Err(DecodeError::ContainerLengthMismatch);
        }

        let [month, day, hour, minute, second] = components;
        let date = i32::try_from(year)
            .ok()
            .and_then(|y| NaiveDate::from_ymd_opt(y, month, day))
            .ok_or(DecodeError::InvalidTimestamp)?;
        let time = NaiveTime::from_hms_nano_opt(hour, minute, second, nanos)
            .ok_or(DecodeError::InvalidTimestamp)?;
        let offset = i32::try_from(offset_minutes)
            .ok()
            .and_then(|m| m.checked_mul(60))
            .and_then(FixedOffset::east_opt)
            .ok_or(DecodeError::InvalidTimestamp)?;
        let utc = NaiveDateTime::new(date, time);
        Ok(Value::Timestamp(offset.from_utc_datetime(&utc)))
    }

    fn read_list(&mut self, length: usize) -> Result<Value, DecodeError> {
        let end = self.checked_end(length)?;
        let mut items = Vec::new();
        while self.pos < end {
            if let Some(item) = self.read_value()? {
                items.push(item);
            }
        }
        if self.pos != end {
            return Err(DecodeError::ContainerLengthMismatch);
        }
        Ok(Value::List(items))
    }

    fn read_struct(&mut self, length: usize) -> Result<Value, DecodeError> {
        let end = self.checked_end(length)?;
        let mut fields = Vec::new();
        while self.pos < end {
            let sid = self.read_var_uint()?;
            let value = self.read_value()?;
            let Some(value) = value else {
                continue;
            };
            let name = self
                .symbols
                .get_text(sid)
                .ok_or(DecodeError::UnknownSymbol(sid))?;
            fields.push((name.to_owned(), value));
        }
        if self.pos != end {
            return Err(DecodeError::ContainerLengthMismatch);
        }
        Ok(Value::Struct(fields))
    }

    /// Resolves a length nibble, reading a VarUInt length when it is 14.
    fn read_length(&mut self, nibble: u8) -> Result<usize, DecodeError> {
        if nibble == LEN_VAR {
            Ok(self.read_var_uint()? as usize)
        } else {
            Ok(nibble as usize)
        }
    }

    fn checked_end(&self, length: usize) -> Result<usize, DecodeError> {
        let end = self
            .pos
            .checked_add(length)
            .ok_or(DecodeError::EndOfInput)?;
        if end > self.data.len() {
            return Err(DecodeError::EndOfInput);
        }
        Ok(end)
    }

    /// Reads a VarUInt (max 5 bytes for a 32-bit value).
    fn read_var_uint(&mut self) -> Result<u32, DecodeError> {
        let mut result: u32 = 0;
        for _ in 0..5 {
            let b = self.read_byte()?;
            result = result
                .checked_mul(128)
                .ok_or(DecodeError::VarIntOverflow)?
                | u32::from(b & 0x7f);
            if b & 0x80 != 0 {
                return Ok(result);
            }
        }
        Err(DecodeError::VarIntOverflow)
    }

    /// Reads a VarInt; negative zero reads as zero.
    fn read_var_int(&mut self) -> Result<i64, DecodeError> {
        let first = self.read_byte()?;
        let negative = first & 0x40 != 0;
        let mut magnitude = i64::from(first & 0x3f);
        let mut last = first & 0x80 != 0;
        let mut count = 1;
        while !last {
            if count == 9 {
                return Err(DecodeError::VarIntOverflow);
            }
            let b = self.read_byte()?;
            magnitude = (magnitude << 7) | i64::from(b & 0x7f);
            last = b & 0x80 != 0;
            count += 1;
        }
        Ok(if negative { -magnitude } else { magnitude })
    }

    /// Reads a fixed-length signed-magnitude Int.
    fn read_signed_int(&mut self, length: usize) -> Result<BigInt, DecodeError> {
        if length == 0 {
            return Ok(BigInt::from(0));
        }
        let mut bytes = self.read_bytes(length)?.to_vec();
        let negative = bytes[0] & 0x80 != 0;
        bytes[0] &= 0x7f;
        let sign = if negative { Sign::Minus } else { Sign::Plus };
        Ok(BigInt::from_bytes_be(sign, &bytes))
    }

    fn read_uint_u32(&mut self, length: usize) -> Result<u32, DecodeError> {
        if length > 4 {
            return Err(DecodeError::VarIntOverflow);
        }
        let mut result: u32 = 0;
        for b in self.read_bytes(length)? {
            result = (result << 8) | u32::from(*b);
        }
        Ok(result)
    }

    fn read_byte(&mut self) -> Result<u8, DecodeError> {
        let b = self.peek_byte()?;
        self.pos += 1;
        Ok(b)
    }

    fn peek_byte(&self) -> Result<u8, DecodeError> {
        self.data
            .get(self.pos)
            .copied()
            .ok_or(DecodeError::EndOfInput)
    }

    fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        let end = self.checked_end(n)?;
        let data: &'a [u8] = self.data;
        let bytes = &data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    fn skip(&mut self, n: usize) -> Result<(), DecodeError> {
        self.pos = self.checked_end(n)?;
        Ok(())
    }
}

impl Iterator for BinaryReader<'_> {
    type Item = Result<Value, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.next_value() {
            Ok(value) => value.map(Ok),
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

/// Converts a fractional-seconds decimal (coefficient × 10^exponent) to nanoseconds.
fn fraction_to_nanos(coefficient: &BigInt, exponent: i64) -> Result<u32, DecodeError> {
    if coefficient.sign() == Sign::Minus || (exponent >= 0 && coefficient.sign() != Sign::NoSign) {
        return Err(DecodeError::InvalidTimestamp);
    }
    if coefficient.sign() == Sign::NoSign {
        return Ok(0);
    }
    // Non-zero coefficients always carry a negative exponent, so shift <= 8.
    let shift = exponent + 9;
    let nanos = if shift >= 0 {
        coefficient * BigInt::from(10u32).pow(shift as u32)
    } else {
        // Precision past the coefficient's own digits truncates to zero.
        let digits = coefficient.magnitude().to_string().len() as u64;
        if shift.unsigned_abs() > digits {
            return Ok(0);
        }
        coefficient / BigInt::from(10u32).pow(shift.unsigned_abs() as u32)
    };
    nanos
        .to_u32()
        .filter(|n| *n < 1_000_000_000)
        .ok_or(DecodeError::InvalidTimestamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binary::{write_header, BinaryWriter};
    use crate::constants::TypeOverlay;
    use crate::writer::{ContainerType, IonWriter};

    fn read_one(bytes: &[u8]) -> Value {
        let mut values = BinaryReader::read_all(bytes).unwrap();
        assert_eq!(values.len(), 1);
        values.remove(0)
    }

    #[test]
    fn empty_stream_has_no_values() {
        assert_eq!(BinaryReader::read_all(&[]).unwrap(), Vec::<Value>::new());
        assert_eq!(
            BinaryReader::read_all(&[0xe0, 0x01, 0x00, 0xea]).unwrap(),
            Vec::<Value>::new()
        );
    }

    #[test]
    fn rejects_missing_version_marker() {
        assert_eq!(
            BinaryReader::new(&[0x0f, 0x0f, 0x0f, 0x0f]).err(),
            Some(DecodeError::InvalidBvm)
        );
        assert_eq!(BinaryReader::new(&[0xe0]).err(), Some(DecodeError::EndOfInput));
    }

    #[test]
    fn typed_nulls_and_nop_padding() {
        let bytes = [0xe0, 0x01, 0x00, 0xea, 0x02, 0x00, 0x00, 0x8f, 0x1f, 0xdf];
        assert_eq!(
            BinaryReader::read_all(&bytes).unwrap(),
            vec![Value::Null, Value::Null, Value::Null]
        );
    }

    #[test]
    fn wide_ints_decode_losslessly() {
        let bytes = [
            0xe0, 0x01, 0x00, 0xea, 0x29, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        ];
        let value = read_one(&bytes);
        let expected: BigDecimal = "18446744073709551616".parse().unwrap();
        assert_eq!(value, Value::Decimal(expected));

        let bytes = [0xe0, 0x01, 0x00, 0xea, 0x38, 0x80, 0, 0, 0, 0, 0, 0, 0];
        assert_eq!(read_one(&bytes), Value::Int(i64::MIN));
    }

    #[test]
    fn negative_zero_int_is_illegal() {
        assert_eq!(
            BinaryReader::read_all(&[0xe0, 0x01, 0x00, 0xea, 0x30]),
            Err(DecodeError::NegativeZero)
        );
    }

    #[test]
    fn reads_four_byte_floats() {
        let mut bytes = vec![0xe0, 0x01, 0x00, 0xea, 0x44];
        bytes.extend_from_slice(&1.5f32.to_be_bytes());
        assert_eq!(read_one(&bytes), Value::Float(1.5));
    }

    #[test]
    fn timestamp_precisions() {
        // 2007T (year precision, unknown offset)
        let bytes = [0xe0, 0x01, 0x00, 0xea, 0x63, 0xc0, 0x0f, 0xd7];
        assert_eq!(
            read_one(&bytes),
            Value::timestamp_from_rfc3339("2007-01-01T00:00:00Z").unwrap()
        );

        // Hour without minute is invalid.
        let bytes = [0xe0, 0x01, 0x00, 0xea, 0x66, 0x80, 0x0f, 0xd7, 0x81, 0x81, 0x81];
        assert_eq!(
            BinaryReader::read_all(&bytes),
            Err(DecodeError::InvalidTimestamp)
        );
    }

    #[test]
    fn local_symbol_tables_append_and_reset() {
        let mut writer = BinaryWriter::new();
        writer.step_in(ContainerType::Struct).unwrap();
        writer.write_field_name("first").unwrap();
        writer.write_int(1).unwrap();
        writer.step_out().unwrap();
        let mut bytes = writer.finish().unwrap();

        // $ion_symbol_table::{imports:$ion_symbol_table, symbols:["second"]}
        bytes.extend_from_slice(&[
            0xee, 0x8f, 0x81, 0x83, 0xdc, 0x86, 0x71, 0x03, 0x87, 0xb7, 0x86, b's', b'e', b'c',
            b'o', b'n', b'd',
        ]);
        // {first:2, second:3}
        bytes.extend_from_slice(&[0xd6, 0x8a, 0x21, 0x02, 0x8b, 0x21, 0x03]);

        let values = BinaryReader::read_all(&bytes).unwrap();
        assert_eq!(
            values,
            vec![
                Value::structure([("first", Value::Int(1))]),
                Value::structure([("first", Value::Int(2)), ("second", Value::Int(3))]),
            ]
        );

        // A new version marker drops local symbols again.
        let mut reset = bytes.clone();
        reset.extend_from_slice(&[0xe0, 0x01, 0x00, 0xea, 0xd2, 0x8a, 0x0f]);
        assert_eq!(
            BinaryReader::read_all(&reset),
            Err(DecodeError::UnknownSymbol(10))
        );
    }

    #[test]
    fn container_length_overrun_is_reported() {
        assert_eq!(
            BinaryReader::read_all(&[0xe0, 0x01, 0x00, 0xea, 0xb3, 0x21, 0x01]),
            Err(DecodeError::EndOfInput)
        );
        assert_eq!(
            BinaryReader::read_all(&[0xe0, 0x01, 0x00, 0xea, 0xb1, 0x21, 0x01]),
            Err(DecodeError::ContainerLengthMismatch)
        );
    }

    #[test]
    fn reserved_type_code_is_unsupported() {
        assert_eq!(
            BinaryReader::read_all(&[0xe0, 0x01, 0x00, 0xea, 0xf0]),
            Err(DecodeError::UnsupportedType(0xf))
        );
    }

    /// `depth` values, each wrapping the next in `prefix`, around a null.
    fn nested_bytes(depth: usize, prefix: impl Fn(usize) -> Vec<u8>) -> Vec<u8> {
        let mut prefixes = Vec::new();
        let mut length = 1;
        for _ in 0..depth {
            let p = prefix(length);
            length += p.len();
            prefixes.push(p);
        }
        let mut bytes = ION_BVM.to_vec();
        for p in prefixes.iter().rev() {
            bytes.extend_from_slice(p);
        }
        bytes.push(0x0f);
        bytes
    }

    fn nested_lists(depth: usize) -> Vec<u8> {
        nested_bytes(depth, |length| {
            let mut header = Vec::new();
            write_header(&mut header, TypeOverlay::LIST, length);
            header
        })
    }

    #[test]
    fn container_nesting_is_bounded() {
        assert!(matches!(read_one(&nested_lists(MAX_DEPTH)), Value::List(_)));
        assert_eq!(
            BinaryReader::read_all(&nested_lists(MAX_DEPTH + 1)),
            Err(DecodeError::NestingTooDeep)
        );
        assert_eq!(
            BinaryReader::read_all(&nested_lists(100_000)),
            Err(DecodeError::NestingTooDeep)
        );
    }

    #[test]
    fn annotation_wrapper_nesting_is_bounded() {
        // name::name::...::null
        let wrappers = nested_bytes(100_000, |length| {
            let mut header = Vec::new();
            write_header(&mut header, TypeOverlay::ANNO, length + 2);
            header.extend_from_slice(&[0x81, 0x84]);
            header
        });
        assert_eq!(
            BinaryReader::read_all(&wrappers),
            Err(DecodeError::NestingTooDeep)
        );
    }

    #[test]
    fn huge_fraction_exponent_truncates_to_whole_seconds() {
        // 2007-01-01T00:00:00Z with fraction 5d-1000000
        let bytes = [
            0xe0, 0x01, 0x00, 0xea, 0x6c, 0x80, 0x0f, 0xd7, 0x81, 0x81, 0x80, 0x80, 0x80, 0x7d,
            0x04, 0xc0, 0x05,
        ];
        assert_eq!(
            read_one(&bytes),
            Value::timestamp_from_rfc3339("2007-01-01T00:00:00Z").unwrap()
        );
    }

    #[test]
    fn fraction_within_precision_keeps_nanos() {
        assert_eq!(fraction_to_nanos(&BigInt::from(25), -2), Ok(250_000_000));
        assert_eq!(fraction_to_nanos(&BigInt::from(123), -12), Ok(0));
        assert_eq!(fraction_to_nanos(&BigInt::from(0), i64::MAX), Ok(0));
        assert_eq!(
            fraction_to_nanos(&BigInt::from(5), 0),
            Err(DecodeError::InvalidTimestamp)
        );
    }
}

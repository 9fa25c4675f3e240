//! Ion text reader.
//!
//! A recursive-descent parser over rendered Ion text. It understands the
//! whole text grammar the writers produce (and a good deal more): typed
//! nulls, radix ints, decimals, floats, timestamps at every precision,
//! short and long strings, quoted symbols, lobs, containers, annotations
//! and comments. Every syntax failure carries the byte offset it was
//! detected at.

use std::str::FromStr;

use base64::Engine;
use bigdecimal::BigDecimal;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone};
use num_bigint::BigInt;
use num_traits::{Num, ToPrimitive};

use crate::constants::MAX_DEPTH;
use crate::error::DecodeError;
use crate::value::Value;

const TYPED_NULLS: [&str; 13] = [
    "null",
    "bool",
    "int",
    "float",
    "decimal",
    "timestamp",
    "symbol",
    "string",
    "clob",
    "blob",
    "list",
    "sexp",
    "struct",
];

const OPERATOR_CHARS: &str = "!#%&*+-./;<=>?@^`|~";

/// Ion text reader over a borrowed string.
///
/// ```
/// use ledger_ion::{TextReader, Value};
///
/// let values = TextReader::read_all("{a:1} {a:2}").unwrap();
/// assert_eq!(values.len(), 2);
/// assert_eq!(values[1].get("a"), Some(&Value::Int(2)));
/// ```
pub struct TextReader<'a> {
    src: &'a str,
    pos: usize,
    depth: usize,
    failed: bool,
}

impl<'a> TextReader<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            depth: 0,
            failed: false,
        }
    }

    /// Parses every top-level value in `src`.
    pub fn read_all(src: &'a str) -> Result<Vec<Value>, DecodeError> {
        Self::new(src).collect()
    }

    /// Reads the next top-level user value.
    ///
    /// Version markers (`$ion_1_0`) and `$ion_symbol_table::{...}` structs
    /// are system values and are skipped.
    pub fn next_value(&mut self) -> Result<Option<Value>, DecodeError> {
        loop {
            self.skip_ws()?;
            if self.rest().is_empty() {
                return Ok(None);
            }
            if self.at_keyword("$ion_1_0") {
                self.pos += "$ion_1_0".len();
                continue;
            }
            let (annotations, value) = self.read_annotated(false)?;
            match value {
                Value::Struct(_) if annotations.first().map(String::as_str) == Some("$ion_symbol_table") => {}
                value => return Ok(Some(value)),
            }
        }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, c: char) -> Result<(), DecodeError> {
        if self.eat(c) {
            Ok(())
        } else {
            Err(self.error(format!("expected '{c}'")))
        }
    }

    fn error(&self, message: impl Into<String>) -> DecodeError {
        DecodeError::malformed(self.pos, message)
    }

    /// `true` when `word` starts here and is not followed by an identifier char.
    fn at_keyword(&self, word: &str) -> bool {
        self.rest().starts_with(word)
            && !self.rest()[word.len()..]
                .chars()
                .next()
                .is_some_and(is_identifier_char)
    }

    /// Skips whitespace and comments.
    fn skip_ws(&mut self) -> Result<(), DecodeError> {
        loop {
            let rest = self.rest();
            if rest.starts_with("//") {
                self.pos += rest.find('\n').unwrap_or(rest.len());
            } else if rest.starts_with("/*") {
                let end = rest[2..]
                    .find("*/")
                    .ok_or_else(|| self.error("unterminated block comment"))?;
                self.pos += end + 4;
            } else if let Some(c) = self.peek().filter(|c| is_whitespace(*c)) {
                self.pos += c.len_utf8();
            } else {
                return Ok(());
            }
        }
    }

    fn read_annotated(&mut self, in_sexp: bool) -> Result<(Vec<String>, Value), DecodeError> {
        let mut annotations = Vec::new();
        loop {
            self.skip_ws()?;
            let start = self.pos;
            if let Some(symbol) = self.try_symbol()? {
                self.skip_ws()?;
                if self.rest().starts_with("::") {
                    self.pos += 2;
                    annotations.push(symbol);
                    continue;
                }
            }
            self.pos = start;
            break;
        }
        let value = self.read_value(in_sexp)?;
        Ok((annotations, value))
    }

    /// Reads a bare or quoted symbol if one starts here.
    fn try_symbol(&mut self) -> Result<Option<String>, DecodeError> {
        match self.peek() {
            Some(c) if is_identifier_start(c) => Ok(Some(self.read_identifier().to_owned())),
            Some('\'') if !self.rest().starts_with("'''") => {
                self.pos += 1;
                self.read_short_string('\'').map(Some)
            }
            _ => Ok(None),
        }
    }

    fn read_value(&mut self, in_sexp: bool) -> Result<Value, DecodeError> {
        let Some(c) = self.peek() else {
            return Err(self.error("expected a value"));
        };
        match c {
            '{' if self.rest().starts_with("{{") => {
                self.pos += 2;
                self.read_lob()
            }
            '{' => self.read_container(Self::read_struct),
            '[' => self.read_container(Self::read_list),
            '(' => self.read_container(Self::read_sexp),
            '"' => {
                self.pos += 1;
                self.read_short_string('"').map(Value::Str)
            }
            '\'' if self.rest().starts_with("'''") => self.read_long_strings().map(Value::Str),
            '\'' => {
                self.pos += 1;
                self.read_short_string('\'').map(Value::Str)
            }
            '+' if self.at_keyword("+inf") => {
                self.pos += 4;
                Ok(Value::Float(f64::INFINITY))
            }
            '-' if self.at_keyword("-inf") => {
                self.pos += 4;
                Ok(Value::Float(f64::NEG_INFINITY))
            }
            '-' if self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) => self.read_number(),
            c if c.is_ascii_digit() => self.read_number(),
            c if is_identifier_start(c) => self.read_keyword_or_symbol(),
            c if in_sexp && OPERATOR_CHARS.contains(c) => {
                let start = self.pos;
                while self.peek().is_some_and(|c| OPERATOR_CHARS.contains(c)) {
                    self.pos += 1;
                }
                Ok(Value::Str(self.src[start..self.pos].to_owned()))
            }
            c => Err(self.error(format!("unexpected character {c:?}"))),
        }
    }

    /// Steps past an opening bracket and reads the container body with `read`.
    fn read_container(
        &mut self,
        read: fn(&mut Self) -> Result<Value, DecodeError>,
    ) -> Result<Value, DecodeError> {
        if self.depth == MAX_DEPTH {
            return Err(self.error(format!("containers nested more than {MAX_DEPTH} levels deep")));
        }
        self.pos += 1;
        self.depth += 1;
        let value = read(self);
        self.depth -= 1;
        value
    }

    fn read_identifier(&mut self) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(is_identifier_char) {
            self.pos += 1;
        }
        &self.src[start..self.pos]
    }

    fn read_keyword_or_symbol(&mut self) -> Result<Value, DecodeError> {
        let word = self.read_identifier();
        Ok(match word {
            "null" => {
                if self.peek() == Some('.') {
                    self.pos += 1;
                    let start = self.pos;
                    let kind = self.read_identifier();
                    if !TYPED_NULLS.contains(&kind) {
                        return Err(DecodeError::malformed(start, format!("unknown null type {kind:?}")));
                    }
                }
                Value::Null
            }
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            "nan" => Value::Float(f64::NAN),
            symbol => Value::Str(symbol.to_owned()),
        })
    }

    fn read_struct(&mut self) -> Result<Value, DecodeError> {
        let mut fields = Vec::new();
        loop {
            self.skip_ws()?;
            if self.eat('}') {
                break;
            }
            let name = self.read_field_name()?;
            self.skip_ws()?;
            self.expect(':')?;
            let (_, value) = self.read_annotated(false)?;
            fields.push((name, value));
            self.skip_ws()?;
            if self.eat(',') {
                continue;
            }
            if self.eat('}') {
                break;
            }
            return Err(self.error("expected ',' or '}' in struct"));
        }
        Ok(Value::Struct(fields))
    }

    fn read_field_name(&mut self) -> Result<String, DecodeError> {
        match self.peek() {
            Some('"') => {
                self.pos += 1;
                self.read_short_string('"')
            }
            Some('\'') if self.rest().starts_with("'''") => self.read_long_strings(),
            Some('\'') => {
                self.pos += 1;
                self.read_short_string('\'')
            }
            Some(c) if is_identifier_start(c) => Ok(self.read_identifier().to_owned()),
            _ => Err(self.error("expected a field name")),
        }
    }

    fn read_list(&mut self) -> Result<Value, DecodeError> {
        let mut items = Vec::new();
        loop {
            self.skip_ws()?;
            if self.eat(']') {
                break;
            }
            let (_, item) = self.read_annotated(false)?;
            items.push(item);
            self.skip_ws()?;
            if self.eat(',') {
                continue;
            }
            if self.eat(']') {
                break;
            }
            return Err(self.error("expected ',' or ']' in list"));
        }
        Ok(Value::List(items))
    }

    fn read_sexp(&mut self) -> Result<Value, DecodeError> {
        let mut items = Vec::new();
        loop {
            self.skip_ws()?;
            if self.eat(')') {
                break;
            }
            if self.rest().is_empty() {
                return Err(self.error("unterminated s-expression"));
            }
            let (_, item) = self.read_annotated(true)?;
            items.push(item);
        }
        Ok(Value::List(items))
    }

    /// Reads a `"..."` or `'...'` body; the opening quote is already consumed.
    fn read_short_string(&mut self, quote: char) -> Result<String, DecodeError> {
        let mut out = String::new();
        loop {
            match self.bump() {
                None | Some('\n') => return Err(self.error("unterminated string")),
                Some('\\') => self.read_escape(&mut out)?,
                Some(c) if c == quote => return Ok(out),
                Some(c) => out.push(c),
            }
        }
    }

    /// Reads one or more adjacent `'''...'''` segments and concatenates them.
    fn read_long_strings(&mut self) -> Result<String, DecodeError> {
        let mut out = String::new();
        loop {
            self.pos += 3;
            loop {
                if self.rest().starts_with("'''") {
                    self.pos += 3;
                    break;
                }
                match self.bump() {
                    None => return Err(self.error("unterminated long string")),
                    Some('\\') => self.read_escape(&mut out)?,
                    Some(c) => out.push(c),
                }
            }
            let end = self.pos;
            self.skip_ws()?;
            if !self.rest().starts_with("'''") {
                self.pos = end;
                return Ok(out);
            }
        }
    }

    fn read_escape(&mut self, out: &mut String) -> Result<(), DecodeError> {
        let c = self.bump().ok_or_else(|| self.error("unterminated escape"))?;
        let decoded = match c {
            'a' => '\u{07}',
            'b' => '\u{08}',
            't' => '\t',
            'n' => '\n',
            'f' => '\u{0c}',
            'r' => '\r',
            'v' => '\u{0b}',
            '0' => '\0',
            '"' | '\'' | '?' | '\\' | '/' => c,
            // Escaped line break: a continuation, contributes nothing.
            '\n' => return Ok(()),
            '\r' => {
                self.eat('\n');
                return Ok(());
            }
            'x' => self.read_code_point(2)?,
            'u' => self.read_code_point(4)?,
            'U' => self.read_code_point(8)?,
            c => return Err(self.error(format!("invalid escape \\{c}"))),
        };
        out.push(decoded);
        Ok(())
    }

    fn read_code_point(&mut self, digits: usize) -> Result<char, DecodeError> {
        let high = self.read_hex(digits)?;
        if !(0xd800..0xdc00).contains(&high) {
            return char::from_u32(high).ok_or_else(|| self.error("invalid code point"));
        }
        if !self.rest().starts_with("\\u") {
            return Err(self.error("unpaired surrogate"));
        }
        self.pos += 2;
        let low = self.read_hex(4)?;
        if !(0xdc00..0xe000).contains(&low) {
            return Err(self.error("unpaired surrogate"));
        }
        let code = 0x10000 + ((high - 0xd800) << 10) + (low - 0xdc00);
        char::from_u32(code).ok_or_else(|| self.error("invalid code point"))
    }

    fn read_hex(&mut self, digits: usize) -> Result<u32, DecodeError> {
        let mut code = 0u32;
        for _ in 0..digits {
            let digit = self
                .peek()
                .and_then(|c| c.to_digit(16))
                .ok_or_else(|| self.error("invalid hex escape"))?;
            self.pos += 1;
            code = code * 16 + digit;
        }
        Ok(code)
    }

    /// Reads a blob or clob body; the opening `{{` is already consumed.
    fn read_lob(&mut self) -> Result<Value, DecodeError> {
        self.skip_lob_ws();
        let bytes = match self.peek() {
            Some('"') => {
                self.pos += 1;
                let text = self.read_short_string('"')?;
                self.clob_bytes(&text)?
            }
            Some('\'') if self.rest().starts_with("'''") => {
                let text = self.read_long_strings()?;
                self.clob_bytes(&text)?
            }
            _ => {
                let start = self.pos;
                let mut encoded = String::new();
                while let Some(c) = self.peek().filter(|c| *c != '}') {
                    if !is_whitespace(c) {
                        encoded.push(c);
                    }
                    self.pos += c.len_utf8();
                }
                base64::engine::general_purpose::STANDARD
                    .decode(encoded.as_bytes())
                    .map_err(|e| DecodeError::malformed(start, format!("invalid base64: {e}")))?
            }
        };
        self.skip_lob_ws();
        if !self.rest().starts_with("}}") {
            return Err(self.error("expected '}}'"));
        }
        self.pos += 2;
        Ok(Value::Blob(bytes))
    }

    fn skip_lob_ws(&mut self) {
        while let Some(c) = self.peek().filter(|c| is_whitespace(*c)) {
            self.pos += c.len_utf8();
        }
    }

    fn clob_bytes(&self, text: &str) -> Result<Vec<u8>, DecodeError> {
        text.chars()
            .map(|c| u8::try_from(c).map_err(|_| self.error("clob characters must be below U+0100")))
            .collect()
    }

    fn read_number(&mut self) -> Result<Value, DecodeError> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-' | '+' | ':'))
        {
            self.pos += 1;
        }
        let token = &self.src[start..self.pos];
        parse_numeric(token).ok_or_else(|| DecodeError::malformed(start, format!("invalid literal {token:?}")))
    }
}

impl Iterator for TextReader<'_> {
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

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\u{0b}' | '\u{0c}')
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// Classifies and parses an int, decimal, float or timestamp token.
fn parse_numeric(token: &str) -> Option<Value> {
    let bytes = token.as_bytes();
    if bytes.len() >= 5 && bytes[..4].iter().all(u8::is_ascii_digit) && matches!(bytes[4], b'-' | b'T') {
        return parse_timestamp(token).map(Value::Timestamp);
    }

    let (negative, unsigned) = match token.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token),
    };
    let radix = match unsigned.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        let digits = unsigned[2..].replace('_', "");
        let magnitude = BigInt::from_str_radix(&digits, radix).ok()?;
        return Some(int_value(if negative { -magnitude } else { magnitude }));
    }

    let cleaned = token.replace('_', "");
    if cleaned.contains(['e', 'E']) {
        return f64::from_str(&cleaned).ok().map(Value::Float);
    }
    if cleaned.contains(['d', 'D']) {
        let exponent_form = cleaned.replace(['d', 'D'], "e");
        return BigDecimal::from_str(&exponent_form).ok().map(Value::Decimal);
    }
    if cleaned.contains('.') {
        return BigDecimal::from_str(&cleaned).ok().map(Value::Decimal);
    }
    if !cleaned.trim_start_matches('-').bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    BigInt::from_str(&cleaned).ok().map(int_value)
}

fn int_value(n: BigInt) -> Value {
    match n.to_i64() {
        Some(i) => Value::Int(i),
        None => Value::Decimal(BigDecimal::from(n)),
    }
}

/// Parses an Ion timestamp at any precision, from `2007T` to fractional seconds.
///
/// Date-only timestamps are midnight UTC; `-00:00` (unknown offset) reads as UTC.
fn parse_timestamp(text: &str) -> Option<DateTime<FixedOffset>> {
    let bytes = text.as_bytes();
    let year = text.get(..4)?.parse::<i32>().ok()?;
    let (month, day, time) = match bytes.get(4) {
        Some(b'T') if text.len() == 5 => (1, 1, ""),
        Some(b'-') => {
            let month = number_at(text, 5)?;
            match bytes.get(7) {
                Some(b'T') if text.len() == 8 => (month, 1, ""),
                Some(b'-') => {
                    let day = number_at(text, 8)?;
                    match &text[10..] {
                        "" | "T" => (month, day, ""),
                        rest => (month, day, rest.strip_prefix('T')?),
                    }
                }
                _ => return None,
            }
        }
        _ => return None,
    };
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    if time.is_empty() {
        let utc = FixedOffset::east_opt(0)?;
        return utc.from_local_datetime(&date.and_hms_opt(0, 0, 0)?).single();
    }

    let time_bytes = time.as_bytes();
    let hour = number_at(time, 0)?;
    if time_bytes.get(2) != Some(&b':') {
        return None;
    }
    let minute = number_at(time, 3)?;
    let mut idx = 5;
    let mut second = 0;
    let mut nanos = 0;
    if time_bytes.get(idx) == Some(&b':') {
        second = number_at(time, idx + 1)?;
        idx += 3;
        if time_bytes.get(idx) == Some(&b'.') {
            idx += 1;
            let digits_end = time_bytes[idx..]
                .iter()
                .position(|b| !b.is_ascii_digit())
                .map_or(time.len(), |p| idx + p);
            let fraction = &time[idx..digits_end];
            if fraction.is_empty() {
                return None;
            }
            let mut padded: String = fraction.chars().take(9).collect();
            while padded.len() < 9 {
                padded.push('0');
            }
            nanos = padded.parse().ok()?;
            idx = digits_end;
        }
    }

    let offset_minutes: i32 = match &time[idx..] {
        "Z" | "z" | "-00:00" => 0,
        offset if offset.len() == 6 && offset.as_bytes()[3] == b':' => {
            let sign = match offset.as_bytes()[0] {
                b'+' => 1,
                b'-' => -1,
                _ => return None,
            };
            let hours = i32::try_from(number_at(offset, 1)?).ok()?;
            let minutes = i32::try_from(number_at(offset, 4)?).ok()?;
            sign * (hours * 60 + minutes)
        }
        _ => return None,
    };
    let offset = FixedOffset::east_opt(offset_minutes * 60)?;
    let time = NaiveTime::from_hms_nano_opt(hour, minute, second, nanos)?;
    offset.from_local_datetime(&date.and_time(time)).single()
}

/// Two ASCII digits starting at `from`.
fn number_at(text: &str, from: usize) -> Option<u32> {
    let digits = text.get(from..from + 2)?;
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

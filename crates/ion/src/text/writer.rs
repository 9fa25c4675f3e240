//! Ion text writer (compact and pretty-printed).

use std::fmt::Write as _;

use base64::Engine;
use bigdecimal::BigDecimal;
use chrono::{DateTime, FixedOffset, SecondsFormat};
use num_bigint::Sign;

use super::is_identifier;
use crate::error::WriteError;
use crate::writer::{check_timestamp_range, ContainerType, IonWriter};

const INDENT: &str = "  ";

const MAX_LEADING_ZEROS: usize = 20;

struct Frame {
    kind: ContainerType,
    count: usize,
    pending: Option<String>,
}

/// Ion text writer.
///
/// [`TextWriter::compact`] renders `{a:1,b:"x"}`; [`TextWriter::pretty`]
/// renders one field or element per line, indented by two spaces. Top-level
/// values are separated by a newline.
///
/// ```
/// use ledger_ion::{ContainerType, IonWriter, TextWriter};
///
/// let mut writer = TextWriter::compact();
/// writer.step_in(ContainerType::Struct).unwrap();
/// writer.write_field_name("id").unwrap();
/// writer.write_int(1).unwrap();
/// writer.step_out().unwrap();
/// assert_eq!(writer.finish().unwrap(), "{id:1}");
/// ```
pub struct TextWriter {
    out: String,
    pretty: bool,
    stack: Vec<Frame>,
    top_count: usize,
}

impl TextWriter {
    pub fn compact() -> Self {
        Self::new(false)
    }

    pub fn pretty() -> Self {
        Self::new(true)
    }

    fn new(pretty: bool) -> Self {
        Self {
            out: String::new(),
            pretty,
            stack: Vec::new(),
            top_count: 0,
        }
    }

    /// Returns the rendered text.
    pub fn finish(self) -> Result<String, WriteError> {
        if !self.stack.is_empty() {
            return Err(WriteError::UnclosedContainer(self.stack.len()));
        }
        Ok(self.out)
    }

    fn newline_indent(&mut self, depth: usize) {
        self.out.push('\n');
        for _ in 0..depth {
            self.out.push_str(INDENT);
        }
    }

    /// Writes separators and the pending field name ahead of a value.
    fn begin_value(&mut self) -> Result<(), WriteError> {
        let depth = self.stack.len();
        let pretty = self.pretty;
        let Some(frame) = self.stack.last_mut() else {
            if self.top_count > 0 {
                self.out.push('\n');
            }
            self.top_count += 1;
            return Ok(());
        };

        let field = if frame.kind == ContainerType::Struct {
            Some(frame.pending.take().ok_or(WriteError::MissingFieldName)?)
        } else {
            None
        };
        let first = frame.count == 0;
        let kind = frame.kind;
        frame.count += 1;

        if !first {
            self.out.push(if kind == ContainerType::SExp { ' ' } else { ',' });
        }
        if pretty && kind != ContainerType::SExp {
            self.newline_indent(depth);
        }
        if let Some(name) = field {
            write_symbol_text(&mut self.out, &name);
            self.out.push(':');
            if pretty {
                self.out.push(' ');
            }
        }
        Ok(())
    }

    fn scalar(&mut self, text: &str) -> Result<(), WriteError> {
        self.begin_value()?;
        self.out.push_str(text);
        Ok(())
    }
}

impl IonWriter for TextWriter {
    fn write_null(&mut self) -> Result<(), WriteError> {
        self.scalar("null")
    }

    fn write_bool(&mut self, value: bool) -> Result<(), WriteError> {
        self.scalar(if value { "true" } else { "false" })
    }

    fn write_int(&mut self, value: i64) -> Result<(), WriteError> {
        self.scalar(&value.to_string())
    }

    fn write_float(&mut self, value: f64) -> Result<(), WriteError> {
        let text = if value.is_nan() {
            "nan".to_owned()
        } else if value.is_infinite() {
            if value > 0.0 { "+inf" } else { "-inf" }.to_owned()
        } else {
            format!("{value:e}")
        };
        self.scalar(&text)
    }

    fn write_decimal(&mut self, value: &BigDecimal) -> Result<(), WriteError> {
        self.scalar(&format_decimal(value))
    }

    fn write_timestamp(&mut self, value: &DateTime<FixedOffset>) -> Result<(), WriteError> {
        check_timestamp_range(value)?;
        self.scalar(&value.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }

    fn write_string(&mut self, value: &str) -> Result<(), WriteError> {
        self.begin_value()?;
        write_quoted(&mut self.out, value, '"');
        Ok(())
    }

    fn write_symbol(&mut self, value: &str) -> Result<(), WriteError> {
        self.begin_value()?;
        write_symbol_text(&mut self.out, value);
        Ok(())
    }

    fn write_blob(&mut self, value: &[u8]) -> Result<(), WriteError> {
        self.begin_value()?;
        self.out.push_str("{{");
        self.out
            .push_str(&base64::engine::general_purpose::STANDARD.encode(value));
        self.out.push_str("}}");
        Ok(())
    }

    fn write_field_name(&mut self, name: &str) -> Result<(), WriteError> {
        match self.stack.last_mut() {
            Some(frame) if frame.kind == ContainerType::Struct => {
                if frame.pending.is_some() {
                    return Err(WriteError::DanglingFieldName);
                }
                frame.pending = Some(name.to_owned());
                Ok(())
            }
            _ => Err(WriteError::FieldNameOutsideStruct),
        }
    }

    fn step_in(&mut self, container: ContainerType) -> Result<(), WriteError> {
        self.begin_value()?;
        self.out.push(match container {
            ContainerType::List => '[',
            ContainerType::SExp => '(',
            ContainerType::Struct => '{',
        });
        self.stack.push(Frame {
            kind: container,
            count: 0,
            pending: None,
        });
        Ok(())
    }

    fn step_out(&mut self) -> Result<(), WriteError> {
        let frame = self.stack.pop().ok_or(WriteError::StepOutAtTopLevel)?;
        if frame.pending.is_some() {
            return Err(WriteError::PendingFieldName(frame.kind));
        }
        if self.pretty && frame.count > 0 && frame.kind != ContainerType::SExp {
            self.newline_indent(self.stack.len());
        }
        self.out.push(match frame.kind {
            ContainerType::List => ']',
            ContainerType::SExp => ')',
            ContainerType::Struct => '}',
        });
        Ok(())
    }

    fn depth(&self) -> usize {
        self.stack.len()
    }
}

/// Formats a decimal so it always reads back as an Ion decimal.
///
/// Fractional values use a decimal point (`12.50`); everything else uses
/// the `d` exponent form (`5d0`, `12d3`), as do fractions that would need
/// more than [`MAX_LEADING_ZEROS`] zeros after the point (`1d-400`).
fn format_decimal(value: &BigDecimal) -> String {
    let (coefficient, scale) = value.as_bigint_and_exponent();
    let digits = coefficient.magnitude().to_string();
    if scale <= 0 || scale.unsigned_abs() > (digits.len() + MAX_LEADING_ZEROS) as u64 {
        return format!("{coefficient}d{}", -i128::from(scale));
    }
    let negative = coefficient.sign() == Sign::Minus;
    let scale = scale as usize;
    let mut out = String::with_capacity(digits.len() + scale + 3);
    if negative {
        out.push('-');
    }
    if digits.len() <= scale {
        out.push_str("0.");
        out.extend(std::iter::repeat('0').take(scale - digits.len()));
        out.push_str(&digits);
    } else {
        let (whole, fraction) = digits.split_at(digits.len() - scale);
        out.push_str(whole);
        out.push('.');
        out.push_str(fraction);
    }
    out
}

fn write_symbol_text(out: &mut String, text: &str) {
    if is_identifier(text) {
        out.push_str(text);
    } else {
        write_quoted(out, text, '\'');
    }
}

fn write_quoted(out: &mut String, text: &str, quote: char) {
    out.push(quote);
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\0"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if (c as u32) < 0x20 || c == '\u{7f}' => {
                let _ = write!(out, "\\x{:02x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
}

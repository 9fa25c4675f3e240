//! The structured writer capability shared by the binary and text writers.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Datelike, FixedOffset};

use crate::error::WriteError;

/// Ion container kinds accepted by [`IonWriter::step_in`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerType {
    List,
    SExp,
    Struct,
}

/// A stateful cursor that Ion values are written into, field by field and
/// element by element.
///
/// Inside a struct every value must be preceded by [`write_field_name`];
/// outside a struct a field name is an error. Containers are opened with
/// [`step_in`] and closed with [`step_out`].
///
/// [`write_field_name`]: IonWriter::write_field_name
/// [`step_in`]: IonWriter::step_in
/// [`step_out`]: IonWriter::step_out
pub trait IonWriter {
    fn write_null(&mut self) -> Result<(), WriteError>;
    fn write_bool(&mut self, value: bool) -> Result<(), WriteError>;
    fn write_int(&mut self, value: i64) -> Result<(), WriteError>;
    fn write_float(&mut self, value: f64) -> Result<(), WriteError>;
    fn write_decimal(&mut self, value: &BigDecimal) -> Result<(), WriteError>;
    fn write_timestamp(&mut self, value: &DateTime<FixedOffset>) -> Result<(), WriteError>;
    fn write_string(&mut self, value: &str) -> Result<(), WriteError>;
    fn write_symbol(&mut self, value: &str) -> Result<(), WriteError>;
    fn write_blob(&mut self, value: &[u8]) -> Result<(), WriteError>;

    /// Sets the field name for the next value written inside a struct.
    fn write_field_name(&mut self, name: &str) -> Result<(), WriteError>;

    fn step_in(&mut self, container: ContainerType) -> Result<(), WriteError>;
    fn step_out(&mut self) -> Result<(), WriteError>;

    /// Number of currently open containers.
    fn depth(&self) -> usize;
}

/// Rejects timestamps whose local or UTC year falls outside `1..=9999`.
pub(crate) fn check_timestamp_range(value: &DateTime<FixedOffset>) -> Result<(), WriteError> {
    for year in [value.year(), value.naive_utc().year()] {
        if !(1..=9999).contains(&year) {
            return Err(WriteError::TimestampOutOfRange(year));
        }
    }
    Ok(())
}

//! Error types for Ion writing and decoding.

use crate::writer::ContainerType;

/// Writer misuse, reported by every [`IonWriter`](crate::IonWriter) implementation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WriteError {
    #[error("field name written outside of a struct")]
    FieldNameOutsideStruct,
    #[error("struct field value written without a field name")]
    MissingFieldName,
    #[error("field name written twice without a value")]
    DanglingFieldName,
    #[error("step_out called at top level")]
    StepOutAtTopLevel,
    #[error("{0} container(s) still open")]
    UnclosedContainer(usize),
    #[error("{0:?} container closed while a field name is pending")]
    PendingFieldName(ContainerType),
    #[error("timestamp year {0} is outside 1..=9999")]
    TimestampOutOfRange(i32),
}

/// Failure while turning Ion (binary records or rendered text) back into values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("unexpected end of input")]
    EndOfInput,
    #[error("invalid Ion Binary Version Marker")]
    InvalidBvm,
    #[error("unknown symbol ID: {0}")]
    UnknownSymbol(u32),
    #[error("invalid UTF-8")]
    InvalidUtf8,
    #[error("unsupported float length: {0}")]
    UnsupportedFloatLen(usize),
    #[error("negative zero integer is illegal")]
    NegativeZero,
    #[error("invalid bool length: {0}")]
    InvalidBoolLen(u8),
    #[error("unsupported Ion type: 0x{0:01x}")]
    UnsupportedType(u8),
    #[error("annotation wrapper must have at least 3 bytes, got {0}")]
    AnnotationTooShort(usize),
    #[error("container parsing error: incorrect length")]
    ContainerLengthMismatch,
    #[error("variable-length integer overflow")]
    VarIntOverflow,
    #[error("invalid timestamp")]
    InvalidTimestamp,
    #[error("containers nested more than {} levels deep", crate::constants::MAX_DEPTH)]
    NestingTooDeep,
    /// Rendered text could not be reconstructed into values.
    #[error("malformed result at byte {offset}: {message}")]
    Malformed { offset: usize, message: String },
}

impl DecodeError {
    pub(crate) fn malformed(offset: usize, message: impl Into<String>) -> Self {
        DecodeError::Malformed {
            offset,
            message: message.into(),
        }
    }
}

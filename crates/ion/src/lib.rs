//! Amazon Ion codec for ledger documents and query results.
//!
//! - [`Value`]: the JSON-like value model (plus decimals, timestamps, blobs)
//! - [`IonWriter`]: the structured writer capability, implemented by
//!   [`BinaryWriter`] and [`TextWriter`]
//! - [`encode`]: value → Ion binary, for statement parameters
//! - [`decode_records`] / [`decode_text`]: query results → JSON, parsed
//!   structurally by [`BinaryReader`] and [`TextReader`]

mod constants;
mod decode;
mod encode;
mod error;
mod value;

pub mod binary;
pub mod symbols;
pub mod text;
pub mod writer;

pub use binary::{BinaryReader, BinaryWriter};
pub use decode::{decode_binary, decode_records, decode_text, field_names, fold_records};
pub use encode::{encode, encode_pretty, encode_text, write_value};
pub use error::{DecodeError, WriteError};
pub use symbols::SymbolTable;
pub use text::{TextReader, TextWriter};
pub use value::Value;
pub use writer::{ContainerType, IonWriter};

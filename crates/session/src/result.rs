//! Statement results as returned by a session.

use ledger_ion::{decode_records, BinaryReader, DecodeError, TextWriter, Value};
use serde_json::Value as JsonValue;

use crate::error::Error;

/// The rows a statement produced, one binary Ion record per row.
///
/// Consumed by value: a result set is read exactly once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    records: Vec<Vec<u8>>,
}

impl ResultSet {
    pub fn new(records: Vec<Vec<u8>>) -> Self {
        Self { records }
    }

    /// Encodes each value as one record.
    pub fn from_values<'a, I>(values: I) -> Result<Self, ledger_ion::WriteError>
    where
        I: IntoIterator<Item = &'a Value>,
    {
        let records = values
            .into_iter()
            .map(ledger_ion::encode)
            .collect::<Result<_, _>>()?;
        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<Vec<u8>> {
        self.records
    }

    /// Decodes every record into values, in row order.
    pub fn into_values(self) -> Result<Vec<Value>, DecodeError> {
        let mut values = Vec::with_capacity(self.records.len());
        for record in &self.records {
            values.extend(BinaryReader::read_all(record)?);
        }
        Ok(values)
    }

    /// Decodes the rows into JSON: `None` for no rows, the row itself for one,
    /// an array for several.
    pub fn into_json(self) -> Result<Option<JsonValue>, DecodeError> {
        decode_records(self.records.iter().map(Vec::as_slice))
    }

    /// Renders every row as indented Ion text, one row after another.
    pub fn render_pretty(&self) -> Result<String, Error> {
        let mut writer = TextWriter::pretty();
        for record in &self.records {
            for value in BinaryReader::read_all(record)? {
                ledger_ion::write_value(&value, &mut writer)?;
            }
        }
        Ok(writer.finish()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows() -> ResultSet {
        ResultSet::from_values(&[
            Value::structure([("name", Value::Str("a".into()))]),
            Value::structure([("name", Value::Str("b".into()))]),
        ])
        .unwrap()
    }

    #[test]
    fn empty_result_is_no_value() {
        let set = ResultSet::default();
        assert!(set.is_empty());
        assert_eq!(set.into_json().unwrap(), None);
    }

    #[test]
    fn rows_fold_into_an_array() {
        let set = rows();
        assert_eq!(set.len(), 2);
        assert_eq!(
            set.into_json().unwrap(),
            Some(json!([{"name": "a"}, {"name": "b"}]))
        );
    }

    #[test]
    fn pretty_rendering_decodes_back() {
        let text = rows().render_pretty().unwrap();
        assert_eq!(text, "{\n  name: \"a\"\n}\n{\n  name: \"b\"\n}");
        assert_eq!(
            ledger_ion::decode_text(&text).unwrap(),
            rows().into_json().unwrap()
        );
    }

    #[test]
    fn corrupt_record_is_a_decode_error() {
        let set = ResultSet::new(vec![vec![0xe0, 0x01, 0x00, 0xea, 0x12]]);
        assert_eq!(set.into_values(), Err(DecodeError::InvalidBoolLen(2)));
    }
}

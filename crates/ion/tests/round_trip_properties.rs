use bigdecimal::BigDecimal;
use chrono::{DateTime, FixedOffset};
use ledger_ion::{
    decode_text, encode, encode_pretty, encode_text, field_names, BinaryReader, TextReader, Value,
};
use num_bigint::BigInt;
use proptest::prelude::*;

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        (any::<i64>(), -12i64..12)
            .prop_map(|(digits, scale)| Value::Decimal(BigDecimal::new(BigInt::from(digits), scale))),
        ".*".prop_map(Value::Str),
        proptest::collection::vec(any::<u8>(), 0..32).prop_map(Value::Blob),
        (
            -60_000_000_000i64..250_000_000_000,
            0u32..1_000_000_000,
            -1439i32..1440,
        )
            .prop_map(|(secs, nanos, minutes)| {
                let offset = FixedOffset::east_opt(minutes * 60).unwrap();
                let utc = DateTime::from_timestamp(secs, nanos).unwrap();
                Value::Timestamp(utc.with_timezone(&offset))
            }),
    ]
}

fn value() -> impl Strategy<Value = Value> {
    leaf().prop_recursive(4, 64, 8, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 0..8).prop_map(Value::List),
            proptest::collection::vec((".*", inner), 0..8).prop_map(Value::Struct),
        ]
    })
}

fn record() -> impl Strategy<Value = Value> {
    proptest::collection::vec(("[a-z]{1,6}", value()), 0..6).prop_map(Value::Struct)
}

proptest! {
    /// Every value the binary writer produces reads back unchanged.
    #[test]
    fn binary_round_trip(value in value()) {
        let bytes = encode(&value).unwrap();
        prop_assert_eq!(BinaryReader::read_all(&bytes).unwrap(), vec![value]);
    }

    /// Compact and pretty text both parse back to the written value.
    #[test]
    fn text_round_trip(value in value()) {
        let compact = encode_text(&value).unwrap();
        prop_assert_eq!(TextReader::read_all(&compact).unwrap(), vec![value.clone()]);
        let pretty = encode_pretty(&value).unwrap();
        prop_assert_eq!(TextReader::read_all(&pretty).unwrap(), vec![value]);
    }

    /// A concatenation of rendered records decodes to one JSON element per record.
    #[test]
    fn rendered_records_fold_in_order(records in proptest::collection::vec(record(), 0..5)) {
        let rendered: Vec<String> = records.iter().map(|r| encode_pretty(r).unwrap()).collect();
        let decoded = decode_text(&rendered.join("\n")).unwrap();
        match records.len() {
            0 => prop_assert_eq!(decoded, None),
            1 => prop_assert_eq!(decoded, Some(records[0].to_json())),
            _ => prop_assert_eq!(
                decoded,
                Some(serde_json::Value::Array(records.iter().map(Value::to_json).collect()))
            ),
        }
    }

    /// Field names never repeat, however often they occur.
    #[test]
    fn field_names_are_distinct(records in proptest::collection::vec(record(), 0..5)) {
        let names = field_names(&records);
        let mut sorted = names.clone();
        sorted.sort();
        sorted.dedup();
        prop_assert_eq!(sorted.len(), names.len());
    }
}

use ledger_ion::{decode_records, decode_text, encode, encode_pretty, DecodeError, TextReader, Value};
use serde_json::json;

#[test]
fn concatenated_structs_become_an_array() {
    assert_eq!(
        decode_text("{a:1}{a:2}").unwrap(),
        Some(json!([{"a": 1}, {"a": 2}]))
    );
}

#[test]
fn single_record_is_not_wrapped() {
    assert_eq!(
        decode_text("{\n  name: \"x\",\n  n: 2\n}").unwrap(),
        Some(json!({"name": "x", "n": 2}))
    );
}

#[test]
fn blank_results_are_no_value() {
    assert_eq!(decode_text("").unwrap(), None);
    assert_eq!(decode_text("   \n  ").unwrap(), None);
    assert_eq!(decode_records(Vec::<&[u8]>::new()).unwrap(), None);
}

#[test]
fn colliding_field_names_survive() {
    assert_eq!(
        decode_text("{id:1,identity:2}").unwrap(),
        Some(json!({"id": 1, "identity": 2}))
    );
    assert_eq!(
        decode_text("{id:1,uid:2}").unwrap(),
        Some(json!({"id": 1, "uid": 2}))
    );
}

#[test]
fn awkward_field_names_round_trip_through_pretty_text() {
    let record = Value::structure([
        ("a:b", Value::Int(1)),
        ("x,y", Value::Str("}{".into())),
        ("say \"hi\"", Value::Bool(true)),
        ("it's", Value::List(vec![Value::structure([("id", Value::Null)])])),
    ]);
    let rendered = encode_pretty(&record).unwrap();
    assert_eq!(
        decode_text(&rendered).unwrap(),
        Some(json!({
            "a:b": 1,
            "x,y": "}{",
            "say \"hi\"": true,
            "it's": [{"id": null}]
        }))
    );
}

#[test]
fn nested_records_from_binary() {
    let first = encode(&Value::structure([
        ("id", Value::Str("doc-1".into())),
        (
            "data",
            Value::structure([
                ("vin", Value::Str("1N4AL11D75C109151".into())),
                ("owners", Value::List(vec![Value::Str("a".into()), Value::Str("b".into())])),
            ]),
        ),
        ("version", Value::Int(0)),
    ]))
    .unwrap();
    let second = encode(&Value::structure([
        ("id", Value::Str("doc-1".into())),
        ("version", Value::Int(1)),
    ]))
    .unwrap();
    assert_eq!(
        decode_records([first.as_slice(), second.as_slice()]).unwrap(),
        Some(json!([
            {
                "id": "doc-1",
                "data": {"vin": "1N4AL11D75C109151", "owners": ["a", "b"]},
                "version": 0
            },
            {"id": "doc-1", "version": 1}
        ]))
    );
}

#[test]
fn ion_specific_scalars_map_to_json() {
    let text = "{d: 12.50, big: 18446744073709551615, ts: 2021-06-01T10:00:00Z, blob: {{AQI=}}, \
                sym: abc, f: nan, list: (1 2)}";
    assert_eq!(
        decode_text(text).unwrap(),
        Some(json!({
            "d": 12.5,
            "big": 18446744073709551615u64,
            "ts": "2021-06-01T10:00:00Z",
            "blob": "AQI=",
            "sym": "abc",
            "f": null,
            "list": [1, 2]
        }))
    );
}

#[test]
fn duplicate_fields_keep_the_last_value() {
    assert_eq!(decode_text("{a:1,a:2}").unwrap(), Some(json!({"a": 2})));
}

#[test]
fn malformed_text_is_an_error() {
    for text in ["{a:1", "{a:1}}", "[1 2]", "{a:}", "\"unterminated"] {
        assert!(
            matches!(decode_text(text), Err(DecodeError::Malformed { .. })),
            "{text:?} should be malformed"
        );
    }
}

#[test]
fn text_reader_yields_values_lazily() {
    let mut reader = TextReader::new("1 2 3");
    assert_eq!(reader.next_value().unwrap(), Some(Value::Int(1)));
    assert_eq!(reader.by_ref().count(), 2);
}

#[test]
fn deeply_nested_results_are_rejected() {
    let text = "[".repeat(200_000) + &"]".repeat(200_000);
    assert!(matches!(decode_text(&text), Err(DecodeError::Malformed { .. })));
}

#[test]
fn huge_decimal_exponents_decode_promptly() {
    assert_eq!(
        decode_text("{amount: 1d100000000}").unwrap(),
        Some(json!({"amount": null}))
    );

    // 1d100000000 as a binary decimal
    let record: &[u8] = &[0xe0, 0x01, 0x00, 0xea, 0x55, 0x2f, 0x57, 0x42, 0x80, 0x01];
    assert_eq!(decode_records([record]).unwrap(), Some(json!(null)));
}

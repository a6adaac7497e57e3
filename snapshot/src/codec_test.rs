use serde_json::json;

use super::*;
use crate::model::{Anchor, Anchors, ConnectionTuple, ItemRecord, WHOLE_CONTAINER};

fn sample_snapshot() -> Snapshot {
    let mut choice = ItemRecord::new("exclusivechoice", 120.0, 40.5);
    choice.id = Some("choice-1".to_owned());
    choice.width = Some(64.0);
    choice.height = Some(64.0);
    choice.inputs = Some(Anchors::from(Anchor::LeftMiddle));
    choice.outputs = Some(Anchors::from([Anchor::TopCenter, Anchor::BottomCenter]));

    let mut mail = ItemRecord::new("mail", 10.0, 300.0);
    mail.id = Some("mail-1".to_owned());
    mail.overlay = true;
    mail.target_anchor = Some(Anchor::LeftMiddle);

    let mut custom = ItemRecord::new("custom", 0.0, 0.0);
    custom.id = Some("custom-1".to_owned());
    custom.div = Some("<b>start</b>".to_owned());
    custom.extra.insert("note".to_owned(), json!({"k": [1, 2.5, null]}));

    Snapshot {
        items: vec![choice, mail, custom],
        connections: vec![
            ConnectionTuple::new("choice-1", 0, "mail-1", WHOLE_CONTAINER),
            ConnectionTuple::new("custom-1", 0, "choice-1", 0),
        ],
    }
}

// =============================================================
// JsonCodec
// =============================================================

#[test]
fn json_round_trip_preserves_snapshot() {
    let codec = JsonCodec::default();
    let snap = sample_snapshot();
    let text = codec.encode(&snap).expect("encode");
    let back = codec.decode(&text).expect("decode");
    assert_eq!(back, snap);
}

#[test]
fn json_compact_is_single_line_and_pretty_is_not() {
    let snap = sample_snapshot();
    let compact = JsonCodec::default().encode(&snap).expect("encode");
    let pretty = JsonCodec::pretty().encode(&snap).expect("encode");
    assert!(!compact.contains('\n'));
    assert!(pretty.contains('\n'));
    assert_eq!(JsonCodec::default().decode(&pretty).expect("decode"), snap);
}

#[test]
fn json_wire_shape_uses_items_and_connection_arrays() {
    let text = JsonCodec::default().encode(&sample_snapshot()).expect("encode");
    let value: serde_json::Value = serde_json::from_str(&text).expect("json");
    assert_eq!(value["items"][0]["handle"], json!("exclusivechoice"));
    assert_eq!(value["items"][0]["outputs"], json!(["top-center", "bottom-center"]));
    assert_eq!(value["connections"][0], json!(["choice-1", 0, "mail-1", -1]));
}

#[test]
fn json_decode_is_whitespace_insensitive() {
    let text = "  {\n \"items\" : [ { \"handle\":\"db\", \"top\":1, \"left\":2 } ],\n \"connections\":[] }  ";
    let snap = JsonCodec::default().decode_str(text).expect("decode");
    assert_eq!(snap.items.len(), 1);
}

#[test]
fn json_decode_malformed_text_is_syntax_error() {
    let err = JsonCodec::default().decode_str("{\"items\": [").expect_err("should fail");
    assert!(matches!(err, CodecError::Syntax(_)));
}

#[test]
fn json_decode_wrong_shape_is_shape_error() {
    let err = JsonCodec::default().decode_str("{\"items\": 42}").expect_err("should fail");
    assert!(matches!(err, CodecError::Shape(_)));

    let err = JsonCodec::default().decode_str("[1, 2, 3]").expect_err("should fail");
    assert!(matches!(err, CodecError::Shape(_)));
}

// =============================================================
// ProtoCodec
// =============================================================

#[test]
fn proto_round_trip_preserves_snapshot() {
    let snap = sample_snapshot();
    let bytes = ProtoCodec.encode(&snap).expect("encode");
    assert!(!bytes.is_empty());
    let back = ProtoCodec.decode(&bytes).expect("decode");
    assert_eq!(back, snap);
}

#[test]
fn proto_round_trip_of_empty_snapshot() {
    let bytes = ProtoCodec.encode(&Snapshot::default()).expect("encode");
    assert_eq!(ProtoCodec.decode(&bytes).expect("decode"), Snapshot::default());
}

#[test]
fn proto_decode_rejects_malformed_bytes() {
    let err = ProtoCodec.decode_bytes(&[0xff, 0x00, 0x01]).expect_err("bytes should fail");
    assert!(matches!(err, CodecError::Decode(_)));
}

#[test]
fn proto_decode_rejects_unknown_version() {
    let wire = WireSnapshot { version: 99, data: Some(json_to_proto_value(&json!({}))) };
    let err = ProtoCodec.decode_bytes(&wire.encode_to_vec()).expect_err("version should fail");
    assert!(matches!(err, CodecError::UnsupportedVersion(99)));
}

#[test]
fn proto_decode_missing_payload_is_shape_error() {
    let wire = WireSnapshot { version: SNAPSHOT_WIRE_VERSION, data: None };
    let err = ProtoCodec.decode_bytes(&wire.encode_to_vec()).expect_err("payload should fail");
    assert!(matches!(err, CodecError::Shape(_)));
}

#[test]
fn integral_numbers_come_back_as_integers() {
    assert_eq!(number_to_json(3.0), json!(3));
    assert_eq!(number_to_json(-1.0), json!(-1));
    assert_eq!(number_to_json(2.5), json!(2.5));
    assert_eq!(number_to_json(f64::NAN), serde_json::Value::Null);
}

#[test]
fn proto_value_conversion_preserves_nested_json() {
    let value = json!({"a": [true, "s", null, {"b": 1.5}]});
    assert_eq!(proto_to_json_value(&json_to_proto_value(&value)), value);
}

use epcis_canonical::{
    compute_event_hash, verify_event_hash, CanonicalizationError, Canonicalizer, CaptureId,
    EventHash, TimeZoneOffset, Timestamp, ValidationError,
};
use serde_json::json;

fn sample_event() -> serde_json::Value {
    json!({
        "type": "ObjectEvent",
        "eventTime": "2005-04-03T20:33:31.116-06:00",
        "eventTimeZoneOffset": "-06:00",
        "action": "OBSERVE",
        "epcList": ["urn:epc:id:sgtin:0614141.107346.2017"],
        "quantityList": [{ "epcClass": "urn:epc:class:lgtin:4012345.012345.998877", "quantity": 200, "uom": "KGM" }],
        "bizStep": "shipping"
    })
}

#[test]
fn canonicalizer_produces_ordered_bytes() {
    let canonicalizer = Canonicalizer::new();
    let value = json!({"b": 1, "a": {"nested": 2}});
    let bytes = canonicalizer.canonicalize(&value).unwrap();
    assert_eq!(bytes, br#"{"a":{"nested":2},"b":1}"#.to_vec());
}

#[test]
fn canonicalizer_rejects_embedded_nul() {
    let canonicalizer = Canonicalizer::new();
    let value = json!({"a": ["ok", "bad\u{0}"]});
    let err = canonicalizer.canonicalize(&value).unwrap_err();
    match err {
        CanonicalizationError::InvalidStructure(msg) => assert!(msg.starts_with("a.[1]")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn event_hash_has_ni_form() {
    let hash = compute_event_hash(&sample_event(), &Canonicalizer::new()).unwrap();
    assert!(hash.as_str().starts_with("ni:///sha-256;"));
    assert!(hash.as_str().ends_with("?ver=CBV2.0"));
    assert_eq!(hash.hex_digest().len(), 64);
}

#[test]
fn event_hash_ignores_repository_assigned_fields() {
    let canonicalizer = Canonicalizer::new();
    let base = compute_event_hash(&sample_event(), &canonicalizer).unwrap();

    let mut decorated = sample_event();
    decorated["eventID"] = json!("urn:uuid:6f3c1a6e-3a0f-4b7e-9b44-0c7a1c3a2b10");
    decorated["recordTime"] = json!("2024-01-01T00:00:00Z");
    decorated["captureID"] = json!("capture-1");
    decorated["sequenceInDocument"] = json!(3);
    decorated["errorDeclaration"] = json!({ "declarationTime": "2024-01-02T00:00:00Z" });

    assert_eq!(compute_event_hash(&decorated, &canonicalizer).unwrap(), base);
}

#[test]
fn event_hash_is_key_order_independent() {
    let canonicalizer = Canonicalizer::new();
    let a = json!({"type": "ObjectEvent", "action": "ADD", "epcList": ["x:1"]});
    let b = json!({"epcList": ["x:1"], "action": "ADD", "type": "ObjectEvent"});
    assert_eq!(
        compute_event_hash(&a, &canonicalizer).unwrap(),
        compute_event_hash(&b, &canonicalizer).unwrap()
    );
}

#[test]
fn event_hash_changes_with_content() {
    let canonicalizer = Canonicalizer::new();
    let mut changed = sample_event();
    changed["bizStep"] = json!("receiving");
    assert_ne!(
        compute_event_hash(&sample_event(), &canonicalizer).unwrap(),
        compute_event_hash(&changed, &canonicalizer).unwrap()
    );
}

#[test]
fn verify_event_hash_detects_tampering() {
    let canonicalizer = Canonicalizer::new();
    let hash = compute_event_hash(&sample_event(), &canonicalizer).unwrap();
    assert!(verify_event_hash(&sample_event(), &hash, &canonicalizer).unwrap());

    let mut tampered = sample_event();
    tampered["action"] = json!("DELETE");
    assert!(!verify_event_hash(&tampered, &hash, &canonicalizer).unwrap());
}

#[test]
fn event_hash_rejects_non_objects() {
    assert!(compute_event_hash(&json!(["a"]), &Canonicalizer::new()).is_err());
}

#[test]
fn newtypes_validate_literals() {
    assert!(Timestamp::parse("2005-04-03T20:33:31.116-06:00").is_ok());
    assert!(Timestamp::parse("2024-01-01T00:00:00Z").is_ok());
    assert!(Timestamp::parse("2024-01-01 00:00:00").is_err());

    assert!(TimeZoneOffset::parse("+14:00").is_ok());
    assert!(TimeZoneOffset::parse("-06:00").is_ok());
    assert!(TimeZoneOffset::parse("+15:00").is_err());

    assert!(CaptureId::parse("capture-2024.01").is_ok());
    assert_eq!(
        CaptureId::parse(""),
        Err(ValidationError::Empty { field: "CaptureId" })
    );

    assert!(EventHash::parse("ni:///sha-256;abc?ver=CBV2.0").is_err());
}

#[test]
fn newtypes_serialize_transparently() {
    let ts = Timestamp::parse("2024-01-01T00:00:00Z").unwrap();
    assert_eq!(serde_json::to_string(&ts).unwrap(), r#""2024-01-01T00:00:00Z""#);
}

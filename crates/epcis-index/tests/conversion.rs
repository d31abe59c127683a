use epcis_core::{
    CaptureId, CbvFormat, ContextEntry, EpcFormat, EpcisEvent, FormatPreference, Timestamp,
};
use epcis_index::{
    to_core, to_indexed, CaptureMetadata, ConversionOptions, ConvertError, IndexedEvent,
    SCHEMA_VERSION,
};
use serde_json::{json, Value};

const SGTIN_URN: &str = "urn:epc:id:sgtin:0614141.107346.2017";
const SGTIN_DL: &str = "https://id.gs1.org/01/10614141073464/21/2017";
const SGLN_URN: &str = "urn:epc:id:sgln:0614141.07346.1234";
const SGLN_DL: &str = "https://id.gs1.org/414/0614141073467/254/1234";
const LGTIN_URN: &str = "urn:epc:class:lgtin:4012345.012345.998877";
const LGTIN_DL: &str = "https://id.gs1.org/01/04012345123456/10/998877";
const UUID: &str = "urn:uuid:6f3c1a6e-3a0f-4b7e-9b44-0c7a1c3a2b10";

fn captured(value: Value) -> EpcisEvent {
    let event: EpcisEvent = serde_json::from_value(value).unwrap();
    event
        .with_identity(CaptureId::parse("capture-0001").unwrap(), 0)
        .unwrap()
}

/// Attaches a syntactically valid identity without hashing the content.
fn stamped(mut value: Value) -> EpcisEvent {
    value["hash"] = json!(format!("ni:///sha-256;{}?ver=CBV2.0", "0".repeat(64)));
    value["captureID"] = json!("capture-0001");
    value["sequenceInDocument"] = json!(0);
    serde_json::from_value(value).unwrap()
}

fn metadata() -> CaptureMetadata {
    CaptureMetadata::new(Timestamp::parse("2024-03-01T12:00:00Z").unwrap())
}

fn object_event() -> Value {
    json!({
        "type": "ObjectEvent",
        "eventTime": "2024-03-01T10:00:00.000Z",
        "eventTimeZoneOffset": "+01:00",
        "action": "OBSERVE",
        "bizStep": "shipping",
        "disposition": "in_transit",
        "epcList": [SGTIN_URN],
        "quantityList": [{"epcClass": LGTIN_URN, "quantity": 200, "uom": "KGM"}],
        "readPoint": {"id": SGLN_URN, "example:dock": "7"},
        "bizLocation": {"id": SGLN_URN},
        "bizTransactionList": [
            {"type": "po", "bizTransaction": "urn:epcglobal:cbv:bt:0614141073467:1152"}
        ],
        "sourceList": [{"type": "owning_party", "source": "urn:epc:id:pgln:0614141.00000"}],
        "sensorElementList": [{
            "sensorMetadata": {"time": "2024-03-01T09:59:00Z"},
            "sensorReport": [{"type": "gs1:Temperature", "value": 4.5, "uom": "CEL"}],
            "example:sensorSerial": "a1"
        }],
        "persistentDisposition": {"set": ["completeness_verified"], "unset": ["completeness_inferred"]},
        "ilmd": {"example:bestBefore": "2024-06-01"},
        "example:batchNote": {"@value": "night shift"}
    })
}

fn every_variant() -> Vec<Value> {
    vec![
        object_event(),
        json!({
            "type": "AggregationEvent",
            "eventTime": "2024-03-01T10:00:00Z",
            "eventTimeZoneOffset": "+00:00",
            "action": "ADD",
            "bizStep": "packing",
            "parentID": "urn:epc:id:sscc:0614141.1234567890",
            "childEPCs": [SGTIN_URN],
            "childQuantityList": [{"epcClass": "urn:epc:idpat:sgtin:4012345.012345.*", "quantity": 5}]
        }),
        json!({
            "type": "TransactionEvent",
            "eventTime": "2024-03-01T10:00:00Z",
            "eventTimeZoneOffset": "+00:00",
            "action": "ADD",
            "bizStep": "shipping",
            "epcList": [SGTIN_DL],
            "bizTransactionList": [{"type": "inv", "bizTransaction": "urn:epcglobal:cbv:bt:0614141073467:7"}]
        }),
        json!({
            "type": "TransformationEvent",
            "eventTime": "2024-03-01T10:00:00Z",
            "eventTimeZoneOffset": "-05:00",
            "inputEPCList": [SGTIN_URN],
            "outputQuantityList": [{"epcClass": LGTIN_URN, "quantity": 12.5, "uom": "KGM"}],
            "transformationID": "urn:uuid:2b0e8e2c-1c49-4c2f-9c6a-3e5d7f6a1b20",
            "errorDeclaration": {
                "declarationTime": "2024-03-02T08:00:00Z",
                "reason": "incorrect_data",
                "correctiveEventIDs": ["urn:uuid:0b5f4c1e-7d8b-4a57-9f63-2c3f4f9e0a11"],
                "example:ticket": "SR-42"
            }
        }),
        json!({
            "type": "AssociationEvent",
            "eventTime": "2024-03-01T10:00:00Z",
            "eventTimeZoneOffset": "+00:00",
            "action": "ADD",
            "parentID": "urn:epc:id:grai:0614141.12345.400",
            "childEPCs": ["urn:epc:id:giai:0614141.12345400"],
            "destinationList": [{"type": "location", "destination": SGLN_URN}]
        }),
    ]
}

#[test]
fn every_variant_round_trips_as_captured() {
    for value in every_variant() {
        let event = captured(value);
        let doc = to_indexed(&event, &metadata()).unwrap();
        let back = to_core(&doc, &ConversionOptions::as_captured()).unwrap();
        assert_eq!(back, event, "round trip of {}", event.event_type());
    }
}

#[test]
fn round_trip_survives_storage_serialization() {
    let event = captured(object_event());
    let doc = to_indexed(&event, &metadata()).unwrap();
    let stored = serde_json::to_string(&doc).unwrap();
    let reloaded = IndexedEvent::from_json(&stored).unwrap();
    assert_eq!(reloaded, doc);
    assert_eq!(
        to_core(&reloaded, &ConversionOptions::default()).unwrap(),
        event
    );
}

#[test]
fn indexed_document_holds_both_forms() {
    let mut value = object_event();
    value["epcList"] = json!([SGTIN_URN, UUID]);
    let doc = to_indexed(&captured(value), &metadata()).unwrap();

    assert_eq!(doc.schema_version, SCHEMA_VERSION);
    assert_eq!(doc.epc_list[0].normalized, SGTIN_DL);
    assert_eq!(doc.epc_list[0].as_captured, SGTIN_URN);
    assert_eq!(doc.epc_list[1].normalized, UUID);
    assert_eq!(doc.quantity_list[0].epc_class.normalized, LGTIN_DL);
    assert_eq!(doc.read_point.as_ref().unwrap().normalized, SGLN_DL);

    let biz_step = doc.biz_step.as_ref().unwrap();
    assert_eq!(biz_step.normalized, "urn:epcglobal:cbv:bizstep:shipping");
    assert_eq!(biz_step.as_captured, "shipping");
    assert_eq!(
        doc.biz_transaction_list[0].kind.as_ref().unwrap().normalized,
        "urn:epcglobal:cbv:btt:po"
    );
    assert_eq!(
        doc.sensor_element_list[0].sensor_report[0]
            .kind
            .as_ref()
            .unwrap()
            .normalized,
        "https://gs1.org/voc/Temperature"
    );
    assert_eq!(
        doc.persistent_disposition.as_ref().unwrap().set[0].normalized,
        "urn:epcglobal:cbv:disp:completeness_verified"
    );
}

#[test]
fn referenced_identifiers_are_indexed() {
    let mut value = object_event();
    value["epcList"] = json!([SGTIN_URN, UUID, SGTIN_DL]);
    let doc = to_indexed(&captured(value), &metadata()).unwrap();
    assert_eq!(
        doc.epcs,
        vec![SGTIN_DL.to_string(), UUID.to_string(), LGTIN_DL.to_string()]
    );
    assert_eq!(doc.epcs_as_captured.len(), 4);
    assert!(doc.epcs_as_captured.contains(&SGTIN_URN.to_string()));
}

#[test]
fn inner_extensions_are_keyed_by_path() {
    let doc = to_indexed(&captured(object_event()), &metadata()).unwrap();
    assert_eq!(doc.inner_user_extensions["readPoint"]["example:dock"], json!("7"));
    assert_eq!(
        doc.inner_user_extensions["sensorElementList.0"]["example:sensorSerial"],
        json!("a1")
    );
    assert!(!doc.inner_user_extensions.contains_key("bizLocation"));
    assert_eq!(doc.user_extensions["example:batchNote"], json!({"@value": "night shift"}));
}

#[test]
fn stored_field_names() {
    let doc = to_indexed(&captured(object_event()), &metadata()).unwrap();
    let value = serde_json::to_value(&doc).unwrap();
    assert_eq!(value["type"], json!("ObjectEvent"));
    assert_eq!(value["captureID"], json!("capture-0001"));
    assert_eq!(value["metadata"]["capturedBy"]["captureID"], json!("capture-0001"));
    assert_eq!(value["epcList"][0]["asCaptured"], json!(SGTIN_URN));
    assert!(value.get("epcsAsCaptured").is_some());
    assert!(value.get("innerUserExtensions").is_some());
}

#[test]
fn provenance_stays_in_the_indexed_document() {
    let meta = metadata().with_user("alice").with_group("receiving").hidden();
    let event = captured(object_event());
    let doc = to_indexed(&event, &meta).unwrap();

    let provenance = doc.provenance();
    assert_eq!(provenance.captured_by.user_id.as_deref(), Some("alice"));
    assert_eq!(provenance.captured_by.default_group.as_deref(), Some("receiving"));
    assert_eq!(provenance.captured_by.capture_id.as_str(), "capture-0001");
    assert!(!provenance.visible);

    let back = serde_json::to_value(to_core(&doc, &ConversionOptions::default()).unwrap()).unwrap();
    assert!(back.get("metadata").is_none());
}

#[test]
fn preference_renders_requested_formats() {
    let event = captured(object_event());
    let doc = to_indexed(&event, &metadata()).unwrap();

    let options = ConversionOptions::default().with_preference(FormatPreference::new(
        Some(EpcFormat::AlwaysGs1DigitalLink),
        Some(CbvFormat::AlwaysWebUri),
    ));
    let value = serde_json::to_value(to_core(&doc, &options).unwrap()).unwrap();
    assert_eq!(value["epcList"][0], json!(SGTIN_DL));
    assert_eq!(value["readPoint"]["id"], json!(SGLN_DL));
    assert_eq!(value["quantityList"][0]["epcClass"], json!(LGTIN_DL));
    assert_eq!(value["bizStep"], json!("https://ref.gs1.org/cbv/BizStep-shipping"));
    assert_eq!(value["disposition"], json!("https://ref.gs1.org/cbv/Disp-in_transit"));
    assert_eq!(value["readPoint"]["example:dock"], json!("7"));

    let options = ConversionOptions::default().with_preference(FormatPreference::new(
        Some(EpcFormat::AlwaysEpcUrn),
        Some(CbvFormat::AlwaysUrn),
    ));
    let value = serde_json::to_value(to_core(&doc, &options).unwrap()).unwrap();
    assert_eq!(value["epcList"][0], json!(SGTIN_URN));
    assert_eq!(value["bizStep"], json!("urn:epcglobal:cbv:bizstep:shipping"));
}

#[test]
fn missing_preference_halves_take_defaults() {
    let doc = to_indexed(&captured(object_event()), &metadata()).unwrap();
    let empty = ConversionOptions::default().with_preference(FormatPreference::new(None, None));
    let explicit = ConversionOptions::default().with_preference(FormatPreference::new(
        Some(EpcFormat::AlwaysGs1DigitalLink),
        Some(CbvFormat::NoPreference),
    ));
    let a = to_core(&doc, &empty).unwrap();
    let b = to_core(&doc, &explicit).unwrap();
    assert_eq!(a, b);
    let value = serde_json::to_value(a).unwrap();
    assert_eq!(value["epcList"][0], json!(SGTIN_DL));
    assert_eq!(value["bizStep"], json!("urn:epcglobal:cbv:bizstep:shipping"));
}

#[test]
fn context_without_preference_translates_terms_only() {
    let mut value = object_event();
    value["bizStep"] = json!("pack");
    value["disposition"] = json!("ex:sealed");
    value["@context"] = json!([{"pack": "https://example.com/voc/pack", "ex": "https://example.com/voc/"}]);
    let doc = to_indexed(&captured(value), &metadata()).unwrap();
    assert_eq!(
        doc.biz_step.as_ref().unwrap().normalized,
        "https://example.com/voc/pack"
    );

    let options = ConversionOptions::default().with_context(vec![ContextEntry::define(
        "pack",
        "https://other.example.org/pack",
    )]);
    let value = serde_json::to_value(to_core(&doc, &options).unwrap()).unwrap();
    assert_eq!(value["epcList"][0], json!(SGTIN_URN));
    assert_eq!(value["bizStep"], json!("https://other.example.org/pack"));
    assert_eq!(value["disposition"], json!("ex:sealed"));

    let stored = ConversionOptions::default().with_preference(FormatPreference::new(
        None,
        Some(CbvFormat::AlwaysUrn),
    ));
    let value = serde_json::to_value(to_core(&doc, &stored).unwrap()).unwrap();
    assert_eq!(value["bizStep"], json!("https://example.com/voc/pack"));
    assert_eq!(value["disposition"], json!("https://example.com/voc/sealed"));
}

#[test]
fn biz_step_resolves_alike_across_variants() {
    let preference = ConversionOptions::default().with_preference(FormatPreference::new(
        None,
        Some(CbvFormat::AlwaysWebUri),
    ));
    let rendered: Vec<Value> = every_variant()
        .into_iter()
        .filter(|v| v["bizStep"] == json!("shipping"))
        .map(|v| {
            let doc = to_indexed(&captured(v), &metadata()).unwrap();
            serde_json::to_value(to_core(&doc, &preference).unwrap()).unwrap()["bizStep"].clone()
        })
        .collect();
    assert_eq!(rendered.len(), 2);
    assert!(rendered
        .iter()
        .all(|v| v == &json!("https://ref.gs1.org/cbv/BizStep-shipping")));
}

#[test]
fn non_gs1_identifier_cannot_be_rendered_as_digital_link() {
    let mut value = object_event();
    value["epcList"] = json!(["urn:epc:id:gid:95100000.12345.400"]);
    let doc = to_indexed(&captured(value), &metadata()).unwrap();
    assert_eq!(doc.epc_list[0].normalized, "urn:epc:id:gid:95100000.12345.400");

    let options = ConversionOptions::default().with_preference(FormatPreference::new(
        Some(EpcFormat::AlwaysGs1DigitalLink),
        None,
    ));
    match to_core(&doc, &options) {
        Err(ConvertError::Resolve(err)) => assert!(err.is_format_conversion()),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn events_need_identity_before_indexing() {
    let event: EpcisEvent = serde_json::from_value(object_event()).unwrap();
    assert!(matches!(
        to_indexed(&event, &metadata()),
        Err(ConvertError::MissingIdentity("ObjectEvent"))
    ));
}

#[test]
fn malformed_content_is_rejected_at_capture() {
    let mut value = object_event();
    value["epcList"] = json!(["urn:epc:id:sgtin:0614141.107346"]);
    let err = to_indexed(&stamped(value), &metadata()).unwrap_err();
    assert!(err.is_validation(), "{:?}", err);

    let mut value = object_event();
    value["eventTimeZoneOffset"] = json!("CET");
    let err = to_indexed(&captured(value), &metadata()).unwrap_err();
    assert!(matches!(err, ConvertError::Validation(_)));

    let mut value = object_event();
    value["disposition"] = json!("in transit");
    let err = to_indexed(&stamped(value), &metadata()).unwrap_err();
    assert!(err.is_validation());
}

#[test]
fn stored_documents_are_checked() {
    let mut doc = to_indexed(&captured(object_event()), &metadata()).unwrap();
    doc.schema_version = SCHEMA_VERSION + 1;
    assert!(matches!(
        to_core(&doc, &ConversionOptions::default()),
        Err(ConvertError::InvalidIndexedDocument(_))
    ));

    let mut doc = to_indexed(&captured(object_event()), &metadata()).unwrap();
    doc.event_type = "QuantityEvent".into();
    assert!(matches!(
        to_core(&doc, &ConversionOptions::default()),
        Err(ConvertError::InvalidIndexedDocument(_))
    ));

    let mut doc = to_indexed(&captured(object_event()), &metadata()).unwrap();
    doc.action = None;
    assert!(matches!(
        to_core(&doc, &ConversionOptions::default()),
        Err(ConvertError::InvalidIndexedDocument(_))
    ));
}

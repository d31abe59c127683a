use epcis_core::{
    CaptureId, CoreError, DedupStrategy, EpcisDocument, EpcisEvent, IdentifierValue, IdentityError,
    ResolveContext,
};
use serde_json::{json, Value};

fn event(value: Value) -> EpcisEvent {
    serde_json::from_value(value).unwrap()
}

fn object_event() -> EpcisEvent {
    event(json!({
        "type": "ObjectEvent",
        "eventTime": "2024-03-01T10:00:00.000Z",
        "eventTimeZoneOffset": "+01:00",
        "action": "OBSERVE",
        "bizStep": "shipping",
        "disposition": "in_transit",
        "epcList": [
            "urn:epc:id:sgtin:0614141.107346.2017",
            "urn:epc:id:sgtin:0614141.107346.2018"
        ],
        "quantityList": [
            {"epcClass": "urn:epc:class:lgtin:4012345.012345.998877", "quantity": 200, "uom": "KGM"}
        ],
        "readPoint": {"id": "urn:epc:id:sgln:0614141.07346.1234"},
        "bizTransactionList": [
            {"type": "po", "bizTransaction": "urn:epcglobal:cbv:bt:0614141073467:1152"}
        ],
        "example:batchNote": {"@value": "night shift"}
    }))
}

fn capture_id() -> CaptureId {
    CaptureId::parse("capture-0001").unwrap()
}

#[test]
fn referenced_epcs_cover_lists_and_quantities() {
    let referenced: Vec<String> = object_event()
        .referenced_epcs()
        .into_iter()
        .map(|v| v.literal().to_string())
        .collect();
    assert_eq!(
        referenced,
        vec![
            "urn:epc:class:lgtin:4012345.012345.998877",
            "urn:epc:id:sgtin:0614141.107346.2017",
            "urn:epc:id:sgtin:0614141.107346.2018",
        ]
    );
}

#[test]
fn referenced_epcs_include_parent_and_children() {
    let agg = event(json!({
        "type": "AggregationEvent",
        "eventTime": "2024-03-01T10:00:00Z",
        "eventTimeZoneOffset": "+00:00",
        "action": "ADD",
        "parentID": "urn:epc:id:sscc:0614141.1234567890",
        "childEPCs": ["urn:epc:id:sgtin:0614141.107346.2017"],
        "childQuantityList": [{"epcClass": "urn:epc:idpat:sgtin:4012345.012345.*", "quantity": 5}]
    }));
    assert_eq!(agg.referenced_epcs().len(), 3);
    assert!(agg
        .referenced_epcs()
        .contains(&IdentifierValue::instance("urn:epc:id:sscc:0614141.1234567890")));
}

#[test]
fn dedup_strategies_differ_on_equivalent_syntaxes() {
    let transformation = event(json!({
        "type": "TransformationEvent",
        "eventTime": "2024-03-01T10:00:00Z",
        "eventTimeZoneOffset": "+00:00",
        "inputEPCList": [
            "urn:epc:id:sgtin:0614141.107346.2017",
            "https://id.gs1.org/01/10614141073464/21/2017"
        ],
        "outputEPCList": ["urn:uuid:6f3c1a6e-3a0f-4b7e-9b44-0c7a1c3a2b10"]
    }));
    let ctx = ResolveContext::default();

    let literal = transformation.referenced_epcs_with(DedupStrategy::CapturedLiteral, &ctx);
    assert_eq!(literal.len(), 3);

    let resolved = transformation.referenced_epcs_with(DedupStrategy::ResolvedForm, &ctx);
    assert_eq!(
        resolved
            .iter()
            .map(IdentifierValue::literal)
            .collect::<Vec<_>>(),
        vec![
            "urn:epc:id:sgtin:0614141.107346.2017",
            "urn:uuid:6f3c1a6e-3a0f-4b7e-9b44-0c7a1c3a2b10",
        ]
    );
}

#[test]
fn identity_is_assigned_once() {
    let assigned = object_event().with_identity(capture_id(), 0).unwrap();
    let identity = assigned.identity().unwrap();
    assert!(identity.hash.as_str().starts_with("ni:///sha-256;"));
    assert_eq!(identity.capture_id.as_str(), "capture-0001");
    assert_eq!(identity.sequence_in_document, 0);
    assert_eq!(
        assigned.base().event_id.as_deref(),
        Some(identity.hash.as_str())
    );
    assert!(assigned.verify_hash().unwrap());

    let err = assigned.with_identity(capture_id(), 1).unwrap_err();
    assert!(matches!(err, IdentityError::AlreadyAssigned(_)));
}

#[test]
fn explicit_event_id_is_kept() {
    let mut value = serde_json::to_value(object_event()).unwrap();
    value["eventID"] = json!("urn:uuid:0b5f4c1e-7d8b-4a57-9f63-2c3f4f9e0a11");
    let assigned = event(value).with_identity(capture_id(), 3).unwrap();
    assert_eq!(
        assigned.base().event_id.as_deref(),
        Some("urn:uuid:0b5f4c1e-7d8b-4a57-9f63-2c3f4f9e0a11")
    );
}

#[test]
fn hash_ignores_repository_fields_but_not_content() {
    let base = object_event().compute_hash().unwrap();

    let mut value = serde_json::to_value(object_event()).unwrap();
    value["recordTime"] = json!("2024-03-02T00:00:00Z");
    value["eventID"] = json!("urn:uuid:0b5f4c1e-7d8b-4a57-9f63-2c3f4f9e0a11");
    value["@context"] = json!(["https://ref.gs1.org/standards/epcis/epcis-context.jsonld"]);
    assert_eq!(event(value).compute_hash().unwrap(), base);

    let mut value = serde_json::to_value(object_event()).unwrap();
    value["epcList"][0] = json!("urn:epc:id:sgtin:0614141.107346.2099");
    assert_ne!(event(value).compute_hash().unwrap(), base);
}

#[test]
fn urn_and_digital_link_forms_hash_alike() {
    let base = object_event().compute_hash().unwrap();

    let mut value = serde_json::to_value(object_event()).unwrap();
    value["epcList"][0] = json!("https://id.gs1.org/01/10614141073464/21/2017");
    value["bizStep"] = json!("urn:epcglobal:cbv:bizstep:shipping");
    value["disposition"] = json!("https://ref.gs1.org/cbv/Disp-in_transit");
    value["bizTransactionList"][0]["type"] = json!("urn:epcglobal:cbv:btt:po");
    let rewritten = event(value);
    assert_eq!(rewritten.compute_hash().unwrap(), base);

    let assigned = object_event().with_identity(capture_id(), 0).unwrap();
    let mut value = serde_json::to_value(&assigned).unwrap();
    value["epcList"][0] = json!("https://id.gs1.org/01/10614141073464/21/2017");
    assert!(event(value).verify_hash().unwrap());
}

#[test]
fn single_epc_hashes_alike_in_both_syntaxes() {
    let urn = event(json!({
        "type": "ObjectEvent",
        "eventTime": "2024-03-01T10:00:00.000Z",
        "eventTimeZoneOffset": "+01:00",
        "action": "OBSERVE",
        "epcList": ["urn:epc:id:sgtin:0614141.107346.2017"]
    }));
    let digital_link = event(json!({
        "type": "ObjectEvent",
        "eventTime": "2024-03-01T10:00:00.000Z",
        "eventTimeZoneOffset": "+01:00",
        "action": "OBSERVE",
        "epcList": ["https://id.gs1.org/01/10614141073464/21/2017"]
    }));
    assert_eq!(
        urn.compute_hash().unwrap(),
        digital_link.compute_hash().unwrap()
    );
}

#[test]
fn context_defined_terms_hash_as_their_expansion() {
    let curie = event(json!({
        "@context": [{"ex": "https://example.com/voc/"}],
        "type": "ObjectEvent",
        "eventTime": "2024-03-01T10:00:00.000Z",
        "eventTimeZoneOffset": "+01:00",
        "action": "OBSERVE",
        "disposition": "ex:sealed",
        "epcList": ["urn:epc:id:sgtin:0614141.107346.2017"]
    }));
    let iri = event(json!({
        "type": "ObjectEvent",
        "eventTime": "2024-03-01T10:00:00.000Z",
        "eventTimeZoneOffset": "+01:00",
        "action": "OBSERVE",
        "disposition": "https://example.com/voc/sealed",
        "epcList": ["urn:epc:id:sgtin:0614141.107346.2017"]
    }));
    assert_eq!(curie.compute_hash().unwrap(), iri.compute_hash().unwrap());
}

#[test]
fn malformed_identifier_cannot_be_hashed() {
    let mut value = serde_json::to_value(object_event()).unwrap();
    value["epcList"][0] = json!("urn:epc:id:sgtin:0614141.107346");
    let err = event(value).with_identity(capture_id(), 0).unwrap_err();
    assert!(matches!(err, IdentityError::Resolve(_)));
}

#[test]
fn unhashed_event_does_not_verify() {
    assert!(!object_event().verify_hash().unwrap());
    assert!(object_event().identity().is_none());
}

#[test]
fn wire_form_round_trips() {
    let original = object_event();
    let value = serde_json::to_value(&original).unwrap();
    assert_eq!(value["type"], json!("ObjectEvent"));
    assert_eq!(value["quantityList"][0]["quantity"], json!(200));
    assert_eq!(value["example:batchNote"], json!({"@value": "night shift"}));
    assert_eq!(event(value), original);
}

#[test]
fn document_events_share_document_context() {
    let doc = EpcisDocument::from_json(
        &json!({
            "@context": "https://ref.gs1.org/standards/epcis/epcis-context.jsonld",
            "type": "EPCISDocument",
            "schemaVersion": "2.0",
            "creationDate": "2024-03-01T10:00:00Z",
            "epcisBody": {"eventList": [
                serde_json::to_value(object_event()).unwrap(),
                {
                    "type": "AssociationEvent",
                    "eventTime": "2024-03-01T11:00:00Z",
                    "eventTimeZoneOffset": "+00:00",
                    "action": "ADD",
                    "parentID": "urn:epc:id:grai:0614141.12345.400",
                    "childEPCs": ["urn:epc:id:giai:0614141.12345400"]
                }
            ]}
        })
        .to_string(),
    )
    .unwrap();
    let events = doc.into_events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[1].event_type(), "AssociationEvent");
    assert!(events.iter().all(|e| e.base().context.len() == 1));
}

#[test]
fn capture_parses_validates_and_assigns() {
    let wire = serde_json::to_string(&object_event()).unwrap();
    let event = EpcisEvent::capture(&wire, capture_id(), 7).unwrap();
    assert_eq!(event.identity().unwrap().sequence_in_document, 7);

    let mut value = serde_json::to_value(object_event()).unwrap();
    value["eventTimeZoneOffset"] = json!("+1:00");
    let err = EpcisEvent::capture(&value.to_string(), capture_id(), 0).unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));

    let err = EpcisEvent::capture("{\"type\": \"QuantityEvent\"}", capture_id(), 0).unwrap_err();
    assert!(matches!(err, CoreError::Json(_)));
}

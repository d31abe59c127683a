use epcis_core::{
    interpret_cbv, resolve_cbv, resolve_cbv_all, CbvFormat, ContextEntry, ResolveContext,
    TermInterpretation, VocabularyCategory, VocabularyTerm,
};
use serde_json::json;

fn term(literal: &str, category: VocabularyCategory) -> VocabularyTerm {
    VocabularyTerm::new(literal, category)
}

fn context(value: serde_json::Value) -> ResolveContext {
    let entries: Vec<ContextEntry> = serde_json::from_value(value).unwrap();
    ResolveContext::from_entries(&entries)
}

#[test]
fn bare_standard_term_renders_per_format() {
    let ctx = ResolveContext::default();
    let shipping = term("shipping", VocabularyCategory::BizStep);
    assert_eq!(
        resolve_cbv(&shipping, CbvFormat::NoPreference, &ctx).unwrap(),
        "urn:epcglobal:cbv:bizstep:shipping"
    );
    assert_eq!(
        resolve_cbv(&shipping, CbvFormat::AlwaysUrn, &ctx).unwrap(),
        "urn:epcglobal:cbv:bizstep:shipping"
    );
    assert_eq!(
        resolve_cbv(&shipping, CbvFormat::AlwaysWebUri, &ctx).unwrap(),
        "https://ref.gs1.org/cbv/BizStep-shipping"
    );
    assert_eq!(
        resolve_cbv(&shipping, CbvFormat::NeverTranslates, &ctx).unwrap(),
        "shipping"
    );
}

#[test]
fn every_standard_syntax_is_recognised() {
    let ctx = ResolveContext::default();
    let cases = [
        (
            "cbv:Disp-in_transit",
            VocabularyCategory::Disposition,
            "urn:epcglobal:cbv:disp:in_transit",
        ),
        (
            "https://ref.gs1.org/cbv/BTT-po",
            VocabularyCategory::BizTransactionType,
            "urn:epcglobal:cbv:btt:po",
        ),
        (
            "urn:epcglobal:cbv:sdt:owning_party",
            VocabularyCategory::SourceDestType,
            "urn:epcglobal:cbv:sdt:owning_party",
        ),
        (
            "incorrect_data",
            VocabularyCategory::ErrorReason,
            "urn:epcglobal:cbv:er:incorrect_data",
        ),
    ];
    for (literal, category, expected) in cases {
        assert_eq!(
            resolve_cbv(&term(literal, category), CbvFormat::AlwaysUrn, &ctx).unwrap(),
            expected
        );
    }
}

#[test]
fn sensor_types_only_have_a_web_uri() {
    let ctx = ResolveContext::default();
    let temperature = term("gs1:Temperature", VocabularyCategory::SensorType);
    for format in [CbvFormat::AlwaysUrn, CbvFormat::AlwaysWebUri] {
        assert_eq!(
            resolve_cbv(&temperature, format, &ctx).unwrap(),
            "https://gs1.org/voc/Temperature"
        );
    }
    assert_eq!(
        resolve_cbv(
            &term("Temperature", VocabularyCategory::SensorType),
            CbvFormat::NoPreference,
            &ctx
        )
        .unwrap(),
        "https://gs1.org/voc/Temperature"
    );
}

#[test]
fn context_takes_precedence_over_standard_table() {
    let ctx = context(json!([
        "https://ref.gs1.org/standards/epcis/epcis-context.jsonld",
        {"shipping": "https://example.com/steps/shipping"}
    ]));
    let shipping = term("shipping", VocabularyCategory::BizStep);
    for format in [
        CbvFormat::NoPreference,
        CbvFormat::AlwaysUrn,
        CbvFormat::AlwaysWebUri,
    ] {
        assert_eq!(
            resolve_cbv(&shipping, format, &ctx).unwrap(),
            "https://example.com/steps/shipping"
        );
    }
    assert_eq!(
        resolve_cbv(&shipping, CbvFormat::NeverTranslates, &ctx).unwrap(),
        "shipping"
    );
}

#[test]
fn context_prefixes_expand_curies() {
    let ctx = context(json!([{"ex": "https://example.com/voc/"}]));
    assert_eq!(
        resolve_cbv(
            &term("ex:quarantined", VocabularyCategory::Disposition),
            CbvFormat::AlwaysWebUri,
            &ctx
        )
        .unwrap(),
        "https://example.com/voc/quarantined"
    );
}

#[test]
fn context_defined_standard_prefix_is_reexamined() {
    let ctx = context(json!([{"cbv": "https://ref.gs1.org/cbv/"}]));
    let packing = term("cbv:BizStep-packing", VocabularyCategory::BizStep);
    assert_eq!(
        interpret_cbv(&packing, &ctx).unwrap(),
        TermInterpretation::Standard("packing".into())
    );
    assert_eq!(
        resolve_cbv(&packing, CbvFormat::AlwaysUrn, &ctx).unwrap(),
        "urn:epcglobal:cbv:bizstep:packing"
    );
    assert_eq!(
        resolve_cbv(&packing, CbvFormat::NoPreference, &ctx).unwrap(),
        "cbv:BizStep-packing"
    );
}

#[test]
fn no_preference_only_expands_bare_words() {
    let ctx = context(json!([
        {"ex": "https://example.com/voc/", "sealed": "https://example.com/voc/sealed"}
    ]));
    let cases = [
        ("urn:epcglobal:cbv:bizstep:shipping", VocabularyCategory::BizStep),
        ("https://ref.gs1.org/cbv/BizStep-shipping", VocabularyCategory::BizStep),
        ("cbv:Disp-in_transit", VocabularyCategory::Disposition),
        ("ex:quarantined", VocabularyCategory::Disposition),
        ("gs1:Temperature", VocabularyCategory::SensorType),
    ];
    for (literal, category) in cases {
        assert_eq!(
            resolve_cbv(&term(literal, category), CbvFormat::NoPreference, &ctx).unwrap(),
            literal
        );
    }

    assert_eq!(
        resolve_cbv(
            &term("in_transit", VocabularyCategory::Disposition),
            CbvFormat::NoPreference,
            &ctx
        )
        .unwrap(),
        "urn:epcglobal:cbv:disp:in_transit"
    );
    assert_eq!(
        resolve_cbv(
            &term("sealed", VocabularyCategory::Disposition),
            CbvFormat::NoPreference,
            &ctx
        )
        .unwrap(),
        "https://example.com/voc/sealed"
    );

    let err = resolve_cbv(
        &term("cbv:Disp- in_transit", VocabularyCategory::Disposition),
        CbvFormat::NoPreference,
        &ctx,
    )
    .unwrap_err();
    assert!(err.is_validation());
}

#[test]
fn custom_iris_pass_through_and_unknown_words_fall_back() {
    let ctx = ResolveContext::default();
    let custom = term("https://example.com/steps/x-ray", VocabularyCategory::BizStep);
    assert_eq!(
        resolve_cbv(&custom, CbvFormat::NoPreference, &ctx).unwrap(),
        "https://example.com/steps/x-ray"
    );

    let unknown = term("shipment", VocabularyCategory::BizStep);
    assert_eq!(
        interpret_cbv(&unknown, &ctx).unwrap(),
        TermInterpretation::Unresolved
    );
    assert_eq!(
        resolve_cbv(&unknown, CbvFormat::AlwaysUrn, &ctx).unwrap(),
        "shipment"
    );
}

#[test]
fn malformed_terms_are_validation_errors() {
    let ctx = ResolveContext::default();
    for literal in ["", "in transit"] {
        let err = resolve_cbv(
            &term(literal, VocabularyCategory::Disposition),
            CbvFormat::AlwaysUrn,
            &ctx,
        )
        .unwrap_err();
        assert!(err.is_validation());
    }
}

#[test]
fn bulk_resolution_keeps_failed_terms_as_captured() {
    let ctx = ResolveContext::default();
    let terms: Vec<_> = ["shipping", "receiving", "not valid", "packing", "loading"]
        .into_iter()
        .map(|t| term(t, VocabularyCategory::BizStep))
        .collect();

    let resolved = resolve_cbv_all(&terms, CbvFormat::AlwaysUrn, &ctx);
    assert_eq!(
        resolved,
        vec![
            "urn:epcglobal:cbv:bizstep:shipping",
            "urn:epcglobal:cbv:bizstep:receiving",
            "not valid",
            "urn:epcglobal:cbv:bizstep:packing",
            "urn:epcglobal:cbv:bizstep:loading",
        ]
    );
}

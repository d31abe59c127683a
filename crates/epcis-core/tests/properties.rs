use epcis_core::{
    resolve_cbv, resolve_epc, CbvFormat, ContextEntry, EpcFormat, IdentifierValue,
    ResolveContext, VocabularyCategory, VocabularyTerm,
};
use proptest::prelude::*;

fn sgtin_urn_strategy() -> impl Strategy<Value = String> {
    let serial = proptest::string::string_regex("[A-Za-z0-9._-]{1,20}")
        .unwrap_or_else(|e| panic!("regex failed: {e}"));
    ("[0-9]{7}", "[0-9]{6}", serial).prop_map(|(company_prefix, item_ref, serial)| {
        format!("urn:epc:id:sgtin:{company_prefix}.{item_ref}.{serial}")
    })
}

fn category_strategy() -> impl Strategy<Value = VocabularyCategory> {
    proptest::sample::select(VocabularyCategory::ALL.to_vec())
}

proptest! {
    #[test]
    fn never_translates_returns_any_identifier_verbatim(literal in any::<String>()) {
        let ctx = ResolveContext::from_entries(&[ContextEntry::define("ex", "https://example.com/")]);
        let value = IdentifierValue::instance(literal.clone());
        prop_assert_eq!(resolve_epc(&value, EpcFormat::NeverTranslates, &ctx).unwrap(), literal);
    }

    #[test]
    fn never_translates_returns_any_term_verbatim(
        literal in any::<String>(),
        category in category_strategy(),
    ) {
        let ctx = ResolveContext::from_entries(&[ContextEntry::define(literal.clone(), "https://example.com/x")]);
        let term = VocabularyTerm::new(literal.clone(), category);
        prop_assert_eq!(resolve_cbv(&term, CbvFormat::NeverTranslates, &ctx).unwrap(), literal);
    }

    #[test]
    fn digital_link_is_a_fixed_point(urn in sgtin_urn_strategy()) {
        let ctx = ResolveContext::default();
        let once = resolve_epc(&IdentifierValue::instance(urn), EpcFormat::AlwaysGs1DigitalLink, &ctx).unwrap();
        let twice = resolve_epc(&IdentifierValue::instance(once.clone()), EpcFormat::AlwaysGs1DigitalLink, &ctx).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn urn_survives_a_digital_link_round_trip(urn in sgtin_urn_strategy()) {
        let ctx = ResolveContext::default();
        let link = resolve_epc(&IdentifierValue::instance(urn.clone()), EpcFormat::AlwaysGs1DigitalLink, &ctx).unwrap();
        let back = resolve_epc(&IdentifierValue::instance(link), EpcFormat::AlwaysEpcUrn, &ctx).unwrap();
        prop_assert_eq!(back, urn);
    }
}

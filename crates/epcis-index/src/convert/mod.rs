//! Conversion between the core event model and the indexed document.
//!
//! Capture goes through [`to_indexed`]; query goes through [`to_core`] with
//! the client's [`ConversionOptions`]. Each event variant converts its own
//! fields ([`VariantConversion`]) and shares the sub-entity converters in
//! [`common`].

use epcis_core::{
    CbvFormat, ContextEntry, EpcFlavor, EpcFormat, EpcisEvent, EventBase, FormatPreference,
    Gs1Settings, IdentifierValue, ResolveContext, VocabularyCategory, VocabularyTerm,
};
use tracing::instrument;

use crate::error::ConvertError;
use crate::indexed::{CaptureMetadata, IndexedEvent, IndexedValue, SCHEMA_VERSION};

mod aggregation;
mod association;
pub mod common;
mod object;
mod transaction;
mod transformation;

/// How an indexed document is rendered back into an event.
///
/// | `preference` | `context` | EPC format | CBV format | terms resolved against |
/// |---|---|---|---|---|
/// | `None` | `None` | `Never_Translates` | `Never_Translates` | stored context |
/// | `None` | `Some` | `Never_Translates` | `No_Preference` | given context |
/// | `Some` | `None` | preference | preference | stored context |
/// | `Some` | `Some` | preference | preference | given context |
///
/// Missing halves of a preference default to `Always_GS1_Digital_Link` and
/// `No_Preference`.
#[derive(Debug, Clone, Default)]
pub struct ConversionOptions {
    /// Client format preference.
    pub preference: Option<FormatPreference>,
    /// Context to resolve terms against instead of the stored one.
    pub context: Option<Vec<ContextEntry>>,
    /// GS1 settings used when rendering EPC URNs.
    pub settings: Gs1Settings,
}

impl ConversionOptions {
    /// Exact round trip of the captured literals.
    pub fn as_captured() -> Self {
        Self::default()
    }

    /// Sets the client preference.
    pub fn with_preference(mut self, preference: FormatPreference) -> Self {
        self.preference = Some(preference);
        self
    }

    /// Sets the context to resolve against.
    pub fn with_context(mut self, context: Vec<ContextEntry>) -> Self {
        self.context = Some(context);
        self
    }

    /// Sets the GS1 settings.
    pub fn with_settings(mut self, settings: Gs1Settings) -> Self {
        self.settings = settings;
        self
    }

    fn renderer(&self, stored_context: &[ContextEntry]) -> Renderer {
        let (epc, cbv) = match (&self.preference, &self.context) {
            (None, None) => (EpcFormat::NeverTranslates, CbvFormat::NeverTranslates),
            (None, Some(_)) => (EpcFormat::NeverTranslates, CbvFormat::NoPreference),
            (Some(pref), _) => (pref.effective_epc_format(), pref.effective_cbv_format()),
        };
        let entries = self.context.as_deref().unwrap_or(stored_context);
        Renderer {
            epc,
            cbv,
            context: ResolveContext::from_entries(entries).with_settings(self.settings.clone()),
        }
    }
}

/// Resolved output formats plus the context to render against.
#[derive(Debug, Clone)]
pub struct Renderer {
    epc: EpcFormat,
    cbv: CbvFormat,
    context: ResolveContext,
}

impl Renderer {
    /// Renders a stored identifier.
    pub fn epc(&self, value: &IndexedValue, flavor: EpcFlavor) -> Result<IdentifierValue, ConvertError> {
        let captured = IdentifierValue::new(value.as_captured.clone(), flavor);
        let rendered = epcis_core::resolve_epc(&captured, self.epc, &self.context)?;
        Ok(IdentifierValue::new(rendered, flavor).with_resolved(value.normalized.clone()))
    }

    /// Renders a stored term.
    pub fn term(
        &self,
        value: &IndexedValue,
        category: VocabularyCategory,
    ) -> Result<VocabularyTerm, ConvertError> {
        let captured = VocabularyTerm::new(value.as_captured.clone(), category);
        let rendered = epcis_core::resolve_cbv(&captured, self.cbv, &self.context)?;
        Ok(VocabularyTerm::new(rendered, category).with_resolved(value.normalized.clone()))
    }

    /// Identifier format in effect.
    pub fn epc_format(&self) -> EpcFormat {
        self.epc
    }

    /// Vocabulary format in effect.
    pub fn cbv_format(&self) -> CbvFormat {
        self.cbv
    }
}

/// Per-variant half of the conversion.
pub trait VariantConversion: Sized {
    /// Wire name of the variant.
    const EVENT_TYPE: &'static str;

    /// Common members.
    fn base(&self) -> &EventBase;

    /// Writes the variant's own fields into `doc`.
    fn index_fields(&self, doc: &mut IndexedEvent, context: &ResolveContext)
        -> Result<(), ConvertError>;

    /// Rebuilds the variant from `doc` around an already restored base.
    fn from_indexed(
        doc: &IndexedEvent,
        base: EventBase,
        renderer: &Renderer,
    ) -> Result<Self, ConvertError>;
}

fn index_variant<V: VariantConversion>(
    event: &V,
    referenced: &EpcisEvent,
    metadata: &CaptureMetadata,
) -> Result<IndexedEvent, ConvertError> {
    let base = event.base();
    base.validate()?;
    let context = ResolveContext::from_entries(&base.context);
    let mut doc = common::index_base(V::EVENT_TYPE, base, metadata, &context)?;
    event.index_fields(&mut doc, &context)?;
    common::index_referenced(&mut doc, referenced, &context)?;
    Ok(doc)
}

/// Converts a captured event into its indexed document.
///
/// The event must carry an identity (see [`EpcisEvent::with_identity`]).
/// Malformed identifiers or terms reject the event.
#[instrument(skip_all, fields(event_type = event.event_type()))]
pub fn to_indexed(
    event: &EpcisEvent,
    metadata: &CaptureMetadata,
) -> Result<IndexedEvent, ConvertError> {
    if event.identity().is_none() {
        return Err(ConvertError::MissingIdentity(event.event_type()));
    }
    match event {
        EpcisEvent::ObjectEvent(e) => index_variant(e, event, metadata),
        EpcisEvent::AggregationEvent(e) => index_variant(e, event, metadata),
        EpcisEvent::TransactionEvent(e) => index_variant(e, event, metadata),
        EpcisEvent::TransformationEvent(e) => index_variant(e, event, metadata),
        EpcisEvent::AssociationEvent(e) => index_variant(e, event, metadata),
    }
}

fn restore_variant<V: VariantConversion>(
    doc: &IndexedEvent,
    renderer: &Renderer,
) -> Result<V, ConvertError> {
    let base = common::restore_base(doc, renderer)?;
    V::from_indexed(doc, base, renderer)
}

/// Converts an indexed document back into an event, rendered per `options`.
#[instrument(skip_all, fields(event_type = %doc.event_type, hash = %doc.hash))]
pub fn to_core(doc: &IndexedEvent, options: &ConversionOptions) -> Result<EpcisEvent, ConvertError> {
    if doc.schema_version != SCHEMA_VERSION {
        return Err(ConvertError::InvalidIndexedDocument(format!(
            "unsupported schema version {}",
            doc.schema_version
        )));
    }
    let renderer = options.renderer(&doc.context_info);
    Ok(match doc.event_type.as_str() {
        "ObjectEvent" => EpcisEvent::ObjectEvent(restore_variant(doc, &renderer)?),
        "AggregationEvent" => EpcisEvent::AggregationEvent(restore_variant(doc, &renderer)?),
        "TransactionEvent" => EpcisEvent::TransactionEvent(restore_variant(doc, &renderer)?),
        "TransformationEvent" => {
            EpcisEvent::TransformationEvent(restore_variant(doc, &renderer)?)
        }
        "AssociationEvent" => EpcisEvent::AssociationEvent(restore_variant(doc, &renderer)?),
        other => {
            return Err(ConvertError::InvalidIndexedDocument(format!(
                "unknown event type '{}'",
                other
            )))
        }
    })
}

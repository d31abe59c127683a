//! Sub-entity converters shared by every event variant.

use std::collections::BTreeMap;

use epcis_core::{
    normalize_cbv, normalize_epc, BizLocation, BizTransaction, Destination, EpcFlavor,
    EpcisEvent, ErrorDeclaration, EventBase, IdentifierValue, PersistentDisposition,
    QuantityElement, ReadPoint, ResolveContext, SensorElement, SensorReport, Source,
    UserExtensions, VocabularyCategory, VocabularyTerm,
};

use super::Renderer;
use crate::error::ConvertError;
use crate::indexed::{
    CaptureMetadata, CapturedBy, IndexedBizTransaction, IndexedErrorDeclaration, IndexedEvent,
    IndexedPersistentDisposition, IndexedQuantity, IndexedSensorElement, IndexedSensorReport,
    IndexedSourceDest, IndexedValue, Provenance, SCHEMA_VERSION,
};

const READ_POINT: &str = "readPoint";
const BIZ_LOCATION: &str = "bizLocation";
const ERROR_DECLARATION: &str = "errorDeclaration";

fn sensor_key(position: usize) -> String {
    format!("sensorElementList.{}", position)
}

// ---------------------------------------------------------------------------
// capture side
// ---------------------------------------------------------------------------

/// Stores an identifier.
pub fn index_epc(
    value: &IdentifierValue,
    context: &ResolveContext,
) -> Result<IndexedValue, ConvertError> {
    Ok(IndexedValue::new(
        normalize_epc(value, context)?,
        value.literal(),
    ))
}

/// Stores an identifier list, order preserved.
pub fn index_epcs(
    values: &[IdentifierValue],
    context: &ResolveContext,
) -> Result<Vec<IndexedValue>, ConvertError> {
    values.iter().map(|v| index_epc(v, context)).collect()
}

/// Stores a vocabulary term.
pub fn index_term(
    term: &VocabularyTerm,
    context: &ResolveContext,
) -> Result<IndexedValue, ConvertError> {
    Ok(IndexedValue::new(
        normalize_cbv(term, context)?,
        term.literal(),
    ))
}

fn index_term_opt(
    term: Option<&VocabularyTerm>,
    context: &ResolveContext,
) -> Result<Option<IndexedValue>, ConvertError> {
    term.map(|t| index_term(t, context)).transpose()
}

/// Stores a quantity list.
pub fn index_quantities(
    list: &[QuantityElement],
    context: &ResolveContext,
) -> Result<Vec<IndexedQuantity>, ConvertError> {
    list.iter()
        .map(|q| {
            Ok(IndexedQuantity {
                epc_class: index_epc(&q.epc_class, context)?,
                quantity: q.quantity.clone(),
                uom: q.uom.clone(),
            })
        })
        .collect()
}

/// Stores a business transaction list.
pub fn index_biz_transactions(
    list: &[BizTransaction],
    context: &ResolveContext,
) -> Result<Vec<IndexedBizTransaction>, ConvertError> {
    list.iter()
        .map(|bt| {
            Ok(IndexedBizTransaction {
                kind: index_term_opt(bt.kind.as_ref(), context)?,
                biz_transaction: bt.biz_transaction.clone(),
            })
        })
        .collect()
}

/// Stores a persistent disposition.
pub fn index_persistent_disposition(
    pd: Option<&PersistentDisposition>,
    context: &ResolveContext,
) -> Result<Option<IndexedPersistentDisposition>, ConvertError> {
    pd.map(|pd| {
        Ok::<_, ConvertError>(IndexedPersistentDisposition {
            set: pd
                .set
                .iter()
                .map(|t| index_term(t, context))
                .collect::<Result<_, ConvertError>>()?,
            unset: pd
                .unset
                .iter()
                .map(|t| index_term(t, context))
                .collect::<Result<_, ConvertError>>()?,
        })
    })
    .transpose()
}

fn index_sensor_elements(
    list: &[SensorElement],
    inner: &mut BTreeMap<String, UserExtensions>,
    context: &ResolveContext,
) -> Result<Vec<IndexedSensorElement>, ConvertError> {
    let mut out = Vec::with_capacity(list.len());
    for (position, element) in list.iter().enumerate() {
        if !element.user_extensions.is_empty() {
            inner.insert(sensor_key(position), element.user_extensions.clone());
        }
        let sensor_report = element
            .sensor_reports
            .iter()
            .map(|report| {
                Ok(IndexedSensorReport {
                    kind: index_term_opt(report.kind.as_ref(), context)?,
                    fields: report.fields.clone(),
                })
            })
            .collect::<Result<_, ConvertError>>()?;
        out.push(IndexedSensorElement {
            sensor_metadata: element.sensor_metadata.clone(),
            sensor_report,
        });
    }
    Ok(out)
}

/// Builds the document skeleton from the members every variant shares.
pub fn index_base(
    event_type: &str,
    base: &EventBase,
    metadata: &CaptureMetadata,
    context: &ResolveContext,
) -> Result<IndexedEvent, ConvertError> {
    let (Some(hash), Some(capture_id), Some(sequence_in_document)) = (
        base.hash.clone(),
        base.capture_id.clone(),
        base.sequence_in_document,
    ) else {
        return Err(ConvertError::MissingIdentity("event"));
    };

    let mut inner = BTreeMap::new();
    if let Some(rp) = &base.read_point {
        if !rp.user_extensions.is_empty() {
            inner.insert(READ_POINT.to_string(), rp.user_extensions.clone());
        }
    }
    if let Some(bl) = &base.biz_location {
        if !bl.user_extensions.is_empty() {
            inner.insert(BIZ_LOCATION.to_string(), bl.user_extensions.clone());
        }
    }
    if let Some(ed) = &base.error_declaration {
        if !ed.user_extensions.is_empty() {
            inner.insert(ERROR_DECLARATION.to_string(), ed.user_extensions.clone());
        }
    }
    let sensor_element_list = index_sensor_elements(&base.sensor_element_list, &mut inner, context)?;

    let error_declaration = base
        .error_declaration
        .as_ref()
        .map(|ed| {
            Ok::<_, ConvertError>(IndexedErrorDeclaration {
                declaration_time: ed.declaration_time.clone(),
                reason: index_term_opt(ed.reason.as_ref(), context)?,
                corrective_event_ids: ed.corrective_event_ids.clone(),
            })
        })
        .transpose()?;

    Ok(IndexedEvent {
        event_type: event_type.to_string(),
        schema_version: SCHEMA_VERSION,
        event_id: base.event_id.clone(),
        event_time: base.event_time.clone(),
        record_time: base.record_time.clone(),
        event_time_zone_offset: base.event_time_zone_offset.clone(),
        metadata: Provenance {
            captured_by: CapturedBy {
                user_id: metadata.user_id.clone(),
                default_group: metadata.default_group.clone(),
                timestamp: metadata.timestamp.clone(),
                capture_id: capture_id.clone(),
            },
            visible: metadata.visible,
        },
        hash,
        capture_id,
        sequence_in_document,
        action: None,
        biz_step: index_term_opt(base.biz_step.as_ref(), context)?,
        disposition: index_term_opt(base.disposition.as_ref(), context)?,
        persistent_disposition: None,
        read_point: base
            .read_point
            .as_ref()
            .map(|rp| index_epc(&rp.id, context))
            .transpose()?,
        biz_location: base
            .biz_location
            .as_ref()
            .map(|bl| index_epc(&bl.id, context))
            .transpose()?,
        parent_id: None,
        epc_list: Vec::new(),
        child_epcs: Vec::new(),
        input_epc_list: Vec::new(),
        output_epc_list: Vec::new(),
        quantity_list: Vec::new(),
        child_quantity_list: Vec::new(),
        input_quantity_list: Vec::new(),
        output_quantity_list: Vec::new(),
        transformation_id: None,
        biz_transaction_list: Vec::new(),
        source_list: base
            .source_list
            .iter()
            .map(|s| {
                Ok(IndexedSourceDest {
                    kind: index_term(&s.kind, context)?,
                    value: index_epc(&s.source, context)?,
                })
            })
            .collect::<Result<_, ConvertError>>()?,
        destination_list: base
            .destination_list
            .iter()
            .map(|d| {
                Ok(IndexedSourceDest {
                    kind: index_term(&d.kind, context)?,
                    value: index_epc(&d.destination, context)?,
                })
            })
            .collect::<Result<_, ConvertError>>()?,
        sensor_element_list,
        error_declaration,
        ilmd: None,
        certification_info: base.certification_info.clone(),
        extension: base.extension.clone(),
        user_extensions: base.user_extensions.clone(),
        inner_user_extensions: inner,
        context_info: base.context.clone(),
        epcs: Vec::new(),
        epcs_as_captured: Vec::new(),
    })
}

/// Fills `epcs` (normalized, first occurrence kept) and `epcsAsCaptured`.
pub fn index_referenced(
    doc: &mut IndexedEvent,
    event: &EpcisEvent,
    context: &ResolveContext,
) -> Result<(), ConvertError> {
    let mut epcs: Vec<String> = Vec::new();
    for value in event.referenced_iter() {
        let normalized = normalize_epc(value, context)?;
        if !epcs.contains(&normalized) {
            epcs.push(normalized);
        }
    }
    doc.epcs = epcs;
    doc.epcs_as_captured = event
        .referenced_epcs()
        .into_iter()
        .map(|v| v.literal().to_string())
        .collect();
    Ok(())
}

// ---------------------------------------------------------------------------
// query side
// ---------------------------------------------------------------------------

/// Renders a stored identifier list.
pub fn restore_epcs(
    list: &[IndexedValue],
    renderer: &Renderer,
) -> Result<Vec<IdentifierValue>, ConvertError> {
    list.iter()
        .map(|v| renderer.epc(v, EpcFlavor::Instance))
        .collect()
}

/// Renders an optional stored identifier.
pub fn restore_epc_opt(
    value: Option<&IndexedValue>,
    renderer: &Renderer,
) -> Result<Option<IdentifierValue>, ConvertError> {
    value
        .map(|v| renderer.epc(v, EpcFlavor::Instance))
        .transpose()
}

fn restore_term_opt(
    value: Option<&IndexedValue>,
    category: VocabularyCategory,
    renderer: &Renderer,
) -> Result<Option<VocabularyTerm>, ConvertError> {
    value.map(|v| renderer.term(v, category)).transpose()
}

/// Renders a stored quantity list.
pub fn restore_quantities(
    list: &[IndexedQuantity],
    renderer: &Renderer,
) -> Result<Vec<QuantityElement>, ConvertError> {
    list.iter()
        .map(|q| {
            Ok(QuantityElement {
                epc_class: renderer.epc(&q.epc_class, EpcFlavor::Class)?,
                quantity: q.quantity.clone(),
                uom: q.uom.clone(),
            })
        })
        .collect()
}

/// Renders a stored business transaction list.
pub fn restore_biz_transactions(
    list: &[IndexedBizTransaction],
    renderer: &Renderer,
) -> Result<Vec<BizTransaction>, ConvertError> {
    list.iter()
        .map(|bt| {
            Ok(BizTransaction {
                kind: restore_term_opt(
                    bt.kind.as_ref(),
                    VocabularyCategory::BizTransactionType,
                    renderer,
                )?,
                biz_transaction: bt.biz_transaction.clone(),
            })
        })
        .collect()
}

/// Renders a stored persistent disposition.
pub fn restore_persistent_disposition(
    pd: Option<&IndexedPersistentDisposition>,
    renderer: &Renderer,
) -> Result<Option<PersistentDisposition>, ConvertError> {
    let terms = |list: &[IndexedValue]| {
        list.iter()
            .map(|v| renderer.term(v, VocabularyCategory::Disposition))
            .collect::<Result<Vec<_>, _>>()
    };
    pd.map(|pd| {
        Ok::<_, ConvertError>(PersistentDisposition {
            set: terms(&pd.set)?,
            unset: terms(&pd.unset)?,
        })
    })
    .transpose()
}

fn restore_sensor_elements(
    doc: &IndexedEvent,
    renderer: &Renderer,
) -> Result<Vec<SensorElement>, ConvertError> {
    doc.sensor_element_list
        .iter()
        .enumerate()
        .map(|(position, element)| {
            let sensor_reports = element
                .sensor_report
                .iter()
                .map(|report| {
                    Ok(SensorReport {
                        kind: restore_term_opt(
                            report.kind.as_ref(),
                            VocabularyCategory::SensorType,
                            renderer,
                        )?,
                        fields: report.fields.clone(),
                    })
                })
                .collect::<Result<_, ConvertError>>()?;
            Ok(SensorElement {
                sensor_metadata: element.sensor_metadata.clone(),
                sensor_reports,
                user_extensions: inner_extensions(doc, &sensor_key(position)),
            })
        })
        .collect()
}

fn inner_extensions(doc: &IndexedEvent, key: &str) -> UserExtensions {
    doc.inner_user_extensions
        .get(key)
        .cloned()
        .unwrap_or_default()
}

/// Rebuilds the shared members of an event.
pub fn restore_base(doc: &IndexedEvent, renderer: &Renderer) -> Result<EventBase, ConvertError> {
    let mut base = EventBase::new(doc.event_time.clone(), doc.event_time_zone_offset.clone());
    base.event_id = doc.event_id.clone();
    base.record_time = doc.record_time.clone();
    base.hash = Some(doc.hash.clone());
    base.capture_id = Some(doc.capture_id.clone());
    base.sequence_in_document = Some(doc.sequence_in_document);
    base.certification_info = doc.certification_info.clone();
    base.biz_step = restore_term_opt(doc.biz_step.as_ref(), VocabularyCategory::BizStep, renderer)?;
    base.disposition = restore_term_opt(
        doc.disposition.as_ref(),
        VocabularyCategory::Disposition,
        renderer,
    )?;
    base.read_point = doc
        .read_point
        .as_ref()
        .map(|id| {
            Ok::<_, ConvertError>(ReadPoint {
                id: renderer.epc(id, EpcFlavor::Instance)?,
                user_extensions: inner_extensions(doc, READ_POINT),
            })
        })
        .transpose()?;
    base.biz_location = doc
        .biz_location
        .as_ref()
        .map(|id| {
            Ok::<_, ConvertError>(BizLocation {
                id: renderer.epc(id, EpcFlavor::Instance)?,
                user_extensions: inner_extensions(doc, BIZ_LOCATION),
            })
        })
        .transpose()?;
    base.source_list = doc
        .source_list
        .iter()
        .map(|s| {
            Ok(Source {
                kind: renderer.term(&s.kind, VocabularyCategory::SourceDestType)?,
                source: renderer.epc(&s.value, EpcFlavor::Instance)?,
            })
        })
        .collect::<Result<_, ConvertError>>()?;
    base.destination_list = doc
        .destination_list
        .iter()
        .map(|d| {
            Ok(Destination {
                kind: renderer.term(&d.kind, VocabularyCategory::SourceDestType)?,
                destination: renderer.epc(&d.value, EpcFlavor::Instance)?,
            })
        })
        .collect::<Result<_, ConvertError>>()?;
    base.sensor_element_list = restore_sensor_elements(doc, renderer)?;
    base.error_declaration = doc
        .error_declaration
        .as_ref()
        .map(|ed| {
            Ok::<_, ConvertError>(ErrorDeclaration {
                declaration_time: ed.declaration_time.clone(),
                reason: restore_term_opt(
                    ed.reason.as_ref(),
                    VocabularyCategory::ErrorReason,
                    renderer,
                )?,
                corrective_event_ids: ed.corrective_event_ids.clone(),
                user_extensions: inner_extensions(doc, ERROR_DECLARATION),
            })
        })
        .transpose()?;
    base.extension = doc.extension.clone();
    base.context = doc.context_info.clone();
    base.user_extensions = doc.user_extensions.clone();
    Ok(base)
}

/// Reads the stored action, which every variant but TransformationEvent requires.
pub fn require_action(doc: &IndexedEvent) -> Result<epcis_core::Action, ConvertError> {
    doc.action.ok_or_else(|| {
        ConvertError::InvalidIndexedDocument(format!("{} without action", doc.event_type))
    })
}

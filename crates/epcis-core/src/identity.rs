//! Event identity: content hash, capture id and position in the capture document.

use epcis_canonical::{compute_event_hash, CaptureId, Canonicalizer, EventHash};
use tracing::debug;

use crate::errors::{CoreError, IdentityError, ResolveError};
use crate::events::{EpcisEvent, EventBase};
use crate::identifier::IdentifierValue;
use crate::resolver::{normalize_cbv, normalize_epc, ResolveContext};
use crate::shared::{BizTransaction, PersistentDisposition, QuantityElement};
use crate::vocabulary::VocabularyTerm;

/// Identity assigned to an event at capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventIdentity<'a> {
    /// Content hash.
    pub hash: &'a EventHash,
    /// Capture job.
    pub capture_id: &'a CaptureId,
    /// Position inside the capture document.
    pub sequence_in_document: u64,
}

impl EpcisEvent {
    /// The assigned identity, or `None` before capture.
    pub fn identity(&self) -> Option<EventIdentity<'_>> {
        let base = self.base();
        Some(EventIdentity {
            hash: base.hash.as_ref()?,
            capture_id: base.capture_id.as_ref()?,
            sequence_in_document: base.sequence_in_document?,
        })
    }

    /// Computes the content hash of the event.
    ///
    /// Identifiers and terms are hashed in their normalized form, so the
    /// same event captured as EPC URNs or as Digital Links hashes alike.
    pub fn compute_hash(&self) -> Result<EventHash, IdentityError> {
        Ok(compute_event_hash(&self.hash_form()?, &Canonicalizer::new())?)
    }

    /// Copy of the event with every identifier and term normalized,
    /// resolved against the event's own context.
    pub fn hash_form(&self) -> Result<EpcisEvent, ResolveError> {
        let context = ResolveContext::from_entries(&self.base().context);
        let mut event = self.clone();
        match &mut event {
            EpcisEvent::ObjectEvent(e) => {
                normalize_base(&mut e.base, &context)?;
                normalize_epcs(&mut e.epc_list, &context)?;
                normalize_quantities(&mut e.quantity_list, &context)?;
                normalize_biz_transactions(&mut e.biz_transaction_list, &context)?;
                normalize_persistent_disposition(e.persistent_disposition.as_mut(), &context)?;
            }
            EpcisEvent::AggregationEvent(e) => {
                normalize_base(&mut e.base, &context)?;
                normalize_epc_opt(e.parent_id.as_mut(), &context)?;
                normalize_epcs(&mut e.child_epcs, &context)?;
                normalize_quantities(&mut e.child_quantity_list, &context)?;
                normalize_biz_transactions(&mut e.biz_transaction_list, &context)?;
            }
            EpcisEvent::TransactionEvent(e) => {
                normalize_base(&mut e.base, &context)?;
                normalize_epc_opt(e.parent_id.as_mut(), &context)?;
                normalize_epcs(&mut e.epc_list, &context)?;
                normalize_quantities(&mut e.quantity_list, &context)?;
                normalize_biz_transactions(&mut e.biz_transaction_list, &context)?;
            }
            EpcisEvent::TransformationEvent(e) => {
                normalize_base(&mut e.base, &context)?;
                normalize_epcs(&mut e.input_epc_list, &context)?;
                normalize_epcs(&mut e.output_epc_list, &context)?;
                normalize_quantities(&mut e.input_quantity_list, &context)?;
                normalize_quantities(&mut e.output_quantity_list, &context)?;
                normalize_biz_transactions(&mut e.biz_transaction_list, &context)?;
                normalize_persistent_disposition(e.persistent_disposition.as_mut(), &context)?;
            }
            EpcisEvent::AssociationEvent(e) => {
                normalize_base(&mut e.base, &context)?;
                normalize_epc_opt(e.parent_id.as_mut(), &context)?;
                normalize_epcs(&mut e.child_epcs, &context)?;
                normalize_quantities(&mut e.child_quantity_list, &context)?;
                normalize_biz_transactions(&mut e.biz_transaction_list, &context)?;
            }
        }
        Ok(event)
    }

    /// Assigns identity once. An absent `eventID` becomes the hash.
    pub fn with_identity(
        mut self,
        capture_id: CaptureId,
        sequence_in_document: u64,
    ) -> Result<Self, IdentityError> {
        let base = self.base();
        if let Some(existing) = base
            .hash
            .as_ref()
            .map(EventHash::to_string)
            .or_else(|| base.capture_id.as_ref().map(CaptureId::to_string))
        {
            return Err(IdentityError::AlreadyAssigned(existing));
        }

        let hash = self.compute_hash()?;
        debug!(
            event_type = self.event_type(),
            hash = %hash,
            capture_id = %capture_id,
            sequence_in_document,
            "assigned event identity"
        );
        let base = self.base_mut();
        if base.event_id.is_none() {
            base.event_id = Some(hash.to_string());
        }
        base.hash = Some(hash);
        base.capture_id = Some(capture_id);
        base.sequence_in_document = Some(sequence_in_document);
        Ok(self)
    }

    /// Parses a single wire event, checks its literals and assigns identity.
    pub fn capture(
        input: &str,
        capture_id: CaptureId,
        sequence_in_document: u64,
    ) -> Result<Self, CoreError> {
        let event = Self::from_json(input)?;
        event.validate()?;
        Ok(event.with_identity(capture_id, sequence_in_document)?)
    }

    /// Recomputes the hash and compares it with the assigned one.
    ///
    /// Returns `false` for events without a hash.
    pub fn verify_hash(&self) -> Result<bool, IdentityError> {
        match &self.base().hash {
            Some(claimed) => Ok(&self.compute_hash()? == claimed),
            None => Ok(false),
        }
    }
}

fn normalize_epc_in_place(
    value: &mut IdentifierValue,
    context: &ResolveContext,
) -> Result<(), ResolveError> {
    let normalized = normalize_epc(value, context)?;
    *value = IdentifierValue::new(normalized, value.flavor());
    Ok(())
}

fn normalize_epc_opt(
    value: Option<&mut IdentifierValue>,
    context: &ResolveContext,
) -> Result<(), ResolveError> {
    match value {
        Some(value) => normalize_epc_in_place(value, context),
        None => Ok(()),
    }
}

fn normalize_epcs(values: &mut [IdentifierValue], context: &ResolveContext) -> Result<(), ResolveError> {
    values
        .iter_mut()
        .try_for_each(|value| normalize_epc_in_place(value, context))
}

fn normalize_term(term: &mut VocabularyTerm, context: &ResolveContext) -> Result<(), ResolveError> {
    let normalized = normalize_cbv(term, context)?;
    *term = VocabularyTerm::new(normalized, term.category());
    Ok(())
}

fn normalize_term_opt(
    term: Option<&mut VocabularyTerm>,
    context: &ResolveContext,
) -> Result<(), ResolveError> {
    match term {
        Some(term) => normalize_term(term, context),
        None => Ok(()),
    }
}

fn normalize_quantities(
    list: &mut [QuantityElement],
    context: &ResolveContext,
) -> Result<(), ResolveError> {
    list.iter_mut()
        .try_for_each(|q| normalize_epc_in_place(&mut q.epc_class, context))
}

fn normalize_biz_transactions(
    list: &mut [BizTransaction],
    context: &ResolveContext,
) -> Result<(), ResolveError> {
    list.iter_mut()
        .try_for_each(|bt| normalize_term_opt(bt.kind.as_mut(), context))
}

fn normalize_persistent_disposition(
    pd: Option<&mut PersistentDisposition>,
    context: &ResolveContext,
) -> Result<(), ResolveError> {
    if let Some(pd) = pd {
        pd.set
            .iter_mut()
            .chain(pd.unset.iter_mut())
            .try_for_each(|term| normalize_term(term, context))?;
    }
    Ok(())
}

// errorDeclaration is left alone: it is excluded from the hash.
fn normalize_base(base: &mut EventBase, context: &ResolveContext) -> Result<(), ResolveError> {
    normalize_term_opt(base.biz_step.as_mut(), context)?;
    normalize_term_opt(base.disposition.as_mut(), context)?;
    if let Some(read_point) = &mut base.read_point {
        normalize_epc_in_place(&mut read_point.id, context)?;
    }
    if let Some(biz_location) = &mut base.biz_location {
        normalize_epc_in_place(&mut biz_location.id, context)?;
    }
    for source in &mut base.source_list {
        normalize_term(&mut source.kind, context)?;
        normalize_epc_in_place(&mut source.source, context)?;
    }
    for destination in &mut base.destination_list {
        normalize_term(&mut destination.kind, context)?;
        normalize_epc_in_place(&mut destination.destination, context)?;
    }
    for element in &mut base.sensor_element_list {
        for report in &mut element.sensor_reports {
            normalize_term_opt(report.kind.as_mut(), context)?;
        }
    }
    Ok(())
}

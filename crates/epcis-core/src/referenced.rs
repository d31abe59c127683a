//! Identifiers an event refers to.

use std::collections::{BTreeSet, HashSet};

use crate::events::EpcisEvent;
use crate::identifier::IdentifierValue;
use crate::resolver::{normalize_epc, ResolveContext};
use crate::shared::QuantityElement;

/// How [`EpcisEvent::referenced_epcs_with`] decides two identifiers are the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DedupStrategy {
    /// Same captured literal. An EPC URN and the Digital Link of the same
    /// object count twice.
    #[default]
    CapturedLiteral,
    /// Same canonical Digital Link; literals that do not convert compare as
    /// themselves.
    ResolvedForm,
}

fn classes(list: &[QuantityElement]) -> impl Iterator<Item = &IdentifierValue> {
    list.iter().map(|q| &q.epc_class)
}

impl EpcisEvent {
    /// Every identifier the event refers to, in field order: EPC lists,
    /// parent, children, inputs, outputs and quantity classes.
    pub fn referenced_iter(&self) -> Box<dyn Iterator<Item = &IdentifierValue> + '_> {
        match self {
            EpcisEvent::ObjectEvent(e) => Box::new(e.epc_list.iter().chain(classes(&e.quantity_list))),
            EpcisEvent::AggregationEvent(e) => Box::new(
                e.parent_id
                    .iter()
                    .chain(e.child_epcs.iter())
                    .chain(classes(&e.child_quantity_list)),
            ),
            EpcisEvent::TransactionEvent(e) => Box::new(
                e.parent_id
                    .iter()
                    .chain(e.epc_list.iter())
                    .chain(classes(&e.quantity_list)),
            ),
            EpcisEvent::TransformationEvent(e) => Box::new(
                e.input_epc_list
                    .iter()
                    .chain(e.output_epc_list.iter())
                    .chain(classes(&e.input_quantity_list))
                    .chain(classes(&e.output_quantity_list)),
            ),
            EpcisEvent::AssociationEvent(e) => Box::new(
                e.parent_id
                    .iter()
                    .chain(e.child_epcs.iter())
                    .chain(classes(&e.child_quantity_list)),
            ),
        }
    }

    /// Distinct referenced identifiers by captured literal.
    ///
    /// Derived on every call; never cached on the event.
    pub fn referenced_epcs(&self) -> BTreeSet<IdentifierValue> {
        self.referenced_iter().cloned().collect()
    }

    /// Distinct referenced identifiers under `strategy`, first occurrence
    /// kept, in field order.
    pub fn referenced_epcs_with(
        &self,
        strategy: DedupStrategy,
        context: &ResolveContext,
    ) -> Vec<IdentifierValue> {
        let mut seen = HashSet::new();
        self.referenced_iter()
            .filter(|value| {
                let key = match strategy {
                    DedupStrategy::CapturedLiteral => value.literal().to_string(),
                    DedupStrategy::ResolvedForm => normalize_epc(value, context)
                        .unwrap_or_else(|_| value.literal().to_string()),
                };
                seen.insert(key)
            })
            .cloned()
            .collect()
    }
}

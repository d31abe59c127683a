use epcis_core::{AssociationEvent, EventBase, ResolveContext};

use super::common::{
    index_biz_transactions, index_epc, index_epcs, index_quantities, require_action,
    restore_biz_transactions, restore_epc_opt, restore_epcs, restore_quantities,
};
use super::{Renderer, VariantConversion};
use crate::error::ConvertError;
use crate::indexed::IndexedEvent;

impl VariantConversion for AssociationEvent {
    const EVENT_TYPE: &'static str = "AssociationEvent";

    fn base(&self) -> &EventBase {
        &self.base
    }

    fn index_fields(
        &self,
        doc: &mut IndexedEvent,
        context: &ResolveContext,
    ) -> Result<(), ConvertError> {
        doc.action = Some(self.action);
        doc.parent_id = self
            .parent_id
            .as_ref()
            .map(|p| index_epc(p, context))
            .transpose()?;
        doc.child_epcs = index_epcs(&self.child_epcs, context)?;
        doc.child_quantity_list = index_quantities(&self.child_quantity_list, context)?;
        doc.biz_transaction_list = index_biz_transactions(&self.biz_transaction_list, context)?;
        Ok(())
    }

    fn from_indexed(
        doc: &IndexedEvent,
        base: EventBase,
        renderer: &Renderer,
    ) -> Result<Self, ConvertError> {
        Ok(AssociationEvent {
            base,
            action: require_action(doc)?,
            parent_id: restore_epc_opt(doc.parent_id.as_ref(), renderer)?,
            child_epcs: restore_epcs(&doc.child_epcs, renderer)?,
            child_quantity_list: restore_quantities(&doc.child_quantity_list, renderer)?,
            biz_transaction_list: restore_biz_transactions(&doc.biz_transaction_list, renderer)?,
        })
    }
}

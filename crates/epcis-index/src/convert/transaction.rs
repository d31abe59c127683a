use epcis_core::{EventBase, ResolveContext, TransactionEvent};

use super::common::{
    index_biz_transactions, index_epc, index_epcs, index_quantities, require_action,
    restore_biz_transactions, restore_epc_opt, restore_epcs, restore_quantities,
};
use super::{Renderer, VariantConversion};
use crate::error::ConvertError;
use crate::indexed::IndexedEvent;

impl VariantConversion for TransactionEvent {
    const EVENT_TYPE: &'static str = "TransactionEvent";

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
        doc.epc_list = index_epcs(&self.epc_list, context)?;
        doc.quantity_list = index_quantities(&self.quantity_list, context)?;
        doc.biz_transaction_list = index_biz_transactions(&self.biz_transaction_list, context)?;
        Ok(())
    }

    fn from_indexed(
        doc: &IndexedEvent,
        base: EventBase,
        renderer: &Renderer,
    ) -> Result<Self, ConvertError> {
        Ok(TransactionEvent {
            base,
            action: require_action(doc)?,
            parent_id: restore_epc_opt(doc.parent_id.as_ref(), renderer)?,
            epc_list: restore_epcs(&doc.epc_list, renderer)?,
            quantity_list: restore_quantities(&doc.quantity_list, renderer)?,
            biz_transaction_list: restore_biz_transactions(&doc.biz_transaction_list, renderer)?,
        })
    }
}

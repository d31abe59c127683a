use epcis_core::{EventBase, ObjectEvent, ResolveContext};

use super::common::{
    index_biz_transactions, index_epcs, index_persistent_disposition, index_quantities,
    require_action, restore_biz_transactions, restore_epcs, restore_persistent_disposition,
    restore_quantities,
};
use super::{Renderer, VariantConversion};
use crate::error::ConvertError;
use crate::indexed::IndexedEvent;

impl VariantConversion for ObjectEvent {
    const EVENT_TYPE: &'static str = "ObjectEvent";

    fn base(&self) -> &EventBase {
        &self.base
    }

    fn index_fields(
        &self,
        doc: &mut IndexedEvent,
        context: &ResolveContext,
    ) -> Result<(), ConvertError> {
        doc.action = Some(self.action);
        doc.epc_list = index_epcs(&self.epc_list, context)?;
        doc.quantity_list = index_quantities(&self.quantity_list, context)?;
        doc.biz_transaction_list = index_biz_transactions(&self.biz_transaction_list, context)?;
        doc.ilmd = self.ilmd.clone();
        doc.persistent_disposition =
            index_persistent_disposition(self.persistent_disposition.as_ref(), context)?;
        Ok(())
    }

    fn from_indexed(
        doc: &IndexedEvent,
        base: EventBase,
        renderer: &Renderer,
    ) -> Result<Self, ConvertError> {
        Ok(ObjectEvent {
            base,
            action: require_action(doc)?,
            epc_list: restore_epcs(&doc.epc_list, renderer)?,
            quantity_list: restore_quantities(&doc.quantity_list, renderer)?,
            biz_transaction_list: restore_biz_transactions(&doc.biz_transaction_list, renderer)?,
            ilmd: doc.ilmd.clone(),
            persistent_disposition: restore_persistent_disposition(
                doc.persistent_disposition.as_ref(),
                renderer,
            )?,
        })
    }
}

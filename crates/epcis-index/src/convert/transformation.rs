use epcis_core::{EventBase, ResolveContext, TransformationEvent};

use super::common::{
    index_biz_transactions, index_epcs, index_persistent_disposition, index_quantities,
    restore_biz_transactions, restore_epcs, restore_persistent_disposition, restore_quantities,
};
use super::{Renderer, VariantConversion};
use crate::error::ConvertError;
use crate::indexed::IndexedEvent;

impl VariantConversion for TransformationEvent {
    const EVENT_TYPE: &'static str = "TransformationEvent";

    fn base(&self) -> &EventBase {
        &self.base
    }

    fn index_fields(
        &self,
        doc: &mut IndexedEvent,
        context: &ResolveContext,
    ) -> Result<(), ConvertError> {
        doc.input_epc_list = index_epcs(&self.input_epc_list, context)?;
        doc.output_epc_list = index_epcs(&self.output_epc_list, context)?;
        doc.input_quantity_list = index_quantities(&self.input_quantity_list, context)?;
        doc.output_quantity_list = index_quantities(&self.output_quantity_list, context)?;
        doc.transformation_id = self.transformation_id.clone();
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
        // Stored action on a transformation is ignored; the variant has none.
        Ok(TransformationEvent {
            base,
            input_epc_list: restore_epcs(&doc.input_epc_list, renderer)?,
            output_epc_list: restore_epcs(&doc.output_epc_list, renderer)?,
            input_quantity_list: restore_quantities(&doc.input_quantity_list, renderer)?,
            output_quantity_list: restore_quantities(&doc.output_quantity_list, renderer)?,
            transformation_id: doc.transformation_id.clone(),
            biz_transaction_list: restore_biz_transactions(&doc.biz_transaction_list, renderer)?,
            ilmd: doc.ilmd.clone(),
            persistent_disposition: restore_persistent_disposition(
                doc.persistent_disposition.as_ref(),
                renderer,
            )?,
        })
    }
}

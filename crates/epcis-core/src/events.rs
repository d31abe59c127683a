use epcis_canonical::{CaptureId, EventHash, TimeZoneOffset, Timestamp, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::context::ContextEntry;
use crate::identifier::IdentifierValue;
use crate::shared::{
    Action, BizLocation, BizTransaction, Destination, ErrorDeclaration, PersistentDisposition,
    QuantityElement, ReadPoint, SensorElement, Source, UserExtensions,
};
use crate::vocabulary::{self, VocabularyTerm};

/// Members common to every event type.
///
/// Flattened into each variant on the wire, so a serialized event is a
/// single JSON object tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventBase {
    /// Event identifier; defaults to the event hash at capture.
    #[serde(rename = "eventID", default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    /// When the event took place.
    pub event_time: Timestamp,
    /// When the event was recorded by the repository.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_time: Option<Timestamp>,
    /// Local time zone offset at the point of observation.
    pub event_time_zone_offset: TimeZoneOffset,
    /// Content hash, assigned once at capture.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<EventHash>,
    /// Capture job that ingested the event.
    #[serde(rename = "captureID", default, skip_serializing_if = "Option::is_none")]
    pub capture_id: Option<CaptureId>,
    /// Position of the event inside its capture document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence_in_document: Option<u64>,
    /// Present when the event was declared erroneous.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_declaration: Option<ErrorDeclaration>,
    /// Certification information, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certification_info: Option<Value>,
    /// Business step.
    #[serde(
        default,
        deserialize_with = "vocabulary::biz_step::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub biz_step: Option<VocabularyTerm>,
    /// Disposition.
    #[serde(
        default,
        deserialize_with = "vocabulary::disposition::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub disposition: Option<VocabularyTerm>,
    /// Read point.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_point: Option<ReadPoint>,
    /// Business location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub biz_location: Option<BizLocation>,
    /// Sources.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source_list: Vec<Source>,
    /// Destinations.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub destination_list: Vec<Destination>,
    /// Sensor data.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sensor_element_list: Vec<SensorElement>,
    /// Legacy `extension` member.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<Map<String, Value>>,
    /// JSON-LD context the event's terms are resolved against.
    #[serde(
        rename = "@context",
        default,
        deserialize_with = "crate::context::one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub context: Vec<ContextEntry>,
    /// Namespaced top-level user extensions.
    #[serde(flatten)]
    pub user_extensions: UserExtensions,
}

impl EventBase {
    /// Creates a base with only the mandatory members set.
    pub fn new(event_time: Timestamp, event_time_zone_offset: TimeZoneOffset) -> Self {
        Self {
            event_id: None,
            event_time,
            record_time: None,
            event_time_zone_offset,
            hash: None,
            capture_id: None,
            sequence_in_document: None,
            error_declaration: None,
            certification_info: None,
            biz_step: None,
            disposition: None,
            read_point: None,
            biz_location: None,
            source_list: Vec::new(),
            destination_list: Vec::new(),
            sensor_element_list: Vec::new(),
            extension: None,
            context: Vec::new(),
            user_extensions: UserExtensions::new(),
        }
    }

    /// Re-checks the literal newtypes, which deserialization does not validate.
    pub fn validate(&self) -> Result<(), ValidationError> {
        Timestamp::parse(self.event_time.as_str())?;
        TimeZoneOffset::parse(self.event_time_zone_offset.as_str())?;
        if let Some(record_time) = &self.record_time {
            Timestamp::parse(record_time.as_str())?;
        }
        if let Some(declaration) = &self.error_declaration {
            Timestamp::parse(declaration.declaration_time.as_str())?;
        }
        if let Some(hash) = &self.hash {
            EventHash::parse(hash.as_str())?;
        }
        if let Some(capture_id) = &self.capture_id {
            CaptureId::parse(capture_id.as_str())?;
        }
        Ok(())
    }
}

/// Observation of objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectEvent {
    /// Common members.
    #[serde(flatten)]
    pub base: EventBase,
    /// Lifecycle action.
    pub action: Action,
    /// Instance-level identifiers.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub epc_list: Vec<IdentifierValue>,
    /// Class-level quantities.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub quantity_list: Vec<QuantityElement>,
    /// Business transactions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub biz_transaction_list: Vec<BizTransaction>,
    /// Instance/lot master data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ilmd: Option<Map<String, Value>>,
    /// Persistent dispositions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persistent_disposition: Option<PersistentDisposition>,
}

/// Packing into or unpacking from a parent container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationEvent {
    /// Common members.
    #[serde(flatten)]
    pub base: EventBase,
    /// Lifecycle action.
    pub action: Action,
    /// Container identifier.
    #[serde(rename = "parentID", default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<IdentifierValue>,
    /// Contained instance-level identifiers.
    #[serde(rename = "childEPCs", default, skip_serializing_if = "Vec::is_empty")]
    pub child_epcs: Vec<IdentifierValue>,
    /// Contained class-level quantities.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub child_quantity_list: Vec<QuantityElement>,
    /// Business transactions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub biz_transaction_list: Vec<BizTransaction>,
}

/// Association of objects with a business transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionEvent {
    /// Common members.
    #[serde(flatten)]
    pub base: EventBase,
    /// Lifecycle action.
    pub action: Action,
    /// Container identifier.
    #[serde(rename = "parentID", default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<IdentifierValue>,
    /// Instance-level identifiers.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub epc_list: Vec<IdentifierValue>,
    /// Class-level quantities.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub quantity_list: Vec<QuantityElement>,
    /// Business transactions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub biz_transaction_list: Vec<BizTransaction>,
}

/// Inputs consumed to produce outputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformationEvent {
    /// Common members.
    #[serde(flatten)]
    pub base: EventBase,
    /// Consumed instance-level identifiers.
    #[serde(rename = "inputEPCList", default, skip_serializing_if = "Vec::is_empty")]
    pub input_epc_list: Vec<IdentifierValue>,
    /// Produced instance-level identifiers.
    #[serde(rename = "outputEPCList", default, skip_serializing_if = "Vec::is_empty")]
    pub output_epc_list: Vec<IdentifierValue>,
    /// Consumed class-level quantities.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub input_quantity_list: Vec<QuantityElement>,
    /// Produced class-level quantities.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub output_quantity_list: Vec<QuantityElement>,
    /// Links transformation steps that span several events.
    #[serde(rename = "transformationID", default, skip_serializing_if = "Option::is_none")]
    pub transformation_id: Option<String>,
    /// Business transactions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub biz_transaction_list: Vec<BizTransaction>,
    /// Instance/lot master data of the outputs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ilmd: Option<Map<String, Value>>,
    /// Persistent dispositions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persistent_disposition: Option<PersistentDisposition>,
}

/// Association of physical assets with a parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssociationEvent {
    /// Common members.
    #[serde(flatten)]
    pub base: EventBase,
    /// Lifecycle action.
    pub action: Action,
    /// Parent asset identifier.
    #[serde(rename = "parentID", default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<IdentifierValue>,
    /// Associated instance-level identifiers.
    #[serde(rename = "childEPCs", default, skip_serializing_if = "Vec::is_empty")]
    pub child_epcs: Vec<IdentifierValue>,
    /// Associated class-level quantities.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub child_quantity_list: Vec<QuantityElement>,
    /// Business transactions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub biz_transaction_list: Vec<BizTransaction>,
}

/// An EPCIS 2.0 event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EpcisEvent {
    /// ObjectEvent.
    ObjectEvent(ObjectEvent),
    /// AggregationEvent.
    AggregationEvent(AggregationEvent),
    /// TransactionEvent.
    TransactionEvent(TransactionEvent),
    /// TransformationEvent.
    TransformationEvent(TransformationEvent),
    /// AssociationEvent.
    AssociationEvent(AssociationEvent),
}

impl EpcisEvent {
    /// Wire name of the variant.
    pub fn event_type(&self) -> &'static str {
        match self {
            EpcisEvent::ObjectEvent(_) => "ObjectEvent",
            EpcisEvent::AggregationEvent(_) => "AggregationEvent",
            EpcisEvent::TransactionEvent(_) => "TransactionEvent",
            EpcisEvent::TransformationEvent(_) => "TransformationEvent",
            EpcisEvent::AssociationEvent(_) => "AssociationEvent",
        }
    }

    /// Common members.
    pub fn base(&self) -> &EventBase {
        match self {
            EpcisEvent::ObjectEvent(e) => &e.base,
            EpcisEvent::AggregationEvent(e) => &e.base,
            EpcisEvent::TransactionEvent(e) => &e.base,
            EpcisEvent::TransformationEvent(e) => &e.base,
            EpcisEvent::AssociationEvent(e) => &e.base,
        }
    }

    pub(crate) fn base_mut(&mut self) -> &mut EventBase {
        match self {
            EpcisEvent::ObjectEvent(e) => &mut e.base,
            EpcisEvent::AggregationEvent(e) => &mut e.base,
            EpcisEvent::TransactionEvent(e) => &mut e.base,
            EpcisEvent::TransformationEvent(e) => &mut e.base,
            EpcisEvent::AssociationEvent(e) => &mut e.base,
        }
    }

    /// Lifecycle action; TransformationEvent has none.
    pub fn action(&self) -> Option<Action> {
        match self {
            EpcisEvent::ObjectEvent(e) => Some(e.action),
            EpcisEvent::AggregationEvent(e) => Some(e.action),
            EpcisEvent::TransactionEvent(e) => Some(e.action),
            EpcisEvent::TransformationEvent(_) => None,
            EpcisEvent::AssociationEvent(e) => Some(e.action),
        }
    }

    /// Business transactions of any variant.
    pub fn biz_transactions(&self) -> &[BizTransaction] {
        match self {
            EpcisEvent::ObjectEvent(e) => &e.biz_transaction_list,
            EpcisEvent::AggregationEvent(e) => &e.biz_transaction_list,
            EpcisEvent::TransactionEvent(e) => &e.biz_transaction_list,
            EpcisEvent::TransformationEvent(e) => &e.biz_transaction_list,
            EpcisEvent::AssociationEvent(e) => &e.biz_transaction_list,
        }
    }

    /// Parses a single event from wire JSON.
    pub fn from_json(input: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(input)
    }

    /// Re-checks the literal newtypes of the common members.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.base().validate()
    }

    /// Stamps `recordTime` unless the event already has one.
    pub fn with_record_time(mut self, record_time: Timestamp) -> Self {
        let base = self.base_mut();
        if base.record_time.is_none() {
            base.record_time = Some(record_time);
        }
        self
    }
}

/// Body of an EPCIS document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpcisBody {
    /// Captured events, in document order.
    #[serde(default)]
    pub event_list: Vec<EpcisEvent>,
}

/// An EPCIS 2.0 capture document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpcisDocument {
    /// Document-level JSON-LD context.
    #[serde(
        rename = "@context",
        default,
        deserialize_with = "crate::context::one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub context: Vec<ContextEntry>,
    /// Schema version, `2.0` for EPCIS 2.0 documents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<String>,
    /// Document creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<Timestamp>,
    /// Event container.
    pub epcis_body: EpcisBody,
    /// Every other document member (`type`, `id`, `epcisHeader`, ...).
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl EpcisDocument {
    /// Parses a document from wire JSON.
    pub fn from_json(input: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(input)
    }

    /// Takes the events out of the document. Events without their own
    /// `@context` inherit the document context.
    pub fn into_events(self) -> Vec<EpcisEvent> {
        let context = self.context;
        self.epcis_body
            .event_list
            .into_iter()
            .map(|mut event| {
                let base = event.base_mut();
                if base.context.is_empty() {
                    base.context = context.clone();
                }
                event
            })
            .collect()
    }
}

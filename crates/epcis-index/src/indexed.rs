//! Storage-optimized event document.
//!
//! Every identifier and vocabulary term is stored twice: the normalized form
//! the search engine indexes and the literal exactly as captured. Field names
//! are a contract with the storage engine; changing one needs a new
//! [`SCHEMA_VERSION`].

use std::collections::BTreeMap;

use epcis_core::{
    Action, CaptureId, ContextEntry, EventHash, TimeZoneOffset, Timestamp, UserExtensions,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Version of the indexed document layout.
pub const SCHEMA_VERSION: u32 = 1;

/// Normalized and captured forms of one identifier or term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexedValue {
    /// Form used for lookups (canonical Digital Link, CBV URN or custom IRI).
    pub normalized: String,
    /// Literal as captured.
    pub as_captured: String,
}

impl IndexedValue {
    /// Pairs a normalized form with its captured literal.
    pub fn new(normalized: impl Into<String>, as_captured: impl Into<String>) -> Self {
        Self {
            normalized: normalized.into(),
            as_captured: as_captured.into(),
        }
    }
}

/// Stored quantity element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexedQuantity {
    /// Class identifier.
    pub epc_class: IndexedValue,
    /// Amount as captured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Number>,
    /// Unit of measure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uom: Option<String>,
}

/// Stored business transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexedBizTransaction {
    /// Transaction type.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<IndexedValue>,
    /// Transaction identifier.
    pub biz_transaction: String,
}

/// Stored source or destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedSourceDest {
    /// Source/destination type.
    #[serde(rename = "type")]
    pub kind: IndexedValue,
    /// Party or location identifier.
    pub value: IndexedValue,
}

/// Stored sensor reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedSensorReport {
    /// Measurement type.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<IndexedValue>,
    /// Remaining reading members.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub fields: Map<String, Value>,
}

/// Stored sensor element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexedSensorElement {
    /// Device and timing metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensor_metadata: Option<Map<String, Value>>,
    /// Readings.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sensor_report: Vec<IndexedSensorReport>,
}

/// Stored error declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexedErrorDeclaration {
    /// Declaration time.
    pub declaration_time: Timestamp,
    /// Reason.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<IndexedValue>,
    /// Corrective events.
    #[serde(
        rename = "correctiveEventIDs",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub corrective_event_ids: Vec<String>,
}

/// Stored persistent disposition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexedPersistentDisposition {
    /// Dispositions set.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub set: Vec<IndexedValue>,
    /// Dispositions cleared.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unset: Vec<IndexedValue>,
}

/// Who captured the event and when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapturedBy {
    /// Authenticated user, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Default access group of the user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_group: Option<String>,
    /// Capture time.
    pub timestamp: Timestamp,
    /// Capture job.
    #[serde(rename = "captureID")]
    pub capture_id: CaptureId,
}

/// Repository-side provenance. Lives only in the indexed document; the
/// core event model never carries it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provenance {
    /// Capturing user and job.
    pub captured_by: CapturedBy,
    /// Whether query interfaces may return the event.
    pub visible: bool,
}

/// Capture request details supplied alongside an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureMetadata {
    /// Authenticated user, if any.
    pub user_id: Option<String>,
    /// Default access group of the user.
    pub default_group: Option<String>,
    /// Capture time.
    pub timestamp: Timestamp,
    /// Whether query interfaces may return the event.
    pub visible: bool,
}

impl CaptureMetadata {
    /// Anonymous, visible capture at `timestamp`.
    pub fn new(timestamp: Timestamp) -> Self {
        Self {
            user_id: None,
            default_group: None,
            timestamp,
            visible: true,
        }
    }

    /// Sets the capturing user.
    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Sets the user's default group.
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.default_group = Some(group.into());
        self
    }

    /// Hides the event from query interfaces.
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}

/// An event as stored by the search engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexedEvent {
    /// Event type (`ObjectEvent`, ...).
    #[serde(rename = "type")]
    pub event_type: String,
    /// Layout version, see [`SCHEMA_VERSION`].
    pub schema_version: u32,
    /// Event identifier.
    #[serde(rename = "eventID", default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    /// Event time.
    pub event_time: Timestamp,
    /// Record time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_time: Option<Timestamp>,
    /// Event time zone offset.
    pub event_time_zone_offset: TimeZoneOffset,
    /// Content hash.
    pub hash: EventHash,
    /// Capture job.
    #[serde(rename = "captureID")]
    pub capture_id: CaptureId,
    /// Position inside the capture document.
    pub sequence_in_document: u64,
    /// Provenance.
    pub metadata: Provenance,
    /// Lifecycle action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<Action>,
    /// Business step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub biz_step: Option<IndexedValue>,
    /// Disposition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disposition: Option<IndexedValue>,
    /// Persistent disposition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persistent_disposition: Option<IndexedPersistentDisposition>,
    /// Read point id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_point: Option<IndexedValue>,
    /// Business location id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub biz_location: Option<IndexedValue>,
    /// Parent identifier.
    #[serde(rename = "parentID", default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<IndexedValue>,
    /// `epcList`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub epc_list: Vec<IndexedValue>,
    /// `childEPCs`.
    #[serde(rename = "childEPCs", default, skip_serializing_if = "Vec::is_empty")]
    pub child_epcs: Vec<IndexedValue>,
    /// `inputEPCList`.
    #[serde(rename = "inputEPCList", default, skip_serializing_if = "Vec::is_empty")]
    pub input_epc_list: Vec<IndexedValue>,
    /// `outputEPCList`.
    #[serde(rename = "outputEPCList", default, skip_serializing_if = "Vec::is_empty")]
    pub output_epc_list: Vec<IndexedValue>,
    /// `quantityList`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub quantity_list: Vec<IndexedQuantity>,
    /// `childQuantityList`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub child_quantity_list: Vec<IndexedQuantity>,
    /// `inputQuantityList`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub input_quantity_list: Vec<IndexedQuantity>,
    /// `outputQuantityList`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub output_quantity_list: Vec<IndexedQuantity>,
    /// Transformation link.
    #[serde(rename = "transformationID", default, skip_serializing_if = "Option::is_none")]
    pub transformation_id: Option<String>,
    /// Business transactions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub biz_transaction_list: Vec<IndexedBizTransaction>,
    /// Sources.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source_list: Vec<IndexedSourceDest>,
    /// Destinations.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub destination_list: Vec<IndexedSourceDest>,
    /// Sensor data.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sensor_element_list: Vec<IndexedSensorElement>,
    /// Error declaration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_declaration: Option<IndexedErrorDeclaration>,
    /// Instance/lot master data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ilmd: Option<Map<String, Value>>,
    /// Certification information.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certification_info: Option<Value>,
    /// Legacy `extension` member.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<Map<String, Value>>,
    /// Top-level user extensions.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub user_extensions: UserExtensions,
    /// User extensions of sub-entities, keyed by the sub-entity path
    /// (`readPoint`, `bizLocation`, `errorDeclaration`, `sensorElementList.<n>`).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub inner_user_extensions: BTreeMap<String, UserExtensions>,
    /// The event's JSON-LD context, needed to resolve its terms later.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub context_info: Vec<ContextEntry>,
    /// Normalized referenced identifiers, for inverted lookups.
    #[serde(default)]
    pub epcs: Vec<String>,
    /// Captured referenced identifiers.
    #[serde(default)]
    pub epcs_as_captured: Vec<String>,
}

impl IndexedEvent {
    /// Capture provenance.
    pub fn provenance(&self) -> &Provenance {
        &self.metadata
    }

    /// Parses a stored document.
    pub fn from_json(input: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(input)
    }
}

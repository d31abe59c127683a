//! Sub-entities shared by several event types.

use epcis_canonical::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::identifier::IdentifierValue;
use crate::vocabulary::{self, VocabularyTerm};

/// User extension members keyed by their (namespaced) JSON name.
pub type UserExtensions = Map<String, Value>;

/// Event action for ObjectEvent, AggregationEvent, TransactionEvent and
/// AssociationEvent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    /// Objects entered the scope of the event.
    Add,
    /// Objects were observed without change.
    Observe,
    /// Objects left the scope of the event.
    Delete,
}

/// Quantity of a class of objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantityElement {
    /// Class-level identifier (LGTIN, GTIN pattern, ...).
    #[serde(deserialize_with = "crate::identifier::class_flavor")]
    pub epc_class: IdentifierValue,
    /// Amount; kept as the captured JSON number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Number>,
    /// UN/CEFACT unit of measure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uom: Option<String>,
}

/// Business transaction reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BizTransaction {
    /// Transaction type (`po`, `inv`, ...).
    #[serde(
        rename = "type",
        default,
        deserialize_with = "vocabulary::biz_transaction_type::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<VocabularyTerm>,
    /// Transaction identifier.
    pub biz_transaction: String,
}

/// Entry of `sourceList`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    /// Source type (`owning_party`, `possessing_party`, `location`).
    #[serde(rename = "type", deserialize_with = "vocabulary::source_dest_type::required")]
    pub kind: VocabularyTerm,
    /// Party or location identifier.
    pub source: IdentifierValue,
}

/// Entry of `destinationList`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    /// Destination type (`owning_party`, `possessing_party`, `location`).
    #[serde(rename = "type", deserialize_with = "vocabulary::source_dest_type::required")]
    pub kind: VocabularyTerm,
    /// Party or location identifier.
    pub destination: IdentifierValue,
}

/// Where the event was observed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadPoint {
    /// Location identifier, typically an SGLN.
    pub id: IdentifierValue,
    /// Inner user extensions.
    #[serde(flatten)]
    pub user_extensions: UserExtensions,
}

/// Where the objects are expected to be after the event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BizLocation {
    /// Location identifier, typically an SGLN.
    pub id: IdentifierValue,
    /// Inner user extensions.
    #[serde(flatten)]
    pub user_extensions: UserExtensions,
}

/// Declares an earlier event erroneous.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDeclaration {
    /// When the error was declared.
    pub declaration_time: Timestamp,
    /// Why (`did_not_occur`, `incorrect_data`).
    #[serde(
        default,
        deserialize_with = "vocabulary::error_reason::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub reason: Option<VocabularyTerm>,
    /// Events that correct this one.
    #[serde(
        rename = "correctiveEventIDs",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub corrective_event_ids: Vec<String>,
    /// Inner user extensions.
    #[serde(flatten)]
    pub user_extensions: UserExtensions,
}

/// Sensor data attached to an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorElement {
    /// Device and timing metadata, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensor_metadata: Option<Map<String, Value>>,
    /// Individual readings.
    #[serde(rename = "sensorReport", default, skip_serializing_if = "Vec::is_empty")]
    pub sensor_reports: Vec<SensorReport>,
    /// Inner user extensions.
    #[serde(flatten)]
    pub user_extensions: UserExtensions,
}

/// One sensor reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReport {
    /// Measurement type (`gs1:Temperature`, ...).
    #[serde(
        rename = "type",
        default,
        deserialize_with = "vocabulary::sensor_type::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<VocabularyTerm>,
    /// Every other reading member (value, uom, time, ...), untouched.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Dispositions that persist beyond this event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistentDisposition {
    /// Dispositions set by this event.
    #[serde(
        default,
        deserialize_with = "vocabulary::disposition::list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub set: Vec<VocabularyTerm>,
    /// Dispositions cleared by this event.
    #[serde(
        default,
        deserialize_with = "vocabulary::disposition::list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub unset: Vec<VocabularyTerm>,
}

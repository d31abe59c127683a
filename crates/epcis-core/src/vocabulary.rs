//! CBV vocabulary terms and the standard CBV 2.0 term tables.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::errors::HeaderError;

/// Vocabulary a term belongs to. The category decides which standard
/// prefixes and which term table apply during resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VocabularyCategory {
    /// `bizStep`
    BizStep,
    /// `disposition`, `persistentDisposition`
    Disposition,
    /// `errorDeclaration.reason`
    ErrorReason,
    /// `sourceList[].type`, `destinationList[].type`
    SourceDestType,
    /// `bizTransactionList[].type`
    BizTransactionType,
    /// `sensorReport[].type`
    SensorType,
}

impl VocabularyCategory {
    /// Every category, in declaration order.
    pub const ALL: [VocabularyCategory; 6] = [
        VocabularyCategory::BizStep,
        VocabularyCategory::Disposition,
        VocabularyCategory::ErrorReason,
        VocabularyCategory::SourceDestType,
        VocabularyCategory::BizTransactionType,
        VocabularyCategory::SensorType,
    ];

    /// Standard URN prefix. Sensor types have no URN form.
    pub fn urn_prefix(self) -> Option<&'static str> {
        match self {
            VocabularyCategory::BizStep => Some("urn:epcglobal:cbv:bizstep:"),
            VocabularyCategory::Disposition => Some("urn:epcglobal:cbv:disp:"),
            VocabularyCategory::ErrorReason => Some("urn:epcglobal:cbv:er:"),
            VocabularyCategory::SourceDestType => Some("urn:epcglobal:cbv:sdt:"),
            VocabularyCategory::BizTransactionType => Some("urn:epcglobal:cbv:btt:"),
            VocabularyCategory::SensorType => None,
        }
    }

    /// Standard Web URI prefix.
    pub fn web_uri_prefix(self) -> &'static str {
        match self {
            VocabularyCategory::BizStep => "https://ref.gs1.org/cbv/BizStep-",
            VocabularyCategory::Disposition => "https://ref.gs1.org/cbv/Disp-",
            VocabularyCategory::ErrorReason => "https://ref.gs1.org/cbv/ER-",
            VocabularyCategory::SourceDestType => "https://ref.gs1.org/cbv/SDT-",
            VocabularyCategory::BizTransactionType => "https://ref.gs1.org/cbv/BTT-",
            VocabularyCategory::SensorType => "https://gs1.org/voc/",
        }
    }

    /// Standard compact (CURIE) prefix.
    pub fn compact_prefix(self) -> &'static str {
        match self {
            VocabularyCategory::BizStep => "cbv:BizStep-",
            VocabularyCategory::Disposition => "cbv:Disp-",
            VocabularyCategory::ErrorReason => "cbv:ER-",
            VocabularyCategory::SourceDestType => "cbv:SDT-",
            VocabularyCategory::BizTransactionType => "cbv:BTT-",
            VocabularyCategory::SensorType => "gs1:",
        }
    }

    /// Standard term table.
    pub fn standard_terms(self) -> &'static [&'static str] {
        match self {
            VocabularyCategory::BizStep => BIZ_STEPS,
            VocabularyCategory::Disposition => DISPOSITIONS,
            VocabularyCategory::ErrorReason => ERROR_REASONS,
            VocabularyCategory::SourceDestType => SOURCE_DEST_TYPES,
            VocabularyCategory::BizTransactionType => BIZ_TRANSACTION_TYPES,
            VocabularyCategory::SensorType => SENSOR_TYPES,
        }
    }

    /// Whether `word` is a bare standard term of this category.
    pub fn is_standard_term(self, word: &str) -> bool {
        self.standard_terms().contains(&word)
    }

    /// Strips a standard URN or Web URI prefix, returning the local name.
    pub(crate) fn strip_standard_iri(self, iri: &str) -> Option<&str> {
        self.urn_prefix()
            .and_then(|prefix| iri.strip_prefix(prefix))
            .or_else(|| iri.strip_prefix(self.web_uri_prefix()))
            .filter(|local| !local.is_empty())
    }

    /// JSON field name the category is captured under.
    pub fn field_name(self) -> &'static str {
        match self {
            VocabularyCategory::BizStep => "bizStep",
            VocabularyCategory::Disposition => "disposition",
            VocabularyCategory::ErrorReason => "errorReason",
            VocabularyCategory::SourceDestType => "sourceDestType",
            VocabularyCategory::BizTransactionType => "bizTransactionType",
            VocabularyCategory::SensorType => "sensorType",
        }
    }
}

impl fmt::Display for VocabularyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

impl FromStr for VocabularyCategory {
    type Err = HeaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VocabularyCategory::ALL
            .into_iter()
            .find(|category| category.field_name().eq_ignore_ascii_case(s))
            .ok_or_else(|| HeaderError {
                header: "vocabulary category",
                value: s.to_string(),
            })
    }
}

/// A vocabulary value exactly as captured, plus an optional derived form.
///
/// Like [`IdentifierValue`](crate::IdentifierValue), the literal is fixed at
/// construction and equality only looks at the literal and the category.
#[derive(Debug, Clone)]
pub struct VocabularyTerm {
    literal: String,
    category: VocabularyCategory,
    resolved: Option<String>,
}

impl VocabularyTerm {
    /// Creates a term of the given category.
    pub fn new(literal: impl Into<String>, category: VocabularyCategory) -> Self {
        Self {
            literal: literal.into(),
            category,
            resolved: None,
        }
    }

    /// Attaches the storage-normalized form.
    pub fn with_resolved(mut self, resolved: impl Into<String>) -> Self {
        self.resolved = Some(resolved.into());
        self
    }

    /// The literal as captured.
    pub fn literal(&self) -> &str {
        &self.literal
    }

    /// Vocabulary the term belongs to.
    pub fn category(&self) -> VocabularyCategory {
        self.category
    }

    /// Cached storage-normalized form, if known.
    pub fn resolved(&self) -> Option<&str> {
        self.resolved.as_deref()
    }
}

impl PartialEq for VocabularyTerm {
    fn eq(&self, other: &Self) -> bool {
        self.category == other.category && self.literal == other.literal
    }
}

impl Eq for VocabularyTerm {}

impl fmt::Display for VocabularyTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.literal)
    }
}

impl Serialize for VocabularyTerm {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.literal)
    }
}

// Terms carry their category, which the wire format only implies through
// the field name. Each field picks its category with `deserialize_with`.
macro_rules! category_serde {
    ($($module:ident => $category:ident),* $(,)?) => {$(
        #[allow(dead_code)]
        pub(crate) mod $module {
            use super::*;

            pub fn required<'de, D: Deserializer<'de>>(d: D) -> Result<VocabularyTerm, D::Error> {
                String::deserialize(d)
                    .map(|s| VocabularyTerm::new(s, VocabularyCategory::$category))
            }

            pub fn optional<'de, D: Deserializer<'de>>(
                d: D,
            ) -> Result<Option<VocabularyTerm>, D::Error> {
                Option::<String>::deserialize(d).map(|opt| {
                    opt.map(|s| VocabularyTerm::new(s, VocabularyCategory::$category))
                })
            }

            pub fn list<'de, D: Deserializer<'de>>(
                d: D,
            ) -> Result<Vec<VocabularyTerm>, D::Error> {
                Vec::<String>::deserialize(d).map(|items| {
                    items
                        .into_iter()
                        .map(|s| VocabularyTerm::new(s, VocabularyCategory::$category))
                        .collect()
                })
            }
        }
    )*};
}

category_serde! {
    biz_step => BizStep,
    disposition => Disposition,
    error_reason => ErrorReason,
    source_dest_type => SourceDestType,
    biz_transaction_type => BizTransactionType,
    sensor_type => SensorType,
}

const BIZ_STEPS: &[&str] = &[
    "accepting",
    "arriving",
    "assembling",
    "collecting",
    "commissioning",
    "consigning",
    "creating_class_instance",
    "cycle_counting",
    "decommissioning",
    "departing",
    "destroying",
    "disassembling",
    "dispensing",
    "encoding",
    "entering_exiting",
    "holding",
    "inspecting",
    "installing",
    "killing",
    "loading",
    "other",
    "packing",
    "picking",
    "receiving",
    "removing",
    "repackaging",
    "repairing",
    "replacing",
    "reserving",
    "retail_selling",
    "sampling",
    "sensor_reporting",
    "shipping",
    "staging_outbound",
    "stock_taking",
    "stocking",
    "storing",
    "transporting",
    "unloading",
    "unpacking",
    "void_shipping",
];

const DISPOSITIONS: &[&str] = &[
    "active",
    "available",
    "completeness_inferred",
    "completeness_verified",
    "conformant",
    "container_closed",
    "container_open",
    "damaged",
    "destroyed",
    "dispensed",
    "disposed",
    "encoded",
    "expired",
    "in_progress",
    "in_transit",
    "inactive",
    "mismatch_class",
    "mismatch_instance",
    "mismatch_quantity",
    "needs_replacement",
    "no_pedigree_match",
    "non_conformant",
    "non_sellable_other",
    "partially_dispensed",
    "recalled",
    "reserved",
    "retail_sold",
    "returned",
    "sellable_accessible",
    "sellable_not_accessible",
    "stolen",
    "unavailable",
    "unknown",
];

const ERROR_REASONS: &[&str] = &["did_not_occur", "incorrect_data"];

const SOURCE_DEST_TYPES: &[&str] = &["location", "owning_party", "possessing_party"];

const BIZ_TRANSACTION_TYPES: &[&str] = &[
    "bol", "cert", "desadv", "inv", "pedigree", "po", "poc", "prodorder", "recadv", "rma",
    "testprd", "testres", "upevt",
];

const SENSOR_TYPES: &[&str] = &[
    "AbsoluteHumidity",
    "AbsorbedDose",
    "AbsorbedDoseRate",
    "Acceleration",
    "Altitude",
    "AmountOfSubstance",
    "AmountOfSubstancePerUnitVolume",
    "Angle",
    "AngularAcceleration",
    "AngularMomentum",
    "AngularVelocity",
    "Area",
    "Capacitance",
    "Conductance",
    "Conductivity",
    "Count",
    "Density",
    "Dimensionless",
    "DoseEquivalent",
    "DoseEquivalentRate",
    "DynamicViscosity",
    "ElectricCharge",
    "ElectricCurrent",
    "ElectricCurrentDensity",
    "ElectricFieldStrength",
    "Energy",
    "Exposure",
    "Force",
    "Frequency",
    "Illuminance",
    "Inductance",
    "Irradiance",
    "KinematicViscosity",
    "Length",
    "LinearMomentum",
    "Luminance",
    "LuminousFlux",
    "LuminousIntensity",
    "MagneticFieldStrength",
    "MagneticFlux",
    "MagneticFluxDensity",
    "Mass",
    "MassConcentration",
    "MassFlowRate",
    "MassPerAreaTime",
    "MassPerLength",
    "MemoryCapacity",
    "Molality",
    "MolarMass",
    "Power",
    "Pressure",
    "Radiance",
    "RadiantFlux",
    "RadiantIntensity",
    "RelativeHumidity",
    "Resistance",
    "Resistivity",
    "SolidAngle",
    "SoundPressure",
    "SpecificVolume",
    "Speed",
    "Temperature",
    "Time",
    "Torque",
    "Voltage",
    "Volume",
    "VolumeFlowRate",
    "VolumePerEnergy",
];

//! Identifier and vocabulary normalization for EPCIS 2.0 events.
//!
//! This crate provides:
//! - The five EPCIS event types with their shared sub-entities
//! - EPC identifiers and CBV terms that keep their captured literal
//! - EPC URN and GS1 Digital Link codecs over a common GS1 key model
//! - Vocabulary resolution against a pre-indexed JSON-LD context
//! - Event identity (content hash, capture id, sequence) and referenced EPCs
//!
//! Core invariants:
//! - The captured literal of an identifier or term never changes
//! - `Never_Translates` returns the captured literal for any input
//! - Canonical Digital Link output is a fixed point of parse + render
//! - Resolution is pure; all inputs travel in a [`ResolveContext`]
//!
#![deny(missing_docs)]

/// JSON-LD context entries and the pre-built context index.
pub mod context;
/// GS1 Digital Link codec.
mod digital_link;
/// EPC URN codec.
mod epc_urn;
/// Error types for core operations.
pub mod errors;
/// Event types.
pub mod events;
/// Client format preferences.
pub mod format;
/// GS1 key model and settings.
pub mod gs1;
/// Captured EPC identifiers.
pub mod identifier;
/// Event identity assignment and verification.
pub mod identity;
/// Referenced identifier derivation.
pub mod referenced;
/// Identifier and vocabulary resolution.
pub mod resolver;
/// Sub-entities shared across event types.
pub mod shared;
/// CBV vocabulary terms and tables.
pub mod vocabulary;

pub use context::{ContextEntry, ContextIndex};
pub use digital_link::CANONICAL_HOST;
pub use errors::{CoreError, HeaderError, IdentityError, ResolveError};
pub use events::{
    AggregationEvent, AssociationEvent, EpcisBody, EpcisDocument, EpcisEvent, EventBase,
    ObjectEvent, TransactionEvent, TransformationEvent,
};
pub use format::{CbvFormat, EpcFormat, FormatPreference};
pub use gs1::{CompanyPrefix, Gs1Settings};
pub use identifier::{EpcFlavor, EpcSyntax, IdentifierValue};
pub use identity::EventIdentity;
pub use referenced::DedupStrategy;
pub use resolver::{
    interpret_cbv, normalize_cbv, normalize_epc, resolve_cbv, resolve_cbv_all, resolve_epc,
    ResolveContext, TermInterpretation,
};
pub use shared::{
    Action, BizLocation, BizTransaction, Destination, ErrorDeclaration, PersistentDisposition,
    QuantityElement, ReadPoint, SensorElement, SensorReport, Source, UserExtensions,
};
pub use vocabulary::{VocabularyCategory, VocabularyTerm};

pub use epcis_canonical::{CaptureId, EventHash, TimeZoneOffset, Timestamp};

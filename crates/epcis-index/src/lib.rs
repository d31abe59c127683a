//! Storage-side model for EPCIS events.
//!
//! This crate provides:
//! - `IndexedEvent`, the document a search engine stores, holding every
//!   identifier and term in both normalized and captured form
//! - `to_indexed` for the capture path and `to_core` for the query path
//! - `ConversionOptions` selecting output formats and the resolving context
//!
//! Core invariants:
//! - `to_core(to_indexed(e), ConversionOptions::as_captured()) == e`
//! - Provenance lives only in the indexed document
//! - Events are indexed only after identity assignment

#![deny(missing_docs)]

/// Core/indexed conversion.
pub mod convert;
/// Error types for conversion.
pub mod error;
/// Indexed document layout.
pub mod indexed;

pub use convert::{to_core, to_indexed, ConversionOptions, Renderer, VariantConversion};
pub use error::ConvertError;
pub use indexed::{
    CaptureMetadata, CapturedBy, IndexedBizTransaction, IndexedErrorDeclaration, IndexedEvent,
    IndexedPersistentDisposition, IndexedQuantity, IndexedSensorElement, IndexedSensorReport,
    IndexedSourceDest, IndexedValue, Provenance, SCHEMA_VERSION,
};

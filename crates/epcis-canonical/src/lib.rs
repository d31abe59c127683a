//! Canonical primitives for the EPCIS normalization crates.
//!
//! Everything that participates in event hashing lives here: RFC 8785
//! canonical JSON, the `ni:///sha-256` event hash and the validated literal
//! newtypes (timestamps, offsets, capture identifiers).
//!
#![deny(missing_docs)]

/// Canonicalization helpers for deterministic hashing.
pub mod canonicalizer;
/// Event hash computation and verification.
pub mod event_hash;
/// Validated literal newtypes.
pub mod identifiers;
/// Validation helpers used by canonical types.
pub mod validation;

pub use canonicalizer::{CanonicalizationError, Canonicalizer};
pub use event_hash::{compute_event_hash, verify_event_hash, EventHashError, HASH_EXCLUDED_FIELDS};
pub use identifiers::{CaptureId, EventHash, TimeZoneOffset, Timestamp};
pub use validation::ValidationError;

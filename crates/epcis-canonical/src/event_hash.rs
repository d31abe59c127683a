//! Content-derived event hashes.
//!
//! The hash is `sha256(canonical_bytes(event))` rendered as
//! `ni:///sha-256;<hex>?ver=CBV2.0`, where the canonical bytes are the
//! RFC 8785 form of the event JSON with the [`HASH_EXCLUDED_FIELDS`] removed
//! and every JSON number stringified.

use crate::{Canonicalizer, EventHash};
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest as Sha2Digest, Sha256};

/// Top-level event members that never contribute to the hash.
///
/// These are either assigned by the repository (`recordTime`, identity
/// fields), allowed to change after capture (`errorDeclaration`,
/// `certificationInfo`) or purely presentational (`@context`).
pub const HASH_EXCLUDED_FIELDS: &[&str] = &[
    "eventID",
    "recordTime",
    "errorDeclaration",
    "certificationInfo",
    "@context",
    "hash",
    "captureID",
    "sequenceInDocument",
];

/// Computes the event hash for a serializable event.
///
/// The value is hashed as given; callers normalize identifiers and terms
/// first when equivalent spellings must hash alike.
///
/// # Example
///
/// ```rust
/// use epcis_canonical::{compute_event_hash, Canonicalizer};
/// use serde_json::json;
///
/// let event = json!({
///     "type": "ObjectEvent",
///     "eventTime": "2024-01-01T00:00:00Z",
///     "eventTimeZoneOffset": "+00:00",
///     "action": "OBSERVE",
///     "epcList": ["urn:epc:id:sgtin:0614141.107346.2017"]
/// });
///
/// let hash = compute_event_hash(&event, &Canonicalizer::new())?;
/// assert!(hash.as_str().starts_with("ni:///sha-256;"));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
///
/// # Errors
///
/// Returns [`EventHashError`] if serialization or canonicalization fails.
pub fn compute_event_hash<T: Serialize>(
    event: &T,
    canonicalizer: &Canonicalizer,
) -> Result<EventHash, EventHashError> {
    let mut value: Value =
        serde_json::to_value(event).map_err(|e| EventHashError::Serialization(e.to_string()))?;

    match &mut value {
        Value::Object(map) => {
            for field in HASH_EXCLUDED_FIELDS {
                map.remove(*field);
            }
        }
        _ => return Err(EventHashError::NotAnObject),
    }

    // Numbers are hashed by their JSON text so that 1 and 1.0 stay distinct
    stringify_numbers(&mut value);

    let bytes = canonicalizer.canonicalize(&value)?;

    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    let hash_bytes = hasher.finalize();

    Ok(EventHash::from_sha256(&hash_bytes)?)
}

/// Error during event hash computation.
#[derive(thiserror::Error, Debug)]
pub enum EventHashError {
    /// Serialization failed.
    #[error("serialization failed: {0}")]
    Serialization(String),
    /// The event did not serialize to a JSON object.
    #[error("event must serialize to a JSON object")]
    NotAnObject,
    /// Canonicalization failed.
    #[error("canonicalization failed: {0}")]
    Canonicalization(#[from] crate::CanonicalizationError),
    /// Hash literal construction failed.
    #[error("hash construction failed: {0}")]
    Hash(#[from] crate::ValidationError),
}

/// Recursively converts all JSON numbers into strings.
fn stringify_numbers(value: &mut Value) {
    match value {
        Value::Number(n) => {
            let s = n.to_string();
            *value = Value::String(s);
        }
        Value::Array(arr) => {
            for v in arr {
                stringify_numbers(v);
            }
        }
        Value::Object(map) => {
            for v in map.values_mut() {
                stringify_numbers(v);
            }
        }
        _ => {}
    }
}

/// Verifies that a claimed hash matches the computed hash.
///
/// # Errors
///
/// Returns [`EventHashError`] if computation fails.
pub fn verify_event_hash<T: Serialize>(
    event: &T,
    claimed: &EventHash,
    canonicalizer: &Canonicalizer,
) -> Result<bool, EventHashError> {
    let computed = compute_event_hash(event, canonicalizer)?;
    Ok(claimed == &computed)
}

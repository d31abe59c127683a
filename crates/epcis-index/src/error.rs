//! Error types for canonical/indexed conversion.

use epcis_core::ResolveError;
use thiserror::Error;

/// Errors that can occur while converting between the core and indexed models.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// An identifier or term could not be resolved.
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    /// A literal newtype failed validation at capture.
    #[error("invalid literal: {0}")]
    Validation(#[from] epcis_canonical::ValidationError),
    /// Events are indexed only after identity assignment.
    #[error("{0} has no identity; assign one before indexing")]
    MissingIdentity(&'static str),
    /// The stored document cannot be turned back into an event.
    #[error("invalid indexed document: {0}")]
    InvalidIndexedDocument(String),
}

impl ConvertError {
    /// Returns true when the captured content itself was rejected.
    pub fn is_validation(&self) -> bool {
        match self {
            ConvertError::Resolve(err) => err.is_validation(),
            ConvertError::Validation(_) => true,
            ConvertError::MissingIdentity(_) | ConvertError::InvalidIndexedDocument(_) => false,
        }
    }
}

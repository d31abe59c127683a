use thiserror::Error;

/// Errors raised while resolving an identifier or vocabulary term into a
/// target format.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The identifier literal cannot be parsed under any supported syntax.
    #[error("invalid identifier '{literal}': {reason}")]
    InvalidIdentifier {
        /// Offending literal.
        literal: String,
        /// What was wrong with it.
        reason: String,
    },
    /// The vocabulary literal cannot be parsed under any supported syntax.
    #[error("invalid vocabulary term '{literal}': {reason}")]
    InvalidTerm {
        /// Offending literal.
        literal: String,
        /// What was wrong with it.
        reason: String,
    },
    /// The literal is well formed but its scheme has no rendering in the
    /// requested format.
    #[error("cannot render '{literal}' (scheme {scheme}) as {target}")]
    FormatConversion {
        /// Scheme of the literal (e.g. `urn:uuid`, `gid`, `sgtin (instance)`).
        scheme: String,
        /// Offending literal.
        literal: String,
        /// Requested target format.
        target: &'static str,
    },
}

impl ResolveError {
    pub(crate) fn invalid_identifier(literal: &str, reason: impl Into<String>) -> Self {
        ResolveError::InvalidIdentifier {
            literal: literal.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_term(literal: &str, reason: impl Into<String>) -> Self {
        ResolveError::InvalidTerm {
            literal: literal.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn conversion(
        scheme: impl Into<String>,
        literal: &str,
        target: &'static str,
    ) -> Self {
        ResolveError::FormatConversion {
            scheme: scheme.into(),
            literal: literal.to_string(),
            target,
        }
    }

    /// Returns true for malformed literals that must be rejected at capture.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ResolveError::InvalidIdentifier { .. } | ResolveError::InvalidTerm { .. }
        )
    }

    /// Returns true when only the requested rendering is unavailable.
    pub fn is_format_conversion(&self) -> bool {
        matches!(self, ResolveError::FormatConversion { .. })
    }

    /// The literal this error is about.
    pub fn literal(&self) -> &str {
        match self {
            ResolveError::InvalidIdentifier { literal, .. }
            | ResolveError::InvalidTerm { literal, .. }
            | ResolveError::FormatConversion { literal, .. } => literal,
        }
    }
}

/// Error returned for unknown format header values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {header} value '{value}'")]
pub struct HeaderError {
    /// Header the value was given for.
    pub header: &'static str,
    /// Offending value.
    pub value: String,
}

/// Errors raised while assigning event identity.
#[derive(Error, Debug)]
pub enum IdentityError {
    /// Identity is assigned once at capture and never replaced.
    #[error("event identity already assigned (hash {0})")]
    AlreadyAssigned(String),
    /// Hash computation failed.
    #[error("event hash computation failed: {0}")]
    Hash(#[from] epcis_canonical::EventHashError),
    /// An identifier or term could not be normalized for hashing.
    #[error("event cannot be hashed: {0}")]
    Resolve(#[from] ResolveError),
}

/// Core error types.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Identifier or vocabulary resolution failed.
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    /// Unknown format header value.
    #[error(transparent)]
    Header(#[from] HeaderError),
    /// Identity assignment failed.
    #[error(transparent)]
    Identity(#[from] IdentityError),
    /// Literal validation failed.
    #[error("invalid literal: {0}")]
    Validation(#[from] epcis_canonical::ValidationError),
    /// Wire JSON could not be parsed into the event model.
    #[error("invalid event JSON: {0}")]
    Json(#[from] serde_json::Error),
}

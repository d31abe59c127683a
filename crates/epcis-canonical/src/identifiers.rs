use crate::validation::ValidationError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! newtype {
    ($name:ident, $doc:expr, $pattern:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new instance without validation; callers are responsible for conformity.
            pub fn new(value: String) -> Self {
                Self(value)
            }

            /// Parses a validated value from a string.
            pub fn parse(value: impl Into<String>) -> Result<Self, ValidationError> {
                static PATTERN: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
                let s = value.into();
                if s.is_empty() {
                    return Err(ValidationError::Empty {
                        field: stringify!($name),
                    });
                }
                let re = PATTERN.get_or_init(|| Regex::new($pattern).expect("invalid regex"));
                if !re.is_match(&s) {
                    return Err(ValidationError::PatternMismatch {
                        field: stringify!($name),
                        value: s,
                    });
                }
                Ok(Self(s))
            }

            /// Returns the literal.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

newtype!(
    Timestamp,
    "RFC 3339 timestamp with either a `Z` suffix or a numeric offset.",
    r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(\.\d{1,9})?(Z|[+-]\d{2}:\d{2})$"
);
newtype!(
    TimeZoneOffset,
    "Event time zone offset such as `+02:00` or `-06:00`.",
    r"^[+-]((0\d|1[0-3]):[0-5]\d|14:00)$"
);
newtype!(
    CaptureId,
    "Identifier of the capture job that ingested an event.",
    r"^[A-Za-z0-9][A-Za-z0-9._:-]{0,127}$"
);
newtype!(
    EventHash,
    "Content-derived event hash in the `ni:///sha-256;<hex>?ver=CBV2.0` form.",
    r"^ni:///sha-256;[0-9a-f]{64}\?ver=CBV2\.0$"
);

impl EventHash {
    /// Builds the hash literal from raw SHA-256 output.
    pub fn from_sha256(bytes: &[u8]) -> Result<Self, ValidationError> {
        Self::parse(format!("ni:///sha-256;{}?ver=CBV2.0", hex::encode(bytes)))
    }

    /// Returns the lowercase hex digest portion.
    pub fn hex_digest(&self) -> &str {
        self.0
            .strip_prefix("ni:///sha-256;")
            .and_then(|rest| rest.split('?').next())
            .unwrap_or_default()
    }
}

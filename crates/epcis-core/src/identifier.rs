//! Captured EPC identifiers.

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

use crate::digital_link;

/// Whether an identifier names one object or a class of objects.
///
/// Digital Link rendering differs between the two: class identifiers never
/// carry a serial component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EpcFlavor {
    /// Instance-level identifier (SGTIN, SSCC, SGLN, ...).
    #[default]
    Instance,
    /// Class-level identifier (LGTIN, GTIN pattern, ...).
    Class,
}

/// Syntax the captured literal is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpcSyntax {
    /// `urn:epc:...`
    EpcUrn,
    /// `http(s)://<host>/<primary AI>/<value>...`
    DigitalLink,
    /// Any other absolute URI (`urn:uuid:...`, plain web URIs, ...).
    OtherUri,
    /// Not a URI at all.
    NotAUri,
}

/// An identifier exactly as captured, plus an optional derived form.
///
/// The captured literal is fixed at construction. `resolved` caches the
/// storage-normalized form when the value was rebuilt from an indexed
/// document; it is never authoritative. Equality, ordering and hashing only
/// look at the captured literal.
#[derive(Debug, Clone)]
pub struct IdentifierValue {
    literal: String,
    flavor: EpcFlavor,
    resolved: Option<String>,
}

impl IdentifierValue {
    /// Creates an identifier of the given flavor.
    pub fn new(literal: impl Into<String>, flavor: EpcFlavor) -> Self {
        Self {
            literal: literal.into(),
            flavor,
            resolved: None,
        }
    }

    /// Creates an instance-level identifier.
    pub fn instance(literal: impl Into<String>) -> Self {
        Self::new(literal, EpcFlavor::Instance)
    }

    /// Creates a class-level identifier.
    pub fn class(literal: impl Into<String>) -> Self {
        Self::new(literal, EpcFlavor::Class)
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

    /// Instance or class.
    pub fn flavor(&self) -> EpcFlavor {
        self.flavor
    }

    /// Cached storage-normalized form, if known.
    pub fn resolved(&self) -> Option<&str> {
        self.resolved.as_deref()
    }

    /// Detects the syntax of the captured literal.
    pub fn syntax(&self) -> EpcSyntax {
        if self.literal.starts_with("urn:epc:") {
            EpcSyntax::EpcUrn
        } else if digital_link::looks_like_digital_link(&self.literal) {
            EpcSyntax::DigitalLink
        } else if uri_scheme(&self.literal).is_some() {
            EpcSyntax::OtherUri
        } else {
            EpcSyntax::NotAUri
        }
    }
}

impl PartialEq for IdentifierValue {
    fn eq(&self, other: &Self) -> bool {
        self.literal == other.literal
    }
}

impl Eq for IdentifierValue {}

impl Hash for IdentifierValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.literal.hash(state);
    }
}

impl PartialOrd for IdentifierValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for IdentifierValue {
    fn cmp(&self, other: &Self) -> Ordering {
        self.literal.cmp(&other.literal)
    }
}

impl fmt::Display for IdentifierValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.literal)
    }
}

impl Serialize for IdentifierValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.literal)
    }
}

impl<'de> Deserialize<'de> for IdentifierValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(IdentifierValue::instance)
    }
}

/// Deserializes a class-level identifier (`#[serde(deserialize_with)]` helper).
pub(crate) fn class_flavor<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<IdentifierValue, D::Error> {
    String::deserialize(deserializer).map(IdentifierValue::class)
}

/// Returns the URI scheme of `literal`, or `None` when it is not an absolute URI.
pub(crate) fn uri_scheme(literal: &str) -> Option<&str> {
    static URI: OnceLock<Regex> = OnceLock::new();
    let re = URI.get_or_init(|| {
        Regex::new(r"^([A-Za-z][A-Za-z0-9+.\-]*):[^\s]+$").expect("invalid regex")
    });
    re.captures(literal)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn equality_ignores_resolved_form() {
        let a = IdentifierValue::instance("urn:epc:id:sgtin:0614141.107346.2017");
        let b = IdentifierValue::class("urn:epc:id:sgtin:0614141.107346.2017")
            .with_resolved("https://id.gs1.org/01/10614141073464/21/2017");
        assert_eq!(a, b);

        let set: BTreeSet<_> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn syntax_detection() {
        assert_eq!(
            IdentifierValue::instance("urn:epc:id:sscc:0614141.1234567890").syntax(),
            EpcSyntax::EpcUrn
        );
        assert_eq!(
            IdentifierValue::instance("https://example.com/00/106141412345678908").syntax(),
            EpcSyntax::DigitalLink
        );
        assert_eq!(
            IdentifierValue::instance("urn:uuid:6f3c1a6e-3a0f-4b7e-9b44-0c7a1c3a2b10").syntax(),
            EpcSyntax::OtherUri
        );
        assert_eq!(
            IdentifierValue::instance("not an epc").syntax(),
            EpcSyntax::NotAUri
        );
    }
}

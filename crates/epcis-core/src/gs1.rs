//! GS1 key model shared by the EPC URN and Digital Link codecs.
//!
//! A [`Gs1Key`] holds the element-string form of an identifier: the value of
//! its primary application identifier (check digit included) plus the
//! optional secondary component (serial, lot, extension, TPX). Both codecs
//! parse into this model and render out of it, so URN <-> Digital Link
//! conversion never goes through string rewriting.

use serde::{Deserialize, Serialize};

use crate::errors::ResolveError;
use crate::identifier::EpcFlavor;

/// Company prefix length used when no configured prefix matches.
pub const DEFAULT_COMPANY_PREFIX_LENGTH: usize = 7;

const MIN_COMPANY_PREFIX_LENGTH: usize = 6;
const MAX_COMPANY_PREFIX_LENGTH: usize = 12;

/// One entry of the company prefix length table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyPrefix {
    /// Leading digits this entry applies to (a full prefix or a GS1 range).
    pub prefix: String,
    /// Length of the company prefix for keys starting with `prefix`.
    pub length: usize,
}

/// Process-wide GS1 settings.
///
/// Digital Link keys do not record where the company prefix ends, so
/// rendering them as EPC URNs needs a prefix length table. The longest
/// matching entry wins; keys matching no entry use
/// `default_company_prefix_length`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Gs1Settings {
    /// Fallback company prefix length.
    pub default_company_prefix_length: usize,
    /// Known company prefixes.
    pub company_prefixes: Vec<CompanyPrefix>,
}

impl Default for Gs1Settings {
    fn default() -> Self {
        Self {
            default_company_prefix_length: DEFAULT_COMPANY_PREFIX_LENGTH,
            company_prefixes: Vec::new(),
        }
    }
}

impl Gs1Settings {
    /// Loads settings from their JSON form.
    pub fn from_json(input: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(input)
    }

    /// Adds a company prefix entry, returning the updated settings.
    pub fn with_company_prefix(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        let length = prefix.len();
        self.company_prefixes.push(CompanyPrefix { prefix, length });
        self
    }

    /// Returns the company prefix length for a key whose company prefix
    /// starts at the beginning of `digits`.
    pub fn company_prefix_length(&self, digits: &str) -> usize {
        self.company_prefixes
            .iter()
            .filter(|entry| digits.starts_with(entry.prefix.as_str()))
            .max_by_key(|entry| entry.prefix.len())
            .map(|entry| entry.length)
            .unwrap_or(self.default_company_prefix_length)
    }
}

pub(crate) fn is_valid_company_prefix_len(len: usize) -> bool {
    (MIN_COMPANY_PREFIX_LENGTH..=MAX_COMPANY_PREFIX_LENGTH).contains(&len)
}

/// GS1 identification schemes that have both an EPC URN and a Digital Link form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Scheme {
    Sgtin,
    Sscc,
    Sgln,
    Grai,
    Giai,
    Gsrn,
    Gsrnp,
    Gdti,
    Cpi,
    Sgcn,
    Ginc,
    Gsin,
    Itip,
    Upui,
    Pgln,
    Lgtin,
    GtinClass,
    GraiClass,
    GdtiClass,
    SgcnClass,
}

impl Scheme {
    pub(crate) fn flavor(self) -> EpcFlavor {
        match self {
            Scheme::Lgtin | Scheme::GtinClass | Scheme::GraiClass | Scheme::GdtiClass
            | Scheme::SgcnClass => EpcFlavor::Class,
            _ => EpcFlavor::Instance,
        }
    }

    /// Scheme name as it appears in the EPC URN.
    pub(crate) fn name(self) -> &'static str {
        match self {
            Scheme::Sgtin | Scheme::GtinClass => "sgtin",
            Scheme::Sscc => "sscc",
            Scheme::Sgln => "sgln",
            Scheme::Grai | Scheme::GraiClass => "grai",
            Scheme::Giai => "giai",
            Scheme::Gsrn => "gsrn",
            Scheme::Gsrnp => "gsrnp",
            Scheme::Gdti | Scheme::GdtiClass => "gdti",
            Scheme::Cpi => "cpi",
            Scheme::Sgcn | Scheme::SgcnClass => "sgcn",
            Scheme::Ginc => "ginc",
            Scheme::Gsin => "gsin",
            Scheme::Itip => "itip",
            Scheme::Upui => "upui",
            Scheme::Pgln => "pgln",
            Scheme::Lgtin => "lgtin",
        }
    }

    /// Application identifier of the primary key.
    pub(crate) fn primary_ai(self) -> &'static str {
        match self {
            Scheme::Sgtin | Scheme::Upui | Scheme::Lgtin | Scheme::GtinClass => "01",
            Scheme::Sscc => "00",
            Scheme::Sgln => "414",
            Scheme::Grai | Scheme::GraiClass => "8003",
            Scheme::Giai => "8004",
            Scheme::Gsrn => "8018",
            Scheme::Gsrnp => "8017",
            Scheme::Gdti | Scheme::GdtiClass => "253",
            Scheme::Cpi => "8010",
            Scheme::Sgcn | Scheme::SgcnClass => "255",
            Scheme::Ginc => "401",
            Scheme::Gsin => "402",
            Scheme::Itip => "8006",
            Scheme::Pgln => "417",
        }
    }

    /// Application identifier of the secondary component when it is a
    /// separate Digital Link path segment.
    pub(crate) fn secondary_ai(self) -> Option<&'static str> {
        match self {
            Scheme::Sgtin | Scheme::Itip => Some("21"),
            Scheme::Sgln => Some("254"),
            Scheme::Cpi => Some("8011"),
            Scheme::Upui => Some("235"),
            Scheme::Lgtin => Some("10"),
            _ => None,
        }
    }

    /// Whether the serial is appended to the primary AI value instead.
    pub(crate) fn concatenated_serial(self) -> bool {
        matches!(self, Scheme::Grai | Scheme::Gdti | Scheme::Sgcn)
    }

    /// Length of the all-numeric part of the primary value, for fixed-length keys.
    pub(crate) fn numeric_len(self) -> Option<usize> {
        match self {
            Scheme::Sgtin
            | Scheme::Upui
            | Scheme::Lgtin
            | Scheme::GtinClass
            | Scheme::Grai
            | Scheme::GraiClass => Some(14),
            Scheme::Sscc | Scheme::Gsrn | Scheme::Gsrnp | Scheme::Itip => Some(18),
            Scheme::Sgln | Scheme::Gdti | Scheme::GdtiClass | Scheme::Sgcn | Scheme::SgcnClass
            | Scheme::Pgln => Some(13),
            Scheme::Gsin => Some(17),
            Scheme::Giai | Scheme::Ginc | Scheme::Cpi => None,
        }
    }

    /// Offset of the company prefix inside the primary value (indicator,
    /// extension or filler digit first).
    pub(crate) fn company_prefix_offset(self) -> usize {
        match self {
            Scheme::Sgtin
            | Scheme::Sscc
            | Scheme::Upui
            | Scheme::Lgtin
            | Scheme::GtinClass
            | Scheme::Grai
            | Scheme::GraiClass
            | Scheme::Itip => 1,
            _ => 0,
        }
    }

    /// Index of the check digit inside the primary value, if the key has one.
    fn check_digit_index(self) -> Option<usize> {
        match self {
            Scheme::Itip => Some(13),
            Scheme::Giai | Scheme::Ginc | Scheme::Cpi => None,
            other => other.numeric_len().map(|len| len - 1),
        }
    }

    /// Maximum length of the variable-length primary value or the serial.
    fn max_serial_len(self) -> usize {
        match self {
            Scheme::Grai => 16,
            Scheme::Gdti => 17,
            Scheme::Sgcn | Scheme::Cpi => 12,
            Scheme::Upui => 28,
            _ => 20,
        }
    }
}

/// Element-string form of a GS1 identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Gs1Key {
    pub scheme: Scheme,
    /// Primary AI value without a concatenated serial.
    pub primary: String,
    /// Secondary component, unescaped.
    pub serial: Option<String>,
    /// Company prefix length when the source syntax recorded it.
    pub company_prefix_len: Option<usize>,
}

impl Gs1Key {
    /// Checks lengths, digits and the check digit of a key built from a
    /// Digital Link, where nothing guarantees the structure.
    pub(crate) fn validate(&self, literal: &str) -> Result<(), ResolveError> {
        let scheme = self.scheme;
        match scheme.numeric_len() {
            Some(len) => {
                if self.primary.len() != len || !is_digits(&self.primary) {
                    return Err(ResolveError::invalid_identifier(
                        literal,
                        format!(
                            "AI ({}) must be {} digits, got '{}'",
                            scheme.primary_ai(),
                            len,
                            self.primary
                        ),
                    ));
                }
            }
            None => {
                if self.primary.is_empty() || self.primary.chars().count() > 30 {
                    return Err(ResolveError::invalid_identifier(
                        literal,
                        format!("AI ({}) must be 1 to 30 characters", scheme.primary_ai()),
                    ));
                }
                if !self.primary.chars().all(is_gs1_char) {
                    return Err(ResolveError::invalid_identifier(
                        literal,
                        format!("AI ({}) contains invalid characters", scheme.primary_ai()),
                    ));
                }
            }
        }

        if let Some(idx) = scheme.check_digit_index() {
            let expected = check_digit(&self.primary[..idx]);
            if self.primary.as_bytes()[idx] != expected as u8 {
                return Err(ResolveError::invalid_identifier(
                    literal,
                    format!("check digit mismatch, expected {}", expected),
                ));
            }
        }

        if let Some(serial) = &self.serial {
            let numeric_only = matches!(scheme, Scheme::Sgcn | Scheme::Cpi);
            if serial.is_empty() || serial.chars().count() > scheme.max_serial_len() {
                return Err(ResolveError::invalid_identifier(
                    literal,
                    format!(
                        "serial component must be 1 to {} characters",
                        scheme.max_serial_len()
                    ),
                ));
            }
            if numeric_only && !is_digits(serial) {
                return Err(ResolveError::invalid_identifier(
                    literal,
                    "serial component must be numeric",
                ));
            }
            if !serial.chars().all(is_gs1_char) {
                return Err(ResolveError::invalid_identifier(
                    literal,
                    "serial component contains invalid characters",
                ));
            }
        }
        Ok(())
    }
}

/// Computes the GS1 mod-10 check digit over `digits`.
pub(crate) fn check_digit(digits: &str) -> char {
    let sum: u32 = digits
        .bytes()
        .rev()
        .enumerate()
        .map(|(i, b)| {
            let d = u32::from(b.wrapping_sub(b'0'));
            if i % 2 == 0 {
                d * 3
            } else {
                d
            }
        })
        .sum();
    char::from(b'0' + ((10 - sum % 10) % 10) as u8)
}

pub(crate) fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// GS1 AI encodable character set 82.
fn is_gs1_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "!\"%&'()*+,-./:;<=>?_".contains(c)
}

/// Characters escaped inside EPC URN components.
pub(crate) const URN_RESERVED: &str = "\"%&/<>?";
/// Characters escaped inside Digital Link path segments.
pub(crate) const DIGITAL_LINK_RESERVED: &str = "!\"#%&'()*+,/:;<=>?@[] ";

pub(crate) fn percent_encode(value: &str, reserved: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if reserved.contains(c) {
            let mut buf = [0u8; 4];
            for b in c.encode_utf8(&mut buf).bytes() {
                out.push_str(&format!("%{:02X}", b));
            }
        } else {
            out.push(c);
        }
    }
    out
}

pub(crate) fn percent_decode(value: &str, literal: &str) -> Result<String, ResolveError> {
    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = value
                .get(i + 1..i + 3)
                .and_then(|h| u8::from_str_radix(h, 16).ok())
                .ok_or_else(|| {
                    ResolveError::invalid_identifier(literal, "malformed percent escape")
                })?;
            out.push(hex);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out)
        .map_err(|_| ResolveError::invalid_identifier(literal, "percent escape is not UTF-8"))
}

//! Client format preferences (`GS1-EPC-Format` / `GS1-CBV-XML-Format`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::HeaderError;

/// Header carrying the identifier format preference.
pub const EPC_FORMAT_HEADER: &str = "GS1-EPC-Format";
/// Header carrying the vocabulary format preference.
pub const CBV_FORMAT_HEADER: &str = "GS1-CBV-XML-Format";

/// Requested rendering of EPC identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EpcFormat {
    /// No preference: identifiers are returned as captured.
    #[serde(rename = "No_Preference")]
    NoPreference,
    /// Canonical GS1 Digital Link URIs.
    #[serde(rename = "Always_GS1_Digital_Link")]
    AlwaysGs1DigitalLink,
    /// EPC pure identity URNs.
    #[serde(rename = "Always_EPC_URN")]
    AlwaysEpcUrn,
    /// The captured literal, untouched.
    #[serde(rename = "Never_Translates")]
    NeverTranslates,
}

/// Requested rendering of CBV vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CbvFormat {
    /// No preference: bare words expand, prefixed literals are kept.
    #[serde(rename = "No_Preference")]
    NoPreference,
    /// Standard terms render as URNs.
    #[serde(rename = "Always_URN")]
    AlwaysUrn,
    /// Standard terms render as Web URIs.
    #[serde(rename = "Always_Web_URI")]
    AlwaysWebUri,
    /// The captured literal, untouched.
    #[serde(rename = "Never_Translates")]
    NeverTranslates,
}

impl EpcFormat {
    /// Header value spelling.
    pub fn header_value(self) -> &'static str {
        match self {
            EpcFormat::NoPreference => "No_Preference",
            EpcFormat::AlwaysGs1DigitalLink => "Always_GS1_Digital_Link",
            EpcFormat::AlwaysEpcUrn => "Always_EPC_URN",
            EpcFormat::NeverTranslates => "Never_Translates",
        }
    }
}

impl CbvFormat {
    /// Header value spelling.
    pub fn header_value(self) -> &'static str {
        match self {
            CbvFormat::NoPreference => "No_Preference",
            CbvFormat::AlwaysUrn => "Always_URN",
            CbvFormat::AlwaysWebUri => "Always_Web_URI",
            CbvFormat::NeverTranslates => "Never_Translates",
        }
    }
}

impl FromStr for EpcFormat {
    type Err = HeaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "No_Preference" => Ok(EpcFormat::NoPreference),
            "Always_GS1_Digital_Link" => Ok(EpcFormat::AlwaysGs1DigitalLink),
            "Always_EPC_URN" => Ok(EpcFormat::AlwaysEpcUrn),
            "Never_Translates" => Ok(EpcFormat::NeverTranslates),
            other => Err(HeaderError {
                header: EPC_FORMAT_HEADER,
                value: other.to_string(),
            }),
        }
    }
}

impl FromStr for CbvFormat {
    type Err = HeaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "No_Preference" => Ok(CbvFormat::NoPreference),
            "Always_URN" => Ok(CbvFormat::AlwaysUrn),
            "Always_Web_URI" => Ok(CbvFormat::AlwaysWebUri),
            "Never_Translates" => Ok(CbvFormat::NeverTranslates),
            other => Err(HeaderError {
                header: CBV_FORMAT_HEADER,
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for EpcFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header_value())
    }
}

impl fmt::Display for CbvFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header_value())
    }
}

/// A client's format preference. Either half may be absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatPreference {
    /// Identifier format, `None` when the client sent no header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epc_format: Option<EpcFormat>,
    /// Vocabulary format, `None` when the client sent no header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cbv_format: Option<CbvFormat>,
}

impl FormatPreference {
    /// Builds a preference from explicit formats.
    pub fn new(epc_format: Option<EpcFormat>, cbv_format: Option<CbvFormat>) -> Self {
        Self {
            epc_format,
            cbv_format,
        }
    }

    /// Both halves set to `Never_Translates`.
    pub fn as_captured() -> Self {
        Self::new(
            Some(EpcFormat::NeverTranslates),
            Some(CbvFormat::NeverTranslates),
        )
    }

    /// Parses raw header values. Absent headers stay `None`; unknown values fail.
    pub fn from_headers(epc: Option<&str>, cbv: Option<&str>) -> Result<Self, HeaderError> {
        Ok(Self {
            epc_format: epc.map(str::parse).transpose()?,
            cbv_format: cbv.map(str::parse).transpose()?,
        })
    }

    /// Identifier format with the default applied.
    pub fn effective_epc_format(&self) -> EpcFormat {
        self.epc_format.unwrap_or(EpcFormat::AlwaysGs1DigitalLink)
    }

    /// Vocabulary format with the default applied.
    pub fn effective_cbv_format(&self) -> CbvFormat {
        self.cbv_format.unwrap_or(CbvFormat::NoPreference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_values_parse() {
        let pref =
            FormatPreference::from_headers(Some("Always_EPC_URN"), Some("Always_Web_URI")).unwrap();
        assert_eq!(pref.epc_format, Some(EpcFormat::AlwaysEpcUrn));
        assert_eq!(pref.cbv_format, Some(CbvFormat::AlwaysWebUri));
    }

    #[test]
    fn unknown_header_value_is_an_error() {
        let err = FormatPreference::from_headers(Some("Sometimes"), None).unwrap_err();
        assert_eq!(err.header, EPC_FORMAT_HEADER);
        assert_eq!(err.value, "Sometimes");
    }

    #[test]
    fn missing_halves_take_defaults() {
        let pref = FormatPreference::default();
        assert_eq!(pref.effective_epc_format(), EpcFormat::AlwaysGs1DigitalLink);
        assert_eq!(pref.effective_cbv_format(), CbvFormat::NoPreference);
    }
}

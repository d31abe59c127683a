//! Format resolver: renders identifiers and vocabulary in a requested format.
//!
//! Resolution is pure. Everything it needs (the indexed JSON-LD context and
//! the GS1 company prefix table) travels in a [`ResolveContext`].

use tracing::{debug, warn};

use crate::context::{ContextEntry, ContextIndex};
use crate::digital_link::{parse_digital_link, render_digital_link};
use crate::epc_urn::{parse_epc_urn, render_epc_urn, ParsedUrn};
use crate::errors::ResolveError;
use crate::format::{CbvFormat, EpcFormat};
use crate::gs1::{Gs1Key, Gs1Settings};
use crate::identifier::{uri_scheme, EpcFlavor, IdentifierValue};
use crate::vocabulary::{VocabularyCategory, VocabularyTerm};

/// Inputs shared by every resolution of one document.
#[derive(Debug, Clone, Default)]
pub struct ResolveContext {
    index: ContextIndex,
    settings: Gs1Settings,
}

impl ResolveContext {
    /// Builds a context from an already indexed context list.
    pub fn new(index: ContextIndex, settings: Gs1Settings) -> Self {
        Self { index, settings }
    }

    /// Indexes a document's `@context` list with default GS1 settings.
    pub fn from_entries(entries: &[ContextEntry]) -> Self {
        Self::new(ContextIndex::build(entries), Gs1Settings::default())
    }

    /// Replaces the GS1 settings.
    pub fn with_settings(mut self, settings: Gs1Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Replaces the context index, keeping the GS1 settings.
    pub fn with_entries(mut self, entries: &[ContextEntry]) -> Self {
        self.index = ContextIndex::build(entries);
        self
    }

    /// The indexed context.
    pub fn index(&self) -> &ContextIndex {
        &self.index
    }

    /// The GS1 settings.
    pub fn settings(&self) -> &Gs1Settings {
        &self.settings
    }
}

enum ParsedEpc {
    Gs1(Gs1Key),
    /// A URI with no GS1 key inside; carries the scheme for error reporting.
    Foreign { scheme: String, epc_urn: bool },
}

fn parse_epc(value: &IdentifierValue) -> Result<ParsedEpc, ResolveError> {
    let literal = value.literal();
    let key = if let Some(parsed) = parse_epc_urn(literal)? {
        match parsed {
            ParsedUrn::Gs1(key) => key,
            ParsedUrn::Other { scheme } => {
                return Ok(ParsedEpc::Foreign {
                    scheme,
                    epc_urn: true,
                })
            }
        }
    } else if let Some(key) = parse_digital_link(literal, value.flavor())? {
        key
    } else {
        let scheme = match uri_scheme(literal) {
            Some("urn") => literal.splitn(3, ':').take(2).collect::<Vec<_>>().join(":"),
            Some(scheme) => scheme.to_string(),
            None => {
                return Err(ResolveError::invalid_identifier(
                    literal,
                    "not an absolute URI",
                ))
            }
        };
        return Ok(ParsedEpc::Foreign {
            scheme,
            epc_urn: false,
        });
    };

    if key.scheme.flavor() != value.flavor() {
        let (found, target) = match value.flavor() {
            EpcFlavor::Instance => ("class", "instance identifier"),
            EpcFlavor::Class => ("instance", "class identifier"),
        };
        return Err(ResolveError::conversion(
            format!("{} ({})", key.scheme.name(), found),
            literal,
            target,
        ));
    }
    Ok(ParsedEpc::Gs1(key))
}

/// Renders an identifier in the requested format.
///
/// `NeverTranslates` and `NoPreference` return the captured literal without
/// looking at it. The translating formats parse the literal and fail with
/// [`ResolveError::InvalidIdentifier`] when it is malformed or with
/// [`ResolveError::FormatConversion`] when the scheme has no such rendering.
pub fn resolve_epc(
    value: &IdentifierValue,
    format: EpcFormat,
    context: &ResolveContext,
) -> Result<String, ResolveError> {
    match format {
        EpcFormat::NeverTranslates | EpcFormat::NoPreference => Ok(value.literal().to_string()),
        EpcFormat::AlwaysGs1DigitalLink => match parse_epc(value)? {
            ParsedEpc::Gs1(key) => Ok(render_digital_link(&key)),
            ParsedEpc::Foreign { scheme, .. } => Err(ResolveError::conversion(
                scheme,
                value.literal(),
                "GS1 Digital Link",
            )),
        },
        EpcFormat::AlwaysEpcUrn => match parse_epc(value)? {
            ParsedEpc::Gs1(key) => render_epc_urn(&key, context.settings(), value.literal()),
            // Already an EPC URN, just not a GS1 one.
            ParsedEpc::Foreign { epc_urn: true, .. } => Ok(value.literal().to_string()),
            ParsedEpc::Foreign { scheme, .. } => {
                Err(ResolveError::conversion(scheme, value.literal(), "EPC URN"))
            }
        },
    }
}

/// Storage-normalized form of an identifier: the canonical Digital Link when
/// the literal is a convertible GS1 key, the literal otherwise.
///
/// Malformed literals are still an error.
pub fn normalize_epc(
    value: &IdentifierValue,
    context: &ResolveContext,
) -> Result<String, ResolveError> {
    match resolve_epc(value, EpcFormat::AlwaysGs1DigitalLink, context) {
        Ok(normalized) => Ok(normalized),
        Err(err) if err.is_format_conversion() => Ok(value.literal().to_string()),
        Err(err) => Err(err),
    }
}

/// How a vocabulary literal was understood.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermInterpretation {
    /// A standard CBV term, identified by its local name.
    Standard(String),
    /// A custom IRI (from the context or written out in full).
    Custom(String),
    /// Nothing matched; the literal is kept as is.
    Unresolved,
}

fn check_term_literal(literal: &str) -> Result<(), ResolveError> {
    if literal.is_empty() {
        return Err(ResolveError::invalid_term(literal, "empty term"));
    }
    if literal.chars().any(char::is_whitespace) {
        return Err(ResolveError::invalid_term(literal, "term contains whitespace"));
    }
    Ok(())
}

/// Classifies a vocabulary literal.
///
/// Context definitions take precedence over the standard tables: a bare word
/// or CURIE prefix defined in the context always expands through it.
pub fn interpret_cbv(
    term: &VocabularyTerm,
    context: &ResolveContext,
) -> Result<TermInterpretation, ResolveError> {
    let literal = term.literal();
    let category = term.category();
    check_term_literal(literal)?;

    if !literal.contains(':') {
        if let Some(iri) = context.index().lookup(literal) {
            return Ok(reexamine(category, iri));
        }
    } else if let Some(iri) = context.index().expand_curie(literal) {
        return Ok(reexamine(category, &iri));
    }

    if let Some(local) = literal
        .strip_prefix(category.compact_prefix())
        .filter(|local| !local.is_empty())
    {
        return Ok(TermInterpretation::Standard(local.to_string()));
    }
    if let Some(local) = category.strip_standard_iri(literal) {
        return Ok(TermInterpretation::Standard(local.to_string()));
    }
    if category.is_standard_term(literal) {
        return Ok(TermInterpretation::Standard(literal.to_string()));
    }
    if uri_scheme(literal).is_some() {
        return Ok(TermInterpretation::Custom(literal.to_string()));
    }
    Ok(TermInterpretation::Unresolved)
}

fn reexamine(category: VocabularyCategory, iri: &str) -> TermInterpretation {
    match category.strip_standard_iri(iri) {
        Some(local) => TermInterpretation::Standard(local.to_string()),
        None => TermInterpretation::Custom(iri.to_string()),
    }
}

/// Renders a vocabulary term in the requested format.
///
/// Standard terms render as URNs unless Web URIs are asked for (sensor types
/// only have a Web URI form). Custom IRIs render as themselves. Unresolvable
/// literals fall back to the captured literal.
///
/// `NoPreference` only expands bare words (standard or context-defined); a
/// literal already written as a URN, Web URI or CURIE comes back unchanged.
pub fn resolve_cbv(
    term: &VocabularyTerm,
    format: CbvFormat,
    context: &ResolveContext,
) -> Result<String, ResolveError> {
    if format == CbvFormat::NeverTranslates {
        return Ok(term.literal().to_string());
    }
    if format == CbvFormat::NoPreference && term.literal().contains(':') {
        check_term_literal(term.literal())?;
        return Ok(term.literal().to_string());
    }
    let category = term.category();
    Ok(match interpret_cbv(term, context)? {
        TermInterpretation::Standard(local) => match format {
            CbvFormat::AlwaysWebUri => format!("{}{}", category.web_uri_prefix(), local),
            CbvFormat::NoPreference | CbvFormat::AlwaysUrn | CbvFormat::NeverTranslates => {
                match category.urn_prefix() {
                    Some(prefix) => format!("{}{}", prefix, local),
                    None => format!("{}{}", category.web_uri_prefix(), local),
                }
            }
        },
        TermInterpretation::Custom(iri) => iri,
        TermInterpretation::Unresolved => {
            debug!(
                category = %category,
                literal = term.literal(),
                "unresolved vocabulary term, keeping literal"
            );
            term.literal().to_string()
        }
    })
}

/// Storage-normalized form of a term: the URN (or custom IRI).
pub fn normalize_cbv(term: &VocabularyTerm, context: &ResolveContext) -> Result<String, ResolveError> {
    resolve_cbv(term, CbvFormat::AlwaysUrn, context)
}

/// Resolves a batch of terms, preserving order.
///
/// Never fails: a term that cannot be resolved keeps its captured literal.
pub fn resolve_cbv_all(
    terms: &[VocabularyTerm],
    format: CbvFormat,
    context: &ResolveContext,
) -> Vec<String> {
    terms
        .iter()
        .map(|term| match resolve_cbv(term, format, context) {
            Ok(resolved) => resolved,
            Err(err) => {
                warn!(error = %err, "vocabulary term kept as captured");
                term.literal().to_string()
            }
        })
        .collect()
}

//! JSON-LD `@context` handling.
//!
//! A document's context list is indexed once into a flat term/prefix map so
//! resolving a vocabulary term never walks the raw list again.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// One entry of a JSON-LD `@context` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContextEntry {
    /// Remote context referenced by URL (e.g. the EPCIS 2.0 standard context).
    /// Remote contexts are never fetched here.
    Remote(String),
    /// Inline term and prefix definitions.
    Inline(Map<String, Value>),
}

impl ContextEntry {
    /// Convenience constructor for an inline entry defining a single key.
    pub fn define(key: impl Into<String>, iri: impl Into<String>) -> Self {
        let mut map = Map::new();
        map.insert(key.into(), Value::String(iri.into()));
        ContextEntry::Inline(map)
    }
}

/// Accepts `@context` as a single entry or an array of entries.
pub(crate) fn one_or_many<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<ContextEntry>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        Many(Vec<ContextEntry>),
        One(ContextEntry),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        Some(OneOrMany::Many(entries)) => entries,
        Some(OneOrMany::One(entry)) => vec![entry],
        None => Vec::new(),
    })
}

/// Pre-built lookup over a context list.
///
/// **Invariant:** the first definition of a key in context order wins; later
/// entries never overwrite it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextIndex {
    definitions: HashMap<String, String>,
}

impl ContextIndex {
    /// Indexes `entries` in order.
    pub fn build(entries: &[ContextEntry]) -> Self {
        let mut definitions = HashMap::new();
        for entry in entries {
            let ContextEntry::Inline(map) = entry else {
                continue;
            };
            for (key, value) in map {
                if key.starts_with('@') {
                    continue;
                }
                let iri = match value {
                    Value::String(iri) => Some(iri.as_str()),
                    Value::Object(def) => def.get("@id").and_then(Value::as_str),
                    _ => None,
                };
                if let Some(iri) = iri {
                    definitions
                        .entry(key.clone())
                        .or_insert_with(|| iri.to_string());
                }
            }
        }

        // Definitions may themselves be compact IRIs over another prefix.
        let expanded = definitions
            .iter()
            .filter_map(|(key, iri)| {
                let (prefix, local) = iri.split_once(':')?;
                if local.starts_with("//") || prefix == key {
                    return None;
                }
                let namespace = definitions.get(prefix)?;
                Some((key.clone(), format!("{}{}", namespace, local)))
            })
            .collect::<Vec<_>>();
        definitions.extend(expanded);

        Self { definitions }
    }

    /// Returns the IRI a bare term or prefix is defined as.
    pub fn lookup(&self, key: &str) -> Option<&str> {
        self.definitions.get(key).map(String::as_str)
    }

    /// Expands `prefix:local` when `prefix` is defined.
    pub fn expand_curie(&self, curie: &str) -> Option<String> {
        let (prefix, local) = curie.split_once(':')?;
        if local.starts_with("//") {
            return None;
        }
        self.lookup(prefix)
            .map(|namespace| format!("{}{}", namespace, local))
    }

    /// Number of indexed definitions.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Whether nothing is defined.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

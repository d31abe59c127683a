//! Reading command inputs.

use epcis_core::{ContextEntry, EpcisDocument, EpcisEvent, Gs1Settings};
use serde_json::Value;
use std::io::{self, Read};
use thiserror::Error;

/// Errors raised while loading command inputs.
#[derive(Error, Debug)]
pub enum InputError {
    /// The file could not be read.
    #[error("Failed to read file {path}: {source}")]
    Read {
        /// Path given on the command line.
        path: String,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// Stdin could not be read.
    #[error("Failed to read stdin: {0}")]
    Stdin(#[from] io::Error),
    /// The input is not the JSON shape the command expects.
    #[error("Invalid {what}: {source}")]
    Json {
        /// What was being parsed.
        what: &'static str,
        /// Underlying parse error.
        source: serde_json::Error,
    },
}

fn json_error(what: &'static str) -> impl FnOnce(serde_json::Error) -> InputError {
    move |source| InputError::Json { what, source }
}

/// Reads a file, or stdin when no path is given.
pub fn read_input(input: Option<&str>) -> Result<String, InputError> {
    match input {
        Some(path) => std::fs::read_to_string(path).map_err(|source| InputError::Read {
            path: path.to_string(),
            source,
        }),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

/// Parses either a full EPCIS document or a single event.
///
/// Events of a document inherit its `@context`.
pub fn parse_events(json: &str) -> Result<Vec<EpcisEvent>, InputError> {
    let value: Value = serde_json::from_str(json).map_err(json_error("JSON"))?;
    if value.get("epcisBody").is_some() {
        let document: EpcisDocument =
            serde_json::from_value(value).map_err(json_error("EPCIS document"))?;
        Ok(document.into_events())
    } else {
        let event: EpcisEvent = serde_json::from_value(value).map_err(json_error("EPCIS event"))?;
        Ok(vec![event])
    }
}

/// Loads a JSON-LD context file: an `@context` wrapper, a list of entries or
/// a single entry.
pub fn load_context(path: &str) -> Result<Vec<ContextEntry>, InputError> {
    let mut value: Value =
        serde_json::from_str(&read_input(Some(path))?).map_err(json_error("context file"))?;
    if let Some(inner) = value.get_mut("@context") {
        value = inner.take();
    }
    match value {
        Value::Array(items) => items
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<ContextEntry>, _>>()
            .map_err(json_error("context entry")),
        other => Ok(vec![
            serde_json::from_value(other).map_err(json_error("context entry"))?
        ]),
    }
}

/// Loads GS1 company prefix settings, or the defaults when no file is given.
pub fn load_settings(path: Option<&str>) -> Result<Gs1Settings, InputError> {
    match path {
        Some(path) => {
            Gs1Settings::from_json(&read_input(Some(path))?).map_err(json_error("GS1 settings"))
        }
        None => Ok(Gs1Settings::default()),
    }
}

//! Expand command implementation.

use crate::{input, output};
use epcis_core::FormatPreference;
use epcis_index::{to_core, ConversionOptions, IndexedEvent};
use serde_json::Value;

pub fn run(
    input: Option<String>,
    epc_format: Option<String>,
    cbv_format: Option<String>,
    context: Option<String>,
    gs1_settings: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut options =
        ConversionOptions::default().with_settings(input::load_settings(gs1_settings.as_deref())?);
    if epc_format.is_some() || cbv_format.is_some() {
        options = options.with_preference(FormatPreference::from_headers(
            epc_format.as_deref(),
            cbv_format.as_deref(),
        )?);
    }
    if let Some(path) = context {
        options = options.with_context(input::load_context(&path)?);
    }

    let mut events = Vec::new();
    for (line_no, line) in input::read_input(input.as_deref())?.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let doc = IndexedEvent::from_json(line)
            .map_err(|e| format!("Line {}: invalid indexed document: {}", line_no + 1, e))?;
        let event = to_core(&doc, &options)
            .map_err(|e| format!("Line {}: {}", line_no + 1, e))?;
        events.push(serde_json::to_value(&event)?);
    }

    println!("{}", output::format_json(&Value::Array(events)));
    Ok(())
}

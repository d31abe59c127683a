//! Hash command implementation.

use crate::{input, output};
use serde_json::json;

pub fn run(input: Option<String>, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let events = input::parse_events(&input::read_input(input.as_deref())?)?;

    if !json {
        output::print_hash_header();
    }
    for (sequence, event) in events.iter().enumerate() {
        let hash = event.compute_hash()?;
        if json {
            println!(
                "{}",
                json!({
                    "sequenceInDocument": sequence,
                    "type": event.event_type(),
                    "hash": hash.as_str(),
                })
            );
        } else {
            println!(
                "{}",
                output::format_hash_row(sequence, event.event_type(), hash.as_str())
            );
        }
    }
    Ok(())
}

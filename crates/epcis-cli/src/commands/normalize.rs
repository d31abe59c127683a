//! Normalize command implementation.

use crate::input;
use chrono::{SecondsFormat, Utc};
use epcis_core::{CaptureId, Timestamp};
use epcis_index::{to_indexed, CaptureMetadata};
use tracing::info;

pub fn run(
    input: Option<String>,
    user: Option<String>,
    group: Option<String>,
    capture_id: Option<String>,
    hidden: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let events = input::parse_events(&input::read_input(input.as_deref())?)?;

    let now = Utc::now();
    let timestamp = Timestamp::parse(now.to_rfc3339_opts(SecondsFormat::Millis, true))?;
    let capture_id = match capture_id {
        Some(id) => CaptureId::parse(id).map_err(|e| format!("Invalid capture ID: {}", e))?,
        None => CaptureId::parse(format!("capture-{}", now.format("%Y%m%dT%H%M%S%.3fZ")))?,
    };

    let mut metadata = CaptureMetadata::new(timestamp.clone());
    if let Some(user) = user {
        metadata = metadata.with_user(user);
    }
    if let Some(group) = group {
        metadata = metadata.with_group(group);
    }
    if hidden {
        metadata = metadata.hidden();
    }

    for (sequence, event) in events.into_iter().enumerate() {
        let event = event
            .with_identity(capture_id.clone(), sequence as u64)?
            .with_record_time(timestamp.clone());
        let doc = to_indexed(&event, &metadata)
            .map_err(|e| format!("Event {} rejected: {}", sequence, e))?;
        println!("{}", serde_json::to_string(&doc)?);
    }
    info!(capture_id = %capture_id, "capture normalized");
    Ok(())
}

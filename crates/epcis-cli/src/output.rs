//! Output formatting utilities.

use serde_json::Value;

/// Formats a value as pretty JSON.
pub fn format_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

/// Formats one event hash as a table row.
pub fn format_hash_row(sequence: usize, event_type: &str, hash: &str) -> String {
    format!("{:<5} {:<20} {}", sequence, truncate(event_type, 20), hash)
}

/// Prints the hash table header.
#[allow(clippy::print_literal)]
pub fn print_hash_header() {
    println!("{:<5} {:<20} {}", "SEQ", "TYPE", "HASH");
    println!("{}", "-".repeat(100));
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len.saturating_sub(3)])
    }
}

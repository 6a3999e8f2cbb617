//! Value and measurement-count formatting.

use serde_json::{Map, Value};
use tracing::warn;

use qprobe_hal::ExperimentHeader;

/// Render a JSON value for a report line.
///
/// Strings print without quotes; everything else prints as compact JSON.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Convert a hex string (`0x...`) to binary without leading zeros.
///
/// Works digit by digit so registers wider than 128 bits convert too.
/// Returns `None` if any digit is not hex.
fn hex_to_binary(hex: &str) -> Option<String> {
    let digits = hex.strip_prefix("0x").unwrap_or(hex);
    if digits.is_empty() {
        return None;
    }

    let mut bits = String::with_capacity(digits.len() * 4);
    for c in digits.chars() {
        let nibble = c.to_digit(16)?;
        bits.push_str(&format!("{nibble:04b}"));
    }

    let trimmed = bits.trim_start_matches('0');
    Some(if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    })
}

/// Split a bitstring into per-register chunks.
///
/// The most significant register comes first, so registers are taken in
/// reverse declaration order.
fn separate_bitstring(bits: &str, creg_sizes: &[(String, usize)]) -> String {
    let mut chunks = Vec::with_capacity(creg_sizes.len());
    let mut start = 0;
    for (_, size) in creg_sizes.iter().rev() {
        let begin = start.min(bits.len());
        let end = (start + size).min(bits.len());
        chunks.push(&bits[begin..end]);
        start += size;
    }
    chunks.join(" ")
}

/// Format a single measured state key.
///
/// Hex keys become binary, zero-padded to `memory_slots` and split per
/// classical register when the header describes them. Other keys pass
/// through unchanged.
pub fn format_state(key: &str, header: &ExperimentHeader) -> String {
    if !key.starts_with("0x") {
        return key.to_string();
    }
    let Some(mut bits) = hex_to_binary(key) else {
        return key.to_string();
    };

    if let Some(slots) = header.memory_slots.filter(|&s| s > 0) {
        if bits.len() < slots {
            bits = format!("{bits:0>slots$}");
        }
        if let Some(cregs) = header.creg_sizes.as_deref().filter(|c| !c.is_empty()) {
            bits = separate_bitstring(&bits, cregs);
        }
    }
    bits
}

/// Format the raw `counts` dictionary of one experiment.
///
/// Returns `(state, count)` pairs in the order the service returned them.
/// Entries whose count is not a non-negative integer are skipped.
pub fn format_counts(counts: &Map<String, Value>, header: &ExperimentHeader) -> Vec<(String, u64)> {
    counts
        .iter()
        .filter_map(|(key, value)| match value.as_u64() {
            Some(count) => Some((format_state(key, header), count)),
            None => {
                warn!("skipping non-integer count for state {key}: {value}");
                None
            }
        })
        .collect()
}

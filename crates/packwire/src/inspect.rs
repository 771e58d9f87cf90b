//! Name-based encode/decode helpers behind the `packwire` CLI.

use std::fmt::Write as _;

use packwire_codec::{Addressing, CodecConfig};
use packwire_protocol::registry;
use tracing::debug;

use crate::PackwireError;

/// Decodes a hex-encoded message of type `name` into JSON.
///
/// Whitespace in `hex_text` is ignored, so `"00 00 c0 3f"` works.
///
/// # Errors
/// - `Hex` if the text isn't hex.
/// - `Protocol` for an unknown `name` or bytes that don't decode.
pub fn decode_hex(
    name: &str,
    hex_text: &str,
    config: CodecConfig,
) -> Result<serde_json::Value, PackwireError> {
    let descriptor = registry::find(name)?;
    let compact: String = hex_text.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = hex::decode(compact)?;
    debug!(message = descriptor.name(), len = bytes.len(), "decoding");
    Ok(descriptor.decode_json(&bytes, config)?)
}

/// Encodes a JSON message of type `name` into its binary form.
///
/// # Errors
/// - `Json` if `json_text` isn't JSON.
/// - `Protocol` for an unknown `name`, a value of the wrong shape, or a
///   value the wire format can't hold.
pub fn encode_json(
    name: &str,
    json_text: &str,
    config: CodecConfig,
) -> Result<Vec<u8>, PackwireError> {
    let descriptor = registry::find(name)?;
    let value: serde_json::Value = serde_json::from_str(json_text)?;
    let bytes = descriptor.encode_json(value, config)?;
    debug!(message = descriptor.name(), len = bytes.len(), "encoded");
    Ok(bytes)
}

/// A plain-text table of every registered layout.
pub fn layout_table() -> String {
    let mut out = format!(
        "{:<16} {:>8} {:>6} {:>6} {:>4} {:>8}  {}\n",
        "MESSAGE", "PRESENCE", "FIXED", "HEAD", "VARS", "MAX", "ADDRESSING"
    );
    for descriptor in registry::catalog() {
        let layout = descriptor.layout();
        let addressing = match layout.addressing {
            Addressing::Sequential => "sequential".to_string(),
            Addressing::OffsetTable { at } => format!("offset table @{at}"),
        };
        // Writing to a String cannot fail.
        let _ = writeln!(
            out,
            "{:<16} {:>8} {:>6} {:>6} {:>4} {:>8}  {}",
            layout.name,
            layout.presence_bytes,
            layout.fixed_block_width,
            layout.variable_block_start,
            layout.variable_field_count,
            layout.max_size,
            addressing,
        );
    }
    out
}

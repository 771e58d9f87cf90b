//! Error types for the protocol layer.
//!
//! Wire-format failures come from `packwire-codec` and are carried
//! through unchanged; this crate adds JSON failures and registry
//! lookups.

use packwire_codec::CodecError;

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Binary encode or decode failed.
    ///
    /// `transparent` forwards `Display` and `source` to the inner
    /// [`CodecError`], so "truncated input: ..." reads the same whether
    /// it came from here or from the codec directly.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Serializing a message to JSON failed.
    #[cfg(feature = "json")]
    #[error("json encode failed: {0}")]
    JsonEncode(serde_json::Error),

    /// The JSON text was malformed or didn't match the message shape.
    #[cfg(feature = "json")]
    #[error("json decode failed: {0}")]
    JsonDecode(serde_json::Error),

    /// No message with this name is registered.
    #[error("unknown message type: {0}")]
    UnknownMessage(String),
}

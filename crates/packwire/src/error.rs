//! Unified error type for Packwire.

use packwire_codec::CodecError;
use packwire_protocol::ProtocolError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant generates a `From` impl, so
/// `?` converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum PackwireError {
    /// A wire-format error (truncated, malformed, too large).
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// A protocol-level error (JSON, unknown message type).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Input that isn't valid hex.
    #[error("invalid hex input: {0}")]
    Hex(#[from] hex::FromHexError),

    /// Input that isn't valid JSON at all.
    #[error("invalid json input: {0}")]
    Json(#[from] serde_json::Error),
}

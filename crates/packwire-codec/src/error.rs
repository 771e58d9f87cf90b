//! Error types for the binary codec.
//!
//! Every failure the codec can report lives in one enum. The writer
//! produces `FieldTooLarge`, `RecordTooLarge` and `InvalidValue`; the
//! reader produces `TruncatedInput` and `MalformedInput`. None of them
//! are retried inside the codec: a failed call fails the whole record.

/// Errors that can occur while encoding or decoding a record.
///
/// `#[derive(thiserror::Error)]` generates the `std::error::Error` impl,
/// and each `#[error("...")]` attribute is the message shown in logs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// The buffer ended before a field was complete.
    ///
    /// `needed` is the number of bytes the current read asked for and
    /// `remaining` is how many were actually left.
    #[error("truncated input: needed {needed} bytes, {remaining} remaining")]
    TruncatedInput { needed: usize, remaining: usize },

    /// The bytes are present but cannot be a valid encoding.
    ///
    /// Covers over-long VarInts, unknown enum ordinals, invalid UTF-8,
    /// offsets pointing outside the buffer and trailing garbage. Usually
    /// a sign of protocol desync or a hostile peer.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// A string, blob, array or map exceeds its declared maximum on write.
    #[error("field `{field}` too large: {len} exceeds maximum {max}")]
    FieldTooLarge {
        field: &'static str,
        len: usize,
        max: usize,
    },

    /// The encoded record would exceed its layout's `max_size`.
    #[error("record `{record}` too large: {len} bytes exceeds maximum {max}")]
    RecordTooLarge {
        record: &'static str,
        len: usize,
        max: usize,
    },

    /// A value that has no wire representation, e.g. a non-ASCII
    /// character in a fixed-width ASCII field.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

impl CodecError {
    /// Short, stable name of the error kind, used as a tracing field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::TruncatedInput { .. } => "truncated_input",
            Self::MalformedInput(_) => "malformed_input",
            Self::FieldTooLarge { .. } => "field_too_large",
            Self::RecordTooLarge { .. } => "record_too_large",
            Self::InvalidValue(_) => "invalid_value",
        }
    }

    /// Returns `true` for errors caused by the input bytes rather than
    /// by the value being encoded.
    ///
    /// The transport layer typically drops the connection on these.
    pub fn is_decode_error(&self) -> bool {
        matches!(self, Self::TruncatedInput { .. } | Self::MalformedInput(_))
    }

    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedInput(msg.into())
    }
}

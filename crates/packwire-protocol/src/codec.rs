//! Codec trait and implementations for encoding/decoding messages.
//!
//! The same catalog message can travel in two formats: the compact
//! binary wire format ([`BinaryCodec`]) and JSON ([`JsonCodec`]) for
//! fixtures, logs and tooling. Callers pick one through the [`Codec`]
//! trait and don't need to know which.

use std::fmt;

use packwire_codec::{deserialize_with, serialize_with, CodecConfig, Record};
use serde::{de::DeserializeOwned, Serialize};

use crate::ProtocolError;

/// A catalog message: something with a binary layout *and* a serde shape.
///
/// Blanket-implemented, so every [`Record`] that also derives serde's
/// traits is a `Message` automatically.
pub trait Message:
    Record + Serialize + DeserializeOwned + fmt::Debug + Send + Sync + 'static
{
}

impl<T> Message for T where
    T: Record + Serialize + DeserializeOwned + fmt::Debug + Send + Sync + 'static
{
}

/// A codec that can encode messages to bytes and decode bytes back.
///
/// `Send + Sync + 'static` so one codec value can be shared by every
/// task of a server.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a message into bytes.
    ///
    /// # Errors
    /// Whatever the format rejects: an oversized field in binary, a
    /// non-finite float in JSON, etc.
    fn encode<M: Message>(&self, message: &M) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes exactly one message from `data`.
    ///
    /// # Errors
    /// The bytes are truncated, malformed, or don't match `M`.
    fn decode<M: Message>(&self, data: &[u8]) -> Result<M, ProtocolError>;
}

// ---------------------------------------------------------------------------
// BinaryCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] for the Packwire binary wire format.
///
/// ```rust
/// use packwire_protocol::{BinaryCodec, Codec, FloatRange};
///
/// let codec = BinaryCodec::new();
/// let bytes = codec.encode(&FloatRange::new(1.5, 3.25)).unwrap();
/// assert_eq!(bytes.len(), 8);
///
/// let decoded: FloatRange = codec.decode(&bytes).unwrap();
/// assert_eq!(decoded, FloatRange::new(1.5, 3.25));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryCodec {
    config: CodecConfig,
}

impl BinaryCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// A codec using `config`, after clamping it with
    /// [`CodecConfig::validated`].
    pub fn with_config(config: CodecConfig) -> Self {
        Self {
            config: config.validated(),
        }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }
}

impl Codec for BinaryCodec {
    fn encode<M: Message>(&self, message: &M) -> Result<Vec<u8>, ProtocolError> {
        Ok(serialize_with(message, self.config)?)
    }

    fn decode<M: Message>(&self, data: &[u8]) -> Result<M, ProtocolError> {
        Ok(deserialize_with(data, self.config)?)
    }
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// Byte-enums appear as their names, so a fixture file reads
/// `"category": "Music"` rather than `"category": 0`.
///
/// This is behind the `json` feature flag (enabled by default).
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<M: Message>(&self, message: &M) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(message).map_err(ProtocolError::JsonEncode)
    }

    fn decode<M: Message>(&self, data: &[u8]) -> Result<M, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::JsonDecode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AmbientAudio, ChatChannel, ChatMessage, SoundCategory};
    use packwire_codec::{CodecError, Record};

    fn chat() -> ChatMessage {
        ChatMessage {
            sender: 11,
            channel: ChatChannel::Whisper,
            sent_at: 99,
            text: "psst".into(),
        }
    }

    // =======================================================================
    // BinaryCodec
    // =======================================================================

    #[test]
    fn test_binary_round_trip() {
        let codec = BinaryCodec::new();
        let bytes = codec.encode(&chat()).unwrap();
        let decoded: ChatMessage = codec.decode(&bytes).unwrap();
        assert_eq!(decoded, chat());
    }

    #[test]
    fn test_binary_errors_are_codec_errors() {
        let codec = BinaryCodec::new();
        let err = codec.decode::<ChatMessage>(&[0; 3]).unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::Codec(CodecError::TruncatedInput { .. })
        ));
    }

    #[test]
    fn test_binary_codec_validates_config() {
        let codec = BinaryCodec::with_config(CodecConfig {
            max_collection_len: 0,
            ..Default::default()
        });
        assert_eq!(codec.config().max_collection_len, 1);
    }

    #[test]
    fn test_longest_track_fits_max_size() {
        let audio = AmbientAudio {
            track: Some("x".repeat(AmbientAudio::MAX_TRACK_LEN)),
            volume: 1.0,
            category: SoundCategory::Music,
        };
        let codec = BinaryCodec::new();
        let bytes = codec.encode(&audio).unwrap();
        assert!(bytes.len() <= AmbientAudio::LAYOUT.max_size);
        assert_eq!(codec.decode::<AmbientAudio>(&bytes).unwrap(), audio);
    }

    // =======================================================================
    // JsonCodec
    // =======================================================================

    #[cfg(feature = "json")]
    #[test]
    fn test_json_round_trip() {
        let codec = JsonCodec;
        let bytes = codec.encode(&chat()).unwrap();
        let text = std::str::from_utf8(&bytes).unwrap();
        assert!(text.contains("\"Whisper\""));
        let decoded: ChatMessage = codec.decode(&bytes).unwrap();
        assert_eq!(decoded, chat());
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_json_decode_rejects_unknown_enum_name() {
        let codec = JsonCodec;
        let data = br#"{"sender":1,"channel":"Shout","sent_at":0,"text":""}"#;
        let err = codec.decode::<ChatMessage>(data).unwrap_err();
        assert!(matches!(err, ProtocolError::JsonDecode(_)));
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_json_and_binary_agree() {
        let json: ChatMessage = JsonCodec.decode(&JsonCodec.encode(&chat()).unwrap()).unwrap();
        let binary = BinaryCodec::new();
        assert_eq!(
            binary.encode(&json).unwrap(),
            binary.encode(&chat()).unwrap()
        );
    }
}

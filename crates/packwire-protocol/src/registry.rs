//! Name → layout lookup over the whole catalog.
//!
//! Tooling that only knows a message by name (a CLI argument, a capture
//! file header) uses the registry to find its [`LayoutContract`] and,
//! with the `json` feature, to convert between its binary and JSON
//! forms without naming the Rust type.

use packwire_codec::{CodecConfig, LayoutContract};
use tracing::debug;

use crate::types::{
    AbilitySlot, AmbientAudio, BenchState, ChatMessage, FloatRange, ItemDefinition,
    LocalizedLabel, Vector3f,
};
use crate::{Message, ProtocolError};

#[cfg(feature = "json")]
type DecodeJsonFn = fn(&[u8], CodecConfig) -> Result<serde_json::Value, ProtocolError>;
#[cfg(feature = "json")]
type EncodeJsonFn = fn(serde_json::Value, CodecConfig) -> Result<Vec<u8>, ProtocolError>;

/// Static description of one registered message type.
#[derive(Clone, Copy)]
pub struct MessageDescriptor {
    layout: LayoutContract,
    #[cfg(feature = "json")]
    decode_json: DecodeJsonFn,
    #[cfg(feature = "json")]
    encode_json: EncodeJsonFn,
}

impl MessageDescriptor {
    const fn of<M: Message>() -> Self {
        Self {
            layout: M::LAYOUT,
            #[cfg(feature = "json")]
            decode_json: decode_json::<M>,
            #[cfg(feature = "json")]
            encode_json: encode_json::<M>,
        }
    }

    pub fn name(&self) -> &'static str {
        self.layout.name
    }

    pub fn layout(&self) -> &LayoutContract {
        &self.layout
    }

    /// Decodes one binary message of this type into its JSON form.
    ///
    /// # Errors
    /// `ProtocolError::Codec` for bad bytes.
    #[cfg(feature = "json")]
    pub fn decode_json(
        &self,
        bytes: &[u8],
        config: CodecConfig,
    ) -> Result<serde_json::Value, ProtocolError> {
        (self.decode_json)(bytes, config)
    }

    /// Encodes a JSON value of this type into its binary form.
    ///
    /// # Errors
    /// `ProtocolError::JsonDecode` if `value` doesn't have the message's
    /// shape; `ProtocolError::Codec` if it can't be encoded.
    #[cfg(feature = "json")]
    pub fn encode_json(
        &self,
        value: serde_json::Value,
        config: CodecConfig,
    ) -> Result<Vec<u8>, ProtocolError> {
        (self.encode_json)(value, config)
    }
}

impl std::fmt::Debug for MessageDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageDescriptor")
            .field("layout", &self.layout)
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "json")]
fn decode_json<M: Message>(
    bytes: &[u8],
    config: CodecConfig,
) -> Result<serde_json::Value, ProtocolError> {
    let message: M = packwire_codec::deserialize_with(bytes, config)?;
    serde_json::to_value(&message).map_err(ProtocolError::JsonEncode)
}

#[cfg(feature = "json")]
fn encode_json<M: Message>(
    value: serde_json::Value,
    config: CodecConfig,
) -> Result<Vec<u8>, ProtocolError> {
    let message: M = serde_json::from_value(value).map_err(ProtocolError::JsonDecode)?;
    Ok(packwire_codec::serialize_with(&message, config)?)
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

static CATALOG: [MessageDescriptor; 8] = [
    MessageDescriptor::of::<FloatRange>(),
    MessageDescriptor::of::<Vector3f>(),
    MessageDescriptor::of::<AmbientAudio>(),
    MessageDescriptor::of::<LocalizedLabel>(),
    MessageDescriptor::of::<AbilitySlot>(),
    MessageDescriptor::of::<ChatMessage>(),
    MessageDescriptor::of::<ItemDefinition>(),
    MessageDescriptor::of::<BenchState>(),
];

/// Every registered message, in a stable order.
pub fn catalog() -> &'static [MessageDescriptor] {
    &CATALOG
}

/// Looks up a message by name, ignoring ASCII case.
///
/// # Errors
/// `ProtocolError::UnknownMessage` if nothing matches.
pub fn find(name: &str) -> Result<&'static MessageDescriptor, ProtocolError> {
    CATALOG
        .iter()
        .find(|d| d.name().eq_ignore_ascii_case(name))
        .ok_or_else(|| {
            debug!(name, "unknown message type");
            ProtocolError::UnknownMessage(name.to_string())
        })
}

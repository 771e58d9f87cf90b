//! Message catalog for Packwire.
//!
//! This crate defines *what* travels on the wire; `packwire-codec`
//! defines *how*:
//!
//! - **Types** ([`ItemDefinition`], [`AmbientAudio`], [`BenchState`],
//!   etc.) — catalog messages, each a [`Record`](packwire_codec::Record)
//!   with a static layout and serde derives.
//! - **Codec** ([`Codec`] trait, [`BinaryCodec`], [`JsonCodec`]) — the
//!   two formats a message can be converted to and from.
//! - **Registry** ([`registry::catalog`], [`registry::find`]) — lookup by
//!   name for tooling that doesn't know the Rust type.
//! - **Errors** ([`ProtocolError`]) — codec, JSON and lookup failures.
//!
//! ```text
//! Game logic (ItemDefinition) → Codec (bytes) → Transport
//! ```

// ---------------------------------------------------------------------------
// Module declarations
// ---------------------------------------------------------------------------

mod codec;
mod error;
pub mod registry;
mod types;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use codec::{BinaryCodec, Codec, Message};
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use registry::MessageDescriptor;
pub use types::{
    AbilitySlot, AmbientAudio, BenchKind, BenchState, ChatChannel, ChatMessage, FloatRange,
    ItemDefinition, ItemQuality, LocalizedLabel, SoundCategory, Vector3f,
};

//! # Packwire
//!
//! Schema-driven binary codec for game protocol messages.
//!
//! Every message type carries a static layout: presence bits for its
//! optional fields, a fixed-width head, and a variable block addressed
//! either sequentially or through an offset table. This crate re-exports
//! the codec and the message catalog and adds name-based helpers used
//! by the `packwire` command-line tool.
//!
//! ## Quick Start
//!
//! ```rust
//! use packwire::prelude::*;
//!
//! let label = LocalizedLabel {
//!     name: None,
//!     description: Some("ok".into()),
//! };
//! let bytes = serialize(&label)?;
//! assert_eq!(bytes[0], 0x02);
//! assert_eq!(deserialize::<LocalizedLabel>(&bytes)?, label);
//! # Ok::<(), packwire::PackwireError>(())
//! ```

mod error;
mod inspect;

pub use error::PackwireError;
pub use inspect::{decode_hex, encode_json, layout_table};

pub use packwire_codec as codec;
pub use packwire_protocol as protocol;

pub mod prelude {
    pub use crate::PackwireError;
    pub use packwire_codec::{
        deserialize, deserialize_with, serialize, serialize_with, CodecConfig, CodecError,
        LayoutContract, Reader, Record, Writer,
    };
    pub use packwire_protocol::{
        AbilitySlot, AmbientAudio, BenchKind, BenchState, BinaryCodec, ChatChannel, ChatMessage,
        Codec, FloatRange, ItemDefinition, ItemQuality, LocalizedLabel, Message, ProtocolError,
        JsonCodec, SoundCategory, Vector3f,
    };
}

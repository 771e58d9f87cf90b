//! Schema-driven binary codec for Packwire messages.
//!
//! This crate defines how a typed record becomes bytes and back:
//!
//! - **Layout** ([`LayoutContract`]) — each record type's static shape:
//!   presence bits, fixed block, variable block, maximum size.
//! - **Presence bits** ([`PresenceBits`]) — which optional fields are set.
//! - **Cursors** ([`Writer`], [`Reader`]) — primitives, VarInts, bounded
//!   strings, arrays and maps, all little-endian.
//! - **Offset tables** ([`OffsetTable`], [`OffsetFieldWriter`],
//!   [`OffsetFieldReader`]) — random access into the variable block.
//! - **Records** ([`Record`], [`serialize`], [`deserialize`]) — the trait
//!   every message type implements.
//! - **Errors** ([`CodecError`]) — truncated/malformed input and
//!   oversized fields/records.
//!
//! # Architecture
//!
//! The codec performs no I/O and holds no shared state. The transport
//! layer hands it one record's bytes and gets one record's bytes back:
//!
//! ```text
//! Transport (framed bytes) → Codec (Record) → Game logic
//! ```

mod config;
mod error;
mod layout;
pub mod offsets;
mod presence;
mod reader;
mod record;
pub mod varint;
pub mod wire_enum;
mod writer;

pub use config::CodecConfig;
pub use error::CodecError;
pub use layout::{Addressing, LayoutContract};
pub use offsets::{OffsetFieldReader, OffsetFieldWriter, OffsetSlots, OffsetTable};
pub use presence::{PresenceBits, MAX_PRESENCE_BYTES};
pub use reader::{ReadFrame, Reader};
pub use record::{
    deserialize, deserialize_with, read_offset_field, serialize, serialize_dyn,
    serialize_with, DynRecord, Record,
};
pub use varint::MAX_VARINT_LEN;
pub use wire_enum::WireEnum;
pub use writer::{WriteFrame, Writer};

// Used by the `wire_enum!` expansion so downstream crates don't need
// their own `serde` import for it to compile.
#[doc(hidden)]
pub mod __private {
    pub use serde;
}

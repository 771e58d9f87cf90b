//! The message catalog.
//!
//! Each type carries its layout as `Record::LAYOUT` and hand-written
//! `encode`/`decode` bodies that walk it field by field.

mod audio;
mod bench;
mod geometry;
mod item;
mod text;

pub use audio::{AmbientAudio, SoundCategory};
pub use bench::{BenchKind, BenchState};
pub use geometry::{FloatRange, Vector3f};
pub use item::{AbilitySlot, ItemDefinition, ItemQuality};
pub use text::{ChatChannel, ChatMessage, LocalizedLabel};

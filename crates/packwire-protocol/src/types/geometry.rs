//! Small fixed-width records that other messages nest.

use packwire_codec::{CodecError, LayoutContract, Reader, Record, Writer};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// FloatRange
// ---------------------------------------------------------------------------

/// An inclusive `[min, max]` range, e.g. a random pitch spread.
///
/// Two little-endian `f32`s, nothing else:
///
/// ```text
/// ┌────────┬────────┐
/// │ min f32│ max f32│   8 bytes
/// └────────┴────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FloatRange {
    pub min: f32,
    pub max: f32,
}

impl FloatRange {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }
}

impl Record for FloatRange {
    const LAYOUT: LayoutContract = LayoutContract::fixed("FloatRange", 8);

    fn encode(&self, w: &mut Writer) -> Result<(), CodecError> {
        w.write_f32(self.min);
        w.write_f32(self.max);
        Ok(())
    }

    fn decode(r: &mut Reader<'_>) -> Result<Self, CodecError> {
        r.begin_record(&Self::LAYOUT)?;
        Ok(Self {
            min: r.read_f32()?,
            max: r.read_f32()?,
        })
    }
}

// ---------------------------------------------------------------------------
// Vector3f
// ---------------------------------------------------------------------------

/// A position or offset in world space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3f {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3f {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl Record for Vector3f {
    const LAYOUT: LayoutContract = LayoutContract::fixed("Vector3f", 12);

    fn encode(&self, w: &mut Writer) -> Result<(), CodecError> {
        w.write_f32(self.x);
        w.write_f32(self.y);
        w.write_f32(self.z);
        Ok(())
    }

    fn decode(r: &mut Reader<'_>) -> Result<Self, CodecError> {
        r.begin_record(&Self::LAYOUT)?;
        Ok(Self {
            x: r.read_f32()?,
            y: r.read_f32()?,
            z: r.read_f32()?,
        })
    }
}

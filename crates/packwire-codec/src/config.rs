//! Codec configuration.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Knobs shared by [`Writer`](crate::Writer) and [`Reader`](crate::Reader).
///
/// The defaults are what production traffic should use. Tooling that
/// wants to inspect oversized captures can turn `enforce_max_size` off.
///
/// `#[serde(default)]` lets a JSON config file name only the fields it
/// wants to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Fail with `RecordTooLarge` (write) or `MalformedInput` (read) when
    /// a record's encoding exceeds its layout's `max_size`.
    pub enforce_max_size: bool,

    /// Upper bound on the element count of any array or map, applied on
    /// top of each field's own maximum.
    pub max_collection_len: u32,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            enforce_max_size: true,
            max_collection_len: Self::DEFAULT_MAX_COLLECTION_LEN,
        }
    }
}

impl CodecConfig {
    /// Default collection bound.
    pub const DEFAULT_MAX_COLLECTION_LEN: u32 = 1 << 16;

    /// Largest count a VarInt length may carry.
    pub const HARD_MAX_COLLECTION_LEN: u32 = i32::MAX as u32;

    /// Clamp out-of-range values so the config is safe to use.
    ///
    /// - `max_collection_len` of 0 is raised to 1 (a zero bound would
    ///   reject every non-empty collection, which is never intended).
    /// - `max_collection_len` is capped to [`Self::HARD_MAX_COLLECTION_LEN`].
    pub fn validated(mut self) -> Self {
        if self.max_collection_len == 0 {
            warn!("max_collection_len is 0 — raising to 1");
            self.max_collection_len = 1;
        }
        if self.max_collection_len > Self::HARD_MAX_COLLECTION_LEN {
            warn!(
                len = self.max_collection_len,
                max = Self::HARD_MAX_COLLECTION_LEN,
                "max_collection_len exceeds VarInt range — clamping"
            );
            self.max_collection_len = Self::HARD_MAX_COLLECTION_LEN;
        }
        self
    }

    /// Returns a config that does not enforce `max_size`.
    pub fn lenient() -> Self {
        Self {
            enforce_max_size: false,
            ..Self::default()
        }
    }
}

//! Per-type static layout contracts.
//!
//! Every record type declares one `const LAYOUT: LayoutContract`. The
//! writer and reader consult it to size buffers, locate the variable
//! block and reject oversized records; tooling reads it to report packet
//! size budgets without touching an instance.
//!
//! ```text
//! record start
//! │
//! ├─ presence bits ─┬──────── fixed block ─────────┬─ variable block ──┐
//! │ presence_bytes  │ fixed fields + offset slots  │ strings, arrays…  │
//! └─────────────────┴──────────────────────────────┴───────────────────┘
//!                                                  ▲
//!                                     variable_block_start
//! ```

use serde::Serialize;

use crate::offsets::{MAX_OFFSET_FIELDS, OFFSET_SLOT_WIDTH};
use crate::presence::MAX_PRESENCE_BYTES;
use crate::CodecError;

/// How a record addresses the fields of its variable block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "scheme", rename_all = "snake_case")]
pub enum Addressing {
    /// Present variable fields follow each other in declared order.
    Sequential,

    /// Each variable field has a 4-byte offset slot in the fixed block.
    /// `at` is the position of the first slot relative to the record
    /// start.
    OffsetTable { at: usize },
}

/// Static description of one record type's wire layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LayoutContract {
    /// Type name, used in errors and logs.
    pub name: &'static str,

    /// Bytes of presence flags before the fixed block.
    pub presence_bytes: usize,

    /// Width of the fixed block. Never depends on the data; includes
    /// the offset table when the type has one.
    pub fixed_block_width: usize,

    /// Number of fields in the variable block.
    pub variable_field_count: usize,

    /// Always `presence_bytes + fixed_block_width`.
    pub variable_block_start: usize,

    /// Upper bound on one instance's total encoded size.
    pub max_size: usize,

    /// Sequential or offset-table addressing of variable fields.
    pub addressing: Addressing,
}

impl LayoutContract {
    /// A record with only mandatory fixed-width fields.
    pub const fn fixed(name: &'static str, width: usize) -> Self {
        Self::sequential(name, 0, width, 0, width)
    }

    /// A record whose variable fields (if any) are laid out in order.
    pub const fn sequential(
        name: &'static str,
        presence_bytes: usize,
        fixed_block_width: usize,
        variable_field_count: usize,
        max_size: usize,
    ) -> Self {
        Self {
            name,
            presence_bytes,
            fixed_block_width,
            variable_field_count,
            variable_block_start: presence_bytes + fixed_block_width,
            max_size,
            addressing: Addressing::Sequential,
        }
    }

    /// A record whose variable fields are reached through an offset
    /// table starting `at` bytes into the record.
    pub const fn offset_table(
        name: &'static str,
        presence_bytes: usize,
        fixed_block_width: usize,
        variable_field_count: usize,
        at: usize,
        max_size: usize,
    ) -> Self {
        Self {
            name,
            presence_bytes,
            fixed_block_width,
            variable_field_count,
            variable_block_start: presence_bytes + fixed_block_width,
            max_size,
            addressing: Addressing::OffsetTable { at },
        }
    }

    /// Whether the record has anything after its fixed block.
    pub const fn is_fixed_size(&self) -> bool {
        self.variable_field_count == 0
    }

    /// Byte width of the offset table (0 for sequential records).
    pub const fn offset_table_width(&self) -> usize {
        match self.addressing {
            Addressing::Sequential => 0,
            Addressing::OffsetTable { .. } => {
                self.variable_field_count * OFFSET_SLOT_WIDTH
            }
        }
    }

    /// Checks the invariants every contract must satisfy.
    ///
    /// Catalog types call this from a unit test; a contract that fails
    /// here would make the writer and reader disagree about positions.
    ///
    /// # Errors
    /// Returns `CodecError::InvalidValue` naming the broken invariant.
    pub fn validate(&self) -> Result<(), CodecError> {
        let fail = |what: String| {
            Err(CodecError::InvalidValue(format!("layout {}: {what}", self.name)))
        };

        if self.variable_block_start != self.presence_bytes + self.fixed_block_width {
            return fail(format!(
                "variable_block_start {} != presence_bytes {} + fixed_block_width {}",
                self.variable_block_start, self.presence_bytes, self.fixed_block_width
            ));
        }
        if self.presence_bytes > MAX_PRESENCE_BYTES {
            return fail(format!(
                "presence_bytes {} exceeds {MAX_PRESENCE_BYTES}",
                self.presence_bytes
            ));
        }
        if self.variable_block_start > self.max_size {
            return fail(format!(
                "max_size {} smaller than fixed head {}",
                self.max_size, self.variable_block_start
            ));
        }
        if self.is_fixed_size() && self.max_size != self.variable_block_start {
            return fail(format!(
                "fixed-size record declares max_size {} instead of {}",
                self.max_size, self.variable_block_start
            ));
        }
        if let Addressing::OffsetTable { at } = self.addressing {
            if self.variable_field_count == 0 {
                return fail("offset table with no variable fields".into());
            }
            if self.variable_field_count > MAX_OFFSET_FIELDS {
                return fail(format!(
                    "{} offset fields exceed {MAX_OFFSET_FIELDS}",
                    self.variable_field_count
                ));
            }
            let end = at + self.offset_table_width();
            if at < self.presence_bytes || end > self.variable_block_start {
                return fail(format!(
                    "offset table {at}..{end} outside fixed block {}..{}",
                    self.presence_bytes, self.variable_block_start
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_layout() {
        let layout = LayoutContract::fixed("FloatRange", 8);
        assert_eq!(layout.variable_block_start, 8);
        assert_eq!(layout.max_size, 8);
        assert!(layout.is_fixed_size());
        layout.validate().unwrap();
    }

    #[test]
    fn test_sequential_layout_computes_variable_block_start() {
        let layout = LayoutContract::sequential("AmbientAudio", 1, 5, 1, 1000);
        assert_eq!(layout.variable_block_start, 6);
        assert_eq!(layout.offset_table_width(), 0);
        layout.validate().unwrap();
    }

    #[test]
    fn test_offset_table_layout() {
        let layout = LayoutContract::offset_table("Label", 1, 8, 2, 1, 100);
        assert_eq!(layout.offset_table_width(), 8);
        assert_eq!(layout.variable_block_start, 9);
        layout.validate().unwrap();
    }

    #[test]
    fn test_validate_rejects_table_overlapping_presence_bits() {
        let layout = LayoutContract::offset_table("Bad", 1, 8, 2, 0, 100);
        assert!(layout.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_table_past_fixed_block() {
        let layout = LayoutContract::offset_table("Bad", 1, 8, 2, 2, 100);
        assert!(layout.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_max_size_below_head() {
        let layout = LayoutContract::sequential("Bad", 1, 10, 1, 5);
        assert!(layout.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_hand_edited_start() {
        let mut layout = LayoutContract::fixed("Bad", 4);
        layout.variable_block_start = 5;
        assert!(layout.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_wide_presence() {
        let layout = LayoutContract::sequential("Bad", 9, 0, 1, 100);
        assert!(layout.validate().is_err());
    }

    #[test]
    fn test_layout_serializes_for_tooling() {
        let layout = LayoutContract::offset_table("Label", 1, 8, 2, 1, 100);
        let json = serde_json::to_value(layout).unwrap();
        assert_eq!(json["name"], "Label");
        assert_eq!(json["variable_block_start"], 9);
        assert_eq!(json["addressing"]["scheme"], "offset_table");
        assert_eq!(json["addressing"]["at"], 1);
    }
}

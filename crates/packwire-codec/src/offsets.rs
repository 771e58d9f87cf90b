//! Offset tables: random access into a record's variable block.
//!
//! A record using [`Addressing::OffsetTable`](crate::Addressing) reserves
//! one 4-byte slot per variable field inside its fixed block. Each slot
//! holds a little-endian `i32` offset relative to the record's
//! `variable_block_start`, or `-1` when the field is absent:
//!
//! ```text
//! presence │ slot 0 │ slot 1 │ variable block
//!    0x02  │   -1   │   0    │ 02 'o' 'k'
//!                       └──────▲
//! ```
//!
//! Because each field is located independently, a reader can decode one
//! field (say a display name) without parsing its siblings.
//!
//! Writing is reserve-then-patch: [`Writer::reserve_offsets`] emits `-1`
//! placeholders, and [`OffsetFieldWriter::field`] patches a slot once the
//! field's actual position is known.

use crate::{CodecError, Reader, Writer};

/// Width of one offset slot.
pub const OFFSET_SLOT_WIDTH: usize = 4;

/// Offset value marking an absent field.
pub const ABSENT_OFFSET: i32 = -1;

/// Most offset-addressed fields a layout may declare.
pub const MAX_OFFSET_FIELDS: usize = 32;

// ---------------------------------------------------------------------------
// Writer side
// ---------------------------------------------------------------------------

/// Handle to a run of reserved offset slots in a [`Writer`]'s buffer.
///
/// Holds buffer indices, not pointers, so it stays valid while the
/// buffer grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetSlots {
    first: usize,
    count: usize,
}

impl OffsetSlots {
    pub(crate) fn new(first: usize, count: usize) -> Self {
        Self { first, count }
    }

    /// Number of reserved slots.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Absolute buffer position of slot `index`.
    pub(crate) fn position(&self, index: usize) -> Option<usize> {
        (index < self.count).then(|| self.first + index * OFFSET_SLOT_WIDTH)
    }
}

/// Writes offset-addressed fields and patches their slots.
///
/// Obtained from [`WriteFrame::offset_fields`](crate::WriteFrame::offset_fields)
/// once the fixed block is complete.
#[derive(Debug, Clone, Copy)]
pub struct OffsetFieldWriter {
    slots: OffsetSlots,
    variable_block: usize,
    record: &'static str,
}

impl OffsetFieldWriter {
    pub(crate) fn new(
        slots: OffsetSlots,
        variable_block: usize,
        record: &'static str,
    ) -> Self {
        Self {
            slots,
            variable_block,
            record,
        }
    }

    /// Writes field `index` if `value` is present.
    ///
    /// Absent fields are left at the `-1` placeholder written by
    /// [`Writer::reserve_offsets`].
    ///
    /// # Errors
    /// Propagates `encode`'s error, or `RecordTooLarge` if the field
    /// starts beyond what an `i32` offset can express.
    pub fn field<T: ?Sized>(
        &self,
        w: &mut Writer,
        index: usize,
        value: Option<&T>,
        encode: impl FnOnce(&mut Writer, &T) -> Result<(), CodecError>,
    ) -> Result<(), CodecError> {
        let Some(value) = value else {
            return Ok(());
        };
        let relative = w.position() - self.variable_block;
        let offset = i32::try_from(relative).map_err(|_| {
            CodecError::RecordTooLarge {
                record: self.record,
                len: w.position(),
                max: i32::MAX as usize,
            }
        })?;
        w.patch_offset(self.slots, index, Some(offset))?;
        encode(w, value)
    }
}

// ---------------------------------------------------------------------------
// Reader side
// ---------------------------------------------------------------------------

/// Offsets read from a record's table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetTable {
    offsets: [i32; MAX_OFFSET_FIELDS],
    len: usize,
}

impl OffsetTable {
    /// Builds a table from decoded slot values.
    ///
    /// # Errors
    /// `MalformedInput` if any offset is negative but not `-1`, or if
    /// there are more than [`MAX_OFFSET_FIELDS`] of them.
    pub fn from_offsets(raw: &[i32]) -> Result<Self, CodecError> {
        if raw.len() > MAX_OFFSET_FIELDS {
            return Err(CodecError::malformed(format!(
                "{} offset slots exceed {MAX_OFFSET_FIELDS}",
                raw.len()
            )));
        }
        if let Some(bad) = raw.iter().find(|&&o| o < ABSENT_OFFSET) {
            return Err(CodecError::malformed(format!(
                "negative field offset {bad}"
            )));
        }
        let mut offsets = [ABSENT_OFFSET; MAX_OFFSET_FIELDS];
        offsets[..raw.len()].copy_from_slice(raw);
        Ok(Self {
            offsets,
            len: raw.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Raw slot values, `-1` included.
    pub fn as_slice(&self) -> &[i32] {
        &self.offsets[..self.len]
    }

    /// Offset of field `index`, or `None` if it is absent or out of range.
    pub fn get(&self, index: usize) -> Option<usize> {
        self.as_slice()
            .get(index)
            .and_then(|&o| usize::try_from(o).ok())
    }
}

/// Decodes offset-addressed fields and tracks how far the record reaches.
///
/// Each field is decoded from its own sub-reader, so field order on the
/// wire does not matter. [`finish`](Self::finish) moves the primary
/// cursor past the furthest byte any field consumed.
#[derive(Debug, Clone, Copy)]
pub struct OffsetFieldReader {
    table: OffsetTable,
    variable_block: usize,
    end: usize,
}

impl OffsetFieldReader {
    pub(crate) fn new(table: OffsetTable, variable_block: usize) -> Self {
        Self {
            table,
            variable_block,
            end: variable_block,
        }
    }

    /// The table this reader resolves fields through.
    pub fn table(&self) -> &OffsetTable {
        &self.table
    }

    /// Decodes field `index`.
    ///
    /// A field is absent if its presence bit is clear (`present == false`)
    /// or its offset is `-1`; either way the offset is not dereferenced.
    ///
    /// # Errors
    /// `MalformedInput` if the offset points outside the buffer, plus
    /// whatever `decode` reports.
    pub fn field<'a, T>(
        &mut self,
        r: &Reader<'a>,
        index: usize,
        present: bool,
        decode: impl FnOnce(&mut Reader<'a>) -> Result<T, CodecError>,
    ) -> Result<Option<T>, CodecError> {
        if !present {
            return Ok(None);
        }
        let Some(offset) = self.table.get(index) else {
            return Ok(None);
        };
        let target = self.variable_block.checked_add(offset).ok_or_else(|| {
            CodecError::malformed(format!("field {index} offset {offset} overflows"))
        })?;
        let mut sub = r.at(target)?;
        let value = decode(&mut sub)?;
        self.end = self.end.max(sub.position());
        Ok(Some(value))
    }

    /// Advances `r` past every field decoded so far.
    pub fn finish(self, r: &mut Reader<'_>) {
        r.seek(self.end.max(r.position()));
    }
}

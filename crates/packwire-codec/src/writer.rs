//! Output cursor: composes primitives into one record's byte layout.

use std::hash::Hash;

use indexmap::IndexMap;

use crate::offsets::{OffsetFieldWriter, OffsetSlots, ABSENT_OFFSET, OFFSET_SLOT_WIDTH};
use crate::varint::encode_varint;
use crate::{
    Addressing, CodecConfig, CodecError, LayoutContract, PresenceBits, Record, WireEnum,
};

/// Buffers are pre-sized to a record's `max_size`, but never beyond this.
const MAX_PREALLOCATION: usize = 64 * 1024;

/// A forward-only cursor over a growable byte buffer.
///
/// All multi-byte primitives are written little-endian. The writer owns
/// its buffer exclusively; one writer serves exactly one top-level
/// serialize call.
#[derive(Debug, Default)]
pub struct Writer {
    buf: Vec<u8>,
    config: CodecConfig,
}

impl Writer {
    /// Creates a writer with the default [`CodecConfig`].
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CodecConfig) -> Self {
        Self {
            buf: Vec::new(),
            config: config.validated(),
        }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Current write position (= bytes written so far).
    pub fn position(&self) -> usize {
        self.buf.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the writer, returning the encoded bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -----------------------------------------------------------------------
    // Primitives
    // -----------------------------------------------------------------------

    pub fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn write_i8(&mut self, value: i8) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u16(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_i16(&mut self, value: i16) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_i32(&mut self, value: i32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u64(&mut self, value: u64) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_i64(&mut self, value: i64) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_f32(&mut self, value: f32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_f64(&mut self, value: f64) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// One byte, `0` or `1`.
    pub fn write_bool(&mut self, value: bool) {
        self.buf.push(u8::from(value));
    }

    /// One byte holding the enum's ordinal.
    pub fn write_enum<E: WireEnum>(&mut self, value: E) {
        self.buf.push(value.ordinal());
    }

    /// `n` zero bytes of padding.
    pub fn write_zeros(&mut self, n: usize) {
        self.buf.resize(self.buf.len() + n, 0);
    }

    /// Writes `value` with `encode` or, when absent, `width` bytes of zero
    /// padding, so the fixed block keeps its width either way.
    pub fn write_optional_fixed<T>(
        &mut self,
        value: Option<&T>,
        width: usize,
        encode: impl FnOnce(&mut Self, &T) -> Result<(), CodecError>,
    ) -> Result<(), CodecError> {
        match value {
            Some(value) => {
                let start = self.position();
                encode(self, value)?;
                debug_assert_eq!(
                    self.position() - start,
                    width,
                    "optional fixed field wrote the wrong width"
                );
                Ok(())
            }
            None => {
                self.write_zeros(width);
                Ok(())
            }
        }
    }

    // -----------------------------------------------------------------------
    // Variable-length values
    // -----------------------------------------------------------------------

    pub fn write_varint(&mut self, value: u32) {
        encode_varint(value, &mut self.buf);
    }

    /// Exactly `width` bytes of ASCII, zero padded.
    ///
    /// # Errors
    /// - `FieldTooLarge` if `value` is longer than `width`.
    /// - `InvalidValue` if `value` contains non-ASCII or NUL characters
    ///   (NUL is reserved for padding).
    pub fn write_fixed_ascii(
        &mut self,
        field: &'static str,
        value: &str,
        width: usize,
    ) -> Result<(), CodecError> {
        if value.len() > width {
            return Err(CodecError::FieldTooLarge {
                field,
                len: value.len(),
                max: width,
            });
        }
        if let Some(c) = value.chars().find(|c| !c.is_ascii() || *c == '\0') {
            return Err(CodecError::InvalidValue(format!(
                "field `{field}`: {c:?} is not allowed in a fixed ASCII string"
            )));
        }
        self.buf.extend_from_slice(value.as_bytes());
        self.write_zeros(width - value.len());
        Ok(())
    }

    /// UTF-8 string with a 32-bit little-endian byte-length prefix.
    ///
    /// # Errors
    /// `FieldTooLarge` if the string is longer than `max` bytes.
    pub fn write_string(
        &mut self,
        field: &'static str,
        value: &str,
        max: usize,
    ) -> Result<(), CodecError> {
        let len = check_len(field, value.len(), max)?;
        self.write_u32(len);
        self.buf.extend_from_slice(value.as_bytes());
        Ok(())
    }

    /// UTF-8 string with a VarInt byte-length prefix.
    ///
    /// # Errors
    /// `FieldTooLarge` if the string is longer than `max` bytes.
    pub fn write_var_string(
        &mut self,
        field: &'static str,
        value: &str,
        max: usize,
    ) -> Result<(), CodecError> {
        self.write_var_bytes(field, value.as_bytes(), max)
    }

    /// Raw bytes with a VarInt length prefix.
    pub fn write_var_bytes(
        &mut self,
        field: &'static str,
        value: &[u8],
        max: usize,
    ) -> Result<(), CodecError> {
        let len = check_len(field, value.len(), max)?;
        self.write_varint(len);
        self.buf.extend_from_slice(value);
        Ok(())
    }

    /// VarInt element count, then each element via `encode`.
    ///
    /// # Errors
    /// `FieldTooLarge` if there are more than `max` elements (or more than
    /// the config's `max_collection_len`), plus anything `encode` reports.
    pub fn write_array<T>(
        &mut self,
        field: &'static str,
        items: &[T],
        max: usize,
        mut encode: impl FnMut(&mut Self, &T) -> Result<(), CodecError>,
    ) -> Result<(), CodecError> {
        let count = check_len(field, items.len(), self.collection_max(max))?;
        self.write_varint(count);
        for item in items {
            encode(self, item)?;
        }
        Ok(())
    }

    /// VarInt entry count, then `(key, value)` pairs in insertion order.
    ///
    /// Insertion order carries no meaning to the consumer, but keeping it
    /// makes encodings reproducible.
    pub fn write_map<K, V>(
        &mut self,
        field: &'static str,
        map: &IndexMap<K, V>,
        max: usize,
        mut encode_key: impl FnMut(&mut Self, &K) -> Result<(), CodecError>,
        mut encode_value: impl FnMut(&mut Self, &V) -> Result<(), CodecError>,
    ) -> Result<(), CodecError>
    where
        K: Hash + Eq,
    {
        let count = check_len(field, map.len(), self.collection_max(max))?;
        self.write_varint(count);
        for (key, value) in map {
            encode_key(self, key)?;
            encode_value(self, value)?;
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Records
    // -----------------------------------------------------------------------

    /// Encodes a nested or top-level record, enforcing its `max_size`.
    ///
    /// # Errors
    /// `RecordTooLarge` if the encoding exceeds `R::LAYOUT.max_size` and
    /// the config enforces it, plus anything the record reports.
    pub fn write_record<R: Record>(&mut self, record: &R) -> Result<(), CodecError> {
        let start = self.position();
        record.encode(self)?;
        let len = self.position() - start;
        if self.config.enforce_max_size && len > R::LAYOUT.max_size {
            return Err(CodecError::RecordTooLarge {
                record: R::LAYOUT.name,
                len,
                max: R::LAYOUT.max_size,
            });
        }
        Ok(())
    }

    /// Marks the start of a record. Call first thing in `Record::encode`.
    pub fn begin_record(&mut self, layout: &LayoutContract) -> WriteFrame {
        self.buf.reserve(layout.max_size.min(MAX_PREALLOCATION));
        WriteFrame {
            start: self.position(),
            layout: *layout,
        }
    }

    /// Writes the presence bits.
    pub fn write_presence(&mut self, bits: &PresenceBits) {
        self.buf.extend_from_slice(bits.as_bytes());
    }

    /// Reserves `count` offset slots, each pre-filled with `-1`.
    pub fn reserve_offsets(&mut self, count: usize) -> OffsetSlots {
        let first = self.position();
        for _ in 0..count {
            self.write_i32(ABSENT_OFFSET);
        }
        OffsetSlots::new(first, count)
    }

    /// Overwrites slot `index` with `offset`, or `-1` for `None`.
    ///
    /// # Errors
    /// `InvalidValue` if `index` is outside the reserved run.
    pub fn patch_offset(
        &mut self,
        slots: OffsetSlots,
        index: usize,
        offset: Option<i32>,
    ) -> Result<(), CodecError> {
        let pos = slots.position(index).ok_or_else(|| {
            CodecError::InvalidValue(format!(
                "offset slot {index} outside {} reserved",
                slots.count()
            ))
        })?;
        let value = offset.unwrap_or(ABSENT_OFFSET);
        self.buf[pos..pos + OFFSET_SLOT_WIDTH].copy_from_slice(&value.to_le_bytes());
        Ok(())
    }

    fn collection_max(&self, field_max: usize) -> usize {
        field_max.min(self.config.max_collection_len as usize)
    }
}

/// Converts a length to its wire form, enforcing the field maximum.
fn check_len(field: &'static str, len: usize, max: usize) -> Result<u32, CodecError> {
    if len > max {
        return Err(CodecError::FieldTooLarge { field, len, max });
    }
    u32::try_from(len).map_err(|_| CodecError::FieldTooLarge {
        field,
        len,
        max: u32::MAX as usize,
    })
}

/// Start-of-record bookmark returned by [`Writer::begin_record`].
///
/// Lets a record check that its head came out exactly
/// `variable_block_start` bytes wide before moving on to its variable
/// block.
#[derive(Debug, Clone, Copy)]
pub struct WriteFrame {
    start: usize,
    layout: LayoutContract,
}

impl WriteFrame {
    /// Position of the record's first byte in the writer.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Ends the head of a sequentially addressed record.
    pub fn finish_head(&self, w: &Writer) {
        debug_assert_eq!(
            w.position() - self.start,
            self.layout.variable_block_start,
            "{}: head width differs from layout",
            self.layout.name
        );
    }

    /// Reserves the offset table at the current position.
    pub fn reserve_offsets(&self, w: &mut Writer) -> OffsetSlots {
        debug_assert_eq!(
            Addressing::OffsetTable {
                at: w.position() - self.start
            },
            self.layout.addressing,
            "{}: offset table at the wrong position",
            self.layout.name
        );
        w.reserve_offsets(self.layout.variable_field_count)
    }

    /// Ends the head of an offset-table record and returns the helper
    /// that writes its variable fields.
    pub fn offset_fields(&self, w: &Writer, slots: OffsetSlots) -> OffsetFieldWriter {
        self.finish_head(w);
        OffsetFieldWriter::new(
            slots,
            self.start + self.layout.variable_block_start,
            self.layout.name,
        )
    }
}

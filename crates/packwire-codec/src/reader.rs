//! Input cursor: the mirror image of [`Writer`](crate::Writer).
//!
//! The reader borrows the buffer handed over by the transport layer and
//! never trusts it. Every read is bounds-checked (`TruncatedInput`),
//! every length is checked against its field maximum and every enum
//! ordinal, bool and UTF-8 sequence is validated (`MalformedInput`).
//! Nothing is substituted with a default.

use std::hash::Hash;

use indexmap::IndexMap;

use crate::offsets::{OffsetFieldReader, OffsetTable, OFFSET_SLOT_WIDTH};
use crate::varint::decode_varint;
use crate::{
    Addressing, CodecConfig, CodecError, LayoutContract, PresenceBits, Record, WireEnum,
};

/// A forward-only cursor over a borrowed byte slice.
///
/// `'a` ties every borrowed read (e.g. [`take`](Self::take)) to the
/// input buffer rather than to the reader, so sub-readers created with
/// [`at`](Self::at) can outlive the borrow of their parent.
#[derive(Debug, Clone, Copy)]
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
    config: CodecConfig,
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self::with_config(buf, CodecConfig::default())
    }

    pub fn with_config(buf: &'a [u8], config: CodecConfig) -> Self {
        Self {
            buf,
            pos: 0,
            config: config.validated(),
        }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Absolute cursor position within the buffer.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left after the cursor.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// A reader over the same buffer positioned at absolute `pos`,
    /// leaving this reader's cursor untouched.
    ///
    /// # Errors
    /// `MalformedInput` if `pos` lies beyond the end of the buffer.
    pub fn at(&self, pos: usize) -> Result<Reader<'a>, CodecError> {
        if pos > self.buf.len() {
            return Err(CodecError::malformed(format!(
                "offset {pos} outside buffer of {} bytes",
                self.buf.len()
            )));
        }
        Ok(Reader {
            buf: self.buf,
            pos,
            config: self.config,
        })
    }

    pub(crate) fn seek(&mut self, pos: usize) {
        debug_assert!(pos <= self.buf.len());
        self.pos = pos.min(self.buf.len());
    }

    /// Borrows the next `n` bytes and advances past them.
    ///
    /// # Errors
    /// `TruncatedInput` if fewer than `n` bytes remain.
    pub fn take(&mut self, n: usize) -> Result<&'a [u8], CodecError> {
        let remaining = self.remaining();
        if n > remaining {
            return Err(CodecError::TruncatedInput {
                needed: n,
                remaining,
            });
        }
        let bytes = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    // -----------------------------------------------------------------------
    // Primitives
    // -----------------------------------------------------------------------

    pub fn read_u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.take_array::<1>()?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8, CodecError> {
        Ok(i8::from_le_bytes(self.take_array()?))
    }

    pub fn read_u16(&mut self) -> Result<u16, CodecError> {
        Ok(u16::from_le_bytes(self.take_array()?))
    }

    pub fn read_i16(&mut self) -> Result<i16, CodecError> {
        Ok(i16::from_le_bytes(self.take_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32, CodecError> {
        Ok(u32::from_le_bytes(self.take_array()?))
    }

    pub fn read_i32(&mut self) -> Result<i32, CodecError> {
        Ok(i32::from_le_bytes(self.take_array()?))
    }

    pub fn read_u64(&mut self) -> Result<u64, CodecError> {
        Ok(u64::from_le_bytes(self.take_array()?))
    }

    pub fn read_i64(&mut self) -> Result<i64, CodecError> {
        Ok(i64::from_le_bytes(self.take_array()?))
    }

    pub fn read_f32(&mut self) -> Result<f32, CodecError> {
        Ok(f32::from_le_bytes(self.take_array()?))
    }

    pub fn read_f64(&mut self) -> Result<f64, CodecError> {
        Ok(f64::from_le_bytes(self.take_array()?))
    }

    /// # Errors
    /// `MalformedInput` for any byte other than `0` or `1`.
    pub fn read_bool(&mut self) -> Result<bool, CodecError> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(CodecError::malformed(format!("invalid bool byte {other:#04x}"))),
        }
    }

    /// # Errors
    /// `MalformedInput` if the ordinal names no variant of `E`.
    pub fn read_enum<E: WireEnum>(&mut self) -> Result<E, CodecError> {
        let ordinal = self.read_u8()?;
        E::from_ordinal(ordinal).ok_or_else(|| {
            CodecError::malformed(format!("invalid {} ordinal {ordinal}", E::TYPE_NAME))
        })
    }

    /// Consumes `n` bytes of padding.
    pub fn skip(&mut self, n: usize) -> Result<(), CodecError> {
        self.take(n).map(|_| ())
    }

    /// Decodes an optional fixed-width field: `decode` when present,
    /// otherwise skips `width` bytes of padding.
    pub fn read_optional_fixed<T>(
        &mut self,
        present: bool,
        width: usize,
        decode: impl FnOnce(&mut Self) -> Result<T, CodecError>,
    ) -> Result<Option<T>, CodecError> {
        if present {
            decode(self).map(Some)
        } else {
            self.skip(width)?;
            Ok(None)
        }
    }

    // -----------------------------------------------------------------------
    // Variable-length values
    // -----------------------------------------------------------------------

    pub fn read_varint(&mut self) -> Result<u32, CodecError> {
        let (value, len) = decode_varint(&self.buf[self.pos..])?;
        self.pos += len;
        Ok(value)
    }

    /// Exactly `width` bytes of zero-padded ASCII.
    pub fn read_fixed_ascii(
        &mut self,
        field: &'static str,
        width: usize,
    ) -> Result<String, CodecError> {
        let raw = self.take(width)?;
        let used = raw.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
        let text = &raw[..used];
        if !text.iter().all(|&b| b.is_ascii() && b != 0) {
            return Err(CodecError::malformed(format!(
                "field `{field}`: fixed ASCII string holds non-ASCII bytes"
            )));
        }
        // All bytes are ASCII, so this cannot fail.
        Ok(text.iter().map(|&b| char::from(b)).collect())
    }

    /// UTF-8 string with a 32-bit length prefix.
    pub fn read_string(
        &mut self,
        field: &'static str,
        max: usize,
    ) -> Result<String, CodecError> {
        let len = self.read_u32()?;
        let bytes = self.take_len(field, len, max)?;
        utf8(field, bytes)
    }

    /// UTF-8 string with a VarInt length prefix.
    pub fn read_var_string(
        &mut self,
        field: &'static str,
        max: usize,
    ) -> Result<String, CodecError> {
        let len = self.read_varint()?;
        let bytes = self.take_len(field, len, max)?;
        utf8(field, bytes)
    }

    /// Raw bytes with a VarInt length prefix.
    pub fn read_var_bytes(
        &mut self,
        field: &'static str,
        max: usize,
    ) -> Result<Vec<u8>, CodecError> {
        let len = self.read_varint()?;
        self.take_len(field, len, max).map(<[u8]>::to_vec)
    }

    /// VarInt element count, then that many elements via `decode`.
    pub fn read_array<T>(
        &mut self,
        field: &'static str,
        max: usize,
        mut decode: impl FnMut(&mut Self) -> Result<T, CodecError>,
    ) -> Result<Vec<T>, CodecError> {
        let count = self.read_count(field, max)?;
        // A hostile count must not turn into a huge allocation: every
        // element occupies at least one byte in practice, so the remaining
        // input bounds the capacity we reserve up front.
        let mut items = Vec::with_capacity(count.min(self.remaining()));
        for _ in 0..count {
            items.push(decode(self)?);
        }
        Ok(items)
    }

    /// VarInt entry count, then that many `(key, value)` pairs, kept in
    /// wire order.
    ///
    /// # Errors
    /// `MalformedInput` on a duplicate key.
    pub fn read_map<K, V>(
        &mut self,
        field: &'static str,
        max: usize,
        mut decode_key: impl FnMut(&mut Self) -> Result<K, CodecError>,
        mut decode_value: impl FnMut(&mut Self) -> Result<V, CodecError>,
    ) -> Result<IndexMap<K, V>, CodecError>
    where
        K: Hash + Eq,
    {
        let count = self.read_count(field, max)?;
        let mut map = IndexMap::with_capacity(count.min(self.remaining()));
        for _ in 0..count {
            let key = decode_key(self)?;
            let value = decode_value(self)?;
            if map.insert(key, value).is_some() {
                return Err(CodecError::malformed(format!(
                    "field `{field}`: duplicate map key"
                )));
            }
        }
        Ok(map)
    }

    // -----------------------------------------------------------------------
    // Records
    // -----------------------------------------------------------------------

    /// Decodes a nested or top-level record.
    ///
    /// # Errors
    /// `MalformedInput` if the record spans more than its `max_size` and
    /// the config enforces it, plus anything the record reports.
    pub fn read_record<R: Record>(&mut self) -> Result<R, CodecError> {
        let start = self.pos;
        let record = R::decode(self)?;
        let len = self.pos - start;
        if self.config.enforce_max_size && len > R::LAYOUT.max_size {
            return Err(CodecError::malformed(format!(
                "{} spans {len} bytes, more than its maximum {}",
                R::LAYOUT.name,
                R::LAYOUT.max_size
            )));
        }
        Ok(record)
    }

    /// Marks the start of a record. Call first thing in `Record::decode`.
    ///
    /// # Errors
    /// `TruncatedInput` if the buffer cannot even hold the record's
    /// fixed head.
    pub fn begin_record(&self, layout: &LayoutContract) -> Result<ReadFrame, CodecError> {
        let remaining = self.remaining();
        if remaining < layout.variable_block_start {
            return Err(CodecError::TruncatedInput {
                needed: layout.variable_block_start,
                remaining,
            });
        }
        Ok(ReadFrame {
            start: self.pos,
            layout: *layout,
        })
    }

    /// Reads `width` bytes of presence flags.
    pub fn read_presence(&mut self, width: usize) -> Result<PresenceBits, CodecError> {
        self.take(width).map(PresenceBits::from_bytes)
    }

    /// Reads `count` offset slots.
    ///
    /// # Errors
    /// `MalformedInput` for a negative offset other than `-1`.
    pub fn read_offsets(&mut self, count: usize) -> Result<OffsetTable, CodecError> {
        let raw = self.take(count * OFFSET_SLOT_WIDTH)?;
        let offsets: Vec<i32> = raw
            .chunks_exact(OFFSET_SLOT_WIDTH)
            .map(|c| i32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        OffsetTable::from_offsets(&offsets)
    }

    fn read_count(&mut self, field: &'static str, max: usize) -> Result<usize, CodecError> {
        let count = self.read_varint()? as usize;
        let limit = max.min(self.config.max_collection_len as usize);
        if count > limit {
            return Err(CodecError::malformed(format!(
                "field `{field}`: {count} elements exceed maximum {limit}"
            )));
        }
        Ok(count)
    }

    fn take_len(
        &mut self,
        field: &'static str,
        len: u32,
        max: usize,
    ) -> Result<&'a [u8], CodecError> {
        let len = len as usize;
        if len > max {
            return Err(CodecError::malformed(format!(
                "field `{field}`: length {len} exceeds maximum {max}"
            )));
        }
        self.take(len)
    }
}

fn utf8(field: &'static str, bytes: &[u8]) -> Result<String, CodecError> {
    std::str::from_utf8(bytes)
        .map(str::to_owned)
        .map_err(|e| CodecError::malformed(format!("field `{field}`: {e}")))
}

/// Start-of-record bookmark returned by [`Reader::begin_record`].
#[derive(Debug, Clone, Copy)]
pub struct ReadFrame {
    start: usize,
    layout: LayoutContract,
}

impl ReadFrame {
    /// Position of the record's first byte in the buffer.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Reads this record's presence bits.
    pub fn read_presence(&self, r: &mut Reader<'_>) -> Result<PresenceBits, CodecError> {
        debug_assert_eq!(r.position(), self.start);
        r.read_presence(self.layout.presence_bytes)
    }

    /// Reads this record's offset table at the current position.
    pub fn read_offsets(&self, r: &mut Reader<'_>) -> Result<OffsetTable, CodecError> {
        debug_assert_eq!(
            Addressing::OffsetTable {
                at: r.position() - self.start
            },
            self.layout.addressing,
            "{}: offset table read at the wrong position",
            self.layout.name
        );
        r.read_offsets(self.layout.variable_field_count)
    }

    /// Ends the head of a sequentially addressed record.
    pub fn finish_head(&self, r: &Reader<'_>) {
        debug_assert_eq!(
            r.position() - self.start,
            self.layout.variable_block_start,
            "{}: head width differs from layout",
            self.layout.name
        );
    }

    /// Ends the head of an offset-table record and returns the helper
    /// that decodes its variable fields.
    pub fn offset_fields(&self, r: &Reader<'_>, table: OffsetTable) -> OffsetFieldReader {
        self.finish_head(r);
        OffsetFieldReader::new(table, self.start + self.layout.variable_block_start)
    }
}

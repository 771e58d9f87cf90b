//! The record trait and the serialize/deserialize entry points.

use tracing::{debug, trace};

use crate::{Addressing, CodecConfig, CodecError, LayoutContract, Reader, Writer};

/// A message type that can encode itself into a [`Writer`] and decode
/// itself from a [`Reader`].
///
/// Implementations follow the same recipe:
///
/// 1. `begin_record` with [`Self::LAYOUT`](Record::LAYOUT);
/// 2. presence bits, if the type has optional fields;
/// 3. the fixed block in declared order, zero padding absent optional
///    fixed-width fields (and the offset table, if any);
/// 4. the variable block.
///
/// `decode` mirrors `encode` step for step. Nested records recurse
/// through [`Writer::write_record`] / [`Reader::read_record`] so that
/// each level enforces its own `max_size`.
pub trait Record: Sized {
    /// The type's static layout.
    const LAYOUT: LayoutContract;

    /// Writes `self` at the writer's current position.
    fn encode(&self, w: &mut Writer) -> Result<(), CodecError>;

    /// Reads one instance at the reader's current position.
    fn decode(r: &mut Reader<'_>) -> Result<Self, CodecError>;
}

/// Object-safe view of a [`Record`] for heterogeneous collections.
///
/// Blanket-implemented for every `Record`; concrete code should prefer
/// the static trait.
pub trait DynRecord {
    fn layout(&self) -> LayoutContract;

    fn encode_into(&self, w: &mut Writer) -> Result<(), CodecError>;
}

impl<R: Record> DynRecord for R {
    fn layout(&self) -> LayoutContract {
        R::LAYOUT
    }

    fn encode_into(&self, w: &mut Writer) -> Result<(), CodecError> {
        w.write_record(self)
    }
}

/// Encodes `record` with the default configuration.
///
/// # Errors
/// `FieldTooLarge`, `RecordTooLarge` or `InvalidValue` if some value has
/// no valid encoding. Nothing partial is returned.
pub fn serialize<R: Record>(record: &R) -> Result<Vec<u8>, CodecError> {
    serialize_with(record, CodecConfig::default())
}

/// Encodes `record` with an explicit configuration.
pub fn serialize_with<R: Record>(
    record: &R,
    config: CodecConfig,
) -> Result<Vec<u8>, CodecError> {
    let mut w = Writer::with_config(config);
    match w.write_record(record) {
        Ok(()) => {
            trace!(record = R::LAYOUT.name, len = w.position(), "serialized");
            Ok(w.into_bytes())
        }
        Err(e) => {
            debug!(record = R::LAYOUT.name, kind = e.kind(), error = %e, "serialize failed");
            Err(e)
        }
    }
}

/// Encodes a type-erased record.
pub fn serialize_dyn(record: &dyn DynRecord) -> Result<Vec<u8>, CodecError> {
    let mut w = Writer::new();
    record.encode_into(&mut w)?;
    trace!(record = record.layout().name, len = w.position(), "serialized");
    Ok(w.into_bytes())
}

/// Decodes exactly one `R` from `bytes` with the default configuration.
///
/// # Errors
/// - `TruncatedInput` if `bytes` is shorter than a field requires
///   (including the fixed head).
/// - `MalformedInput` for invalid content or trailing bytes.
pub fn deserialize<R: Record>(bytes: &[u8]) -> Result<R, CodecError> {
    deserialize_with(bytes, CodecConfig::default())
}

/// Decodes exactly one `R` from `bytes` with an explicit configuration.
pub fn deserialize_with<R: Record>(
    bytes: &[u8],
    config: CodecConfig,
) -> Result<R, CodecError> {
    let mut r = Reader::with_config(bytes, config);
    let result = r.read_record::<R>().and_then(|record| {
        if r.is_empty() {
            Ok(record)
        } else {
            Err(CodecError::malformed(format!(
                "{} trailing bytes after {}",
                r.remaining(),
                R::LAYOUT.name
            )))
        }
    });
    match &result {
        Ok(_) => trace!(record = R::LAYOUT.name, len = bytes.len(), "deserialized"),
        Err(e) => debug!(
            record = R::LAYOUT.name,
            len = bytes.len(),
            kind = e.kind(),
            error = %e,
            "deserialize failed"
        ),
    }
    result
}

/// Decodes a single offset-addressed field of an encoded record without
/// touching its siblings.
///
/// `bit` is the field's presence bit, if it has one.
///
/// # Errors
/// `InvalidValue` if `layout` has no offset table or `index` is out of
/// range; otherwise the same errors as a full decode of that field.
pub fn read_offset_field<'a, T>(
    bytes: &'a [u8],
    layout: &LayoutContract,
    index: usize,
    bit: Option<u16>,
    decode: impl FnOnce(&mut Reader<'a>) -> Result<T, CodecError>,
) -> Result<Option<T>, CodecError> {
    let Addressing::OffsetTable { at } = layout.addressing else {
        return Err(CodecError::InvalidValue(format!(
            "{} has no offset table",
            layout.name
        )));
    };
    if index >= layout.variable_field_count {
        return Err(CodecError::InvalidValue(format!(
            "{} has no variable field {index}",
            layout.name
        )));
    }

    let mut r = Reader::new(bytes);
    let frame = r.begin_record(layout)?;
    let bits = frame.read_presence(&mut r)?;
    r.skip(at - layout.presence_bytes)?;
    let table = frame.read_offsets(&mut r)?;

    let present = bit.is_none_or(|b| bits.is_set(b));
    let mut fields = crate::offsets::OffsetFieldReader::new(
        table,
        frame.start() + layout.variable_block_start,
    );
    fields.field(&r, index, present, decode)
}

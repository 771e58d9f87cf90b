//! Variable-length unsigned 32-bit integers.
//!
//! Standard base-128 scheme: seven value bits per byte, least
//! significant group first, high bit set on every byte except the last.
//!
//! | Value           | Bytes            |
//! |-----------------|------------------|
//! | 0               | `00`             |
//! | 127             | `7F`             |
//! | 128             | `80 01`          |
//! | 16383           | `FF 7F`          |
//! | 2_147_483_647   | `FF FF FF FF 07` |
//!
//! A `u32` never needs more than five bytes, so decoding rejects a sixth
//! byte and any fifth byte whose value bits would overflow 32 bits.

use crate::CodecError;

/// Maximum encoded length of a 32-bit VarInt.
pub const MAX_VARINT_LEN: usize = 5;

/// Number of bytes `value` occupies once encoded.
pub fn varint_len(value: u32) -> usize {
    match value {
        0..=0x7F => 1,
        0x80..=0x3FFF => 2,
        0x4000..=0x1F_FFFF => 3,
        0x20_0000..=0x0FFF_FFFF => 4,
        _ => 5,
    }
}

/// Appends the encoding of `value` to `out`, returning the byte count.
pub fn encode_varint(mut value: u32, out: &mut Vec<u8>) -> usize {
    let mut written = 0;
    loop {
        let group = (value & 0x7F) as u8;
        value >>= 7;
        written += 1;
        if value == 0 {
            out.push(group);
            return written;
        }
        out.push(group | 0x80);
    }
}

/// Decodes a VarInt from the front of `buf`.
///
/// Returns `(value, bytes_read)`.
///
/// # Errors
/// - `TruncatedInput` if `buf` ends while the continuation bit is set.
/// - `MalformedInput` if the encoding runs past five bytes or the fifth
///   byte carries bits above bit 31.
pub fn decode_varint(buf: &[u8]) -> Result<(u32, usize), CodecError> {
    let mut value: u32 = 0;
    for i in 0..MAX_VARINT_LEN {
        let Some(&byte) = buf.get(i) else {
            return Err(CodecError::TruncatedInput {
                needed: i + 1,
                remaining: buf.len(),
            });
        };
        if i == MAX_VARINT_LEN - 1 {
            if byte & 0x80 != 0 {
                return Err(CodecError::malformed(
                    "varint longer than 5 bytes",
                ));
            }
            if byte & 0x70 != 0 {
                return Err(CodecError::malformed(
                    "varint overflows 32 bits",
                ));
            }
        }
        value |= u32::from(byte & 0x7F) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
    }
    // The fifth byte always returns above; this is unreachable in practice
    // but keeps the function total without a panic.
    Err(CodecError::malformed("varint longer than 5 bytes"))
}

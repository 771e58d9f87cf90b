//! Property-based tests for the codec primitives.
//!
//! - VarInt length is minimal and decoding inverts encoding
//! - Presence bits are independent of each other
//! - Bounded strings and arrays either round-trip or fail with
//!   `FieldTooLarge`, never with a partial write
//! - Arbitrary bytes never panic a reader

use packwire_codec::varint::{decode_varint, encode_varint, varint_len};
use packwire_codec::{CodecError, PresenceBits, Reader, Writer, MAX_PRESENCE_BYTES};
use proptest::prelude::*;

// Strategy for a presence vector width and a set of bits inside it
fn presence_strategy() -> impl Strategy<Value = (usize, Vec<u16>)> {
    (1usize..=MAX_PRESENCE_BYTES).prop_flat_map(|width| {
        let max_bit = (width * 8) as u16;
        (Just(width), prop::collection::vec(1u16..=max_bit, 0..16))
    })
}

#[test]
fn prop_varint_is_minimal() {
    proptest!(|(value in any::<u32>())| {
        let mut out = Vec::new();
        let len = encode_varint(value, &mut out);
        prop_assert_eq!(len, out.len());
        prop_assert_eq!(len, varint_len(value));
        // Only the last byte lacks the continuation bit.
        prop_assert!(out[..len - 1].iter().all(|b| b & 0x80 != 0));
        prop_assert_eq!(out[len - 1] & 0x80, 0);
        prop_assert_eq!(decode_varint(&out).unwrap(), (value, len));
    });
}

#[test]
fn prop_varint_prefix_is_truncated() {
    proptest!(|(value in 128u32..)| {
        let mut out = Vec::new();
        let len = encode_varint(value, &mut out);
        let err = decode_varint(&out[..len - 1]).unwrap_err();
        prop_assert!(
            matches!(err, CodecError::TruncatedInput { .. }),
            "unexpected error: {:?}",
            err
        );
    });
}

#[test]
fn prop_presence_bits_are_independent() {
    proptest!(|((width, bits) in presence_strategy())| {
        let mut presence = PresenceBits::new(width);
        for &bit in &bits {
            presence.set(bit);
        }
        let restored = PresenceBits::from_bytes(presence.as_bytes());
        for bit in 1..=(width * 8) as u16 {
            prop_assert_eq!(restored.is_set(bit), bits.contains(&bit));
        }
    });
}

#[test]
fn prop_var_string_round_trip_or_too_large() {
    proptest!(|(text in ".{0,40}", max in 0usize..48)| {
        let mut w = Writer::new();
        match w.write_var_string("text", &text, max) {
            Ok(()) => {
                prop_assert!(text.len() <= max);
                let bytes = w.into_bytes();
                let mut r = Reader::new(&bytes);
                prop_assert_eq!(r.read_var_string("text", max).unwrap(), text);
                prop_assert!(r.is_empty());
            }
            Err(CodecError::FieldTooLarge { field, len, max: limit }) => {
                prop_assert_eq!(field, "text");
                prop_assert_eq!(len, text.len());
                prop_assert_eq!(limit, max);
                prop_assert!(text.len() > max);
                prop_assert_eq!(w.position(), 0);
            }
            Err(other) => prop_assert!(false, "unexpected error: {:?}", other),
        }
    });
}

#[test]
fn prop_array_round_trip() {
    proptest!(|(items in prop::collection::vec(any::<i64>(), 0..64))| {
        let mut w = Writer::new();
        w.write_array("items", &items, 64, |w, v| {
            w.write_i64(*v);
            Ok(())
        })
        .unwrap();
        let bytes = w.into_bytes();
        let mut r = Reader::new(&bytes);
        let decoded = r.read_array("items", 64, |r| r.read_i64()).unwrap();
        prop_assert_eq!(decoded, items);
        prop_assert!(r.is_empty());
    });
}

#[test]
fn prop_reader_never_panics_on_arbitrary_bytes() {
    proptest!(|(bytes in prop::collection::vec(any::<u8>(), 0..256))| {
        let mut r = Reader::new(&bytes);
        let _ = r.read_var_string("s", 128);
        let _ = r.read_string("s", 128);
        let _ = r.read_array("a", 32, |r| r.read_var_bytes("b", 16));
        let _ = r.read_map("m", 32, |r| r.read_u16(), |r| r.read_bool());
        let _ = r.read_fixed_ascii("h", 8);
        let _ = r.read_varint();
    });
}

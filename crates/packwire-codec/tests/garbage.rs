//! Seeded random-input tests: decoding garbage must fail cleanly.

use packwire_codec::varint::{decode_varint, MAX_VARINT_LEN};
use packwire_codec::{CodecError, OffsetTable, Reader};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const ROUNDS: usize = 5_000;

#[test]
fn test_random_varints_decode_or_error() {
    let mut rng = StdRng::seed_from_u64(0x5eed_0001);
    for _ in 0..ROUNDS {
        let len = rng.random_range(0..=8);
        let bytes: Vec<u8> = (0..len).map(|_| rng.random()).collect();
        match decode_varint(&bytes) {
            Ok((_, used)) => assert!(used >= 1 && used <= MAX_VARINT_LEN.min(len)),
            Err(CodecError::TruncatedInput { .. } | CodecError::MalformedInput(_)) => {}
            Err(other) => panic!("unexpected error {other:?} for {bytes:02x?}"),
        }
    }
}

#[test]
fn test_random_offsets_never_index_past_buffer() {
    let mut rng = StdRng::seed_from_u64(0x5eed_0002);
    for _ in 0..ROUNDS {
        let count = rng.random_range(1..=8);
        let raw: Vec<i32> = (0..count).map(|_| rng.random_range(-4..64)).collect();
        let Ok(table) = OffsetTable::from_offsets(&raw) else {
            assert!(raw.iter().any(|&o| o < -1));
            continue;
        };
        let buf = vec![0u8; 32];
        let r = Reader::new(&buf);
        for index in 0..table.len() {
            if let Some(offset) = table.get(index) {
                // Targets past the buffer are rejected, never read.
                match r.at(offset) {
                    Ok(at) => assert!(at.position() <= buf.len()),
                    Err(err) => assert!(matches!(err, CodecError::MalformedInput(_))),
                }
            }
        }
    }
}

#[test]
fn test_random_collections_never_panic() {
    let mut rng = StdRng::seed_from_u64(0x5eed_0003);
    for _ in 0..ROUNDS {
        let len = rng.random_range(0..64);
        let bytes: Vec<u8> = (0..len).map(|_| rng.random()).collect();
        let mut r = Reader::new(&bytes);
        if let Ok(items) = r.read_array("items", 1024, |r| r.read_var_string("item", 32)) {
            assert!(items.len() <= bytes.len());
        }
    }
}

//! Seeded adversarial inputs against every registered message.
//!
//! Decoding must return `Ok` or a decode error. It must never panic,
//! hang, or allocate in proportion to a length field instead of the
//! input.

use packwire_codec::{CodecConfig, CodecError};
use packwire_protocol::{registry, ProtocolError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const ROUNDS: usize = 2_000;

fn assert_clean(name: &str, result: Result<serde_json::Value, ProtocolError>) {
    match result {
        Ok(_) => {}
        Err(ProtocolError::Codec(err)) => {
            assert!(err.is_decode_error(), "{name}: unexpected {err:?}");
        }
        Err(other) => panic!("{name}: unexpected {other:?}"),
    }
}

#[test]
fn test_random_bytes_never_panic() {
    let mut rng = StdRng::seed_from_u64(0xfa11_0001);
    for descriptor in registry::catalog() {
        let head = descriptor.layout().variable_block_start;
        for _ in 0..ROUNDS {
            let len = rng.random_range(0..head + 64);
            let bytes: Vec<u8> = (0..len).map(|_| rng.random()).collect();
            assert_clean(
                descriptor.name(),
                descriptor.decode_json(&bytes, CodecConfig::default()),
            );
        }
    }
}

#[test]
fn test_mutated_valid_encodings_never_panic() {
    let mut rng = StdRng::seed_from_u64(0xfa11_0002);
    let samples = [
        ("LocalizedLabel", serde_json::json!({ "name": "Lantern", "description": "Glows." })),
        (
            "ItemDefinition",
            serde_json::json!({
                "model_hash": "ab12",
                "quality": "Rare",
                "max_stack": 16,
                "durability": 30,
                "held_offset": { "x": 0.0, "y": 1.0, "z": 0.0 },
                "weight": null,
                "consumable": false,
                "name": "Lantern",
                "description": null,
                "tags": ["light", "tool"],
                "stats": { "light": 8 },
                "abilities": [{ "slot": 0, "cooldown": null, "ability_id": "toggle" }],
                "icon": [137, 80, 78, 71]
            }),
        ),
        (
            "BenchState",
            serde_json::json!({
                "bench_id": 5,
                "kind": "Loom",
                "tier": 2,
                "progress": 0.5,
                "powered": true,
                "owner": 1,
                "position": { "x": 1.0, "y": 2.0, "z": 3.0 },
                "custom_name": "Weaver",
                "labels": [{ "name": "Loom", "description": null }],
                "recipe_ids": ["cloth"]
            }),
        ),
    ];

    for (name, json) in samples {
        let descriptor = registry::find(name).unwrap();
        let valid = descriptor.encode_json(json, CodecConfig::default()).unwrap();
        for _ in 0..ROUNDS {
            let mut bytes = valid.clone();
            for _ in 0..rng.random_range(1..=4) {
                let i = rng.random_range(0..bytes.len());
                bytes[i] = rng.random();
            }
            assert_clean(name, descriptor.decode_json(&bytes, CodecConfig::default()));
        }
    }
}

#[test]
fn test_huge_length_prefix_is_rejected_without_allocating() {
    // LocalizedLabel with a name whose VarInt length claims ~2 GiB.
    let bytes = [
        0x01, // name present
        0x00, 0x00, 0x00, 0x00, // name offset 0
        0xFF, 0xFF, 0xFF, 0xFF, // no description
        0xFF, 0xFF, 0xFF, 0xFF, 0x07,
    ];
    let err = registry::find("LocalizedLabel")
        .unwrap()
        .decode_json(&bytes, CodecConfig::default())
        .unwrap_err();
    assert!(matches!(
        err,
        ProtocolError::Codec(CodecError::MalformedInput(_))
    ));
}

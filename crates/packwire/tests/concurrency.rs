//! Encoding and decoding from many tasks at once.
//!
//! The codec holds no shared state, so a single `BinaryCodec` can be
//! shared by every task and each one must see exactly its own bytes.

use std::sync::Arc;

use packwire::prelude::*;

fn label_for(i: usize) -> LocalizedLabel {
    LocalizedLabel {
        name: Some(format!("label-{i}")),
        description: (i % 3 == 0).then(|| "x".repeat(i % 50)),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_shared_codec_across_tasks() {
    let codec = Arc::new(BinaryCodec::new());

    let mut handles = Vec::new();
    for i in 0..64 {
        let codec = Arc::clone(&codec);
        handles.push(tokio::spawn(async move {
            let label = label_for(i);
            let bytes = codec.encode(&label).unwrap();
            tokio::task::yield_now().await;
            let decoded: LocalizedLabel = codec.decode(&bytes).unwrap();
            (label, decoded, bytes)
        }));
    }

    for (i, handle) in handles.into_iter().enumerate() {
        let (label, decoded, bytes) = handle.await.unwrap();
        assert_eq!(decoded, label);
        // Same input on this thread gives the same bytes.
        assert_eq!(bytes, serialize(&label_for(i)).unwrap());
    }
}

#[tokio::test]
async fn test_blocking_pool_decodes_large_batch() {
    let item = ItemDefinition {
        model_hash: "c0ffee".into(),
        quality: ItemQuality::Uncommon,
        max_stack: 20,
        durability: None,
        held_offset: None,
        weight: Some(0.1),
        consumable: true,
        name: Some("Bread".into()),
        description: None,
        tags: Some(vec!["food".into()]),
        stats: None,
        abilities: None,
        icon: None,
    };
    let bytes = Arc::new(serialize(&item).unwrap());

    let tasks: Vec<_> = (0..16)
        .map(|_| {
            let bytes = Arc::clone(&bytes);
            tokio::task::spawn_blocking(move || {
                (0..100)
                    .map(|_| deserialize::<ItemDefinition>(&bytes).unwrap())
                    .count()
            })
        })
        .collect();

    let mut total = 0;
    for task in tasks {
        total += task.await.unwrap();
    }
    assert_eq!(total, 1_600);
}

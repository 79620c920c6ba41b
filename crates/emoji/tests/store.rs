//! Tests for the custom emoji stores.

use std::fs;
use std::sync::Arc;
use std::thread;

use chatmark_emoji::{CustomEmojiStore, FileEmojiStore, ImageHandle, MemoryEmojiStore, StoreError};

fn png(tag: u8) -> ImageHandle {
    ImageHandle::from(vec![0x89, b'P', b'N', b'G', tag])
}

#[test]
fn memory_store_put_then_snapshot() {
    let store = MemoryEmojiStore::new();
    store.put("cat", png(1)).expect("put cat");
    store.put("dog", png(2)).expect("put dog");

    let snap = store.get_all().expect("snapshot");
    assert_eq!(snap.len(), 2);
    assert_eq!(snap.get("cat"), Some(&png(1)));
    assert_eq!(snap.get("Cat"), None);
}

#[test]
fn memory_store_snapshot_is_isolated_from_later_writes() {
    let store = MemoryEmojiStore::new();
    store.put("cat", png(1)).expect("put");
    let before = store.get_all().expect("snapshot");

    store.put("cat", png(9)).expect("replace");
    store.put("new", png(3)).expect("put new");

    assert_eq!(before.get("cat"), Some(&png(1)));
    assert!(before.get("new").is_none());
    assert_eq!(store.get_all().expect("snapshot").get("cat"), Some(&png(9)));
}

#[test]
fn memory_store_rejects_invalid_shortcodes() {
    let store = MemoryEmojiStore::new();
    let err = store.put("has space", png(1)).unwrap_err();
    assert!(matches!(err, StoreError::InvalidShortcode { .. }), "{err}");
    assert!(store.get_all().expect("snapshot").is_empty());
}

#[test]
fn memory_store_concurrent_readers_and_writers() {
    let store = Arc::new(MemoryEmojiStore::new());
    let writers: Vec<_> = (0..4u8)
        .map(|n| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..25u8 {
                    store.put(&format!("e{n}_{i}"), png(i)).expect("put");
                    store.get_all().expect("snapshot");
                }
            })
        })
        .collect();
    for w in writers {
        w.join().expect("writer thread");
    }
    assert_eq!(store.get_all().expect("snapshot").len(), 100);
}

#[test]
fn file_store_missing_file_reads_empty() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = FileEmojiStore::new(dir.path().join("emoji.json"));
    assert!(store.get_all().expect("snapshot").is_empty());
}

#[test]
fn file_store_persists_across_instances() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("emoji.json");

    FileEmojiStore::new(&path).put("parrot", png(7)).expect("put");

    let reopened = FileEmojiStore::new(&path);
    let snap = reopened.get_all().expect("snapshot");
    assert_eq!(snap.get("parrot"), Some(&png(7)));

    let doc: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).expect("read store")).expect("json");
    assert_eq!(doc["emojis"]["parrot"], png(7).to_base64());
}

#[test]
fn file_store_malformed_document_is_reported() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("emoji.json");
    fs::write(&path, "{ not json").expect("write");

    let err = FileEmojiStore::new(&path).get_all().unwrap_err();
    assert!(matches!(err, StoreError::Malformed { .. }), "{err}");
    assert!(!err.is_retryable());
}

#[test]
fn file_store_separate_instances_do_not_lose_writes() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("emoji.json");

    thread::scope(|s| {
        for n in 0..8u8 {
            let path = &path;
            s.spawn(move || {
                let store = FileEmojiStore::new(path);
                for i in 0..20u8 {
                    store.put(&format!("w{n}_{i}"), png(i)).expect("put");
                }
            });
        }
    });

    let snap = FileEmojiStore::new(&path).get_all().expect("snapshot");
    assert_eq!(snap.len(), 160);
    assert_eq!(snap.get("w7_19"), Some(&png(19)));

    let leftovers: Vec<_> = fs::read_dir(dir.path())
        .expect("read dir")
        .map(|e| e.expect("dir entry").file_name().to_string_lossy().into_owned())
        .filter(|name| name != "emoji.json" && name != "emoji.json.lock")
        .collect();
    assert!(leftovers.is_empty(), "stray temp files: {leftovers:?}");
}

#[test]
fn stores_reject_their_own_delimiter() {
    let dir = tempfile::tempdir().expect("tempdir");
    let file = FileEmojiStore::new(dir.path().join("emoji.json")).with_delimiter(';');
    let err = file.put("a;b", png(1)).expect_err("delimiter in shortcode");
    assert!(matches!(err, StoreError::InvalidShortcode { .. }));
    file.put("a:b", png(1)).expect("colon is ordinary text under ';'");

    let memory = MemoryEmojiStore::new().with_delimiter(';');
    assert!(memory.put("x;y", png(2)).is_err());
    assert!(memory.put("x:y", png(2)).is_ok());
}

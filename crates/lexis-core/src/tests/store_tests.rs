use std::sync::Arc;

use lexis_types::{Audio, NewIcon};
use serde_json::json;

use super::support::temp_dir;
use crate::{EntryPayload, MemoryRepository, Repository, StoreError};

fn payload(id: &str) -> EntryPayload {
    EntryPayload {
        id: id.to_string(),
        data: json!({ "meta": { "id": id } }),
    }
}

#[tokio::test]
async fn test_word_is_unique() {
    let repo = MemoryRepository::new();

    repo.create_word("anvil").await.unwrap();
    let again = repo.create_word("anvil").await;

    assert!(matches!(again, Err(StoreError::Duplicate(w)) if w == "anvil"));
}

#[tokio::test]
async fn test_word_exists_needs_entries() {
    let repo = MemoryRepository::new();

    repo.create_word("anvil").await.unwrap();
    assert!(!repo.word_exists("anvil").await);

    repo.create_entries("anvil", vec![payload("anvil:1")]).await.unwrap();
    assert!(repo.word_exists("anvil").await);
}

#[tokio::test]
async fn test_create_entries_writes_word_with_them() {
    let repo = MemoryRepository::new();

    repo.create_entries("anvil", vec![payload("anvil:1")]).await.unwrap();
    assert_eq!(repo.word("anvil").await.unwrap().word, "anvil");

    let none = repo.create_entries("forge", Vec::new()).await.unwrap();
    assert!(none.is_empty());
    assert!(repo.word("forge").await.is_none());
}

#[tokio::test]
async fn test_entries_keep_insertion_order() {
    let repo = MemoryRepository::new();

    repo.create_word("anvil").await.unwrap();
    repo.create_entries("anvil", vec![payload("anvil:2"), payload("anvil:1")])
        .await
        .unwrap();
    repo.get_or_create_entry("anvil:3", "anvil", json!({}))
        .await
        .unwrap();

    let ids: Vec<_> = repo.entries("anvil").await.into_iter().map(|e| e.id).collect();
    assert_eq!(ids, ["anvil:2", "anvil:1", "anvil:3"]);
}

#[tokio::test]
async fn test_get_or_create_entry_is_idempotent() {
    let repo = MemoryRepository::new();

    let first = repo
        .get_or_create_entry("anvil:1", "anvil", json!({ "v": 1 }))
        .await
        .unwrap();
    let second = repo
        .get_or_create_entry("anvil:1", "anvil", json!({ "v": 2 }))
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(second.payload["v"], 1);
    assert_eq!(repo.entries("anvil").await.len(), 1);
}

#[tokio::test]
async fn test_delete_word_removes_entries() {
    let repo = MemoryRepository::new();

    repo.create_word("anvil").await.unwrap();
    repo.create_entries("anvil", vec![payload("anvil:1")]).await.unwrap();
    repo.delete_word("anvil").await.unwrap();

    assert!(repo.word("anvil").await.is_none());
    assert!(repo.entry("anvil:1").await.is_none());
    assert!(repo.entries("anvil").await.is_empty());
}

#[tokio::test]
async fn test_icon_ids_are_sequential() {
    let repo = MemoryRepository::new();
    let icon = |hash: &str| NewIcon {
        entry_id: "anvil:1".to_string(),
        path: "icons/x.png".into(),
        content_hash: hash.to_string(),
        approved: false,
        uploaded_by: "alice".to_string(),
    };

    let a = repo.insert_icon(icon("aa")).await.unwrap();
    let b = repo.insert_icon(icon("aa")).await.unwrap();

    assert_eq!((a.id, b.id), (1, 2));
    assert_eq!(repo.icons_by_hash("aa").await.len(), 2);
    assert_eq!(repo.pending_icons().await.len(), 2);
}

#[tokio::test]
async fn test_update_unknown_icon() {
    let repo = MemoryRepository::new();
    let stray = lexis_types::Icon {
        id: 7,
        entry_id: "anvil:1".to_string(),
        path: "icons/x.png".into(),
        content_hash: "aa".to_string(),
        approved: true,
        uploaded_by: "alice".to_string(),
    };

    assert!(matches!(
        repo.update_icon(stray).await,
        Err(StoreError::IconNotFound(7))
    ));
}

#[tokio::test]
async fn test_audio_first_writer_wins() {
    let repo = MemoryRepository::new();
    let clip = |hash: &str| Audio {
        key: "anvil01".to_string(),
        path: "audio/x.mp3".into(),
        content_hash: hash.to_string(),
    };

    repo.create_audio(clip("first")).await.unwrap();
    let second = repo.create_audio(clip("second")).await;

    assert!(matches!(second, Err(StoreError::Duplicate(_))));
    assert_eq!(repo.audio("anvil01").await.unwrap().content_hash, "first");
}

#[tokio::test]
async fn test_snapshot_survives_reopen() {
    let dir = temp_dir();
    let path = dir.join("lexis.json");

    {
        let repo = MemoryRepository::open(&path).await.unwrap();
        repo.create_word("anvil").await.unwrap();
        repo.create_entries("anvil", vec![payload("anvil:1"), payload("anvil:2")])
            .await
            .unwrap();
        repo.insert_icon(NewIcon {
            entry_id: "anvil:1".to_string(),
            path: "icons/x.png".into(),
            content_hash: "aa".to_string(),
            approved: true,
            uploaded_by: "root".to_string(),
        })
        .await
        .unwrap();
    }

    let repo = MemoryRepository::open(&path).await.unwrap();
    assert_eq!(repo.entries("anvil").await.len(), 2);
    assert_eq!(repo.icons_for_entry("anvil:1").await.len(), 1);

    let next = repo
        .insert_icon(NewIcon {
            entry_id: "anvil:2".to_string(),
            path: "icons/y.png".into(),
            content_hash: "bb".to_string(),
            approved: false,
            uploaded_by: "alice".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(next.id, 2);

    let _ = std::fs::remove_dir_all(dir);
}

#[tokio::test]
async fn test_corrupt_snapshot_is_an_error() {
    let dir = temp_dir();
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("lexis.json");
    std::fs::write(&path, "{ not json").unwrap();

    let result = MemoryRepository::open(&path).await;
    assert!(matches!(result, Err(StoreError::Serde(_))));

    let _ = std::fs::remove_dir_all(dir);
}

#[tokio::test]
async fn test_concurrent_mutations_all_reach_snapshot() {
    let dir = temp_dir();
    let path = dir.join("lexis.json");

    {
        let repo = Arc::new(MemoryRepository::open(&path).await.unwrap());

        let mut tasks = Vec::new();
        for n in 0..16 {
            let repo = repo.clone();
            tasks.push(tokio::spawn(async move {
                repo.insert_icon(NewIcon {
                    entry_id: format!("anvil:{n}"),
                    path: "icons/x.png".into(),
                    content_hash: "aa".to_string(),
                    approved: false,
                    uploaded_by: "alice".to_string(),
                })
                .await
                .unwrap();
            }));
        }

        for task in tasks {
            task.await.unwrap();
        }
    }

    let repo = MemoryRepository::open(&path).await.unwrap();
    assert_eq!(repo.icons_by_hash("aa").await.len(), 16);

    let _ = std::fs::remove_dir_all(dir);
}

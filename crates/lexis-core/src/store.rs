use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use lexis_types::{Audio, Entry, Icon, NewIcon, Word};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::{Mutex, RwLock};

use crate::error::StoreError;
use crate::response::EntryPayload;

/// Metadata storage for words, entries, icons and audio
#[async_trait]
pub trait Repository: Send + Sync {
    async fn word(&self, word: &str) -> Option<Word>;

    /// Fails with `Duplicate` when the word already exists
    async fn create_word(&self, word: &str) -> Result<Word, StoreError>;

    /// Remove a word and every entry it owns
    async fn delete_word(&self, word: &str) -> Result<(), StoreError>;

    /// Entries of `word` in insertion order
    async fn entries(&self, word: &str) -> Vec<Entry>;

    async fn entry(&self, id: &str) -> Option<Entry>;

    /// Idempotent by id: an existing entry is returned unchanged
    async fn get_or_create_entry(
        &self,
        id: &str,
        word: &str,
        payload: Value,
    ) -> Result<Entry, StoreError>;

    /// Create all entries of one dictionary response as a unit, along with
    /// the word record itself when it does not exist yet
    async fn create_entries(
        &self,
        word: &str,
        payloads: Vec<EntryPayload>,
    ) -> Result<Vec<Entry>, StoreError>;

    async fn insert_icon(&self, icon: NewIcon) -> Result<Icon, StoreError>;

    async fn icon(&self, id: u64) -> Option<Icon>;

    async fn update_icon(&self, icon: Icon) -> Result<Icon, StoreError>;

    async fn icons_for_entry(&self, entry_id: &str) -> Vec<Icon>;

    async fn icons_by_hash(&self, content_hash: &str) -> Vec<Icon>;

    async fn pending_icons(&self) -> Vec<Icon>;

    async fn audio(&self, key: &str) -> Option<Audio>;

    /// Fails with `Duplicate` when the key is already stored
    async fn create_audio(&self, audio: Audio) -> Result<Audio, StoreError>;

    /// A word counts as cached only once it has entries
    async fn word_exists(&self, word: &str) -> bool {
        !self.entries(word).await.is_empty()
    }
}

#[derive(Default, Serialize, Deserialize)]
struct Tables {
    words: HashMap<String, Word>,
    entries: HashMap<String, Entry>,
    /// Entry ids per word, insertion ordered
    word_entries: HashMap<String, Vec<String>>,
    icons: BTreeMap<u64, Icon>,
    next_icon_id: u64,
    audio: HashMap<String, Audio>,
    /// Bumped by every mutation of a snapshotted repository
    #[serde(skip)]
    version: u64,
}

impl Tables {
    fn insert_word(&mut self, word: &str) -> Word {
        let record = Word {
            word: word.to_string(),
            created_at: unix_now(),
        };
        self.words.insert(word.to_string(), record.clone());

        record
    }

    fn get_or_create_entry(&mut self, id: &str, word: &str, payload: Value) -> Entry {
        if let Some(existing) = self.entries.get(id) {
            return existing.clone();
        }

        let entry = Entry {
            id: id.to_string(),
            word: word.to_string(),
            payload,
        };

        self.entries.insert(entry.id.clone(), entry.clone());
        self.word_entries
            .entry(word.to_string())
            .or_default()
            .push(entry.id.clone());

        entry
    }
}

/// JSON file mirroring the tables
struct Snapshot {
    path: PathBuf,
    /// Version of the tables last written to `path`
    written: Mutex<u64>,
}

/// Tables serialized under the write lock, written to disk after it is released
struct Staged {
    version: u64,
    data: Vec<u8>,
}

/// In-process repository, optionally mirrored to a JSON snapshot file
#[derive(Default)]
pub struct MemoryRepository {
    tables: RwLock<Tables>,
    snapshot: Option<Snapshot>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the snapshot at `path` (if any) and persist every mutation back to it
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        let tables = match tokio::fs::read_to_string(&path).await {
            Ok(data) => {
                let tables: Tables = serde_json::from_str(&data)?;
                tracing::info!(
                    "Loaded {} words and {} icons from {}",
                    tables.words.len(),
                    tables.icons.len(),
                    path.display()
                );
                tables
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Tables::default(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            tables: RwLock::new(tables),
            snapshot: Some(Snapshot {
                path,
                written: Mutex::new(0),
            }),
        })
    }

    fn stage(&self, tables: &mut Tables) -> Result<Option<Staged>, StoreError> {
        if self.snapshot.is_none() {
            return Ok(None);
        }

        tables.version += 1;
        Ok(Some(Staged {
            version: tables.version,
            data: serde_json::to_vec_pretty(&*tables)?,
        }))
    }

    /// Write staged tables unless a newer version already reached the disk.
    /// Must be called without holding the table lock.
    async fn persist(&self, staged: Option<Staged>) -> Result<(), StoreError> {
        let (Some(snapshot), Some(staged)) = (&self.snapshot, staged) else {
            return Ok(());
        };

        let mut written = snapshot.written.lock().await;
        if *written >= staged.version {
            return Ok(());
        }

        write_snapshot(&snapshot.path, &staged.data).await?;
        *written = staged.version;

        Ok(())
    }
}

async fn write_snapshot(path: &Path, data: &[u8]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, data).await?;
    tokio::fs::rename(&tmp, path).await?;

    Ok(())
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn word(&self, word: &str) -> Option<Word> {
        self.tables.read().await.words.get(word).cloned()
    }

    async fn create_word(&self, word: &str) -> Result<Word, StoreError> {
        let (record, staged) = {
            let mut tables = self.tables.write().await;

            if tables.words.contains_key(word) {
                return Err(StoreError::Duplicate(word.to_string()));
            }

            let record = tables.insert_word(word);
            (record, self.stage(&mut tables)?)
        };
        self.persist(staged).await?;

        Ok(record)
    }

    async fn delete_word(&self, word: &str) -> Result<(), StoreError> {
        let staged = {
            let mut tables = self.tables.write().await;

            tables.words.remove(word);
            for id in tables.word_entries.remove(word).unwrap_or_default() {
                tables.entries.remove(&id);
            }
            self.stage(&mut tables)?
        };
        self.persist(staged).await
    }

    async fn entries(&self, word: &str) -> Vec<Entry> {
        let tables = self.tables.read().await;

        tables
            .word_entries
            .get(word)
            .into_iter()
            .flatten()
            .filter_map(|id| tables.entries.get(id))
            .cloned()
            .collect()
    }

    async fn entry(&self, id: &str) -> Option<Entry> {
        self.tables.read().await.entries.get(id).cloned()
    }

    async fn get_or_create_entry(
        &self,
        id: &str,
        word: &str,
        payload: Value,
    ) -> Result<Entry, StoreError> {
        let (entry, staged) = {
            let mut tables = self.tables.write().await;

            let entry = tables.get_or_create_entry(id, word, payload);
            (entry, self.stage(&mut tables)?)
        };
        self.persist(staged).await?;

        Ok(entry)
    }

    async fn create_entries(
        &self,
        word: &str,
        payloads: Vec<EntryPayload>,
    ) -> Result<Vec<Entry>, StoreError> {
        if payloads.is_empty() {
            return Ok(Vec::new());
        }

        let (entries, staged) = {
            let mut tables = self.tables.write().await;

            if !tables.words.contains_key(word) {
                tables.insert_word(word);
            }

            let entries: Vec<Entry> = payloads
                .into_iter()
                .map(|p| tables.get_or_create_entry(&p.id, word, p.data))
                .collect();
            (entries, self.stage(&mut tables)?)
        };
        self.persist(staged).await?;

        Ok(entries)
    }

    async fn insert_icon(&self, icon: NewIcon) -> Result<Icon, StoreError> {
        let (record, staged) = {
            let mut tables = self.tables.write().await;

            tables.next_icon_id += 1;
            let record = Icon {
                id: tables.next_icon_id,
                entry_id: icon.entry_id,
                path: icon.path,
                content_hash: icon.content_hash,
                approved: icon.approved,
                uploaded_by: icon.uploaded_by,
            };
            tables.icons.insert(record.id, record.clone());
            (record, self.stage(&mut tables)?)
        };
        self.persist(staged).await?;

        Ok(record)
    }

    async fn icon(&self, id: u64) -> Option<Icon> {
        self.tables.read().await.icons.get(&id).cloned()
    }

    async fn update_icon(&self, icon: Icon) -> Result<Icon, StoreError> {
        let staged = {
            let mut tables = self.tables.write().await;

            let Some(slot) = tables.icons.get_mut(&icon.id) else {
                return Err(StoreError::IconNotFound(icon.id));
            };
            *slot = icon.clone();
            self.stage(&mut tables)?
        };
        self.persist(staged).await?;

        Ok(icon)
    }

    async fn icons_for_entry(&self, entry_id: &str) -> Vec<Icon> {
        self.tables
            .read()
            .await
            .icons
            .values()
            .filter(|icon| icon.entry_id == entry_id)
            .cloned()
            .collect()
    }

    async fn icons_by_hash(&self, content_hash: &str) -> Vec<Icon> {
        self.tables
            .read()
            .await
            .icons
            .values()
            .filter(|icon| icon.content_hash == content_hash)
            .cloned()
            .collect()
    }

    async fn pending_icons(&self) -> Vec<Icon> {
        self.tables
            .read()
            .await
            .icons
            .values()
            .filter(|icon| !icon.approved)
            .cloned()
            .collect()
    }

    async fn audio(&self, key: &str) -> Option<Audio> {
        self.tables.read().await.audio.get(key).cloned()
    }

    async fn create_audio(&self, audio: Audio) -> Result<Audio, StoreError> {
        let staged = {
            let mut tables = self.tables.write().await;

            if tables.audio.contains_key(&audio.key) {
                return Err(StoreError::Duplicate(audio.key));
            }
            tables.audio.insert(audio.key.clone(), audio.clone());
            self.stage(&mut tables)?
        };
        self.persist(staged).await?;

        Ok(audio)
    }
}

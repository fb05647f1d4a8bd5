use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level cache key for a dictionary lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    /// Lookup string exactly as submitted (case-sensitive)
    pub word: String,
    /// Unix seconds
    pub created_at: u64,
}

/// One sense of a word, snapshotted from the dictionary API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Composite id, e.g. `hammer:1`
    pub id: String,
    pub word: String,
    pub payload: serde_json::Value,
}

impl Entry {
    /// Word part of a composite entry id (`hammer:1` -> `hammer`)
    pub fn id_prefix(id: &str) -> &str {
        id.split_once(':').map_or(id, |(prefix, _)| prefix)
    }

    /// First pronunciation key of the headword, if the payload carries one
    pub fn audio_key(&self) -> Option<&str> {
        self.payload
            .pointer("/hwi/prs/0/sound/audio")
            .and_then(|v| v.as_str())
            .filter(|key| !key.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Icon {
    pub id: u64,
    pub entry_id: String,
    pub path: PathBuf,
    pub content_hash: String,
    pub approved: bool,
    pub uploaded_by: String,
}

impl Icon {
    /// Record a new content hash and blob path.
    ///
    /// Returns `false` without touching the record when the hash is unchanged.
    pub fn rehash(&mut self, content_hash: String, path: PathBuf) -> bool {
        if self.content_hash == content_hash {
            return false;
        }

        self.content_hash = content_hash;
        self.path = path;
        true
    }

    pub fn view(&self) -> IconView {
        IconView {
            id: self.id,
            path: self.path.clone(),
            approved: self.approved,
        }
    }
}

/// Icon row before the store assigns it an id
#[derive(Debug, Clone)]
pub struct NewIcon {
    pub entry_id: String,
    pub path: PathBuf,
    pub content_hash: String,
    pub approved: bool,
    pub uploaded_by: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Audio {
    /// Pronunciation key used by the media API
    pub key: String,
    pub path: PathBuf,
    pub content_hash: String,
}

impl Audio {
    pub fn view(&self) -> AudioView {
        AudioView {
            key: self.key.clone(),
            path: self.path.clone(),
        }
    }
}

/// Authenticated caller as handed over by the credential service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requester {
    pub username: String,
    pub is_administrator: bool,
    pub is_verified: bool,
}

impl Requester {
    pub fn administrator(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            is_administrator: true,
            is_verified: true,
        }
    }

    pub fn user(username: impl Into<String>, is_verified: bool) -> Self {
        Self {
            username: username.into(),
            is_administrator: false,
            is_verified,
        }
    }

    /// May submit icons
    pub fn can_upload(&self) -> bool {
        self.is_administrator || self.is_verified
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordView {
    pub word: String,
    pub entries: Vec<EntryView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryView {
    pub id: String,
    pub icons: Vec<IconView>,
    pub mp3: Option<AudioView>,
    pub data: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IconView {
    pub id: u64,
    pub path: PathBuf,
    pub approved: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AudioView {
    pub key: String,
    pub path: PathBuf,
}

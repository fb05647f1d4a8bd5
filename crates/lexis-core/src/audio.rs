use std::sync::Arc;

use lexis_client::MediaSource;
use lexis_types::Audio;

use crate::blob::BlobStore;
use crate::error::{MediaError, StoreError};
use crate::flight::KeyedGate;
use crate::store::Repository;

const BUCKET: &str = "audio";

/// Remote directory a pronunciation key lives in
pub fn sub_path(key: &str) -> String {
    if key.starts_with("bix") {
        return "bix".to_string();
    }

    if key.starts_with("gg") {
        return "gg".to_string();
    }

    match key.chars().next() {
        Some(c) if c.is_ascii_digit() || c.is_ascii_punctuation() => "number".to_string(),
        Some(c) => c.to_string(),
        None => String::new(),
    }
}

/// Pronunciation clips, fetched once per key and kept forever
pub struct AudioStore {
    repo: Arc<dyn Repository>,
    blobs: Arc<BlobStore>,
    source: Arc<dyn MediaSource>,
    gate: KeyedGate,
}

impl AudioStore {
    pub fn new(
        repo: Arc<dyn Repository>,
        blobs: Arc<BlobStore>,
        source: Arc<dyn MediaSource>,
    ) -> Self {
        Self {
            repo,
            blobs,
            source,
            gate: KeyedGate::new(),
        }
    }

    pub async fn get(&self, key: &str) -> Result<Audio, MediaError> {
        if key.is_empty() {
            return Err(MediaError::InvalidInput("empty audio key".to_string()));
        }

        if let Some(audio) = self.repo.audio(key).await {
            return Ok(audio);
        }

        let _flight = self.gate.enter(key).await;

        if let Some(audio) = self.repo.audio(key).await {
            return Ok(audio);
        }

        let sub_path = sub_path(key);
        let bytes = self.source.fetch(&sub_path, key).await.map_err(|e| {
            match e.status() {
                Some(403 | 404) => MediaError::NotFound(key.to_string()),
                _ => {
                    tracing::warn!("Audio fetch for {sub_path}/{key} failed: {e}");
                    MediaError::UpstreamUnavailable(e)
                }
            }
        })?;

        let blob = self.blobs.put(BUCKET, "mp3", &bytes).await?;
        let audio = Audio {
            key: key.to_string(),
            path: blob.path,
            content_hash: blob.content_hash,
        };

        match self.repo.create_audio(audio).await {
            Ok(audio) => {
                tracing::info!("Cached audio {key} ({} bytes)", bytes.len());
                Ok(audio)
            }
            Err(StoreError::Duplicate(_)) => self
                .repo
                .audio(key)
                .await
                .ok_or_else(|| MediaError::NotFound(key.to_string())),
            Err(e) => Err(e.into()),
        }
    }
}

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use lexis_client::{CallCounter, HttpDictionaryClient, HttpMediaClient};
use lexis_config::Config;
use lexis_core::{AudioStore, BlobStore, IconStore, MemoryRepository, Repository, WordLookupService};

pub struct AppState {
    pub icons: Arc<IconStore>,
    pub audio: Arc<AudioStore>,
    pub lookup: WordLookupService,
    pub dictionary_calls: CallCounter,
    pub media_calls: CallCounter,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let timeout = Duration::from_secs(config.timeout_seconds);

        if config.dictionary.api_key.is_empty() {
            tracing::warn!("DICTIONARY_API_KEY is not set, lookups will likely be rejected");
        }

        let snapshot = config.snapshot_path();
        let repo: Arc<dyn Repository> = Arc::new(
            MemoryRepository::open(&snapshot)
                .await
                .with_context(|| format!("Failed to open {}", snapshot.display()))?,
        );
        let blobs = Arc::new(BlobStore::new(config.blob_dir()));

        let dictionary_calls = CallCounter::new(config.count_calls);
        let media_calls = CallCounter::new(config.count_calls);

        let dictionary =
            HttpDictionaryClient::new(&config.dictionary, timeout, dictionary_calls.clone())
                .context("Failed to build dictionary client")?;
        let media = HttpMediaClient::new(&config.media, timeout, media_calls.clone())
            .context("Failed to build media client")?;

        let icons = Arc::new(IconStore::new(repo.clone(), blobs.clone(), config.icon));
        let audio = Arc::new(AudioStore::new(repo.clone(), blobs, Arc::new(media)));
        let lookup = WordLookupService::new(repo, Arc::new(dictionary), icons.clone(), audio.clone());

        Ok(Self {
            icons,
            audio,
            lookup,
            dictionary_calls,
            media_calls,
        })
    }

    /// Log remote call counts when counting is enabled
    pub fn report_calls(&self) {
        if let (Ok(dictionary), Ok(media)) = (self.dictionary_calls.calls(), self.media_calls.calls()) {
            tracing::info!("Remote calls: dictionary={dictionary} media={media}");
        }
    }
}

use std::sync::Arc;

use lexis_client::DictionarySource;
use lexis_types::{Entry, EntryView, Requester, WordView};

use crate::audio::AudioStore;
use crate::error::{LookupError, MediaError};
use crate::flight::KeyedGate;
use crate::icon::IconStore;
use crate::response::DictionaryResponse;
use crate::store::Repository;

#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    Found(WordView),
    NotFound { suggestions: Vec<String> },
}

/// Result of one trip to the dictionary API
enum Population {
    Stored(Vec<Entry>),
    Missing(Vec<String>),
}

/// Word cache in front of the dictionary API
pub struct WordLookupService {
    repo: Arc<dyn Repository>,
    source: Arc<dyn DictionarySource>,
    icons: Arc<IconStore>,
    audio: Arc<AudioStore>,
    gate: KeyedGate,
}

impl WordLookupService {
    pub fn new(
        repo: Arc<dyn Repository>,
        source: Arc<dyn DictionarySource>,
        icons: Arc<IconStore>,
        audio: Arc<AudioStore>,
    ) -> Self {
        Self {
            repo,
            source,
            icons,
            audio,
            gate: KeyedGate::new(),
        }
    }

    /// Look up `word` with the public view of icons
    pub async fn lookup(&self, word: &str) -> Result<LookupOutcome, LookupError> {
        self.lookup_with(word, false).await
    }

    /// Look up `word`; administrators also see unapproved icons
    pub async fn lookup_as(
        &self,
        word: &str,
        requester: &Requester,
    ) -> Result<LookupOutcome, LookupError> {
        self.lookup_with(word, requester.is_administrator).await
    }

    async fn lookup_with(&self, word: &str, privileged: bool) -> Result<LookupOutcome, LookupError> {
        if word.trim().is_empty() {
            return Err(LookupError::InvalidInput("word must not be empty".to_string()));
        }

        let entries = self.repo.entries(word).await;
        if !entries.is_empty() {
            tracing::debug!("Cache hit for {word:?}");
            return Ok(LookupOutcome::Found(self.assemble(word, entries, privileged).await?));
        }

        let _flight = self.gate.enter(word).await;

        // Another flight may have populated the word while we waited
        let entries = self.repo.entries(word).await;
        if !entries.is_empty() {
            tracing::debug!("Cache filled by concurrent lookup for {word:?}");
            return Ok(LookupOutcome::Found(self.assemble(word, entries, privileged).await?));
        }

        if self.repo.word(word).await.is_some() {
            tracing::error!("Word {word:?} exists without entries outside of a lookup");
            return Err(LookupError::Inconsistent(word.to_string()));
        }

        match self.populate(word).await? {
            Population::Stored(entries) => {
                Ok(LookupOutcome::Found(self.assemble(word, entries, privileged).await?))
            }
            Population::Missing(suggestions) => Ok(LookupOutcome::NotFound { suggestions }),
        }
    }

    /// Fill a missing word from the API.
    ///
    /// The word stays provisional until its entries are confirmed and is only
    /// written together with them, so a failed or cancelled lookup leaves
    /// nothing behind.
    async fn populate(&self, word: &str) -> Result<Population, LookupError> {
        let result = self.fetch_entries(word).await;

        if !matches!(result, Ok(Population::Stored(_))) {
            tracing::debug!("Discarded provisional word {word:?}");
        }

        result
    }

    async fn fetch_entries(&self, word: &str) -> Result<Population, LookupError> {
        let raw = self.source.fetch(word).await.map_err(|e| {
            tracing::warn!("Dictionary lookup for {word:?} failed: {e}");
            LookupError::UpstreamUnavailable(e)
        })?;

        match DictionaryResponse::decode(&raw)? {
            DictionaryResponse::Entries(payloads) => {
                let total = payloads.len();
                let matching: Vec<_> = payloads
                    .into_iter()
                    .filter(|p| Entry::id_prefix(&p.id) == word)
                    .collect();

                if matching.is_empty() {
                    tracing::info!("No entries of {total} match {word:?} exactly");
                    return Ok(Population::Missing(Vec::new()));
                }

                let entries = self.repo.create_entries(word, matching).await?;
                tracing::info!("Cached {} of {total} entries for {word:?}", entries.len());

                Ok(Population::Stored(entries))
            }
            DictionaryResponse::Suggestions(suggestions) => {
                tracing::info!("{word:?} not found, {} suggestions", suggestions.len());
                Ok(Population::Missing(suggestions))
            }
            DictionaryResponse::Empty => Ok(Population::Missing(Vec::new())),
        }
    }

    async fn assemble(
        &self,
        word: &str,
        entries: Vec<Entry>,
        privileged: bool,
    ) -> Result<WordView, LookupError> {
        let mut views = Vec::with_capacity(entries.len());

        for entry in entries {
            let icons = self.icons.icons_for(&entry.id, privileged).await;

            let mp3 = match entry.audio_key() {
                Some(key) => match self.audio.get(key).await {
                    Ok(audio) => Some(audio.view()),
                    Err(MediaError::NotFound(_)) => None,
                    Err(e) => return Err(e.into()),
                },
                None => None,
            };

            views.push(EntryView {
                id: entry.id,
                icons,
                mp3,
                data: entry.payload,
            });
        }

        Ok(WordView {
            word: word.to_string(),
            entries: views,
        })
    }
}

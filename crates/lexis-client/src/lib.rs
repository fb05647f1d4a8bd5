mod counter;
mod dictionary;
mod media;


pub use counter::{CallCounter, CounterDisabled};
pub use dictionary::HttpDictionaryClient;
pub use media::HttpMediaClient;

/// Third-party dictionary endpoint keyed by word
#[async_trait::async_trait]
pub trait DictionarySource: Send + Sync {
    /// Raw JSON body for `word`, one attempt, no retry
    async fn fetch(&self, word: &str) -> Result<String, ClientError>;

    /// Calls made through this source
    fn counter(&self) -> &CallCounter;
}

/// Pronunciation audio endpoint keyed by `{sub_path}/{key}`
#[async_trait::async_trait]
pub trait MediaSource: Send + Sync {
    async fn fetch(&self, sub_path: &str, key: &str) -> Result<Vec<u8>, ClientError>;

    fn counter(&self) -> &CallCounter;
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Remote returned HTTP {0}")]
    Status(u16),

    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("Invalid endpoint URL: {0}")]
    Url(String),
}

impl ClientError {
    /// HTTP status reported by the remote, if it answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status(code) => Some(*code),
            ClientError::RateLimited => Some(429),
            ClientError::Transport(e) => e.status().map(|s| s.as_u16()),
            ClientError::Url(_) => None,
        }
    }
}

/// Build `{base}/{segments...}?key={api_key}` with each segment percent-encoded
pub(crate) fn endpoint(
    base: &str,
    segments: &[&str],
    api_key: &str,
) -> Result<reqwest::Url, ClientError> {
    let mut url = reqwest::Url::parse(base).map_err(|e| ClientError::Url(e.to_string()))?;

    url.path_segments_mut()
        .map_err(|_| ClientError::Url(format!("{base} cannot be a base")))?
        .pop_if_empty()
        .extend(segments);

    if !api_key.is_empty() {
        url.query_pairs_mut().append_pair("key", api_key);
    }

    Ok(url)
}

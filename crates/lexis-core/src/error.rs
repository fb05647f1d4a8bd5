use lexis_client::ClientError;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Duplicate key: {0}")]
    Duplicate(String),

    #[error("Icon {0} does not exist")]
    IconNotFound(u64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot error: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Dictionary service unavailable: {0}")]
    UpstreamUnavailable(#[source] ClientError),

    #[error("Malformed dictionary response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Word {0:?} is stored without entries")]
    Inconsistent(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Media(#[from] MediaError),
}

impl LookupError {
    pub fn status(&self) -> u16 {
        match self {
            LookupError::InvalidInput(_) => 400,
            LookupError::UpstreamUnavailable(_) => 503,
            LookupError::Decode(_) | LookupError::Inconsistent(_) | LookupError::Store(_) => 500,
            LookupError::Media(e) => e.status(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("No audio available for {0:?}")]
    NotFound(String),

    #[error("Media service unavailable: {0}")]
    UpstreamUnavailable(#[source] ClientError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Entry {0:?} does not exist")]
    EntryNotFound(String),

    #[error("Icon {0} does not exist")]
    IconNotFound(u64),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MediaError {
    pub fn status(&self) -> u16 {
        match self {
            MediaError::InvalidInput(_) => 400,
            MediaError::PermissionDenied(_) => 403,
            MediaError::NotFound(_) | MediaError::EntryNotFound(_) | MediaError::IconNotFound(_) => {
                404
            }
            MediaError::UpstreamUnavailable(_) => 503,
            MediaError::Store(_) | MediaError::Io(_) => 500,
        }
    }
}

use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use self::dictionary::DictionaryConfig;
use self::icon::IconConfig;
use self::media::MediaConfig;

pub mod dictionary;
pub mod icon;
pub mod media;

#[derive(Serialize, Deserialize, Clone)]
pub struct Config {
    pub dictionary: DictionaryConfig,
    pub media: MediaConfig,
    pub icon: IconConfig,

    /// Root for the metadata snapshot and the blob directories
    pub data_dir: PathBuf,
    /// Request timeout for both remote endpoints
    pub timeout_seconds: u64,
    /// Expose call counters on the remote clients
    pub count_calls: bool,
}

impl Config {
    pub fn new() -> Self {
        let data_dir = env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data"));

        let timeout_seconds = env::var("HTTP_TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10); // 10 seconds default

        let count_calls = env::var("COUNT_CALLS")
            .ok()
            .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Config {
            dictionary: DictionaryConfig::new(),
            media: MediaConfig::new(),
            icon: IconConfig::new(),

            data_dir,
            timeout_seconds,
            count_calls,
        }
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.data_dir.join("lexis.json")
    }

    pub fn blob_dir(&self) -> PathBuf {
        self.data_dir.join("blobs")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dictionary: DictionaryConfig::default(),
            media: MediaConfig::default(),
            icon: IconConfig::default(),

            data_dir: PathBuf::from("data"),
            timeout_seconds: 10,
            count_calls: false,
        }
    }
}

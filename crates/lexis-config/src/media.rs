use std::env;

use serde::{Deserialize, Serialize};

fn default_api_url() -> String {
    "https://media.merriam-webster.com/audio/prons/en/us/mp3".to_string()
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct MediaConfig {
    /// Audio lives at `{api_url}/{sub_path}/{key}.mp3`
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub api_key: String,
}

impl MediaConfig {
    pub fn new() -> Self {
        let api_url = env::var("MEDIA_URL").unwrap_or_else(|_| default_api_url());
        let api_key = env::var("MEDIA_API_KEY").unwrap_or_default();

        Self { api_url, api_key }
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_key: String::new(),
        }
    }
}

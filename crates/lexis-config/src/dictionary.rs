use std::env;

use serde::{Deserialize, Serialize};

fn default_api_url() -> String {
    "https://www.dictionaryapi.com/api/v3/references/collegiate/json".to_string()
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct DictionaryConfig {
    /// Word is appended as the last path segment
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub api_key: String,
}

impl DictionaryConfig {
    pub fn new() -> Self {
        let api_url = env::var("DICTIONARY_URL").unwrap_or_else(|_| default_api_url());
        let api_key = env::var("DICTIONARY_API_KEY").unwrap_or_default();

        Self { api_url, api_key }
    }
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_key: String::new(),
        }
    }
}

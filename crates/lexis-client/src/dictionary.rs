use std::time::Duration;

use async_trait::async_trait;
use lexis_config::dictionary::DictionaryConfig;

use crate::{CallCounter, ClientError, DictionarySource, endpoint};

#[derive(Clone)]
pub struct HttpDictionaryClient {
    client: reqwest::Client,
    api_key: String,
    api_url: String,
    counter: CallCounter,
}

impl HttpDictionaryClient {
    pub fn new(
        config: &DictionaryConfig,
        timeout: Duration,
        counter: CallCounter,
    ) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            api_url: config.api_url.clone(),
            counter,
        })
    }
}

#[async_trait]
impl DictionarySource for HttpDictionaryClient {
    async fn fetch(&self, word: &str) -> Result<String, ClientError> {
        let url = endpoint(&self.api_url, &[word], &self.api_key)?;

        self.counter.record();
        tracing::debug!("Fetching dictionary entry for {word:?}");

        let response = self.client.get(url).send().await?;

        if response.status() == 429 {
            return Err(ClientError::RateLimited);
        }

        if !response.status().is_success() {
            return Err(ClientError::Status(response.status().as_u16()));
        }

        Ok(response.text().await?)
    }

    fn counter(&self) -> &CallCounter {
        &self.counter
    }
}

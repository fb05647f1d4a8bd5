use std::time::Duration;

use async_trait::async_trait;
use lexis_config::media::MediaConfig;

use crate::{CallCounter, ClientError, MediaSource, endpoint};

#[derive(Clone)]
pub struct HttpMediaClient {
    client: reqwest::Client,
    api_key: String,
    api_url: String,
    counter: CallCounter,
}

impl HttpMediaClient {
    pub fn new(
        config: &MediaConfig,
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
impl MediaSource for HttpMediaClient {
    async fn fetch(&self, sub_path: &str, key: &str) -> Result<Vec<u8>, ClientError> {
        let file = format!("{key}.mp3");
        let url = endpoint(&self.api_url, &[sub_path, &file], &self.api_key)?;

        self.counter.record();
        tracing::debug!("Fetching audio {sub_path}/{file}");

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(ClientError::Status(response.status().as_u16()));
        }

        Ok(response.bytes().await?.to_vec())
    }

    fn counter(&self) -> &CallCounter {
        &self.counter
    }
}

use std::collections::HashMap;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use lexis_client::{CallCounter, ClientError, DictionarySource, MediaSource};
use lexis_config::icon::IconConfig;

use crate::{AudioStore, BlobStore, IconStore, MemoryRepository, Repository, WordLookupService};

pub const HAMMER: &str = r#"[
  {"meta": {"id": "hammer:1", "stems": ["hammer", "hammers"]},
   "hwi": {"hw": "ham*mer", "prs": [{"mw": "ˈha-mər", "sound": {"audio": "hammer01"}}]},
   "fl": "noun",
   "shortdef": ["a hand tool consisting of a solid head set crosswise on a handle"]},
  {"meta": {"id": "hammer:2", "stems": ["hammered", "hammering"]},
   "hwi": {"hw": "hammer"},
   "fl": "verb",
   "shortdef": ["to strike blows especially repeatedly with or as if with a hammer"]},
  {"meta": {"id": "hammer out"},
   "hwi": {"hw": "hammer out"},
   "fl": "phrasal verb",
   "shortdef": ["to produce or bring about by persistent effort"]},
  {"meta": {"id": "sledgehammer:1"},
   "hwi": {"hw": "sledge*ham*mer"},
   "fl": "noun",
   "shortdef": ["a large heavy hammer"]}
]"#;

pub const QWERT: &str = r#"["qwerty", "qwert's"]"#;

pub fn temp_dir() -> PathBuf {
    std::env::temp_dir().join(format!("lexis-test-{}", uuid::Uuid::new_v4()))
}

pub fn count_files(dir: &Path) -> usize {
    std::fs::read_dir(dir)
        .map(|entries| entries.filter_map(Result::ok).count())
        .unwrap_or(0)
}

pub fn png(width: u32, height: u32, shade: u8) -> Vec<u8> {
    let image = image::RgbImage::from_pixel(width, height, image::Rgb([shade, shade, shade]));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgb8(image)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .expect("encode png");
    bytes
}

/// Canned dictionary: unknown words answer with an empty list
pub struct FakeDictionary {
    responses: HashMap<String, Result<String, u16>>,
    delay: Duration,
    counter: CallCounter,
}

impl FakeDictionary {
    pub fn new() -> Self {
        Self {
            responses: HashMap::new(),
            delay: Duration::ZERO,
            counter: CallCounter::enabled(),
        }
    }

    pub fn with(mut self, word: &str, body: &str) -> Self {
        self.responses.insert(word.to_string(), Ok(body.to_string()));
        self
    }

    pub fn failing(mut self, word: &str, status: u16) -> Self {
        self.responses.insert(word.to_string(), Err(status));
        self
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl DictionarySource for FakeDictionary {
    async fn fetch(&self, word: &str) -> Result<String, ClientError> {
        self.counter.record();
        tokio::time::sleep(self.delay).await;

        match self.responses.get(word) {
            Some(Ok(body)) => Ok(body.clone()),
            Some(Err(status)) => Err(ClientError::Status(*status)),
            None => Ok("[]".to_string()),
        }
    }

    fn counter(&self) -> &CallCounter {
        &self.counter
    }
}

/// Canned media endpoint: unknown keys answer 404
pub struct FakeMedia {
    clips: HashMap<String, Result<Vec<u8>, u16>>,
    requests: Mutex<Vec<String>>,
    delay: Duration,
    counter: CallCounter,
}

impl FakeMedia {
    pub fn new() -> Self {
        Self {
            clips: HashMap::new(),
            requests: Mutex::new(Vec::new()),
            delay: Duration::ZERO,
            counter: CallCounter::enabled(),
        }
    }

    pub fn with(mut self, key: &str, bytes: &[u8]) -> Self {
        self.clips.insert(key.to_string(), Ok(bytes.to_vec()));
        self
    }

    pub fn failing(mut self, key: &str, status: u16) -> Self {
        self.clips.insert(key.to_string(), Err(status));
        self
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// `{sub_path}/{key}` of every request made so far
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaSource for FakeMedia {
    async fn fetch(&self, sub_path: &str, key: &str) -> Result<Vec<u8>, ClientError> {
        self.counter.record();
        self.requests.lock().unwrap().push(format!("{sub_path}/{key}"));
        tokio::time::sleep(self.delay).await;

        match self.clips.get(key) {
            Some(Ok(bytes)) => Ok(bytes.clone()),
            Some(Err(status)) => Err(ClientError::Status(*status)),
            None => Err(ClientError::Status(404)),
        }
    }

    fn counter(&self) -> &CallCounter {
        &self.counter
    }
}

pub struct Harness {
    pub repo: Arc<MemoryRepository>,
    pub blobs: Arc<BlobStore>,
    pub dictionary: Arc<FakeDictionary>,
    pub media: Arc<FakeMedia>,
    pub icons: Arc<IconStore>,
    pub audio: Arc<AudioStore>,
    pub service: WordLookupService,
}

impl Harness {
    pub fn new(dictionary: FakeDictionary, media: FakeMedia) -> Self {
        let repo = Arc::new(MemoryRepository::new());
        let blobs = Arc::new(BlobStore::new(temp_dir()));
        let dictionary = Arc::new(dictionary);
        let media = Arc::new(media);

        let shared: Arc<dyn Repository> = repo.clone();
        let icons = Arc::new(IconStore::new(
            shared.clone(),
            blobs.clone(),
            IconConfig::default(),
        ));
        let audio = Arc::new(AudioStore::new(shared.clone(), blobs.clone(), media.clone()));
        let service = WordLookupService::new(shared, dictionary.clone(), icons.clone(), audio.clone());

        Self {
            repo,
            blobs,
            dictionary,
            media,
            icons,
            audio,
            service,
        }
    }

    pub fn hammer() -> Self {
        Self::new(
            FakeDictionary::new().with("hammer", HAMMER).with("qwert", QWERT),
            FakeMedia::new().with("hammer01", b"ID3 hammer"),
        )
    }

    pub fn dictionary_calls(&self) -> usize {
        self.dictionary.counter().calls().unwrap()
    }

    pub fn media_calls(&self) -> usize {
        self.media.counter().calls().unwrap()
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(self.blobs.root());
    }
}

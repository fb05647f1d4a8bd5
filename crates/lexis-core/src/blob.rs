use std::io;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

/// Hex sha256 of `bytes`
pub fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let result = hasher.finalize();
    hex::encode(result)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    pub path: PathBuf,
    pub content_hash: String,
}

/// Content-addressed file storage: `{root}/{bucket}/{hash}.{ext}`
#[derive(Debug, Clone)]
pub struct BlobStore {
    root: PathBuf,
}

impl BlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Store `bytes` under their content hash.
    ///
    /// Content is written to a temporary upload name and then renamed to the
    /// hash, so identical uploads converge on one file.
    pub async fn put(&self, bucket: &str, ext: &str, bytes: &[u8]) -> io::Result<StoredBlob> {
        let content_hash = content_hash(bytes);
        let dir = self.root.join(bucket);
        let path = dir.join(format!("{content_hash}.{ext}"));

        if tokio::fs::try_exists(&path).await? {
            tracing::debug!("Blob {} already stored", path.display());
            return Ok(StoredBlob { path, content_hash });
        }

        tokio::fs::create_dir_all(&dir).await?;

        let upload = dir.join(format!(".{}.upload", uuid::Uuid::new_v4()));
        tokio::fs::write(&upload, bytes).await?;
        tokio::fs::rename(&upload, &path).await?;

        tracing::debug!("Stored blob {}", path.display());
        Ok(StoredBlob { path, content_hash })
    }

    pub async fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        tokio::fs::read(path).await
    }
}

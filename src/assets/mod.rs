//! Asset ingestion - stores uploaded images under the public asset root

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use uuid::Uuid;

use crate::error::{ContentError, Result};

/// Default upload cap: 5 MiB
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

const MAX_EXTENSION_LEN: usize = 10;
const NAME_ATTEMPTS: usize = 3;

/// A stored asset and the reference to embed in article bodies
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetRef {
    /// Storage name inside the asset root
    pub name: String,
    /// Public path, usable as `![alt](url)`
    pub url: String,
}

/// Writes uploads into a public directory
#[derive(Debug, Clone)]
pub struct AssetStore {
    root: PathBuf,
    url_prefix: String,
    max_bytes: usize,
}

impl AssetStore {
    pub fn new<P: AsRef<Path>>(root: P, url_prefix: &str) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            url_prefix: url_prefix.trim_end_matches('/').to_string(),
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn url_prefix(&self) -> &str {
        &self.url_prefix
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Store `bytes` under a fresh name derived from `filename`'s extension
    pub fn ingest(&self, filename: &str, bytes: &[u8]) -> Result<AssetRef> {
        if bytes.len() > self.max_bytes {
            return Err(ContentError::PayloadTooLarge {
                size: bytes.len(),
                limit: self.max_bytes,
            });
        }
        if bytes.is_empty() {
            return Err(ContentError::validation("image", "uploaded file is empty"));
        }

        fs::create_dir_all(&self.root)
            .map_err(|e| ContentError::io("create directory", &self.root, e))?;

        let extension = extension_of(filename);
        for _ in 0..NAME_ATTEMPTS {
            let name = match &extension {
                Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
                None => Uuid::new_v4().to_string(),
            };
            let path = self.root.join(&name);
            let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => file,
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(ContentError::io("create", &path, e)),
            };
            if let Err(e) = file.write_all(bytes) {
                drop(file);
                let _ = fs::remove_file(&path);
                return Err(ContentError::io("write", &path, e));
            }

            tracing::info!("Stored upload {:?} as {:?} ({} bytes)", filename, path, bytes.len());
            return Ok(AssetRef {
                url: format!("{}/{}", self.url_prefix, name),
                name,
            });
        }

        Err(ContentError::io(
            "create",
            &self.root,
            io::Error::new(io::ErrorKind::AlreadyExists, "could not find a free asset name"),
        ))
    }
}

/// Lowercased extension of the original filename, if it is a plain one
fn extension_of(filename: &str) -> Option<String> {
    let ext = Path::new(filename).extension()?.to_str()?;
    if ext.is_empty()
        || ext.len() > MAX_EXTENSION_LEN
        || !ext.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ingest_writes_file_and_returns_url() {
        let dir = TempDir::new().unwrap();
        let store = AssetStore::new(dir.path().join("uploads"), "/uploads/");
        let asset = store.ingest("Cat Photo.PNG", b"\x89PNG data").unwrap();

        assert!(asset.name.ends_with(".png"));
        assert_eq!(asset.url, format!("/uploads/{}", asset.name));
        let stored = fs::read(dir.path().join("uploads").join(&asset.name)).unwrap();
        assert_eq!(stored, b"\x89PNG data");
    }

    #[test]
    fn test_same_filename_gets_distinct_names() {
        let dir = TempDir::new().unwrap();
        let store = AssetStore::new(dir.path(), "/uploads");
        let a = store.ingest("image.jpg", b"one").unwrap();
        let b = store.ingest("image.jpg", b"two").unwrap();
        assert_ne!(a.name, b.name);
        assert_eq!(fs::read(dir.path().join(&a.name)).unwrap(), b"one");
        assert_eq!(fs::read(dir.path().join(&b.name)).unwrap(), b"two");
    }

    #[test]
    fn test_cap_boundary() {
        let dir = TempDir::new().unwrap();
        let store = AssetStore::new(dir.path(), "/uploads");
        let cap = store.max_bytes();
        assert_eq!(cap, 5 * 1024 * 1024);

        assert!(store.ingest("exact.bin", &vec![0u8; cap]).is_ok());

        let err = store.ingest("over.bin", &vec![0u8; cap + 1]).unwrap_err();
        assert!(matches!(
            err,
            ContentError::PayloadTooLarge { size, limit } if size == cap + 1 && limit == cap
        ));
    }

    #[test]
    fn test_oversized_upload_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let store = AssetStore::new(dir.path().join("uploads"), "/uploads").with_max_bytes(4);
        assert!(store.ingest("big.png", b"12345").is_err());
        assert!(!dir.path().join("uploads").exists());
    }

    #[test]
    fn test_empty_upload_rejected() {
        let dir = TempDir::new().unwrap();
        let store = AssetStore::new(dir.path(), "/uploads");
        assert!(matches!(
            store.ingest("empty.png", b""),
            Err(ContentError::Validation(_))
        ));
    }

    #[test]
    fn test_extension_sanitizing() {
        assert_eq!(extension_of("photo.JPEG").as_deref(), Some("jpeg"));
        assert_eq!(extension_of("archive.tar.gz").as_deref(), Some("gz"));
        assert_eq!(extension_of("noext"), None);
        assert_eq!(extension_of("weird.p$g"), None);
        assert_eq!(extension_of("long.abcdefghijk"), None);
        assert_eq!(extension_of("../../etc/passwd"), None);
    }
}

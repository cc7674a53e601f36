//! Slug-indexed article storage
//!
//! [`FsStore`] keeps one file per article in a flat content directory and
//! reads the directory on every call; there is no cache. [`MemoryStore`]
//! honours the same contract over an in-process map.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use walkdir::WalkDir;

use super::article::{is_valid_slug, Article, Slug, Summary};
use crate::error::{ContentError, Result};

/// How [`DocumentStore::put`] treats an existing article
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Fail with `AlreadyExists` if the slug is taken
    CreateOnly,
    /// Fail with `NotFound` if the slug is absent
    UpdateOnly,
}

/// Backing storage for articles
pub trait DocumentStore: Send + Sync {
    /// Every readable article; unreadable entries are skipped
    fn list(&self) -> Result<Vec<Summary>>;

    fn get(&self, slug: &Slug) -> Result<Article>;

    fn put(&self, article: &Article, mode: WriteMode) -> Result<()>;

    fn delete(&self, slug: &Slug) -> Result<()>;
}

/// Extensions read from the content directory, in order of preference
const READ_EXTENSIONS: [&str; 2] = ["mdx", "md"];

/// Filesystem store rooted at a content directory
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
    extension: String,
}

impl FsStore {
    /// New articles are written as `<slug>.mdx`
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self::with_extension(root, "mdx")
    }

    pub fn with_extension<P: AsRef<Path>>(root: P, extension: &str) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path a new article with this slug is written to
    fn create_path(&self, slug: &Slug) -> PathBuf {
        self.root.join(format!("{}.{}", slug, self.extension))
    }

    /// The file currently holding `slug`, if any
    fn existing_path(&self, slug: &Slug) -> Option<PathBuf> {
        let preferred = self.create_path(slug);
        if preferred.is_file() {
            return Some(preferred);
        }
        READ_EXTENSIONS
            .iter()
            .map(|ext| self.root.join(format!("{}.{}", slug, ext)))
            .find(|path| path.is_file())
    }

    fn read_article(&self, slug: Slug, path: &Path) -> Result<Article> {
        let raw = fs::read_to_string(path).map_err(|e| ContentError::io("read", path, e))?;
        Article::from_text(slug, &raw)
    }

    fn extension_rank(&self, ext: &str) -> usize {
        if ext == self.extension {
            0
        } else {
            1 + READ_EXTENSIONS
                .iter()
                .position(|e| *e == ext)
                .unwrap_or(READ_EXTENSIONS.len())
        }
    }

    fn is_article_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e == self.extension || READ_EXTENSIONS.contains(&e))
            .unwrap_or(false)
    }
}

impl DocumentStore for FsStore {
    fn list(&self) -> Result<Vec<Summary>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        // One file per slug; the preferred extension wins over legacy ones
        let mut files: BTreeMap<String, (usize, PathBuf)> = BTreeMap::new();
        for entry in WalkDir::new(&self.root).min_depth(1).max_depth(1) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry in {:?}: {}", self.root, e);
                    continue;
                }
            };
            let path = entry.path();
            if !entry.file_type().is_file() || !self.is_article_file(path) {
                continue;
            }

            let (Some(stem), Some(ext)) = (
                path.file_stem().and_then(|s| s.to_str()),
                path.extension().and_then(|e| e.to_str()),
            ) else {
                continue;
            };
            if !is_valid_slug(stem) {
                tracing::warn!("Skipping {:?}: file name is not a valid slug", path);
                continue;
            }

            let rank = self.extension_rank(ext);
            if let Some((existing, kept)) = files.get(stem) {
                if *existing <= rank {
                    tracing::warn!("Ignoring {:?}: slug already provided by {:?}", path, kept);
                    continue;
                }
            }
            if let Some((_, replaced)) = files.insert(stem.to_string(), (rank, path.to_path_buf())) {
                tracing::warn!("Ignoring {:?}: slug already provided by {:?}", replaced, path);
            }
        }

        let mut summaries = Vec::with_capacity(files.len());
        for (stem, (_, path)) in files {
            let slug = Slug::parse(&stem)?;
            match self.read_article(slug, &path) {
                Ok(article) => summaries.push(article.summary()),
                Err(e) => tracing::warn!("Failed to load article {:?}: {}", path, e),
            }
        }

        tracing::debug!("Listed {} articles from {:?}", summaries.len(), self.root);
        Ok(summaries)
    }

    fn get(&self, slug: &Slug) -> Result<Article> {
        let path = self
            .existing_path(slug)
            .ok_or_else(|| ContentError::NotFound {
                slug: slug.to_string(),
            })?;
        tracing::debug!("Reading article {} from {:?}", slug, path);
        self.read_article(slug.clone(), &path)
    }

    fn put(&self, article: &Article, mode: WriteMode) -> Result<()> {
        let slug = &article.slug;
        let text = article.to_text()?;

        let path = match mode {
            WriteMode::CreateOnly => {
                if self.existing_path(slug).is_some() {
                    return Err(ContentError::AlreadyExists {
                        slug: slug.to_string(),
                    });
                }
                fs::create_dir_all(&self.root)
                    .map_err(|e| ContentError::io("create directory", &self.root, e))?;
                let path = self.create_path(slug);
                write_new(&path, slug, &text)?;
                path
            }
            WriteMode::UpdateOnly => {
                let path = self
                    .existing_path(slug)
                    .ok_or_else(|| ContentError::NotFound {
                        slug: slug.to_string(),
                    })?;
                // No create flag: a file deleted in the meantime stays deleted
                let mut file = OpenOptions::new()
                    .write(true)
                    .truncate(true)
                    .open(&path)
                    .map_err(|e| match e.kind() {
                        io::ErrorKind::NotFound => ContentError::NotFound {
                            slug: slug.to_string(),
                        },
                        _ => ContentError::io("open", &path, e),
                    })?;
                file.write_all(text.as_bytes())
                    .map_err(|e| ContentError::io("write", &path, e))?;
                path
            }
        };

        tracing::info!("Wrote article {} to {:?}", slug, path);
        Ok(())
    }

    fn delete(&self, slug: &Slug) -> Result<()> {
        let path = self
            .existing_path(slug)
            .ok_or_else(|| ContentError::NotFound {
                slug: slug.to_string(),
            })?;
        fs::remove_file(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ContentError::NotFound {
                slug: slug.to_string(),
            },
            _ => ContentError::io("delete", &path, e),
        })?;
        tracing::info!("Deleted article {} ({:?})", slug, path);
        Ok(())
    }
}

/// Write `text` to a file that must not exist yet
///
/// `create_new` makes the existence check and the creation one step, so of
/// two racing creates exactly one gets the file.
fn write_new(path: &Path, slug: &Slug, text: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| match e.kind() {
            io::ErrorKind::AlreadyExists => ContentError::AlreadyExists {
                slug: slug.to_string(),
            },
            _ => ContentError::io("create", path, e),
        })?;
    file.write_all(text.as_bytes())
        .map_err(|e| ContentError::io("write", path, e))
}

/// In-memory store holding the encoded text of each article
#[derive(Debug, Default)]
pub struct MemoryStore {
    docs: RwLock<BTreeMap<Slug, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert raw text under `slug` without going through the codec
    pub fn insert_raw(&self, slug: Slug, raw: &str) {
        self.docs
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(slug, raw.to_string());
    }
}

impl DocumentStore for MemoryStore {
    fn list(&self) -> Result<Vec<Summary>> {
        let docs = self.docs.read().unwrap_or_else(|e| e.into_inner());
        let mut summaries = Vec::with_capacity(docs.len());
        for (slug, raw) in docs.iter() {
            match Article::from_text(slug.clone(), raw) {
                Ok(article) => summaries.push(article.summary()),
                Err(e) => tracing::warn!("Failed to load article {}: {}", slug, e),
            }
        }
        Ok(summaries)
    }

    fn get(&self, slug: &Slug) -> Result<Article> {
        let docs = self.docs.read().unwrap_or_else(|e| e.into_inner());
        let raw = docs.get(slug).ok_or_else(|| ContentError::NotFound {
            slug: slug.to_string(),
        })?;
        Article::from_text(slug.clone(), raw)
    }

    fn put(&self, article: &Article, mode: WriteMode) -> Result<()> {
        let text = article.to_text()?;
        let mut docs = self.docs.write().unwrap_or_else(|e| e.into_inner());
        let exists = docs.contains_key(&article.slug);
        match (mode, exists) {
            (WriteMode::CreateOnly, true) => Err(ContentError::AlreadyExists {
                slug: article.slug.to_string(),
            }),
            (WriteMode::UpdateOnly, false) => Err(ContentError::NotFound {
                slug: article.slug.to_string(),
            }),
            _ => {
                docs.insert(article.slug.clone(), text);
                Ok(())
            }
        }
    }

    fn delete(&self, slug: &Slug) -> Result<()> {
        let mut docs = self.docs.write().unwrap_or_else(|e| e.into_inner());
        docs.remove(slug)
            .map(|_| ())
            .ok_or_else(|| ContentError::NotFound {
                slug: slug.to_string(),
            })
    }
}

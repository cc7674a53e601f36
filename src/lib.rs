//! quire: a file-backed article store for a personal content site
//!
//! Articles live as frontmatter + markdown/MDX files in a content directory.
//! This crate provides CRUD over that directory, a rendering transform from
//! article bodies to presentation-agnostic element trees, image upload
//! ingestion and a small HTTP server exposing all of it.

pub mod assets;
pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod server;

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use assets::AssetStore;
use content::{ContentService, FsStore};

/// Name of the site configuration file at the site root
pub const CONFIG_FILE: &str = "_config.yml";

/// A site rooted at a directory
#[derive(Debug, Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Article directory
    pub content_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
    /// Uploaded asset directory
    pub upload_dir: PathBuf,
}

impl Site {
    /// Open the site in `base_dir`, reading `_config.yml` when present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(CONFIG_FILE);

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Build a site from an already loaded configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let content_dir = base_dir.join(&config.content_dir);
        let public_dir = base_dir.join(&config.public_dir);
        let upload_dir = public_dir.join(&config.upload_dir);

        Self {
            config,
            base_dir,
            content_dir,
            public_dir,
            upload_dir,
        }
    }

    /// Filesystem store over the content directory
    pub fn store(&self) -> FsStore {
        FsStore::with_extension(&self.content_dir, &self.config.extension)
    }

    /// CRUD service configured from the site settings
    pub fn service(&self) -> ContentService {
        ContentService::new(Arc::new(self.store()))
            .with_excerpt(self.config.excerpt_length, &self.config.excerpt_marker)
    }

    /// Upload target configured from the site settings
    pub fn assets(&self) -> AssetStore {
        AssetStore::new(&self.upload_dir, &self.config.upload_url)
            .with_max_bytes(self.config.max_upload_bytes)
    }

    /// Write the static article output
    pub fn generate(&self) -> Result<()> {
        commands::generate::run(self)
    }

    /// Remove the generated article output
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}

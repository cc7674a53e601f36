//! Site configuration (_config.yml)

use anyhow::{anyhow, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::assets::DEFAULT_MAX_UPLOAD_BYTES;
use crate::content::{ComponentMap, NodeKind, DEFAULT_EXCERPT_LENGTH, DEFAULT_EXCERPT_MARKER};

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,

    // Directory
    /// Article files, relative to the site root
    pub content_dir: String,
    /// Publicly served files, relative to the site root
    pub public_dir: String,
    /// Uploaded assets, relative to `public_dir`
    pub upload_dir: String,

    // Writing
    /// Extension for newly created articles
    pub extension: String,
    pub excerpt_length: usize,
    pub excerpt_marker: String,

    // Uploads
    /// Public URL prefix of uploaded assets
    pub upload_url: String,
    pub max_upload_bytes: usize,

    // Rendering
    /// Component overrides keyed by node kind name, e.g. `heading2: SectionTitle`
    #[serde(default)]
    pub components: IndexMap<String, String>,

    // Server
    #[serde(default)]
    pub server: ServerConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Quire".to_string(),

            content_dir: "src/content/articles".to_string(),
            public_dir: "public".to_string(),
            upload_dir: "uploads".to_string(),

            extension: "mdx".to_string(),
            excerpt_length: DEFAULT_EXCERPT_LENGTH,
            excerpt_marker: DEFAULT_EXCERPT_MARKER.to_string(),

            upload_url: "/uploads".to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,

            components: IndexMap::new(),

            server: ServerConfig::default(),

            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// The HTML component table with the configured overrides applied
    pub fn component_map(&self) -> Result<ComponentMap> {
        let mut map = ComponentMap::html();
        for (kind, component) in &self.components {
            let kind: NodeKind = kind
                .parse()
                .map_err(|e| anyhow!("Invalid `components` entry: {}", e))?;
            map.insert(kind, component.as_str());
        }
        Ok(map)
    }
}

/// Development server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 4000,
        }
    }
}

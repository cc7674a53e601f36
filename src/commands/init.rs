//! Initialize a new site

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::content::ArticleInput;
use crate::{Site, CONFIG_FILE};

const DEFAULT_CONFIG: &str = r#"# Quire Configuration

# Site
title: Quire

# Directory
content_dir: src/content/articles
public_dir: public
upload_dir: uploads

# Writing
extension: mdx
excerpt_length: 120
excerpt_marker: "…"

# Uploads
upload_url: /uploads
max_upload_bytes: 5242880

# Rendering
# Override the component used for a node kind, e.g.
#   heading2: SectionTitle
#   code_block: CodeBlock
components: {}

# Server
server:
  host: localhost
  port: 4000
"#;

const WELCOME_BODY: &str = r#"Welcome to your new site. This article lives in the content directory
as a frontmatter + MDX file; edit it, delete it, or add more with `quire new`.

## Next steps

- Start the server with `quire server`
- Upload images with `quire upload <file>` and embed the returned URL
"#;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    fs::create_dir_all(target_dir)?;

    let config_path = target_dir.join(CONFIG_FILE);
    if config_path.exists() {
        anyhow::bail!("Already initialized: {:?} exists", config_path);
    }
    fs::write(&config_path, DEFAULT_CONFIG)?;

    let site = Site::new(target_dir)?;
    fs::create_dir_all(&site.content_dir)?;
    fs::create_dir_all(&site.upload_dir)?;

    let today = chrono::Local::now().format("%Y-%m-%d").to_string();
    site.service().create(
        "hello-world",
        ArticleInput::new("Hello World", &today, WELCOME_BODY),
    )?;

    tracing::info!("Site initialized at {:?}", target_dir);

    Ok(())
}

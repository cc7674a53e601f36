//! Create a new article

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::content::{Article, ArticleInput};
use crate::Site;

const DEFAULT_BODY: &str = "Write your article here.\n";

/// Create an article; `date` defaults to today, the body to a placeholder
/// or the contents of `body_file`
pub fn create_article(
    site: &Site,
    slug: &str,
    title: &str,
    date: Option<&str>,
    body_file: Option<&Path>,
) -> Result<Article> {
    let date = match date {
        Some(date) => date.to_string(),
        None => chrono::Local::now().format("%Y-%m-%d").to_string(),
    };
    let body = match body_file {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?
        }
        None => DEFAULT_BODY.to_string(),
    };

    let article = site
        .service()
        .create(slug, ArticleInput::new(title, &date, &body))?;

    println!("Created: {}", article.slug);

    Ok(article)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_create_with_default_date() {
        let dir = TempDir::new().unwrap();
        let site = Site::new(dir.path()).unwrap();
        let article = create_article(&site, "first", "First", None, None).unwrap();

        assert_eq!(article.date.len(), 10);
        assert_eq!(article.body, DEFAULT_BODY);
        assert!(site.content_dir.join("first.mdx").exists());
    }

    #[test]
    fn test_create_from_body_file() {
        let dir = TempDir::new().unwrap();
        let site = Site::new(dir.path()).unwrap();
        let body_path = dir.path().join("draft.md");
        fs::write(&body_path, "# Draft\n\nText.\n").unwrap();

        let article =
            create_article(&site, "draft", "Draft", Some("2024-02-02"), Some(&body_path)).unwrap();
        assert_eq!(article.body, "# Draft\n\nText.\n");
    }

    #[test]
    fn test_create_existing_fails() {
        let dir = TempDir::new().unwrap();
        let site = Site::new(dir.path()).unwrap();
        create_article(&site, "dup", "One", Some("2024-01-01"), None).unwrap();
        assert!(create_article(&site, "dup", "Two", Some("2024-01-01"), None).is_err());
    }
}

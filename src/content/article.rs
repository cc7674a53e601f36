//! Article model

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use super::frontmatter::{self, Metadata};
use crate::error::{ContentError, Result};

lazy_static! {
    static ref SLUG_RE: Regex = Regex::new(r"^[A-Za-z0-9][A-Za-z0-9-]*$").unwrap();
    static ref DATE_RE: Regex = Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").unwrap();
}

/// Longest accepted slug
pub const MAX_SLUG_LEN: usize = 128;

/// Filesystem- and URL-safe article identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    /// Validate `raw` as a slug: ASCII letters, digits and hyphens,
    /// starting with a letter or digit
    pub fn parse(raw: &str) -> Result<Self> {
        if is_valid_slug(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(ContentError::validation(
                "slug",
                format!(
                    "'{}' must be 1-{} ASCII letters, digits or hyphens, starting with a letter or digit",
                    raw, MAX_SLUG_LEN
                ),
            ))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

pub fn is_valid_slug(raw: &str) -> bool {
    raw.len() <= MAX_SLUG_LEN && SLUG_RE.is_match(raw)
}

/// Lexical `YYYY-MM-DD` check; the calendar itself is not validated
pub fn is_valid_date(raw: &str) -> bool {
    DATE_RE.is_match(raw)
}

/// A stored article
#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    pub slug: Slug,
    pub title: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// Raw markdown/MDX body
    pub body: String,
    /// Metadata keys other than `title` and `date`, kept for round-tripping
    pub extra: Metadata,
}

impl Article {
    pub fn new(slug: Slug, title: &str, date: &str, body: &str) -> Self {
        Self {
            slug,
            title: title.to_string(),
            date: date.to_string(),
            body: body.to_string(),
            extra: Metadata::new(),
        }
    }

    /// Decode an article file, requiring `title` and `date`
    pub fn from_text(slug: Slug, raw: &str) -> Result<Self> {
        let (mut metadata, body) = frontmatter::decode(raw).map_err(|e| e.for_slug(slug.as_str()))?;

        let title = frontmatter::scalar_string(&metadata, "title")
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| missing_key(&slug, "title"))?;
        let date = frontmatter::scalar_string(&metadata, "date")
            .ok_or_else(|| missing_key(&slug, "date"))?;

        metadata.shift_remove("title");
        metadata.shift_remove("date");

        Ok(Self {
            slug,
            title,
            date,
            body: body.to_string(),
            extra: metadata,
        })
    }

    /// Encode into the on-disk form
    pub fn to_text(&self) -> Result<String> {
        let mut metadata = Metadata::with_capacity(self.extra.len() + 2);
        metadata.insert("title".to_string(), Value::String(self.title.clone()));
        metadata.insert("date".to_string(), Value::String(self.date.clone()));
        for (key, value) in &self.extra {
            if key != "title" && key != "date" {
                metadata.insert(key.clone(), value.clone());
            }
        }
        frontmatter::encode(&metadata, &self.body).map_err(|e| e.for_slug(self.slug.as_str()))
    }

    pub fn summary(&self) -> Summary {
        Summary {
            slug: self.slug.to_string(),
            title: self.title.clone(),
            date: self.date.clone(),
        }
    }
}

fn missing_key(slug: &Slug, key: &str) -> ContentError {
    ContentError::MalformedDocument {
        slug: Some(slug.to_string()),
        reason: format!("missing required metadata key '{}'", key),
    }
}

/// Listing entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub slug: String,
    pub title: String,
    pub date: String,
}

/// Listing entry with a body preview
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preview {
    #[serde(flatten)]
    pub summary: Summary,
    pub excerpt: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_accepts_safe_names() {
        for ok in ["hello", "hello-world", "2025-recap", "A1", "x"] {
            assert!(Slug::parse(ok).is_ok(), "{} should be valid", ok);
        }
    }

    #[test]
    fn test_slug_rejects_unsafe_names() {
        let too_long = "a".repeat(MAX_SLUG_LEN + 1);
        for bad in [
            "",
            "-leading",
            "../etc/passwd",
            "a/b",
            "a\\b",
            "dot.ted",
            "space d",
            "ünicode",
            too_long.as_str(),
        ] {
            let err = Slug::parse(bad).unwrap_err();
            assert!(matches!(err, ContentError::Validation(ref v) if v.has("slug")));
        }
    }

    #[test]
    fn test_date_shape() {
        assert!(is_valid_date("2025-01-01"));
        assert!(is_valid_date("2025-13-45"));
        assert!(!is_valid_date("2025-1-1"));
        assert!(!is_valid_date("2025/01/01"));
        assert!(!is_valid_date("2025-01-01T00:00"));
        assert!(!is_valid_date("２０２５-０１-０１"));
        assert!(!is_valid_date("٢٠٢٥-٠١-٠١"));
    }

    #[test]
    fn test_from_text_keeps_unknown_keys() {
        let slug = Slug::parse("post").unwrap();
        let raw = "---\ntitle: Post\nauthor: rei\ndate: 2025-01-01\n---\nbody";
        let article = Article::from_text(slug, raw).unwrap();
        assert_eq!(article.title, "Post");
        assert_eq!(article.date, "2025-01-01");
        assert_eq!(article.body, "body");
        assert_eq!(article.extra.len(), 1);
        assert_eq!(article.extra["author"], Value::String("rei".into()));

        let reparsed = Article::from_text(article.slug.clone(), &article.to_text().unwrap()).unwrap();
        assert_eq!(reparsed, article);
    }

    #[test]
    fn test_from_text_requires_title_and_date() {
        let slug = Slug::parse("post").unwrap();
        let err = Article::from_text(slug.clone(), "---\ndate: 2025-01-01\n---\n").unwrap_err();
        assert!(matches!(err, ContentError::MalformedDocument { .. }));
        let err = Article::from_text(slug, "---\ntitle: T\n---\n").unwrap_err();
        assert!(matches!(err, ContentError::MalformedDocument { .. }));
    }
}

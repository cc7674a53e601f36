//! Content service - the CRUD façade used by the reader and authoring surfaces

use std::sync::Arc;

use serde::Deserialize;

use super::article::{is_valid_date, Article, Preview, Slug, Summary};
use super::frontmatter::Metadata;
use super::store::{DocumentStore, WriteMode};
use crate::error::{ContentError, Result, ValidationErrors};

/// Default excerpt length, in characters
pub const DEFAULT_EXCERPT_LENGTH: usize = 120;

/// Appended to truncated excerpts
pub const DEFAULT_EXCERPT_MARKER: &str = "…";

/// Caller-supplied article fields for create and update
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ArticleInput {
    pub title: String,
    pub date: String,
    pub body: String,
}

impl ArticleInput {
    pub fn new(title: &str, date: &str, body: &str) -> Self {
        Self {
            title: title.to_string(),
            date: date.to_string(),
            body: body.to_string(),
        }
    }

    fn validate(&self, errors: &mut ValidationErrors) {
        if self.title.trim().is_empty() {
            errors.push("title", "must not be empty");
        }
        if self.date.trim().is_empty() {
            errors.push("date", "must not be empty");
        } else if !is_valid_date(&self.date) {
            errors.push("date", format!("'{}' must look like YYYY-MM-DD", self.date));
        }
        if self.body.trim().is_empty() {
            errors.push("content", "must not be empty");
        }
    }
}

/// CRUD operations over a [`DocumentStore`]
#[derive(Clone)]
pub struct ContentService {
    store: Arc<dyn DocumentStore>,
    excerpt_length: usize,
    excerpt_marker: String,
}

impl ContentService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            excerpt_length: DEFAULT_EXCERPT_LENGTH,
            excerpt_marker: DEFAULT_EXCERPT_MARKER.to_string(),
        }
    }

    /// Override the excerpt policy
    pub fn with_excerpt(mut self, length: usize, marker: &str) -> Self {
        self.excerpt_length = length;
        self.excerpt_marker = marker.to_string();
        self
    }

    /// Every article, newest first; equal dates are ordered by slug
    pub fn list_summaries(&self) -> Result<Vec<Summary>> {
        let mut summaries = self.store.list()?;
        summaries.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.slug.cmp(&b.slug)));
        Ok(summaries)
    }

    /// Summaries with a body excerpt, in listing order
    pub fn list_previews(&self) -> Result<Vec<Preview>> {
        let summaries = self.list_summaries()?;
        let mut previews = Vec::with_capacity(summaries.len());
        for summary in summaries {
            match self.get_full(&summary.slug) {
                Ok(article) => previews.push(Preview {
                    excerpt: self.excerpt(&article.body),
                    summary,
                }),
                // Changed on disk between listing and loading
                Err(e) => tracing::warn!("Skipping {} in previews: {}", summary.slug, e),
            }
        }
        Ok(previews)
    }

    /// Every slug, for static path generation
    pub fn slugs(&self) -> Result<Vec<String>> {
        Ok(self
            .list_summaries()?
            .into_iter()
            .map(|summary| summary.slug)
            .collect())
    }

    /// A whole article; slugs that cannot exist are reported as not found
    pub fn get_full(&self, slug: &str) -> Result<Article> {
        let slug = Slug::parse(slug).map_err(|_| ContentError::NotFound {
            slug: slug.to_string(),
        })?;
        self.store.get(&slug)
    }

    pub fn create(&self, slug: &str, input: ArticleInput) -> Result<Article> {
        let slug = validate(slug, &input)?;
        let article = Article::new(slug, &input.title, &input.date, &input.body);
        self.store.put(&article, WriteMode::CreateOnly)?;
        tracing::info!("Created article {}", article.slug);
        Ok(article)
    }

    /// Replace title, date and body; the slug and unknown metadata keys stay
    pub fn update(&self, slug: &str, input: ArticleInput) -> Result<Article> {
        let slug = validate(slug, &input)?;
        // A file whose metadata no longer decodes is overwritten, not kept broken
        let extra = match self.store.get(&slug) {
            Ok(existing) => existing.extra,
            Err(ContentError::MalformedDocument { reason, .. }) => {
                tracing::warn!("Replacing malformed article {}: {}", slug, reason);
                Metadata::new()
            }
            Err(e) => return Err(e),
        };
        let article = Article {
            extra,
            ..Article::new(slug, &input.title, &input.date, &input.body)
        };
        self.store.put(&article, WriteMode::UpdateOnly)?;
        tracing::info!("Updated article {}", article.slug);
        Ok(article)
    }

    pub fn remove(&self, slug: &str) -> Result<()> {
        let slug = Slug::parse(slug).map_err(|_| ContentError::NotFound {
            slug: slug.to_string(),
        })?;
        self.store.delete(&slug)?;
        tracing::info!("Removed article {}", slug);
        Ok(())
    }

    pub fn excerpt(&self, body: &str) -> String {
        excerpt(body, self.excerpt_length, &self.excerpt_marker)
    }
}

/// Check every field before anything touches storage
fn validate(slug: &str, input: &ArticleInput) -> Result<Slug> {
    let mut errors = ValidationErrors::new();
    let parsed = match Slug::parse(slug) {
        Ok(slug) => Some(slug),
        Err(ContentError::Validation(slug_errors)) => {
            for e in slug_errors.errors() {
                errors.push(e.field, e.message.clone());
            }
            None
        }
        Err(e) => return Err(e),
    };
    input.validate(&mut errors);
    errors.into_result()?;
    parsed.ok_or_else(|| ContentError::validation("slug", "invalid slug"))
}

/// First `length` characters of `body`, plus `marker` when anything was cut
pub fn excerpt(body: &str, length: usize, marker: &str) -> String {
    match body.char_indices().nth(length) {
        Some((cut, _)) => format!("{}{}", &body[..cut], marker),
        None => body.to_string(),
    }
}

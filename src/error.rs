//! Error types shared by the content store, the service and asset ingestion

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A single rejected field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Every field problem found in one request, reported together
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a problem with `field`
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Whether any error concerns `field`
    pub fn has(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// `Ok(())` when nothing was recorded, the collected errors otherwise
    pub fn into_result(self) -> Result<(), ContentError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ContentError::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", e.field, e.message)?;
        }
        Ok(())
    }
}

impl From<FieldError> for ValidationErrors {
    fn from(err: FieldError) -> Self {
        Self { errors: vec![err] }
    }
}

/// Errors surfaced by the content core
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Invalid input: {0}")]
    Validation(ValidationErrors),

    #[error("Article not found: {slug}")]
    NotFound { slug: String },

    #[error("Article already exists: {slug}")]
    AlreadyExists { slug: String },

    #[error("Malformed document{}: {reason}", slug_suffix(.slug))]
    MalformedDocument {
        slug: Option<String>,
        reason: String,
    },

    #[error("Payload too large: {size} bytes exceeds the {limit} byte limit")]
    PayloadTooLarge { size: usize, limit: usize },

    #[error("I/O error while trying to {op} {target:?}: {source}")]
    Io {
        op: &'static str,
        target: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ContentError {
    pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
        ContentError::Validation(
            FieldError {
                field,
                message: message.into(),
            }
            .into(),
        )
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        ContentError::MalformedDocument {
            slug: None,
            reason: reason.into(),
        }
    }

    pub(crate) fn io(op: &'static str, target: impl Into<PathBuf>, source: io::Error) -> Self {
        ContentError::Io {
            op,
            target: target.into(),
            source,
        }
    }

    /// Attach the slug of the offending file to a malformed-document error
    pub(crate) fn for_slug(self, slug: &str) -> Self {
        match self {
            ContentError::MalformedDocument { slug: None, reason } => {
                ContentError::MalformedDocument {
                    slug: Some(slug.to_string()),
                    reason,
                }
            }
            other => other,
        }
    }
}

fn slug_suffix(slug: &Option<String>) -> String {
    slug.as_deref()
        .map(|s| format!(" '{}'", s))
        .unwrap_or_default()
}

pub type Result<T, E = ContentError> = std::result::Result<T, E>;

//! Content module - article storage, the CRUD service and markdown rendering

mod article;
pub mod frontmatter;
mod markdown;
mod service;
mod store;

pub use article::{is_valid_date, is_valid_slug, Article, Preview, Slug, Summary, MAX_SLUG_LEN};
pub use markdown::{to_html, ComponentMap, Element, MarkdownRenderer, Node, NodeKind};
pub use service::{
    excerpt, ArticleInput, ContentService, DEFAULT_EXCERPT_LENGTH, DEFAULT_EXCERPT_MARKER,
};
pub use store::{DocumentStore, FsStore, MemoryStore, WriteMode};

//! Reader endpoints: article previews and rendered articles

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use super::AppState;
use crate::content::{Element, Preview};
use crate::error::ContentError;

/// A rendered article
#[derive(Debug, Serialize)]
pub struct RenderedArticle {
    pub slug: String,
    pub title: String,
    pub date: String,
    pub elements: Vec<Element>,
}

/// `GET /articles`
pub async fn list_previews(
    State(state): State<AppState>,
) -> Result<Json<Vec<Preview>>, ContentError> {
    Ok(Json(state.service.list_previews()?))
}

/// `GET /articles/{slug}`
pub async fn show_article(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<RenderedArticle>, ContentError> {
    let article = state.service.get_full(&slug)?;
    let elements = state.renderer.render(&article.body, &state.components);

    Ok(Json(RenderedArticle {
        slug: article.slug.to_string(),
        title: article.title,
        date: article.date,
        elements,
    }))
}

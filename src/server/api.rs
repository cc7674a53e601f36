//! Authoring endpoints: article CRUD and image upload

use axum::extract::multipart::MultipartError;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::errors::error_response;
use super::AppState;
use crate::content::{Article, ArticleInput, Summary};
use crate::error::ContentError;

/// Multipart field carrying the uploaded file
pub const UPLOAD_FIELD: &str = "image";

#[derive(Debug, Deserialize)]
pub struct SlugQuery {
    pub slug: Option<String>,
}

impl SlugQuery {
    /// The requested slug; `?slug=` with no value counts as absent
    fn into_slug(self) -> Option<String> {
        self.slug.filter(|slug| !slug.is_empty())
    }
}

/// Request body for create (`slug` required) and update (`slug` ignored)
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ArticleBody {
    pub slug: Option<String>,
    pub title: Option<String>,
    pub date: Option<String>,
    pub content: Option<String>,
}

impl ArticleBody {
    fn into_input(self) -> ArticleInput {
        ArticleInput {
            title: self.title.unwrap_or_default(),
            date: self.date.unwrap_or_default(),
            body: self.content.unwrap_or_default(),
        }
    }
}

/// A full article as returned by `GET /api/articles?slug=`
#[derive(Debug, Serialize, Deserialize)]
pub struct ArticleView {
    pub slug: String,
    pub title: String,
    pub date: String,
    pub content: String,
}

impl From<Article> for ArticleView {
    fn from(article: Article) -> Self {
        Self {
            slug: article.slug.to_string(),
            title: article.title,
            date: article.date,
            content: article.body,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SlugResponse {
    pub slug: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Public path of the stored image
    pub url: String,
}

/// `GET /api/articles`: every summary, or one article with `?slug=`
pub async fn get_articles(
    State(state): State<AppState>,
    Query(query): Query<SlugQuery>,
) -> Result<Response, ContentError> {
    match query.into_slug() {
        Some(slug) => {
            let article = state.service.get_full(&slug)?;
            Ok(Json(ArticleView::from(article)).into_response())
        }
        None => {
            let summaries: Vec<Summary> = state.service.list_summaries()?;
            Ok(Json(summaries).into_response())
        }
    }
}

/// `POST /api/articles`
pub async fn create_article(
    State(state): State<AppState>,
    payload: Result<Json<ArticleBody>, JsonRejection>,
) -> Result<Response, ContentError> {
    let Json(mut body) = match payload {
        Ok(body) => body,
        Err(rejection) => return Ok(bad_json(rejection)),
    };
    let slug = body.slug.take().unwrap_or_default();
    let article = state.service.create(&slug, body.into_input())?;

    Ok((
        StatusCode::CREATED,
        Json(SlugResponse {
            slug: article.slug.to_string(),
        }),
    )
        .into_response())
}

/// `PUT /api/articles?slug=`
pub async fn update_article(
    State(state): State<AppState>,
    Query(query): Query<SlugQuery>,
    payload: Result<Json<ArticleBody>, JsonRejection>,
) -> Result<Response, ContentError> {
    let Some(slug) = query.into_slug() else {
        return Err(missing_slug());
    };
    let Json(body) = match payload {
        Ok(body) => body,
        Err(rejection) => return Ok(bad_json(rejection)),
    };
    let article = state.service.update(&slug, body.into_input())?;

    Ok(Json(SlugResponse {
        slug: article.slug.to_string(),
    })
    .into_response())
}

/// `DELETE /api/articles?slug=`
pub async fn delete_article(
    State(state): State<AppState>,
    Query(query): Query<SlugQuery>,
) -> Result<Json<SlugResponse>, ContentError> {
    let Some(slug) = query.into_slug() else {
        return Err(missing_slug());
    };
    state.service.remove(&slug)?;

    Ok(Json(SlugResponse { slug }))
}

/// `POST /api/upload`
///
/// Accepts a multipart form with a single file field named `image` and
/// stores it under the public upload directory.
pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, Response> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or("upload.bin").to_string();
        let data = field.bytes().await.map_err(multipart_error)?;

        let asset = state
            .assets
            .ingest(&file_name, &data)
            .map_err(IntoResponse::into_response)?;

        return Ok(Json(UploadResponse { url: asset.url }));
    }

    Err(error_response(
        StatusCode::BAD_REQUEST,
        format!("No '{}' file field found in request", UPLOAD_FIELD),
    ))
}

/// 405 for `/api/articles`
pub async fn articles_method_not_allowed() -> Response {
    method_not_allowed("GET, POST, PUT, DELETE")
}

/// 405 for `/api/upload`
pub async fn upload_method_not_allowed() -> Response {
    method_not_allowed("POST")
}

fn method_not_allowed(allow: &'static str) -> Response {
    let mut response = error_response(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed");
    response
        .headers_mut()
        .insert(header::ALLOW, header::HeaderValue::from_static(allow));
    response
}

fn missing_slug() -> ContentError {
    ContentError::validation("slug", "query parameter is required")
}

fn bad_json(rejection: JsonRejection) -> Response {
    error_response(
        StatusCode::BAD_REQUEST,
        format!("Invalid JSON body: {}", rejection.body_text()),
    )
}

// Body-limit overruns surface here as 413; everything else is a bad request.
fn multipart_error(err: MultipartError) -> Response {
    let status = match err.status() {
        StatusCode::PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
        _ => StatusCode::BAD_REQUEST,
    };
    error_response(status, format!("Multipart error: {}", err.body_text()))
}

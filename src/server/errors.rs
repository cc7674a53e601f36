use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::error::ContentError;

impl ContentError {
    pub fn status(&self) -> StatusCode {
        match self {
            ContentError::Validation(_) => StatusCode::BAD_REQUEST,
            ContentError::NotFound { .. } => StatusCode::NOT_FOUND,
            ContentError::AlreadyExists { .. } => StatusCode::CONFLICT,
            ContentError::MalformedDocument { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ContentError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ContentError::Io { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Converts content errors into `{"error": message}` responses.
impl IntoResponse for ContentError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self);
        }
        error_response(status, self.to_string())
    }
}

pub(crate) fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let body = serde_json::json!({
        "error": message.into()
    });

    (status, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ContentError::validation("title", "must not be empty").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ContentError::NotFound { slug: "a".into() }.status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ContentError::AlreadyExists { slug: "a".into() }.status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ContentError::malformed("bad yaml").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ContentError::PayloadTooLarge { size: 2, limit: 1 }.status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
    }
}

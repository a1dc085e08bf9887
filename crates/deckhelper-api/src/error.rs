use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use deckhelper_core::DeckHelperError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    DeckHelper(#[from] DeckHelperError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl ApiError {
    pub fn session_not_found(id: impl std::fmt::Display) -> Self {
        ApiError::NotFound(format!("session {}", id))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::DeckHelper(err) => match err {
                DeckHelperError::NotFound(_) => StatusCode::NOT_FOUND,
                DeckHelperError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                DeckHelperError::RequestFailed { .. } => StatusCode::BAD_GATEWAY,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::warn!("Request failed: {}", self);
        }

        let body = Json(json!({
            "error": self.to_string(),
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_to_http_statuses() {
        let cases = [
            (DeckHelperError::card_not_found("Blorp"), StatusCode::NOT_FOUND),
            (
                DeckHelperError::InvalidInput("empty".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                DeckHelperError::request_failed("Solo", 503),
                StatusCode::BAD_GATEWAY,
            ),
            (
                DeckHelperError::Transport("reset".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status_code(), expected);
        }
    }

    #[test]
    fn not_found_keeps_lookup_message() {
        let err = ApiError::from(DeckHelperError::card_not_found("Blorp"));
        assert_eq!(err.to_string(), r#"No card found for "Blorp"."#);
    }
}

//! Web Error Types
//!
//! Errors from every layer below the handlers, mapped to HTTP status codes.
//! Public pages render these through the not-found and error templates (see
//! [`AppState::error_page`](super::AppState::error_page)) and back office
//! pages through `admin/error.html`; JSON endpoints and anything that cannot
//! render fall back to [`IntoResponse`].

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::cms::CmsError;
use crate::media::MediaError;
use crate::render::RenderError;
use crate::wizard::WizardError;

#[derive(Error, Debug)]
pub enum WebError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Content API error: {0}")]
    Cms(#[from] CmsError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Media error: {0}")]
    Media(#[from] MediaError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Wizard error: {0}")]
    Wizard(#[from] WizardError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
    pub request_id: String,
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

fn cms_status(err: &CmsError) -> (StatusCode, &'static str) {
    if err.is_not_found() {
        (StatusCode::NOT_FOUND, "NOT_FOUND")
    } else {
        (StatusCode::BAD_GATEWAY, "CONTENT_API_ERROR")
    }
}

impl WebError {
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            WebError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            WebError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            WebError::Cms(e) => cms_status(e),
            WebError::Render(_) => (StatusCode::INTERNAL_SERVER_ERROR, "RENDER_ERROR"),
            WebError::Media(MediaError::Upload(e)) => cms_status(e),
            WebError::Media(MediaError::TooLarge { .. }) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "FILE_TOO_LARGE")
            }
            WebError::Media(MediaError::Encode(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "MEDIA_ERROR")
            }
            WebError::Media(_) => (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_FILE"),
            WebError::Catalog(CatalogError::Missing) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            WebError::Catalog(CatalogError::Cms(e)) => cms_status(e),
            WebError::Catalog(CatalogError::TooLarge { .. }) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "FILE_TOO_LARGE")
            }
            WebError::Catalog(_) => (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_FILE"),
            WebError::Wizard(WizardError::DraftNotFound) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            WebError::Wizard(WizardError::Cms(e)) => cms_status(e),
            WebError::Wizard(_) => (StatusCode::UNPROCESSABLE_ENTITY, "WIZARD_ERROR"),
            WebError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status_and_code().0
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == StatusCode::NOT_FOUND
    }

    /// Log at a level matching the status
    pub(crate) fn log(&self, request_id: &str) {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            tracing::error!(request_id, error_code = code, error_message = %self, "Request failed");
        } else if status == StatusCode::NOT_FOUND {
            tracing::debug!(request_id, error_message = %self, "Not found");
        } else {
            tracing::warn!(request_id, error_code = code, error_message = %self, "Request rejected");
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let request_id = uuid::Uuid::new_v4().to_string();
        self.log(&request_id);

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message: self.to_string(),
            },
            request_id,
        };

        (status, Json(body)).into_response()
    }
}

pub type WebResult<T> = Result<T, WebError>;

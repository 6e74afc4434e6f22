//! Media Upload Route
//!
//! - POST /admin/upload - Store one image or video, answer with its URL
//!
//! Wizard pages call this as soon as a file is picked so the step form only
//! has to carry the URL.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::media::{MediaError, MediaKind};
use crate::web::error::{WebError, WebResult};
use crate::web::multipart::read_form;
use crate::web::AppState;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
}

/// POST /admin/upload
pub async fn upload(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> WebResult<Json<UploadResponse>> {
    let mut form = read_form(multipart).await?;
    let file = form
        .take_file("file")
        .ok_or_else(|| WebError::BadRequest("missing file".into()))?;

    let kind = match MediaKind::from_content_type(&file.content_type) {
        Some(kind @ (MediaKind::Image | MediaKind::Video)) => kind,
        _ => return Err(MediaError::UnsupportedType(file.content_type).into()),
    };

    let url = state.media.store(file, kind).await?;
    Ok(Json(UploadResponse { url }))
}

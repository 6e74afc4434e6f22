//! Catalog Routes
//!
//! - GET /:lang/catalog.pdf - Download the current catalog
//! - GET /admin/catalog - Catalog status and upload form
//! - POST /admin/catalog - Replace the catalog

use axum::{
    extract::{Multipart, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tower_cookies::Cookies;

use super::admin::{admin_context, render_admin};
use crate::catalog::{attachment_disposition, CatalogError};
use crate::i18n;
use crate::web::error::WebError;
use crate::web::flash::{redirect_with_flash, Flash};
use crate::web::multipart::read_form;
use crate::web::page::PageRequest;
use crate::web::AppState;

/// GET /:lang/catalog.pdf
pub async fn download(State(state): State<Arc<AppState>>, page: PageRequest) -> Response {
    match state.catalog.download().await {
        Ok(file) => (
            [
                (header::CONTENT_TYPE, file.content_type),
                (
                    header::CONTENT_DISPOSITION,
                    attachment_disposition(&file.file_name),
                ),
            ],
            file.bytes,
        )
            .into_response(),
        Err(e) => state.error_page(&page, e.into()),
    }
}

async fn catalog_page(
    state: &AppState,
    cookies: &Cookies,
    error: Option<&'static str>,
    status: StatusCode,
) -> Response {
    let locale = state.admin_locale();
    let exists = state.catalog.exists().await.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Cannot check catalog");
        false
    });

    let mut context = admin_context(state, cookies);
    context.insert("exists", &exists);
    context.insert("file_name", &state.catalog.config().file_name);
    context.insert("public_lang", state.default_locale().code());
    context.insert("error", &error.map(|key| i18n::t(locale, key)));
    render_admin(state, "admin/catalog.html", &context, status)
}

/// GET /admin/catalog
pub async fn admin_page(State(state): State<Arc<AppState>>, cookies: Cookies) -> Response {
    catalog_page(&state, &cookies, None, StatusCode::OK).await
}

/// POST /admin/catalog
///
/// A rejected upload leaves the current catalog in place.
pub async fn upload(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    multipart: Multipart,
) -> Response {
    let result = async {
        let mut form = read_form(multipart).await?;
        let file = form.take_file("catalog").ok_or(CatalogError::Empty)?;
        state.catalog.upload(&file.file_name, file.bytes).await?;
        Ok::<(), WebError>(())
    }
    .await;

    match result {
        Ok(()) => redirect_with_flash(
            &cookies,
            "/admin/catalog",
            Flash::success("admin_catalog_uploaded"),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Catalog upload rejected");
            let key = match &e {
                WebError::Catalog(err) => err.message_key(),
                _ => "form_invalid_file",
            };
            catalog_page(&state, &cookies, Some(key), e.status()).await
        }
    }
}

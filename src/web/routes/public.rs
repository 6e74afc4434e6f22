//! Public Pages
//!
//! - GET / - Redirect to the default locale
//! - GET /:lang - Home
//! - GET /:lang/brands, /:lang/brands/:id - Brands
//! - GET /:lang/products/:id - Product detail
//! - GET /:lang/recipes, /:lang/recipes/:id - Recipes
//! - GET /:lang/dishes - Dishes grouped by category

use axum::{
    extract::{Path, Query, State},
    http::Uri,
    response::{Redirect, Response},
};
use serde::Deserialize;
use std::sync::Arc;

use crate::pages;
use crate::web::error::WebError;
use crate::web::page::{parse_id, PageRequest};
use crate::web::AppState;

/// GET /
pub async fn root(State(state): State<Arc<AppState>>) -> Redirect {
    Redirect::to(&format!("/{}", state.default_locale().code()))
}

/// GET /:lang
pub async fn home(State(state): State<Arc<AppState>>, page: PageRequest) -> Response {
    let data = pages::home(&state.cms, page.locale, &state.config.site).await;
    state.render_page(&page, "home.html", data.map_err(WebError::from))
}

/// GET /:lang/brands
pub async fn brands(State(state): State<Arc<AppState>>, page: PageRequest) -> Response {
    let data = pages::brands(&state.cms, page.locale).await;
    state.render_page(&page, "brands.html", data.map_err(WebError::from))
}

/// GET /:lang/brands/:id
pub async fn brand(
    State(state): State<Arc<AppState>>,
    Path((_, id)): Path<(String, String)>,
    page: PageRequest,
) -> Response {
    let data = match parse_id(&id) {
        Ok(id) => pages::brand(&state.cms, page.locale, id)
            .await
            .map_err(WebError::from),
        Err(e) => Err(e),
    };
    state.render_page(&page, "brand.html", data)
}

/// GET /:lang/products/:id
pub async fn product(
    State(state): State<Arc<AppState>>,
    Path((_, id)): Path<(String, String)>,
    page: PageRequest,
) -> Response {
    let related = state.config.site.related_products;
    let data = match parse_id(&id) {
        Ok(id) => pages::product(&state.cms, page.locale, id, related)
            .await
            .map_err(WebError::from),
        Err(e) => Err(e),
    };
    state.render_page(&page, "product.html", data)
}

#[derive(Debug, Deserialize)]
pub struct RecipesQuery {
    pub dish: Option<String>,
}

/// GET /:lang/recipes?dish=:id
///
/// A malformed dish filter shows every recipe.
pub async fn recipes(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RecipesQuery>,
    page: PageRequest,
) -> Response {
    let dish = query.dish.as_deref().and_then(|d| parse_id(d).ok());
    let data = pages::recipes(&state.cms, page.locale, dish).await;
    state.render_page(&page, "recipes.html", data.map_err(WebError::from))
}

/// GET /:lang/recipes/:id
pub async fn recipe(
    State(state): State<Arc<AppState>>,
    Path((_, id)): Path<(String, String)>,
    page: PageRequest,
) -> Response {
    let data = match parse_id(&id) {
        Ok(id) => pages::recipe(&state.cms, page.locale, id)
            .await
            .map_err(WebError::from),
        Err(e) => Err(e),
    };
    state.render_page(&page, "recipe.html", data)
}

/// GET /:lang/dishes
pub async fn dishes(State(state): State<Arc<AppState>>, page: PageRequest) -> Response {
    let data = pages::dishes(&state.cms, page.locale).await;
    state.render_page(&page, "dishes.html", data.map_err(WebError::from))
}

/// Fallback for unmatched paths: the not-found page in the path's locale
/// when it has one
pub async fn not_found(State(state): State<Arc<AppState>>, uri: Uri) -> Response {
    let locale = uri
        .path()
        .trim_start_matches('/')
        .split('/')
        .next()
        .and_then(|segment| segment.parse().ok())
        .unwrap_or_else(|| state.default_locale());
    let page = PageRequest::new(locale, "");
    state.error_page(&page, WebError::NotFound(uri.path().to_string()))
}

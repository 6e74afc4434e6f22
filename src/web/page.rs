//! Public page requests
//!
//! [`PageRequest`] pulls the locale out of the first path segment and picks
//! up any pending flash message. Requests under an unknown locale get the
//! not-found page in the default locale.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    response::Response,
};
use std::sync::Arc;
use tera::Context;
use tower_cookies::Cookies;

use super::error::WebError;
use super::flash::{take_flash, Flash};
use super::AppState;
use crate::content::{Id, Locale};
use crate::render::page_context;

#[derive(Debug, Clone)]
pub struct PageRequest {
    pub locale: Locale,
    /// Path after the locale segment, e.g. `/brands/3`
    pub path: String,
    pub flash: Option<Flash>,
}

impl PageRequest {
    pub fn new(locale: Locale, path: impl Into<String>) -> Self {
        Self {
            locale,
            path: path.into(),
            flash: None,
        }
    }

    pub fn context(&self) -> Context {
        let mut context = page_context(self.locale, &self.path);
        if let Some(flash) = &self.flash {
            context.insert("flash", &flash.view(self.locale));
        }
        context
    }

    /// Link to a page in this request's locale
    pub fn link(&self, path: &str) -> String {
        format!("/{}{}", self.locale.code(), path)
    }
}

/// Split `/ar/brands/3` into `("ar", "/brands/3")`
fn split_locale(path: &str) -> (&str, &str) {
    let trimmed = path.trim_start_matches('/');
    match trimmed.find('/') {
        Some(i) => (&trimmed[..i], &trimmed[i..]),
        None => (trimmed, ""),
    }
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for PageRequest {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let (segment, rest) = split_locale(parts.uri.path());
        let locale = segment.parse::<Locale>();
        let rest = rest.to_string();
        let cookies = Cookies::from_request_parts(parts, state).await.ok();

        match locale {
            Ok(locale) => Ok(Self {
                locale,
                path: rest,
                flash: cookies.as_ref().and_then(take_flash),
            }),
            Err(e) => {
                let request = PageRequest::new(state.default_locale(), "");
                Err(state.error_page(&request, WebError::NotFound(e.to_string())))
            }
        }
    }
}

/// Parse a record id from the path; anything else is a missing page
pub fn parse_id(raw: &str) -> Result<Id, WebError> {
    raw.parse::<Id>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| WebError::NotFound(format!("invalid id {:?}", raw)))
}

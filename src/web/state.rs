//! Application State
//!
//! Shared state accessible by all handlers, wrapped in `Arc` by the router.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::auth::AdminSessions;
use super::error::WebError;
use super::page::PageRequest;
use crate::catalog::CatalogService;
use crate::cms::Cms;
use crate::config::Config;
use crate::content::Locale;
use crate::media::MediaStore;
use crate::render::{RenderError, Renderer};
use crate::wizard::DraftStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub renderer: Arc<Renderer>,
    /// Content API facade
    pub cms: Cms,
    pub media: MediaStore,
    pub catalog: CatalogService,
    /// Open admin wizard drafts
    pub drafts: Arc<DraftStore>,
    pub sessions: Arc<AdminSessions>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: Config, cms: Cms) -> Result<Self, RenderError> {
        let ttl = Duration::from_secs(config.admin.draft_ttl_minutes.saturating_mul(60));
        Ok(Self {
            renderer: Arc::new(Renderer::new()?),
            media: MediaStore::new(config.media.clone(), cms.clone()),
            catalog: CatalogService::new(cms.clone(), config.catalog.clone()),
            drafts: Arc::new(DraftStore::new(ttl)),
            sessions: Arc::new(AdminSessions::new()),
            config: Arc::new(config),
            cms,
            start_time: Instant::now(),
        })
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    pub fn default_locale(&self) -> Locale {
        self.config.site.default_locale
    }

    pub fn admin_locale(&self) -> Locale {
        self.config.site.admin_locale
    }

    /// Render a public page, or the matching error page if `data` failed
    pub fn render_page<T: Serialize>(
        &self,
        request: &PageRequest,
        template: &str,
        data: Result<T, WebError>,
    ) -> Response {
        self.render_page_with_status(request, template, StatusCode::OK, data)
    }

    pub fn render_page_with_status<T: Serialize>(
        &self,
        request: &PageRequest,
        template: &str,
        status: StatusCode,
        data: Result<T, WebError>,
    ) -> Response {
        let html = data.and_then(|data| {
            self.renderer
                .page(template, request.context(), &data)
                .map_err(WebError::from)
        });
        match html {
            Ok(html) => (status, Html(html)).into_response(),
            Err(e) => self.error_page(request, e),
        }
    }

    /// The not-found page for 404s, the error page for everything else
    pub fn error_page(&self, request: &PageRequest, err: WebError) -> Response {
        let request_id = uuid::Uuid::new_v4().to_string();
        err.log(&request_id);

        let status = err.status();
        let template = if status == StatusCode::NOT_FOUND {
            "not_found.html"
        } else {
            "error.html"
        };
        let mut context = request.context();
        context.insert("request_id", &request_id);

        match self.renderer.render(template, &context) {
            Ok(html) => (status, Html(html)).into_response(),
            Err(render_err) => WebError::from(render_err).into_response(),
        }
    }
}

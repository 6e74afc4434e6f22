//! Maeda Web Server
//!
//! Server-rendered public site and back office, built with Axum.
//!
//! # Endpoints
//!
//! ## Public site (`:lang` is `ar` or `en`)
//! - `GET /` - Redirect to the default locale
//! - `GET /:lang` - Home
//! - `GET /:lang/brands`, `GET /:lang/brands/:id` - Brands
//! - `GET /:lang/products/:id` - Product detail
//! - `GET /:lang/recipes`, `GET /:lang/recipes/:id` - Recipes
//! - `GET /:lang/dishes` - Dishes
//! - `GET /:lang/catalog.pdf` - Catalog download
//! - `GET|POST /:lang/contact`, `/:lang/careers`, `/:lang/export` - Forms
//!
//! ## Back office
//! - `GET|POST /admin/login`, `POST /admin/logout`
//! - `GET /admin` - Dashboard
//! - `GET /admin/:kind`, `GET /admin/:kind/new`, `GET /admin/:kind/:id/edit`
//! - `POST /admin/:kind/:id/delete`
//! - `GET|POST /admin/drafts/:draft`, `POST /admin/drafts/:draft/back`,
//!   `POST /admin/drafts/:draft/submit` - Wizards
//! - `GET|POST /admin/catalog` - Catalog upload
//! - `POST /admin/upload` - Media upload helper
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! # Example
//!
//! ```rust,ignore
//! use maeda::cms::Cms;
//! use maeda::config::Config;
//! use maeda::web::{serve, AppState};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     let cms = Cms::http(&config.cms)?;
//!     serve(AppState::new(config, cms)?).await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod error;
pub mod flash;
pub mod multipart;
pub mod page;
pub mod routes;
pub mod state;

pub use error::{WebError, WebResult};
pub use page::PageRequest;
pub use state::AppState;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_cookies::CookieManagerLayer;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::Config;

/// Headroom for multipart framing and the text fields sent with a file
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Largest request body any route accepts
fn body_limit(config: &Config) -> usize {
    [
        config.media.max_image_bytes,
        config.media.max_video_bytes,
        config.media.max_document_bytes,
        config.catalog.max_bytes,
    ]
    .into_iter()
    .max()
    .unwrap_or_default()
        + FORM_OVERHEAD_BYTES
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
}

/// Build the router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let shared_state = Arc::new(state);
    let config = Arc::clone(&shared_state.config);

    let public_routes = Router::new()
        .route("/", get(routes::public::root))
        .route("/:lang", get(routes::public::home))
        .route("/:lang/brands", get(routes::public::brands))
        .route("/:lang/brands/:id", get(routes::public::brand))
        .route("/:lang/products/:id", get(routes::public::product))
        .route("/:lang/recipes", get(routes::public::recipes))
        .route("/:lang/recipes/:id", get(routes::public::recipe))
        .route("/:lang/dishes", get(routes::public::dishes))
        .route("/:lang/catalog.pdf", get(routes::catalog::download))
        // Public forms
        .route(
            "/:lang/contact",
            get(routes::forms::contact_form).post(routes::forms::contact_submit),
        )
        .route(
            "/:lang/careers",
            get(routes::forms::careers_form).post(routes::forms::careers_submit),
        )
        .route(
            "/:lang/export",
            get(routes::forms::export_form).post(routes::forms::export_submit),
        );

    let login_routes = Router::new().route(
        "/admin/login",
        get(routes::admin::login_form).post(routes::admin::login),
    );

    let admin_routes = Router::new()
        .route("/admin", get(routes::admin::dashboard))
        .route("/admin/logout", post(routes::admin::logout))
        .route("/admin/upload", post(routes::upload::upload))
        .route(
            "/admin/catalog",
            get(routes::catalog::admin_page).post(routes::catalog::upload),
        )
        // Wizard routes
        .route(
            "/admin/drafts/:draft",
            get(routes::admin::show_draft).post(routes::admin::advance),
        )
        .route("/admin/drafts/:draft/back", post(routes::admin::back))
        .route("/admin/drafts/:draft/submit", post(routes::admin::submit))
        // Content routes
        .route("/admin/:kind", get(routes::admin::list))
        .route("/admin/:kind/new", get(routes::admin::new_draft))
        .route("/admin/:kind/:id/edit", get(routes::admin::edit_draft))
        .route("/admin/:kind/:id/delete", post(routes::admin::delete))
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&shared_state),
            auth::require_admin,
        ));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    Router::new()
        .merge(public_routes)
        .merge(login_routes)
        .merge(admin_routes)
        .nest("/health", health_routes)
        .fallback(routes::public::not_found)
        .layer(DefaultBodyLimit::max(body_limit(&config)))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.server.cors_origins))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(CookieManagerLayer::new())
        .with_state(shared_state)
}

/// Start the web server
pub async fn serve(state: AppState) -> Result<(), WebError> {
    let addr = state.config.server.addr();
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Maeda listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Maeda shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cms::{seed_demo_content, Cms, Filter, MemoryBackend, UploadedFile};
    use crate::content::Locale;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::Response,
    };
    use image::{DynamicImage, ImageOutputFormat, Rgb, RgbImage};
    use std::io::Cursor;
    use tower::util::ServiceExt;

    const BOUNDARY: &str = "maeda-test-boundary";

    struct TestApp {
        router: Router,
        backend: Arc<MemoryBackend>,
    }

    impl TestApp {
        async fn new(token: Option<&str>) -> Self {
            let backend = Arc::new(MemoryBackend::new());
            seed_demo_content(backend.as_ref()).await.unwrap();

            let mut config = Config::default();
            config.site.default_locale = Locale::Ar;
            config.admin.token = token.map(str::to_string);
            let state = AppState::new(config, Cms::new(backend.clone())).unwrap();

            Self {
                router: build_router(state),
                backend,
            }
        }

        async fn send(&self, request: Request<Body>) -> Response {
            self.router.clone().oneshot(request).await.unwrap()
        }

        async fn get(&self, uri: &str) -> Response {
            self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
        }

        async fn post_form(&self, uri: &str, body: &str) -> Response {
            self.send(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
        }

        async fn post_multipart(&self, uri: &str, fields: &[(&str, &str)]) -> Response {
            self.post_multipart_with_file(uri, fields, None).await
        }

        async fn post_multipart_with_file(
            &self,
            uri: &str,
            fields: &[(&str, &str)],
            file: Option<(&str, &str, &str, &[u8])>,
        ) -> Response {
            let mut body = Vec::new();
            for (name, value) in fields {
                body.extend_from_slice(
                    format!(
                        "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                        BOUNDARY, name, value
                    )
                    .as_bytes(),
                );
            }
            if let Some((name, file_name, content_type, bytes)) = file {
                body.extend_from_slice(
                    format!(
                        "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                        BOUNDARY, name, file_name, content_type
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
                body.extend_from_slice(b"\r\n");
            }
            body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

            self.send(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(
                        header::CONTENT_TYPE,
                        format!("multipart/form-data; boundary={}", BOUNDARY),
                    )
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
        }

        async fn find(&self, collection: &str, name_en: &str) -> serde_json::Value {
            Cms::new(self.backend.clone())
                .list_raw(collection, &Filter::new())
                .await
                .unwrap()
                .into_iter()
                .find(|record| record["name_en"] == name_en)
                .unwrap()
        }

        async fn count(&self, collection: &str) -> usize {
            Cms::new(self.backend.clone())
                .list_raw(collection, &Filter::new())
                .await
                .unwrap()
                .len()
        }
    }

    fn location(response: &Response) -> String {
        response.headers()[header::LOCATION]
            .to_str()
            .unwrap()
            .to_string()
    }

    fn set_cookies(response: &Response) -> Vec<String> {
        response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect()
    }

    fn is_html(response: &Response) -> bool {
        response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/html")
    }

    fn png(width: u32, height: u32) -> Vec<u8> {
        let mut buf = Vec::new();
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([180, 90, 30])))
            .write_to(&mut Cursor::new(&mut buf), ImageOutputFormat::Png)
            .unwrap();
        buf
    }

    /// A new brand draft with the name and description steps done
    async fn brand_draft_at_media_step(app: &TestApp, name_en: &str) -> String {
        let draft = location(&app.get("/admin/brands/new").await);
        let response = app
            .post_multipart(&draft, &[("name_ar", "بستان"), ("name_en", name_en)])
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let response = app.post_multipart(&draft, &[("description_en", "")]).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        draft
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_health_live() {
        let app = TestApp::new(None).await;
        let response = app.get("/health/live").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_ready_follows_content_api() {
        let app = TestApp::new(None).await;
        assert_eq!(app.get("/health/ready").await.status(), StatusCode::OK);

        app.backend.set_offline(true);
        assert_eq!(
            app.get("/health/ready").await.status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[tokio::test]
    async fn test_health_full() {
        let app = TestApp::new(None).await;
        let response = app.get("/health").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["content_api"], "ok");
    }

    #[tokio::test]
    async fn test_root_redirects_to_default_locale() {
        let app = TestApp::new(None).await;
        let response = app.get("/").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/ar");
    }

    #[tokio::test]
    async fn test_home_page() {
        let app = TestApp::new(None).await;
        let response = app.get("/en").await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("Palm Oasis"));
        assert!(html.contains(r#"dir="ltr""#));
    }

    #[tokio::test]
    async fn test_arabic_pages_are_rtl() {
        let app = TestApp::new(None).await;
        let response = app.get("/ar/brands").await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains(r#"dir="rtl""#));
        assert!(html.contains("واحة النخيل"));
    }

    #[tokio::test]
    async fn test_unknown_locale_is_not_found() {
        let app = TestApp::new(None).await;
        assert_eq!(app.get("/fr/brands").await.status(), StatusCode::NOT_FOUND);
        assert_eq!(app.get("/fr").await.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_missing_records_are_not_found() {
        let app = TestApp::new(None).await;
        let response = app.get("/en/products/999").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_text(response).await.contains("<html"));

        assert_eq!(app.get("/en/recipes/abc").await.status(), StatusCode::NOT_FOUND);
        assert_eq!(app.get("/en/nowhere/at/all").await.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_content_api_outage_renders_error_page() {
        let app = TestApp::new(None).await;
        app.backend.set_offline(true);
        let response = app.get("/en/brands").await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert!(body_text(response).await.contains("<html"));
    }

    #[tokio::test]
    async fn test_brand_and_product_pages() {
        let app = TestApp::new(None).await;
        let cms = Cms::new(app.backend.clone());
        let brands = cms.list_raw("brands", &Filter::new()).await.unwrap();
        let products = cms.list_raw("products", &Filter::new()).await.unwrap();

        let response = app.get(&format!("/en/brands/{}", brands[0]["id"])).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = app.get(&format!("/en/products/{}", products[0]["id"])).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_recipes_and_dishes_pages() {
        let app = TestApp::new(None).await;
        let response = app.get("/en/recipes").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Chicken Kabsa"));

        assert_eq!(app.get("/en/recipes?dish=oops").await.status(), StatusCode::OK);
        assert_eq!(app.get("/en/dishes").await.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_catalog_download() {
        let app = TestApp::new(None).await;
        assert_eq!(app.get("/en/catalog.pdf").await.status(), StatusCode::NOT_FOUND);

        Cms::new(app.backend.clone())
            .store_catalog(UploadedFile {
                file_name: "spring.pdf".to_string(),
                content_type: "application/pdf".to_string(),
                bytes: b"%PDF-1.4 catalog".to_vec(),
            })
            .await
            .unwrap();

        let response = app.get("/ar/catalog.pdf").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"catalog.pdf\""
        );
        assert_eq!(body_text(response).await, "%PDF-1.4 catalog");
    }

    #[tokio::test]
    async fn test_contact_form_validation() {
        let app = TestApp::new(None).await;
        assert_eq!(app.get("/en/contact").await.status(), StatusCode::OK);

        let response = app
            .post_form("/en/contact", "name=Sara&email=not-an-email&subject=Hi&message=Hello")
            .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let html = body_text(response).await;
        assert!(html.contains("not-an-email"));
        assert_eq!(app.count("contact").await, 0);
    }

    #[tokio::test]
    async fn test_contact_form_success_redirects_with_flash() {
        let app = TestApp::new(None).await;
        let response = app
            .post_form(
                "/en/contact",
                "name=Sara&email=sara%40example.com&subject=Wholesale&message=Hello",
            )
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/en/contact");
        assert!(set_cookies(&response).iter().any(|c| c.starts_with("_flash=")));
        assert_eq!(app.count("contact").await, 1);
    }

    #[tokio::test]
    async fn test_contact_form_outage_keeps_values() {
        let app = TestApp::new(None).await;
        app.backend.set_offline(true);
        let response = app
            .post_form(
                "/en/contact",
                "name=Sara&email=sara%40example.com&subject=Wholesale&message=Hello",
            )
            .await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert!(body_text(response).await.contains("Wholesale"));
    }

    #[tokio::test]
    async fn test_careers_form_with_cv() {
        let app = TestApp::new(None).await;
        let response = app
            .post_multipart_with_file(
                "/en/careers",
                &[
                    ("full_name", "Omar Ali"),
                    ("email", "omar@example.com"),
                    ("phone", "+966500000000"),
                    ("position", "Chef"),
                ],
                Some(("cv", "cv.pdf", "application/pdf", b"%PDF-1.4 cv")),
            )
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let stored = Cms::new(app.backend.clone())
            .list_raw("careers", &Filter::new())
            .await
            .unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0]["cv_url"], "/uploads/1/cv.pdf");
    }

    #[tokio::test]
    async fn test_admin_requires_login_when_token_set() {
        let app = TestApp::new(Some("s3cret")).await;

        let response = app.get("/admin").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/admin/login");
        assert_eq!(app.get("/admin/login").await.status(), StatusCode::OK);

        let response = app.post_form("/admin/login", "token=wrong").await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app.post_form("/admin/login", "token=s3cret").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let cookie = set_cookies(&response)
            .into_iter()
            .find(|c| c.starts_with("maeda_admin="))
            .unwrap();
        assert!(cookie.contains("HttpOnly"));
        let pair = cookie.split(';').next().unwrap().to_string();

        let response = app
            .send(
                Request::builder()
                    .uri("/admin")
                    .header(header::COOKIE, pair)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_admin_open_without_token() {
        let app = TestApp::new(None).await;
        let response = app.get("/admin").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("/admin/brands"));

        let response = app.get("/admin/recipes").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Chicken Kabsa"));

        assert_eq!(app.get("/admin/widgets").await.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_dish_wizard_flow() {
        let app = TestApp::new(None).await;
        let before = app.count("dishes").await;

        let response = app.get("/admin/dishes/new").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let draft = location(&response);
        assert!(draft.starts_with("/admin/drafts/"));
        assert_eq!(app.get(&draft).await.status(), StatusCode::OK);

        // missing Arabic name keeps the editor on the first step
        let response = app
            .post_multipart(&draft, &[("name_ar", ""), ("name_en", "Lentil Soup")])
            .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body_text(response).await.contains("Lentil Soup"));

        let response = app
            .post_multipart(&draft, &[("name_ar", "شوربة عدس"), ("name_en", "Lentil Soup")])
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let response = app
            .post_multipart(&draft, &[("description_en", "Warm and simple")])
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let response = app.get(&draft).await;
        assert!(body_text(response).await.contains("Warm and simple"));

        // unconfirmed submissions send nothing
        let response = app
            .post_multipart(&format!("{}/submit", draft), &[("note", "")])
            .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(app.count("dishes").await, before);

        let response = app
            .post_multipart(&format!("{}/submit", draft), &[("confirm", "on")])
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/admin/dishes");
        assert_eq!(app.count("dishes").await, before + 1);

        // the draft is gone once saved
        let response = app.get(&draft).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/admin");
    }

    #[tokio::test]
    async fn test_wizard_step_jump_limited_to_reached_steps() {
        let app = TestApp::new(None).await;
        let draft = location(&app.get("/admin/dishes/new").await);

        let response = app.get(&format!("{}?step=1", draft)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains(r#"name="name_en""#));
        assert!(!html.contains(r#"name="description_en""#));
    }

    #[tokio::test]
    async fn test_edit_wizard_prefills_record() {
        let app = TestApp::new(None).await;
        let cms = Cms::new(app.backend.clone());
        let brands = cms.list_raw("brands", &Filter::new()).await.unwrap();
        let id = brands
            .iter()
            .find(|b| b["name_en"] == "Palm Oasis")
            .and_then(|b| b["id"].as_i64())
            .unwrap();

        let response = app.get(&format!("/admin/brands/{}/edit", id)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let html = body_text(app.get(&location(&response)).await).await;
        assert!(html.contains("Palm Oasis"));
    }

    #[tokio::test]
    async fn test_admin_delete() {
        let app = TestApp::new(None).await;
        let cms = Cms::new(app.backend.clone());
        let recipes = cms.list_raw("recipes", &Filter::new()).await.unwrap();
        let id = recipes[0]["id"].as_i64().unwrap();

        let response = app
            .post_form(&format!("/admin/recipes/{}/delete", id), "")
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/admin/recipes");
        assert_eq!(app.count("recipes").await, recipes.len() - 1);
    }

    #[tokio::test]
    async fn test_admin_catalog_upload() {
        let app = TestApp::new(None).await;

        let response = app
            .post_multipart_with_file(
                "/admin/catalog",
                &[],
                Some(("catalog", "notes.txt", "text/plain", b"plain text")),
            )
            .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let response = app
            .post_multipart_with_file(
                "/admin/catalog",
                &[],
                Some(("catalog", "2025.pdf", "application/pdf", b"%PDF-1.7 new")),
            )
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(app.get("/en/catalog.pdf").await.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_admin_upload_rejects_documents() {
        let app = TestApp::new(None).await;
        let response = app
            .post_multipart_with_file(
                "/admin/upload",
                &[],
                Some(("file", "cv.pdf", "application/pdf", b"%PDF-1.4")),
            )
            .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_admin_outage_renders_admin_error_page() {
        let app = TestApp::new(None).await;
        let draft = location(&app.get("/admin/categories/new").await);
        let message = crate::i18n::t(Locale::En, "admin_load_failed");

        app.backend.set_offline(true);

        for uri in ["/admin/recipes", "/admin/brands/1/edit", draft.as_str()] {
            let response = app.get(uri).await;
            assert_eq!(response.status(), StatusCode::BAD_GATEWAY, "{}", uri);
            assert!(is_html(&response), "{}", uri);
            assert!(body_text(response).await.contains(message), "{}", uri);
        }

        let response = app
            .post_multipart(&draft, &[("name_ar", ""), ("name_en", "Spices")])
            .await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert!(is_html(&response));

        // what was typed during the outage is still there afterwards
        app.backend.set_offline(false);
        let response = app.get(&draft).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Spices"));
    }

    #[tokio::test]
    async fn test_admin_unknown_kind_renders_admin_page() {
        let app = TestApp::new(None).await;
        for uri in ["/admin/widgets", "/admin/widgets/new", "/admin/brands/abc/edit"] {
            let response = app.get(uri).await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", uri);
            assert!(is_html(&response), "{}", uri);
        }
    }

    #[tokio::test]
    async fn test_brand_wizard_stores_compressed_logo() {
        let app = TestApp::new(None).await;
        let draft = brand_draft_at_media_step(&app, "Date Grove").await;

        let logo = png(40, 20);
        let response = app
            .post_multipart_with_file(&draft, &[], Some(("logo", "logo.png", "image/png", &logo)))
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let response = app
            .post_multipart(&format!("{}/submit", draft), &[("confirm", "on")])
            .await;
        assert_eq!(location(&response), "/admin/brands");

        let brand = app.find("brands", "Date Grove").await;
        assert!(brand["logo"]
            .as_str()
            .unwrap()
            .starts_with("data:image/jpeg;base64,"));
    }

    #[tokio::test]
    async fn test_wizard_rejected_media_stays_on_step() {
        let app = TestApp::new(None).await;
        let draft = brand_draft_at_media_step(&app, "Olive Row").await;

        let response = app
            .post_multipart_with_file(
                &draft,
                &[],
                Some(("logo", "logo.pdf", "application/pdf", b"%PDF-1.4")),
            )
            .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let html = body_text(response).await;
        assert!(html.contains(r#"name="logo""#));
        assert!(html.contains(crate::i18n::t(Locale::En, "form_invalid_file")));

        let html = body_text(app.get(&draft).await).await;
        assert!(html.contains(r#"name="logo""#));
        assert!(!html.contains(r#"name="confirm""#));
    }

    #[tokio::test]
    async fn test_media_step_has_upload_error_slot() {
        let app = TestApp::new(None).await;
        let draft = brand_draft_at_media_step(&app, "Cedar Mill").await;

        let html = body_text(app.get(&draft).await).await;
        let slot = format!(
            r#"data-upload-error="{}""#,
            crate::i18n::t(Locale::En, "admin_upload_failed")
        );
        // one per media field: logo, banner and video
        assert_eq!(html.matches(&slot).count(), 3);
    }

    #[tokio::test]
    async fn test_wizard_media_url_and_clear() {
        let app = TestApp::new(None).await;
        let draft = brand_draft_at_media_step(&app, "Saffron House").await;

        let response = app
            .post_multipart(
                &draft,
                &[
                    ("logo_url", "https://cdn.example.com/logo.png"),
                    ("banner_url", "https://cdn.example.com/banner.jpg"),
                ],
            )
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        // back on the media step: no new logo keeps the stored one
        assert_eq!(app.get(&format!("{}?step=2", draft)).await.status(), StatusCode::OK);
        let response = app.post_multipart(&draft, &[("banner_clear", "on")]).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let response = app
            .post_multipart(&format!("{}/submit", draft), &[("confirm", "on")])
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let brand = app.find("brands", "Saffron House").await;
        assert_eq!(brand["logo"], "https://cdn.example.com/logo.png");
        assert!(brand["banner"].is_null());
    }

    #[tokio::test]
    async fn test_admin_upload_returns_url() {
        let app = TestApp::new(None).await;
        let logo = png(8, 8);
        let response = app
            .post_multipart_with_file(
                "/admin/upload",
                &[],
                Some(("file", "logo.png", "image/png", &logo)),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert!(body["url"]
            .as_str()
            .unwrap()
            .starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn test_body_limit_covers_largest_upload() {
        let config = Config::default();
        assert!(body_limit(&config) > config.media.max_video_bytes);
        assert!(body_limit(&config) > config.catalog.max_bytes);
    }
}

//! # Maeda
//!
//! Bilingual (Arabic/English) website for a food company: brands, products,
//! recipes and dishes, public contact/careers/export forms, a downloadable
//! PDF catalog and a wizard-driven admin back office. Pages are rendered
//! server-side; all content lives behind an external content API.
//!
//! ## Modules
//!
//! - [`content`]: Domain records, locales and localized views
//! - [`cms`]: Content API client (HTTP and in-memory backends)
//! - [`pages`]: Data assembly for each public page
//! - [`forms`]: Public form schemas and validation
//! - [`media`]: Image compression and upload handling
//! - [`catalog`]: PDF catalog upload and download
//! - [`wizard`]: Multi-step admin editing with drafts
//! - [`web`]: Axum router, handlers and sessions
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use maeda::cms::{seed_demo_content, Cms, MemoryBackend};
//! use maeda::{AppState, Config};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let backend = Arc::new(MemoryBackend::new());
//!     seed_demo_content(backend.as_ref()).await?;
//!
//!     let state = AppState::new(Config::default(), Cms::new(backend))?;
//!     maeda::serve(state).await?;
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod cms;
pub mod config;
pub mod content;
pub mod forms;
pub mod i18n;
pub mod media;
pub mod pages;
pub mod render;
pub mod web;
pub mod wizard;

pub use catalog::{CatalogError, CatalogService};
pub use cms::{Cms, CmsBackend, CmsError, CmsResult, HttpBackend, MemoryBackend};
pub use config::{Config, ConfigError};
pub use content::{Id, Locale};
pub use media::{MediaError, MediaKind, MediaStore};
pub use render::{RenderError, Renderer};
pub use web::{build_router, serve, AppState, WebError, WebResult};
pub use wizard::{Draft, DraftStore, EntityKind};

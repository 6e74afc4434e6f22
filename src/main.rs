//! Maeda web server
//!
//! Run with: cargo run --bin maeda -- [--config path] [--demo]
//!
//! Configuration is read from `--config`, or else from the default
//! locations (see [`Config::load_default`]), with `MAEDA_*` environment
//! overrides on top. `RUST_LOG` takes precedence over `logging.level`.
//!
//! `--demo` serves seeded in-memory content instead of the content API.

use clap::Parser;
use maeda::cms::{seed_demo_content, Cms, MemoryBackend};
use maeda::config::{Config, LoggingConfig};
use maeda::web::{self, AppState};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "maeda")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Bilingual brand, product and recipe website")]
struct Args {
    /// Config file (default: search the standard locations)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Serve built-in demo content from memory
    #[arg(long)]
    demo: bool,
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("maeda={level},tower_http={level}", level = logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };

    init_tracing(&config.logging);

    tracing::info!("Starting Maeda v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        default_locale = %config.site.default_locale.code(),
        media_mode = ?config.media.mode,
        "Site configured"
    );

    if config.admin.token.is_none() {
        tracing::warn!("No admin token configured; the back office at /admin is open");
    }

    let cms = if args.demo {
        tracing::info!("Demo mode: serving in-memory content");
        let backend = Arc::new(MemoryBackend::new());
        seed_demo_content(backend.as_ref()).await?;
        Cms::new(backend)
    } else {
        tracing::info!("Content API: {}", config.cms.base_url);
        let cms = Cms::http(&config.cms)?;
        match cms.health_check().await {
            Ok(()) => tracing::info!("Content API reachable"),
            Err(e) => tracing::warn!("Content API not available: {} (pages will fail until it is)", e),
        }
        cms
    };

    let state = AppState::new(config, cms)?;
    web::serve(state).await?;

    tracing::info!("Maeda stopped");
    Ok(())
}

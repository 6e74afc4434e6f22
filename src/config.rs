//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::content::Locale;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub site: SiteConfig,

    #[serde(default)]
    pub cms: CmsConfig,

    #[serde(default)]
    pub admin: AdminConfig,

    #[serde(default)]
    pub media: MediaConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub cors_origins: Vec<String>,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl ServerConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Public site configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Locale `/` redirects to
    #[serde(default)]
    pub default_locale: Locale,

    /// Locale the back office is rendered in
    #[serde(default = "default_admin_locale")]
    pub admin_locale: Locale,

    /// Number of products shown on the home page
    #[serde(default = "default_home_products")]
    pub home_products: usize,

    /// Number of related products on a product page
    #[serde(default = "default_related_products")]
    pub related_products: usize,
}

fn default_admin_locale() -> Locale {
    Locale::En
}

fn default_home_products() -> usize {
    8
}

fn default_related_products() -> usize {
    4
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            default_locale: Locale::default(),
            admin_locale: default_admin_locale(),
            home_products: default_home_products(),
            related_products: default_related_products(),
        }
    }
}

/// Content API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CmsConfig {
    /// Base URL; collection paths are appended as `/api/{collection}`
    #[serde(default = "default_cms_url")]
    pub base_url: String,

    /// Optional bearer token sent with every request
    #[serde(default)]
    pub token: Option<String>,

    #[serde(default = "default_cms_timeout")]
    pub request_timeout_ms: u64,
}

fn default_cms_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_cms_timeout() -> u64 {
    10_000
}

impl Default for CmsConfig {
    fn default() -> Self {
        Self {
            base_url: default_cms_url(),
            token: None,
            request_timeout_ms: default_cms_timeout(),
        }
    }
}

/// Back office configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    /// Shared access token; the back office is open when unset
    #[serde(default)]
    pub token: Option<String>,

    /// How long an untouched wizard draft is kept
    #[serde(default = "default_draft_ttl")]
    pub draft_ttl_minutes: u64,
}

fn default_draft_ttl() -> u64 {
    120
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            token: None,
            draft_ttl_minutes: default_draft_ttl(),
        }
    }
}

/// Where compressed media ends up
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MediaMode {
    /// Embed as `data:` URLs in the record payload
    #[default]
    Inline,
    /// Send to `/api/upload` and store the returned URL
    Upload,
}

/// Media handling configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MediaConfig {
    #[serde(default)]
    pub mode: MediaMode,

    #[serde(default = "default_max_dimension")]
    pub max_width: u32,

    #[serde(default = "default_max_dimension")]
    pub max_height: u32,

    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,

    #[serde(default = "default_max_image_bytes")]
    pub max_image_bytes: usize,

    #[serde(default = "default_max_video_bytes")]
    pub max_video_bytes: usize,

    #[serde(default = "default_max_document_bytes")]
    pub max_document_bytes: usize,
}

fn default_max_dimension() -> u32 {
    1600
}

fn default_jpeg_quality() -> u8 {
    80
}

fn default_max_image_bytes() -> usize {
    10 * 1024 * 1024 // 10 MB
}

fn default_max_video_bytes() -> usize {
    50 * 1024 * 1024 // 50 MB
}

fn default_max_document_bytes() -> usize {
    5 * 1024 * 1024 // 5 MB
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            mode: MediaMode::default(),
            max_width: default_max_dimension(),
            max_height: default_max_dimension(),
            jpeg_quality: default_jpeg_quality(),
            max_image_bytes: default_max_image_bytes(),
            max_video_bytes: default_max_video_bytes(),
            max_document_bytes: default_max_document_bytes(),
        }
    }
}

/// Catalog PDF configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_catalog_max_bytes")]
    pub max_bytes: usize,

    /// File name offered to browsers on download
    #[serde(default = "default_catalog_file_name")]
    pub file_name: String,
}

fn default_catalog_max_bytes() -> usize {
    30 * 1024 * 1024 // 30 MB
}

fn default_catalog_file_name() -> String {
    "catalog.pdf".to_string()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            max_bytes: default_catalog_max_bytes(),
            file_name: default_catalog_file_name(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("maeda").join("config.toml")),
            Some(PathBuf::from("/etc/maeda/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Check values the types alone do not constrain
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.media.jpeg_quality) {
            return Err(ConfigError::Invalid(
                "media.jpeg_quality must be between 1 and 100".to_string(),
            ));
        }
        if self.media.max_width == 0 || self.media.max_height == 0 {
            return Err(ConfigError::Invalid(
                "media.max_width and media.max_height must be positive".to_string(),
            ));
        }
        if !self.cms.base_url.starts_with("http://") && !self.cms.base_url.starts_with("https://")
        {
            return Err(ConfigError::Invalid(format!(
                "cms.base_url must be an http(s) URL, got {}",
                self.cms.base_url
            )));
        }
        Ok(())
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // Server overrides
        if let Some(host) = lookup("MAEDA_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("MAEDA_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }

        // Site overrides
        if let Some(locale) = lookup("MAEDA_DEFAULT_LOCALE") {
            if let Ok(l) = locale.parse() {
                self.site.default_locale = l;
            }
        }

        // Content API overrides
        if let Some(url) = lookup("MAEDA_CMS_URL") {
            self.cms.base_url = url;
        }
        if let Some(token) = lookup("MAEDA_CMS_TOKEN") {
            self.cms.token = Some(token);
        }

        // Admin overrides
        if let Some(token) = lookup("MAEDA_ADMIN_TOKEN") {
            self.admin.token = Some(token);
        }

        // Logging overrides
        if let Some(level) = lookup("MAEDA_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("MAEDA_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Maeda Configuration
#
# Environment variables override these settings:
# - MAEDA_HOST
# - MAEDA_PORT
# - MAEDA_DEFAULT_LOCALE
# - MAEDA_CMS_URL
# - MAEDA_CMS_TOKEN
# - MAEDA_ADMIN_TOKEN
# - MAEDA_LOG_LEVEL
# - MAEDA_LOG_FORMAT

[server]
host = "0.0.0.0"
port = 3000

# Allowed CORS origins (empty = same origin only)
cors_origins = []

# Request timeout in seconds
request_timeout_secs = 30

[site]
# Locale "/" redirects to: "ar" or "en"
default_locale = "ar"

# Locale the back office is rendered in
admin_locale = "en"

home_products = 8
related_products = 4

[cms]
# Content API base URL
base_url = "http://localhost:8000"

# Bearer token for the content API
# token = ""

request_timeout_ms = 10000

[admin]
# Shared access token for /admin (back office is open when unset)
# token = ""

# Minutes an untouched wizard draft is kept
draft_ttl_minutes = 120

[media]
# "inline" embeds images as data URLs, "upload" sends them to /api/upload
mode = "inline"

# Images are downscaled to fit within these bounds and re-encoded as JPEG
max_width = 1600
max_height = 1600
jpeg_quality = 80

max_image_bytes = 10485760
max_video_bytes = 52428800
max_document_bytes = 5242880

[catalog]
max_bytes = 31457280
file_name = "catalog.pdf"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

//! Media Uploads
//!
//! Validation and preparation of files submitted through admin wizards and
//! public forms:
//! - images are compressed (see [`compress_image`]) and re-encoded as JPEG
//! - videos are size-checked and passed through untouched
//! - documents (CVs) are size-checked and always uploaded
//!
//! Depending on [`MediaMode`], images and videos end up either inline as
//! base64 `data:` URLs or on the content API's `/api/upload` endpoint.

mod compress;

pub use compress::{bounded_dimensions, compress_image, parse_data_url, to_data_url, CompressedImage};

use std::path::Path;
use thiserror::Error;

use crate::cms::{Cms, CmsError, UploadedFile};
use crate::config::{MediaConfig, MediaMode};

/// What an uploaded file is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
    Document,
}

const IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp", "image/gif"];
const VIDEO_TYPES: &[&str] = &["video/mp4", "video/webm"];
const DOCUMENT_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

impl MediaKind {
    /// Classify a declared content type; `None` for anything not accepted
    pub fn from_content_type(content_type: &str) -> Option<MediaKind> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        if IMAGE_TYPES.contains(&essence.as_str()) {
            Some(MediaKind::Image)
        } else if VIDEO_TYPES.contains(&essence.as_str()) {
            Some(MediaKind::Video)
        } else if DOCUMENT_TYPES.contains(&essence.as_str()) {
            Some(MediaKind::Document)
        } else {
            None
        }
    }
}

/// Errors from media validation and processing
#[derive(Error, Debug)]
pub enum MediaError {
    #[error("Empty file")]
    Empty,

    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),

    #[error("File is {size} bytes, limit is {limit}")]
    TooLarge { size: usize, limit: usize },

    #[error("Cannot decode image: {0}")]
    Decode(String),

    #[error("Cannot encode image: {0}")]
    Encode(String),

    #[error("Upload failed: {0}")]
    Upload(#[from] CmsError),
}

impl MediaError {
    /// i18n key describing this error to the person who uploaded the file
    pub fn message_key(&self) -> &'static str {
        match self {
            MediaError::UnsupportedType(_) | MediaError::Decode(_) => "form_invalid_file",
            MediaError::TooLarge { .. } => "form_file_too_large",
            MediaError::Empty => "form_required",
            MediaError::Encode(_) | MediaError::Upload(_) => "submit_failed",
        }
    }
}

/// Prepares uploaded files for storage in content records
#[derive(Clone)]
pub struct MediaStore {
    config: MediaConfig,
    cms: Cms,
}

impl MediaStore {
    pub fn new(config: MediaConfig, cms: Cms) -> Self {
        Self { config, cms }
    }

    pub fn config(&self) -> &MediaConfig {
        &self.config
    }

    /// Check that `file` is a non-empty `expected` file within its size limit
    pub fn validate(&self, file: &UploadedFile, expected: MediaKind) -> Result<(), MediaError> {
        if file.bytes.is_empty() {
            return Err(MediaError::Empty);
        }

        match MediaKind::from_content_type(&file.content_type) {
            Some(kind) if kind == expected => {}
            _ => return Err(MediaError::UnsupportedType(file.content_type.clone())),
        }

        let limit = match expected {
            MediaKind::Image => self.config.max_image_bytes,
            MediaKind::Video => self.config.max_video_bytes,
            MediaKind::Document => self.config.max_document_bytes,
        };
        if file.bytes.len() > limit {
            return Err(MediaError::TooLarge {
                size: file.bytes.len(),
                limit,
            });
        }
        Ok(())
    }

    /// Validate and store a file, returning the URL to put in the record
    pub async fn store(&self, file: UploadedFile, kind: MediaKind) -> Result<String, MediaError> {
        self.validate(&file, kind)?;

        let file = match kind {
            MediaKind::Image => self.compress(file).await?,
            MediaKind::Video | MediaKind::Document => file,
        };

        match (kind, self.config.mode) {
            (MediaKind::Document, _) | (_, MediaMode::Upload) => Ok(self.cms.upload(file).await?),
            (_, MediaMode::Inline) => Ok(to_data_url(&file.content_type, &file.bytes)),
        }
    }

    async fn compress(&self, file: UploadedFile) -> Result<UploadedFile, MediaError> {
        let (max_w, max_h, quality) = (
            self.config.max_width,
            self.config.max_height,
            self.config.jpeg_quality,
        );
        let UploadedFile {
            file_name, bytes, ..
        } = file;
        let original = bytes.len();

        let compressed =
            tokio::task::spawn_blocking(move || compress_image(&bytes, max_w, max_h, quality))
                .await
                .map_err(|e| MediaError::Encode(e.to_string()))??;

        tracing::debug!(
            original_bytes = original,
            compressed_bytes = compressed.bytes.len(),
            width = compressed.width,
            height = compressed.height,
            "Image compressed"
        );

        Ok(UploadedFile {
            file_name: jpeg_file_name(&file_name),
            content_type: CompressedImage::CONTENT_TYPE.to_string(),
            bytes: compressed.bytes,
        })
    }
}

/// `photo.png` -> `photo.jpg`
fn jpeg_file_name(name: &str) -> String {
    let stem = Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("image");
    format!("{}.jpg", stem)
}

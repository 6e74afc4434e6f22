//! Product Catalog
//!
//! The downloadable PDF catalog. Admins replace it through the back office;
//! visitors download it from `/{locale}/catalog.pdf`.

use thiserror::Error;

use crate::cms::{Cms, CmsError, UploadedFile};
use crate::config::CatalogConfig;
use crate::content::CatalogFile;

/// Every PDF starts with this header
pub const PDF_MAGIC: &[u8] = b"%PDF-";

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Errors from catalog upload and download
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Empty file")]
    Empty,

    #[error("File is not a PDF")]
    NotPdf,

    #[error("Catalog is {size} bytes, limit is {limit}")]
    TooLarge { size: usize, limit: usize },

    #[error("No catalog has been uploaded")]
    Missing,

    #[error("Content API error: {0}")]
    Cms(#[from] CmsError),
}

impl CatalogError {
    /// i18n key describing this error to the admin who uploaded the file
    pub fn message_key(&self) -> &'static str {
        match self {
            CatalogError::Empty => "form_required",
            CatalogError::NotPdf => "form_invalid_file",
            CatalogError::TooLarge { .. } => "form_file_too_large",
            CatalogError::Missing | CatalogError::Cms(_) => "admin_save_failed",
        }
    }
}

/// Check that `bytes` is a PDF no larger than `max_bytes`
pub fn validate_pdf(bytes: &[u8], max_bytes: usize) -> Result<(), CatalogError> {
    if bytes.is_empty() {
        return Err(CatalogError::Empty);
    }
    if !bytes.starts_with(PDF_MAGIC) {
        return Err(CatalogError::NotPdf);
    }
    if bytes.len() > max_bytes {
        return Err(CatalogError::TooLarge {
            size: bytes.len(),
            limit: max_bytes,
        });
    }
    Ok(())
}

/// Reduce a client-supplied name to a safe `*.pdf` file name
pub fn sanitize_file_name(name: &str, fallback: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_matches(|c| c == '.' || c == '_').to_string();

    if cleaned.is_empty() {
        return fallback.to_string();
    }
    if cleaned.to_ascii_lowercase().ends_with(".pdf") {
        cleaned
    } else {
        format!("{}.pdf", cleaned)
    }
}

/// `Content-Disposition` value that makes browsers save the file
///
/// Non-ASCII names (an Arabic catalog title, say) also get an RFC 5987
/// `filename*` with an ASCII fallback in `filename`.
pub fn attachment_disposition(file_name: &str) -> String {
    if file_name.is_ascii() {
        return format!("attachment; filename=\"{}\"", file_name.replace('"', ""));
    }
    format!(
        "attachment; filename=\"catalog.pdf\"; filename*=UTF-8''{}",
        urlencoding::encode(file_name)
    )
}

/// Catalog operations over the content API
#[derive(Clone)]
pub struct CatalogService {
    cms: Cms,
    config: CatalogConfig,
}

impl CatalogService {
    pub fn new(cms: Cms, config: CatalogConfig) -> Self {
        Self { cms, config }
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Validate and store a new catalog, replacing the current one
    pub async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<(), CatalogError> {
        validate_pdf(&bytes, self.config.max_bytes)?;

        let file_name = sanitize_file_name(file_name, &self.config.file_name);
        let size = bytes.len();
        self.cms
            .store_catalog(UploadedFile {
                file_name: file_name.clone(),
                content_type: PDF_CONTENT_TYPE.to_string(),
                bytes,
            })
            .await?;

        tracing::info!(file = %file_name, bytes = size, "Catalog uploaded");
        Ok(())
    }

    /// The current catalog, named for download
    pub async fn download(&self) -> Result<CatalogFile, CatalogError> {
        let mut file = self.cms.catalog().await?.ok_or(CatalogError::Missing)?;
        if !file.bytes.starts_with(PDF_MAGIC) {
            tracing::warn!(file = %file.file_name, "Stored catalog is not a PDF");
            return Err(CatalogError::NotPdf);
        }
        file.file_name = self.config.file_name.clone();
        file.content_type = PDF_CONTENT_TYPE.to_string();
        Ok(file)
    }

    /// Whether a catalog is currently available
    pub async fn exists(&self) -> Result<bool, CatalogError> {
        Ok(self.cms.catalog().await?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cms::MemoryBackend;
    use std::sync::Arc;

    fn service() -> CatalogService {
        let cms = Cms::new(Arc::new(MemoryBackend::new()));
        CatalogService::new(
            cms,
            CatalogConfig {
                max_bytes: 64,
                file_name: "maeda-catalog.pdf".to_string(),
            },
        )
    }

    #[test]
    fn test_validate_pdf() {
        assert!(validate_pdf(b"%PDF-1.7\n...", 64).is_ok());
        assert!(matches!(validate_pdf(b"", 64), Err(CatalogError::Empty)));
        assert!(matches!(validate_pdf(b"PK\x03\x04", 64), Err(CatalogError::NotPdf)));
        assert!(matches!(
            validate_pdf(&[b"%PDF-".as_slice(), [0u8; 100].as_slice()].concat(), 64),
            Err(CatalogError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("Catalog 2025.pdf", "c.pdf"), "Catalog_2025.pdf");
        assert_eq!(sanitize_file_name("../../etc/passwd", "c.pdf"), "passwd.pdf");
        assert_eq!(sanitize_file_name("كتالوج.pdf", "c.pdf"), "pdf.pdf");
        assert_eq!(sanitize_file_name("", "c.pdf"), "c.pdf");
    }

    #[test]
    fn test_attachment_disposition() {
        assert_eq!(
            attachment_disposition("a.pdf"),
            "attachment; filename=\"a.pdf\""
        );
        assert_eq!(
            attachment_disposition("كتالوج.pdf"),
            "attachment; filename=\"catalog.pdf\"; filename*=UTF-8''%D9%83%D8%AA%D8%A7%D9%84%D9%88%D8%AC.pdf"
        );
    }

    #[tokio::test]
    async fn test_upload_then_download() {
        let catalog = service();
        assert!(matches!(catalog.download().await, Err(CatalogError::Missing)));
        assert!(!catalog.exists().await.unwrap());

        catalog.upload("spring.pdf", b"%PDF-1.4 body".to_vec()).await.unwrap();

        let file = catalog.download().await.unwrap();
        assert_eq!(file.file_name, "maeda-catalog.pdf");
        assert_eq!(file.content_type, "application/pdf");
        assert_eq!(file.bytes, b"%PDF-1.4 body");
    }

    #[tokio::test]
    async fn test_rejected_upload_keeps_previous() {
        let catalog = service();
        catalog.upload("a.pdf", b"%PDF-1".to_vec()).await.unwrap();
        assert!(catalog.upload("b.pdf", b"GIF89a".to_vec()).await.is_err());
        assert_eq!(catalog.download().await.unwrap().bytes, b"%PDF-1");
    }
}

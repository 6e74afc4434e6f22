//! Multipart form bodies
//!
//! Reads a whole `multipart/form-data` body into text fields and files.
//! File inputs left empty by the browser are dropped.

use axum::extract::Multipart;
use std::collections::{BTreeMap, HashMap};

use super::error::WebError;
use crate::cms::UploadedFile;

#[derive(Debug, Default)]
pub struct FormData {
    pub fields: BTreeMap<String, String>,
    pub files: HashMap<String, UploadedFile>,
}

impl FormData {
    pub fn field(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or_default()
    }

    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        self.files.remove(name)
    }
}

pub async fn read_form(mut multipart: Multipart) -> Result<FormData, WebError> {
    let mut form = FormData::default();

    while let Some(field) = multipart.next_field().await.map_err(|err| {
        tracing::warn!(error = ?err, "Could not read multipart body");
        WebError::BadRequest("could not read multipart body".into())
    })? {
        let name = field.name().unwrap_or_default().to_string();

        match field.file_name().map(str::to_string) {
            Some(file_name) => {
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field.bytes().await.map_err(|err| {
                    tracing::warn!(error = ?err, field = %name, "Could not read uploaded file");
                    WebError::BadRequest("could not read uploaded file".into())
                })?;
                if bytes.is_empty() {
                    continue;
                }
                form.files.insert(
                    name,
                    UploadedFile {
                        file_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    },
                );
            }
            None => {
                let text = field.text().await.map_err(|err| {
                    tracing::warn!(error = ?err, field = %name, "Could not read form field");
                    WebError::BadRequest("could not read form field".into())
                })?;
                form.fields.insert(name, text);
            }
        }
    }

    Ok(form)
}

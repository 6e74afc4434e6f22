//! Content API REST Client
//!
//! HTTP client for the external content API. Collections live under
//! `{base_url}/api/{collection}`, records under `.../{collection}/{id}`.

use async_trait::async_trait;
use reqwest::{multipart, Client, Method, RequestBuilder, Response, StatusCode};
use serde_json::Value;

use super::error::{CmsError, CmsResult};
use super::{CmsBackend, Filter, UploadReceipt, UploadedFile};
use crate::config::CmsConfig;
use crate::content::{CatalogFile, Id};

/// Content API over HTTP
pub struct HttpBackend {
    client: Client,
    config: CmsConfig,
}

impl HttpBackend {
    /// Create a new client with the given configuration
    pub fn new(config: CmsConfig) -> CmsResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self { client, config })
    }

    /// Get the current configuration
    pub fn config(&self) -> &CmsConfig {
        &self.config
    }

    fn collection_url(&self, collection: &str) -> String {
        format!(
            "{}/api/{}",
            self.config.base_url.trim_end_matches('/'),
            collection
        )
    }

    fn record_url(&self, collection: &str, id: Id) -> String {
        format!("{}/{}", self.collection_url(collection), id)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.config.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a request and turn transport failures and error statuses into `CmsError`
    async fn send(&self, builder: RequestBuilder, what: &str) -> CmsResult<Response> {
        let response = builder.send().await.map_err(map_transport_error)?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(CmsError::NotFound(what.to_string()));
        }

        let text = response.text().await.unwrap_or_default();
        tracing::warn!(status = status.as_u16(), target = %what, "Content API returned an error");
        Err(CmsError::Api {
            status: status.as_u16(),
            message: text,
        })
    }

    async fn send_json(&self, builder: RequestBuilder, what: &str) -> CmsResult<Value> {
        let response = self.send(builder, what).await?;
        let value: Value = response.json().await?;
        Ok(unwrap_data(value))
    }
}

fn map_transport_error(e: reqwest::Error) -> CmsError {
    if e.is_timeout() {
        CmsError::Timeout
    } else if e.is_connect() {
        CmsError::Unavailable
    } else {
        CmsError::Request(e)
    }
}

/// Accept both bare payloads and `{ "data": ... }` envelopes
pub(crate) fn unwrap_data(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Interpret a list response
pub(crate) fn into_list(value: Value) -> CmsResult<Vec<Value>> {
    match unwrap_data(value) {
        Value::Array(items) => Ok(items),
        other => Err(CmsError::Decode(format!(
            "expected a list, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

/// Pull the file name out of a Content-Disposition header, preferring the
/// percent-encoded `filename*=UTF-8''...` form
pub(crate) fn disposition_file_name(header: &str) -> Option<String> {
    let parts: Vec<&str> = header.split(';').map(str::trim).collect();

    let extended = parts.iter().find_map(|part| {
        let value = part.strip_prefix("filename*=")?;
        let encoded = value.split_once("''").map_or(value, |(_, rest)| rest);
        urlencoding::decode(encoded).ok().map(|name| name.into_owned())
    });

    extended
        .or_else(|| {
            parts.iter().find_map(|part| {
                part.strip_prefix("filename=")
                    .map(|name| name.trim_matches('"').to_string())
            })
        })
        .filter(|name| !name.is_empty())
}

fn file_part(file: UploadedFile) -> CmsResult<multipart::Part> {
    Ok(multipart::Part::bytes(file.bytes)
        .file_name(file.file_name)
        .mime_str(&file.content_type)?)
}

#[async_trait]
impl CmsBackend for HttpBackend {
    async fn list(&self, collection: &str, filter: &Filter) -> CmsResult<Vec<Value>> {
        let url = self.collection_url(collection);
        let builder = self.request(Method::GET, &url).query(filter.pairs());
        let value = self.send_json(builder, collection).await?;
        into_list(value)
    }

    async fn fetch(&self, collection: &str, id: Id) -> CmsResult<Value> {
        let url = self.record_url(collection, id);
        let what = format!("{}/{}", collection, id);
        self.send_json(self.request(Method::GET, &url), &what).await
    }

    async fn create(&self, collection: &str, body: Value) -> CmsResult<Value> {
        let url = self.collection_url(collection);
        let value = self
            .send_json(self.request(Method::POST, &url).json(&body), collection)
            .await?;
        tracing::info!(collection = %collection, "Record created");
        Ok(value)
    }

    async fn update(&self, collection: &str, id: Id, body: Value) -> CmsResult<Value> {
        let url = self.record_url(collection, id);
        let what = format!("{}/{}", collection, id);
        let value = self
            .send_json(self.request(Method::PUT, &url).json(&body), &what)
            .await?;
        tracing::info!(collection = %collection, id, "Record updated");
        Ok(value)
    }

    async fn delete(&self, collection: &str, id: Id) -> CmsResult<()> {
        let url = self.record_url(collection, id);
        let what = format!("{}/{}", collection, id);
        self.send(self.request(Method::DELETE, &url), &what).await?;
        tracing::info!(collection = %collection, id, "Record deleted");
        Ok(())
    }

    async fn upload(&self, file: UploadedFile) -> CmsResult<UploadReceipt> {
        let url = self.collection_url("upload");
        let form = multipart::Form::new().part("file", file_part(file)?);
        let value = self
            .send_json(self.request(Method::POST, &url).multipart(form), "upload")
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn catalog(&self) -> CmsResult<Option<CatalogFile>> {
        let url = self.collection_url("catalog");
        let builder = self
            .request(Method::GET, &url)
            .header(reqwest::header::ACCEPT, "application/pdf");

        let response = match self.send(builder, "catalog").await {
            Ok(response) => response,
            Err(CmsError::NotFound(_)) => return Ok(None),
            Err(e) => return Err(e),
        };

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !content_type.starts_with("application/pdf") {
            return Err(CmsError::UnexpectedContentType(content_type));
        }

        let file_name = response
            .headers()
            .get(reqwest::header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(disposition_file_name)
            .unwrap_or_else(|| "catalog.pdf".to_string());

        let bytes = response.bytes().await?.to_vec();
        Ok(Some(CatalogFile {
            file_name,
            content_type: "application/pdf".to_string(),
            bytes,
        }))
    }

    async fn store_catalog(&self, file: UploadedFile) -> CmsResult<()> {
        let url = self.collection_url("catalog");
        let size = file.bytes.len();
        let form = multipart::Form::new().part("file", file_part(file)?);
        self.send(self.request(Method::POST, &url).multipart(form), "catalog")
            .await?;
        tracing::info!(bytes = size, "Catalog stored");
        Ok(())
    }

    async fn health_check(&self) -> CmsResult<()> {
        let url = self.collection_url("brands");
        let response = self
            .request(Method::GET, &url)
            .send()
            .await
            .map_err(map_transport_error)?;

        if response.status().is_server_error() {
            Err(CmsError::Unavailable)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn backend(base_url: &str) -> HttpBackend {
        HttpBackend::new(CmsConfig {
            base_url: base_url.to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_urls() {
        let b = backend("http://cms.local/");
        assert_eq!(b.collection_url("dish-categories"), "http://cms.local/api/dish-categories");
        assert_eq!(b.record_url("brands", 5), "http://cms.local/api/brands/5");
    }

    #[test]
    fn test_unwrap_data_envelope() {
        assert_eq!(unwrap_data(json!({"data": {"id": 1}})), json!({"id": 1}));
        assert_eq!(unwrap_data(json!({"id": 1})), json!({"id": 1}));
    }

    #[test]
    fn test_into_list() {
        assert_eq!(into_list(json!([1, 2])).unwrap().len(), 2);
        assert_eq!(into_list(json!({"data": [1]})).unwrap().len(), 1);
        assert!(matches!(into_list(json!({"id": 1})), Err(CmsError::Decode(_))));
    }

    #[test]
    fn test_disposition_file_name() {
        assert_eq!(
            disposition_file_name("attachment; filename=\"maeda-2025.pdf\""),
            Some("maeda-2025.pdf".to_string())
        );
        assert_eq!(
            disposition_file_name(
                "attachment; filename=\"catalog.pdf\"; filename*=UTF-8''%D9%83%D8%AA%D8%A7%D9%84%D9%88%D8%AC.pdf"
            ),
            Some("كتالوج.pdf".to_string())
        );
        assert_eq!(disposition_file_name("inline"), None);
    }

    #[tokio::test]
    async fn test_unreachable_api() {
        // Port 9 (discard) is closed on test machines
        let b = backend("http://127.0.0.1:9");
        let err = b.list("brands", &Filter::new()).await.unwrap_err();
        assert!(matches!(
            err,
            CmsError::Unavailable | CmsError::Timeout | CmsError::Request(_)
        ));
    }
}

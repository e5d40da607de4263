//! HTTP client for the ordering API

use crate::{ClientConfig, ClientError, ClientResult};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, IntoUrl, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use shared::models::{Category, OrderRecord, Product};
use shared::response::{ApiEnvelope, ErrorBody};
use shared::{AppError, ErrorCode, OrderSubmission};

/// Upload target folders accepted by `POST /api/uploads/{kind}`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Productos,
    Categorias,
}

impl UploadKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Productos => "productos",
            Self::Categorias => "categorias",
        }
    }
}

/// Result of a file upload
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct UploadedFile {
    #[serde(alias = "path")]
    pub url: String,
    #[serde(default)]
    pub filename: Option<String>,
}

/// HTTP client for making requests to the ordering backend
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Base URL extended with `segments`, each percent-encoded as a single
    /// path segment (`/` and `?` included)
    fn segment_url(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.get_url(self.url(path)).await
    }

    async fn get_url<T: DeserializeOwned>(&self, url: impl IntoUrl) -> ClientResult<T> {
        let response = self.client.get(url).send().await?;
        Self::handle_response(response).await
    }

    /// Make a POST request with JSON body
    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> ClientResult<T> {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        Self::handle_response(response).await
    }

    /// Make a PUT request with JSON body
    pub async fn put<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> ClientResult<T> {
        let response = self.client.put(self.url(path)).json(body).send().await?;
        Self::handle_response(response).await
    }

    /// Handle the HTTP response
    ///
    /// Non-2xx bodies are read as `{ error }` and surfaced as
    /// [`ClientError::Backend`]. Success bodies are either the
    /// `{ success, data }` envelope or the bare payload.
    async fn handle_response<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&text)
                .ok()
                .and_then(ErrorBody::into_message);
            tracing::warn!(status = status.as_u16(), message = ?message, "Backend rejected request");
            return Err(ClientError::backend(status.as_u16(), message));
        }

        let body: Value = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text)?
        };
        Self::unwrap_envelope(status.as_u16(), body)
    }

    fn unwrap_envelope<T: DeserializeOwned>(status: u16, body: Value) -> ClientResult<T> {
        let is_envelope = body
            .as_object()
            .map(|o| o.contains_key("success") || o.contains_key("data"))
            .unwrap_or(false);
        if !is_envelope {
            return Ok(serde_json::from_value(body)?);
        }

        let envelope: ApiEnvelope<Value> = serde_json::from_value(body)?;
        if !envelope.success && envelope.data.is_none() {
            let message = envelope.error_message().map(str::to_string);
            return Err(ClientError::backend(status, message));
        }
        Ok(serde_json::from_value(envelope.data.unwrap_or(Value::Null))?)
    }

    // ========== Catalog API ==========

    /// Products visible on the public menu
    pub async fn fetch_public_products(&self) -> ClientResult<Vec<Product>> {
        self.get("/api/productos-publicos").await
    }

    /// Categories currently enabled
    pub async fn fetch_active_categories(&self) -> ClientResult<Vec<Category>> {
        self.get("/api/categorias-activas").await
    }

    /// Products of one type (e.g. "pizza", "bebida")
    pub async fn fetch_products_by_type(&self, tipo: &str) -> ClientResult<Vec<Product>> {
        let url = self.segment_url(&["api", "productos", "tipo", tipo])?;
        self.get_url(url).await
    }

    // ========== Orders API ==========

    /// Submit an order; returns the created record when the backend sends it
    ///
    /// The order is accepted once the backend answers 2xx, so a record that
    /// does not decode is logged and reported as `None` rather than as a
    /// failure the caller would retry.
    pub async fn create_order(&self, submission: &OrderSubmission) -> ClientResult<Option<OrderRecord>> {
        let created: Value = self.post("/api/orders", submission).await?;
        Ok(Self::created_record(created))
    }

    fn created_record(created: Value) -> Option<OrderRecord> {
        if created.is_null() {
            return None;
        }
        match serde_json::from_value(created.clone()) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(error = %e, body = %created, "Created order record could not be decoded");
                None
            }
        }
    }

    pub async fn list_orders(&self) -> ClientResult<Vec<OrderRecord>> {
        self.get("/api/orders").await
    }

    pub async fn get_order(&self, id: i64) -> ClientResult<OrderRecord> {
        self.get(&format!("/api/orders/{}", id)).await
    }

    /// Change an order's status; `status` must be a backend code
    pub async fn update_order_status(&self, id: i64, status: &str) -> ClientResult<()> {
        #[derive(Serialize)]
        struct StatusRequest<'a> {
            status: &'a str,
        }

        let _: Value = self
            .put(&format!("/api/orders/{}/status", id), &StatusRequest { status })
            .await?;
        Ok(())
    }

    // ========== Uploads API ==========

    /// Upload an image as multipart field `file`
    pub async fn upload_file(
        &self,
        kind: UploadKind,
        filename: &str,
        bytes: Vec<u8>,
    ) -> ClientResult<UploadedFile> {
        if filename.trim().is_empty() {
            return Err(AppError::new(ErrorCode::NoFilename).into());
        }
        if bytes.is_empty() {
            return Err(AppError::new(ErrorCode::EmptyFile).into());
        }

        let part = Part::bytes(bytes).file_name(filename.to_string());
        let form = Form::new().part("file", part);
        let response = self
            .client
            .post(self.url(&format!("/api/uploads/{}", kind.as_str())))
            .multipart(form)
            .send()
            .await?;
        Self::handle_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_url_join() {
        let client = HttpClient::new(&ClientConfig::new("http://api.local/")).unwrap();
        assert_eq!(client.url("/api/orders"), "http://api.local/api/orders");
        assert_eq!(client.url("api/orders"), "http://api.local/api/orders");
    }

    #[test]
    fn test_unwrap_envelope() {
        let data: Vec<i64> =
            HttpClient::unwrap_envelope(200, json!({"success": true, "data": [1, 2]})).unwrap();
        assert_eq!(data, vec![1, 2]);

        let bare: Vec<i64> = HttpClient::unwrap_envelope(200, json!([3])).unwrap();
        assert_eq!(bare, vec![3]);

        let err = HttpClient::unwrap_envelope::<Value>(200, json!({"success": false, "error": "No"}))
            .unwrap_err();
        assert_eq!(err.to_string(), "No");
    }

    #[test]
    fn test_segment_url_escapes_each_segment() {
        let client = HttpClient::new(&ClientConfig::new("http://api.local/")).unwrap();
        let url = client
            .segment_url(&["api", "productos", "tipo", "a/b?c#d e"])
            .unwrap();
        assert_eq!(url.as_str(), "http://api.local/api/productos/tipo/a%2Fb%3Fc%23d%20e");

        let client = HttpClient::new(&ClientConfig::new("http://api.local/backend")).unwrap();
        let url = client.segment_url(&["api", "productos", "tipo", "pizza"]).unwrap();
        assert_eq!(url.as_str(), "http://api.local/backend/api/productos/tipo/pizza");
    }

    #[test]
    fn test_segment_url_rejects_bad_base() {
        let client = HttpClient::new(&ClientConfig::new("not a url")).unwrap();
        let err = client.segment_url(&["api"]).unwrap_err();
        assert!(matches!(err, ClientError::InvalidUrl(_)));
    }

    #[test]
    fn test_created_record() {
        assert!(HttpClient::created_record(Value::Null).is_none());
        let record = HttpClient::created_record(json!({"id": 4, "estado": "pendiente"})).unwrap();
        assert_eq!(record.id, 4);
        // Accepted but unreadable record
        assert!(HttpClient::created_record(json!({"id": "cuatro"})).is_none());
    }

    #[test]
    fn test_upload_kind() {
        assert_eq!(UploadKind::Productos.as_str(), "productos");
        assert_eq!(UploadKind::Categorias.as_str(), "categorias");
    }
}

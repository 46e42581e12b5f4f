use std::time::Duration;

use log::debug;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, Url};
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::{AnalyzeResponse, RegisterReceipt, RegisteredUser, UserList};
use crate::shared::constants::{DEFAULT_BASE_URL, HEALTH_TIMEOUT, REQUEST_TIMEOUT};
use crate::shared::detection::DetectionResult;

/// Where the backend lives and how patient to be with it.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Origin only (`http://host:port`); paths are built on top.
    pub base_url: String,
    pub request_timeout: Duration,
    pub health_timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: REQUEST_TIMEOUT,
            health_timeout: HEALTH_TIMEOUT,
        }
    }
}

impl ApiConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

#[derive(Deserialize)]
struct HealthStatus {
    status: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: String,
}

/// Async client for the recognition backend. Cheap to clone; every
/// operation except [`ApiClient::health`] runs under the client-level
/// timeout and is never retried.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    base: Url,
    health_timeout: Duration,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let base = Url::parse(config.base_url.trim_end_matches('/')).map_err(|e| {
            ApiError::BadUrl {
                url: config.base_url.clone(),
                reason: e.to_string(),
            }
        })?;
        if base.cannot_be_a_base() {
            return Err(ApiError::BadUrl {
                url: config.base_url.clone(),
                reason: "not a usable http origin".to_string(),
            });
        }
        let http = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self {
            http,
            base,
            health_timeout: config.health_timeout,
        })
    }

    /// True iff the backend answers `{"status": "healthy"}` within the
    /// probe timeout. Never errors: every failure mode is just "offline".
    pub async fn health(&self) -> bool {
        let request = self
            .http
            .get(self.endpoint(&["health"]))
            .timeout(self.health_timeout);
        match request.send().await {
            Ok(response) => {
                matches!(response.json::<HealthStatus>().await, Ok(h) if h.status == "healthy")
            }
            Err(e) => {
                debug!("health probe failed: {e}");
                false
            }
        }
    }

    /// Run one frame through recognition; results come back in the order
    /// the backend found them.
    pub async fn analyze(&self, jpeg: Vec<u8>) -> Result<Vec<DetectionResult>, ApiError> {
        let form = Form::new().part("file", jpeg_part(jpeg, "capture.jpg".to_string())?);
        let response = self
            .http
            .post(self.endpoint(&["api", "predict"]))
            .multipart(form)
            .send()
            .await?;
        let body: AnalyzeResponse = checked(response).await?.json().await?;
        Ok(body.results)
    }

    /// Register one face image under `name`.
    pub async fn register(&self, name: &str, jpeg: Vec<u8>) -> Result<RegisterReceipt, ApiError> {
        let form = Form::new()
            .text("name", name.to_string())
            .part("file", jpeg_part(jpeg, "face_0.jpg".to_string())?);
        let response = self
            .http
            .post(self.endpoint(&["api", "register"]))
            .multipart(form)
            .send()
            .await?;
        Ok(checked(response).await?.json().await?)
    }

    /// Register several face images under `name` in one call.
    pub async fn register_multiple(
        &self,
        name: &str,
        jpegs: Vec<Vec<u8>>,
    ) -> Result<RegisterReceipt, ApiError> {
        let mut form = Form::new().text("name", name.to_string());
        for (index, jpeg) in jpegs.into_iter().enumerate() {
            form = form.part("files", jpeg_part(jpeg, format!("face_{index}.jpg"))?);
        }
        let response = self
            .http
            .post(self.endpoint(&["api", "register", "multiple"]))
            .multipart(form)
            .send()
            .await?;
        Ok(checked(response).await?.json().await?)
    }

    pub async fn list_users(&self) -> Result<UserList, ApiError> {
        let response = self
            .http
            .get(self.endpoint(&["api", "users"]))
            .send()
            .await?;
        Ok(checked(response).await?.json().await?)
    }

    pub async fn get_user(&self, name: &str) -> Result<RegisteredUser, ApiError> {
        let response = self
            .http
            .get(self.endpoint(&["api", "users", name]))
            .send()
            .await?;
        Ok(checked(response).await?.json().await?)
    }

    pub async fn rename_user(&self, name: &str, new_name: &str) -> Result<(), ApiError> {
        let form = Form::new().text("new_name", new_name.to_string());
        let response = self
            .http
            .put(self.endpoint(&["api", "users", name]))
            .multipart(form)
            .send()
            .await?;
        checked(response).await?;
        Ok(())
    }

    pub async fn delete_user(&self, name: &str) -> Result<(), ApiError> {
        let response = self
            .http
            .delete(self.endpoint(&["api", "users", name]))
            .send()
            .await?;
        checked(response).await?;
        Ok(())
    }

    /// Build an endpoint URL. Segments go through the path-segment API so
    /// user names survive as single segments, Unicode and embedded `/`
    /// included.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments.iter().copied());
        }
        url
    }
}

fn jpeg_part(jpeg: Vec<u8>, filename: String) -> Result<Part, ApiError> {
    Ok(Part::bytes(jpeg).file_name(filename).mime_str("image/jpeg")?)
}

/// Pass 2xx through; otherwise pull FastAPI's `{"detail": ...}` out of the
/// body (falling back to the raw body, then the status line).
async fn checked(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let detail = match serde_json::from_str::<ErrorBody>(&body) {
        Ok(parsed) => parsed.detail,
        Err(_) if !body.trim().is_empty() => body.trim().to_string(),
        Err(_) => status.to_string(),
    };
    Err(ApiError::Status { status, detail })
}

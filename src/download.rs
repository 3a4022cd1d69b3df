use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_DISPOSITION, HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::config::Config;
use crate::core::{DownloadForm, DownloadPayload, HealthStatus, PreviewMetadata};
use crate::error::{Result, YtSaveError};
use crate::form::messages;
use crate::utils::sanitize_message;

const DEFAULT_USER_AGENT: &str = concat!("ytsave/", env!("CARGO_PKG_VERSION"));

/// The two endpoints the form talks to, plus the launcher health check
#[async_trait]
pub trait Backend: Send + Sync {
    /// `GET /api/preview?url=...`
    async fn preview(&self, url: &str) -> Result<PreviewMetadata>;

    /// `POST /api/download` with the form fields
    async fn download(&self, form: &DownloadForm) -> Result<DownloadPayload>;

    /// `GET /health`
    async fn health(&self) -> Result<HealthStatus>;
}

#[derive(Debug, Default, Deserialize)]
struct ErrorPayload {
    #[serde(default)]
    error: Option<String>,
}

/// Best-effort reading of a `{ "error": ... }` body.
pub fn error_message_from_body(body: &[u8], fallback: &str) -> String {
    serde_json::from_slice::<ErrorPayload>(body)
        .ok()
        .and_then(|p| p.error)
        .map(|e| sanitize_message(&e))
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

/// Get default headers for requests
fn get_default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json, */*"));
    headers
}

/// reqwest client for the web app's HTTP API
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base: Url,
}

impl HttpBackend {
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = reqwest::Client::builder().default_headers(get_default_headers());
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        Self::with_client(&config.server, builder.build()?)
    }

    pub fn with_client(server: &str, client: reqwest::Client) -> Result<Self> {
        let mut base = Url::parse(server)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self { client, base })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base.join(path)?)
    }

    pub fn preview_url(&self, url: &str) -> Result<String> {
        let endpoint = self.endpoint("api/preview")?;
        Ok(format!("{}?url={}", endpoint, urlencoding::encode(url)))
    }

    /// Send a request, turning non-success statuses into `ServerError`
    async fn execute(
        &self,
        request: reqwest::RequestBuilder,
        url: &str,
        fallback: &str,
    ) -> Result<reqwest::Response> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                YtSaveError::RequestTimeout(url.to_string())
            } else {
                YtSaveError::NetworkError(e)
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.bytes().await.unwrap_or_default();
        let message = error_message_from_body(&body, fallback);
        debug!(status = status.as_u16(), %url, %message, "request rejected");
        Err(YtSaveError::ServerError {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn preview(&self, url: &str) -> Result<PreviewMetadata> {
        let preview_url = self.preview_url(url)?;
        debug!(url = %preview_url, "requesting preview");
        let response = self
            .execute(
                self.client.get(&preview_url),
                &preview_url,
                messages::PREVIEW_FAILED,
            )
            .await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn download(&self, form: &DownloadForm) -> Result<DownloadPayload> {
        let endpoint = self.endpoint("api/download")?;
        debug!(url = %endpoint, mode = %form.mode, "requesting download");
        let response = self
            .execute(
                self.client.post(endpoint.clone()).form(&form.fields()),
                endpoint.as_str(),
                messages::DOWNLOAD_FAILED,
            )
            .await?;

        let disposition = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?.to_vec();
        Ok(DownloadPayload { body, disposition })
    }

    async fn health(&self) -> Result<HealthStatus> {
        let endpoint = self.endpoint("health")?;
        let response = self
            .execute(
                self.client.get(endpoint.clone()),
                endpoint.as_str(),
                "Health check failed.",
            )
            .await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

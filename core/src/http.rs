//! HTTP mail backend
//!
//! Talks JSON to the inbox service:
//! `GET /emails`, `POST /generate_draft` and `POST /send_email`.
//! Failed requests answer with `{"detail": "..."}`.

use std::time::Duration;

use reqwest::{Client, Response};
use serde::Deserialize;
use tracing::{debug, info};
use url::Url;

use crate::backend::MailBackend;
use crate::config::BackendConfig;
use crate::error::{DeskError, DeskResult};
use crate::types::{SendRequest, Thread};

const EMAILS_PATH: &str = "emails";
const GENERATE_DRAFT_PATH: &str = "generate_draft";
const SEND_EMAIL_PATH: &str = "send_email";

/// Response body of a successful draft generation
#[derive(Debug, Deserialize)]
struct DraftResponse {
    draft: String,
}

/// Error body returned by the service
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<serde_json::Value>,
}

/// Backend reached over HTTP
pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

impl HttpBackend {
    /// Create a backend from configuration
    pub fn new(config: &BackendConfig) -> DeskResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout))
            .user_agent(config.user_agent.clone())
            .build()?;
        let base_url = normalize_base(&config.base_url)?;
        Ok(Self { client, base_url })
    }

    /// Base URL all endpoints are resolved against
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> DeskResult<Url> {
        Ok(self.base_url.join(path)?)
    }
}

/// Parse a base URL so that relative joins keep any path prefix
fn normalize_base(raw: &str) -> DeskResult<Url> {
    let mut url = Url::parse(raw)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Extract the `detail` field of an error body.
///
/// String details are returned as-is; structured ones (e.g. validation error
/// lists) are rendered as JSON.
pub fn error_detail(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match parsed.detail? {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s),
        serde_json::Value::String(_) | serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// `detail` of a failed response, logging the raw body
async fn failure_detail(response: Response) -> Option<String> {
    let status = response.status();
    let body = response.text().await.ok()?;
    debug!("Request failed with {}: {}", status, body);
    error_detail(&body)
}

#[async_trait::async_trait]
impl MailBackend for HttpBackend {
    async fn list_unread_threads(&self) -> DeskResult<Vec<Thread>> {
        let url = self.endpoint(EMAILS_PATH)?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DeskError::fetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = failure_detail(response).await;
            return Err(DeskError::fetch(
                detail.unwrap_or_else(|| format!("HTTP {}", status)),
            ));
        }

        response
            .json()
            .await
            .map_err(|e| DeskError::fetch(e.to_string()))
    }

    async fn generate_draft(&self, thread: &Thread) -> DeskResult<String> {
        info!("Requesting draft for thread {}", thread.thread_id);
        let url = self.endpoint(GENERATE_DRAFT_PATH)?;
        let response = self.client.post(url).json(thread).send().await?;

        if !response.status().is_success() {
            // An empty message makes the controller fall back to its default
            let detail = failure_detail(response).await;
            return Err(DeskError::generation(detail.unwrap_or_default()));
        }

        let body: DraftResponse = response.json().await?;
        Ok(body.draft)
    }

    async fn send_reply(&self, request: &SendRequest) -> DeskResult<()> {
        info!("Sending reply for thread {}", request.thread_id);
        let url = self.endpoint(SEND_EMAIL_PATH)?;
        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|e| DeskError::send(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = failure_detail(response).await;
            return Err(DeskError::send(
                detail.unwrap_or_else(|| format!("HTTP {}", status)),
            ));
        }
        Ok(())
    }
}

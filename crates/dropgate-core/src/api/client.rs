//! reqwest-backed client for the dropgate server.
//!
//! Requests are sent exactly once. The client sets no timeout of its own, so
//! an attempt resolves only when the transport completes or fails.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode, Url};
use tracing::debug;

use crate::models::{Credential, SessionToken, UploadPayload};

use super::TransportError;

// ============================================================================
// Constants
// ============================================================================

/// Login endpoint, relative to the base URL
const LOGIN_PATH: &str = "login";

/// Upload endpoint, relative to the base URL
const UPLOAD_PATH: &str = "upload";

/// Multipart field the server reads the file from
pub const UPLOAD_FIELD: &str = "file";

/// Status and body of a completed HTTP exchange, whatever the status.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// The two calls the authenticated upload flow makes against the server.
#[async_trait]
pub trait RemoteService: Send + Sync {
    /// `POST /login` with a JSON `{username, password}` body.
    async fn login(&self, credential: &Credential) -> Result<RawResponse, TransportError>;

    /// `POST /upload` with a bearer token and one multipart file field.
    /// The payload is consumed so its bytes move straight into the request.
    async fn upload(
        &self,
        token: &SessionToken,
        payload: UploadPayload,
    ) -> Result<RawResponse, TransportError>;
}

/// API client for a dropgate server.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new API client rooted at `base_url`
    pub fn new(base_url: &str) -> Result<Self> {
        // Url::join drops the last path segment unless it ends with '/'
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        let base_url = Url::parse(&normalized)
            .with_context(|| format!("Invalid server URL: {}", base_url))?;

        let client = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, TransportError> {
        self.base_url
            .join(path)
            .map_err(|e| TransportError::Unreachable(format!("invalid endpoint {}: {}", path, e)))
    }

    /// Liveness check: `GET /` on the base URL.
    pub async fn probe(&self) -> Result<RawResponse, TransportError> {
        debug!(url = %self.base_url, "Probing server");
        let response = self.client.get(self.base_url.clone()).send().await?;
        Self::read_response(response).await
    }

    async fn read_response(response: reqwest::Response) -> Result<RawResponse, TransportError> {
        let status = response.status();
        let body = response.text().await?;
        Ok(RawResponse { status, body })
    }
}

#[async_trait]
impl RemoteService for ApiClient {
    async fn login(&self, credential: &Credential) -> Result<RawResponse, TransportError> {
        let url = self.endpoint(LOGIN_PATH)?;
        debug!(%url, username = %credential.username, "Sending login request");

        let response = self.client.post(url).json(credential).send().await?;
        Self::read_response(response).await
    }

    async fn upload(
        &self,
        token: &SessionToken,
        payload: UploadPayload,
    ) -> Result<RawResponse, TransportError> {
        let url = self.endpoint(UPLOAD_PATH)?;
        debug!(
            %url,
            file = %payload.file_name,
            bytes = payload.bytes.len(),
            mime = %payload.mime,
            "Sending upload request"
        );

        let UploadPayload {
            file_name,
            mime,
            bytes,
        } = payload;
        let part = Part::bytes(bytes).file_name(file_name).mime_str(&mime)?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        let response = self
            .client
            .post(url)
            .bearer_auth(token.as_str())
            .multipart(form)
            .send()
            .await?;
        Self::read_response(response).await
    }
}

use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::api::error::truncate_body;
use crate::api::{RawResponse, RemoteService};
use crate::models::{Outcome, Route, SessionToken, UploadPayload};
use crate::store::TokenStore;

/// Shown when the server rejects an upload without saying why
pub const UPLOAD_FALLBACK_ERROR: &str = "Error uploading the file";

/// Shown when the server accepts an upload without a message
pub const UPLOAD_DEFAULT_SUCCESS: &str = "File uploaded";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSuccess {
    pub message: String,
}

#[derive(Error, Debug)]
pub enum UploadFailure {
    #[error("No session token, login required")]
    MissingToken,

    #[error("Upload rejected: {0}")]
    ServerRejectedUpload(String),

    #[error("Could not reach the server: {0}")]
    Network(String),

    #[error("Could not read the session token: {0}")]
    Storage(String),

    #[error("{0}")]
    UnreadableFile(String),
}

impl From<UploadFailure> for Outcome {
    fn from(failure: UploadFailure) -> Self {
        match failure {
            UploadFailure::MissingToken => Outcome::Redirect(Route::Login),
            UploadFailure::ServerRejectedUpload(message) => Outcome::ValidationError { message },
            UploadFailure::Network(cause) => Outcome::NetworkError { cause },
            UploadFailure::Storage(message) => Outcome::ValidationError { message },
            UploadFailure::UnreadableFile(message) => Outcome::ValidationError { message },
        }
    }
}

#[derive(Debug, Deserialize)]
struct UploadAccepted {
    mensaje: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UploadRejected {
    error: Option<String>,
}

/// Decide what a completed `/upload` exchange means.
pub fn interpret_upload(response: &RawResponse) -> Result<UploadSuccess, UploadFailure> {
    if response.is_success() {
        let message = serde_json::from_str::<UploadAccepted>(&response.body)
            .ok()
            .and_then(|body| body.mensaje)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| UPLOAD_DEFAULT_SUCCESS.to_string());
        return Ok(UploadSuccess { message });
    }

    warn!(
        status = %response.status,
        body = %truncate_body(&response.body),
        "Upload rejected"
    );

    let message = serde_json::from_str::<UploadRejected>(&response.body)
        .ok()
        .and_then(|body| body.error)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| UPLOAD_FALLBACK_ERROR.to_string());
    Err(UploadFailure::ServerRejectedUpload(message))
}

/// Uploads one file using whatever token the store currently holds.
pub struct UploadSession {
    remote: Arc<dyn RemoteService>,
    store: Arc<dyn TokenStore>,
}

impl UploadSession {
    pub fn new(remote: Arc<dyn RemoteService>, store: Arc<dyn TokenStore>) -> Self {
        Self { remote, store }
    }

    fn token(&self) -> Result<SessionToken, UploadFailure> {
        self.store
            .load()
            .map_err(|e| {
                error!(error = %e, "Failed to read session token");
                UploadFailure::Storage(e.to_string())
            })?
            .ok_or_else(|| {
                debug!("No session token, redirecting to login");
                UploadFailure::MissingToken
            })
    }

    /// One upload attempt. The token gate runs before any network I/O.
    pub async fn upload(&self, payload: UploadPayload) -> Result<UploadSuccess, UploadFailure> {
        let token = self.token()?;
        self.send(&token, payload).await
    }

    /// Upload a file from disk. The token gate runs before the file is read,
    /// so a missing session redirects even when the path is bad.
    pub async fn upload_file(&self, path: &Path) -> Result<UploadSuccess, UploadFailure> {
        let token = self.token()?;
        let payload = UploadPayload::read(path).await.map_err(|e| {
            warn!(error = %e, path = %path.display(), "Failed to read upload file");
            UploadFailure::UnreadableFile(format!("Could not read {}: {}", path.display(), e))
        })?;
        self.send(&token, payload).await
    }

    async fn send(
        &self,
        token: &SessionToken,
        payload: UploadPayload,
    ) -> Result<UploadSuccess, UploadFailure> {
        let file_name = payload.file_name.clone();
        let bytes = payload.bytes.len();

        let response = self.remote.upload(token, payload).await.map_err(|e| {
            error!(error = %e, file = %file_name, "Upload request failed");
            UploadFailure::Network(e.to_string())
        })?;

        let success = interpret_upload(&response)?;
        info!(file = %file_name, bytes, "Upload accepted");
        Ok(success)
    }

    /// Run `upload` and turn the result into what the user sees.
    pub async fn submit(&self, payload: UploadPayload) -> Outcome {
        Self::outcome(self.upload(payload).await)
    }

    /// Run `upload_file` and turn the result into what the user sees.
    pub async fn submit_file(&self, path: &Path) -> Outcome {
        Self::outcome(self.upload_file(path).await)
    }

    fn outcome(result: Result<UploadSuccess, UploadFailure>) -> Outcome {
        match result {
            Ok(success) => Outcome::Success {
                message: success.message,
            },
            Err(failure) => failure.into(),
        }
    }
}

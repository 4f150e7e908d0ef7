use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Username and password for one login attempt. Never persisted.
#[derive(Clone, Serialize)]
pub struct Credential {
    pub username: String,
    pub password: String,
}

impl Credential {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Both fields are required before the remote service is contacted.
    pub fn is_complete(&self) -> bool {
        !self.username.trim().is_empty() && !self.password.is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Opaque bearer token issued by the remote service.
///
/// Validity is decided by the server at use time; the client tracks no expiry.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionToken(<{} chars>)", self.0.len())
    }
}

/// Fallback content type when the file extension is unknown.
const DEFAULT_MIME: &str = "application/octet-stream";

/// A single file to upload. Type and size are not validated client-side.
#[derive(Debug, Clone)]
pub struct UploadPayload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl UploadPayload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime = mime_guess::from_path(&file_name)
            .first()
            .map(|m| m.essence_str().to_string())
            .unwrap_or_else(|| DEFAULT_MIME.to_string());
        Self {
            file_name,
            mime,
            bytes,
        }
    }

    /// Read a file from disk, keeping only its base name for the form part.
    pub async fn read(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(file_name, bytes))
    }
}

/// Where the front end should take the user next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Authentication entry point
    Login,
    /// File upload view
    Upload,
}

/// What the user is shown after an attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success { message: String },
    AuthError { reason: String },
    ValidationError { message: String },
    NetworkError { cause: String },
    Redirect(Route),
}

impl Outcome {
    /// Transport failures get a blocking notification; everything else is inline.
    pub fn is_blocking(&self) -> bool {
        matches!(self, Outcome::NetworkError { .. })
    }
}

use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::api::error::truncate_body;
use crate::api::{RawResponse, RemoteService};
use crate::models::{Credential, Outcome, Route, SessionToken};
use crate::store::TokenStore;

/// Inline message shown when the server turns the credential down
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid username or password";

/// Inline message shown when a field is left blank
pub const MISSING_FIELDS_MESSAGE: &str = "Username and password required";

#[derive(Error, Debug)]
pub enum AuthFailure {
    #[error("Username and password required")]
    MissingFields,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Could not reach the server: {0}")]
    Network(String),

    #[error("Could not save the session token: {0}")]
    Storage(String),
}

impl From<AuthFailure> for Outcome {
    fn from(failure: AuthFailure) -> Self {
        match failure {
            AuthFailure::MissingFields => Outcome::ValidationError {
                message: MISSING_FIELDS_MESSAGE.to_string(),
            },
            AuthFailure::InvalidCredentials => Outcome::AuthError {
                reason: INVALID_CREDENTIALS_MESSAGE.to_string(),
            },
            AuthFailure::Network(cause) => Outcome::NetworkError { cause },
            AuthFailure::Storage(message) => Outcome::ValidationError { message },
        }
    }
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
}

/// Decide what a completed `/login` exchange means.
///
/// Any non-success status is a rejection. A success status whose body does
/// not carry a non-empty `token` is treated the same way.
pub fn interpret_login(response: &RawResponse) -> Result<SessionToken, AuthFailure> {
    if !response.is_success() {
        warn!(
            status = %response.status,
            body = %truncate_body(&response.body),
            "Login rejected"
        );
        return Err(AuthFailure::InvalidCredentials);
    }

    match serde_json::from_str::<LoginResponse>(&response.body) {
        Ok(login) if !login.token.is_empty() => Ok(SessionToken::new(login.token)),
        Ok(_) => {
            warn!(status = %response.status, "Login response carried an empty token");
            Err(AuthFailure::InvalidCredentials)
        }
        Err(e) => {
            warn!(
                status = %response.status,
                error = %e,
                body = %truncate_body(&response.body),
                "Login response has no token"
            );
            Err(AuthFailure::InvalidCredentials)
        }
    }
}

/// Exchanges credentials for a session token and persists it.
pub struct Authenticator {
    remote: Arc<dyn RemoteService>,
    store: Arc<dyn TokenStore>,
}

impl Authenticator {
    pub fn new(remote: Arc<dyn RemoteService>, store: Arc<dyn TokenStore>) -> Self {
        Self { remote, store }
    }

    /// One login attempt. On success the token is stored, overwriting any
    /// earlier one; on failure the store is left untouched.
    pub async fn authenticate(&self, credential: &Credential) -> Result<SessionToken, AuthFailure> {
        if !credential.is_complete() {
            return Err(AuthFailure::MissingFields);
        }

        debug!(username = %credential.username, "Authenticating");

        let response = self.remote.login(credential).await.map_err(|e| {
            error!(error = %e, "Login request failed");
            AuthFailure::Network(e.to_string())
        })?;

        let token = interpret_login(&response)?;

        self.store.save(&token).map_err(|e| {
            error!(error = %e, "Failed to store session token");
            AuthFailure::Storage(e.to_string())
        })?;

        info!(username = %credential.username, "Login successful");
        Ok(token)
    }

    /// Run `authenticate` and turn the result into what the user sees.
    /// Success means "go to the upload view".
    pub async fn submit(&self, credential: &Credential) -> Outcome {
        match self.authenticate(credential).await {
            Ok(_) => Outcome::Redirect(Route::Upload),
            Err(failure) => failure.into(),
        }
    }
}

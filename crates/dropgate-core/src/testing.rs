//! Scripted `RemoteService` for unit tests.

use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::api::{RawResponse, RemoteService, TransportError};
use crate::models::{Credential, SessionToken, UploadPayload};
use crate::store::{StoreError, TokenStore};

#[derive(Clone)]
pub enum Reply {
    Respond(StatusCode, String),
    Fail(String),
}

impl Reply {
    pub fn json(status: StatusCode, body: serde_json::Value) -> Self {
        Reply::Respond(status, body.to_string())
    }

    fn produce(&self) -> Result<RawResponse, TransportError> {
        match self {
            Reply::Respond(status, body) => Ok(RawResponse::new(*status, body.clone())),
            Reply::Fail(cause) => Err(TransportError::Unreachable(cause.clone())),
        }
    }
}

pub struct FakeRemote {
    reply: Reply,
    pub logins: Mutex<Vec<String>>,
    pub uploads: Mutex<Vec<(String, String)>>,
}

impl FakeRemote {
    pub fn new(reply: Reply) -> Self {
        Self {
            reply,
            logins: Mutex::new(Vec::new()),
            uploads: Mutex::new(Vec::new()),
        }
    }

    pub fn login_count(&self) -> usize {
        self.logins.lock().unwrap().len()
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.lock().unwrap().len()
    }
}

#[async_trait]
impl RemoteService for FakeRemote {
    async fn login(&self, credential: &Credential) -> Result<RawResponse, TransportError> {
        self.logins.lock().unwrap().push(credential.username.clone());
        self.reply.produce()
    }

    async fn upload(
        &self,
        token: &SessionToken,
        payload: UploadPayload,
    ) -> Result<RawResponse, TransportError> {
        self.uploads
            .lock()
            .unwrap()
            .push((token.as_str().to_string(), payload.file_name));
        self.reply.produce()
    }
}

/// Store whose every operation fails.
pub struct BrokenStore;

impl TokenStore for BrokenStore {
    fn load(&self) -> Result<Option<SessionToken>, StoreError> {
        Err(StoreError::Io(std::io::Error::other("disk unavailable")))
    }

    fn save(&self, _token: &SessionToken) -> Result<(), StoreError> {
        Err(StoreError::Io(std::io::Error::other("disk unavailable")))
    }

    fn clear(&self) -> Result<(), StoreError> {
        Err(StoreError::Io(std::io::Error::other("disk unavailable")))
    }
}

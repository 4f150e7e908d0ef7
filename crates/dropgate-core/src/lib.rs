//! Core library for dropgate.
//!
//! dropgate logs a user in against a remote service, keeps the issued bearer
//! token in a local store, and uses it to upload one file per request.
//!
//! - [`auth::Authenticator`] exchanges a [`Credential`] for a [`SessionToken`]
//! - [`upload::UploadSession`] gates on the stored token and submits the file
//! - [`store::TokenStore`] is the single shared slot both of them use
//! - [`api::ApiClient`] is the reqwest-backed [`api::RemoteService`]

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod store;
pub mod upload;

#[cfg(test)]
pub(crate) mod testing;

pub use models::{Credential, Outcome, Route, SessionToken, UploadPayload};

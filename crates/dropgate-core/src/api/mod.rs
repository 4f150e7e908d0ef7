//! HTTP access to the dropgate server.
//!
//! `RemoteService` is the seam the authenticator and upload session talk
//! through; `ApiClient` implements it with reqwest. Responses come back as
//! a `RawResponse` so each component can branch on status and body without
//! doing any I/O itself.

pub mod client;
pub mod error;

pub use client::{ApiClient, RawResponse, RemoteService};
pub use error::TransportError;

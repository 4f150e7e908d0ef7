//! Login against the remote service.
//!
//! The `Authenticator` trades a `Credential` for a bearer token and writes
//! it to the shared token store. Nothing is stored when the server rejects
//! the credential or cannot be reached.

pub mod authenticator;

pub use authenticator::{
    interpret_login, AuthFailure, Authenticator, INVALID_CREDENTIALS_MESSAGE, MISSING_FIELDS_MESSAGE,
};

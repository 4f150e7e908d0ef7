//! Authenticated single-file upload.
//!
//! `UploadSession` reads the stored token before anything else. Without a
//! token the attempt ends in a redirect to login and no request is sent.

pub mod session;

pub use session::{
    interpret_upload, UploadFailure, UploadSession, UploadSuccess, UPLOAD_DEFAULT_SUCCESS,
    UPLOAD_FALLBACK_ERROR,
};

use thiserror::Error;

/// The server could not be reached or the exchange broke off mid-way.
///
/// This is the single "network unreachable" class shared by login and upload.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server unreachable: {0}")]
    Unreachable(String),
}

/// Maximum length for response bodies in log lines
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Truncate a response body to avoid logging excessive data
pub fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY_LENGTH {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY_LENGTH;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
}

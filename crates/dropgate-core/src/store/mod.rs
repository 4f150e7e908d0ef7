//! Persistent storage for the session token.
//!
//! There is exactly one slot. The authenticator writes it, the upload
//! session reads it, and a later login simply overwrites it. The store is
//! handed to both components at construction rather than reached globally.

pub mod file;
pub mod keychain;
pub mod memory;

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::SessionToken;

pub use file::FileTokenStore;
pub use keychain::KeyringTokenStore;
pub use memory::MemoryTokenStore;

/// Fixed key the token lives under, in every backend
pub const TOKEN_KEY: &str = "session_token";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Token store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Token store is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("Keychain error: {0}")]
    Keyring(#[from] keyring::Error),
}

/// Single shared slot holding the current session token.
pub trait TokenStore: Send + Sync {
    /// Current token, if one has been stored.
    fn load(&self) -> Result<Option<SessionToken>, StoreError>;

    /// Store `token`, replacing any previous value.
    fn save(&self, token: &SessionToken) -> Result<(), StoreError>;

    /// Remove the token. Clearing an empty store is not an error.
    fn clear(&self) -> Result<(), StoreError>;
}

/// Which backend holds the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenStoreKind {
    /// JSON file in the cache directory
    #[default]
    File,
    /// OS keychain
    Keyring,
}

/// Open the configured backend.
pub fn open(kind: TokenStoreKind, cache_dir: &Path) -> Arc<dyn TokenStore> {
    match kind {
        TokenStoreKind::File => Arc::new(FileTokenStore::new(cache_dir.to_path_buf())),
        TokenStoreKind::Keyring => Arc::new(KeyringTokenStore::new()),
    }
}

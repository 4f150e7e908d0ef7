use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::SessionToken;

use super::{StoreError, TokenStore};

/// Session file name in cache directory
const SESSION_FILE: &str = "session.json";

#[derive(Debug, Serialize, Deserialize)]
struct SessionFile {
    session_token: SessionToken,
}

/// Token persisted as `session.json` in the cache directory.
pub struct FileTokenStore {
    cache_dir: PathBuf,
}

impl FileTokenStore {
    pub fn new(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    pub fn path(&self) -> PathBuf {
        self.cache_dir.join(SESSION_FILE)
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<SessionToken>, StoreError> {
        let path = self.path();
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&path)?;
        let file: SessionFile = serde_json::from_str(&contents)?;
        Ok(Some(file.session_token))
    }

    fn save(&self, token: &SessionToken) -> Result<(), StoreError> {
        let path = self.path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(&SessionFile {
            session_token: token.clone(),
        })?;
        std::fs::write(&path, contents)?;
        debug!(path = %path.display(), "Session token saved");
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        let path = self.path();
        if path.exists() {
            std::fs::remove_file(&path)?;
            debug!(path = %path.display(), "Session token removed");
        }
        Ok(())
    }
}

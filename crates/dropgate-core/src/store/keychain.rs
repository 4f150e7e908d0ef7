use keyring::Entry;
use tracing::debug;

use crate::models::SessionToken;

use super::{StoreError, TokenStore, TOKEN_KEY};

const SERVICE_NAME: &str = "dropgate";

/// Token kept in the OS keychain under `dropgate` / `session_token`.
#[derive(Debug, Default)]
pub struct KeyringTokenStore;

impl KeyringTokenStore {
    pub fn new() -> Self {
        Self
    }

    fn entry(&self) -> Result<Entry, StoreError> {
        Ok(Entry::new(SERVICE_NAME, TOKEN_KEY)?)
    }
}

impl TokenStore for KeyringTokenStore {
    fn load(&self) -> Result<Option<SessionToken>, StoreError> {
        match self.entry()?.get_password() {
            Ok(token) => Ok(Some(SessionToken::new(token))),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, token: &SessionToken) -> Result<(), StoreError> {
        self.entry()?.set_password(token.as_str())?;
        debug!("Session token saved to keychain");
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

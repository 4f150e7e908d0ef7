//! Command handlers for the dropgate binary.
//!
//! `App` wires the config, the token store and the API client together and
//! drives one login or upload attempt per command through the status panel.

use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use dropgate_core::api::ApiClient;
use dropgate_core::auth::Authenticator;
use dropgate_core::config::Config;
use dropgate_core::store::{self, TokenStore};
use dropgate_core::upload::UploadSession;
use dropgate_core::{Credential, Route};

use crate::probe;
use crate::ui::{FlowState, StatusPanel};

// ============================================================================
// Constants
// ============================================================================

pub const BASE_URL_ENV: &str = "DROPGATE_BASE_URL";
pub const USERNAME_ENV: &str = "DROPGATE_USERNAME";
pub const PASSWORD_ENV: &str = "DROPGATE_PASSWORD";

/// Server precedence: CLI flag, then environment, then config file.
pub fn resolve_base_url(flag: Option<String>, env: Option<String>, config: &Config) -> String {
    flag.filter(|s| !s.trim().is_empty())
        .or_else(|| env.filter(|s| !s.trim().is_empty()))
        .unwrap_or_else(|| config.base_url().to_string())
}

pub struct App {
    config: Config,
    config_path: PathBuf,
    api: Arc<ApiClient>,
    store: Arc<dyn TokenStore>,
    panel: StatusPanel,
    interactive: bool,
}

impl App {
    pub fn new(config: Config, server: Option<String>) -> Result<Self> {
        let base_url = resolve_base_url(server, std::env::var(BASE_URL_ENV).ok(), &config);
        let api = Arc::new(ApiClient::new(&base_url)?);

        let cache_dir = config.cache_dir().unwrap_or_else(|_| PathBuf::from("./cache"));
        debug!(?cache_dir, store = ?config.token_store, "Token store configured");
        let store = store::open(config.token_store, &cache_dir);
        let config_path =
            Config::config_path().unwrap_or_else(|_| PathBuf::from("./config.json"));

        Ok(Self::from_parts(
            config,
            config_path,
            api,
            store,
            io::stdin().is_terminal(),
        ))
    }

    /// Assemble an app from already-built pieces. `interactive` decides
    /// whether alerts wait for Enter and whether a missing token leads into
    /// the login prompt.
    pub fn from_parts(
        config: Config,
        config_path: PathBuf,
        api: Arc<ApiClient>,
        store: Arc<dyn TokenStore>,
        interactive: bool,
    ) -> Self {
        Self {
            config,
            config_path,
            api,
            store,
            panel: StatusPanel::new(),
            interactive,
        }
    }

    pub fn base_url(&self) -> &str {
        self.api.base_url().as_str()
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// One login attempt, prompting for whatever the flag and environment
    /// leave out.
    pub async fn login(&mut self, username: Option<String>) -> Result<FlowState> {
        let username = match username.or_else(|| std::env::var(USERNAME_ENV).ok()) {
            Some(u) => u,
            None => Self::prompt_username(self.config.last_username.as_deref())?,
        };
        let password = match std::env::var(PASSWORD_ENV) {
            Ok(p) if !p.is_empty() => p,
            _ => Self::prompt_password()?,
        };
        self.login_with(Credential::new(username, password)).await
    }

    pub async fn login_with(&mut self, credential: Credential) -> Result<FlowState> {
        let authenticator = Authenticator::new(self.api.clone(), self.store.clone());
        self.panel.begin();
        let outcome = authenticator.submit(&credential).await;
        let state = self.panel.apply(&outcome);
        debug!(?state, terminal = state.is_terminal(), "Login attempt finished");
        self.panel.show(self.interactive)?;

        if self.panel.navigation == Some(Route::Upload) {
            println!("Logged in as {}.", credential.username);
            self.config.last_username = Some(credential.username);
            if let Err(e) = self.config.save_to(&self.config_path) {
                warn!(error = %e, "Failed to save config");
            }
        }
        Ok(state)
    }

    fn prompt_username(last: Option<&str>) -> Result<String> {
        match last {
            Some(last) => print!("Username [{}]: ", last),
            None => print!("Username: "),
        }
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let input = input.trim();

        Ok(match last {
            Some(last) if input.is_empty() => last.to_string(),
            _ => input.to_string(),
        })
    }

    fn prompt_password() -> Result<String> {
        let password = rpassword::prompt_password("Password: ")?;
        Ok(password)
    }

    /// Forget the stored token.
    pub fn logout(&self) -> Result<()> {
        self.store.clear().context("Failed to clear session token")?;
        info!("Session token cleared");
        println!("Logged out.");
        Ok(())
    }

    // =========================================================================
    // Upload
    // =========================================================================

    /// One upload attempt. Without a stored token the user is sent to login
    /// before the file is touched; the upload is not retried afterwards.
    pub async fn upload(&mut self, file: &Path) -> Result<FlowState> {
        let session = UploadSession::new(self.api.clone(), self.store.clone());

        self.panel.begin();
        let outcome = session.submit_file(file).await;
        let state = self.panel.apply(&outcome);
        debug!(?state, terminal = state.is_terminal(), "Upload attempt finished");
        self.panel.show(self.interactive)?;

        if self.panel.navigation == Some(Route::Login) {
            eprintln!("Not logged in.");
            if self.interactive {
                if self.login(None).await? == FlowState::Success {
                    println!("Run `dropgate upload {}` again to send the file.", file.display());
                }
            } else {
                eprintln!("Run `dropgate login` first.");
            }
        }
        Ok(state)
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    pub fn status(&self) -> Result<()> {
        let has_token = self
            .store
            .load()
            .context("Failed to read session token")?
            .is_some();

        println!("Server:      {}", self.base_url());
        println!("Token store: {:?}", self.config.token_store);
        println!(
            "Session:     {}",
            if has_token { "token stored" } else { "not logged in" }
        );
        Ok(())
    }

    pub async fn probe(&self) -> bool {
        probe::run(&self.api).await
    }
}

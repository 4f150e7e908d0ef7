//! Liveness check against the configured server.
//!
//! Purely diagnostic: login and upload never depend on it.

use std::time::Instant;

use tracing::{info, warn};

use dropgate_core::api::ApiClient;

/// Returns true when the server answered with a success status.
pub async fn run(api: &ApiClient) -> bool {
    let started = Instant::now();
    match api.probe().await {
        Ok(response) => {
            let elapsed_ms = started.elapsed().as_millis() as u64;
            info!(url = %api.base_url(), status = %response.status, elapsed_ms, "Probe answered");
            println!("{} answered {} in {} ms", api.base_url(), response.status, elapsed_ms);
            response.is_success()
        }
        Err(e) => {
            warn!(url = %api.base_url(), error = %e, "Probe failed");
            println!("{} unreachable: {}", api.base_url(), e);
            false
        }
    }
}

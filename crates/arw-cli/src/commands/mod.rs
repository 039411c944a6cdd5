//! Command handlers for the `arw` binary.

pub mod fetch;
pub mod reconcile;

use std::path::PathBuf;

use anyhow::{Context, Result};
use arw_config::{AppConfig, LoadedConfig};
use arw_registry::{HttpTransport, RegistrySession, RetryPolicy, SystemClock};

/// Load and validate layered config.
pub fn load_config(paths: &[PathBuf]) -> Result<(LoadedConfig, AppConfig)> {
    let loaded = arw_config::load_layered_yaml(paths)?;
    let cfg = loaded.app().context("config validation failed")?;
    Ok((loaded, cfg))
}

/// Live registry session built from config.
pub fn open_session(cfg: &AppConfig) -> Result<RegistrySession<HttpTransport, SystemClock>> {
    let transport =
        HttpTransport::new(cfg.registry.clone()).context("build registry http client failed")?;
    let policy: RetryPolicy = cfg.retry;
    Ok(RegistrySession::new(transport, SystemClock, policy)
        .with_credential_ttl(cfg.session.credential_ttl()))
}

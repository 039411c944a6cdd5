use std::time::Duration;

use anyhow::{bail, Context, Result};
use arw_ingest::{BaselineFormat, OutputFormat};
use arw_reconcile::ReconcileOptions;
use arw_registry::{RegistryEndpoints, RetryPolicy, DEFAULT_CREDENTIAL_TTL_SECS};
use arw_schemas::Query;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Typed application configuration. Every section is optional and defaults
/// to the ARES setup; `queries` defaults to empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub registry: RegistryEndpoints,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub retry: RetryPolicy,
    #[serde(default)]
    pub batch: BatchConfig,
    #[serde(default)]
    pub baseline: BaselineFormat,
    #[serde(default)]
    pub output: OutputFormat,
    #[serde(default)]
    pub reconcile: ReconcileOptions,
    /// Addresses to look up, in issue order.
    #[serde(default)]
    pub queries: Vec<Query>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct SessionConfig {
    pub credential_ttl_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            credential_ttl_secs: DEFAULT_CREDENTIAL_TTL_SECS,
        }
    }
}

impl SessionConfig {
    pub fn credential_ttl(&self) -> Duration {
        Duration::from_secs(self.credential_ttl_secs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct BatchConfig {
    /// Wait between consecutive queries.
    pub pacing_secs: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { pacing_secs: 1 }
    }
}

impl BatchConfig {
    pub fn pacing(&self) -> Duration {
        Duration::from_secs(self.pacing_secs)
    }
}

impl AppConfig {
    /// Deserialize and validate a merged config tree.
    pub fn from_json(v: &Value) -> Result<Self> {
        // Queries first, so a bad entry is reported with its position.
        if let Some(list) = v.get("queries").and_then(Value::as_array) {
            for (i, q) in list.iter().enumerate() {
                serde_json::from_value::<Query>(q.clone())
                    .with_context(|| format!("CONFIG_INVALID_QUERY queries[{i}]"))?;
            }
        }

        let cfg: AppConfig =
            serde_json::from_value(v.clone()).context("CONFIG_SCHEMA_MISMATCH")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        let r = &self.registry;
        for (key, url) in [
            ("registry.bootstrap_url", &r.bootstrap_url),
            ("registry.search_url", &r.search_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                bail!("CONFIG_INVALID {key}: expected an http(s) URL, got '{url}'");
            }
        }
        if r.cookie_name.trim().is_empty() {
            bail!("CONFIG_INVALID registry.cookie_name: must not be empty");
        }
        if r.request_timeout_secs == 0 {
            bail!("CONFIG_INVALID registry.request_timeout_secs: must be > 0");
        }
        if self.retry.max_attempts == 0 {
            bail!("CONFIG_INVALID retry.max_attempts: must be >= 1");
        }
        if self.baseline.id_column.trim().is_empty() || self.baseline.name_column.trim().is_empty()
        {
            bail!("CONFIG_INVALID baseline: id_column and name_column must be set");
        }
        for (key, c) in [
            ("baseline.delimiter", self.baseline.delimiter),
            ("output.delimiter", self.output.delimiter),
        ] {
            if !c.is_ascii() {
                bail!("CONFIG_INVALID {key}: must be a single ASCII character, got {c:?}");
            }
        }
        Ok(())
    }
}

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::batch::DEFAULT_CONCURRENCY;
use crate::rate_limit::RateLimiter;
use crate::retry::RetryPolicy;

/// Client configuration loaded from `~/.config/resq/config.toml`.
///
/// Every key is optional in the file; missing keys take the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL that relative call targets are resolved against.
    pub base_url: Option<String>,
    /// Per-attempt timeout in milliseconds.
    pub timeout_ms: u64,
    /// Total attempt budget per call, first attempt included.
    pub max_retries: u32,
    /// Base backoff delay in milliseconds; doubles after each failed attempt.
    pub retry_delay_ms: u64,
    /// Optional cap on a single backoff delay in milliseconds (None = uncapped).
    pub max_retry_delay_ms: Option<u64>,
    /// Requests per second across the whole client (None = unlimited).
    pub rate_limit: Option<f64>,
    /// Batch window size.
    pub concurrency: usize,
    /// Default headers sent with every request.
    pub headers: BTreeMap<String, String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_ms: 30_000,
            max_retries: 3,
            retry_delay_ms: 1_000,
            max_retry_delay_ms: None,
            rate_limit: None,
            concurrency: DEFAULT_CONCURRENCY,
            headers: BTreeMap::new(),
        }
    }
}

impl ClientConfig {
    /// Reject values the client cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.max_retries == 0 {
            anyhow::bail!("max_retries must be at least 1");
        }
        if self.concurrency == 0 {
            anyhow::bail!("concurrency must be at least 1");
        }
        if self.timeout_ms == 0 {
            anyhow::bail!("timeout_ms must be positive");
        }
        if self.retry_delay_ms == 0 {
            anyhow::bail!("retry_delay_ms must be positive");
        }
        if let Some(r) = self.rate_limit {
            if !r.is_finite() || r <= 0.0 {
                anyhow::bail!("rate_limit must be a positive number of requests per second");
            }
            if Duration::try_from_secs_f64(1.0 / r).is_err() {
                anyhow::bail!("rate_limit {} is too small: request spacing overflows", r);
            }
        }
        if let Some(base) = &self.base_url {
            url::Url::parse(base).with_context(|| format!("invalid base_url {:?}", base))?;
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        let policy = RetryPolicy::new(self.max_retries, Duration::from_millis(self.retry_delay_ms));
        match self.max_retry_delay_ms {
            Some(cap) => policy.with_max_delay(Duration::from_millis(cap)),
            None => policy,
        }
    }

    pub fn rate_limiter(&self) -> RateLimiter {
        RateLimiter::new(self.rate_limit)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("resq")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ClientConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = ClientConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from_path(&path)
}

/// Load and validate configuration from an explicit file.
pub fn load_from_path(path: &Path) -> Result<ClientConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    let cfg: ClientConfig = toml::from_str(&data)
        .with_context(|| format!("parse config {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

//! Dashboard configuration.
//!
//! Sources are layered: built-in defaults, then an optional YAML file, then
//! `SENTIX_`-prefixed environment variables (`SENTIX_PAGE_LIMIT=50`).

use std::path::Path;
use std::time::Duration;

use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, ValidationError};
use crate::merge::PRICE_PLACEHOLDER;
use crate::retry::RetryPolicy;

const UPSTREAM_BASE: &str = "https://mvp-testidea-1094890588015.asia-southeast1.run.app";
const ENV_PREFIX: &str = "SENTIX_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Serve the built-in data set instead of calling the upstream services.
    pub use_mock_data: bool,
    pub page_limit: u64,
    pub onchain_limit: u64,
    pub history_limit: u64,
    pub fundamental_endpoint: String,
    pub onchain_endpoint: String,
    pub price_history_endpoint: String,
    pub timeout_ms: u64,
    pub max_retries: u32,
    /// Zero disables the response cache.
    pub cache_ttl_secs: u64,
    pub price_placeholder: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            use_mock_data: false,
            page_limit: 200,
            onchain_limit: 100,
            history_limit: 5_000,
            fundamental_endpoint: format!("{UPSTREAM_BASE}/fact_q_score"),
            onchain_endpoint: format!("{UPSTREAM_BASE}/netflow_intelligence"),
            price_history_endpoint: format!("{UPSTREAM_BASE}/netflow_intelligence_price"),
            timeout_ms: 10_000,
            max_retries: 2,
            cache_ttl_secs: 300,
            price_placeholder: PRICE_PLACEHOLDER.to_owned(),
        }
    }
}

impl DashboardConfig {
    /// Loads and validates the layered configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Config`] when `path` does not exist or a source
    /// cannot be parsed, and [`CoreError::Validation`] when a value is out of range.
    pub fn load(path: Option<&Path>) -> Result<Self, CoreError> {
        if let Some(path) = path {
            if !path.exists() {
                return Err(CoreError::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
        }

        let config: Self = Self::figment(path).extract()?;
        config.validate()?;
        tracing::debug!(mock = config.use_mock_data, "configuration loaded");
        Ok(config)
    }

    /// Provider stack used by [`DashboardConfig::load`].
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("page_limit", self.page_limit),
            ("onchain_limit", self.onchain_limit),
            ("history_limit", self.history_limit),
            ("timeout_ms", self.timeout_ms),
        ] {
            if value == 0 {
                return Err(ValidationError::ZeroLimit { field });
            }
        }

        for (field, value) in [
            ("fundamental_endpoint", &self.fundamental_endpoint),
            ("onchain_endpoint", &self.onchain_endpoint),
            ("price_history_endpoint", &self.price_history_endpoint),
        ] {
            let valid = reqwest::Url::parse(value)
                .map(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
                .unwrap_or(false);
            if !valid {
                return Err(ValidationError::InvalidEndpoint {
                    field,
                    value: value.clone(),
                });
            }
        }

        Ok(())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::with_max_retries(self.max_retries)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

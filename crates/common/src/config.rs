//! Pipeline configuration loading.
//!
//! Configuration is explicit: the pipeline never reads ambient global
//! state. A `PipelineConfig` is built from a TOML file or from
//! `SUBRANK_*` environment variables and passed down by the caller.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    /// The config file is not valid TOML for [`PipelineConfig`].
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// A required environment variable is missing.
    #[error("{0} environment variable not set")]
    MissingVar(&'static str),

    /// An environment variable holds an unparsable value.
    #[error("{var} invalid: '{value}'")]
    InvalidVar {
        /// Variable name.
        var: &'static str,
        /// Offending value.
        value: String,
    },
}

/// Configuration surface consumed by the ranking pipeline.
///
/// Endpoints are composed from the gateway base URL, the API key, and a
/// subgraph id, so one deployment can target different subgraphs by
/// configuration alone.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Base URL of the indexing gateway.
    #[serde(default = "default_gateway_url")]
    pub gateway_url: String,

    /// API key for the gateway.
    pub api_key: String,

    /// Subgraph id of the primary record source.
    pub subgraph_id: String,

    /// Subgraph id of the name-service used for label resolution.
    pub label_subgraph_id: String,

    /// Decimal places of the minor-unit encoding (18 by ledger convention).
    #[serde(default = "default_scaling_decimals")]
    pub scaling_decimals: u32,

    /// Inclusive minimum total stake, in scaled token units.
    #[serde(default = "default_stake_threshold")]
    pub stake_threshold: f64,

    /// Exclusive minimum collected fees, in scaled token units.
    #[serde(default = "default_fee_threshold")]
    pub fee_threshold: f64,

    /// Number of records requested from the primary source (first page).
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Per-request timeout for source calls, in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_gateway_url() -> String {
    "https://gateway.thegraph.com".to_string()
}

fn default_scaling_decimals() -> u32 {
    18
}

fn default_stake_threshold() -> f64 {
    100_000.0
}

fn default_fee_threshold() -> f64 {
    0.0
}

fn default_page_size() -> usize {
    100
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl PipelineConfig {
    /// Loads configuration from a TOML file path.
    ///
    /// Missing optional keys fall back to defaults; `api_key`,
    /// `subgraph_id`, and `label_subgraph_id` are required.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let s = std::fs::read_to_string(path.as_ref())?;
        let cfg: PipelineConfig = toml::from_str(&s)?;
        Ok(cfg)
    }

    /// Builds configuration from environment variables.
    ///
    /// Required:
    /// - `SUBRANK_API_KEY`
    /// - `SUBRANK_SUBGRAPH_ID`
    /// - `SUBRANK_LABEL_SUBGRAPH_ID`
    ///
    /// Optional with defaults:
    /// - `SUBRANK_GATEWAY_URL` (default: `https://gateway.thegraph.com`)
    /// - `SUBRANK_SCALING_DECIMALS` (default: 18)
    /// - `SUBRANK_STAKE_THRESHOLD` (default: 100000)
    /// - `SUBRANK_FEE_THRESHOLD` (default: 0)
    /// - `SUBRANK_PAGE_SIZE` (default: 100)
    /// - `SUBRANK_TIMEOUT_MS` (default: 10000)
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = require_var("SUBRANK_API_KEY")?;
        let subgraph_id = require_var("SUBRANK_SUBGRAPH_ID")?;
        let label_subgraph_id = require_var("SUBRANK_LABEL_SUBGRAPH_ID")?;

        let gateway_url =
            std::env::var("SUBRANK_GATEWAY_URL").unwrap_or_else(|_| default_gateway_url());
        let scaling_decimals = parse_var("SUBRANK_SCALING_DECIMALS", default_scaling_decimals())?;
        let stake_threshold = parse_var("SUBRANK_STAKE_THRESHOLD", default_stake_threshold())?;
        let fee_threshold = parse_var("SUBRANK_FEE_THRESHOLD", default_fee_threshold())?;
        let page_size = parse_var("SUBRANK_PAGE_SIZE", default_page_size())?;
        let timeout_ms = parse_var("SUBRANK_TIMEOUT_MS", default_timeout_ms())?;

        Ok(Self {
            gateway_url,
            api_key,
            subgraph_id,
            label_subgraph_id,
            scaling_decimals,
            stake_threshold,
            fee_threshold,
            page_size,
            timeout_ms,
        })
    }

    /// Endpoint of the primary record source.
    #[must_use]
    pub fn subgraph_endpoint(&self) -> String {
        compose_endpoint(&self.gateway_url, &self.api_key, &self.subgraph_id)
    }

    /// Endpoint of the label-resolution source.
    #[must_use]
    pub fn label_endpoint(&self) -> String {
        compose_endpoint(&self.gateway_url, &self.api_key, &self.label_subgraph_id)
    }
}

/// Composes `{gateway}/api/{key}/subgraphs/id/{subgraph}`.
fn compose_endpoint(gateway_url: &str, api_key: &str, subgraph_id: &str) -> String {
    format!(
        "{}/api/{}/subgraphs/id/{}",
        gateway_url.trim_end_matches('/'),
        api_key,
        subgraph_id
    )
}

fn require_var(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingVar(name))
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(val) => val
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidVar { var: name, value: val }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_toml() -> &'static str {
        r#"
            api_key = "key-123"
            subgraph_id = "primary-subgraph"
            label_subgraph_id = "label-subgraph"
        "#
    }

    #[test]
    fn test_load_from_file_applies_defaults() {
        use std::io::Write;
        let tmp = tempfile::NamedTempFile::new().expect("temp file");
        let mut f = tmp.reopen().expect("reopen");
        write!(f, "{}", minimal_toml()).expect("write");

        let cfg = PipelineConfig::load_from_file(tmp.path()).expect("load");
        assert_eq!(cfg.api_key, "key-123");
        assert_eq!(cfg.gateway_url, "https://gateway.thegraph.com");
        assert_eq!(cfg.scaling_decimals, 18);
        assert_eq!(cfg.stake_threshold, 100_000.0);
        assert_eq!(cfg.fee_threshold, 0.0);
        assert_eq!(cfg.page_size, 100);
        assert_eq!(cfg.timeout_ms, 10_000);
    }

    #[test]
    fn test_load_from_file_overrides() {
        use std::io::Write;
        let tmp = tempfile::NamedTempFile::new().expect("temp file");
        let toml = r#"
            gateway_url = "http://localhost:8000/"
            api_key = "k"
            subgraph_id = "s"
            label_subgraph_id = "l"
            scaling_decimals = 6
            stake_threshold = 50.5
            fee_threshold = 1.0
            page_size = 25
            timeout_ms = 2500
        "#;
        let mut f = tmp.reopen().expect("reopen");
        write!(f, "{}", toml).expect("write");

        let cfg = PipelineConfig::load_from_file(tmp.path()).expect("load");
        assert_eq!(cfg.scaling_decimals, 6);
        assert_eq!(cfg.stake_threshold, 50.5);
        assert_eq!(cfg.fee_threshold, 1.0);
        assert_eq!(cfg.page_size, 25);
        assert_eq!(cfg.timeout_ms, 2500);
    }

    #[test]
    fn test_load_from_file_missing_required_key() {
        use std::io::Write;
        let tmp = tempfile::NamedTempFile::new().expect("temp file");
        let mut f = tmp.reopen().expect("reopen");
        write!(f, "api_key = \"only\"").expect("write");

        let err = PipelineConfig::load_from_file(tmp.path());
        assert!(matches!(err, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_from_file_missing_file() {
        let err = PipelineConfig::load_from_file("/definitely/not/here.toml");
        assert!(matches!(err, Err(ConfigError::Read(_))));
    }

    #[test]
    fn test_endpoint_composition() {
        let cfg = PipelineConfig {
            gateway_url: "https://gateway.example.com/".to_string(),
            api_key: "abc".to_string(),
            subgraph_id: "sub1".to_string(),
            label_subgraph_id: "sub2".to_string(),
            scaling_decimals: 18,
            stake_threshold: 100_000.0,
            fee_threshold: 0.0,
            page_size: 100,
            timeout_ms: 10_000,
        };
        assert_eq!(
            cfg.subgraph_endpoint(),
            "https://gateway.example.com/api/abc/subgraphs/id/sub1"
        );
        assert_eq!(
            cfg.label_endpoint(),
            "https://gateway.example.com/api/abc/subgraphs/id/sub2"
        );
    }

    // Environment-variable cases share one test body: parallel test threads
    // share the process environment.
    #[test]
    fn test_from_env_modes() {
        std::env::remove_var("SUBRANK_API_KEY");
        std::env::remove_var("SUBRANK_SUBGRAPH_ID");
        std::env::remove_var("SUBRANK_LABEL_SUBGRAPH_ID");
        std::env::remove_var("SUBRANK_PAGE_SIZE");

        let err = PipelineConfig::from_env();
        assert!(matches!(err, Err(ConfigError::MissingVar("SUBRANK_API_KEY"))));

        std::env::set_var("SUBRANK_API_KEY", "env-key");
        std::env::set_var("SUBRANK_SUBGRAPH_ID", "env-sub");
        std::env::set_var("SUBRANK_LABEL_SUBGRAPH_ID", "env-label");

        let cfg = PipelineConfig::from_env().expect("from_env");
        assert_eq!(cfg.api_key, "env-key");
        assert_eq!(cfg.page_size, 100);

        std::env::set_var("SUBRANK_PAGE_SIZE", "not-a-number");
        let err = PipelineConfig::from_env();
        assert!(matches!(
            err,
            Err(ConfigError::InvalidVar {
                var: "SUBRANK_PAGE_SIZE",
                ..
            })
        ));

        std::env::set_var("SUBRANK_PAGE_SIZE", "40");
        let cfg = PipelineConfig::from_env().expect("from_env");
        assert_eq!(cfg.page_size, 40);

        std::env::remove_var("SUBRANK_API_KEY");
        std::env::remove_var("SUBRANK_SUBGRAPH_ID");
        std::env::remove_var("SUBRANK_LABEL_SUBGRAPH_ID");
        std::env::remove_var("SUBRANK_PAGE_SIZE");
    }
}

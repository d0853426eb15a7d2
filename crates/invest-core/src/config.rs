//! Configuration for reconciliation runs

use crate::error::{InvestError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for reconciliation runs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    /// Sentiment scores file
    pub scores_path: PathBuf,

    /// Price snapshot file
    pub prices_path: PathBuf,

    /// Where the compact ranked output is written
    pub output_path: PathBuf,

    /// Number of companies kept by ranking
    pub top_n: usize,

    /// Minimum article count for ranking (only when the count is known)
    pub min_articles: u64,

    /// How long live quotes stay cached
    pub quote_cache_ttl: Duration,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            scores_path: PathBuf::from("crawling/db/company_scores.json"),
            prices_path: PathBuf::from("calling_api/db/all_prices.json"),
            output_path: PathBuf::from("ai/db/for_llm.json"),
            top_n: 50,
            min_articles: 20,
            quote_cache_ttl: Duration::from_secs(60),
        }
    }
}

impl ReconcileConfig {
    /// Create a new configuration builder
    pub fn builder() -> ReconcileConfigBuilder {
        ReconcileConfigBuilder::default()
    }

    /// Apply `INVEST_SCORES_PATH`, `INVEST_PRICES_PATH` and `INVEST_OUTPUT_PATH`
    pub fn with_env(mut self) -> Self {
        if let Ok(path) = std::env::var("INVEST_SCORES_PATH") {
            self.scores_path = PathBuf::from(path);
        }
        if let Ok(path) = std::env::var("INVEST_PRICES_PATH") {
            self.prices_path = PathBuf::from(path);
        }
        if let Ok(path) = std::env::var("INVEST_OUTPUT_PATH") {
            self.output_path = PathBuf::from(path);
        }
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.scores_path.as_os_str().is_empty() {
            return Err(InvestError::ConfigError(
                "scores_path must not be empty".to_string(),
            ));
        }

        if self.prices_path.as_os_str().is_empty() {
            return Err(InvestError::ConfigError(
                "prices_path must not be empty".to_string(),
            ));
        }

        if self.quote_cache_ttl.is_zero() {
            return Err(InvestError::ConfigError(
                "quote_cache_ttl must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for ReconcileConfig
#[derive(Debug, Default)]
pub struct ReconcileConfigBuilder {
    scores_path: Option<PathBuf>,
    prices_path: Option<PathBuf>,
    output_path: Option<PathBuf>,
    top_n: Option<usize>,
    min_articles: Option<u64>,
    quote_cache_ttl: Option<Duration>,
}

impl ReconcileConfigBuilder {
    pub fn scores_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.scores_path = Some(path.into());
        self
    }

    pub fn prices_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.prices_path = Some(path.into());
        self
    }

    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    pub fn top_n(mut self, top_n: usize) -> Self {
        self.top_n = Some(top_n);
        self
    }

    pub fn min_articles(mut self, min_articles: u64) -> Self {
        self.min_articles = Some(min_articles);
        self
    }

    pub fn quote_cache_ttl(mut self, ttl: Duration) -> Self {
        self.quote_cache_ttl = Some(ttl);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<ReconcileConfig> {
        let defaults = ReconcileConfig::default();

        let config = ReconcileConfig {
            scores_path: self.scores_path.unwrap_or(defaults.scores_path),
            prices_path: self.prices_path.unwrap_or(defaults.prices_path),
            output_path: self.output_path.unwrap_or(defaults.output_path),
            top_n: self.top_n.unwrap_or(defaults.top_n),
            min_articles: self.min_articles.unwrap_or(defaults.min_articles),
            quote_cache_ttl: self.quote_cache_ttl.unwrap_or(defaults.quote_cache_ttl),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ReconcileConfig::default();
        assert_eq!(config.top_n, 50);
        assert_eq!(config.min_articles, 20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = ReconcileConfig::builder()
            .scores_path("scores.json")
            .top_n(5)
            .min_articles(0)
            .build()
            .unwrap();

        assert_eq!(config.scores_path, PathBuf::from("scores.json"));
        assert_eq!(config.top_n, 5);
        assert_eq!(config.min_articles, 0);
    }

    #[test]
    fn test_validation_empty_path() {
        let result = ReconcileConfig::builder().prices_path("").build();
        assert!(matches!(result, Err(InvestError::ConfigError(_))));
    }

    #[test]
    fn test_validation_zero_ttl() {
        let config = ReconcileConfig {
            quote_cache_ttl: Duration::ZERO,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}

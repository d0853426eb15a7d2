//! Quote collaborator contract and implementations
//!
//! A quote lookup never fails with an error type: collaborator failures
//! (network, unknown symbol, empty input) come back as a [`QuoteResult`] whose
//! `error` carries a message the caller can show inline.

mod cache;
mod snapshot;
mod yahoo;

pub use cache::CachedQuoteProvider;
pub use snapshot::SnapshotQuoteProvider;
pub use yahoo::YahooQuoteProvider;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Message returned for an empty lookup
pub const EMPTY_QUERY_MESSAGE: &str = "Please enter a stock code or company name.";

/// Result of one quote lookup
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteResult {
    /// Identifier the caller asked for
    pub company: String,
    /// Ticker the provider resolved it to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<u64>,
    /// Absolute change against the previous close
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change: Option<f64>,
    /// Percent change against the previous close
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_rate: Option<f64>,
    /// Chart x-axis labels (dates)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub chart_labels: Vec<String>,
    /// Chart closes, aligned with `chart_labels`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub chart_prices: Vec<f64>,
    /// Set when the lookup failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl QuoteResult {
    /// Successful lookup with just a price
    pub fn with_price(company: impl Into<String>, price: Option<f64>) -> Self {
        Self {
            company: company.into(),
            price,
            ..Self::default()
        }
    }

    /// Failed lookup
    pub fn failure(company: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            company: company.into(),
            error: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Trait for quote sources
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Look up the latest quote for a company name or stock code
    async fn quote(&self, company: &str) -> QuoteResult;

    /// Provider name for logs
    fn name(&self) -> &str;
}

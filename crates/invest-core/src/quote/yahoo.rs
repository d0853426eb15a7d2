//! Yahoo Finance quote provider

use super::{EMPTY_QUERY_MESSAGE, QuoteProvider, QuoteResult};
use crate::error::{InvestError, Result};
use crate::naming::MarketCodes;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use time::OffsetDateTime;
use tracing::{debug, instrument, warn};
use yahoo_finance_api as yahoo;

/// Korea Exchange suffix for six-digit codes
const DEFAULT_SUFFIX: &str = ".KS";
const DEFAULT_CHART_DAYS: i64 = 30;

/// Live quotes from Yahoo Finance
///
/// Company names are resolved to tickers through the market code map
/// (`005930` becomes `005930.KS`); a bare six-digit code gets the suffix
/// directly, and anything else is used as a ticker as-is.
pub struct YahooQuoteProvider {
    codes: MarketCodes,
    suffix: String,
    chart_days: i64,
}

impl YahooQuoteProvider {
    pub fn new(codes: MarketCodes) -> Self {
        Self {
            codes,
            suffix: DEFAULT_SUFFIX.to_string(),
            chart_days: DEFAULT_CHART_DAYS,
        }
    }

    /// Exchange suffix appended to numeric codes (e.g. `.KQ` for KOSDAQ)
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Days of daily closes returned as the chart series
    pub fn with_chart_days(mut self, days: i64) -> Self {
        self.chart_days = days.max(2);
        self
    }

    /// Ticker for a company name or code
    pub fn resolve_symbol(&self, company: &str) -> String {
        if let Some(code) = self.codes.code_for(company) {
            return format!("{code}{}", self.suffix);
        }
        if company.len() == 6 && company.chars().all(|c| c.is_ascii_digit()) {
            return format!("{company}{}", self.suffix);
        }
        company.to_uppercase()
    }

    async fn fetch(&self, company: &str, symbol: &str) -> Result<QuoteResult> {
        let provider =
            yahoo::YahooConnector::new().map_err(|e| InvestError::QuoteError(e.to_string()))?;

        let end = Utc::now();
        let start = end - chrono::Duration::days(self.chart_days);
        let start = OffsetDateTime::from_unix_timestamp(start.timestamp())
            .map_err(|e| InvestError::QuoteError(format!("Invalid start timestamp: {e}")))?;
        let end = OffsetDateTime::from_unix_timestamp(end.timestamp())
            .map_err(|e| InvestError::QuoteError(format!("Invalid end timestamp: {e}")))?;

        let response = provider
            .get_quote_history(symbol, start, end)
            .await
            .map_err(|e| InvestError::QuoteError(e.to_string()))?;
        let quotes = response
            .quotes()
            .map_err(|e| InvestError::QuoteError(e.to_string()))?;

        let Some(last) = quotes.last() else {
            return Err(InvestError::QuoteError(format!("No quotes for {symbol}")));
        };

        let previous_close = quotes
            .len()
            .checked_sub(2)
            .and_then(|i| quotes.get(i))
            .map(|q| q.close);
        let change = previous_close.map(|prev| last.close - prev);
        let change_rate = previous_close
            .filter(|prev| *prev != 0.0)
            .map(|prev| (last.close - prev) / prev * 100.0);

        let chart_labels = quotes
            .iter()
            .map(|q| {
                DateTime::from_timestamp(q.timestamp as i64, 0)
                    .unwrap_or_else(Utc::now)
                    .format("%Y-%m-%d")
                    .to_string()
            })
            .collect();
        let chart_prices = quotes.iter().map(|q| q.close).collect();

        Ok(QuoteResult {
            company: company.to_string(),
            symbol: Some(symbol.to_string()),
            price: Some(last.close),
            open: Some(last.open),
            high: Some(last.high),
            low: Some(last.low),
            volume: Some(last.volume),
            change,
            change_rate,
            chart_labels,
            chart_prices,
            error: None,
        })
    }
}

#[async_trait]
impl QuoteProvider for YahooQuoteProvider {
    #[instrument(skip(self))]
    async fn quote(&self, company: &str) -> QuoteResult {
        let company = company.trim();
        if company.is_empty() {
            return QuoteResult::failure(company, EMPTY_QUERY_MESSAGE);
        }

        let symbol = self.resolve_symbol(company);
        debug!(symbol = %symbol, "Fetching quote from Yahoo Finance");

        match self.fetch(company, &symbol).await {
            Ok(result) => result,
            Err(e) => {
                warn!(symbol = %symbol, error = %e, "Quote lookup failed");
                QuoteResult::failure(company, format!("Quote lookup failed for {company}: {e}"))
            }
        }
    }

    fn name(&self) -> &str {
        "yahoo"
    }
}

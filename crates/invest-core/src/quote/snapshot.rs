//! Quotes answered from a reconciled snapshot

use super::{EMPTY_QUERY_MESSAGE, QuoteProvider, QuoteResult};
use crate::reconcile::ReconciledSet;
use async_trait::async_trait;
use std::sync::Arc;

/// Serves the last reconciled price for each company
pub struct SnapshotQuoteProvider {
    companies: Arc<ReconciledSet>,
}

impl SnapshotQuoteProvider {
    pub fn new(companies: Arc<ReconciledSet>) -> Self {
        Self { companies }
    }
}

#[async_trait]
impl QuoteProvider for SnapshotQuoteProvider {
    async fn quote(&self, company: &str) -> QuoteResult {
        let company = company.trim();
        if company.is_empty() {
            return QuoteResult::failure(company, EMPTY_QUERY_MESSAGE);
        }

        match self.companies.get(company).and_then(|record| record.price) {
            Some(price) => QuoteResult::with_price(company, Some(price)),
            None => QuoteResult::failure(company, format!("No price data for {company}")),
        }
    }

    fn name(&self) -> &str {
        "snapshot"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::price::PriceEntry;
    use crate::reconcile::reconcile;
    use crate::sentiment::SentimentSource;

    fn provider() -> SnapshotQuoteProvider {
        let prices = vec![PriceEntry {
            company: "A".to_string(),
            price: 72000.0,
        }];
        SnapshotQuoteProvider::new(Arc::new(reconcile(&SentimentSource::default(), &prices)))
    }

    #[tokio::test]
    async fn test_known_company() {
        let result = provider().quote(" A ").await;
        assert_eq!(result.company, "A");
        assert_eq!(result.price, Some(72000.0));
        assert!(!result.is_error());
    }

    #[tokio::test]
    async fn test_unknown_and_empty() {
        let provider = provider();
        assert!(provider.quote("B").await.is_error());

        let empty = provider.quote("   ").await;
        assert_eq!(empty.error.as_deref(), Some(EMPTY_QUERY_MESSAGE));
    }
}

//! Reconciliation, ranking and compact serialization

use crate::error::{InvestError, Result};
use crate::price::PriceEntry;
use crate::record::{CompactRecord, CompanyRecord};
use crate::sentiment::SentimentSource;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// Records produced by one reconciliation run, unique by name
///
/// Order is deterministic: sentiment companies in source order, then
/// price-only companies in the order their first price appeared.
#[derive(Debug, Clone, Default)]
pub struct ReconciledSet {
    records: Vec<CompanyRecord>,
    index: HashMap<String, usize>,
}

impl ReconciledSet {
    fn upsert_price(&mut self, company: &str, price: f64) {
        match self.index.get(company) {
            Some(&slot) => self.records[slot].price = Some(price),
            None => {
                self.index.insert(company.to_string(), self.records.len());
                self.records.push(CompanyRecord::with_price(company, price));
            }
        }
    }

    fn push(&mut self, record: CompanyRecord) {
        match self.index.get(&record.name) {
            Some(&slot) => self.records[slot] = record,
            None => {
                self.index.insert(record.name.clone(), self.records.len());
                self.records.push(record);
            }
        }
    }

    /// Look up a company by exact name
    pub fn get(&self, name: &str) -> Option<&CompanyRecord> {
        self.index.get(name).map(|&slot| &self.records[slot])
    }

    pub fn records(&self) -> &[CompanyRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CompanyRecord> {
        self.records.iter()
    }

    /// Records keyed by name, for order-insensitive comparison
    pub fn by_name(&self) -> HashMap<&str, &CompanyRecord> {
        self.records.iter().map(|r| (r.name.as_str(), r)).collect()
    }
}

impl<'a> IntoIterator for &'a ReconciledSet {
    type Item = &'a CompanyRecord;
    type IntoIter = std::slice::Iter<'a, CompanyRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Merge a sentiment snapshot with resolved prices
///
/// Sentiment builds the initial records. Each price then overwrites the
/// `price` of an existing record or creates a price-only one; a company priced
/// more than once keeps the last price. Sentiment fields are never touched by
/// the price pass.
pub fn reconcile(sentiment: &SentimentSource, prices: &[PriceEntry]) -> ReconciledSet {
    let mut set = ReconciledSet::default();
    for record in sentiment.to_records() {
        set.push(record);
    }

    let scored = set.len();
    for entry in prices {
        set.upsert_price(&entry.company, entry.price);
    }

    info!(
        companies = set.len(),
        scored,
        price_only = set.len() - scored,
        prices = prices.len(),
        "Reconciled company data"
    );
    set
}

/// Top companies by sentiment score
///
/// Drops records without a score and records whose `total_articles` is known
/// and below `min_articles`. Sorting is stable so equal scores keep their
/// input order. Returns at most `top_n` records.
pub fn rank<'a, I>(records: I, top_n: usize, min_articles: u64) -> Vec<CompanyRecord>
where
    I: IntoIterator<Item = &'a CompanyRecord>,
{
    if top_n == 0 {
        return Vec::new();
    }

    let mut eligible: Vec<&CompanyRecord> = records
        .into_iter()
        .filter(|record| record.sentiment_score.is_some())
        .filter(|record| {
            record
                .total_articles
                .is_none_or(|total| total >= min_articles)
        })
        .collect();

    // `sort_by` is a stable merge sort.
    eligible.sort_by(|a, b| {
        let a = a.sentiment_score.unwrap_or(f64::NEG_INFINITY);
        let b = b.sentiment_score.unwrap_or(f64::NEG_INFINITY);
        b.total_cmp(&a)
    });

    debug!(eligible = eligible.len(), top_n, min_articles, "Ranked companies");
    eligible.into_iter().take(top_n).cloned().collect()
}

/// Compact representation with absent fields omitted, in record order
pub fn to_compact_representation<'a, I>(records: I) -> Vec<CompactRecord>
where
    I: IntoIterator<Item = &'a CompanyRecord>,
{
    records.into_iter().map(CompanyRecord::to_compact).collect()
}

/// Pretty-printed JSON of the compact representation
pub fn to_compact_json<'a, I>(records: I) -> Result<String>
where
    I: IntoIterator<Item = &'a CompanyRecord>,
{
    Ok(serde_json::to_string_pretty(&to_compact_representation(records))?)
}

/// Write the compact representation to `path`, creating parent directories
pub fn save_compact<'a, I>(records: I, path: impl AsRef<Path>) -> Result<()>
where
    I: IntoIterator<Item = &'a CompanyRecord>,
{
    let path = path.as_ref();
    let json = to_compact_json(records)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| InvestError::Io {
            path: parent.display().to_string(),
            source,
        })?;
    }

    std::fs::write(path, json).map_err(|source| InvestError::Io {
        path: path.display().to_string(),
        source,
    })?;

    info!(path = %path.display(), "Saved compact company data");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::price::resolve_prices;
    use serde_json::json;

    fn sentiment(value: serde_json::Value) -> SentimentSource {
        SentimentSource::from_value(&value, "scores").unwrap().0
    }

    fn prices(value: serde_json::Value) -> Vec<PriceEntry> {
        resolve_prices(&value, "prices").unwrap().0
    }

    fn scored(name: &str, score: f64, total: Option<u64>) -> CompanyRecord {
        CompanyRecord {
            name: name.to_string(),
            sentiment_score: Some(score),
            total_articles: total,
            ..CompanyRecord::default()
        }
    }

    #[test]
    fn test_worked_example() {
        let set = reconcile(
            &sentiment(json!({
                "A": { "positive_count": 36, "negative_count": 0, "neutral_count": 14,
                       "total_articles": 50, "company_score": 36 }
            })),
            &prices(json!({ "A": { "price": 72000 } })),
        );

        assert_eq!(set.len(), 1);
        let compact = serde_json::to_value(to_compact_representation(&set)).unwrap();
        assert_eq!(
            compact,
            json!([{
                "name": "A", "score": 36, "positive": 36, "negative": 0, "neutral": 14,
                "total_articles": 50, "price": 72000.0
            }])
        );
    }

    #[test]
    fn test_sentiment_only() {
        let source = sentiment(json!({
            "A": { "company_score": 1 },
            "B": { "company_score": 2 },
        }));
        let set = reconcile(&source, &[]);

        assert_eq!(set.len(), source.len());
        assert!(set.iter().all(|r| r.price.is_none()));
    }

    #[test]
    fn test_price_only() {
        let set = reconcile(
            &SentimentSource::default(),
            &prices(json!([{ "company": "B", "stck_prpr": "1,006.50" }])),
        );

        assert_eq!(set.len(), 1);
        let record = set.get("B").unwrap();
        assert_eq!(record.price, Some(1006.5));
        assert!(!record.has_sentiment());
    }

    #[test]
    fn test_last_price_wins_and_sentiment_untouched() {
        let set = reconcile(
            &sentiment(json!({ "A": { "company_score": 4, "total_articles": 9 } })),
            &prices(json!([
                { "company": "A", "stck_prpr": "100" },
                { "company": "Z", "stck_prpr": "1" },
                { "company": "A", "stck_prpr": "120" },
            ])),
        );

        let a = set.get("A").unwrap();
        assert_eq!(a.price, Some(120.0));
        assert_eq!(a.sentiment_score, Some(4.0));
        assert_eq!(a.total_articles, Some(9));

        let names: Vec<_> = set.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["A", "Z"]);
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let source = sentiment(json!({ "A": { "company_score": 1 }, "B": { "company_score": -3 } }));
        let price_entries = prices(json!({ "B": 10, "C": { "close": 5 } }));

        let first = reconcile(&source, &price_entries);
        let second = reconcile(&source, &price_entries);
        assert_eq!(first.by_name(), second.by_name());
    }

    #[test]
    fn test_rank_filters_and_sorts() {
        let records = vec![
            scored("low", 1.0, Some(30)),
            CompanyRecord::with_price("unscored", 10.0),
            scored("few_articles", 50.0, Some(3)),
            scored("unknown_total", 7.0, None),
            scored("high", 20.0, Some(40)),
            scored("at_floor", 4.0, Some(20)),
            scored("below_floor", 30.0, Some(19)),
        ];

        let ranked = rank(&records, 10, 20);
        let names: Vec<_> = ranked.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["high", "unknown_total", "at_floor", "low"]);
    }

    #[test]
    fn test_rank_ties_keep_input_order() {
        let records = vec![
            scored("first", 5.0, None),
            scored("top", 9.0, None),
            scored("second", 5.0, None),
            scored("third", 5.0, None),
        ];

        let ranked = rank(&records, 4, 0);
        let names: Vec<_> = ranked.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["top", "first", "second", "third"]);
        assert_eq!(rank(&records, 4, 0), ranked);
    }

    #[test]
    fn test_rank_truncates_and_zero() {
        let records = vec![scored("a", 3.0, None), scored("b", 2.0, None), scored("c", 1.0, None)];

        assert_eq!(rank(&records, 2, 0).len(), 2);
        assert_eq!(rank(&records, 10, 0).len(), 3);
        assert!(rank(&records, 0, 0).is_empty());
    }

    #[test]
    fn test_compact_preserves_order() {
        let records = vec![scored("b", 1.0, None), CompanyRecord::with_price("a", 2.0)];
        let compact = to_compact_representation(&records);
        assert_eq!(compact[0].name, "b");
        assert_eq!(compact[1].name, "a");
        assert!(compact[1].score.is_none());
    }

    #[test]
    fn test_save_compact_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db").join("for_llm.json");
        let records = vec![scored("A", 36.0, Some(50))];

        save_compact(&records, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains('\n'));
        let parsed: Vec<CompactRecord> = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, to_compact_representation(&records));
    }
}

//! Sentiment score ingestion and article label aggregation
//!
//! The sentiment source is a JSON object keyed by company name:
//!
//! ```json
//! {
//!   "삼성전자": {
//!     "positive_count": 36,
//!     "negative_count": 0,
//!     "neutral_count": 14,
//!     "total_articles": 50,
//!     "company_score": 36
//!   }
//! }
//! ```
//!
//! `company_score` is taken as-is. It is close to `positive_count - negative_count`
//! for pipeline-produced files but nothing here assumes the two agree.

use crate::error::{InvestError, Result};
use crate::record::{CompanyRecord, IngestStats};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::debug;

/// Per-company sentiment counts as stored in the scores file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub positive_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neutral_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_articles: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_score: Option<f64>,
}

impl SentimentEntry {
    /// Read an entry leniently: fields of the wrong type count as absent
    fn from_object(object: &Map<String, Value>) -> Self {
        Self {
            positive_count: object.get("positive_count").and_then(Value::as_u64),
            negative_count: object.get("negative_count").and_then(Value::as_u64),
            neutral_count: object.get("neutral_count").and_then(Value::as_u64),
            total_articles: object.get("total_articles").and_then(Value::as_u64),
            company_score: object.get("company_score").and_then(Value::as_f64),
        }
    }

    fn into_record(self, name: String) -> CompanyRecord {
        CompanyRecord {
            name,
            sentiment_score: self.company_score,
            positive_count: self.positive_count,
            negative_count: self.negative_count,
            neutral_count: self.neutral_count,
            total_articles: self.total_articles,
            price: None,
        }
    }
}

/// Immutable snapshot of the sentiment scores file, in file order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SentimentSource {
    entries: Vec<(String, SentimentEntry)>,
    index: HashMap<String, usize>,
}

impl SentimentSource {
    /// Parse a decoded scores document
    ///
    /// `origin` names the source in errors. A top level that is not an object
    /// is fatal; a company whose value is not an object is skipped.
    pub fn from_value(value: &Value, origin: &str) -> Result<(Self, IngestStats)> {
        let object = value.as_object().ok_or_else(|| {
            InvestError::unavailable(origin, "expected a JSON object keyed by company name")
        })?;

        let mut stats = IngestStats::default();
        let mut source = Self::with_capacity(object.len());
        for (name, raw) in object {
            match raw.as_object() {
                Some(fields) => {
                    source.insert(name.clone(), SentimentEntry::from_object(fields));
                    stats.accept();
                }
                None => {
                    debug!(company = %name, "Skipping sentiment entry that is not an object");
                    stats.skip();
                }
            }
        }

        Ok((source, stats))
    }

    /// Build directly from entries; later duplicates replace earlier ones
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, SentimentEntry)>,
        S: Into<String>,
    {
        let mut source = Self::default();
        for (name, entry) in entries {
            source.insert(name.into(), entry);
        }
        source
    }

    fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    fn insert(&mut self, name: String, entry: SentimentEntry) {
        match self.index.get(&name) {
            Some(&slot) => self.entries[slot].1 = entry,
            None => {
                self.index.insert(name.clone(), self.entries.len());
                self.entries.push((name, entry));
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&SentimentEntry> {
        self.index.get(name).map(|&slot| &self.entries[slot].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SentimentEntry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    /// One record per company, price left absent
    pub fn to_records(&self) -> Vec<CompanyRecord> {
        self.entries
            .iter()
            .map(|(name, entry)| entry.clone().into_record(name.clone()))
            .collect()
    }

    /// Serialize back to the scores file shape
    pub fn to_value(&self) -> Value {
        let mut object = Map::with_capacity(self.entries.len());
        for (name, entry) in &self.entries {
            object.insert(
                name.clone(),
                serde_json::to_value(entry).unwrap_or(Value::Null),
            );
        }
        Value::Object(object)
    }
}

/// Polarity assigned to one article by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleLabel {
    Positive,
    Negative,
    Neutral,
}

impl ArticleLabel {
    /// Parse a classifier label, case-insensitively
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "positive" | "pos" => Some(Self::Positive),
            "negative" | "neg" => Some(Self::Negative),
            "neutral" | "neu" => Some(Self::Neutral),
            _ => None,
        }
    }

    /// Map a signed per-article point to a polarity
    pub fn from_point(point: f64) -> Self {
        if point > 0.0 {
            Self::Positive
        } else if point < 0.0 {
            Self::Negative
        } else {
            Self::Neutral
        }
    }

    /// Label from an article object: `label` string first, then numeric `point`
    fn from_article(article: &Value) -> Option<Self> {
        if let Some(label) = article.get("label").and_then(Value::as_str) {
            if let Some(parsed) = Self::parse(label) {
                return Some(parsed);
            }
        }
        article
            .get("point")
            .and_then(Value::as_f64)
            .map(Self::from_point)
    }
}

/// Articles of one company: a bare array, or an object carrying a `news` array
fn company_articles(value: &Value) -> Option<&Vec<Value>> {
    match value {
        Value::Array(articles) => Some(articles),
        Value::Object(object) => object.get("news").and_then(Value::as_array),
        _ => None,
    }
}

/// Aggregate per-article classifier output into a sentiment source
///
/// Input maps company name to either an array of articles or an object with a
/// `news` array (`{"news": [{"title", "point"}], "sum": N}`); any `sum` is
/// ignored. Articles without a recognizable `label` or `point` are skipped and
/// not counted in `total_articles`. The score is `positive - negative`.
pub fn aggregate_articles(value: &Value, origin: &str) -> Result<(SentimentSource, IngestStats)> {
    let object = value.as_object().ok_or_else(|| {
        InvestError::unavailable(origin, "expected a JSON object keyed by company name")
    })?;

    let mut stats = IngestStats::default();
    let mut source = SentimentSource::with_capacity(object.len());

    for (company, raw) in object {
        let Some(articles) = company_articles(raw) else {
            debug!(company = %company, "Skipping company without an article list");
            stats.skip();
            continue;
        };

        let (mut positive, mut negative, mut neutral) = (0_u64, 0_u64, 0_u64);
        for article in articles {
            match ArticleLabel::from_article(article) {
                Some(ArticleLabel::Positive) => positive += 1,
                Some(ArticleLabel::Negative) => negative += 1,
                Some(ArticleLabel::Neutral) => neutral += 1,
                None => {
                    debug!(company = %company, "Skipping article without label or point");
                    stats.skip();
                    continue;
                }
            }
            stats.accept();
        }

        source.insert(
            company.clone(),
            SentimentEntry {
                positive_count: Some(positive),
                negative_count: Some(negative),
                neutral_count: Some(neutral),
                total_articles: Some(positive + negative + neutral),
                company_score: Some(positive as f64 - negative as f64),
            },
        );
    }

    Ok((source, stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_scores_in_file_order() {
        let value = json!({
            "Zeta": { "positive_count": 1, "negative_count": 0, "neutral_count": 0,
                      "total_articles": 1, "company_score": 1 },
            "Alpha": { "positive_count": 0, "negative_count": 2, "neutral_count": 1,
                       "total_articles": 3, "company_score": -2 },
        });

        let (source, stats) = SentimentSource::from_value(&value, "scores.json").unwrap();
        assert_eq!(stats, IngestStats { accepted: 2, skipped: 0 });

        let names: Vec<_> = source.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["Zeta", "Alpha"]);
        assert_eq!(source.get("Alpha").unwrap().company_score, Some(-2.0));
    }

    #[test]
    fn test_records_have_no_price() {
        let value = json!({ "A": { "company_score": 3 } });
        let (source, _) = SentimentSource::from_value(&value, "scores.json").unwrap();

        let records = source.to_records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].sentiment_score, Some(3.0));
        assert_eq!(records[0].positive_count, None);
        assert_eq!(records[0].price, None);
    }

    #[test]
    fn test_score_not_recomputed() {
        let value = json!({ "A": { "positive_count": 10, "negative_count": 2, "company_score": 5 } });
        let (source, _) = SentimentSource::from_value(&value, "scores.json").unwrap();
        assert_eq!(source.to_records()[0].sentiment_score, Some(5.0));
    }

    #[test]
    fn test_non_object_top_level_is_unavailable() {
        let result = SentimentSource::from_value(&json!([1, 2, 3]), "scores.json");
        assert!(matches!(
            result,
            Err(InvestError::DataSourceUnavailable { .. })
        ));
    }

    #[test]
    fn test_non_object_entry_is_skipped() {
        let value = json!({ "A": 5, "B": { "company_score": 1 } });
        let (source, stats) = SentimentSource::from_value(&value, "scores.json").unwrap();
        assert_eq!(source.len(), 1);
        assert_eq!(stats.skipped, 1);
    }

    #[test]
    fn test_label_parsing() {
        assert_eq!(ArticleLabel::parse("Positive"), Some(ArticleLabel::Positive));
        assert_eq!(ArticleLabel::parse(" NEG "), Some(ArticleLabel::Negative));
        assert_eq!(ArticleLabel::parse("neutral"), Some(ArticleLabel::Neutral));
        assert_eq!(ArticleLabel::parse("bullish"), None);
        assert_eq!(ArticleLabel::from_point(3.0), ArticleLabel::Positive);
        assert_eq!(ArticleLabel::from_point(-1.0), ArticleLabel::Negative);
        assert_eq!(ArticleLabel::from_point(0.0), ArticleLabel::Neutral);
    }

    #[test]
    fn test_aggregate_articles() {
        let value = json!({
            "A": [
                { "title": "up", "label": "positive" },
                { "title": "up again", "point": 4 },
                { "title": "down", "label": "negative" },
                { "title": "flat", "point": 0 },
                { "title": "garbage" }
            ],
            "B": "not a list"
        });

        let (source, stats) = aggregate_articles(&value, "response.json").unwrap();
        assert_eq!(source.len(), 1);
        assert_eq!(stats, IngestStats { accepted: 4, skipped: 2 });

        let entry = source.get("A").unwrap();
        assert_eq!(entry.positive_count, Some(2));
        assert_eq!(entry.negative_count, Some(1));
        assert_eq!(entry.neutral_count, Some(1));
        assert_eq!(entry.total_articles, Some(4));
        assert_eq!(entry.company_score, Some(1.0));
    }

    #[test]
    fn test_aggregate_news_objects() {
        let value = json!({
            "A": { "news": [
                { "title": "beat", "point": 3 },
                { "title": "miss", "point": -2 },
                { "title": "flat", "point": 0 }
            ], "sum": 1 },
            "B": { "sum": 4 }
        });

        let (source, stats) = aggregate_articles(&value, "response.json").unwrap();
        assert_eq!(source.len(), 1);
        assert_eq!(stats, IngestStats { accepted: 3, skipped: 1 });

        let entry = source.get("A").unwrap();
        assert_eq!(entry.positive_count, Some(1));
        assert_eq!(entry.negative_count, Some(1));
        assert_eq!(entry.neutral_count, Some(1));
        assert_eq!(entry.company_score, Some(0.0));
    }

    #[test]
    fn test_from_entries_later_duplicate_replaces() {
        let source = SentimentSource::from_entries([
            ("A", SentimentEntry { company_score: Some(1.0), ..SentimentEntry::default() }),
            ("B", SentimentEntry { company_score: Some(2.0), ..SentimentEntry::default() }),
            ("A", SentimentEntry { company_score: Some(3.0), ..SentimentEntry::default() }),
        ]);

        assert_eq!(source.len(), 2);
        assert_eq!(source.get("A").unwrap().company_score, Some(3.0));
        let names: Vec<_> = source.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn test_to_value_matches_scores_shape() {
        let source = SentimentSource::from_entries([(
            "A",
            SentimentEntry {
                positive_count: Some(1),
                negative_count: Some(0),
                neutral_count: Some(0),
                total_articles: Some(1),
                company_score: Some(1.0),
            },
        )]);

        let value = source.to_value();
        let (reparsed, _) = SentimentSource::from_value(&value, "roundtrip").unwrap();
        assert_eq!(reparsed, source);
    }
}

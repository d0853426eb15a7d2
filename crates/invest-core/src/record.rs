//! Per-company record types

use serde::{Deserialize, Serialize, Serializer};

/// One reconciled company entry
///
/// Every optional field is `None` when its source had nothing for this company;
/// `None` is never collapsed to zero.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompanyRecord {
    /// Company name, unique within a reconciliation run
    pub name: String,
    /// Net sentiment score as stored by the sentiment pipeline
    pub sentiment_score: Option<f64>,
    pub positive_count: Option<u64>,
    pub negative_count: Option<u64>,
    pub neutral_count: Option<u64>,
    pub total_articles: Option<u64>,
    /// Latest trade price
    pub price: Option<f64>,
}

impl CompanyRecord {
    /// Record carrying only a price
    pub fn with_price(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            price: Some(price),
            ..Self::default()
        }
    }

    /// Whether any sentiment field is populated
    pub fn has_sentiment(&self) -> bool {
        self.sentiment_score.is_some()
            || self.positive_count.is_some()
            || self.negative_count.is_some()
            || self.neutral_count.is_some()
            || self.total_articles.is_some()
    }

    /// Compact form with absent fields dropped
    pub fn to_compact(&self) -> CompactRecord {
        CompactRecord {
            name: self.name.clone(),
            score: self.sentiment_score,
            positive: self.positive_count,
            negative: self.negative_count,
            neutral: self.neutral_count,
            total_articles: self.total_articles,
            price: self.price,
        }
    }
}

impl From<CompactRecord> for CompanyRecord {
    fn from(compact: CompactRecord) -> Self {
        Self {
            name: compact.name,
            sentiment_score: compact.score,
            positive_count: compact.positive,
            negative_count: compact.negative,
            neutral_count: compact.neutral,
            total_articles: compact.total_articles,
            price: compact.price,
        }
    }
}

/// Serialized shape of a [`CompanyRecord`] for prompt embedding
///
/// Absent fields are omitted from the JSON output entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompactRecord {
    pub name: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_score"
    )]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub positive: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neutral: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_articles: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

// Scores are integers in practice; keep them integral in the output.
#[allow(clippy::ref_option)]
fn serialize_score<S: Serializer>(score: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    match score {
        Some(value) if value.fract() == 0.0 && value.abs() < 9.0e15 => {
            serializer.serialize_i64(*value as i64)
        }
        Some(value) => serializer.serialize_f64(*value),
        None => serializer.serialize_none(),
    }
}

/// Counters for one ingestion pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    /// Entries that produced a value
    pub accepted: usize,
    /// Entries skipped as malformed
    pub skipped: usize,
}

impl IngestStats {
    pub(crate) fn accept(&mut self) {
        self.accepted += 1;
    }

    pub(crate) fn skip(&mut self) {
        self.skipped += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_compact_omits_absent_fields() {
        let record = CompanyRecord::with_price("B", 1006.5);
        let value = serde_json::to_value(record.to_compact()).unwrap();
        assert_eq!(value, json!({ "name": "B", "price": 1006.5 }));
    }

    #[test]
    fn test_compact_keeps_zero_counts() {
        let record = CompanyRecord {
            name: "A".to_string(),
            sentiment_score: Some(0.0),
            negative_count: Some(0),
            ..CompanyRecord::default()
        };
        let value = serde_json::to_value(record.to_compact()).unwrap();
        assert_eq!(value, json!({ "name": "A", "score": 0, "negative": 0 }));
    }

    #[test]
    fn test_fractional_score_stays_fractional() {
        let record = CompanyRecord {
            name: "C".to_string(),
            sentiment_score: Some(-2.5),
            ..CompanyRecord::default()
        };
        let text = serde_json::to_string(&record.to_compact()).unwrap();
        assert_eq!(text, r#"{"name":"C","score":-2.5}"#);
    }

    #[test]
    fn test_compact_round_trip() {
        let record = CompanyRecord {
            name: "삼성전자".to_string(),
            sentiment_score: Some(12.0),
            positive_count: Some(20),
            negative_count: Some(8),
            neutral_count: Some(3),
            total_articles: Some(31),
            price: Some(72000.0),
        };
        let text = serde_json::to_string(&record.to_compact()).unwrap();
        let back: CompactRecord = serde_json::from_str(&text).unwrap();
        assert_eq!(CompanyRecord::from(back), record);
    }

    #[test]
    fn test_has_sentiment() {
        assert!(!CompanyRecord::with_price("X", 1.0).has_sentiment());
        let record = CompanyRecord {
            name: "Y".to_string(),
            total_articles: Some(0),
            ..CompanyRecord::default()
        };
        assert!(record.has_sentiment());
    }
}

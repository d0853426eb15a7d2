//! One-sentence sentiment synopsis for prompts and lookups

use crate::language::Language;
use crate::reconcile::ReconciledSet;
use crate::record::CompanyRecord;
use serde::{Deserialize, Serialize};

/// Coarse reading of a sentiment score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentLabel {
    StrongPositive,
    Positive,
    Neutral,
    Negative,
    StrongNegative,
}

impl SentimentLabel {
    /// Threshold a score: ±10 strong, ±5 plain, otherwise neutral
    pub fn from_score(score: f64) -> Self {
        if score >= 10.0 {
            Self::StrongPositive
        } else if score >= 5.0 {
            Self::Positive
        } else if score <= -10.0 {
            Self::StrongNegative
        } else if score <= -5.0 {
            Self::Negative
        } else {
            Self::Neutral
        }
    }

    pub fn text(&self, language: Language) -> &'static str {
        match (language, self) {
            (Language::English, Self::StrongPositive) => "strong positive",
            (Language::English, Self::Positive) => "positive",
            (Language::English, Self::Neutral) => "neutral",
            (Language::English, Self::Negative) => "negative",
            (Language::English, Self::StrongNegative) => "strong negative",
            (Language::Korean, Self::StrongPositive) => "강한 호재 우세",
            (Language::Korean, Self::Positive) => "호재 우세",
            (Language::Korean, Self::Neutral) => "대체로 중립",
            (Language::Korean, Self::Negative) => "악재 우세",
            (Language::Korean, Self::StrongNegative) => "강한 악재 우세",
        }
    }
}

/// Render a score without a trailing `.0` when it is integral
pub fn format_score(score: f64) -> String {
    if score.fract() == 0.0 && score.abs() < 9.0e15 {
        format!("{}", score as i64)
    } else {
        format!("{score}")
    }
}

/// Synopsis for one record; `None` when it carries no sentiment data
///
/// Missing counts read as zero in the sentence, matching how the scores file
/// is summarized for the advice prompt.
pub fn summarize_record(record: &CompanyRecord, language: Language) -> Option<String> {
    if !record.has_sentiment() {
        return None;
    }

    let positive = record.positive_count.unwrap_or(0);
    let negative = record.negative_count.unwrap_or(0);
    let neutral = record.neutral_count.unwrap_or(0);
    let total = record.total_articles.unwrap_or(0);
    let score = record.sentiment_score.unwrap_or(0.0);
    let label = SentimentLabel::from_score(score).text(language);
    let score = format_score(score);
    let name = &record.name;

    Some(match language {
        Language::English => format!(
            "Analysis of {total} recent articles about {name}: {positive} positive, \
             {negative} negative and {neutral} neutral, for an overall score of {score} \
             ({label})."
        ),
        Language::Korean => format!(
            "{name} 관련 최근 기사 {total}개 분석 결과: 호재 {positive}개, 악재 {negative}개, \
             중립 {neutral}개이며 종합 점수는 {score}점으로 '{label}' 상태입니다."
        ),
    })
}

/// Synopsis for `name` looked up in a reconciled set
pub fn format_sentiment_summary(
    name: &str,
    companies: &ReconciledSet,
    language: Language,
) -> Option<String> {
    companies
        .get(name)
        .and_then(|record| summarize_record(record, language))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::price::PriceEntry;
    use crate::reconcile::reconcile;
    use crate::sentiment::SentimentSource;
    use serde_json::json;

    fn companies() -> ReconciledSet {
        let (sentiment, _) = SentimentSource::from_value(
            &json!({
                "A": { "positive_count": 9, "negative_count": 2, "neutral_count": 4,
                       "total_articles": 15, "company_score": 7 }
            }),
            "scores",
        )
        .unwrap();
        let prices = vec![PriceEntry {
            company: "P".to_string(),
            price: 100.0,
        }];
        reconcile(&sentiment, &prices)
    }

    #[test]
    fn test_label_thresholds() {
        assert_eq!(SentimentLabel::from_score(7.0), SentimentLabel::Positive);
        assert_eq!(SentimentLabel::from_score(-12.0), SentimentLabel::StrongNegative);
        assert_eq!(SentimentLabel::from_score(0.0), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_score(10.0), SentimentLabel::StrongPositive);
        assert_eq!(SentimentLabel::from_score(5.0), SentimentLabel::Positive);
        assert_eq!(SentimentLabel::from_score(4.9), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_score(-5.0), SentimentLabel::Negative);
        assert_eq!(SentimentLabel::from_score(-10.0), SentimentLabel::StrongNegative);
    }

    #[test]
    fn test_label_text() {
        assert_eq!(SentimentLabel::Positive.text(Language::English), "positive");
        assert_eq!(
            SentimentLabel::StrongNegative.text(Language::English),
            "strong negative"
        );
        assert_eq!(SentimentLabel::Neutral.text(Language::Korean), "대체로 중립");
    }

    #[test]
    fn test_english_summary() {
        let summary = format_sentiment_summary("A", &companies(), Language::English).unwrap();
        assert_eq!(
            summary,
            "Analysis of 15 recent articles about A: 9 positive, 2 negative and 4 neutral, \
             for an overall score of 7 (positive)."
        );
    }

    #[test]
    fn test_korean_summary() {
        let summary = format_sentiment_summary("A", &companies(), Language::Korean).unwrap();
        assert!(summary.starts_with("A 관련 최근 기사 15개"));
        assert!(summary.contains("'호재 우세'"));
    }

    #[test]
    fn test_no_summary_without_sentiment() {
        let set = companies();
        assert!(format_sentiment_summary("missing", &set, Language::English).is_none());
        assert!(format_sentiment_summary("P", &set, Language::English).is_none());
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(36.0), "36");
        assert_eq!(format_score(-12.0), "-12");
        assert_eq!(format_score(2.5), "2.5");
    }
}

//! Loading of the JSON snapshots the reconciler reads

use crate::error::{InvestError, Result};
use crate::price::{PriceEntry, resolve_prices};
use crate::reconcile::{ReconciledSet, reconcile};
use crate::sentiment::{SentimentSource, aggregate_articles};
use serde_json::Value;
use std::path::Path;
use tracing::{info, warn};

/// Read and decode a JSON file
///
/// A missing file or invalid JSON is reported as
/// [`InvestError::DataSourceUnavailable`].
pub fn load_json(path: impl AsRef<Path>) -> Result<Value> {
    let path = path.as_ref();
    let origin = path.display().to_string();

    let text = std::fs::read_to_string(path).map_err(|e| InvestError::unavailable(&origin, e))?;
    serde_json::from_str(&text).map_err(|e| InvestError::unavailable(&origin, e))
}

/// Load the sentiment scores file
pub fn load_sentiment_source(path: impl AsRef<Path>) -> Result<SentimentSource> {
    let path = path.as_ref();
    let origin = path.display().to_string();
    let (source, stats) = SentimentSource::from_value(&load_json(path)?, &origin)?;

    if stats.skipped > 0 {
        warn!(path = %origin, skipped = stats.skipped, "Skipped malformed sentiment entries");
    }
    info!(path = %origin, companies = source.len(), "Loaded sentiment scores");
    Ok(source)
}

/// Load the price snapshot file and resolve every recognizable price
pub fn load_price_source(path: impl AsRef<Path>) -> Result<Vec<PriceEntry>> {
    let path = path.as_ref();
    let origin = path.display().to_string();
    let (entries, stats) = resolve_prices(&load_json(path)?, &origin)?;

    if stats.skipped > 0 {
        warn!(path = %origin, skipped = stats.skipped, "Skipped price entries without a usable price");
    }
    info!(path = %origin, prices = entries.len(), "Loaded price snapshot");
    Ok(entries)
}

/// Load both snapshots and reconcile them
///
/// Fails without a partial result if either file cannot be loaded.
pub fn load_company_data(
    scores_path: impl AsRef<Path>,
    prices_path: impl AsRef<Path>,
) -> Result<ReconciledSet> {
    let sentiment = load_sentiment_source(scores_path)?;
    let prices = load_price_source(prices_path)?;
    Ok(reconcile(&sentiment, &prices))
}

/// Load classifier output and aggregate it into a sentiment source
pub fn load_article_labels(path: impl AsRef<Path>) -> Result<SentimentSource> {
    let path = path.as_ref();
    let origin = path.display().to_string();
    let (source, stats) = aggregate_articles(&load_json(path)?, &origin)?;

    info!(
        path = %origin,
        companies = source.len(),
        articles = stats.accepted,
        skipped = stats.skipped,
        "Aggregated article labels"
    );
    Ok(source)
}

/// Write any JSON value pretty-printed, creating parent directories
pub fn save_json(value: &Value, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| InvestError::Io {
            path: parent.display().to_string(),
            source,
        })?;
    }

    let text = serde_json::to_string_pretty(value)?;
    std::fs::write(path, text).map_err(|source| InvestError::Io {
        path: path.display().to_string(),
        source,
    })
}

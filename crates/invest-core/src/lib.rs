//! Company reconciliation core for the investment simulator
//!
//! This crate joins two independently produced data sets into one
//! per-company view:
//!
//! - Sentiment scores aggregated from news articles (`company_scores.json`)
//! - Price snapshots in any of several shapes (`all_prices.json`)
//!
//! The reconciled records can be ranked by sentiment, written out in a compact
//! form for prompting a language model, or summarized in English or Korean.
//!
//! # Example
//!
//! ```rust,ignore
//! use invest_core::{Language, load_company_data, rank, save_compact};
//!
//! fn main() -> invest_core::Result<()> {
//!     let companies = load_company_data("company_scores.json", "all_prices.json")?;
//!
//!     let top = rank(&companies, 50, 20);
//!     save_compact(&top, "for_llm.json")?;
//!
//!     if let Some(text) = invest_core::format_sentiment_summary("A", &companies, Language::Korean) {
//!         println!("{text}");
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod language;
pub mod naming;
pub mod price;
pub mod quote;
pub mod reconcile;
pub mod record;
pub mod sentiment;
pub mod source;
pub mod summary;

pub use config::{ReconcileConfig, ReconcileConfigBuilder};
pub use error::{InvestError, Result};
pub use language::Language;
pub use naming::{MarketCodes, attach_company_names};
pub use price::{PriceEntry, resolve_prices};
pub use quote::{
    CachedQuoteProvider, EMPTY_QUERY_MESSAGE, QuoteProvider, QuoteResult, SnapshotQuoteProvider,
    YahooQuoteProvider,
};
pub use reconcile::{
    ReconciledSet, rank, reconcile, save_compact, to_compact_json, to_compact_representation,
};
pub use record::{CompactRecord, CompanyRecord, IngestStats};
pub use sentiment::{ArticleLabel, SentimentEntry, SentimentSource, aggregate_articles};
pub use source::{
    load_article_labels, load_company_data, load_json, load_price_source, load_sentiment_source,
    save_json,
};
pub use summary::{SentimentLabel, format_sentiment_summary, summarize_record};

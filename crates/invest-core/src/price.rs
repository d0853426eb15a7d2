//! Price source normalization
//!
//! Price snapshots arrive in several shapes depending on which script wrote
//! them. Each shape is handled by a matcher in a fixed-priority table; a
//! matcher either yields a price or declines, and an entry nobody matches is
//! skipped without failing the run.
//!
//! Keyed by company:
//!
//! ```json
//! { "A": 72000, "B": { "current_price": 180000 } }
//! ```
//!
//! Or brokerage rows:
//!
//! ```json
//! [ { "iscd": "005930", "stck_prpr": "100,600", "company": "삼성전자" } ]
//! ```

use crate::error::{InvestError, Result};
use crate::record::IngestStats;
use serde_json::{Map, Value};
use tracing::debug;

/// Numeric fields checked on a keyed price object, highest priority first
pub const PRICE_FIELDS: &[&str] = &["price", "current_price", "trade_price", "close"];

/// Company-name fields on a brokerage row, highest priority first
pub const ROW_NAME_FIELDS: &[&str] = &["company", "hts_kor_isnm"];

/// Price fields on a brokerage row, highest priority first
pub const ROW_PRICE_FIELDS: &[&str] = &["stck_prpr", "price"];

/// One resolved price
#[derive(Debug, Clone, PartialEq)]
pub struct PriceEntry {
    pub company: String,
    pub price: f64,
}

/// A shape matcher: `None` means "not my shape"
type ShapeMatcher = fn(&Value) -> Option<f64>;

/// Matchers for values of a company-keyed object
const KEYED_MATCHERS: &[(&str, ShapeMatcher)] = &[
    ("bare_number", match_bare_number),
    ("price_field_object", match_price_field_object),
];

fn match_bare_number(value: &Value) -> Option<f64> {
    value.as_f64().filter(|price| is_valid_price(*price))
}

fn match_price_field_object(value: &Value) -> Option<f64> {
    let object = value.as_object()?;
    PRICE_FIELDS
        .iter()
        .filter_map(|field| object.get(*field))
        .find_map(match_bare_number)
}

fn is_valid_price(price: f64) -> bool {
    price.is_finite() && price >= 0.0
}

/// Parse a numeral string such as `"1,006.50"`
///
/// Commas are stripped and whitespace trimmed; empty or unparsable text gives `None`.
pub fn parse_price_str(text: &str) -> Option<f64> {
    let cleaned: String = text.chars().filter(|c| *c != ',').collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|price| is_valid_price(*price))
}

/// Resolve a price from a value that may be a number or a numeral string
fn number_or_numeral(value: &Value) -> Option<f64> {
    match value {
        Value::Number(_) => match_bare_number(value),
        Value::String(text) => parse_price_str(text),
        _ => None,
    }
}

/// Extract the price from one value of a company-keyed object
pub fn extract_keyed_price(value: &Value) -> Option<f64> {
    KEYED_MATCHERS.iter().find_map(|(shape, matcher)| {
        let price = matcher(value);
        if price.is_some() {
            debug!(shape, "Price shape matched");
        }
        price
    })
}

/// Extract `(company, price)` from one brokerage row
///
/// Only the first present, non-empty price field is parsed; an unparsable
/// `stck_prpr` does not fall back to `price`.
pub fn extract_row_price(row: &Value) -> Option<(String, f64)> {
    let object = row.as_object()?;
    let company = first_non_empty_str(object, ROW_NAME_FIELDS)?;
    let price = ROW_PRICE_FIELDS
        .iter()
        .filter_map(|field| object.get(*field))
        .find(|value| is_present(value))
        .and_then(number_or_numeral)?;
    Some((company.to_string(), price))
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(text) => !text.trim().is_empty(),
        _ => true,
    }
}

fn first_non_empty_str<'a>(object: &'a Map<String, Value>, fields: &[&str]) -> Option<&'a str> {
    fields
        .iter()
        .filter_map(|field| object.get(*field).and_then(Value::as_str))
        .map(str::trim)
        .find(|name| !name.is_empty())
}

/// Resolve every price in a decoded price document, in source order
///
/// Duplicate company names are kept; the reconciler applies them in order so
/// the last one wins. A top level that is neither an object nor an array is
/// fatal.
pub fn resolve_prices(value: &Value, origin: &str) -> Result<(Vec<PriceEntry>, IngestStats)> {
    let mut stats = IngestStats::default();
    let mut entries = Vec::new();

    match value {
        Value::Object(object) => {
            for (company, raw) in object {
                if company.trim().is_empty() {
                    stats.skip();
                    continue;
                }
                match extract_keyed_price(raw) {
                    Some(price) => {
                        entries.push(PriceEntry {
                            company: company.clone(),
                            price,
                        });
                        stats.accept();
                    }
                    None => {
                        debug!(company = %company, "No recognizable price, skipping");
                        stats.skip();
                    }
                }
            }
        }
        Value::Array(rows) => {
            for (index, row) in rows.iter().enumerate() {
                match extract_row_price(row) {
                    Some((company, price)) => {
                        entries.push(PriceEntry { company, price });
                        stats.accept();
                    }
                    None => {
                        debug!(index, "Price row has no company or price, skipping");
                        stats.skip();
                    }
                }
            }
        }
        _ => {
            return Err(InvestError::unavailable(
                origin,
                "expected a JSON object keyed by company or an array of price rows",
            ));
        }
    }

    Ok((entries, stats))
}

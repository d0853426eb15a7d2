//! Attach company names to code-only brokerage price rows
//!
//! The quote poller stores rows keyed by stock code (`iscd`). The market code
//! map, `{ "삼성전자": { "code": "005930" } }`, turns them into the
//! `company`-carrying rows the price normalizer reads.

use crate::error::{InvestError, Result};
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::{debug, info};

/// Stock code to company name
#[derive(Debug, Clone, Default)]
pub struct MarketCodes {
    code_to_company: HashMap<String, String>,
    company_to_code: HashMap<String, String>,
}

impl MarketCodes {
    /// Parse a market code map; entries without a string `code` are ignored
    pub fn from_value(value: &Value, origin: &str) -> Result<Self> {
        let object = value.as_object().ok_or_else(|| {
            InvestError::unavailable(origin, "expected a JSON object keyed by company name")
        })?;

        let mut codes = Self::default();
        for (company, info) in object {
            let code = match info {
                Value::String(code) => Some(code.as_str()),
                Value::Object(fields) => fields.get("code").and_then(Value::as_str),
                _ => None,
            };
            match code {
                Some(code) => codes.insert(company, code),
                None => debug!(company = %company, "Market code entry without a code"),
            }
        }
        Ok(codes)
    }

    fn insert(&mut self, company: &str, code: &str) {
        self.code_to_company
            .insert(code.to_string(), company.to_string());
        self.company_to_code
            .insert(company.to_string(), code.to_string());
    }

    pub fn company_for(&self, code: &str) -> Option<&str> {
        self.code_to_company.get(code).map(String::as_str)
    }

    pub fn code_for(&self, company: &str) -> Option<&str> {
        self.company_to_code.get(company).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.code_to_company.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code_to_company.is_empty()
    }
}

/// Copy each row, adding `company` when its `iscd` is a known code
///
/// Rows with unknown codes or that are not objects pass through unchanged.
pub fn attach_company_names(rows: &Value, codes: &MarketCodes, origin: &str) -> Result<Value> {
    let rows = rows
        .as_array()
        .ok_or_else(|| InvestError::unavailable(origin, "expected an array of price rows"))?;

    let mut named = 0_usize;
    let output: Vec<Value> = rows
        .iter()
        .map(|row| {
            let Some(object) = row.as_object() else {
                return row.clone();
            };
            let company = object
                .get("iscd")
                .and_then(Value::as_str)
                .and_then(|code| codes.company_for(code));

            match company {
                Some(company) => {
                    named += 1;
                    let mut updated: Map<String, Value> = object.clone();
                    updated.insert("company".to_string(), Value::String(company.to_string()));
                    Value::Object(updated)
                }
                None => row.clone(),
            }
        })
        .collect();

    info!(rows = output.len(), named, "Attached company names to price rows");
    Ok(Value::Array(output))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::price::resolve_prices;
    use serde_json::json;

    fn codes() -> MarketCodes {
        MarketCodes::from_value(
            &json!({
                "삼성전자": { "code": "005930", "market": "KOSPI" },
                "카카오": "035720",
                "broken": { "market": "KOSDAQ" }
            }),
            "market_code.json",
        )
        .unwrap()
    }

    #[test]
    fn test_parse_codes() {
        let codes = codes();
        assert_eq!(codes.len(), 2);
        assert_eq!(codes.company_for("005930"), Some("삼성전자"));
        assert_eq!(codes.code_for("카카오"), Some("035720"));
        assert_eq!(codes.code_for("broken"), None);
    }

    #[test]
    fn test_attach_names() {
        let rows = json!([
            { "timestamp": "t", "iscd": "005930", "stck_prpr": "100600" },
            { "timestamp": "t", "iscd": "999999", "stck_prpr": "1" },
        ]);

        let named = attach_company_names(&rows, &codes(), "all_prices_noname.json").unwrap();
        assert_eq!(named[0]["company"], "삼성전자");
        assert_eq!(named[0]["stck_prpr"], "100600");
        assert!(named[1].get("company").is_none());

        let (prices, _) = resolve_prices(&named, "all_prices.json").unwrap();
        assert_eq!(prices.len(), 1);
        assert_eq!(prices[0].company, "삼성전자");
    }

    #[test]
    fn test_attach_requires_array() {
        let result = attach_company_names(&json!({}), &codes(), "prices");
        assert!(matches!(
            result,
            Err(InvestError::DataSourceUnavailable { .. })
        ));
    }
}

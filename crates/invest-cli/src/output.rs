//! Terminal rendering for command results

use comfy_table::presets::UTF8_FULL;
use comfy_table::{CellAlignment, ContentArrangement, Table};
use invest_core::summary::format_score;
use invest_core::{CompanyRecord, QuoteResult};

fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

fn format_price(price: Option<f64>) -> String {
    price.map_or_else(|| "-".to_string(), |p| format!("{p:.2}"))
}

/// Ranked companies as a table
pub fn ranking_table(records: &[CompanyRecord]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "#", "Company", "Score", "Positive", "Negative", "Neutral", "Articles", "Price",
        ]);

    for (i, record) in records.iter().enumerate() {
        table.add_row(vec![
            (i + 1).to_string(),
            record.name.clone(),
            record.sentiment_score.map_or_else(|| "-".to_string(), format_score),
            or_dash(record.positive_count),
            or_dash(record.negative_count),
            or_dash(record.neutral_count),
            or_dash(record.total_articles),
            format_price(record.price),
        ]);
    }

    for index in [0, 2, 3, 4, 5, 6, 7] {
        if let Some(column) = table.column_mut(index) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }
    table
}

/// One company's record as `field: value` lines
pub fn record_lines(record: &CompanyRecord) -> Vec<String> {
    vec![
        format!("Company:   {}", record.name),
        format!(
            "Score:     {}",
            record.sentiment_score.map_or_else(|| "-".to_string(), format_score)
        ),
        format!(
            "Articles:  {} (positive {}, negative {}, neutral {})",
            or_dash(record.total_articles),
            or_dash(record.positive_count),
            or_dash(record.negative_count),
            or_dash(record.neutral_count)
        ),
        format!("Price:     {}", format_price(record.price)),
    ]
}

/// A live quote as `field: value` lines
pub fn quote_lines(quote: &QuoteResult) -> Vec<String> {
    if let Some(error) = &quote.error {
        return vec![format!("Quote error: {error}")];
    }

    let mut lines = vec![format!(
        "Quote:     {} ({})",
        format_price(quote.price),
        quote.symbol.as_deref().unwrap_or("-")
    )];
    if let (Some(change), Some(rate)) = (quote.change, quote.change_rate) {
        lines.push(format!("Change:    {change:+.2} ({rate:+.2}%)"));
    }
    if quote.open.is_some() || quote.high.is_some() || quote.low.is_some() {
        lines.push(format!(
            "Range:     open {} / high {} / low {}",
            format_price(quote.open),
            format_price(quote.high),
            format_price(quote.low)
        ));
    }
    if let Some(volume) = quote.volume {
        lines.push(format!("Volume:    {volume}"));
    }
    if !quote.chart_prices.is_empty() {
        lines.push(format!("Chart:     {} daily closes", quote.chart_prices.len()));
    }
    lines
}

pub mod format;

use std::io::{self, Write};

use sentix_core::{Envelope, SentimentType};
use serde_json::{json, Value};

use self::format::{format_currency, page_footer, text_table, trend_glyphs};
use crate::cli::OutputFormat;
use crate::commands::{CommandOutput, View};
use crate::error::CliError;

pub fn render(output: &CommandOutput, format: OutputFormat, pretty: bool) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match format {
        OutputFormat::Json => {
            let payload = if pretty {
                serde_json::to_string_pretty(&output.envelope)?
            } else {
                serde_json::to_string(&output.envelope)?
            };
            writeln!(out, "{payload}")?;
        }
        OutputFormat::Ndjson => {
            for line in ndjson_lines(output)? {
                writeln!(out, "{line}")?;
            }
        }
        OutputFormat::Table => {
            out.write_all(render_table(&output.envelope, &output.view).as_bytes())?;
        }
    }

    out.flush()?;
    Ok(())
}

/// `{"meta": ...}`, then one line per item, then one `{"error": ...}` line per error.
pub fn ndjson_lines(output: &CommandOutput) -> Result<Vec<String>, serde_json::Error> {
    let mut lines = vec![serde_json::to_string(&json!({ "meta": output.envelope.meta }))?];
    for item in output.view.items()? {
        lines.push(serde_json::to_string(&item)?);
    }
    for error in &output.envelope.errors {
        lines.push(serde_json::to_string(&json!({ "error": error }))?);
    }
    Ok(lines)
}

pub fn render_table(envelope: &Envelope<Value>, view: &View) -> String {
    let mut out = match view {
        View::Tokens { rows, pagination } => {
            let mut out = String::from("Crypto Sentinel\n");
            if rows.is_empty() {
                out.push_str("Market Sentiment Dashboard\n\n");
            } else {
                out.push_str(&format!("{} tokens tracked\n\n", rows.len()));
            }
            let legend = SentimentType::ALL
                .iter()
                .map(|sentiment| sentiment.label())
                .collect::<Vec<_>>()
                .join("  ");
            out.push_str(&format!("Legend: {legend}\n\n"));

            if rows.is_empty() {
                out.push_str("No tokens found\n");
            } else {
                let cells = rows
                    .iter()
                    .map(|row| {
                        vec![
                            row.symbol.clone(),
                            row.protocol_id.clone(),
                            row.price.clone(),
                            row.fundamental_sentiment.label().to_owned(),
                            row.onchain_sentiment.label().to_owned(),
                            row.technical_sentiment.label().to_owned(),
                            row.overall_sentiment.label().to_owned(),
                        ]
                    })
                    .collect::<Vec<_>>();
                out.push_str(&text_table(
                    &[
                        "Token",
                        "Protocol",
                        "Price",
                        "Fundamental",
                        "Onchain",
                        "Technical",
                        "Overall",
                    ],
                    &cells,
                ));
            }
            out.push_str(&format!("\n{}\n", page_footer(pagination)));
            out
        }
        View::Detail(detail) => {
            let mut out = format!(
                "{} Onchain Movement\n{}\nOverall Onchain: {}\n\n",
                detail.symbol,
                detail.protocol_id,
                detail.onchain_sentiment.label()
            );
            if !envelope.errors.is_empty() {
                out.push_str("Failed to load onchain data\n");
            } else if detail.indicators.is_empty() {
                out.push_str("No onchain indicators available\n");
            } else {
                let cells = detail
                    .indicators
                    .iter()
                    .map(|row| vec![row.label.clone(), format_currency(row.current_value)])
                    .collect::<Vec<_>>();
                out.push_str(&text_table(&["Indicator", "Current Value"], &cells));
            }
            out
        }
        View::History(history) => {
            let mut out = format!("{} Indicator History\n", history.protocol_id);
            if let (Some(first), Some(last)) = (history.timestamps.first(), history.timestamps.last()) {
                out.push_str(&format!("{first} .. {last}\n\n"));
            } else {
                out.push('\n');
            }
            let cells = history
                .series
                .iter()
                .map(|series| {
                    let latest = series.values.iter().rev().find_map(|value| *value);
                    vec![
                        series.indicator.clone(),
                        trend_glyphs(&series.values),
                        format_currency(latest),
                    ]
                })
                .collect::<Vec<_>>();
            out.push_str(&text_table(&["Indicator", "Trend", "Latest"], &cells));
            out
        }
        View::Sentiment { sentiment } => format!("{}\n", sentiment.label()),
        View::Config(_) => {
            let mut out = String::new();
            if let Value::Object(fields) = &envelope.data {
                for (key, value) in fields {
                    let rendered = match value {
                        Value::String(text) => text.clone(),
                        other => other.to_string(),
                    };
                    out.push_str(&format!("{key:<24}{rendered}\n"));
                }
            }
            out
        }
    };

    if !envelope.meta.warnings.is_empty() {
        out.push_str("\nwarnings:\n");
        for warning in &envelope.meta.warnings {
            out.push_str(&format!("  - {warning}\n"));
        }
    }
    if !envelope.errors.is_empty() {
        out.push_str("\nerrors:\n");
        for error in &envelope.errors {
            out.push_str(&format!("  - {}: {}\n", error.code, error.message));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentix_core::{
        merge_tokens, DetailView, EnvelopeError, EnvelopeMeta, FeedId, FundamentalRecord,
        IndicatorRow, OnchainRecord, PageInfo,
    };

    fn envelope(view: &View, errors: Vec<EnvelopeError>) -> Envelope<Value> {
        let meta = EnvelopeMeta::new("request-12345", vec![FeedId::Onchain], 3).expect("valid meta");
        let data = serde_json::to_value(view).expect("serializes");
        Envelope::with_errors(meta, data, errors).expect("valid envelope")
    }

    #[test]
    fn token_table_shows_legend_rows_and_footer() {
        let rows = merge_tokens(
            &[FundamentalRecord::new("parent#aave")
                .with_symbol("AAVE")
                .with_rank("A+", "Top 5% of protocols")],
            &[OnchainRecord::new("parent#aave").with_field("whale_net_flow_usd_chg_7h", -1.0)],
        );
        let view = View::Tokens {
            pagination: PageInfo::compute(rows.len() as u64, None, 200),
            rows,
        };

        let rendered = render_table(&envelope(&view, Vec::new()), &view);
        assert!(rendered.starts_with("Crypto Sentinel\n1 tokens tracked"));
        assert!(rendered.contains("Legend: Bullish  Neutral  Bearish"));
        assert!(rendered.contains("AAVE"));
        assert!(rendered.contains("$100K"));
        assert!(rendered.contains("Showing page 1 of 1 (1 total tokens)"));
    }

    #[test]
    fn detail_without_indicators_says_so() {
        let view = View::Detail(DetailView {
            protocol_id: String::from("parent#x"),
            symbol: String::from("X"),
            onchain_sentiment: SentimentType::Neutral,
            indicators: Vec::new(),
            found: false,
            warnings: Vec::new(),
        });

        let rendered = render_table(&envelope(&view, Vec::new()), &view);
        assert!(rendered.starts_with("X Onchain Movement\nparent#x\nOverall Onchain: Neutral"));
        assert!(rendered.contains("No onchain indicators available"));
    }

    #[test]
    fn detail_formats_current_values_as_currency() {
        let view = View::Detail(DetailView {
            protocol_id: String::from("parent#aave"),
            symbol: String::from("AAVE"),
            onchain_sentiment: SentimentType::Bullish,
            indicators: vec![IndicatorRow {
                label: String::from("Whale Net Flow Usd"),
                current_value: Some(12_500_000.0),
            }],
            found: true,
            warnings: Vec::new(),
        });

        let rendered = render_table(&envelope(&view, Vec::new()), &view);
        assert!(rendered.contains("Whale Net Flow Usd  $12.50M"));
    }

    #[test]
    fn failed_detail_reports_load_failure() {
        let view = View::Detail(DetailView {
            protocol_id: String::from("parent#aave"),
            symbol: String::from("AAVE"),
            onchain_sentiment: SentimentType::Neutral,
            indicators: Vec::new(),
            found: false,
            warnings: Vec::new(),
        });
        let error = EnvelopeError::new("feed.unavailable", "onchain: down").expect("valid");

        let rendered = render_table(&envelope(&view, vec![error]), &view);
        assert!(rendered.contains("Failed to load onchain data"));
        assert!(rendered.contains("feed.unavailable: onchain: down"));
    }

    #[test]
    fn ndjson_emits_meta_items_and_errors() {
        let view = View::Detail(DetailView {
            protocol_id: String::from("parent#aave"),
            symbol: String::from("AAVE"),
            onchain_sentiment: SentimentType::Bullish,
            indicators: vec![
                IndicatorRow {
                    label: String::from("Whale Net Flow Usd"),
                    current_value: Some(1.0),
                },
                IndicatorRow {
                    label: String::from("Exchange Net Flow Usd"),
                    current_value: None,
                },
            ],
            found: true,
            warnings: Vec::new(),
        });
        let error = EnvelopeError::new("feed.decode", "bad body").expect("valid");
        let output = CommandOutput {
            envelope: envelope(&view, vec![error]),
            view,
        };

        let lines = ndjson_lines(&output).expect("serializes");
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("{\"meta\":"));
        assert!(lines[3].starts_with("{\"error\":"));
    }
}

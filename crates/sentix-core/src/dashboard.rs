//! Feed orchestration for the token table, detail view and history.

use std::sync::Arc;

use serde::Serialize;

use crate::classify::classify_onchain;
use crate::config::DashboardConfig;
use crate::envelope::EnvelopeError;
use crate::feeds::{FeedError, HttpFeed, MarketFeed, MockFeed};
use crate::indicators::{extract_indicators, IndicatorRow};
use crate::merge::{derive_symbol, merge_tokens_with_price};
use crate::pagination::PageInfo;
use crate::{DisplayRow, IndicatorHistory, SentimentType};

/// Result of one table load.
///
/// A failed feed is reported in `errors` and contributes no records; rows are
/// still built from whichever feed succeeded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub rows: Vec<DisplayRow>,
    pub pagination: PageInfo,
    pub warnings: Vec<String>,
    pub errors: Vec<EnvelopeError>,
}

impl DashboardSnapshot {
    pub fn is_degraded(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// On-demand view of one protocol's on-chain indicators.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailView {
    pub protocol_id: String,
    pub symbol: String,
    /// Always derived from the change indicators, even when the feed supplies one.
    pub onchain_sentiment: SentimentType,
    pub indicators: Vec<IndicatorRow>,
    pub found: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[derive(Clone)]
pub struct Dashboard {
    feed: Arc<dyn MarketFeed>,
    config: DashboardConfig,
}

impl Dashboard {
    pub fn new(feed: Arc<dyn MarketFeed>, config: DashboardConfig) -> Self {
        Self { feed, config }
    }

    /// Picks the mock or live feed according to `use_mock_data`.
    pub fn from_config(config: DashboardConfig) -> Self {
        let feed: Arc<dyn MarketFeed> = if config.use_mock_data {
            Arc::new(MockFeed::sample())
        } else {
            Arc::new(HttpFeed::new(config.clone()))
        };
        Self::new(feed, config)
    }

    pub fn feed_name(&self) -> &'static str {
        self.feed.name()
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub async fn load(&self, page: u64) -> DashboardSnapshot {
        let (fundamentals, onchain) = tokio::join!(self.feed.fundamentals(page), self.feed.onchain());

        let mut errors = Vec::new();
        let (fundamental_records, fundamental_total) = match fundamentals {
            Ok(batch) => (batch.data, Some(batch.total)),
            Err(error) => {
                report_failure(&error, &mut errors);
                (Vec::new(), None)
            }
        };
        let onchain_records = match onchain {
            Ok(records) => records,
            Err(error) => {
                report_failure(&error, &mut errors);
                Vec::new()
            }
        };

        let rows = merge_tokens_with_price(
            &fundamental_records,
            &onchain_records,
            &self.config.price_placeholder,
        );
        let pagination = PageInfo::compute(
            onchain_records.len() as u64,
            fundamental_total,
            self.config.page_limit,
        );

        let mut unknown = Vec::<String>::new();
        for record in &onchain_records {
            for name in record.schema_report().unknown_indicators {
                if !unknown.contains(&name) {
                    unknown.push(name);
                }
            }
        }
        let mut warnings = Vec::new();
        if !unknown.is_empty() {
            tracing::warn!(indicators = %unknown.join(", "), "onchain feed publishes unknown indicators");
            warnings.push(format!("unknown onchain indicators: {}", unknown.join(", ")));
        }

        tracing::info!(
            feed = self.feed.name(),
            fundamentals = fundamental_records.len(),
            onchain = onchain_records.len(),
            rows = rows.len(),
            failed_feeds = errors.len(),
            "dashboard loaded"
        );

        DashboardSnapshot {
            rows,
            pagination,
            warnings,
            errors,
        }
    }

    /// Fetches one protocol and recomputes its on-chain sentiment.
    ///
    /// An unknown protocol yields an empty, neutral view with `found == false`.
    pub async fn detail(&self, protocol_id: &str) -> Result<DetailView, FeedError> {
        let record = self.feed.onchain_by_protocol(protocol_id).await?;

        let Some(record) = record else {
            tracing::info!(protocol = protocol_id, "no onchain record for protocol");
            return Ok(DetailView {
                protocol_id: protocol_id.to_owned(),
                symbol: derive_symbol(protocol_id),
                onchain_sentiment: SentimentType::Neutral,
                indicators: Vec::new(),
                found: false,
                warnings: Vec::new(),
            });
        };

        let report = record.schema_report();
        if !report.unknown_indicators.is_empty() {
            tracing::warn!(
                protocol = %record.protocol_id,
                indicators = %report.unknown_indicators.join(", "),
                "record carries unknown indicators"
            );
        }

        Ok(DetailView {
            symbol: derive_symbol(&record.protocol_id),
            protocol_id: record.protocol_id.clone(),
            onchain_sentiment: classify_onchain(&record),
            indicators: extract_indicators(&record),
            found: true,
            warnings: report.warnings(),
        })
    }

    pub async fn history(&self, protocol_id: &str) -> Result<IndicatorHistory, FeedError> {
        self.feed.price_history(protocol_id).await
    }
}

fn report_failure(error: &FeedError, errors: &mut Vec<EnvelopeError>) {
    tracing::warn!(error = %error, "feed failed; continuing without it");
    errors.push(EnvelopeError::from(error));
}

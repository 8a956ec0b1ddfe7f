use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;

use serde_json::{json, Map, Value};

use super::{FeedError, FeedId, FundamentalPage, MarketFeed};
use crate::history::build_indicator_history;
use crate::{FundamentalRecord, IndicatorHistory, OnchainRecord, SentimentType};

/// Deterministic in-memory feed for offline use and tests.
#[derive(Debug, Clone, Default)]
pub struct MockFeed {
    fundamentals: Vec<FundamentalRecord>,
    onchain: Vec<OnchainRecord>,
    history: Vec<Map<String, Value>>,
    failing: HashSet<FeedId>,
}

impl MockFeed {
    pub fn new(fundamentals: Vec<FundamentalRecord>, onchain: Vec<OnchainRecord>) -> Self {
        Self {
            fundamentals,
            onchain,
            ..Self::default()
        }
    }

    /// Built-in sample covering every classification path.
    pub fn sample() -> Self {
        let fundamentals = vec![
            FundamentalRecord::new("parent#aave")
                .with_symbol("AAVE")
                .with_logo_url("https://icons.llama.fi/aave.png")
                .with_rank("A+", "Top 5% of protocols"),
            FundamentalRecord::new("parent#uniswap")
                .with_symbol("UNI")
                .with_logo_url("https://icons.llama.fi/uniswap.png")
                .with_rank("A", "Top 10% by fees"),
            FundamentalRecord::new("parent#curve-finance")
                .with_symbol("CRV")
                .with_rank("B", "Top 50% of protocols"),
            FundamentalRecord::new("parent#lido")
                .with_symbol("LDO")
                .with_rank("C", "Bottom 30% of protocols"),
        ];

        let onchain = vec![
            OnchainRecord::new("parent#aave")
                .with_field("whale_net_flow_usd", 12_500_000.0)
                .with_field("whale_net_flow_usd_chg_7h", -5.0)
                .with_field("exchange_net_flow_usd", -3_400_000.0)
                .with_field("exchange_net_flow_usd_chg_7h", 3.0)
                .with_field("smart_trader_wallet_count", 412.0)
                .with_field("smart_trader_wallet_count_chg_7h", 0.0),
            OnchainRecord::new("parent#uniswap")
                .with_field("exchange_net_flow_usd", 8_900_000.0)
                .with_field("exchange_net_flow_usd_chg_7h", 4.2)
                .with_field("fresh_wallets_avg_flow_usd", 1_250.0)
                .with_field("fresh_wallets_avg_flow_usd_chg_7h", 1.1),
            OnchainRecord::new("parent#Curve-Finance").with_sentiment(SentimentType::Bearish),
            OnchainRecord::new("parent#pendle")
                .with_field("top_pnl_net_flow_usd", 640_000.0)
                .with_field("top_pnl_net_flow_usd_chg_7h", -2.5),
        ];

        let history = (0..8)
            .map(|hour| {
                let step = f64::from(hour);
                let row = json!({
                    "parentProtocol": "parent#aave",
                    "timestamp": format!("2024-05-01T{:02}:00:00Z", hour),
                    "whale_net_flow_usd": 10_000_000.0 + step * 500_000.0,
                    "exchange_net_flow_usd": -2_000_000.0 - step * 200_000.0,
                    "smart_trader_wallet_count": 400.0 + step,
                });
                match row {
                    Value::Object(row) => row,
                    _ => Map::new(),
                }
            })
            .collect();

        Self::new(fundamentals, onchain).with_history(history)
    }

    pub fn with_history(mut self, history: Vec<Map<String, Value>>) -> Self {
        self.history = history;
        self
    }

    /// Makes every request to `feed` fail as unavailable.
    pub fn failing(mut self, feed: FeedId) -> Self {
        self.failing.insert(feed);
        self
    }

    fn check(&self, feed: FeedId) -> Result<(), FeedError> {
        if self.failing.contains(&feed) {
            return Err(FeedError::unavailable("mock feed configured to fail").with_feed(feed));
        }
        Ok(())
    }
}

impl MarketFeed for MockFeed {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn fundamentals<'a>(
        &'a self,
        page: u64,
    ) -> Pin<Box<dyn Future<Output = Result<FundamentalPage, FeedError>> + Send + 'a>> {
        Box::pin(async move {
            self.check(FeedId::Fundamental)?;
            let total = self.fundamentals.len() as u64;
            Ok(FundamentalPage {
                data: self.fundamentals.clone(),
                page,
                limit: total.max(1),
                total,
            })
        })
    }

    fn onchain<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<OnchainRecord>, FeedError>> + Send + 'a>> {
        Box::pin(async move {
            self.check(FeedId::Onchain)?;
            Ok(self.onchain.clone())
        })
    }

    fn onchain_by_protocol<'a>(
        &'a self,
        protocol_id: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<OnchainRecord>, FeedError>> + Send + 'a>> {
        Box::pin(async move {
            if protocol_id.is_empty() {
                return Ok(None);
            }
            self.check(FeedId::Onchain)?;
            let key = protocol_id.to_lowercase();
            Ok(self
                .onchain
                .iter()
                .find(|record| record.protocol_id.to_lowercase() == key)
                .cloned())
        })
    }

    fn price_history<'a>(
        &'a self,
        protocol_id: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<IndicatorHistory, FeedError>> + Send + 'a>> {
        Box::pin(async move {
            self.check(FeedId::PriceHistory)?;
            Ok(build_indicator_history(protocol_id, &self.history))
        })
    }
}

use std::io::Write;
use std::sync::Arc;

use sentix_core::{
    CoreError, Dashboard, DashboardConfig, FeedId, FundamentalRecord, MockFeed, OnchainRecord,
    SentimentType, ValidationError,
};

fn dashboard(feed: MockFeed) -> Dashboard {
    Dashboard::new(Arc::new(feed), DashboardConfig::default())
}

#[tokio::test]
async fn test_load_merges_both_feeds() {
    let feed = MockFeed::new(
        vec![
            FundamentalRecord::new("parent#aave")
                .with_symbol("AAVE")
                .with_rank("A+", "Top 5%"),
            FundamentalRecord::new("parent#aave").with_rank("B", "Bottom 40%"),
        ],
        vec![
            OnchainRecord::new("parent#AAVE").with_field("whale_net_flow_usd_chg_7h", -3),
            OnchainRecord::new("parent#aave"),
            OnchainRecord::new("parent#pendle").with_field("whale_net_flow_usd_chg_7h", 8),
        ],
    );

    let snapshot = dashboard(feed).load(1).await;

    assert!(snapshot.errors.is_empty());
    assert_eq!(snapshot.rows.len(), 2);

    let aave = &snapshot.rows[0];
    assert_eq!(aave.symbol, "AAVE");
    assert_eq!(aave.fundamental_sentiment, SentimentType::Bullish);
    assert_eq!(aave.onchain_sentiment, SentimentType::Bullish);
    assert_eq!(aave.overall_sentiment, SentimentType::Bullish);

    let pendle = &snapshot.rows[1];
    assert_eq!(pendle.symbol, "PENDLE");
    assert_eq!(pendle.onchain_sentiment, SentimentType::Bearish);
    assert_eq!(pendle.overall_sentiment, SentimentType::Neutral);
}

#[tokio::test]
async fn test_pagination_counts_raw_onchain_records() {
    let feed = MockFeed::new(
        vec![FundamentalRecord::new("a")],
        vec![
            OnchainRecord::new("a"),
            OnchainRecord::new("A"),
            OnchainRecord::new("b"),
        ],
    );

    let snapshot = dashboard(feed).load(1).await;

    assert_eq!(snapshot.rows.len(), 2);
    assert_eq!(snapshot.pagination.total, 3);
    assert_eq!(snapshot.pagination.limit, 3);
    assert_eq!(snapshot.pagination.total_pages, 1);
    assert!(!snapshot.pagination.has_next_page);
    assert!(!snapshot.pagination.has_prev_page);
}

#[tokio::test]
async fn test_onchain_failure_is_reported_not_swallowed() {
    let feed = MockFeed::sample().failing(FeedId::Onchain);

    let snapshot = dashboard(feed).load(1).await;

    assert!(snapshot.rows.is_empty());
    assert_eq!(snapshot.errors.len(), 1);
    assert_eq!(snapshot.errors[0].code, "feed.unavailable");
    assert_eq!(snapshot.errors[0].feed, Some(FeedId::Onchain));
    assert_eq!(snapshot.pagination.total, 4);
    assert_eq!(snapshot.pagination.limit, 200);
}

#[tokio::test]
async fn test_both_feeds_failing_yields_two_errors() {
    let feed = MockFeed::sample()
        .failing(FeedId::Onchain)
        .failing(FeedId::Fundamental);

    let snapshot = dashboard(feed).load(1).await;

    assert!(snapshot.rows.is_empty());
    assert_eq!(snapshot.errors.len(), 2);
    assert_eq!(snapshot.pagination.total, 0);
}

#[tokio::test]
async fn test_unknown_indicators_surface_as_warnings() {
    let feed = MockFeed::new(
        Vec::new(),
        vec![
            OnchainRecord::new("a").with_field("mystery_metric_chg_7h", 1),
            OnchainRecord::new("b").with_field("mystery_metric_chg_7h", 2),
        ],
    );

    let snapshot = dashboard(feed).load(1).await;

    assert_eq!(
        snapshot.warnings,
        vec![String::from("unknown onchain indicators: mystery_metric")]
    );
    assert_eq!(snapshot.rows[0].onchain_sentiment, SentimentType::Bearish);
}

#[tokio::test]
async fn test_detail_recomputes_onchain_sentiment() {
    let supplied: OnchainRecord = serde_json::from_value(serde_json::json!({
        "parentProtocol": "parent#aave",
        "overall_sentiment": "bearish",
        "exchange_net_flow_usd_chg_7h": -10,
        "exchange_net_flow_usd": 500
    }))
    .expect("valid record");
    let feed = MockFeed::new(Vec::new(), vec![supplied]);

    let view = dashboard(feed)
        .detail("Parent#Aave")
        .await
        .expect("mock succeeds");

    assert!(view.found);
    assert_eq!(view.protocol_id, "parent#aave");
    assert_eq!(view.symbol, "AAVE");
    assert_eq!(view.onchain_sentiment, SentimentType::Bullish);
    assert_eq!(view.indicators.len(), 1);
    assert_eq!(view.indicators[0].label, "Exchange Net Flow Usd");
    assert_eq!(view.indicators[0].current_value, Some(500.0));
}

#[tokio::test]
async fn test_detail_propagates_feed_errors() {
    let feed = MockFeed::sample().failing(FeedId::Onchain);

    let error = dashboard(feed)
        .detail("parent#aave")
        .await
        .expect_err("feed is down");

    assert_eq!(error.feed(), Some(FeedId::Onchain));
}

#[tokio::test]
async fn test_sample_history_for_unknown_protocol_is_empty() {
    let history = dashboard(MockFeed::sample())
        .history("parent#nothing")
        .await
        .expect("mock succeeds");

    assert!(history.timestamps.is_empty());
    assert_eq!(history.protocol_id, "parent#nothing");
}

#[tokio::test]
async fn test_mock_mode_is_selected_from_config() {
    let config = DashboardConfig {
        use_mock_data: true,
        ..DashboardConfig::default()
    };

    let dashboard = Dashboard::from_config(config);
    let snapshot = dashboard.load(1).await;

    assert_eq!(dashboard.feed_name(), "mock");
    assert_eq!(snapshot.rows.len(), 4);
}

#[test]
fn test_config_file_is_loaded_and_validated() {
    let mut file = tempfile::Builder::new()
        .suffix(".yaml")
        .tempfile()
        .expect("temp file");
    writeln!(file, "use_mock_data: true\nonchain_limit: 50\nprice_placeholder: \"TBD\"")
        .expect("write");

    let config = DashboardConfig::load(Some(file.path())).expect("valid config");

    assert!(config.use_mock_data);
    assert_eq!(config.onchain_limit, 50);
    assert_eq!(config.price_placeholder, "TBD");
    assert_eq!(config.page_limit, 200);
}

#[test]
fn test_invalid_config_file_values_are_rejected() {
    let mut file = tempfile::Builder::new()
        .suffix(".yaml")
        .tempfile()
        .expect("temp file");
    writeln!(file, "onchain_endpoint: \"ftp://example.com/feed\"").expect("write");

    let error = DashboardConfig::load(Some(file.path())).expect_err("bad endpoint");

    assert!(matches!(
        error,
        CoreError::Validation(ValidationError::InvalidEndpoint {
            field: "onchain_endpoint",
            ..
        })
    ));
}

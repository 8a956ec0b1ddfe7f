//! Core contracts for sentix.
//!
//! This crate contains:
//! - Feed records, sentiment types and indicator catalogue
//! - Fundamental, on-chain and overall sentiment classification
//! - The feed merge engine and detail-view indicator extraction
//! - Live and mock feeds with retry and response caching
//! - Configuration, dashboard orchestration and the response envelope

pub mod aggregate;
pub mod cache;
pub mod classify;
pub mod config;
pub mod dashboard;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod feeds;
pub mod history;
pub mod http_client;
pub mod indicators;
pub mod merge;
pub mod pagination;
pub mod retry;

pub use aggregate::aggregate_overall;
pub use cache::CacheStore;
pub use classify::{
    classify_change, classify_fundamental, classify_onchain, resolve_onchain, tally_onchain,
    SentimentTally,
};
pub use config::DashboardConfig;
pub use dashboard::{Dashboard, DashboardSnapshot, DetailView};
pub use domain::{
    change_base_name, humanize_label, DisplayRow, FundamentalRecord, OnchainRecord,
    OnchainSentiment, SchemaReport, SentimentType, UtcDateTime, CHANGE_SUFFIX, KNOWN_INDICATORS,
};
pub use envelope::{Envelope, EnvelopeError, EnvelopeMeta, SCHEMA_VERSION};
pub use error::{CoreError, ValidationError};
pub use feeds::{
    FeedError, FeedErrorKind, FeedId, FundamentalPage, HttpFeed, MarketFeed, MockFeed,
};
pub use history::{build_indicator_history, IndicatorHistory, IndicatorSeries, HISTORY_WINDOW};
pub use http_client::{HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};
pub use indicators::{extract_indicators, IndicatorRow};
pub use merge::{
    derive_symbol, index_fundamentals, merge_tokens, merge_tokens_with_price, protocol_key,
    rank_priority, PRICE_PLACEHOLDER, PROTOCOL_PREFIX,
};
pub use pagination::PageInfo;
pub use retry::{Backoff, RetryPolicy};

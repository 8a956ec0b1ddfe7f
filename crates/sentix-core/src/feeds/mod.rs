//! Upstream feed contract and shared response types.
//!
//! | Operation | Response | Description |
//! |-----------|----------|-------------|
//! | [`MarketFeed::fundamentals`] | [`FundamentalPage`] | Fundamental snapshots, paged |
//! | [`MarketFeed::onchain`] | `Vec<OnchainRecord>` | On-chain flow snapshots |
//! | [`MarketFeed::onchain_by_protocol`] | `Option<OnchainRecord>` | Single protocol lookup |
//! | [`MarketFeed::price_history`] | [`IndicatorHistory`] | Recent indicator series |
//!
//! [`HttpFeed`] talks to the live services; [`MockFeed`] serves a fixed data set.

mod http;
mod mock;

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{FundamentalRecord, IndicatorHistory, OnchainRecord};

pub use http::HttpFeed;
pub use mock::MockFeed;

/// Identifies the upstream service behind a request or error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedId {
    Fundamental,
    Onchain,
    PriceHistory,
}

impl FeedId {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fundamental => "fundamental",
            Self::Onchain => "onchain",
            Self::PriceHistory => "price_history",
        }
    }
}

impl Display for FeedId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Feed-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedErrorKind {
    /// Transport failure: connect, timeout, body read.
    Unavailable,
    /// Upstream answered with a non-2xx status.
    UpstreamStatus,
    /// Body was not the expected JSON shape.
    Decode,
    InvalidRequest,
}

/// Structured feed error surfaced to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedError {
    kind: FeedErrorKind,
    message: String,
    retryable: bool,
    status: Option<u16>,
    feed: Option<FeedId>,
}

impl FeedError {
    fn new(kind: FeedErrorKind, message: impl Into<String>, retryable: bool) -> Self {
        Self {
            kind,
            message: message.into(),
            retryable,
            status: None,
            feed: None,
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(FeedErrorKind::Unavailable, message, true)
    }

    pub fn upstream_status(status: u16, retryable: bool) -> Self {
        let mut error = Self::new(
            FeedErrorKind::UpstreamStatus,
            format!("upstream returned status {status}"),
            retryable,
        );
        error.status = Some(status);
        error
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(FeedErrorKind::Decode, message, false)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(FeedErrorKind::InvalidRequest, message, false)
    }

    pub fn with_feed(mut self, feed: FeedId) -> Self {
        self.feed = Some(feed);
        self
    }

    pub const fn kind(&self) -> FeedErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn status(&self) -> Option<u16> {
        self.status
    }

    pub const fn feed(&self) -> Option<FeedId> {
        self.feed
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            FeedErrorKind::Unavailable => "feed.unavailable",
            FeedErrorKind::UpstreamStatus => "feed.upstream_status",
            FeedErrorKind::Decode => "feed.decode",
            FeedErrorKind::InvalidRequest => "feed.invalid_request",
        }
    }
}

impl Display for FeedError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.feed {
            Some(feed) => write!(f, "{feed}: {} ({})", self.message, self.code()),
            None => write!(f, "{} ({})", self.message, self.code()),
        }
    }
}

impl std::error::Error for FeedError {}

/// One page of the fundamental feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FundamentalPage {
    pub data: Vec<FundamentalRecord>,
    pub page: u64,
    pub limit: u64,
    pub total: u64,
}

/// Upstream data contract consumed by the dashboard.
///
/// Implementations must be `Send + Sync`; the dashboard shares one feed across
/// concurrent loads.
pub trait MarketFeed: Send + Sync {
    fn name(&self) -> &'static str;

    /// Fetches one page of fundamental records.
    fn fundamentals<'a>(
        &'a self,
        page: u64,
    ) -> Pin<Box<dyn Future<Output = Result<FundamentalPage, FeedError>> + Send + 'a>>;

    /// Fetches every on-chain record the service publishes.
    fn onchain<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<OnchainRecord>, FeedError>> + Send + 'a>>;

    /// Looks up one on-chain record by case-insensitive protocol id.
    ///
    /// An empty id resolves to `None` without touching the network.
    fn onchain_by_protocol<'a>(
        &'a self,
        protocol_id: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<OnchainRecord>, FeedError>> + Send + 'a>>;

    /// Fetches the most recent indicator readings for one protocol.
    fn price_history<'a>(
        &'a self,
        protocol_id: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<IndicatorHistory, FeedError>> + Send + 'a>>;
}

/// Unwraps `{ "data": [...] }` or a bare array into its items.
pub(crate) fn list_items(body: Value) -> Result<Vec<Value>, FeedError> {
    match body {
        Value::Array(items) => Ok(items),
        Value::Object(mut object) => match object.remove("data") {
            Some(Value::Array(items)) => Ok(items),
            _ => Err(FeedError::decode(
                "expected a JSON array or an object with a 'data' array",
            )),
        },
        _ => Err(FeedError::decode(
            "expected a JSON array or an object with a 'data' array",
        )),
    }
}

/// Decodes each object item into a record, skipping items that are not objects.
pub(crate) fn decode_records<T>(items: Vec<Value>, feed: FeedId) -> Vec<T>
where
    T: serde::de::DeserializeOwned,
{
    let total = items.len();
    let records = items
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect::<Vec<T>>();

    if records.len() < total {
        tracing::warn!(
            %feed,
            skipped = total - records.len(),
            "skipped feed items that are not records"
        );
    }
    records
}

/// Parses a fundamental feed body, filling pagination gaps from the request.
pub(crate) fn decode_fundamental_page(
    body: Value,
    requested_page: u64,
    default_limit: u64,
) -> Result<FundamentalPage, FeedError> {
    let positive = |value: Option<&Value>| value.and_then(Value::as_u64).filter(|n| *n > 0);
    let (page, limit, total) = match &body {
        Value::Object(object) => (
            positive(object.get("page")),
            positive(object.get("limit")),
            positive(object.get("total")),
        ),
        _ => (None, None, None),
    };

    let items = list_items(body)?;
    let data = decode_records::<FundamentalRecord>(items, FeedId::Fundamental);
    let data_len = data.len() as u64;

    Ok(FundamentalPage {
        data,
        page: page.unwrap_or(requested_page),
        limit: limit.unwrap_or(default_limit),
        total: total.unwrap_or(data_len),
    })
}

/// Picks the record matching `protocol_id` from a list or single-object body.
pub(crate) fn find_protocol(body: Value, protocol_id: &str) -> Result<Option<OnchainRecord>, FeedError> {
    let key = protocol_id.to_lowercase();
    let is_match = |record: &OnchainRecord| record.protocol_id.to_lowercase() == key;

    let is_single_record = matches!(&body, Value::Object(object) if !object.contains_key("data"));
    if is_single_record {
        let record: OnchainRecord = serde_json::from_value(body)
            .map_err(|error| FeedError::decode(error.to_string()))?;
        return Ok(Some(record).filter(is_match));
    }

    let items = list_items(body)?;
    Ok(decode_records::<OnchainRecord>(items, FeedId::Onchain)
        .into_iter()
        .find(is_match))
}

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::{Map, Value};

use super::{
    decode_fundamental_page, decode_records, find_protocol, list_items, FeedError, FeedId,
    FundamentalPage, MarketFeed,
};
use crate::cache::CacheStore;
use crate::config::DashboardConfig;
use crate::history::build_indicator_history;
use crate::http_client::{HttpClient, HttpRequest, ReqwestHttpClient};
use crate::retry::RetryPolicy;
use crate::{IndicatorHistory, OnchainRecord};

/// Live feed backed by the three upstream JSON services.
#[derive(Clone)]
pub struct HttpFeed {
    http_client: Arc<dyn HttpClient>,
    config: DashboardConfig,
    retry: RetryPolicy,
    cache: CacheStore,
}

impl HttpFeed {
    pub fn new(config: DashboardConfig) -> Self {
        Self::with_http_client(Arc::new(ReqwestHttpClient::new()), config)
    }

    pub fn with_http_client(http_client: Arc<dyn HttpClient>, config: DashboardConfig) -> Self {
        Self {
            http_client,
            retry: config.retry_policy(),
            cache: CacheStore::new(config.cache_ttl()),
            config,
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_cache(mut self, cache: CacheStore) -> Self {
        self.cache = cache;
        self
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    fn endpoint(&self, feed: FeedId, query: &[(&str, u64)]) -> Result<String, FeedError> {
        let base = match feed {
            FeedId::Fundamental => &self.config.fundamental_endpoint,
            FeedId::Onchain => &self.config.onchain_endpoint,
            FeedId::PriceHistory => &self.config.price_history_endpoint,
        };

        let mut url = reqwest::Url::parse(base).map_err(|error| {
            FeedError::invalid_request(format!("invalid endpoint '{base}': {error}")).with_feed(feed)
        })?;
        {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in query {
                pairs.append_pair(name, &value.to_string());
            }
        }
        Ok(url.into())
    }

    /// GETs `url` as JSON, serving from cache when fresh and retrying transient failures.
    async fn fetch_json(&self, feed: FeedId, url: &str) -> Result<Value, FeedError> {
        if let Some(body) = self.cache.get(url).await {
            tracing::debug!(%feed, url, "serving feed from cache");
            return parse_body(feed, &body);
        }

        let mut attempt = 0;
        loop {
            let request = HttpRequest::get(url)
                .with_header("accept", "application/json")
                .with_timeout_ms(self.config.timeout_ms);

            let error = match self.http_client.execute(request).await {
                Ok(response) if response.is_success() => {
                    let value = parse_body(feed, &response.body)?;
                    self.cache.put(url, response.body).await;
                    tracing::info!(%feed, url, attempt, "feed fetched");
                    return Ok(value);
                }
                Ok(response) => FeedError::upstream_status(
                    response.status,
                    self.retry.should_retry_status(response.status),
                ),
                Err(error) if error.is_timeout() => {
                    FeedError::unavailable(format!("request timed out: {}", error.message()))
                }
                Err(error) => FeedError::unavailable(error.message()),
            }
            .with_feed(feed);

            if !error.retryable() || attempt >= self.retry.max_retries {
                return Err(error);
            }

            let delay = self.retry.delay_for_attempt(attempt);
            tracing::warn!(
                %feed,
                attempt = attempt + 1,
                delay_ms = delay.as_millis() as u64,
                error = %error,
                "retrying feed request"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    async fn fetch_onchain(&self) -> Result<Value, FeedError> {
        let url = self.endpoint(FeedId::Onchain, &[("limit", self.config.onchain_limit)])?;
        self.fetch_json(FeedId::Onchain, &url).await
    }
}

impl MarketFeed for HttpFeed {
    fn name(&self) -> &'static str {
        "http"
    }

    fn fundamentals<'a>(
        &'a self,
        page: u64,
    ) -> Pin<Box<dyn Future<Output = Result<FundamentalPage, FeedError>> + Send + 'a>> {
        Box::pin(async move {
            let limit = self.config.page_limit;
            let url = self.endpoint(FeedId::Fundamental, &[("page", page), ("limit", limit)])?;
            let body = self.fetch_json(FeedId::Fundamental, &url).await?;
            decode_fundamental_page(body, page, limit)
                .map_err(|error| error.with_feed(FeedId::Fundamental))
        })
    }

    fn onchain<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<OnchainRecord>, FeedError>> + Send + 'a>> {
        Box::pin(async move {
            let body = self.fetch_onchain().await?;
            let items = list_items(body).map_err(|error| error.with_feed(FeedId::Onchain))?;
            Ok(decode_records(items, FeedId::Onchain))
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
            let body = self.fetch_onchain().await?;
            find_protocol(body, protocol_id).map_err(|error| error.with_feed(FeedId::Onchain))
        })
    }

    fn price_history<'a>(
        &'a self,
        protocol_id: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<IndicatorHistory, FeedError>> + Send + 'a>> {
        Box::pin(async move {
            if protocol_id.is_empty() {
                return Ok(IndicatorHistory::empty(protocol_id));
            }

            let url = self.endpoint(
                FeedId::PriceHistory,
                &[("limit", self.config.history_limit)],
            )?;
            let body = self.fetch_json(FeedId::PriceHistory, &url).await?;
            let rows = list_items(body)
                .map_err(|error| error.with_feed(FeedId::PriceHistory))?
                .into_iter()
                .filter_map(|item| match item {
                    Value::Object(row) => Some(row),
                    _ => None,
                })
                .collect::<Vec<Map<String, Value>>>();

            Ok(build_indicator_history(protocol_id, &rows))
        })
    }
}

fn parse_body(feed: FeedId, body: &str) -> Result<Value, FeedError> {
    serde_json::from_str(body).map_err(|error| {
        FeedError::decode(format!("malformed JSON body: {error}")).with_feed(feed)
    })
}

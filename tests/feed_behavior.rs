use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use sentix_core::{
    CacheStore, DashboardConfig, FeedErrorKind, FeedId, HttpClient, HttpError, HttpFeed,
    HttpRequest, HttpResponse, MarketFeed, RetryPolicy,
};

/// Replays canned responses in order and records every request.
struct ScriptedClient {
    responses: Mutex<VecDeque<Result<HttpResponse, HttpError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedClient {
    fn new(responses: Vec<Result<HttpResponse, HttpError>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().expect("lock").clone()
    }
}

impl HttpClient for ScriptedClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        Box::pin(async move {
            self.requests.lock().expect("lock").push(request);
            self.responses
                .lock()
                .expect("lock")
                .pop_front()
                .unwrap_or_else(|| Err(HttpError::new("script exhausted")))
        })
    }
}

fn feed(client: &Arc<ScriptedClient>) -> HttpFeed {
    HttpFeed::with_http_client(client.clone(), DashboardConfig::default())
        .with_retry_policy(RetryPolicy::fixed(Duration::from_millis(1), 2))
}

#[tokio::test]
async fn test_onchain_request_shape_and_decoding() {
    let client = ScriptedClient::new(vec![Ok(HttpResponse::ok_json(
        r#"{"data":[{"parentProtocol":"parent#aave","whale_net_flow_usd_chg_7h":-1},{"parentProtocol":"parent#uni"}]}"#,
    ))]);

    let records = feed(&client).onchain().await.expect("decodes");

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].protocol_id, "parent#aave");

    let requests = client.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].url.ends_with("/netflow_intelligence?limit=100"));
    assert_eq!(
        requests[0].headers.get("accept").map(String::as_str),
        Some("application/json")
    );
    assert_eq!(requests[0].timeout_ms, 10_000);
}

#[tokio::test]
async fn test_fundamentals_bare_array_uses_request_pagination() {
    let client = ScriptedClient::new(vec![Ok(HttpResponse::ok_json(
        r#"[{"parentProtocol":"parent#aave","rank":"A","rank_description":"Top 10%"}]"#,
    ))]);

    let page = feed(&client).fundamentals(2).await.expect("decodes");

    assert_eq!((page.page, page.limit, page.total), (2, 200, 1));
    assert_eq!(page.data[0].rank_description, "Top 10%");
    assert!(client.requests()[0].url.ends_with("/fact_q_score?page=2&limit=200"));
}

#[tokio::test]
async fn test_transient_status_is_retried_until_success() {
    let client = ScriptedClient::new(vec![
        Ok(HttpResponse::with_status(503, "busy")),
        Ok(HttpResponse::with_status(429, "slow down")),
        Ok(HttpResponse::ok_json("[]")),
    ]);

    let records = feed(&client).onchain().await.expect("third attempt succeeds");

    assert!(records.is_empty());
    assert_eq!(client.requests().len(), 3);
}

#[tokio::test]
async fn test_retries_are_bounded() {
    let client = ScriptedClient::new(vec![
        Err(HttpError::timeout("t1")),
        Err(HttpError::new("refused")),
        Err(HttpError::new("refused")),
        Ok(HttpResponse::ok_json("[]")),
    ]);

    let error = feed(&client).onchain().await.expect_err("retries exhausted");

    assert_eq!(error.kind(), FeedErrorKind::Unavailable);
    assert_eq!(error.feed(), Some(FeedId::Onchain));
    assert!(error.retryable());
    assert_eq!(client.requests().len(), 3);
}

#[tokio::test]
async fn test_client_errors_are_not_retried() {
    let client = ScriptedClient::new(vec![Ok(HttpResponse::with_status(404, "missing"))]);

    let error = feed(&client).fundamentals(1).await.expect_err("404 fails");

    assert_eq!(error.kind(), FeedErrorKind::UpstreamStatus);
    assert_eq!(error.status(), Some(404));
    assert_eq!(error.feed(), Some(FeedId::Fundamental));
    assert!(!error.retryable());
    assert_eq!(client.requests().len(), 1);
}

#[tokio::test]
async fn test_malformed_json_is_a_decode_error() {
    let client = ScriptedClient::new(vec![Ok(HttpResponse::ok_json("<html>oops</html>"))]);

    let error = feed(&client).onchain().await.expect_err("not json");

    assert_eq!(error.code(), "feed.decode");
    assert_eq!(client.requests().len(), 1);
}

#[tokio::test]
async fn test_object_without_data_array_is_a_decode_error() {
    let client = ScriptedClient::new(vec![Ok(HttpResponse::ok_json(r#"{"rows":[]}"#))]);

    let error = feed(&client).onchain().await.expect_err("wrong shape");

    assert_eq!(error.kind(), FeedErrorKind::Decode);
    assert_eq!(error.feed(), Some(FeedId::Onchain));
}

#[tokio::test]
async fn test_successful_bodies_are_cached_per_url() {
    let client = ScriptedClient::new(vec![
        Ok(HttpResponse::ok_json(r#"[{"parentProtocol":"a"}]"#)),
        Ok(HttpResponse::ok_json(r#"[{"parentProtocol":"b"}]"#)),
    ]);
    let feed = feed(&client);

    let first = feed.onchain().await.expect("first");
    let second = feed.onchain().await.expect("cached");

    assert_eq!(first, second);
    assert_eq!(client.requests().len(), 1);
    assert_eq!(feed.cache().len().await, 1);
}

#[tokio::test]
async fn test_disabled_cache_always_hits_the_network() {
    let client = ScriptedClient::new(vec![
        Ok(HttpResponse::ok_json(r#"[{"parentProtocol":"a"}]"#)),
        Ok(HttpResponse::ok_json(r#"[{"parentProtocol":"b"}]"#)),
    ]);
    let feed = feed(&client).with_cache(CacheStore::disabled());

    let first = feed.onchain().await.expect("first");
    let second = feed.onchain().await.expect("second");

    assert_eq!(first[0].protocol_id, "a");
    assert_eq!(second[0].protocol_id, "b");
    assert_eq!(client.requests().len(), 2);
}

#[tokio::test]
async fn test_failures_are_not_cached() {
    let client = ScriptedClient::new(vec![
        Ok(HttpResponse::with_status(500, "boom")),
        Ok(HttpResponse::ok_json("[]")),
    ]);
    let feed = HttpFeed::with_http_client(client.clone(), DashboardConfig::default())
        .with_retry_policy(RetryPolicy::no_retry());

    assert!(feed.onchain().await.is_err());
    assert!(feed.onchain().await.is_ok());
    assert_eq!(client.requests().len(), 2);
}

#[tokio::test]
async fn test_protocol_lookup_is_case_insensitive() {
    let client = ScriptedClient::new(vec![Ok(HttpResponse::ok_json(
        r#"[{"parentProtocol":"parent#Aave","whale_net_flow_usd":1},{"parentProtocol":"parent#uni"}]"#,
    ))]);

    let record = feed(&client)
        .onchain_by_protocol("PARENT#AAVE")
        .await
        .expect("decodes")
        .expect("found");

    assert_eq!(record.protocol_id, "parent#Aave");
    assert!(record.get("whale_net_flow_usd").is_some());
}

#[tokio::test]
async fn test_empty_protocol_id_skips_the_network() {
    let client = ScriptedClient::new(Vec::new());

    let record = feed(&client).onchain_by_protocol("").await.expect("no i/o");

    assert!(record.is_none());
    assert!(client.requests().is_empty());
}

#[tokio::test]
async fn test_price_history_keeps_latest_six_readings() {
    let rows = (0..9)
        .map(|hour| {
            format!(
                r#"{{"parentProtocol":"parent#aave","timestamp":"2024-05-01T0{hour}:00:00Z","whale_net_flow_usd":{hour}}}"#
            )
        })
        .chain([r#"{"parentProtocol":"parent#other","timestamp":"2024-06-01T00:00:00Z","whale_net_flow_usd":99}"#.to_owned()])
        .collect::<Vec<_>>()
        .join(",");
    let client = ScriptedClient::new(vec![Ok(HttpResponse::ok_json(format!("[{rows}]")))]);

    let history = feed(&client)
        .price_history("Parent#AAVE")
        .await
        .expect("decodes");

    let whale = history
        .series_for("whale_net_flow_usd")
        .expect("known indicator");
    assert_eq!(
        whale.values,
        vec![Some(3.0), Some(4.0), Some(5.0), Some(6.0), Some(7.0), Some(8.0)]
    );
    assert_eq!(history.timestamps.len(), 6);
    assert!(client.requests()[0]
        .url
        .ends_with("/netflow_intelligence_price?limit=5000"));
}

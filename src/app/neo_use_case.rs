use reqwest::Url;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

use crate::app::feed_window::FeedWindow;
use crate::app::ports::{HttpClientPort, HttpGetResult};
use crate::config::NeoApiConfig;
use crate::constants::{FEED_PATH, LOOKUP_PATH};
use crate::error::{NeoError, Result};
use crate::normalize::{normalize_with, NormalizeOutcome};
use crate::observability;
use crate::types::{NormalizeStrategy, RawFeedResponse};

/// Client for the upstream NEO feed and lookup endpoints
#[derive(Clone)]
pub struct NeoClient {
    http: Arc<dyn HttpClientPort>,
    config: NeoApiConfig,
}

impl NeoClient {
    pub fn new(http: Arc<dyn HttpClientPort>, config: NeoApiConfig) -> Self {
        Self { http, config }
    }

    /// Fetch the raw date-bucketed feed.
    #[instrument(skip(self))]
    pub async fn fetch_feed(&self, window: Option<FeedWindow>) -> Result<RawFeedResponse> {
        let query = window.map(|w| w.query_pairs()).unwrap_or_default();
        let resp = self.get("feed", &[FEED_PATH], &query).await?;

        if !resp.is_success() {
            return Err(NeoError::Fetch {
                status: Some(resp.status),
                message: format!("feed endpoint returned status {}", resp.status),
            });
        }

        Ok(serde_json::from_slice(&resp.bytes)?)
    }

    /// Fetch the feed and flatten it into dashboard records.
    #[instrument(skip(self))]
    pub async fn fetch_normalized(
        &self,
        window: Option<FeedWindow>,
        strategy: NormalizeStrategy,
    ) -> Result<NormalizeOutcome> {
        let raw = self.fetch_feed(window).await?;

        let outcome = match normalize_with(&raw, strategy) {
            Ok(outcome) => outcome,
            Err(e) => {
                if matches!(e, NeoError::MalformedRecord { .. }) {
                    observability::normalize::records_malformed(1);
                }
                return Err(e);
            }
        };

        for e in &outcome.errors {
            warn!("Skipping malformed record: {}", e);
        }
        observability::normalize::records_normalized(outcome.asteroids.len());
        observability::normalize::records_malformed(outcome.errors.len());

        info!(
            normalized = outcome.asteroids.len(),
            skipped = outcome.errors.len(),
            "Normalized asteroid feed"
        );
        Ok(outcome)
    }

    /// Fetch one asteroid's full upstream record, unmodified.
    #[instrument(skip(self))]
    pub async fn lookup(&self, id: &str) -> Result<serde_json::Value> {
        let id = id.trim();
        if id.is_empty() {
            return Err(NeoError::Validation("asteroid id is required".to_string()));
        }

        let resp = self.get("lookup", &[LOOKUP_PATH, id], &[]).await?;

        match resp.status {
            s if (200..300).contains(&s) => Ok(serde_json::from_slice(&resp.bytes)?),
            404 => Err(NeoError::NotFound(format!("asteroid {}", id))),
            s => Err(NeoError::Fetch {
                status: Some(s),
                message: format!("lookup endpoint returned status {}", s),
            }),
        }
    }

    async fn get(
        &self,
        endpoint: &'static str,
        segments: &[&str],
        query: &[(&'static str, String)],
    ) -> Result<HttpGetResult> {
        let api_key = self.config.require_api_key()?;
        let mut url = self.endpoint_url(segments, query)?;
        debug!("Requesting {}", url);
        url.query_pairs_mut().append_pair("api_key", api_key);

        let started = Instant::now();
        let result = self.http.get(url.as_str()).await;
        let elapsed = started.elapsed();

        match result {
            Ok(resp) => {
                let outcome = if resp.is_success() { "ok" } else { "http_error" };
                observability::upstream::request_completed(endpoint, outcome, elapsed);
                debug!(status = resp.status, bytes = resp.bytes.len(), "Upstream responded");
                Ok(resp)
            }
            Err(message) => {
                observability::upstream::request_completed(endpoint, "transport_error", elapsed);
                warn!("Upstream {} request failed: {}", endpoint, message);
                Err(NeoError::Fetch { status: None, message })
            }
        }
    }

    fn endpoint_url(&self, segments: &[&str], query: &[(&'static str, String)]) -> Result<Url> {
        let base = &self.config.base_url;
        let mut url = Url::parse(base)
            .map_err(|e| NeoError::Config(format!("Invalid base_url '{}': {}", base, e)))?;
        url.path_segments_mut()
            .map_err(|_| NeoError::Config(format!("base_url '{}' cannot have a path", base)))?
            .pop_if_empty()
            .extend(segments);
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in query {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct StubHttp {
        status: u16,
        body: &'static str,
        urls: Mutex<Vec<String>>,
    }

    impl StubHttp {
        fn new(status: u16, body: &'static str) -> Arc<Self> {
            Arc::new(Self { status, body, urls: Mutex::new(Vec::new()) })
        }
    }

    #[async_trait]
    impl HttpClientPort for StubHttp {
        async fn get(&self, url: &str) -> std::result::Result<HttpGetResult, String> {
            self.urls.lock().unwrap().push(url.to_string());
            Ok(HttpGetResult {
                status: self.status,
                bytes: self.body.as_bytes().to_vec(),
            })
        }
    }

    fn config() -> NeoApiConfig {
        NeoApiConfig {
            base_url: "https://neo.example/rest/v1/".to_string(),
            api_key: Some("test-key".to_string()),
            timeout_seconds: 10,
        }
    }

    #[tokio::test]
    async fn test_feed_url_carries_window_and_key() {
        let http = StubHttp::new(200, r#"{"near_earth_objects":{}}"#);
        let client = NeoClient::new(http.clone(), config());
        let window = FeedWindow::parse(Some("2015-09-07"), Some("2015-09-08")).unwrap();

        client.fetch_feed(window).await.unwrap();

        let urls = http.urls.lock().unwrap();
        assert_eq!(
            urls[0],
            "https://neo.example/rest/v1/feed?start_date=2015-09-07&end_date=2015-09-08&api_key=test-key"
        );
    }

    #[tokio::test]
    async fn test_lookup_escapes_id_segment() {
        let http = StubHttp::new(200, r#"{"id":"x"}"#);
        let client = NeoClient::new(http.clone(), config());

        client.lookup("a/b").await.unwrap();

        let urls = http.urls.lock().unwrap();
        assert_eq!(urls[0], "https://neo.example/rest/v1/neo/a%2Fb?api_key=test-key");
    }

    #[tokio::test]
    async fn test_feed_non_success_is_fetch_error_with_status() {
        let client = NeoClient::new(StubHttp::new(429, "slow down"), config());
        match client.fetch_feed(None).await {
            Err(NeoError::Fetch { status, .. }) => assert_eq!(status, Some(429)),
            other => panic!("expected fetch error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_feed_body_must_be_json() {
        let client = NeoClient::new(StubHttp::new(200, "<html>"), config());
        assert!(matches!(client.fetch_feed(None).await, Err(NeoError::Json(_))));
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_before_request() {
        let http = StubHttp::new(200, "{}");
        let mut cfg = config();
        cfg.api_key = None;
        let client = NeoClient::new(http.clone(), cfg);

        assert!(matches!(client.fetch_feed(None).await, Err(NeoError::Config(_))));
        assert!(http.urls.lock().unwrap().is_empty());
    }
}

//! Status API client.
//!
//! One GET per cycle with `from_date` as a query parameter and an
//! `Authorization: OAuth <token>` header. Only "is it valid JSON" is checked
//! here; the payload shape is left to the validator.

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::config::PollerConfig;
use crate::error::ClientError;

/// Query parameter carrying the "since" timestamp.
pub const FROM_DATE_PARAM: &str = "from_date";

/// Source of raw status payloads.
#[async_trait]
pub trait StatusClient: Send + Sync {
    /// Fetch all homework updates since `since` (Unix seconds).
    async fn fetch_status(&self, since: i64) -> Result<Value, ClientError>;
}

/// [`StatusClient`] backed by the real HTTP endpoint.
pub struct HttpStatusClient {
    client: reqwest::Client,
    token: String,
    config: PollerConfig,
}

impl HttpStatusClient {
    /// Create a client for the configured endpoint.
    ///
    /// The request timeout from `config` applies to every call.
    pub fn new(config: PollerConfig, token: impl Into<String>) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            token: token.into(),
            config,
        })
    }

    /// The endpoint this client polls.
    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    fn connection_error(&self, since: i64, cause: reqwest::Error) -> ClientError {
        ClientError::Connection {
            url: self.config.endpoint.clone(),
            headers: "Authorization: OAuth ***".to_string(),
            params: format!("{}={}", FROM_DATE_PARAM, since),
            cause: cause.to_string(),
        }
    }
}

#[async_trait]
impl StatusClient for HttpStatusClient {
    async fn fetch_status(&self, since: i64) -> Result<Value, ClientError> {
        let params = [(FROM_DATE_PARAM, since)];
        let mut attempt = 1;

        let response = loop {
            debug!(url = %self.config.endpoint, since, attempt, "requesting homework statuses");

            let result = self
                .client
                .get(&self.config.endpoint)
                .header(AUTHORIZATION, format!("OAuth {}", self.token))
                .query(&params)
                .send()
                .await;

            match result {
                Ok(response) => break response,
                Err(e) if attempt < self.config.max_attempts => {
                    let delay = self.config.backoff_for(attempt);
                    warn!(
                        error = %e,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "status request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(self.connection_error(since, e)),
            }
        };

        let status = response.status();
        if status != StatusCode::OK {
            error!(
                status = status.as_u16(),
                url = %self.config.endpoint,
                params = %format!("{}={}", FROM_DATE_PARAM, since),
                "unexpected API response"
            );
            return Err(ClientError::UnexpectedStatus(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.connection_error(since, e))?;

        serde_json::from_str(&body).map_err(|e| ClientError::MalformedPayload(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::Duration;

    use axum::extract::Query;
    use axum::http::{HeaderMap, StatusCode as AxumStatus};
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;

    async fn echo(
        Query(params): Query<HashMap<String, String>>,
        headers: HeaderMap,
    ) -> Json<Value> {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        Json(json!({
            "homeworks": [],
            "from_date": params.get("from_date"),
            "auth": auth,
        }))
    }

    async fn spawn_server() -> String {
        let app = Router::new()
            .route("/ok", get(echo))
            .route("/down", get(|| async { AxumStatus::SERVICE_UNAVAILABLE }))
            .route("/garbage", get(|| async { "<html>not json</html>" }))
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    "{}"
                }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn client_for(url: String) -> HttpStatusClient {
        let config = PollerConfig::new()
            .with_endpoint(url)
            .with_request_timeout(Duration::from_millis(300))
            .with_max_attempts(2)
            .with_backoff(Duration::from_millis(1), Duration::from_millis(5));
        HttpStatusClient::new(config, "secret-token").unwrap()
    }

    #[tokio::test]
    async fn test_sends_token_and_since() {
        let base = spawn_server().await;
        let client = client_for(format!("{}/ok", base));

        let payload = client.fetch_status(1_700_000_000).await.unwrap();

        assert_eq!(payload["from_date"], "1700000000");
        assert_eq!(payload["auth"], "OAuth secret-token");
    }

    #[tokio::test]
    async fn test_non_ok_status() {
        let base = spawn_server().await;
        let client = client_for(format!("{}/down", base));

        let err = client.fetch_status(0).await.unwrap_err();
        assert!(matches!(err, ClientError::UnexpectedStatus(503)));
    }

    #[tokio::test]
    async fn test_unparseable_body() {
        let base = spawn_server().await;
        let client = client_for(format!("{}/garbage", base));

        let err = client.fetch_status(0).await.unwrap_err();
        assert!(matches!(err, ClientError::MalformedPayload(_)));
    }

    #[tokio::test]
    async fn test_connection_refused_redacts_token() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let url = format!("http://{}/", addr);
        let client = client_for(url.clone());
        let err = client.fetch_status(42).await.unwrap_err();

        match &err {
            ClientError::Connection { url: failed, params, .. } => {
                assert_eq!(failed, &url);
                assert_eq!(params, "from_date=42");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!err.to_string().contains("secret-token"));
    }

    #[tokio::test]
    async fn test_hung_endpoint_times_out() {
        let base = spawn_server().await;
        let client = client_for(format!("{}/slow", base));

        let started = std::time::Instant::now();
        let err = client.fetch_status(0).await.unwrap_err();

        assert!(matches!(err, ClientError::Connection { .. }));
        assert!(started.elapsed() < Duration::from_secs(4));
    }
}

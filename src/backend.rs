use anyhow::{Context, Result};
use rand::Rng;
use serde_json::Value;
use std::time::Duration;

use crate::config::{BackendConfig, RetryConfig};
use crate::router::Route;

/// Fixed user-facing message for any failed ask
pub const CONNECTION_ISSUE_MSG: &str = "Connection issue. I will retry shortly.";

/// Bounded exponential backoff with jitter
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            initial_delay: Duration::from_millis(config.initial_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
        }
    }
}

impl RetryPolicy {
    /// Delay before the retry following `attempt` failed attempts
    ///
    /// Doubles per attempt, capped at `max_delay`, with ±10% jitter so
    /// repeated failures do not line up.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let base = self.initial_delay.as_millis() as u64;
        let exponential = base.saturating_mul(2_u64.saturating_pow(attempt));
        let capped = exponential.min(self.max_delay.as_millis() as u64);

        let jitter = capped / 10;
        let offset = rand::rng().random_range(0..=jitter * 2);
        Duration::from_millis(capped - jitter + offset)
    }
}

/// HTTP client for the design agent backend
///
/// One JSON POST per ask; the response body is parsed as JSON without
/// inspecting the status code (the backend reports problems in-band).
pub struct BackendClient {
    client: reqwest::Client,
    base_url: String,
    retry: RetryPolicy,
}

impl BackendClient {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            retry: RetryPolicy::from(&config.retry),
        })
    }

    /// POSTs the routed request, retrying failures within the policy bounds
    pub async fn ask(&self, route: &Route) -> Result<Value> {
        let url = format!("{}{}", self.base_url, route.endpoint);
        let mut attempt = 0;

        loop {
            attempt += 1;
            match self.post_json(&url, &route.body).await {
                Ok(data) => return Ok(data),
                Err(e) if attempt < self.retry.max_attempts => {
                    let delay = self.retry.delay_for(attempt);
                    log::warn!(
                        "Request to {} failed (attempt {}/{}): {}. Retrying in {:?}",
                        url,
                        attempt,
                        self.retry.max_attempts,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn post_json(&self, url: &str, body: &Value) -> Result<Value> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .with_context(|| format!("Request to {} failed", url))?;

        response
            .json::<Value>()
            .await
            .with_context(|| format!("Response from {} was not valid JSON", url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::{Read, Write};
    use std::net::TcpListener;

    fn test_config(base_url: String, max_attempts: u32) -> BackendConfig {
        BackendConfig {
            base_url,
            request_timeout_secs: 5,
            retry: RetryConfig {
                max_attempts,
                initial_delay_ms: 10,
                max_delay_ms: 50,
            },
        }
    }

    /// Serves one canned HTTP response per body, then exits
    fn serve_responses(listener: TcpListener, bodies: Vec<&'static str>) {
        std::thread::spawn(move || {
            for (stream, body) in listener.incoming().zip(bodies) {
                let Ok(mut stream) = stream else { break };
                let mut buf = [0_u8; 4096];
                let _ = stream.read(&mut buf);
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });
    }

    #[test]
    fn backoff_doubles_and_caps() {
        let policy = RetryPolicy {
            max_attempts: 5,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(400),
        };

        let first = policy.delay_for(1);
        assert!(first >= Duration::from_millis(180), "was {:?}", first);
        assert!(first <= Duration::from_millis(220), "was {:?}", first);

        // Far past the cap, stays near max_delay regardless of jitter
        let late = policy.delay_for(10);
        assert!(late >= Duration::from_millis(360), "was {:?}", late);
        assert!(late <= Duration::from_millis(440), "was {:?}", late);
    }

    #[tokio::test]
    async fn ask_parses_the_json_reply() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        serve_responses(listener, vec![r#"{"ideas":["A"]}"#]);

        let client = BackendClient::new(&test_config(base_url, 1)).unwrap();
        let route = Route::new("/api/ideas", json!({"keywords": "brand"}));
        let data = client.ask(&route).await.unwrap();
        assert_eq!(data, json!({"ideas": ["A"]}));
    }

    #[tokio::test]
    async fn ask_retries_after_a_bad_reply() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        serve_responses(listener, vec!["not json at all", r#"{"ok":true}"#]);

        let client = BackendClient::new(&test_config(base_url, 2)).unwrap();
        let route = Route::new("/api/ideas", json!({}));
        let data = client.ask(&route).await.unwrap();
        assert_eq!(data, json!({"ok": true}));
    }

    #[tokio::test]
    async fn ask_fails_once_attempts_are_exhausted() {
        // Bind then drop so the port is very likely closed
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let client = BackendClient::new(&test_config(base_url, 2)).unwrap();
        let route = Route::new("/api/ideas", json!({}));
        assert!(client.ask(&route).await.is_err());
    }
}

//! Blocking HTTP transport with per-attempt timeout and exponential backoff.
//!
//! Retries connect/timeout failures, HTTP 429 and 5xx with a delay of
//! `base_delay * 2^(attempt-1)`. Any other status is returned immediately.
//! Failures are reported as `DataError`, never as panics.

use super::provider::{DataError, Transport};
use std::time::Duration;
use tracing::{debug, warn};

/// Timeout and retry policy for `HttpTransport`.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
    pub max_retries: u32,
    pub base_delay: Duration,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(15),
            max_retries: 3,
            base_delay: Duration::from_millis(500),
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) pulseforge/0.1".into(),
        }
    }
}

pub struct HttpTransport {
    client: reqwest::blocking::Client,
    max_retries: u32,
    base_delay: Duration,
}

impl HttpTransport {
    pub fn new(config: &TransportConfig) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| DataError::Transport {
                url: String::new(),
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            max_retries: config.max_retries,
            base_delay: config.base_delay,
        })
    }

    /// Backoff before attempt `attempt` (1-based retries; attempt 0 has none).
    fn backoff(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            Duration::ZERO
        } else {
            self.base_delay * 2u32.saturating_pow(attempt - 1)
        }
    }

    /// Execute a GET with retry and return the body of the first 2xx response.
    fn get_with_retry(&self, url: &str, headers: &[(&str, &str)]) -> Result<String, DataError> {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            let delay = self.backoff(attempt);
            if !delay.is_zero() {
                debug!(url = %redact(url), attempt, delay_ms = delay.as_millis() as u64, "retrying");
                std::thread::sleep(delay);
            }

            match self.get_once(url, headers) {
                Ok(body) => return Ok(body),
                Err(e) if e.is_retryable() => {
                    warn!(url = %redact(url), attempt, error = %e, "request failed");
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| DataError::Transport {
            url: redact(url),
            reason: "max retries exceeded".into(),
        }))
    }

    fn get_once(&self, url: &str, headers: &[(&str, &str)]) -> Result<String, DataError> {
        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let resp = request.send().map_err(|e| DataError::Transport {
            url: redact(url),
            reason: e.to_string(),
        })?;

        let status = resp.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = resp
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(DataError::RateLimited {
                retry_after_secs: retry_after,
            });
        }
        if !status.is_success() {
            return Err(DataError::HttpStatus {
                url: redact(url),
                status: status.as_u16(),
            });
        }

        resp.text().map_err(|e| DataError::Transport {
            url: redact(url),
            reason: format!("failed to read body: {e}"),
        })
    }
}

impl Transport for HttpTransport {
    fn fetch_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
    ) -> Result<serde_json::Value, DataError> {
        let body = self.get_with_retry(url, headers)?;
        serde_json::from_str(&body).map_err(|e| {
            DataError::ResponseFormat(format!("invalid JSON from {}: {e}", redact(url)))
        })
    }

    fn fetch_text(&self, url: &str) -> Result<String, DataError> {
        self.get_with_retry(url, &[])
    }
}

/// Strip the query string so logged URLs never carry tokens.
fn redact(url: &str) -> String {
    match url.split_once('?') {
        Some((path, _)) => format!("{path}?…"),
        None => url.to_string(),
    }
}

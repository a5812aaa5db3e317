use crate::config::WebhookConfig;
use crate::webhook::IngestError;
use rand::RngExt;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

pub struct HttpClient {
    inner: reqwest::Client,
    config: WebhookConfig,
}

impl HttpClient {
    pub fn new(config: &WebhookConfig) -> Result<Self, IngestError> {
        let inner = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            // The source design had no timeout at all; 30s default here.
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .build()?;

        Ok(Self {
            inner,
            config: config.clone(),
        })
    }

    /// GET a URL as JSON with retry.
    ///
    /// Network errors and 429/503 are retried with exponential backoff plus
    /// jitter; any other non-success status fails immediately, as does a body
    /// that is not JSON (retrying will not fix a malformed payload).
    pub async fn get_json(&self, url: &str) -> Result<serde_json::Value, IngestError> {
        let mut last_err = IngestError::NoAttempts;

        for attempt in 1..=(self.config.max_retries + 1) {
            debug!("GET {} (attempt {})", url, attempt);

            match self
                .inner
                .get(url)
                .header(reqwest::header::ACCEPT, "application/json")
                .send()
                .await
            {
                Ok(resp) => {
                    let status = resp.status();
                    if status.is_success() {
                        let body = resp.text().await?;
                        return serde_json::from_str(&body).map_err(IngestError::Json);
                    } else if status.as_u16() == 429 || status.as_u16() == 503 {
                        let backoff = self.backoff(attempt);
                        warn!(
                            "Rate limited ({}) on attempt {}, sleeping {:?}",
                            status, attempt, backoff
                        );
                        sleep(backoff).await;
                        last_err = IngestError::Http { status };
                    } else {
                        // Don't retry other 4xx/5xx.
                        return Err(IngestError::Http { status });
                    }
                }
                Err(e) => {
                    warn!("Request failed on attempt {}: {}", attempt, e);
                    let backoff = self.backoff(attempt);
                    last_err = IngestError::Request(e);
                    sleep(backoff).await;
                }
            }
        }

        Err(last_err)
    }

    fn backoff(&self, attempt: u32) -> Duration {
        let jitter = rand::rng().random_range(0..=self.config.jitter_ms);
        Duration::from_millis(self.config.request_delay_ms * 2u64.pow(attempt.min(6)) + jitter)
    }
}

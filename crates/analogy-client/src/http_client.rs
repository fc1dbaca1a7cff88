use analogy_core::{
    AnalogyError, AnalogyResult, AnalogyService, FeedbackReceipt, FeedbackSubmission,
    GenerateRequest, Result, ServiceConfig,
};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

pub const GENERATE_PATH: &str = "/generate_analogy";
pub const FEEDBACK_PATH: &str = "/submit_feedback";

/// Longest wait between two generation attempts
pub const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Exponential backoff before retry `attempt` (1s, 2s, 4s, ...), capped at
/// [`MAX_BACKOFF`]
pub fn backoff_delay(attempt: u32) -> Duration {
    let secs = 2u64.saturating_pow(attempt.saturating_sub(1));
    Duration::from_secs(secs).min(MAX_BACKOFF)
}

/// Client for the analogy service's two JSON endpoints
pub struct HttpAnalogyClient {
    config: ServiceConfig,
    client: Client,
}

impl HttpAnalogyClient {
    /// Create a new client
    pub fn new(config: ServiceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AnalogyError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Create a client for `base_url` with default settings
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        Self::new(ServiceConfig {
            base_url: base_url.into(),
            ..Default::default()
        })
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Send a generation request, retrying transport failures
    async fn send_generate(&self, request: &GenerateRequest) -> Result<AnalogyResult> {
        let mut attempt = 0;

        loop {
            if attempt > 0 {
                let delay = backoff_delay(attempt);
                tokio::time::sleep(delay).await;
            }

            match self.post_json(GENERATE_PATH, request).await {
                Err(AnalogyError::Network(e)) if attempt < self.config.max_retries => {
                    attempt += 1;
                    warn!(
                        "Analogy request failed (attempt {}/{}), retrying: {}",
                        attempt,
                        self.config.max_retries + 1,
                        e
                    );
                }
                other => return other,
            }
        }
    }

    /// POST `body` to `path` and decode the JSON answer
    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::service_error(status, response).await);
        }

        let text = response
            .text()
            .await
            .map_err(|e| self.transport_error(&url, e))?;

        serde_json::from_str(&text)
            .map_err(|e| AnalogyError::InvalidResponse(format!("{} from {}", e, url)))
    }

    fn transport_error(&self, url: &str, e: reqwest::Error) -> AnalogyError {
        if e.is_timeout() {
            AnalogyError::Network(format!(
                "Request to {} timed out after {}s",
                url, self.config.timeout_secs
            ))
        } else {
            AnalogyError::Network(format!("Failed to reach {}: {}", url, e))
        }
    }

    /// Build a service error from a non-success response, preferring the
    /// service's `{"error": ...}` body
    async fn service_error(status: StatusCode, response: Response) -> AnalogyError {
        let body = response.text().await.unwrap_or_default();

        let message = match serde_json::from_str::<ServiceErrorBody>(&body) {
            Ok(parsed) => parsed.error,
            Err(_) if !body.trim().is_empty() => body,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string(),
        };

        AnalogyError::Service {
            status: status.as_u16(),
            message,
        }
    }
}

#[async_trait]
impl AnalogyService for HttpAnalogyClient {
    async fn generate_analogy(&self, question: &str) -> Result<AnalogyResult> {
        self.send_generate(&GenerateRequest::new(question)).await
    }

    async fn submit_feedback(&self, submission: &FeedbackSubmission) -> Result<FeedbackReceipt> {
        self.post_json(FEEDBACK_PATH, submission).await
    }

    async fn is_available(&self) -> bool {
        // No health route; any HTTP answer means the service is up
        self.client
            .get(self.url("/"))
            .send()
            .await
            .is_ok()
    }

    fn endpoint(&self) -> &str {
        &self.config.base_url
    }
}

#[derive(Debug, Deserialize)]
struct ServiceErrorBody {
    error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let client = HttpAnalogyClient::with_base_url("http://127.0.0.1:5000/").unwrap();
        assert_eq!(
            client.url(GENERATE_PATH),
            "http://127.0.0.1:5000/generate_analogy"
        );
        assert_eq!(
            client.url(FEEDBACK_PATH),
            "http://127.0.0.1:5000/submit_feedback"
        );
    }

    #[test]
    fn test_default_config() {
        let client = HttpAnalogyClient::new(ServiceConfig::default()).unwrap();
        assert_eq!(client.endpoint(), "http://127.0.0.1:5000");
        assert_eq!(client.config().max_retries, 0);
    }

    #[test]
    fn test_backoff_doubles_then_caps() {
        assert_eq!(backoff_delay(1), Duration::from_secs(1));
        assert_eq!(backoff_delay(2), Duration::from_secs(2));
        assert_eq!(backoff_delay(3), Duration::from_secs(4));
        assert_eq!(backoff_delay(6), MAX_BACKOFF);
        assert_eq!(backoff_delay(64), MAX_BACKOFF);
    }
}

//! Live scoring strategy backed by an OpenAI-compatible chat completion API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::OracleConfig;
use crate::error::{OracleError, OracleResult};
use crate::types::{parse_rating, OracleScore};
use crate::ScoringOracle;

/// Backoff before the first retry.
const RETRY_BASE_DELAY_MS: u64 = 500;

/// Upper bound for a single backoff.
const RETRY_MAX_DELAY_MS: u64 = 8_000;

/// Fixed rating instructions sent with every request.
const RATING_INSTRUCTIONS: &str = r#"You are a short-form video editor rating transcript excerpts.
Rate how likely the excerpt is to go viral as a standalone clip on TikTok, YouTube Shorts or Instagram Reels.

Consider:
- Strength of the opening hook
- Emotional intensity, conflict or surprise
- Whether the excerpt makes sense without surrounding context

Return ONLY a single JSON object with this schema and nothing else:
{"score": <integer from 1 to 10>, "reason": "<one sentence explaining the rating>"}"#;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Rates text by asking an external chat model.
///
/// Unparseable answers are recovered as degraded fallback scores; transport
/// and HTTP failures are returned as errors after retries.
pub struct LiveOracle {
    http: Client,
    config: OracleConfig,
    api_key: String,
}

impl LiveOracle {
    pub fn new(config: OracleConfig) -> OracleResult<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| OracleError::config("live oracle mode requires OPENAI_API_KEY"))?;

        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(OracleError::Network)?;

        Ok(Self {
            http,
            config,
            api_key,
        })
    }

    /// Raw completion body for one excerpt. Only transport failures and
    /// non-success statuses are errors.
    async fn complete(&self, text: &str) -> OracleResult<String> {
        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );

        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: RATING_INSTRUCTIONS,
                },
                ChatMessage {
                    role: "user",
                    content: text,
                },
            ],
            temperature: 0.2,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        debug!(model = %self.config.model, chars = text.len(), "Requesting oracle rating");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(OracleError::from_http_status(status, body));
        }

        Ok(response.text().await?)
    }

    /// Execute with retry logic.
    async fn with_retry<F, Fut, T>(&self, operation: F) -> OracleResult<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = OracleResult<T>>,
    {
        let mut attempt = 0;
        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    let delay = backoff_delay(attempt);
                    warn!(
                        "Oracle request failed (attempt {}), retrying in {:?}: {}",
                        attempt + 1,
                        delay,
                        e
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Exponential backoff capped at [`RETRY_MAX_DELAY_MS`].
fn backoff_delay(attempt: u32) -> Duration {
    let factor = 2u64.checked_pow(attempt).unwrap_or(u64::MAX);
    Duration::from_millis(
        RETRY_BASE_DELAY_MS
            .saturating_mul(factor)
            .min(RETRY_MAX_DELAY_MS),
    )
}

/// Assistant message text from a chat completion body.
fn completion_content(body: &str) -> Result<String, String> {
    let parsed: ChatResponse =
        serde_json::from_str(body).map_err(|e| format!("malformed completion body: {}", e))?;

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| "completion has no content".to_string())
}

#[async_trait]
impl ScoringOracle for LiveOracle {
    async fn score(&self, text: &str) -> OracleResult<OracleScore> {
        let body = self.with_retry(|| self.complete(text)).await?;

        match completion_content(&body).and_then(|content| parse_rating(&content)) {
            Ok(score) => Ok(score),
            Err(detail) => {
                warn!(
                    model = %self.config.model,
                    error = %detail,
                    "Unparseable oracle rating, substituting fallback score"
                );
                metrics::counter!(crate::names::DEGRADED_SCORES_TOTAL).increment(1);
                Ok(OracleScore::parse_failure(detail))
            }
        }
    }

    fn name(&self) -> &'static str {
        "live"
    }
}

//! Generator Gateway: send the instruction payload to the text-generation
//! service and return the raw generated document.
//!
//! The service sits behind the [`TextGenerator`] trait so tests and
//! embedders can substitute it without network access. The production
//! implementation is a single-shot OpenAI chat-completions call: one
//! request, one response, no streaming, no multi-turn state.
//!
//! ## Retry Strategy
//!
//! The original behaviour here was a single unbounded blocking call. That
//! is replaced with an explicit bounded policy: a per-call timeout and
//! exponential backoff (doubling from `retry_backoff_ms`) on failure. With a
//! 500 ms base and 2 retries the wait sequence is 500 ms → 1 s, under two
//! seconds of back-off for an interactive run. Authentication failures and
//! malformed responses are permanent and are not retried.

use crate::config::UpliftConfig;
use crate::error::UpliftError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, warn};

/// Capability seam for the text-generation service.
///
/// One synchronous request/response method; the payload goes in, the
/// opaque generated document comes out.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Service name for logs and error messages.
    fn name(&self) -> &'static str;

    /// Perform one generation call. Implementations must never return an
    /// empty document as success — blank output is `EmptyGeneration`.
    async fn generate(&self, prompt: &str) -> Result<String, UpliftError>;
}

/// Drive one generation through the bounded retry policy.
///
/// Returns the first successful document. Auth errors and malformed
/// responses abort immediately; anything else (timeouts, 429s, 5xxs,
/// connection failures) is retried up to `config.max_retries` times with
/// exponential backoff.
pub async fn generate_document(
    generator: &dyn TextGenerator,
    prompt: &str,
    config: &UpliftConfig,
) -> Result<String, UpliftError> {
    let start = Instant::now();
    let mut last_err: Option<UpliftError> = None;

    for attempt in 0..=config.max_retries {
        if attempt > 0 {
            let backoff = backoff_ms(config.retry_backoff_ms, attempt);
            warn!(
                "Generation retry {}/{} after {}ms",
                attempt, config.max_retries, backoff
            );
            sleep(Duration::from_millis(backoff)).await;
        }

        match generator.generate(prompt).await {
            Ok(document) => {
                debug!(
                    "Generation via {} succeeded: {} bytes in {:?}",
                    generator.name(),
                    document.len(),
                    start.elapsed()
                );
                return Ok(document);
            }
            Err(e @ UpliftError::GenerationAuth { .. })
            | Err(e @ UpliftError::EmptyGeneration) => return Err(e),
            Err(e) => {
                warn!("Generation attempt {} failed: {}", attempt + 1, e);
                last_err = Some(e);
            }
        }
    }

    Err(last_err.unwrap_or(UpliftError::GenerationFailed {
        detail: "unknown error".to_string(),
    }))
}

/// Doubling backoff, saturating rather than overflowing for large retry
/// counts.
fn backoff_ms(base: u64, attempt: u32) -> u64 {
    base.saturating_mul(2u64.saturating_pow(attempt.saturating_sub(1)))
}

// ── OpenAI chat-completions implementation ───────────────────────────────

const OPENAI_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// Production generator: OpenAI chat completions with a fixed model and
/// temperature, a single user-role message, and a hard per-call timeout.
pub struct OpenAiGenerator {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: usize,
    timeout_secs: u64,
}

impl OpenAiGenerator {
    /// Build a generator from run configuration and an API key.
    pub fn new(config: &UpliftConfig, api_key: impl Into<String>) -> Result<Self, UpliftError> {
        let timeout_secs = config.api_timeout_secs;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| UpliftError::Internal(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: OPENAI_ENDPOINT.to_string(),
            api_key: api_key.into(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            timeout_secs,
        })
    }

    /// Point the generator at a different chat-completions endpoint
    /// (OpenAI-compatible proxies, local servers).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: usize,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[async_trait]
impl TextGenerator for OpenAiGenerator {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn generate(&self, prompt: &str) -> Result<String, UpliftError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    UpliftError::GenerationTimeout {
                        secs: self.timeout_secs,
                    }
                } else {
                    UpliftError::GenerationFailed {
                        detail: format!("request failed: {e}"),
                    }
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED
            || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(UpliftError::GenerationAuth {
                detail: format!("HTTP {status}"),
            });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpliftError::GenerationFailed {
                detail: format!("HTTP {status}: {}", truncate(&body, 200)),
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|_| UpliftError::EmptyGeneration)?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(UpliftError::EmptyGeneration);
        }

        Ok(content)
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Fails `failures` times with a transient error, then succeeds.
    struct FlakyGenerator {
        calls: AtomicUsize,
        failures: usize,
    }

    #[async_trait]
    impl TextGenerator for FlakyGenerator {
        fn name(&self) -> &'static str {
            "flaky"
        }

        async fn generate(&self, _prompt: &str) -> Result<String, UpliftError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.failures {
                Err(UpliftError::GenerationFailed {
                    detail: "HTTP 503".into(),
                })
            } else {
                Ok("--- Slide 1: Entry ---\nTitle\nBody".to_string())
            }
        }
    }

    struct AuthFailGenerator {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TextGenerator for AuthFailGenerator {
        fn name(&self) -> &'static str {
            "authfail"
        }

        async fn generate(&self, _prompt: &str) -> Result<String, UpliftError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(UpliftError::GenerationAuth {
                detail: "HTTP 401".into(),
            })
        }
    }

    fn fast_config() -> UpliftConfig {
        UpliftConfig::builder()
            .max_retries(2)
            .retry_backoff_ms(1)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn transient_failure_recovers_within_retry_budget() {
        let gen = FlakyGenerator {
            calls: AtomicUsize::new(0),
            failures: 2,
        };
        let doc = generate_document(&gen, "prompt", &fast_config())
            .await
            .unwrap();
        assert!(doc.contains("--- Slide 1"));
        assert_eq!(gen.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn exhausted_retries_surface_last_error() {
        let gen = FlakyGenerator {
            calls: AtomicUsize::new(0),
            failures: 10,
        };
        let err = generate_document(&gen, "prompt", &fast_config())
            .await
            .unwrap_err();
        assert!(matches!(err, UpliftError::GenerationFailed { .. }));
        // initial attempt + 2 retries
        assert_eq!(gen.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn auth_failure_is_not_retried() {
        let gen = AuthFailGenerator {
            calls: AtomicUsize::new(0),
        };
        let err = generate_document(&gen, "prompt", &fast_config())
            .await
            .unwrap_err();
        assert!(matches!(err, UpliftError::GenerationAuth { .. }));
        assert_eq!(gen.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn backoff_doubles_and_saturates() {
        assert_eq!(backoff_ms(500, 1), 500);
        assert_eq!(backoff_ms(500, 2), 1_000);
        assert_eq!(backoff_ms(500, 3), 2_000);
        // Extreme retry counts must not overflow.
        assert_eq!(backoff_ms(500, 200), u64::MAX);
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo wörld", 5), "héllo");
        assert_eq!(truncate("short", 200), "short");
    }
}

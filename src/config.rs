//! Configuration types for a lesson-uplift run.
//!
//! All run behaviour is controlled through [`UpliftConfig`], built via its
//! [`UpliftConfigBuilder`]. Keeping every knob in one struct makes it
//! trivial to share configs, log them, and diff two runs to understand why
//! their outputs differ.
//!
//! API credentials are an explicit [`ApiCredentials`] object constructed
//! once at startup and carried in the config — never read from ambient
//! process state mid-pipeline. Absence of a required key fails fast with a
//! named environment variable instead of failing opaquely after the first
//! network call.

use crate::error::UpliftError;
use crate::pipeline::generate::TextGenerator;
use crate::pipeline::media::MediaFinder;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// How much additional content the generation step is asked to add.
///
/// The level selects a single extra clause appended to the fixed lesson
/// template (see [`crate::prompts::enrichment_clause`]); it does not change
/// anything else about the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EnrichmentLevel {
    /// Restructure only; no extra material requested. (default)
    #[default]
    Base,
    /// Also request real-world links and deeper explanation.
    Enhanced,
    /// Also request interactive tasks, narration prompts, cross-curricular
    /// links, and advanced vocabulary.
    Max,
}

/// API credentials for the generation and media-search services.
///
/// Built once at startup — typically via [`ApiCredentials::from_env`] — and
/// passed to the components that need them. The media keys are optional at
/// the type level because media lookups can be disabled per run; when media
/// is enabled, [`ApiCredentials::from_env`] requires them up front.
#[derive(Clone, Default)]
pub struct ApiCredentials {
    /// Key for the text-generation service.
    pub openai_api_key: String,
    /// Key for the primary image search (Pixabay).
    pub pixabay_api_key: Option<String>,
    /// Key for the fallback image search (Pexels).
    pub pexels_api_key: Option<String>,
    /// Key for the video search (YouTube Data API v3).
    pub youtube_api_key: Option<String>,
}

impl ApiCredentials {
    /// Read credentials from the environment, failing fast on anything
    /// missing.
    ///
    /// `require_media` should mirror the run's `include_media` setting: a
    /// run that will perform media lookups must not discover a missing key
    /// halfway through rendering slide 7.
    pub fn from_env(require_media: bool) -> Result<Self, UpliftError> {
        let openai_api_key = read_var("OPENAI_API_KEY", "OpenAI")?;
        let pixabay_api_key = std::env::var("PIXABAY_API_KEY").ok().filter(|k| !k.is_empty());
        let pexels_api_key = std::env::var("PEXELS_API_KEY").ok().filter(|k| !k.is_empty());
        let youtube_api_key = std::env::var("YOUTUBE_API_KEY").ok().filter(|k| !k.is_empty());

        if require_media {
            if pixabay_api_key.is_none() {
                return Err(UpliftError::MissingCredential {
                    service: "Pixabay image search",
                    var: "PIXABAY_API_KEY",
                });
            }
            if pexels_api_key.is_none() {
                return Err(UpliftError::MissingCredential {
                    service: "Pexels image search",
                    var: "PEXELS_API_KEY",
                });
            }
            if youtube_api_key.is_none() {
                return Err(UpliftError::MissingCredential {
                    service: "YouTube video search",
                    var: "YOUTUBE_API_KEY",
                });
            }
        }

        Ok(Self {
            openai_api_key,
            pixabay_api_key,
            pexels_api_key,
            youtube_api_key,
        })
    }
}

fn read_var(var: &'static str, service: &'static str) -> Result<String, UpliftError> {
    match std::env::var(var) {
        Ok(v) if !v.is_empty() => Ok(v),
        _ => Err(UpliftError::MissingCredential { service, var }),
    }
}

impl fmt::Debug for ApiCredentials {
    // Keys must never end up in logs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("openai_api_key", &"<redacted>")
            .field("pixabay_api_key", &self.pixabay_api_key.as_ref().map(|_| "<redacted>"))
            .field("pexels_api_key", &self.pexels_api_key.as_ref().map(|_| "<redacted>"))
            .field("youtube_api_key", &self.youtube_api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Configuration for one lesson-uplift run.
///
/// Built via [`UpliftConfig::builder()`] or [`UpliftConfig::default()`].
///
/// # Example
/// ```rust
/// use deckuplift::{EnrichmentLevel, UpliftConfig};
///
/// let config = UpliftConfig::builder()
///     .enrichment(EnrichmentLevel::Enhanced)
///     .model("gpt-4o")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct UpliftConfig {
    /// Enrichment level passed to the prompt composer. Default: Base.
    pub enrichment: EnrichmentLevel,

    /// Generation model identifier. Default: "gpt-4o".
    pub model: String,

    /// Sampling temperature for the generation call. Default: 0.5.
    ///
    /// The template asks for a rigid delimiter format; a low-middle
    /// temperature biases the model toward structure-following output while
    /// leaving room to rewrite and reorder content. Values are clamped to
    /// 0.0–2.0 by the builder.
    pub temperature: f32,

    /// Maximum tokens the generation call may produce. Default: 4096.
    ///
    /// A restructured lesson with auxiliary slides routinely exceeds 2 000
    /// output tokens; setting this too low truncates the document
    /// mid-slide, which the renderer then silently drops.
    pub max_tokens: usize,

    /// Maximum retry attempts on a transient generation failure. Default: 2.
    ///
    /// 429s, 5xxs, and timeouts are usually transient. Two retries cover
    /// the common blips without stretching an interactive run by more than
    /// a few seconds. Authentication errors are never retried.
    pub max_retries: u32,

    /// Initial retry delay in milliseconds (exponential backoff).
    /// Default: 500. Doubles after each attempt: 500 ms → 1 s → 2 s.
    pub retry_backoff_ms: u64,

    /// Per-call timeout for the generation request in seconds. Default: 120.
    ///
    /// Restructuring a whole deck is a single large completion; generous
    /// but bounded beats the original behaviour of blocking indefinitely.
    pub api_timeout_secs: u64,

    /// Per-call timeout for each media lookup in seconds. Default: 10.
    ///
    /// Media lookups run once per rendered slide, strictly in sequence, so
    /// a hung search would otherwise stall the whole tail of the deck.
    pub media_timeout_secs: u64,

    /// Perform image and video lookups while rendering. Default: true.
    ///
    /// When false no media service is contacted and no media credential is
    /// required; every slide renders with title and body only.
    pub include_media: bool,

    /// API credentials. If `None`, [`crate::uplift`] reads them from the
    /// environment at the start of the run.
    pub credentials: Option<ApiCredentials>,

    /// Pre-constructed text generator. Takes precedence over credentials.
    /// Lets tests and embedders substitute the generation service without
    /// any network access.
    pub generator: Option<Arc<dyn TextGenerator>>,

    /// Pre-constructed media finder. Takes precedence over credentials and
    /// `include_media`.
    pub media: Option<Arc<dyn MediaFinder>>,
}

impl Default for UpliftConfig {
    fn default() -> Self {
        Self {
            enrichment: EnrichmentLevel::Base,
            model: "gpt-4o".to_string(),
            temperature: 0.5,
            max_tokens: 4096,
            max_retries: 2,
            retry_backoff_ms: 500,
            api_timeout_secs: 120,
            media_timeout_secs: 10,
            include_media: true,
            credentials: None,
            generator: None,
            media: None,
        }
    }
}

impl fmt::Debug for UpliftConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpliftConfig")
            .field("enrichment", &self.enrichment)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_ms", &self.retry_backoff_ms)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("media_timeout_secs", &self.media_timeout_secs)
            .field("include_media", &self.include_media)
            .field("generator", &self.generator.as_ref().map(|_| "<dyn TextGenerator>"))
            .field("media", &self.media.as_ref().map(|_| "<dyn MediaFinder>"))
            .finish()
    }
}

impl UpliftConfig {
    /// Create a new builder for `UpliftConfig`.
    pub fn builder() -> UpliftConfigBuilder {
        UpliftConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`UpliftConfig`].
#[derive(Debug)]
pub struct UpliftConfigBuilder {
    config: UpliftConfig,
}

impl UpliftConfigBuilder {
    pub fn enrichment(mut self, level: EnrichmentLevel) -> Self {
        self.config.enrichment = level;
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn max_retries(mut self, n: u32) -> Self {
        self.config.max_retries = n;
        self
    }

    pub fn retry_backoff_ms(mut self, ms: u64) -> Self {
        self.config.retry_backoff_ms = ms;
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs.max(1);
        self
    }

    pub fn media_timeout_secs(mut self, secs: u64) -> Self {
        self.config.media_timeout_secs = secs.max(1);
        self
    }

    pub fn include_media(mut self, v: bool) -> Self {
        self.config.include_media = v;
        self
    }

    pub fn credentials(mut self, creds: ApiCredentials) -> Self {
        self.config.credentials = Some(creds);
        self
    }

    pub fn generator(mut self, generator: Arc<dyn TextGenerator>) -> Self {
        self.config.generator = Some(generator);
        self
    }

    pub fn media_finder(mut self, media: Arc<dyn MediaFinder>) -> Self {
        self.config.media = Some(media);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<UpliftConfig, UpliftError> {
        let c = &self.config;
        if c.model.is_empty() {
            return Err(UpliftError::InvalidConfig("Model must not be empty".into()));
        }
        if c.max_tokens == 0 {
            return Err(UpliftError::InvalidConfig("max_tokens must be ≥ 1".into()));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let c = UpliftConfig::default();
        assert_eq!(c.enrichment, EnrichmentLevel::Base);
        assert_eq!(c.model, "gpt-4o");
        assert_eq!(c.temperature, 0.5);
        assert_eq!(c.max_retries, 2);
        assert!(c.include_media);
    }

    #[test]
    fn builder_clamps_temperature() {
        let c = UpliftConfig::builder().temperature(5.0).build().unwrap();
        assert_eq!(c.temperature, 2.0);
        let c = UpliftConfig::builder().temperature(-1.0).build().unwrap();
        assert_eq!(c.temperature, 0.0);
    }

    #[test]
    fn builder_rejects_empty_model() {
        assert!(UpliftConfig::builder().model("").build().is_err());
    }

    #[test]
    fn credentials_debug_redacts_keys() {
        let creds = ApiCredentials {
            openai_api_key: "sk-secret".into(),
            pixabay_api_key: Some("px-secret".into()),
            pexels_api_key: None,
            youtube_api_key: None,
        };
        let dbg = format!("{creds:?}");
        assert!(!dbg.contains("secret"), "got: {dbg}");
    }
}

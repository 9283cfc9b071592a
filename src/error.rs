//! Error types for the deckuplift library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`UpliftError`] — **Fatal**: the run cannot produce a deck at all
//!   (unreadable input, missing credential, generation failure, unwritable
//!   output). Returned as `Err(UpliftError)` from the top-level `uplift*`
//!   functions.
//!
//! * [`MediaError`] — **Non-fatal**: an image or video lookup failed for a
//!   single slide. The renderer logs it and the slide simply renders without
//!   that piece of media; the run continues.
//!
//! The separation enforces the propagation policy: errors local to one
//! slide's media enrichment never travel past that slide's rendering step,
//! while whole-payload errors abort the run. Callers always see either a
//! complete result or an explicit failure — never a silently truncated deck.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the deckuplift library.
///
/// Per-slide media failures use [`MediaError`] and are handled inside the
/// renderer rather than propagated here.
#[derive(Debug, Error)]
pub enum UpliftError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input deck was not found at the given path.
    #[error("Presentation not found: '{path}'\nCheck the path exists and is readable.")]
    DeckNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not an OOXML package.
    #[error("File is not a .pptx package: '{path}'\nFirst bytes: {magic:?}")]
    NotAPptx { path: PathBuf, magic: [u8; 4] },

    /// The package opened but its presentation parts could not be parsed.
    #[error("Failed to parse presentation '{path}': {detail}")]
    DeckParse { path: PathBuf, detail: String },

    // ── Configuration errors ──────────────────────────────────────────────
    /// A required API credential is absent. Raised at startup, before any
    /// pipeline work, so the failure is visible rather than mid-run.
    #[error("Missing API credential for {service}.\nSet the {var} environment variable.")]
    MissingCredential {
        service: &'static str,
        var: &'static str,
    },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Generation errors ─────────────────────────────────────────────────
    /// The text-generation call failed after all retries.
    #[error("Text generation failed: {detail}")]
    GenerationFailed { detail: String },

    /// The generation service rejected the credentials (401/403) — retry
    /// will not help.
    #[error("Text generation authentication failed: {detail}")]
    GenerationAuth { detail: String },

    /// The generation call exceeded the configured timeout on every attempt.
    #[error("Text generation timed out after {secs}s")]
    GenerationTimeout { secs: u64 },

    /// The service answered but the response carried no usable text.
    #[error("Text generation returned an empty or malformed response")]
    EmptyGeneration,

    /// The generated document contained no delimiter segment with both a
    /// title and a body; there is nothing to render.
    #[error("Generated document yielded no renderable slides ({skipped} segments skipped)")]
    NoSlidesParsed { skipped: usize },

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not create or write the output deck.
    #[error("Failed to write output deck '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error during one slide's media enrichment.
///
/// The renderer converts every `MediaError` into "no media for this slide"
/// and a `tracing::warn!` line. It never aborts the run.
#[derive(Debug, Clone, Error)]
pub enum MediaError {
    /// A search API call failed or returned an unexpected payload.
    #[error("{source_name} search failed for '{query}': {detail}")]
    SearchFailed {
        source_name: &'static str,
        query: String,
        detail: String,
    },

    /// The image URL was found but its bytes could not be downloaded.
    #[error("Image download failed from '{url}': {detail}")]
    FetchFailed { url: String, detail: String },

    /// Downloaded bytes did not decode as an image.
    #[error("Downloaded data from '{url}' is not a decodable image: {detail}")]
    InvalidImage { url: String, detail: String },

    /// The lookup exceeded its per-call timeout.
    #[error("{source_name} lookup timed out after {secs}s")]
    Timeout { source_name: &'static str, secs: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_credential_names_the_variable() {
        let e = UpliftError::MissingCredential {
            service: "OpenAI",
            var: "OPENAI_API_KEY",
        };
        let msg = e.to_string();
        assert!(msg.contains("OPENAI_API_KEY"), "got: {msg}");
        assert!(msg.contains("OpenAI"));
    }

    #[test]
    fn no_slides_parsed_reports_skip_count() {
        let e = UpliftError::NoSlidesParsed { skipped: 3 };
        assert!(e.to_string().contains("3 segments skipped"));
    }

    #[test]
    fn generation_timeout_display() {
        let e = UpliftError::GenerationTimeout { secs: 60 };
        assert!(e.to_string().contains("60s"));
    }

    #[test]
    fn media_error_names_source() {
        let e = MediaError::SearchFailed {
            source_name: "pixabay",
            query: "photosynthesis".into(),
            detail: "HTTP 500".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("pixabay"));
        assert!(msg.contains("photosynthesis"));
    }
}

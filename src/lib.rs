//! # deckuplift
//!
//! Restructure PowerPoint lessons into enriched teaching decks using a text
//! LLM plus stock-media search.
//!
//! ## Why this crate?
//!
//! Slide decks written under time pressure tend to be walls of text with no
//! pedagogical arc. Instead of editing slide by slide, this crate extracts
//! every line of text from a `.pptx`, asks an LLM to rebuild the lesson
//! around a fixed seven-part teaching structure (Ready to Learn through
//! Homework), and re-renders the result as a fresh deck — one slide per
//! generated section,
//! each enriched with a stock photo and a supporting video link.
//!
//! ## Pipeline Overview
//!
//! ```text
//! .pptx
//!  │
//!  ├─ 1. Extract   unzip, read slide XML in deck order, collect text runs
//!  ├─ 2. Compose   extracted text + enrichment level → one instruction payload
//!  ├─ 3. Generate  single chat-completions call (bounded retry + timeout)
//!  ├─ 4. Render    split on "--- Slide" markers, skip malformed segments
//!  ├─ 5. Media     per-slide image (Pixabay → Pexels) and video (YouTube)
//!  └─ 6. Package   minimal OOXML writer → new .pptx, written atomically
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use deckuplift::{uplift_to_file, EnrichmentLevel, UpliftConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Credentials read from OPENAI_API_KEY / PIXABAY_API_KEY /
//!     // PEXELS_API_KEY / YOUTUBE_API_KEY.
//!     let config = UpliftConfig::builder()
//!         .enrichment(EnrichmentLevel::Enhanced)
//!         .build()?;
//!     let output = uplift_to_file("lesson.pptx", "lesson_uplifted.pptx", &config).await?;
//!     eprintln!(
//!         "{} slides rendered, {} skipped",
//!         output.stats.rendered_slides, output.stats.skipped_segments
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `deckuplift` binary (clap + anyhow + tracing-subscriber + chrono) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! deckuplift = { version = "0.1", default-features = false }
//! ```
//!
//! ## Failure model
//!
//! Whole-run failures (unreadable input, missing credential, generation
//! failure) surface as [`UpliftError`]. A failed image or video lookup is
//! never fatal: the slide renders without that piece of media and the run
//! carries on. See the [`error`] module for the full taxonomy.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod prompts;
pub mod uplift;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ApiCredentials, EnrichmentLevel, UpliftConfig, UpliftConfigBuilder};
pub use error::{MediaError, UpliftError};
pub use output::{RenderedSlide, SlideImage, UpliftOutput, UpliftStats};
pub use pipeline::generate::{OpenAiGenerator, TextGenerator};
pub use pipeline::media::{ImageSearch, MediaFinder, NoMedia, VideoSearch, WebMedia};
pub use uplift::{uplift, uplift_to_file, uplift_to_file_sync};

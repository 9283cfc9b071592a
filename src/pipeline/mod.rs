//! Pipeline stages for lesson uplift.
//!
//! Each submodule implements exactly one transformation step. Keeping
//! stages separate makes each independently testable and lets us swap
//! implementations (e.g. substitute the generation service with a stub)
//! without touching other stages.
//!
//! ## Data Flow
//!
//! ```text
//! extract ──▶ compose ──▶ generate ──▶ render ──▶ package
//! (pptx→text) (prompt)    (service)    (+media)   (→ pptx)
//! ```
//!
//! 1. [`extract`]  — read the source deck and produce per-slide text blocks
//! 2. [`compose`]  — interpolate blocks + enrichment clause into the
//!    instruction template
//! 3. [`generate`] — single-shot call to the text-generation service with
//!    bounded retry/backoff; the first stage with network I/O
//! 4. [`media`]    — image/video lookups keyed by slide body text
//! 5. [`render`]   — parse delimiter segments into slides and enrich each
//!    with looked-up media
//! 6. [`package`]  — materialise the slides into a new `.pptx` in memory
//!
//! Control flow is strictly linear and single-request: one run reads one
//! deck and writes one deck, with no state shared between runs.

pub mod compose;
pub mod extract;
pub mod generate;
pub mod media;
pub mod package;
pub mod render;

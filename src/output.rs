//! Output types: the rendered slides and run statistics.

use serde::Serialize;

/// A fetched, validated image ready to embed in a slide.
///
/// Held entirely in memory; no temporary file is created between fetch and
/// embed. Pixel dimensions are recorded at decode time so the package
/// writer can place the picture with aspect-preserving extents.
#[derive(Debug, Clone)]
pub struct SlideImage {
    /// Raw encoded bytes as stored in the package (PNG or JPEG).
    pub bytes: Vec<u8>,
    /// Part extension inside the package: `"png"` or `"jpeg"`.
    pub ext: &'static str,
    /// MIME type matching `ext`.
    pub content_type: &'static str,
    /// Decoded width in pixels.
    pub width_px: u32,
    /// Decoded height in pixels.
    pub height_px: u32,
}

/// One slide of the output deck.
///
/// Built once by the renderer while parsing the generated document; written
/// into the package and never mutated afterward.
#[derive(Debug, Clone)]
pub struct RenderedSlide {
    /// 1-based position in the output deck.
    pub index: usize,
    /// Section label taken from the delimiter line (e.g. "Ready to Learn").
    pub label: String,
    /// Slide title: first content line of the segment.
    pub title: String,
    /// Slide body: remaining content lines rejoined with newlines.
    pub body: String,
    /// Illustrative image, when a lookup produced one.
    pub image: Option<SlideImage>,
    /// Supporting video URL, when a lookup produced one. Rendered as a
    /// hyperlinked caption on the slide.
    pub video_url: Option<String>,
}

/// Counters for one uplift run.
///
/// The skip counter exists because dropping a malformed segment is a named
/// policy, not an accident: callers can see how much of the generated
/// document was unusable instead of the slides vanishing unnoticed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpliftStats {
    /// Slides found in the source deck.
    pub source_slides: usize,
    /// Slides materialised in the output deck.
    pub rendered_slides: usize,
    /// Delimiter segments dropped for having fewer than two content lines.
    pub skipped_segments: usize,
    /// Output slides that carry an embedded image.
    pub slides_with_image: usize,
    /// Output slides that carry a video link.
    pub slides_with_video: usize,
    /// Wall-clock time of the generation call, including retries.
    pub generation_duration_ms: u64,
    /// Wall-clock time of all media lookups.
    pub media_duration_ms: u64,
    /// End-to-end wall-clock time of the run.
    pub total_duration_ms: u64,
}

/// Result of a successful uplift run.
#[derive(Debug, Clone)]
pub struct UpliftOutput {
    /// The raw generated document, exactly as the service returned it.
    /// Offered to users as a plain-text download alongside the deck.
    pub raw_text: String,
    /// The retained slides, in output order.
    pub slides: Vec<RenderedSlide>,
    /// Run counters.
    pub stats: UpliftStats,
}

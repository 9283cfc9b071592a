//! End-to-end pipeline tests with stubbed external services.
//!
//! Every test runs the real extract/compose/render/package stages against
//! an in-memory generator and media finder — no network, no API keys. The
//! input decks are produced by the crate's own package writer and written
//! to a temp directory.

use async_trait::async_trait;
use deckuplift::pipeline::extract::extract_slide_blocks;
use deckuplift::pipeline::package::write_package;
use deckuplift::{
    uplift, uplift_to_file, EnrichmentLevel, MediaError, MediaFinder, RenderedSlide, SlideImage,
    TextGenerator, UpliftConfig, UpliftError,
};
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

// ── Fixtures ─────────────────────────────────────────────────────────────

/// Write a small deck to `dir` and return its path.
fn seed_deck(dir: &tempfile::TempDir) -> PathBuf {
    let slides = vec![
        RenderedSlide {
            index: 1,
            label: "Starter".into(),
            title: "Photosynthesis".into(),
            body: "Plants convert light into chemical energy".into(),
            image: None,
            video_url: None,
        },
        RenderedSlide {
            index: 2,
            label: "Practice".into(),
            title: "Chlorophyll".into(),
            body: "Absorbs red and blue light\nReflects green".into(),
            image: None,
            video_url: None,
        },
    ];
    let bytes = write_package(&slides).unwrap();
    let path = dir.path().join("lesson.pptx");
    std::fs::write(&path, bytes).unwrap();
    path
}

/// Generator returning a canned document and recording the prompt it saw.
struct CannedGenerator {
    document: String,
    seen_prompt: Mutex<Option<String>>,
}

impl CannedGenerator {
    fn new(document: &str) -> Arc<Self> {
        Arc::new(Self {
            document: document.to_string(),
            seen_prompt: Mutex::new(None),
        })
    }
}

#[async_trait]
impl TextGenerator for CannedGenerator {
    fn name(&self) -> &'static str {
        "canned"
    }

    async fn generate(&self, prompt: &str) -> Result<String, UpliftError> {
        *self.seen_prompt.lock().unwrap() = Some(prompt.to_string());
        Ok(self.document.clone())
    }
}

/// Media finder that always produces one tiny PNG and one fixed video URL.
struct FixedMedia;

fn tiny_png() -> Vec<u8> {
    let img = image::DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
        4,
        2,
        image::Rgba([200, 100, 50, 255]),
    ));
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[async_trait]
impl MediaFinder for FixedMedia {
    async fn find_image(&self, _query: &str) -> Result<Option<SlideImage>, MediaError> {
        Ok(Some(SlideImage {
            bytes: tiny_png(),
            ext: "png",
            content_type: "image/png",
            width_px: 4,
            height_px: 2,
        }))
    }

    async fn find_video(&self, _query: &str) -> Result<Option<String>, MediaError> {
        Ok(Some("https://www.youtube.com/watch?v=fixed".to_string()))
    }
}

/// Media finder whose every lookup fails.
struct BrokenMedia;

#[async_trait]
impl MediaFinder for BrokenMedia {
    async fn find_image(&self, query: &str) -> Result<Option<SlideImage>, MediaError> {
        Err(MediaError::SearchFailed {
            source_name: "broken",
            query: query.to_string(),
            detail: "HTTP 500".into(),
        })
    }

    async fn find_video(&self, query: &str) -> Result<Option<String>, MediaError> {
        Err(MediaError::SearchFailed {
            source_name: "broken",
            query: query.to_string(),
            detail: "HTTP 500".into(),
        })
    }
}

const GENERATED_DOC: &str = "Here is the restructured lesson:\n\
--- Slide 1: Do Now ---\n\
Recall Photosynthesis\n\
List the inputs and outputs of photosynthesis\n\
--- Slide 2: Impart Knowledge ---\n\
Chlorophyll\n\
Absorbs red and blue light\n\
Reflects green light\n\
--- Slide 3: Homework ---\n\
Extension task\n\
Diagram a leaf cross-section (max 30 minutes)";

fn stub_config(generator: Arc<dyn TextGenerator>, media: Arc<dyn MediaFinder>) -> UpliftConfig {
    UpliftConfig::builder()
        .generator(generator)
        .media_finder(media)
        .build()
        .unwrap()
}

// ── Tests ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn full_pipeline_produces_expected_slides() {
    let dir = tempfile::tempdir().unwrap();
    let deck = seed_deck(&dir);
    let generator = CannedGenerator::new(GENERATED_DOC);
    let config = stub_config(generator.clone(), Arc::new(FixedMedia));

    let output = uplift(&deck, &config).await.unwrap();

    assert_eq!(output.raw_text, GENERATED_DOC);
    assert_eq!(output.slides.len(), 3);
    assert_eq!(output.slides[0].label, "Do Now");
    assert_eq!(output.slides[0].title, "Recall Photosynthesis");
    assert_eq!(output.slides[1].body, "Absorbs red and blue light\nReflects green light");
    assert_eq!(output.slides[2].label, "Homework");

    assert_eq!(output.stats.source_slides, 2);
    assert_eq!(output.stats.rendered_slides, 3);
    assert_eq!(output.stats.skipped_segments, 0);
    assert_eq!(output.stats.slides_with_image, 3);
    assert_eq!(output.stats.slides_with_video, 3);
}

#[tokio::test]
async fn prompt_carries_extracted_text_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let deck = seed_deck(&dir);
    let generator = CannedGenerator::new(GENERATED_DOC);
    let config = UpliftConfig::builder()
        .enrichment(EnrichmentLevel::Enhanced)
        .generator(generator.clone())
        .include_media(false)
        .build()
        .unwrap();

    uplift(&deck, &config).await.unwrap();

    let prompt = generator.seen_prompt.lock().unwrap().clone().unwrap();
    assert!(prompt.contains("Slide 1:"));
    assert!(prompt.contains("Plants convert light into chemical energy"));
    assert!(prompt.contains("Absorbs red and blue light"));
    assert!(prompt.contains("--- Slide"));
}

#[tokio::test]
async fn media_failures_degrade_but_never_abort() {
    let dir = tempfile::tempdir().unwrap();
    let deck = seed_deck(&dir);
    let config = stub_config(CannedGenerator::new(GENERATED_DOC), Arc::new(BrokenMedia));

    let output = uplift(&deck, &config).await.unwrap();

    assert_eq!(output.slides.len(), 3);
    assert!(output.slides.iter().all(|s| s.image.is_none()));
    assert!(output.slides.iter().all(|s| s.video_url.is_none()));
    assert_eq!(output.stats.slides_with_image, 0);
    assert_eq!(output.stats.slides_with_video, 0);
}

#[tokio::test]
async fn malformed_segments_are_skipped_and_counted() {
    let doc = "--- Slide 1: Entry ---\nOnlyATitle\n\
               --- Slide 2: Practice ---\nReal Title\nReal body line";
    let dir = tempfile::tempdir().unwrap();
    let deck = seed_deck(&dir);
    let config = stub_config(CannedGenerator::new(doc), Arc::new(deckuplift::NoMedia));

    let output = uplift(&deck, &config).await.unwrap();

    assert_eq!(output.slides.len(), 1);
    assert_eq!(output.slides[0].title, "Real Title");
    assert_eq!(output.stats.skipped_segments, 1);
}

#[tokio::test]
async fn document_without_any_usable_segment_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let deck = seed_deck(&dir);
    let config = stub_config(
        CannedGenerator::new("prose with no markers at all"),
        Arc::new(deckuplift::NoMedia),
    );

    let err = uplift(&deck, &config).await.unwrap_err();
    assert!(matches!(err, UpliftError::NoSlidesParsed { .. }));
}

#[tokio::test]
async fn missing_input_fails_before_generation() {
    let generator = CannedGenerator::new(GENERATED_DOC);
    let config = stub_config(generator.clone(), Arc::new(deckuplift::NoMedia));

    let err = uplift("/no/such/deck.pptx", &config).await.unwrap_err();
    assert!(matches!(err, UpliftError::DeckNotFound { .. }));
    assert!(generator.seen_prompt.lock().unwrap().is_none());
}

#[tokio::test]
async fn written_deck_round_trips_through_the_extractor() {
    let dir = tempfile::tempdir().unwrap();
    let deck = seed_deck(&dir);
    let out = dir.path().join("lesson_uplifted.pptx");
    let config = stub_config(CannedGenerator::new(GENERATED_DOC), Arc::new(deckuplift::NoMedia));

    let output = uplift_to_file(&deck, &out, &config).await.unwrap();
    assert!(out.exists());

    let blocks = extract_slide_blocks(&out).unwrap();
    assert_eq!(blocks.len(), output.slides.len());
    assert!(blocks[0].contains("Recall Photosynthesis"));
    assert!(blocks[1].contains("Chlorophyll"));
    assert!(blocks[1].contains("Reflects green light"));
    assert!(blocks[2].contains("Extension task"));
}

#[tokio::test]
async fn deck_with_media_still_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let deck = seed_deck(&dir);
    let out = dir.path().join("with_media.pptx");
    let config = stub_config(CannedGenerator::new(GENERATED_DOC), Arc::new(FixedMedia));

    uplift_to_file(&deck, &out, &config).await.unwrap();

    // Text extraction sees the hyperlink caption as one more text shape.
    let blocks = extract_slide_blocks(&out).unwrap();
    assert_eq!(blocks.len(), 3);
    assert!(blocks[0].contains("Watch: https://www.youtube.com/watch?v=fixed"));
}

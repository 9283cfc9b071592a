//! Top-level entry points: run the whole uplift pipeline.
//!
//! Stage order is fixed: extract → compose → generate → render → package.
//! Service construction happens before the input file is even opened, so a
//! missing credential fails in milliseconds instead of after a full
//! extraction pass.

use crate::config::UpliftConfig;
use crate::error::UpliftError;
use crate::output::{UpliftOutput, UpliftStats};
use crate::pipeline::generate::{generate_document, OpenAiGenerator, TextGenerator};
use crate::pipeline::media::{MediaFinder, NoMedia, WebMedia};
use crate::pipeline::{compose, extract, package, render};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Uplift a presentation into restructured, media-enriched slides.
///
/// Runs extract → compose → generate → render and returns the retained
/// slides together with the raw generated document and run counters. Use
/// [`uplift_to_file`] to also materialise and write the output `.pptx`.
///
/// # Errors
///
/// Fatal conditions only: unreadable or non-pptx input, missing
/// credentials, generation failure after retries, or a generated document
/// with no renderable segment. Per-slide media failures are logged and
/// degrade to slides without media.
pub async fn uplift(
    input: impl AsRef<Path>,
    config: &UpliftConfig,
) -> Result<UpliftOutput, UpliftError> {
    let input = input.as_ref();
    let run_start = Instant::now();
    debug!("Starting uplift of '{}' with {:?}", input.display(), config);

    // Resolve both services up front. Nothing network-facing is missing by
    // the time the input file is opened.
    let generator = resolve_generator(config)?;
    let media = resolve_media(config)?;

    let blocks = extract::extract_slide_blocks(input)?;
    let source_slides = blocks.len();
    info!(
        "Extracted {} slides from '{}'",
        source_slides,
        input.display()
    );

    let prompt = compose::build_prompt(&blocks, config.enrichment);
    debug!("Composed instruction payload: {} bytes", prompt.len());

    let generation_start = Instant::now();
    let raw_text = generate_document(generator.as_ref(), &prompt, config).await?;
    let generation_duration_ms = generation_start.elapsed().as_millis() as u64;

    let parsed = render::parse_segments(&raw_text);
    if parsed.segments.is_empty() {
        return Err(UpliftError::NoSlidesParsed {
            skipped: parsed.skipped,
        });
    }
    if parsed.skipped > 0 {
        info!(
            "Skipped {} malformed segments of the generated document",
            parsed.skipped
        );
    }

    let media_start = Instant::now();
    let slides = render::enrich_segments(parsed.segments, media.as_ref()).await;
    let media_duration_ms = media_start.elapsed().as_millis() as u64;

    let stats = UpliftStats {
        source_slides,
        rendered_slides: slides.len(),
        skipped_segments: parsed.skipped,
        slides_with_image: slides.iter().filter(|s| s.image.is_some()).count(),
        slides_with_video: slides.iter().filter(|s| s.video_url.is_some()).count(),
        generation_duration_ms,
        media_duration_ms,
        total_duration_ms: run_start.elapsed().as_millis() as u64,
    };
    info!(
        "Rendered {} slides ({} with image, {} with video) in {}ms",
        stats.rendered_slides,
        stats.slides_with_image,
        stats.slides_with_video,
        stats.total_duration_ms
    );

    Ok(UpliftOutput {
        raw_text,
        slides,
        stats,
    })
}

/// Uplift a presentation and write the output deck to `output`.
///
/// The package is assembled fully in memory and lands on disk through a
/// temporary sibling file renamed into place, so a crash mid-write never
/// leaves a truncated `.pptx` behind.
pub async fn uplift_to_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &UpliftConfig,
) -> Result<UpliftOutput, UpliftError> {
    let output = output.as_ref();
    let result = uplift(input, config).await?;

    let deck = package::write_package(&result.slides)?;
    write_atomic(output, &deck)?;
    info!(
        "Wrote {} bytes to '{}'",
        deck.len(),
        output.display()
    );

    Ok(result)
}

/// Blocking wrapper around [`uplift_to_file`] for non-async callers.
pub fn uplift_to_file_sync(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &UpliftConfig,
) -> Result<UpliftOutput, UpliftError> {
    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| UpliftError::Internal(format!("tokio runtime: {e}")))?;
    runtime.block_on(uplift_to_file(input, output, config))
}

fn resolve_generator(config: &UpliftConfig) -> Result<Arc<dyn TextGenerator>, UpliftError> {
    if let Some(generator) = &config.generator {
        return Ok(Arc::clone(generator));
    }

    let creds = match &config.credentials {
        Some(creds) => creds.clone(),
        None => crate::config::ApiCredentials::from_env(media_keys_required(config))?,
    };
    Ok(Arc::new(OpenAiGenerator::new(config, creds.openai_api_key)?))
}

fn resolve_media(config: &UpliftConfig) -> Result<Arc<dyn MediaFinder>, UpliftError> {
    if let Some(media) = &config.media {
        return Ok(Arc::clone(media));
    }
    if !config.include_media {
        return Ok(Arc::new(NoMedia));
    }

    let creds = match &config.credentials {
        Some(creds) => creds.clone(),
        None => crate::config::ApiCredentials::from_env(true)?,
    };
    let finder = WebMedia::from_credentials(&creds, config.media_timeout_secs)
        .map_err(|e| UpliftError::Internal(e.to_string()))?;
    Ok(Arc::new(finder))
}

/// Media credentials are only demanded from the environment when the run
/// will actually perform lookups with no injected finder.
fn media_keys_required(config: &UpliftConfig) -> bool {
    config.include_media && config.media.is_none()
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), UpliftError> {
    let wrap = |source: std::io::Error| UpliftError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let tmp = path.with_extension("pptx.tmp");
    std::fs::write(&tmp, bytes).map_err(wrap)?;
    std::fs::rename(&tmp, path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp);
        wrap(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiCredentials;

    #[test]
    fn media_resolution_without_keys_falls_back_to_none() {
        let config = UpliftConfig::builder()
            .include_media(false)
            .build()
            .unwrap();
        assert!(resolve_media(&config).is_ok());
    }

    #[test]
    fn generator_resolution_uses_injected_credentials() {
        let config = UpliftConfig::builder()
            .include_media(false)
            .credentials(ApiCredentials {
                openai_api_key: "sk-test".into(),
                ..Default::default()
            })
            .build()
            .unwrap();
        assert!(resolve_generator(&config).is_ok());
    }

    #[test]
    fn atomic_write_replaces_target() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("deck.pptx");

        write_atomic(&target, b"first").unwrap();
        write_atomic(&target, b"second").unwrap();

        assert_eq!(std::fs::read(&target).unwrap(), b"second");
        assert!(!target.with_extension("pptx.tmp").exists());
    }
}

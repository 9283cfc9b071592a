//! Slide Renderer: parse the generated document into slides and enrich
//! each with looked-up media.
//!
//! ## Segment grammar
//!
//! The generator is instructed to mark each slide with a delimiter line of
//! the form `--- Slide N: <label> ---`. The renderer splits on the literal
//! [`SLIDE_DELIMITER`] prefix, discards anything before the first marker,
//! and reads each segment as:
//!
//! ```text
//! <rest of delimiter line>     → section label ("Ready to Learn")
//! <first content line>         → slide title
//! <remaining content lines>    → slide body
//! ```
//!
//! A segment with fewer than two content lines cannot yield both a title
//! and a body and is skipped; so is a segment whose title line is blank
//! once heading marks are stripped, since a slide cannot render without a
//! title. Both are a named policy, not an error: the skip is logged and
//! counted in the run stats, and the run continues.
//! The slide count of the output therefore equals the number of retained
//! segments — which need not match the source deck, since the generation
//! step may add, merge, or drop slides by design.
//!
//! ## Media degradation
//!
//! Lookups run strictly one slide at a time, image before video. Any
//! [`MediaError`] degrades to "no media for this slide" with a warning;
//! nothing in this module aborts the run.

use crate::output::RenderedSlide;
use crate::pipeline::media::MediaFinder;
use crate::prompts::SLIDE_DELIMITER;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

/// One delimiter-marked section of the generated document, before media
/// enrichment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Remainder of the delimiter line: `"3: Explore ---"` → `"Explore"`.
    pub label: String,
    /// First content line, stripped of heading marks and stray colons.
    pub title: String,
    /// Remaining content lines rejoined with newlines and trimmed.
    pub body: String,
}

/// Result of splitting a generated document into segments.
#[derive(Debug, Default)]
pub struct ParsedDocument {
    pub segments: Vec<Segment>,
    /// Segments dropped for having fewer than two content lines.
    pub skipped: usize,
}

/// Split the generated document on the slide delimiter.
///
/// Deterministic and pure: the same document always yields byte-identical
/// titles and bodies.
pub fn parse_segments(document: &str) -> ParsedDocument {
    let mut parsed = ParsedDocument::default();

    // Everything before the first delimiter is generator preamble
    // ("Here is your restructured lesson:") and is discarded.
    for chunk in document.split(SLIDE_DELIMITER).skip(1) {
        let mut lines = chunk.lines();
        let label_line = lines.next().unwrap_or_default();
        let label = clean_label(label_line);

        let joined = lines.collect::<Vec<_>>().join("\n");
        let content: Vec<&str> = joined.trim().lines().collect();

        if content.len() < 2 {
            debug!("Skipping segment '{label}': fewer than 2 content lines");
            parsed.skipped += 1;
            continue;
        }

        let title = clean_title(content[0]);
        let body = content[1..].join("\n").trim().to_string();
        if title.is_empty() {
            debug!("Skipping segment '{label}': empty title line");
            parsed.skipped += 1;
            continue;
        }

        parsed.segments.push(Segment { label, title, body });
    }

    parsed
}

/// `" 3: Explore / Impart Knowledge ---"` → `"Explore / Impart Knowledge"`.
fn clean_label(line: &str) -> String {
    let line = line.trim().trim_end_matches('-').trim();
    match line.split_once(':') {
        Some((index, rest)) if index.trim().chars().all(|c| c.is_ascii_digit()) => {
            rest.trim().to_string()
        }
        _ => line.to_string(),
    }
}

/// Strip markdown heading marks and stray colons off a title line.
fn clean_title(line: &str) -> String {
    line.trim()
        .trim_start_matches('#')
        .trim()
        .trim_matches(':')
        .trim()
        .to_string()
}

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("static regex"));

/// Query length cap: search APIs degrade (or reject) on very long
/// free-text queries, and the opening words of a slide body carry the
/// topical signal anyway.
const MAX_QUERY_LEN: usize = 120;

/// Derive a media search query from slide text: newlines collapsed to
/// single spaces, trimmed, bounded to a sane length on a word boundary.
pub fn derive_media_query(text: &str) -> String {
    let collapsed = WHITESPACE_RUN.replace_all(text.trim(), " ");
    if collapsed.len() <= MAX_QUERY_LEN {
        return collapsed.into_owned();
    }
    // The byte cap must land on a char boundary; slide bodies are free to
    // contain accented or CJK text.
    let cut = collapsed
        .char_indices()
        .map(|(i, _)| i)
        .take_while(|&i| i <= MAX_QUERY_LEN)
        .last()
        .unwrap_or(0);
    let head = &collapsed[..cut];
    match head.rfind(' ') {
        Some(space) => head[..space].to_string(),
        None => head.to_string(),
    }
}

/// Enrich parsed segments into output slides, one at a time in order.
///
/// Media failures never propagate: a slide whose lookups fail renders with
/// title and body only.
pub async fn enrich_segments(
    segments: Vec<Segment>,
    media: &dyn MediaFinder,
) -> Vec<RenderedSlide> {
    let mut slides = Vec::with_capacity(segments.len());

    for (i, segment) in segments.into_iter().enumerate() {
        let query_source = if segment.body.is_empty() {
            &segment.title
        } else {
            &segment.body
        };
        let query = derive_media_query(query_source);

        let image = match media.find_image(&query).await {
            Ok(found) => found,
            Err(e) => {
                warn!("Slide {}: image lookup degraded to none: {}", i + 1, e);
                None
            }
        };

        let video_url = match media.find_video(&query).await {
            Ok(found) => found,
            Err(e) => {
                warn!("Slide {}: video lookup degraded to none: {}", i + 1, e);
                None
            }
        };

        slides.push(RenderedSlide {
            index: i + 1,
            label: segment.label,
            title: segment.title,
            body: segment.body,
            image,
            video_url,
        });
    }

    slides
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::media::NoMedia;

    #[test]
    fn two_well_formed_segments_yield_two_slides() {
        let doc = "--- Slide 1: Intro ---\nTitle A\nBody line 1\n\
                   --- Slide 2: Recap ---\nTitle B\nBody line 2";
        let parsed = parse_segments(doc);
        assert_eq!(parsed.skipped, 0);
        assert_eq!(parsed.segments.len(), 2);
        assert_eq!(parsed.segments[0].label, "Intro");
        assert_eq!(parsed.segments[0].title, "Title A");
        assert_eq!(parsed.segments[0].body, "Body line 1");
        assert_eq!(parsed.segments[1].title, "Title B");
        assert_eq!(parsed.segments[1].body, "Body line 2");
    }

    #[test]
    fn title_only_segment_is_skipped_and_counted() {
        let doc = "--- Slide 9: X ---\nOnlyTitleLine\n\
                   --- Slide 2: Recap ---\nTitle B\nBody line 2";
        let parsed = parse_segments(doc);
        assert_eq!(parsed.segments.len(), 1);
        assert_eq!(parsed.skipped, 1);
        assert_eq!(parsed.segments[0].title, "Title B");
    }

    #[test]
    fn preamble_before_first_delimiter_is_discarded() {
        let doc = "Here is your restructured lesson:\n\n\
                   --- Slide 1: Entry ---\nDo Now\nWrite three facts";
        let parsed = parse_segments(doc);
        assert_eq!(parsed.segments.len(), 1);
        assert_eq!(parsed.segments[0].title, "Do Now");
    }

    #[test]
    fn document_without_delimiters_yields_nothing() {
        let parsed = parse_segments("just prose, no markers anywhere");
        assert!(parsed.segments.is_empty());
        assert_eq!(parsed.skipped, 0);
    }

    #[test]
    fn heading_marks_and_colons_are_stripped_from_titles() {
        let doc = "--- Slide 1: Entry ---\n### Key Objective:\nUnderstand photosynthesis";
        let parsed = parse_segments(doc);
        assert_eq!(parsed.segments[0].title, "Key Objective");
    }

    #[test]
    fn multi_line_bodies_are_rejoined() {
        let doc = "--- Slide 3: Explore ---\nLight reactions\nStep one\nStep two\n\nStep three";
        let parsed = parse_segments(doc);
        assert_eq!(parsed.segments[0].body, "Step one\nStep two\n\nStep three");
    }

    #[test]
    fn label_survives_without_numeric_prefix() {
        let doc = "--- Slide Homework ---\nExtension task\nMax 30 minutes";
        let parsed = parse_segments(doc);
        assert_eq!(parsed.segments[0].label, "Homework");
    }

    #[test]
    fn media_query_collapses_whitespace() {
        assert_eq!(
            derive_media_query("light\nreactions\n\n  in   plants "),
            "light reactions in plants"
        );
    }

    #[test]
    fn media_query_is_bounded_on_word_boundary() {
        let long = "word ".repeat(100);
        let q = derive_media_query(&long);
        assert!(q.len() <= 120);
        assert!(!q.ends_with(' '));
        assert!(q.ends_with("word"));
    }

    #[test]
    fn media_query_bound_respects_char_boundaries() {
        // Multi-byte chars straddling the byte cap must not split.
        let accented = format!("aaa{}", "é".repeat(100));
        let q = derive_media_query(&accented);
        assert!(q.len() <= 120);
        assert!(q.chars().all(|c| c == 'a' || c == 'é'));

        let cjk = "光合作用".repeat(50);
        let q = derive_media_query(&cjk);
        assert!(q.len() <= 120);
        assert!(q.chars().all(|c| "光合作用".contains(c)));
    }

    #[test]
    fn blank_title_line_is_skipped_and_counted() {
        let doc = "--- Slide 1: Entry ---\n###\nBody line";
        let parsed = parse_segments(doc);
        assert!(parsed.segments.is_empty());
        assert_eq!(parsed.skipped, 1);
    }

    #[tokio::test]
    async fn enrichment_with_no_media_is_deterministic() {
        let doc = "--- Slide 1: Intro ---\nTitle A\nBody line 1\n\
                   --- Slide 2: Recap ---\nTitle B\nBody line 2";

        let first = enrich_segments(parse_segments(doc).segments, &NoMedia).await;
        let second = enrich_segments(parse_segments(doc).segments, &NoMedia).await;

        assert_eq!(first.len(), 2);
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.title, b.title);
            assert_eq!(a.body, b.body);
            assert!(a.image.is_none());
            assert!(a.video_url.is_none());
        }
    }
}

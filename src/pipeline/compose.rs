//! Prompt Composer: extracted text + enrichment level → instruction payload.
//!
//! Pure string construction; no I/O, no error conditions. The payload
//! embeds the full extracted text verbatim — length is never this stage's
//! concern. If the downstream service truncates, that is its behaviour to
//! surface, not something to paper over here.

use crate::config::EnrichmentLevel;
use crate::prompts::{enrichment_clause, LESSON_TEMPLATE};

/// Build the single instruction payload sent to the generation service.
///
/// The slide blocks are joined with blank lines (one block per source
/// slide, as the Extractor produced them) and interpolated into the fixed
/// lesson template together with the enrichment clause for `level`.
pub fn build_prompt(blocks: &[String], level: EnrichmentLevel) -> String {
    let slide_text = blocks.join("\n\n");
    LESSON_TEMPLATE
        .replace("{enrichment}", enrichment_clause(level))
        .replace("{slide_text}", &slide_text)
}

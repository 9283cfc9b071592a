//! Instruction templates for lesson restructuring.
//!
//! Centralising every prompt fragment here serves two purposes:
//!
//! 1. **Single source of truth** — the delimiter the generator is told to
//!    emit and the delimiter the renderer splits on are the same constant,
//!    so the two can never drift apart.
//!
//! 2. **Testability** — unit tests can inspect the composed payload directly
//!    without calling a real generation service.
//!
//! The composer in [`crate::pipeline::compose`] is the only consumer of the
//! template; the renderer in [`crate::pipeline::render`] consumes only
//! [`SLIDE_DELIMITER`].

use crate::config::EnrichmentLevel;

/// Literal marker the generator is instructed to place before each output
/// slide. The renderer splits the generated document on this exact string.
pub const SLIDE_DELIMITER: &str = "--- Slide";

/// Fixed instruction template for rebuilding a lesson.
///
/// `{enrichment}` and `{slide_text}` are interpolated by
/// [`crate::pipeline::compose::build_prompt`]. The target structure, the
/// required auxiliary slides, and the output delimiter format are all fixed
/// here and not configurable at run time.
pub const LESSON_TEMPLATE: &str = r#"You are an expert teacher and lesson designer at a secondary school. A teacher has uploaded a PowerPoint lesson.
Please analyse and rebuild the lesson using the following structure:
1. Ready to Learn / Entry
2. Connect & Recall
3. Explore / Impart Knowledge
4. Collaborate / Facilitate
5. Independent Practice (FIT)
6. Review & Improve
7. Homework
Your task:
- Reorder content into that structure
- Suggest new slides where needed (title + content)
- Improve clarity, challenge, and engagement
- Recommend relevant images or diagrams for each slide
- Recommend a supporting video only if it enhances learning
- Include a Key Objective and Differentiated Outcomes slide
- Include a Vocabulary slide (max 6 terms)
- Include a What is the Connection slide with 4 image prompts
- End with a Homework task slide (relevant extension task, max 30 mins, bring into next lesson)
{enrichment}

Here is the raw content:

{slide_text}

Return the uplifted slide-by-slide version, labelled with headers like:
--- Slide 1: Ready to Learn ---
followed on the next lines by the slide title and the slide content."#;

/// Clause appended for [`EnrichmentLevel::Enhanced`].
pub const ENHANCED_CLAUSE: &str =
    "Add real-world links, extend explanations, and enrich slides with more detail.";

/// Clause appended for [`EnrichmentLevel::Max`].
pub const MAX_CLAUSE: &str = "Add interactive tasks, teacher narration prompts, \
cross-curricular links, and advanced vocabulary.";

/// Table lookup from enrichment level to the clause interpolated into the
/// template. Base adds nothing.
pub fn enrichment_clause(level: EnrichmentLevel) -> &'static str {
    match level {
        EnrichmentLevel::Base => "",
        EnrichmentLevel::Enhanced => ENHANCED_CLAUSE,
        EnrichmentLevel::Max => MAX_CLAUSE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_announces_the_delimiter() {
        assert!(LESSON_TEMPLATE.contains(SLIDE_DELIMITER));
    }

    #[test]
    fn base_clause_is_empty() {
        assert_eq!(enrichment_clause(EnrichmentLevel::Base), "");
    }

    #[test]
    fn clauses_are_distinct() {
        assert_ne!(
            enrichment_clause(EnrichmentLevel::Enhanced),
            enrichment_clause(EnrichmentLevel::Max)
        );
    }
}

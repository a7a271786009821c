//! Prompts for the LLM deck-augmentation call.
//!
//! The system prompt fixes the JSON response schema and the slide budget;
//! the user prompt carries the heuristic baseline (title, outline, leading
//! sentences) so the model refines rather than invents.
//!
//! Callers can replace the structural instructions via
//! [`crate::config::LlmSettings::prompt`]; [`DEFAULT_DECK_PROMPT`] is used
//! only when no override is provided.

use crate::output::AnalysisResult;
use crate::pipeline::normalize::truncate;

/// Sentences quoted to the model.
pub const PROMPT_SENTENCES: usize = 18;

/// Per-sentence cap inside the prompt.
pub const PROMPT_SENTENCE_MAX_LEN: usize = 200;

/// Word cap the model is asked to respect, and that merge enforces.
pub const MAX_BULLET_WORDS: usize = 22;

const DEFAULT_OUTLINE_TEXT: &str = "1. Introduction\n2. Method\n3. Results\n4. Conclusion";

/// Default structural instructions appended to the user prompt.
pub const DEFAULT_DECK_PROMPT: &str = r#"Structure the deck into the following thematic order and only create additional slides when strictly necessary:
1. Motivation
2. Method
3. Experiments
4. Results
5. Discussion
6. Conclusion

When producing the JSON response:
- Set the "section" field to one of the headings above in the same order.
- For every slide provide a "subsection" string; this will become a LaTeX \subsection{}.
- Each slide must contain 4–6 bullet points that capture concrete technical details (datasets, metrics, numerical values, qualitative observations, limitations, implications, etc.).
- Bullets should be declarative sentences under 22 words, without trailing punctuation or numbering, and use active voice.
- Define new terminology or abbreviations the first time they appear.
- Add up to 3 sentences of speaker notes when they help explain transitions or interpret results.
- Respect the requested slide count exactly (excluding title and agenda frames). If information is sparse, merge concepts rather than invent content.
- Prefer plain text. Use inline LaTeX math $...$ only when formulas or symbols are essential.
- Highlight limitations or future work explicitly in the Discussion slide and summarise actionable insights in the Conclusion slide."#;

/// System prompt for a deck of `target_slides` total frames.
pub fn system_prompt(target_slides: usize) -> String {
    let content_slides = target_slides.saturating_sub(2);
    [
        "You are Paper2PPT, an expert technical writer who transforms academic papers into Beamer slide decks.",
        "Return JSON ONLY with the schema:",
        "{",
        r#"  "paperTitle": string,"#,
        r#"  "paperSubtitle": string,"#,
        r#"  "authors": string,"#,
        r#"  "outline": string[],"#,
        r#"  "slides": ["#,
        r#"     { "section": string, "subsection": string, "title": string, "bullets": string[], "notes": string }"#,
        "  ]",
        "}",
        &format!("Limit slides to {content_slides} content slides plus one conclusion slide."),
        &format!("Bullets must be concise (max {MAX_BULLET_WORDS} words) and factual."),
    ]
    .join(" ")
}

/// User prompt built from the heuristic baseline.
pub fn user_prompt(baseline: &AnalysisResult, target_slides: usize, instructions: &str) -> String {
    let meta = &baseline.metadata;
    let mut prompt = format!("Paper title: {}\n", meta.paper_title);
    if let Some(subtitle) = &meta.paper_subtitle {
        prompt.push_str(&format!("Subtitle or venue: {subtitle}\n"));
    }
    if let Some(authors) = &meta.authors {
        prompt.push_str(&format!("Author line: {authors}\n"));
    }

    let outline = numbered(baseline.outline.iter().map(String::as_str));
    prompt.push_str("Suggested outline:\n");
    prompt.push_str(if outline.is_empty() {
        DEFAULT_OUTLINE_TEXT
    } else {
        &outline
    });

    let sentences: Vec<String> = baseline
        .sentences
        .iter()
        .take(PROMPT_SENTENCES)
        .map(|s| truncate(s, PROMPT_SENTENCE_MAX_LEN))
        .collect();
    prompt.push_str("\n\nImportant sentences from the paper (truncated):\n");
    prompt.push_str(&numbered(sentences.iter().map(String::as_str)));

    prompt.push_str(&format!(
        "\n\nTarget slide count (including conclusion): {target_slides}.\n"
    ));
    prompt.push_str("Produce a structured LaTeX-friendly outline.\n\n");
    prompt.push_str(instructions.trim());
    prompt
}

/// `(system, user)` pair for one augmentation call.
///
/// `instructions` of `None` (or blank) selects [`DEFAULT_DECK_PROMPT`].
pub fn build_prompt(
    baseline: &AnalysisResult,
    target_slides: usize,
    instructions: Option<&str>,
) -> (String, String) {
    let instructions = instructions
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(DEFAULT_DECK_PROMPT);
    (
        system_prompt(target_slides),
        user_prompt(baseline, target_slides, instructions),
    )
}

fn numbered<'a>(items: impl Iterator<Item = &'a str>) -> String {
    items
        .enumerate()
        .map(|(i, item)| format!("{}. {}", i + 1, item))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{DeckMetadata, DeckMode};

    fn baseline(outline: Vec<&str>, sentences: Vec<String>) -> AnalysisResult {
        AnalysisResult {
            metadata: DeckMetadata {
                paper_title: "Sparse Attention At Scale".into(),
                paper_subtitle: Some("NeurIPS 2024".into()),
                authors: None,
                generated_at: "2024-01-01T00:00:00Z".into(),
                mode: DeckMode::Static,
                slide_count: 2,
            },
            outline: outline.into_iter().map(String::from).collect(),
            slides: vec![],
            sentences,
        }
    }

    #[test]
    fn system_prompt_states_budget_and_schema() {
        let p = system_prompt(12);
        assert!(p.contains("10 content slides plus one conclusion slide"));
        assert!(p.contains(r#""paperTitle": string"#));
        assert!(p.contains("max 22 words"));
    }

    #[test]
    fn user_prompt_includes_metadata_and_numbered_outline() {
        let b = baseline(vec!["Intro", "Method"], vec!["One.".into()]);
        let (_, user) = build_prompt(&b, 8, None);
        assert!(user.starts_with("Paper title: Sparse Attention At Scale\n"));
        assert!(user.contains("Subtitle or venue: NeurIPS 2024\n"));
        assert!(!user.contains("Author line:"));
        assert!(user.contains("Suggested outline:\n1. Intro\n2. Method"));
        assert!(user.contains("Target slide count (including conclusion): 8."));
        assert!(user.ends_with(DEFAULT_DECK_PROMPT));
    }

    #[test]
    fn empty_outline_uses_default_listing() {
        let b = baseline(vec![], vec![]);
        let (_, user) = build_prompt(&b, 8, None);
        assert!(user.contains(DEFAULT_OUTLINE_TEXT));
    }

    #[test]
    fn sentences_are_capped_and_truncated() {
        let long = "word ".repeat(80);
        let sentences: Vec<String> = (0..25).map(|i| format!("Sentence {i} {long}")).collect();
        let b = baseline(vec!["A"], sentences);
        let (_, user) = build_prompt(&b, 8, None);
        assert!(user.contains("\n18. Sentence 17"));
        assert!(!user.contains("19. Sentence 18"));
        let line = user
            .lines()
            .find(|l| l.starts_with("1. Sentence 0"))
            .unwrap();
        assert!(line.chars().count() <= PROMPT_SENTENCE_MAX_LEN + 3);
    }

    #[test]
    fn custom_instructions_replace_default() {
        let b = baseline(vec!["A"], vec![]);
        let (_, user) = build_prompt(&b, 8, Some("  Use exactly three sections.  "));
        assert!(user.ends_with("Use exactly three sections."));
        assert!(!user.contains("Motivation\n2. Method"));
        let (_, user) = build_prompt(&b, 8, Some("   "));
        assert!(user.ends_with(DEFAULT_DECK_PROMPT));
    }
}

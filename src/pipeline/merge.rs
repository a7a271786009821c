//! Merge an LLM-proposed deck with the heuristic baseline.
//!
//! Overrides are field-by-field: a payload value wins only when present and
//! non-empty after trimming. Parsing is all-or-nothing; a payload that does
//! not deserialise into [`DeckPayload`] is rejected as a whole and the caller
//! falls back to [`fallback`].

use super::normalize::truncate_words;
use super::outline::MAX_OUTLINE;
use crate::error::LlmError;
use crate::output::{AnalysisResult, Deck, DeckMode, Slide, SlideBlock};
use crate::prompts::MAX_BULLET_WORDS;
use serde::Deserialize;

/// Bullet used when a payload slide carries no usable text.
pub const PENDING_BULLET: &str = "(slide content pending refinement)";

/// The JSON object the model is asked to return.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckPayload {
    #[serde(default)]
    pub paper_title: Option<String>,
    #[serde(default)]
    pub paper_subtitle: Option<String>,
    #[serde(default)]
    pub authors: Option<String>,
    #[serde(default)]
    pub outline: Option<Vec<String>>,
    #[serde(default)]
    pub slides: Option<Vec<SlidePayload>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SlidePayload {
    #[serde(default)]
    pub section: Option<String>,
    #[serde(default)]
    pub subsection: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub bullets: Option<Vec<String>>,
    #[serde(default)]
    pub paragraph: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Remove a surrounding Markdown code fence, if any.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // drop the info string ("json") on the opening line
    let body = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Parse the model's raw reply.
pub fn parse_payload(raw: &str) -> Result<DeckPayload, LlmError> {
    let body = strip_code_fence(raw);
    if !body.starts_with('{') {
        return Err(LlmError::MalformedPayload(
            "response is not a JSON object".to_string(),
        ));
    }
    serde_json::from_str(body).map_err(|e| LlmError::MalformedPayload(e.to_string()))
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn map_slide(slide: &SlidePayload, index: usize) -> Slide {
    let bullets: Vec<String> = slide
        .bullets
        .iter()
        .flatten()
        .map(|b| b.trim())
        .filter(|b| !b.is_empty())
        .map(|b| truncate_words(b, MAX_BULLET_WORDS))
        .collect();

    let bullets = if !bullets.is_empty() {
        bullets
    } else if let Some(paragraph) = non_empty(slide.paragraph.as_deref()) {
        vec![truncate_words(&paragraph, MAX_BULLET_WORDS)]
    } else {
        vec![PENDING_BULLET.to_string()]
    };

    Slide {
        id: format!("llm-slide-{}", index + 1),
        title: non_empty(slide.title.as_deref()).unwrap_or_else(|| format!("Topic {}", index + 1)),
        section: non_empty(slide.section.as_deref()),
        subsection: non_empty(slide.subsection.as_deref()),
        blocks: vec![SlideBlock::Bullets { items: bullets }],
        notes: non_empty(slide.notes.as_deref()),
    }
}

/// Overlay `payload` on `baseline`; the result is tagged [`DeckMode::Llm`].
pub fn merge(baseline: &AnalysisResult, payload: &DeckPayload) -> Deck {
    let mut deck = baseline.clone().into_deck();

    if let Some(title) = non_empty(payload.paper_title.as_deref()) {
        deck.metadata.paper_title = title;
    }
    if let Some(subtitle) = non_empty(payload.paper_subtitle.as_deref()) {
        deck.metadata.paper_subtitle = Some(subtitle);
    }
    if let Some(authors) = non_empty(payload.authors.as_deref()) {
        deck.metadata.authors = Some(authors);
    }

    let outline: Vec<String> = payload
        .outline
        .iter()
        .flatten()
        .filter_map(|entry| non_empty(Some(entry)))
        .take(MAX_OUTLINE)
        .collect();
    if !outline.is_empty() {
        deck.outline = outline;
    }

    if let Some(slides) = payload.slides.as_ref().filter(|s| !s.is_empty()) {
        deck.slides = slides
            .iter()
            .enumerate()
            .map(|(i, s)| map_slide(s, i))
            .collect();
    }

    deck.metadata.mode = DeckMode::Llm;
    deck.recount();
    deck
}

/// The untouched baseline, tagged [`DeckMode::Static`].
pub fn fallback(baseline: &AnalysisResult) -> Deck {
    let mut deck = baseline.clone().into_deck();
    deck.metadata.mode = DeckMode::Static;
    deck.recount();
    deck
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{DeckMetadata, FIXED_FRAMES};

    fn baseline() -> AnalysisResult {
        let slides = vec![
            Slide::bullets("section-1", "Intro", Some("Intro".into()), vec!["a".into()]),
            Slide::bullets("closing-slide", "Takeaways & Next Steps", None, vec!["b".into()]),
        ];
        AnalysisResult {
            metadata: DeckMetadata {
                paper_title: "Baseline Title".into(),
                paper_subtitle: None,
                authors: Some("Ada Lovelace".into()),
                generated_at: "2024-01-01T00:00:00Z".into(),
                mode: DeckMode::Static,
                slide_count: slides.len() + FIXED_FRAMES,
            },
            outline: vec!["Intro".into()],
            slides,
            sentences: vec![],
        }
    }

    #[test]
    fn parse_accepts_fenced_json() {
        let raw = "```json\n{\"paperTitle\": \"T\"}\n```";
        let payload = parse_payload(raw).unwrap();
        assert_eq!(payload.paper_title.as_deref(), Some("T"));
    }

    #[test]
    fn parse_rejects_non_objects() {
        assert!(matches!(
            parse_payload("Sure! Here is your deck."),
            Err(LlmError::MalformedPayload(_))
        ));
        assert!(parse_payload("[1, 2]").is_err());
        assert!(parse_payload("{\"slides\": 5}").is_err());
        assert!(parse_payload("{\"paperTitle\": ").is_err());
    }

    #[test]
    fn blank_fields_keep_baseline() {
        let payload = DeckPayload {
            paper_title: Some("   ".into()),
            authors: Some(String::new()),
            outline: Some(vec![" ".into()]),
            slides: Some(vec![]),
            ..DeckPayload::default()
        };
        let b = baseline();
        let deck = merge(&b, &payload);
        assert_eq!(deck.metadata.paper_title, "Baseline Title");
        assert_eq!(deck.metadata.authors.as_deref(), Some("Ada Lovelace"));
        assert_eq!(deck.outline, b.outline);
        assert_eq!(deck.slides, b.slides);
        assert_eq!(deck.metadata.mode, DeckMode::Llm);
    }

    #[test]
    fn payload_values_override() {
        let payload = parse_payload(
            r#"{
                "paperTitle": " New Title ",
                "paperSubtitle": "ICML",
                "outline": ["Motivation", " ", "Method"],
                "slides": [
                    {"section": "Motivation", "subsection": "Gap", "title": "Why", "bullets": [" x ", ""], "notes": " say this "},
                    {"paragraph": "Only a paragraph."},
                    {"title": "  "}
                ]
            }"#,
        )
        .unwrap();
        let deck = merge(&baseline(), &payload);
        assert_eq!(deck.metadata.paper_title, "New Title");
        assert_eq!(deck.metadata.paper_subtitle.as_deref(), Some("ICML"));
        assert_eq!(deck.outline, vec!["Motivation", "Method"]);
        assert_eq!(deck.slides.len(), 3);
        assert_eq!(deck.metadata.slide_count, 3 + FIXED_FRAMES);

        let first = &deck.slides[0];
        assert_eq!(first.id, "llm-slide-1");
        assert_eq!(first.subsection.as_deref(), Some("Gap"));
        assert_eq!(first.notes.as_deref(), Some("say this"));
        assert_eq!(first.bullet_items().collect::<Vec<_>>(), vec!["x"]);

        assert_eq!(deck.slides[1].title, "Topic 2");
        assert_eq!(
            deck.slides[1].bullet_items().collect::<Vec<_>>(),
            vec!["Only a paragraph."]
        );
        assert_eq!(
            deck.slides[2].bullet_items().collect::<Vec<_>>(),
            vec![PENDING_BULLET]
        );
    }

    #[test]
    fn long_bullets_are_cut_to_word_cap() {
        let long = "word ".repeat(40);
        let payload = DeckPayload {
            slides: Some(vec![SlidePayload {
                bullets: Some(vec![long]),
                ..SlidePayload::default()
            }]),
            ..DeckPayload::default()
        };
        let deck = merge(&baseline(), &payload);
        let bullet = deck.slides[0].bullet_items().next().unwrap();
        assert_eq!(bullet.split_whitespace().count(), MAX_BULLET_WORDS);
    }

    #[test]
    fn outline_override_is_capped() {
        let payload = DeckPayload {
            outline: Some((1..=12).map(|i| format!("Part {i}")).collect()),
            ..DeckPayload::default()
        };
        assert_eq!(merge(&baseline(), &payload).outline.len(), MAX_OUTLINE);
    }

    #[test]
    fn fallback_is_the_baseline() {
        let b = baseline();
        let deck = fallback(&b);
        assert_eq!(deck.metadata, b.metadata);
        assert_eq!(deck.slides, b.slides);
        assert_eq!(deck.outline, b.outline);
    }
}

//! Deck types handed across the analysis/render boundary.
//!
//! The renderer (Beamer, PPTX, whatever) receives a [`Deck`]: metadata, the
//! outline, and fully-resolved slides. Nothing in here carries heuristic
//! state; it serialises to the same camelCase JSON the renderer reads.

use crate::pipeline::figures::{apply_figures, FigureDescriptor};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of frames the renderer adds on top of the content slides
/// (title frame + agenda frame).
pub const FIXED_FRAMES: usize = 2;

/// One content block on a slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SlideBlock {
    Bullets {
        items: Vec<String>,
    },
    Paragraph {
        text: String,
    },
    Quote {
        text: String,
    },
    Image {
        path: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        caption: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        width: Option<String>,
    },
}

/// A single content slide.
///
/// `section` and `subsection` are grouping hints for the renderer; they are
/// not checked against the outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    /// Stable identifier, used to match figure descriptors.
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subsection: Option<String>,
    pub blocks: Vec<SlideBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Slide {
    /// A slide whose only block is a bullet list.
    pub fn bullets(
        id: impl Into<String>,
        title: impl Into<String>,
        section: Option<String>,
        items: Vec<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            section,
            subsection: None,
            blocks: vec![SlideBlock::Bullets { items }],
            notes: None,
        }
    }

    /// All bullet items across the slide's bullet blocks.
    pub fn bullet_items(&self) -> impl Iterator<Item = &str> {
        self.blocks
            .iter()
            .filter_map(|block| match block {
                SlideBlock::Bullets { items } => Some(items),
                _ => None,
            })
            .flatten()
            .map(String::as_str)
    }
}

/// How the deck content was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeckMode {
    /// Heuristic engine only.
    #[default]
    Static,
    /// Heuristic baseline augmented by a language model.
    Llm,
}

impl fmt::Display for DeckMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeckMode::Static => f.write_str("static"),
            DeckMode::Llm => f.write_str("llm"),
        }
    }
}

/// Title-frame data plus bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckMetadata {
    /// Never empty; falls back to "Untitled Research Paper".
    pub paper_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paper_subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authors: Option<String>,
    /// RFC 3339 timestamp.
    pub generated_at: String,
    pub mode: DeckMode,
    /// Content slides + [`FIXED_FRAMES`].
    pub slide_count: usize,
}

/// Output of the heuristic analysis.
///
/// `sentences` is every sentence of the document, kept so the LLM prompt
/// can quote from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub metadata: DeckMetadata,
    pub outline: Vec<String>,
    pub slides: Vec<Slide>,
    pub sentences: Vec<String>,
}

impl AnalysisResult {
    /// Drop the sentence list and keep what the renderer needs.
    pub fn into_deck(self) -> Deck {
        Deck {
            metadata: self.metadata,
            outline: self.outline,
            slides: self.slides,
        }
    }
}

/// The final deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    pub metadata: DeckMetadata,
    pub outline: Vec<String>,
    pub slides: Vec<Slide>,
}

impl Deck {
    /// Place figure images onto slides and recount.
    pub fn apply_figures(&mut self, figures: &[FigureDescriptor]) {
        if figures.is_empty() {
            return;
        }
        let slides = std::mem::take(&mut self.slides);
        self.slides = apply_figures(slides, figures);
        self.recount();
    }

    /// Re-establish `slide_count == slides.len() + 2`.
    pub fn recount(&mut self) {
        self.metadata.slide_count = self.slides.len() + FIXED_FRAMES;
    }

    /// Archive name for the packaged deck:
    /// `Paper2PPT-<title-stem>-<YYYY-MM-DD-HH-MM-SS>.zip`.
    pub fn suggested_filename(&self) -> String {
        let stem = sanitize_filename_part(&self.metadata.paper_title);
        let timestamp = chrono::DateTime::parse_from_rfc3339(&self.metadata.generated_at)
            .map(|t| t.format("%Y-%m-%d-%H-%M-%S").to_string())
            .unwrap_or_else(|_| chrono::Utc::now().format("%Y-%m-%d-%H-%M-%S").to_string());
        format!("Paper2PPT-{stem}-{timestamp}.zip")
    }
}

/// Lowercase, collapse non-alphanumerics to `-`, trim dashes, cap at 48.
pub fn sanitize_filename_part(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c);
        } else if !out.ends_with('-') {
            out.push('-');
        }
    }
    let trimmed: String = out.trim_matches('-').chars().take(48).collect();
    if trimmed.is_empty() {
        "paper2ppt".to_string()
    } else {
        trimmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(title: &str) -> DeckMetadata {
        DeckMetadata {
            paper_title: title.into(),
            paper_subtitle: None,
            authors: None,
            generated_at: "2024-05-01T10:20:30Z".into(),
            mode: DeckMode::Static,
            slide_count: FIXED_FRAMES,
        }
    }

    #[test]
    fn slide_block_serialises_with_kind_tag() {
        let block = SlideBlock::Bullets {
            items: vec!["a".into()],
        };
        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["kind"], "bullets");
        assert_eq!(json["items"][0], "a");
    }

    #[test]
    fn image_block_omits_absent_fields() {
        let block = SlideBlock::Image {
            path: "figuras/f1.png".into(),
            caption: None,
            width: None,
        };
        let json = serde_json::to_string(&block).unwrap();
        assert_eq!(json, r#"{"kind":"image","path":"figuras/f1.png"}"#);
    }

    #[test]
    fn metadata_uses_camel_case() {
        let json = serde_json::to_value(metadata("T")).unwrap();
        assert!(json.get("paperTitle").is_some());
        assert!(json.get("slideCount").is_some());
        assert_eq!(json["mode"], "static");
    }

    #[test]
    fn sanitize_collapses_and_caps() {
        assert_eq!(
            sanitize_filename_part("Attention Is All You Need!"),
            "attention-is-all-you-need"
        );
        assert_eq!(sanitize_filename_part("???"), "paper2ppt");
        assert_eq!(sanitize_filename_part(&"x".repeat(80)).len(), 48);
    }

    #[test]
    fn suggested_filename_uses_generation_time() {
        let deck = Deck {
            metadata: metadata("Graph Neural Networks"),
            outline: vec![],
            slides: vec![],
        };
        assert_eq!(
            deck.suggested_filename(),
            "Paper2PPT-graph-neural-networks-2024-05-01-10-20-30.zip"
        );
    }

    #[test]
    fn bullet_items_skips_non_bullet_blocks() {
        let mut slide = Slide::bullets("s", "S", None, vec!["one".into()]);
        slide.blocks.push(SlideBlock::Quote { text: "q".into() });
        assert_eq!(slide.bullet_items().collect::<Vec<_>>(), vec!["one"]);
    }
}

//! Figure placement.
//!
//! Each descriptor either replaces the blocks of the slide with the same id
//! or becomes a new slide at the end of the deck. Images are referenced under
//! `figuras/`, where the packager stores them.

use crate::output::{Slide, SlideBlock};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Directory inside the deck archive holding figure images.
pub const FIGURE_DIR: &str = "figuras";

/// Section given to figure slides that do not already have one.
pub const FIGURE_SECTION: &str = "Figures";

/// An extracted figure image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FigureDescriptor {
    /// Slide id to attach to; unknown ids create a new slide.
    pub id: String,
    pub filename: String,
    #[serde(default)]
    pub caption: Option<String>,
}

impl FigureDescriptor {
    fn caption(&self) -> Option<String> {
        self.caption
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
    }
}

/// Attach every figure in `figures` to `slides`.
pub fn apply_figures(mut slides: Vec<Slide>, figures: &[FigureDescriptor]) -> Vec<Slide> {
    for (index, figure) in figures.iter().enumerate() {
        if figure.filename.trim().is_empty() {
            warn!("Figure '{}' has no filename; the image path will be empty", figure.id);
        }
        let caption = figure.caption();
        let label = caption
            .clone()
            .unwrap_or_else(|| format!("Figure {}", index + 1));
        let image = SlideBlock::Image {
            path: format!("{FIGURE_DIR}/{}", figure.filename),
            caption: caption.clone(),
            width: None,
        };

        match slides.iter_mut().find(|s| s.id == figure.id) {
            Some(slide) => {
                slide.blocks = vec![image];
                slide.section.get_or_insert_with(|| FIGURE_SECTION.to_string());
                slide.subsection.get_or_insert(label);
            }
            None => slides.push(Slide {
                id: figure.id.clone(),
                title: label.clone(),
                section: Some(FIGURE_SECTION.to_string()),
                subsection: Some(label),
                blocks: vec![image],
                notes: None,
            }),
        }
    }
    slides
}

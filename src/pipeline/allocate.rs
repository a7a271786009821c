//! Slide allocation: fill a fixed slide budget from the analysed paper.
//!
//! ## Budget
//!
//! ```text
//! max_content  = clamp(target - 2, 3, 15)     (title + agenda frames excluded)
//! core_slots   = max(1, max_content - 1)      (one slot kept for the closing slide)
//! ```
//!
//! ## Order
//!
//! 1. authors / keywords / abstract slides, when there is material for them
//! 2. one slide per outline section, bullets from the section pool or pulled
//!    from the sentence queue by keyword match
//! 3. filler slides from leftover queue sentences
//! 4. placeholder slides until `core_slots` is reached
//! 5. the closing slide
//!
//! Steps 3 and 4 guarantee the deck always has exactly `max_content` slides.
//!
//! The [`SentenceQueue`] is owned by a single [`allocate`] call and threaded
//! through it by `&mut`; every sentence placed on a slide is removed so it
//! is not repeated further down.

use super::normalize::{char_len, dedupe_case_insensitive, truncate, DEFAULT_MAX_LEN, ELLIPSIS};
use super::outline::FALLBACK_OUTLINE;
use super::sections::SectionContent;
use crate::output::Slide;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::VecDeque;
use tracing::debug;

/// Smallest and largest content-slide budgets.
pub const MIN_CONTENT_SLIDES: usize = 3;
pub const MAX_CONTENT_SLIDES: usize = 15;

/// Bullets per section / filler slide.
pub const BULLETS_PER_SLIDE: usize = 4;

/// Display cap for closing-slide bullets.
pub const CLOSING_MAX_LEN: usize = 140;

/// Bullet used when a section slide found nothing to say.
pub const EMPTY_SECTION_BULLET: &str = "Key points will be refined after manual editing.";

/// Bullet on backfill slides.
pub const MANUAL_CONTENT_BULLET: &str = "This slide needs manual content.";

const MIN_QUEUE_SENTENCE_LEN: usize = 25;
const MIN_MEANINGFUL_LEN: usize = 20;
const OVERVIEW_SECTION: &str = "Overview";
const FILLER_SECTION: &str = "Discussion";

const CLOSING_FALLBACK: [&str; 3] = [
    "Revisit the problem, dataset, or theoretical gap addressed by the paper.",
    "Summarize the proposed approach and why it matters.",
    "Highlight the most important quantitative or qualitative results.",
];

static RE_BOILERPLATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(\bdoi\b|copyright|©|\blicen[cs]e|creative commons|arxiv|\be-?mail\b|https?://|www\.|\S+@\S+\.\S+)",
    )
    .unwrap()
});

const STOPWORDS: [&str; 14] = [
    "and", "the", "with", "from", "for", "into", "over", "under", "via", "using", "towards",
    "this", "that", "our",
];

/// Content slides allowed for a requested total deck size.
pub fn max_content_slides(target_slides: usize) -> usize {
    target_slides
        .saturating_sub(2)
        .clamp(MIN_CONTENT_SLIDES, MAX_CONTENT_SLIDES)
}

/// True for sentences that carry publication boilerplate rather than content.
pub fn is_boilerplate(sentence: &str) -> bool {
    RE_BOILERPLATE.is_match(sentence)
}

/// Lowercased word stems of a heading used for sentence matching.
fn heading_stems(heading: &str) -> Vec<String> {
    heading
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.chars().count() >= 4 && !STOPWORDS.contains(w))
        .map(|w| w.chars().take(6).collect())
        .collect()
}

/// Same sentence, ignoring case.
///
/// Queue sentences come from the flattened text, so unpunctuated lines above
/// a sentence (title, "Abstract", headings) stay glued to its front. A queue
/// sentence therefore matches when it ends with the bullet, or contains the
/// stem of a truncated bullet.
fn same_sentence(candidate: &str, bullet: &str) -> bool {
    let candidate = candidate.to_lowercase();
    let bullet = bullet.to_lowercase();
    match bullet.strip_suffix(ELLIPSIS) {
        Some(stem) if !stem.is_empty() => candidate.contains(stem),
        Some(_) => false,
        None => candidate.ends_with(&bullet),
    }
}

/// Document sentences not yet placed on a slide, in reading order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SentenceQueue {
    items: VecDeque<String>,
}

impl SentenceQueue {
    /// Keep sentences of at least 25 chars without boilerplate markers,
    /// deduplicated case-insensitively.
    pub fn from_sentences(sentences: &[String]) -> Self {
        let kept = sentences
            .iter()
            .filter(|s| char_len(s) >= MIN_QUEUE_SENTENCE_LEN && !is_boilerplate(s))
            .cloned();
        Self {
            items: dedupe_case_insensitive(kept).into(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Remove and return up to `n` sentences from the front.
    pub fn take_front(&mut self, n: usize) -> Vec<String> {
        let n = n.min(self.items.len());
        self.items.drain(..n).collect()
    }

    /// Remove and return up to `n` sentences for `heading`: sentences that
    /// mention one of its words first, then whatever is at the front.
    pub fn take_for_heading(&mut self, heading: &str, n: usize) -> Vec<String> {
        let stems = heading_stems(heading);
        let mut picked = Vec::with_capacity(n);

        if !stems.is_empty() {
            let mut i = 0;
            while i < self.items.len() && picked.len() < n {
                let lower = self.items[i].to_lowercase();
                if stems.iter().any(|stem| lower.contains(stem.as_str())) {
                    if let Some(sentence) = self.items.remove(i) {
                        picked.push(sentence);
                    }
                } else {
                    i += 1;
                }
            }
        }

        let rest = n - picked.len();
        picked.extend(self.take_front(rest));
        picked
    }

    /// Drop every queued sentence that `bullet` was made from.
    pub fn remove_like(&mut self, bullet: &str) {
        self.items.retain(|s| !same_sentence(s, bullet));
    }
}

/// Everything the allocator needs, owned or borrowed for one call.
#[derive(Debug)]
pub struct AllocationInput<'a> {
    pub outline: &'a [String],
    pub sections: &'a SectionContent,
    pub queue: SentenceQueue,
    pub author_bullets: Vec<String>,
    /// Every document sentence; the closing slide samples from it.
    pub sentences: &'a [String],
    pub target_slides: usize,
}

fn with_placeholder(bullets: Vec<String>, placeholder: &str) -> Vec<String> {
    if bullets.is_empty() {
        vec![placeholder.to_string()]
    } else {
        bullets
    }
}

/// Produce exactly `max_content_slides(target_slides)` slides.
pub fn allocate(input: AllocationInput<'_>) -> Vec<Slide> {
    let AllocationInput {
        outline,
        sections,
        mut queue,
        author_bullets,
        sentences,
        target_slides,
    } = input;

    let max_content = max_content_slides(target_slides);
    let core_slots = max_content.saturating_sub(1).max(1);
    let mut slides: Vec<Slide> = Vec::with_capacity(max_content);

    // ── Front matter ─────────────────────────────────────────────────────
    if !author_bullets.is_empty() {
        slides.push(Slide::bullets(
            "authors-slide",
            "Authors & Affiliations",
            Some(OVERVIEW_SECTION.to_string()),
            author_bullets,
        ));
    }
    if !sections.keyword_bullets.is_empty() {
        slides.push(Slide::bullets(
            "keywords-slide",
            "Keywords",
            Some(OVERVIEW_SECTION.to_string()),
            sections.keyword_bullets.clone(),
        ));
    }
    if !sections.abstract_bullets.is_empty() {
        let items: Vec<String> = sections
            .abstract_bullets
            .iter()
            .take(BULLETS_PER_SLIDE)
            .cloned()
            .collect();
        for item in &items {
            queue.remove_like(item);
        }
        slides.push(Slide::bullets(
            "abstract-slide",
            "Abstract",
            Some(OVERVIEW_SECTION.to_string()),
            items,
        ));
    }
    slides.truncate(core_slots);

    // ── One slide per outline section ────────────────────────────────────
    let remaining = core_slots - slides.len();
    let fallback: Vec<String>;
    let headings: &[String] = if outline.is_empty() {
        fallback = FALLBACK_OUTLINE.iter().map(|s| s.to_string()).collect();
        &fallback
    } else {
        outline
    };

    for (i, heading) in headings.iter().take(remaining).enumerate() {
        let bullets: Vec<String> = match sections.sentences_for(heading) {
            Some(pooled) if !pooled.is_empty() => {
                let picked: Vec<String> = pooled.iter().take(BULLETS_PER_SLIDE).cloned().collect();
                for item in &picked {
                    queue.remove_like(item);
                }
                picked
            }
            _ => queue
                .take_for_heading(heading, BULLETS_PER_SLIDE)
                .iter()
                .map(|s| truncate(s, DEFAULT_MAX_LEN))
                .collect(),
        };
        slides.push(Slide::bullets(
            format!("section-{}", i + 1),
            heading.clone(),
            Some(heading.clone()),
            with_placeholder(bullets, EMPTY_SECTION_BULLET),
        ));
    }

    // ── Backfill ─────────────────────────────────────────────────────────
    let mut filler = 0;
    while slides.len() < core_slots && !queue.is_empty() {
        filler += 1;
        let bullets = queue
            .take_front(BULLETS_PER_SLIDE)
            .iter()
            .map(|s| truncate(s, DEFAULT_MAX_LEN))
            .collect();
        slides.push(Slide::bullets(
            format!("filler-{filler}"),
            "Additional Insights",
            Some(FILLER_SECTION.to_string()),
            bullets,
        ));
    }

    let mut placeholder = 0;
    while slides.len() < core_slots {
        placeholder += 1;
        slides.push(Slide::bullets(
            format!("placeholder-{placeholder}"),
            "To Be Completed",
            None,
            vec![MANUAL_CONTENT_BULLET.to_string()],
        ));
    }

    slides.push(closing_slide(sentences));
    slides.truncate(max_content);

    debug!(
        "Allocated {} slides ({} filler, {} placeholder, {} sentences left)",
        slides.len(),
        filler,
        placeholder,
        queue.len()
    );
    slides
}

/// "Takeaways & Next Steps": first, middle and last meaningful sentence,
/// or fixed prompts when the paper has fewer than two.
pub fn closing_slide(sentences: &[String]) -> Slide {
    let meaningful: Vec<&String> = sentences
        .iter()
        .filter(|s| char_len(s) > MIN_MEANINGFUL_LEN)
        .collect();

    let bullets = if meaningful.len() < 2 {
        CLOSING_FALLBACK.iter().map(|s| s.to_string()).collect()
    } else {
        let picks = [
            meaningful[0],
            meaningful[meaningful.len() / 2],
            meaningful[meaningful.len() - 1],
        ];
        dedupe_case_insensitive(picks.iter().map(|s| truncate(s, CLOSING_MAX_LEN)))
    };

    Slide::bullets(
        "closing-slide",
        "Takeaways & Next Steps",
        Some("Conclusion".to_string()),
        bullets,
    )
}

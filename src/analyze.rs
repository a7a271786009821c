//! Entry points: analyse a document, generate a deck, read and write files.
//!
//! [`analyze`] is the pure heuristic engine. [`generate`] wraps it with the
//! optional LLM pass and figure placement. The file helpers are thin
//! `tokio::fs` wrappers that map I/O failures onto [`DeckError`].

use crate::client::{client_for, ChatCompletionClient};
use crate::config::DeckConfig;
use crate::document::ExtractedDocument;
use crate::error::DeckError;
use crate::output::{AnalysisResult, Deck, DeckMetadata, DeckMode, FIXED_FRAMES};
use crate::pipeline::allocate::{allocate, AllocationInput, SentenceQueue};
use crate::pipeline::figures::FigureDescriptor;
use crate::pipeline::headings::detect_headings;
use crate::pipeline::llm::augment;
use crate::pipeline::merge::fallback;
use crate::pipeline::metadata::{author_bullets, derive_authors, derive_subtitle, derive_title};
use crate::pipeline::normalize::split_sentences;
use crate::pipeline::outline::build_outline;
use crate::pipeline::sections::collect_sections;
use chrono::{SecondsFormat, Utc};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Run the heuristic engine.
///
/// Never fails: an empty document still yields a full budget of
/// placeholder slides, the fallback outline and the fallback title.
pub fn analyze(doc: &ExtractedDocument, target_slides: u32) -> AnalysisResult {
    let start = Instant::now();
    let target = target_slides as usize;
    if doc.is_empty() {
        warn!("Document has no text; the deck falls back to placeholder content");
    }

    let headings = detect_headings(doc.lines());
    let outline = build_outline(&headings);
    let sections = collect_sections(doc, &headings);

    let first_page = doc.first_page();
    let info = &doc.metadata;
    let paper_title = derive_title(first_page, info.title.as_deref());
    let paper_subtitle = derive_subtitle(first_page, info.subject.as_deref());
    let authors = derive_authors(first_page, info.author.as_deref());
    let author_lines = author_bullets(first_page, info.author.as_deref(), &paper_title);

    let sentences = split_sentences(&doc.full_text);
    let slides = allocate(AllocationInput {
        outline: &outline,
        sections: &sections,
        queue: SentenceQueue::from_sentences(&sentences),
        author_bullets: author_lines,
        sentences: &sentences,
        target_slides: target,
    });

    info!(
        "Analysis: {} headings, {} outline entries, {} slides in {:?}",
        headings.len(),
        outline.len(),
        slides.len(),
        start.elapsed()
    );

    AnalysisResult {
        metadata: DeckMetadata {
            paper_title,
            paper_subtitle,
            authors,
            generated_at: now_rfc3339(),
            mode: DeckMode::Static,
            slide_count: slides.len() + FIXED_FRAMES,
        },
        outline,
        slides,
        sentences,
    }
}

/// Analyse `doc`, optionally refine with the LLM, then place figures.
///
/// # Errors
/// Only when LLM mode is selected and no client can be built from the
/// settings. A failing LLM call is not an error; the heuristic deck is
/// returned instead.
pub async fn generate(doc: &ExtractedDocument, config: &DeckConfig) -> Result<Deck, DeckError> {
    info!(
        "Generating {} deck ({} slides requested)",
        config.mode, config.target_slides
    );
    let baseline = analyze(doc, config.target_slides);

    let mut deck = match config.mode {
        DeckMode::Static => fallback(&baseline),
        DeckMode::Llm => {
            let client: Arc<dyn ChatCompletionClient> = match &config.client {
                Some(client) => Arc::clone(client),
                None => client_for(&config.llm)?,
            };
            augment(
                &baseline,
                client.as_ref(),
                config.target_slides as usize,
                config.llm.prompt.as_deref(),
            )
            .await
        }
    };

    deck.apply_figures(&config.figures);
    deck.metadata.generated_at = now_rfc3339();
    info!(
        "Deck ready: {} content slides, mode {}",
        deck.slides.len(),
        deck.metadata.mode
    );
    Ok(deck)
}

/// Synchronous wrapper around [`generate`].
///
/// Creates a temporary tokio runtime internally; do not call from async code.
pub fn generate_sync(doc: &ExtractedDocument, config: &DeckConfig) -> Result<Deck, DeckError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| DeckError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(generate(doc, config))
}

async fn read_input(path: &Path) -> Result<String, DeckError> {
    tokio::fs::read_to_string(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            DeckError::DocumentNotFound {
                path: path.to_path_buf(),
            }
        } else {
            DeckError::ReadFailed {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })
}

/// Read an extracted document from its JSON file.
pub async fn load_document(path: impl AsRef<Path>) -> Result<ExtractedDocument, DeckError> {
    let path = path.as_ref();
    let text = read_input(path).await?;
    ExtractedDocument::from_json_str(&text).map_err(|e| DeckError::InvalidDocument {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })
}

/// Read a JSON array of figure descriptors.
pub async fn load_figures(path: impl AsRef<Path>) -> Result<Vec<FigureDescriptor>, DeckError> {
    let path = path.as_ref();
    let text = read_input(path).await?;
    serde_json::from_str(&text).map_err(|e| DeckError::InvalidFigures {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })
}

/// Write `deck` as pretty JSON, atomically (temp file then rename).
pub async fn write_deck(deck: &Deck, path: impl AsRef<Path>) -> Result<(), DeckError> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(deck)
        .map_err(|e| DeckError::Internal(format!("failed to serialise deck: {e}")))?;
    let write_err = |source| DeckError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
    }
    let tmp_path = path.with_extension("json.tmp");
    tokio::fs::write(&tmp_path, json).await.map_err(write_err)?;
    tokio::fs::rename(&tmp_path, path).await.map_err(write_err)?;
    debug!("Wrote deck to {}", path.display());
    Ok(())
}

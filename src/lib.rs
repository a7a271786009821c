//! # paper2deck
//!
//! Turn the extracted text of a research paper into a slide deck.
//!
//! The crate sits between a PDF text extractor and a slide renderer. It takes
//! pages of text lines, finds the paper's structure with regex and layout
//! heuristics, and fills a fixed slide budget: front matter, one slide per
//! outline section, filler and placeholder slides, and a closing slide.
//! Optionally a language model refines the result; if that call fails in any
//! way the heuristic deck is returned unchanged.
//!
//! ## Pipeline Overview
//!
//! ```text
//! ExtractedDocument
//!  │
//!  ├─ 1. Headings   numbered / keyword / title-case lines
//!  ├─ 2. Sections   fold lines into per-heading pools
//!  ├─ 3. Metadata   title, venue, authors from page one
//!  ├─ 4. Outline    ≤ 8 entries, fallback splice when short
//!  ├─ 5. Allocate   exactly clamp(T − 2, 3, 15) slides
//!  ├─ 6. LLM        optional refinement with full fallback
//!  └─ 7. Figures    image slides by id
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use paper2deck::{analyze, ExtractedDocument};
//!
//! let doc = ExtractedDocument::from_pages(vec![vec![
//!     "Sparse Attention For Long Documents",
//!     "Abstract",
//!     "We study attention patterns that scale linearly with input length.",
//! ]]);
//! let result = analyze(&doc, 8);
//! assert_eq!(result.slides.len(), 6);
//! assert_eq!(result.metadata.slide_count, 8);
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `paper2deck` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! paper2deck = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod analyze;
pub mod client;
pub mod config;
pub mod document;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod prompts;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use analyze::{analyze, generate, generate_sync, load_document, load_figures, write_deck};
pub use client::{
    client_for, AnthropicClient, AzureOpenAiClient, ChatCompletionClient, OpenAiCompatibleClient,
};
pub use config::{parse_target_slides, DeckConfig, DeckConfigBuilder, LlmSettings, ProviderKind};
pub use document::{DocumentInfo, ExtractedDocument};
pub use error::{DeckError, LlmError};
pub use output::{AnalysisResult, Deck, DeckMetadata, DeckMode, Slide, SlideBlock};
pub use pipeline::figures::FigureDescriptor;

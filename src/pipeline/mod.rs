//! Analysis stages, one transformation per module.
//!
//! ## Data Flow
//!
//! ```text
//! lines ──▶ headings ──▶ outline ─────────────┐
//!   │          │                              ▼
//!   │          └──▶ sections ──▶ pools ──▶ allocate ──▶ slides ──▶ merge (llm mode)
//!   │                                         ▲
//!   └──▶ metadata (title, venue, authors) ────┘
//! ```
//!
//! 1. [`normalize`] — whitespace, casing, sentence splitting, truncation
//! 2. [`headings`]  — heading candidates from numbering, keywords, title case
//! 3. [`sections`]  — linear fold attributing text to the heading above it
//! 4. [`metadata`]  — title, subtitle and author lines from the first page
//! 5. [`outline`]   — bounded outline, spliced into a fallback when short
//! 6. [`allocate`]  — fills the slide budget; the only stage with a queue
//! 7. [`figures`]   — places figure images by slide id
//! 8. [`merge`] / [`llm`] — overlay of an LLM payload, with full fallback
//!
//! Every stage except [`llm`] is synchronous and pure.

pub mod allocate;
pub mod figures;
pub mod headings;
pub mod llm;
pub mod merge;
pub mod metadata;
pub mod normalize;
pub mod outline;
pub mod sections;

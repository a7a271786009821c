//! Section association: attribute free text to the heading above it.
//!
//! One linear pass over every line, written as a fold over
//! `(cursor, pools)`. The cursor is the section currently "open"; heading
//! lines move it and are never stored, every other line lands in the pool of
//! the open section. Lines seen before any section opens are dropped.
//!
//! Heading lines are recognised by key: exact match first, then a prefix
//! match in either direction. The prefix rule can attribute text to the
//! wrong section when two headings share a prefix ("Results" vs "Results and
//! Discussion") or when a short body line happens to prefix a heading key.

use super::headings::Heading;
use super::normalize::{
    char_len, dedupe_case_insensitive, normalize, section_key, split_sentences, truncate,
};
use crate::document::ExtractedDocument;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Display cap for pooled section sentences.
pub const SECTION_SENTENCE_MAX_LEN: usize = 150;
/// Sentences kept per section pool (and for the abstract).
pub const MAX_POOL_SENTENCES: usize = 5;
/// Keyword bullets kept.
pub const MAX_KEYWORDS: usize = 6;

const MIN_POOL_SENTENCE_LEN: usize = 20;

static RE_KEYWORD_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^keywords?\s*[:\-–—]?\s*(.*)$").unwrap());

static RE_KEYWORD_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[,;•·▪◦]").unwrap());

/// Which section the scan is currently inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    Abstract,
    Keywords,
    Heading(usize),
}

/// Raw lines gathered per section during the scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionPools {
    pub abstract_lines: Vec<String>,
    pub keyword_lines: Vec<String>,
    /// Indexed like the heading slice passed to [`associate`].
    pub heading_lines: Vec<Vec<String>>,
}

impl SectionPools {
    fn with_headings(count: usize) -> Self {
        Self {
            heading_lines: vec![Vec::new(); count],
            ..Self::default()
        }
    }

    fn push(&mut self, cursor: Cursor, line: &str) {
        let pool = match cursor {
            Cursor::Abstract => &mut self.abstract_lines,
            Cursor::Keywords => &mut self.keyword_lines,
            Cursor::Heading(idx) => &mut self.heading_lines[idx],
        };
        pool.push(line.to_string());
    }
}

/// Index of the heading `key` refers to, if any.
fn match_heading(key: &str, headings: &[Heading]) -> Option<usize> {
    if key.is_empty() {
        return None;
    }
    headings.iter().position(|h| h.key() == key).or_else(|| {
        headings.iter().position(|h| {
            !h.key().is_empty() && (key.starts_with(h.key()) || h.key().starts_with(key))
        })
    })
}

fn step(
    cursor: Option<Cursor>,
    pools: &mut SectionPools,
    raw: &str,
    headings: &[Heading],
) -> Option<Cursor> {
    let line = normalize(raw);
    if line.is_empty() {
        return cursor;
    }
    let key = section_key(&line);
    if key == "abstract" {
        return Some(Cursor::Abstract);
    }
    if key == "keywords" {
        return Some(Cursor::Keywords);
    }
    if let Some(idx) = match_heading(&key, headings) {
        return Some(Cursor::Heading(idx));
    }
    if let Some(open) = cursor {
        pools.push(open, raw);
    }
    cursor
}

/// Fold `lines` into per-section pools.
pub fn associate<'a, I>(lines: I, headings: &[Heading]) -> SectionPools
where
    I: IntoIterator<Item = &'a str>,
{
    let initial = (None, SectionPools::with_headings(headings.len()));
    let (_, pools) = lines
        .into_iter()
        .fold(initial, |(cursor, mut pools), raw| {
            let next = step(cursor, &mut pools, raw, headings);
            (next, pools)
        });
    pools
}

/// Sentences for one pool: deduped, capped at 150 chars, longer than 20,
/// at most `cap` of them.
pub fn pool_sentences(lines: &[String], cap: usize) -> Vec<String> {
    let joined = lines.join(" ");
    dedupe_case_insensitive(split_sentences(&joined))
        .into_iter()
        .map(|s| truncate(&s, SECTION_SENTENCE_MAX_LEN))
        .filter(|s| char_len(s) > MIN_POOL_SENTENCE_LEN)
        .take(cap)
        .collect()
}

/// Split a keyword source on commas, semicolons and bullet glyphs.
pub fn split_keywords(source: &str) -> Vec<String> {
    let tokens = RE_KEYWORD_SPLIT
        .split(source)
        .map(|t| normalize(t).trim_end_matches('.').trim().to_string())
        .filter(|t| {
            let len = char_len(t);
            len > 2 && len <= 60
        });
    dedupe_case_insensitive(tokens)
        .into_iter()
        .take(MAX_KEYWORDS)
        .collect()
}

/// First-page line of the form `Keywords: a, b, c`, captured remainder.
fn inline_keyword_line(first_page: &[String]) -> Option<String> {
    first_page.iter().find_map(|line| {
        let line = normalize(line);
        RE_KEYWORD_LINE
            .captures(&line)
            .map(|caps| caps[1].trim().to_string())
            .filter(|rest| !rest.is_empty())
    })
}

/// Per-section content ready for slide allocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionContent {
    /// `(heading, sentences)` in heading order; sections with no sentences
    /// are omitted.
    pub sections: Vec<(String, Vec<String>)>,
    pub abstract_bullets: Vec<String>,
    pub keyword_bullets: Vec<String>,
}

impl SectionContent {
    /// Pooled sentences for an outline entry, matched by section key.
    pub fn sentences_for(&self, heading: &str) -> Option<&[String]> {
        let key = section_key(heading);
        self.sections
            .iter()
            .find(|(name, _)| section_key(name) == key)
            .map(|(_, sentences)| sentences.as_slice())
    }
}

/// Run the association pass over `doc` and turn the pools into bullets.
pub fn collect_sections(doc: &ExtractedDocument, headings: &[Heading]) -> SectionContent {
    let pools = associate(doc.lines(), headings);

    let sections: Vec<(String, Vec<String>)> = headings
        .iter()
        .zip(&pools.heading_lines)
        .map(|(h, lines)| (h.as_str().to_string(), pool_sentences(lines, MAX_POOL_SENTENCES)))
        .filter(|(_, sentences)| !sentences.is_empty())
        .collect();

    let abstract_bullets = pool_sentences(&pools.abstract_lines, MAX_POOL_SENTENCES);

    let keyword_source = if pools.keyword_lines.iter().any(|l| !l.trim().is_empty()) {
        Some(pools.keyword_lines.join(" "))
    } else {
        inline_keyword_line(doc.first_page()).or_else(|| doc.metadata.keywords.clone())
    };
    let keyword_bullets = keyword_source
        .as_deref()
        .map(split_keywords)
        .unwrap_or_default();

    debug!(
        "Section pools: {} populated sections, {} abstract sentences, {} keywords",
        sections.len(),
        abstract_bullets.len(),
        keyword_bullets.len()
    );

    SectionContent {
        sections,
        abstract_bullets,
        keyword_bullets,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentInfo;
    use crate::pipeline::headings::detect_headings;

    fn doc(pages: Vec<Vec<&str>>) -> ExtractedDocument {
        ExtractedDocument::from_pages(pages)
    }

    #[test]
    fn lines_before_first_heading_are_dropped() {
        let headings = detect_headings(["2 Proposed Method Overview"]);
        let pools = associate(
            ["Preamble text", "2 Proposed Method Overview", "Body line one"],
            &headings,
        );
        assert_eq!(pools.heading_lines[0], vec!["Body line one"]);
        assert!(pools.abstract_lines.is_empty());
    }

    #[test]
    fn abstract_and_keywords_are_pooled_separately() {
        let headings = detect_headings(["1 Introduction To Graphs"]);
        let pools = associate(
            [
                "ABSTRACT",
                "We study graphs.",
                "Keywords",
                "graphs, networks",
                "1 Introduction To Graphs",
                "Graphs are everywhere.",
            ],
            &headings,
        );
        assert_eq!(pools.abstract_lines, vec!["We study graphs."]);
        assert_eq!(pools.keyword_lines, vec!["graphs, networks"]);
        assert_eq!(pools.heading_lines[0], vec!["Graphs are everywhere."]);
    }

    #[test]
    fn heading_lines_match_by_prefix() {
        let headings = detect_headings(["4 Results And Discussion"]);
        // A later running header repeats only the first words.
        let pools = associate(
            ["4 Results And Discussion", "Accuracy rose.", "Results and", "More text."],
            &headings,
        );
        assert_eq!(pools.heading_lines[0], vec!["Accuracy rose.", "More text."]);
    }

    #[test]
    fn pool_sentences_filters_dedupes_and_caps() {
        let lines: Vec<String> = vec![
            "Short one. This sentence is clearly long enough to keep.".into(),
            "This sentence is clearly long enough to keep.".into(),
            "Another sufficiently long sentence for the pool. A third long sentence is also kept here."
                .into(),
        ];
        let got = pool_sentences(&lines, 2);
        assert_eq!(
            got,
            vec![
                "This sentence is clearly long enough to keep.",
                "Another sufficiently long sentence for the pool.",
            ]
        );
    }

    #[test]
    fn pool_sentences_truncate_to_150() {
        let long = format!("{}.", "word ".repeat(60).trim());
        let got = pool_sentences(&[long], 5);
        assert_eq!(got.len(), 1);
        assert!(char_len(&got[0]) <= SECTION_SENTENCE_MAX_LEN);
    }

    #[test]
    fn keywords_split_on_separators_and_filter_length() {
        let got = split_keywords("Deep learning; GNN • x, graph theory, ab, transformers.");
        assert_eq!(got, vec!["Deep learning", "GNN", "graph theory", "transformers"]);
    }

    #[test]
    fn keywords_are_capped_at_six() {
        let got = split_keywords("aaa, bbb, ccc, ddd, eee, fff, ggg, hhh");
        assert_eq!(got.len(), MAX_KEYWORDS);
    }

    #[test]
    fn keywords_fall_back_to_first_page_line() {
        let d = doc(vec![vec!["A Paper Title Here", "Keywords: alpha, beta, gamma"]]);
        let content = collect_sections(&d, &[]);
        assert_eq!(content.keyword_bullets, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn keywords_fall_back_to_document_metadata() {
        let d = doc(vec![vec!["A Paper Title Here"]]).with_metadata(DocumentInfo {
            keywords: Some("robotics, control".into()),
            ..DocumentInfo::default()
        });
        let content = collect_sections(&d, &[]);
        assert_eq!(content.keyword_bullets, vec!["robotics", "control"]);
    }

    #[test]
    fn collect_sections_builds_abstract_and_heading_bullets() {
        let d = doc(vec![
            vec![
                "Title Of The Paper",
                "Abstract",
                "We introduce a compact network for protein folding that runs quickly. It is fast.",
            ],
            vec![
                "2 Proposed Method Overview",
                "The method uses attention over residue pairs to predict contacts between distant residues.",
            ],
        ]);
        let headings = detect_headings(d.lines());
        let content = collect_sections(&d, &headings);
        assert_eq!(
            content.abstract_bullets,
            vec!["We introduce a compact network for protein folding that runs quickly."]
        );
        let method = content
            .sentences_for("Proposed Method Overview")
            .expect("method pool");
        assert_eq!(
            method,
            &["The method uses attention over residue pairs to predict contacts between distant residues."
                .to_string()]
        );
    }

    #[test]
    fn empty_document_yields_empty_content() {
        let content = collect_sections(&ExtractedDocument::default(), &[]);
        assert_eq!(content, SectionContent::default());
    }
}

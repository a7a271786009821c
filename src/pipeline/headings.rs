//! Heading detection over the raw line stream.
//!
//! A line becomes a heading candidate on any of three signals: a dotted
//! section number, a well-known section keyword, or a short title-cased line
//! without terminal punctuation. Candidates are cleaned, length-checked and
//! deduplicated; the scan stops at [`MAX_HEADINGS`].

use super::normalize::{normalize, section_key, strip_numbering, title_case, word_count};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

/// Hard cap on accepted headings; the scan terminates once reached.
pub const MAX_HEADINGS: usize = 12;

const MIN_HEADING_LEN: usize = 3;
const MAX_HEADING_LEN: usize = 70;

static RE_NUMBERED: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+(\.\d+)*\s+").unwrap());

static RE_SECTION_KEYWORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(introduction|background|related work|method|approach|model|experiment|evaluation|result|discussion|conclusion|future work|summary)",
    )
    .unwrap()
});

static RE_TRAILING_SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[:;,.\-\s]+$").unwrap());

/// A detected section title: numbering stripped, title-cased, 3–70 chars.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Heading {
    text: String,
    key: String,
}

impl Heading {
    fn new(text: String) -> Self {
        let key = section_key(&text);
        Self { text, key }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Alphanumeric lowercase key used to recognise the heading line again.
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl fmt::Display for Heading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<Heading> for String {
    fn from(h: Heading) -> Self {
        h.text
    }
}

fn is_candidate(line: &str, words: usize) -> bool {
    let numbered = RE_NUMBERED.is_match(line);
    let keyword = RE_SECTION_KEYWORD.is_match(line);
    let title_cased = words <= 8
        && !line.ends_with(['.', '!', '?'])
        && line == title_case(line);
    numbered || keyword || title_cased
}

/// Scan `lines` in order and return unique headings in first-seen order.
pub fn detect_headings<'a, I>(lines: I) -> Vec<Heading>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut headings = Vec::new();
    let mut seen = HashSet::new();

    for raw in lines {
        let line = normalize(raw);
        if line.is_empty() {
            continue;
        }
        let words = word_count(&line);
        if words <= 2 || !is_candidate(&line, words) {
            continue;
        }

        let stripped = strip_numbering(&line);
        let cleaned = RE_TRAILING_SEPARATORS.replace(stripped, "");
        let cleaned = cleaned.trim();
        let len = cleaned.chars().count();
        if !(MIN_HEADING_LEN..=MAX_HEADING_LEN).contains(&len) {
            continue;
        }
        if !seen.insert(cleaned.to_lowercase()) {
            continue;
        }

        headings.push(Heading::new(title_case(cleaned)));
        if headings.len() >= MAX_HEADINGS {
            break;
        }
    }

    debug!("Detected {} headings", headings.len());
    headings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(headings: &[Heading]) -> Vec<&str> {
        headings.iter().map(Heading::as_str).collect()
    }

    #[test]
    fn numbered_heading_is_stripped_and_title_cased() {
        let got = detect_headings(["3.2 Experimental Setup"]);
        assert_eq!(texts(&got), vec!["Experimental Setup"]);
    }

    #[test]
    fn short_lines_are_rejected() {
        let got = detect_headings(["1 Introduction", "Related Work", "Method"]);
        assert!(got.is_empty(), "got {:?}", texts(&got));
    }

    #[test]
    fn keyword_lines_qualify_even_with_sentence_case() {
        let got = detect_headings(["Results on the benchmark suite"]);
        assert_eq!(texts(&got), vec!["Results On The Benchmark Suite"]);
    }

    #[test]
    fn title_case_signal_rejects_sentences() {
        let got = detect_headings(["We Propose A Method.", "The Big Picture Here"]);
        // the first has a keyword ("method") so it counts despite the period
        assert_eq!(texts(&got), vec!["We Propose A Method", "The Big Picture Here"]);
        let got = detect_headings(["This Sentence Ends Here."]);
        assert!(got.is_empty());
    }

    #[test]
    fn plain_prose_is_not_a_heading() {
        let got = detect_headings(["this line is ordinary running text without signals"]);
        assert!(got.is_empty());
    }

    #[test]
    fn duplicates_keep_first_occurrence() {
        let got = detect_headings([
            "2 Related Work Overview",
            "related work overview",
            "4 RELATED WORK OVERVIEW:",
        ]);
        assert_eq!(texts(&got), vec!["Related Work Overview"]);
    }

    #[test]
    fn length_bounds_are_enforced() {
        let long = format!("1 Introduction {}", "word ".repeat(20));
        let got = detect_headings([long.as_str()]);
        assert!(got.is_empty());
    }

    #[test]
    fn trailing_separators_are_removed() {
        let got = detect_headings(["5 Discussion and Limitations:"]);
        assert_eq!(texts(&got), vec!["Discussion And Limitations"]);
    }

    #[test]
    fn scan_stops_at_cap() {
        let lines: Vec<String> = (1..=20).map(|i| format!("{i} Section Number {i}")).collect();
        let got = detect_headings(lines.iter().map(String::as_str));
        assert_eq!(got.len(), MAX_HEADINGS);
        assert_eq!(got[0].as_str(), "Section Number 1");
        assert_eq!(got[11].as_str(), "Section Number 12");
    }

    #[test]
    fn heading_key_is_alphanumeric() {
        let got = detect_headings(["4 Results & Analysis"]);
        assert_eq!(got[0].key(), "resultsanalysis");
    }
}

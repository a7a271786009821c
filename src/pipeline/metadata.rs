//! Title, subtitle and author derivation from the first page.
//!
//! Embedded document-info fields win when they look usable; otherwise the
//! first page's lines are scanned with small keyword heuristics.

use super::normalize::{
    char_len, dedupe_case_insensitive, normalize, section_key, truncate, word_count,
    DEFAULT_MAX_LEN,
};
use once_cell::sync::Lazy;
use regex::Regex;

/// Title used when nothing on the first page qualifies.
pub const FALLBACK_TITLE: &str = "Untitled Research Paper";

/// Author/affiliation bullets emitted for the authors slide.
pub const MAX_AUTHOR_BULLETS: usize = 6;

const MAX_NAME_BULLETS: usize = 4;

static RE_PAPER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^paper$").unwrap());

static RE_VENUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(conference|journal|symposium|workshop|university|college|laboratory|institute|department)\b",
    )
    .unwrap()
});

static RE_AUTHOR_HINT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(author|authors|by|student|advisor)\b").unwrap());

static RE_AUTHOR_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(authors?|by)\s*[:\s]\s*").unwrap());

static RE_AFFILIATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(university|universit[äéy]|college|institute|institution|laboratory|laboratories|labs?|department|dept|school|faculty|centre|center|academy|inc|corp|corporation)\b",
    )
    .unwrap()
});

static RE_NAME_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i),|;|\band\b|&").unwrap());

/// Paper title: metadata title, then each first-page line; first candidate
/// of at least 8 chars that is not just "paper".
pub fn derive_title(first_page: &[String], metadata_title: Option<&str>) -> String {
    metadata_title
        .into_iter()
        .chain(first_page.iter().map(String::as_str))
        .map(normalize)
        .find(|candidate| char_len(candidate) >= 8 && !RE_PAPER.is_match(candidate))
        .unwrap_or_else(|| FALLBACK_TITLE.to_string())
}

/// Subtitle/venue: metadata subject, else the first venue-looking line
/// among first-page lines 2–5.
pub fn derive_subtitle(first_page: &[String], metadata_subject: Option<&str>) -> Option<String> {
    if let Some(subject) = metadata_subject.map(normalize).filter(|s| !s.is_empty()) {
        return Some(subject);
    }
    first_page
        .iter()
        .skip(1)
        .take(4)
        .map(|line| normalize(line))
        .find(|line| !line.is_empty() && RE_VENUE.is_match(line))
}

/// Single author line: metadata author (≥ 4 chars), else a first-page line
/// 2–6 carrying an author keyword or a short comma/"and" list.
pub fn derive_authors(first_page: &[String], metadata_author: Option<&str>) -> Option<String> {
    if let Some(author) = metadata_author.map(normalize) {
        if char_len(&author) >= 4 {
            return Some(author);
        }
    }

    for raw in first_page.iter().skip(1).take(5) {
        let line = normalize(raw);
        if line.is_empty() {
            continue;
        }
        if RE_AUTHOR_HINT.is_match(&line) {
            return Some(RE_AUTHOR_PREFIX.replace(&line, "").trim().to_string());
        }
        if (line.contains(',') || line.contains(" and ")) && word_count(&line) <= 15 {
            return Some(line);
        }
    }
    None
}

fn looks_like_name(candidate: &str) -> bool {
    let words: Vec<&str> = candidate.split_whitespace().collect();
    if !(2..=4).contains(&words.len()) || char_len(candidate) > 40 {
        return false;
    }
    if candidate.chars().any(|c| c.is_ascii_digit()) {
        return false;
    }
    let capitalised = words
        .iter()
        .filter(|w| w.chars().next().is_some_and(char::is_uppercase))
        .count();
    // particles such as "van" or "de" may stay lowercase
    capitalised >= 2 && capitalised + 1 >= words.len()
}

fn split_names(line: &str) -> Vec<String> {
    let line = RE_AUTHOR_PREFIX.replace(line, "");
    RE_NAME_SPLIT
        .split(&line)
        .map(|part| {
            normalize(part)
                .trim_end_matches(|c: char| c.is_ascii_digit() || matches!(c, '*' | '†' | '‡' | '§'))
                .trim()
                .to_string()
        })
        .filter(|part| looks_like_name(part))
        .collect()
}

fn ends_front_matter(line: &str) -> bool {
    let key = section_key(line);
    key.starts_with("abstract") || key.starts_with("keyword") || key.starts_with("introduction")
}

/// Bullets for the authors slide, each prefixed `Author: ` or
/// `Affiliation: `, at most [`MAX_AUTHOR_BULLETS`].
///
/// Names come from the metadata author field and from short first-page lines
/// before the abstract; lines that look institutional become affiliations.
/// The scan covers first-page lines 2–13 (the title line is skipped) and
/// stops at the first abstract, keywords or introduction line.
/// Every bullet, prefix included, fits in [`DEFAULT_MAX_LEN`] chars.
pub fn author_bullets(
    first_page: &[String],
    metadata_author: Option<&str>,
    title: &str,
) -> Vec<String> {
    let mut names = Vec::new();
    let mut affiliations = Vec::new();

    if let Some(author) = metadata_author {
        names.extend(split_names(author));
    }

    for raw in first_page.iter().skip(1).take(12) {
        let line = normalize(raw);
        if line.is_empty() || line == title {
            continue;
        }
        if ends_front_matter(&line) {
            break;
        }
        if RE_AFFILIATION.is_match(&line) {
            affiliations.push(line);
            continue;
        }
        if char_len(&line) > 80 || line.contains('@') {
            continue;
        }
        names.extend(split_names(&line));
    }

    let names = dedupe_case_insensitive(names);
    let affiliations = dedupe_case_insensitive(affiliations);

    let mut bullets: Vec<String> = names
        .into_iter()
        .take(MAX_NAME_BULLETS)
        .map(|n| format!("Author: {n}"))
        .collect();
    let room = MAX_AUTHOR_BULLETS.saturating_sub(bullets.len());
    bullets.extend(
        affiliations
            .into_iter()
            .take(room)
            .map(|a| truncate(&format!("Affiliation: {a}"), DEFAULT_MAX_LEN)),
    );
    bullets
}

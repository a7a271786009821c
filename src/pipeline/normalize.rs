//! Text normalisation: whitespace, casing, sentence splitting, truncation.
//!
//! Every function here is a pure `&str → String` (or `Vec<String>`) pass with
//! no shared state, so the later stages can call them as often as they like.
//! Lengths are counted in `char`s, never bytes.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Ellipsis glyph appended by the truncation helpers.
pub const ELLIPSIS: char = '…';

/// Default display cap for a bullet sentence.
pub const DEFAULT_MAX_LEN: usize = 160;

static RE_NUMBERING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+(\.\d+)*\s+").unwrap());

/// Collapse whitespace runs to one space and trim both ends.
pub fn normalize(line: &str) -> String {
    line.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lowercase, then capitalise the first letter of each space-separated token.
pub fn title_case(input: &str) -> String {
    input
        .to_lowercase()
        .split(' ')
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whitespace-separated word count.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Length in chars.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Split running text into sentences.
///
/// A boundary sits after `.`, `!` or `?` when it is followed by whitespace
/// and then an ASCII capital or digit. Pieces are re-normalised and empty
/// pieces dropped. Re-splitting any returned sentence yields that sentence.
pub fn split_sentences(text: &str) -> Vec<String> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < chars.len() {
        let (pos, c) = chars[i];
        if matches!(c, '.' | '!' | '?') {
            let mut j = i + 1;
            while j < chars.len() && chars[j].1.is_whitespace() {
                j += 1;
            }
            let boundary = j > i + 1
                && j < chars.len()
                && (chars[j].1.is_ascii_uppercase() || chars[j].1.is_ascii_digit());
            if boundary {
                push_sentence(&mut sentences, &text[start..pos + c.len_utf8()]);
                start = chars[j].0;
                i = j;
                continue;
            }
        }
        i += 1;
    }
    push_sentence(&mut sentences, &text[start..]);
    sentences
}

fn push_sentence(out: &mut Vec<String>, raw: &str) {
    let sentence = normalize(raw);
    if !sentence.is_empty() {
        out.push(sentence);
    }
}

fn is_trailing_junk(c: char) -> bool {
    c.is_whitespace() || matches!(c, ',' | ':' | ';' | '.' | '-' | '–' | '—')
}

/// Cap `sentence` at `max_len` chars, ending in [`ELLIPSIS`] when cut.
///
/// The result is never longer than `max_len`.
pub fn truncate(sentence: &str, max_len: usize) -> String {
    if char_len(sentence) <= max_len {
        return sentence.to_string();
    }
    if max_len == 0 {
        return String::new();
    }
    let head: String = sentence.chars().take(max_len - 1).collect();
    let mut out = head.trim_end_matches(is_trailing_junk).trim().to_string();
    out.push(ELLIPSIS);
    out
}

/// Cap `text` at `max_words` words, ending in [`ELLIPSIS`] when cut.
pub fn truncate_words(text: &str, max_words: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= max_words {
        return text.trim().to_string();
    }
    let head = words[..max_words].join(" ");
    let mut out = head.trim_end_matches(is_trailing_junk).to_string();
    out.push(ELLIPSIS);
    out
}

/// Remove a leading dotted section number ("3.2 ").
pub fn strip_numbering(line: &str) -> &str {
    match RE_NUMBERING.find(line) {
        Some(m) => &line[m.end()..],
        None => line,
    }
}

/// Matching key for heading comparison: numbering stripped, alphanumerics
/// only, lowercased.
pub fn section_key(line: &str) -> String {
    strip_numbering(&normalize(line))
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Keep the first occurrence of each string, compared case-insensitively.
pub fn dedupe_case_insensitive<I>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.to_lowercase()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_whitespace() {
        assert_eq!(normalize("  a \t b\n\nc  "), "a b c");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn normalize_is_a_fixed_point() {
        let once = normalize(" Deep\u{a0} learning   works.\r\n");
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn title_case_lowercases_rest() {
        assert_eq!(title_case("experimental SETUP"), "Experimental Setup");
        assert_eq!(title_case("a  b"), "A  B");
    }

    #[test]
    fn splits_on_capital_or_digit_after_terminal() {
        let got = split_sentences("We test X. It works! 3 runs done? yes indeed.");
        assert_eq!(got, vec!["We test X.", "It works!", "3 runs done? yes indeed."]);
    }

    #[test]
    fn does_not_split_without_whitespace() {
        assert_eq!(split_sentences("e.g.The value"), vec!["e.g.The value"]);
    }

    #[test]
    fn split_handles_carriage_returns_and_empty_input() {
        assert_eq!(split_sentences("One.\r\nTwo."), vec!["One.", "Two."]);
        assert!(split_sentences("  \n ").is_empty());
    }

    #[test]
    fn resplitting_a_sentence_is_stable() {
        for s in split_sentences("Alpha beta. Gamma delta? 42 is the answer. end") {
            assert_eq!(split_sentences(&s), vec![s.clone()]);
        }
    }

    #[test]
    fn truncate_leaves_short_text_alone() {
        assert_eq!(truncate("short", 160), "short");
    }

    #[test]
    fn truncate_long_sentence_ends_with_ellipsis() {
        let s = "In this work, we present a novel method for X that achieves state-of-the-art \
                 results on Y, exceeding prior baselines by a wide margin of nearly twenty \
                 percent.";
        let long = format!("{s} {s}");
        let out = truncate(&long, 160);
        assert!(out.ends_with(ELLIPSIS));
        assert!(char_len(&out) <= 160, "len {}", char_len(&out));
    }

    #[test]
    fn truncate_strips_trailing_separators_before_ellipsis() {
        assert_eq!(truncate("abc, - defgh", 7), "abc…");
    }

    #[test]
    fn truncate_counts_chars_not_bytes() {
        let s = "é".repeat(30);
        let out = truncate(&s, 10);
        assert_eq!(char_len(&out), 10);
    }

    #[test]
    fn truncate_words_caps_word_count() {
        let out = truncate_words("one two three four", 2);
        assert_eq!(out, "one two…");
        assert_eq!(truncate_words(" one two ", 5), "one two");
    }

    #[test]
    fn section_key_strips_numbers_and_punctuation() {
        assert_eq!(section_key("3.2 Experimental Setup:"), "experimentalsetup");
        assert_eq!(section_key("ABSTRACT"), "abstract");
        assert_eq!(section_key("Key-words"), "keywords");
    }

    #[test]
    fn dedupe_ignores_case() {
        let got = dedupe_case_insensitive(vec!["A b".to_string(), "a B".into(), "c".into()]);
        assert_eq!(got, vec!["A b", "c"]);
    }
}

//! Outline construction from detected headings.

use super::headings::Heading;

/// Outline used when the paper yields fewer than three headings.
pub const FALLBACK_OUTLINE: [&str; 4] = [
    "Motivation & Problem Statement",
    "Core Methodology",
    "Key Findings",
    "Implications & Future Work",
];

/// Upper bound on outline entries.
pub const MAX_OUTLINE: usize = 8;

/// Cap applied after splicing headings into the fallback outline.
const MAX_SPLICED_OUTLINE: usize = 6;

/// Build the deck outline.
///
/// With three or more headings the first eight are used as-is. Otherwise
/// the headings are spliced into the fallback outline right after its first
/// entry, keeping their detection order, and the result is capped at six.
/// Never empty.
pub fn build_outline(headings: &[Heading]) -> Vec<String> {
    if headings.len() >= 3 {
        return headings
            .iter()
            .take(MAX_OUTLINE)
            .map(|h| h.as_str().to_string())
            .collect();
    }

    let mut outline: Vec<String> = FALLBACK_OUTLINE.iter().map(|s| s.to_string()).collect();
    for heading in headings.iter().rev() {
        if outline.len() >= MAX_OUTLINE {
            break;
        }
        outline.insert(1, heading.as_str().to_string());
    }
    outline.truncate(MAX_SPLICED_OUTLINE);
    outline
}

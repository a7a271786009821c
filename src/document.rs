//! The extracted-document contract consumed by the analysis engine.
//!
//! PDF parsing happens elsewhere. The extractor hands over pages of text
//! lines, the flattened text, and whatever document-info fields the PDF
//! carried. Everything here is read-only once built.

use crate::pipeline::normalize::normalize;
use serde::{Deserialize, Serialize};

/// Text of a paper as produced by the external PDF extractor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedDocument {
    /// Ordered pages, each an ordered list of text lines.
    #[serde(default, alias = "pageLines")]
    pub pages: Vec<Vec<String>>,

    /// All lines flattened into one string.
    #[serde(default, alias = "allText")]
    pub full_text: String,

    /// Embedded document-info dictionary.
    #[serde(default)]
    pub metadata: DocumentInfo,
}

/// Embedded PDF document-info fields. Absent or blank fields are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
}

impl DocumentInfo {
    /// Collapse whitespace in every field and drop the ones left empty.
    pub fn normalized(self) -> Self {
        fn clean(value: Option<String>) -> Option<String> {
            value.map(|v| normalize(&v)).filter(|v| !v.is_empty())
        }
        Self {
            title: clean(self.title),
            author: clean(self.author),
            subject: clean(self.subject),
            keywords: clean(self.keywords),
        }
    }
}

impl ExtractedDocument {
    /// Build a document from page lines, deriving the flattened text the way
    /// the extractor does (every line joined with `\n`).
    pub fn from_pages<P, L>(pages: P) -> Self
    where
        P: IntoIterator<Item = L>,
        L: IntoIterator,
        L::Item: Into<String>,
    {
        let pages: Vec<Vec<String>> = pages
            .into_iter()
            .map(|page| page.into_iter().map(Into::into).collect())
            .collect();
        let full_text = pages
            .iter()
            .flatten()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n");
        Self {
            pages,
            full_text,
            metadata: DocumentInfo::default(),
        }
    }

    /// Attach document-info metadata (normalised).
    pub fn with_metadata(mut self, metadata: DocumentInfo) -> Self {
        self.metadata = metadata.normalized();
        self
    }

    /// Parse the extractor's JSON form.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let mut doc: Self = serde_json::from_str(json)?;
        doc.metadata = doc.metadata.normalized();
        if doc.full_text.is_empty() && !doc.pages.is_empty() {
            doc.full_text = doc
                .pages
                .iter()
                .flatten()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join("\n");
        }
        Ok(doc)
    }

    /// Lines of the first page, or an empty slice.
    pub fn first_page(&self) -> &[String] {
        self.pages.first().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every line of every page, in reading order.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().flatten().map(String::as_str)
    }

    /// True when there is no text to analyse at all.
    pub fn is_empty(&self) -> bool {
        self.full_text.trim().is_empty() && self.lines().all(|l| l.trim().is_empty())
    }
}

//! Search-result record model.

use serde::{Deserialize, Serialize};

/// One search hit, as parsed from the results page and later annotated by
/// enrichment.
///
/// Every field is best effort: an empty string, a zero count or a `None` all
/// mean "unknown" and must never be treated as a fault downstream. The
/// serialized form keeps every key, in declaration order, so consumers see a
/// stable schema even for sparse records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScholarRecord {
    /// Article title
    pub title: String,

    /// Landing page URL
    pub link: String,

    /// Raw, unparsed author names from the byline
    pub authors: String,

    /// Four-digit publication year, or empty
    pub year: String,

    /// Raw venue text: everything after the first hyphen of the byline
    pub publication: String,

    /// Snippet abstract from the results page
    pub r#abstract: String,

    /// Citation count, 0 when unknown
    pub citations: u32,

    /// Absolute "related articles" URL
    pub related_url: String,

    /// Direct PDF badge link
    pub pdf_url: String,

    /// Best-effort abstract recovered during enrichment
    pub enriched_abstract: Option<String>,

    /// Best-effort methods section recovered during enrichment
    pub methods_section: Option<String>,
}

impl ScholarRecord {
    /// Whether the results page offered a PDF badge link
    pub fn has_pdf(&self) -> bool {
        !self.pdf_url.is_empty()
    }

    /// Whether enrichment recovered anything beyond the snippet
    pub fn is_enriched(&self) -> bool {
        self.enriched_abstract.is_some() || self.methods_section.is_some()
    }
}

/// The outcome of one enrichment pass over a single record
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Enrichment {
    /// Abstract text, from the first source in the fallback chain that had one
    pub abstract_text: Option<String>,

    /// Located methods section, PDF text preferred over landing-page text
    pub methods: Option<String>,
}

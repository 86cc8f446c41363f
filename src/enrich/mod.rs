//! Per-record enrichment: PDF first, landing page second, first source wins.
//!
//! For every search hit the pipeline tries to fill in an abstract and a
//! methods section. The PDF path runs first; the landing page covers
//! whatever the PDF path could not. A
//! field that already has a value is never overwritten, so the priority
//! order is fixed and auditable: snippet abstract, then PDF-text abstract,
//! then page metadata/selectors, then first paragraph; for methods, PDF text
//! over landing-page text.
//!
//! Everything here degrades instead of failing: a dead link, a bogus PDF or
//! an unparseable page just means that step contributes nothing.

mod section;
mod sniff;

pub use section::{LocatedSection, SectionLocator, SectionPatterns};
pub use sniff::sniff_abstract;

use regex::{Regex, RegexBuilder};
use scraper::Html;
use tokio::time::sleep;

use crate::config::{DownloadConfig, EnrichConfig};
use crate::models::{Enrichment, ScholarRecord};
use crate::utils::{download_pdf, extract_text, HttpClient};

/// Drives the fallback chain over parsed search records
#[derive(Debug)]
pub struct Enricher {
    client: HttpClient,
    section: SectionLocator,
    abstract_word: Regex,
    heading_line: Regex,
    config: EnrichConfig,
    downloads: DownloadConfig,
}

impl Enricher {
    /// Build an enricher; fails only when configured section patterns are
    /// malformed regexes
    pub fn new(
        client: HttpClient,
        config: EnrichConfig,
        downloads: DownloadConfig,
    ) -> Result<Self, regex::Error> {
        if config.max_concurrency > 1 {
            tracing::warn!(
                "max_concurrency = {} is not supported yet; enriching sequentially",
                config.max_concurrency
            );
        }

        Ok(Self {
            client,
            section: SectionLocator::new(&config.section)?,
            abstract_word: RegexBuilder::new(r"\babstract\b")
                .case_insensitive(true)
                .build()?,
            // a single capitalized word on its own line reads as the next
            // heading and ends the abstract candidate
            heading_line: Regex::new(r"\n\s*[A-Z][a-z]{2,}\s*\n")?,
            config,
            downloads,
        })
    }

    /// Enrich every record in place, strictly one at a time, pausing for the
    /// courtesy delay between records
    pub async fn enrich_all(&self, records: &mut [ScholarRecord]) {
        let total = records.len();
        for (index, record) in records.iter_mut().enumerate() {
            tracing::info!("Enriching {}/{}: {}", index + 1, total, record.title);
            let enrichment = self.enrich(record).await;
            record.enriched_abstract = enrichment.abstract_text;
            record.methods_section = enrichment.methods;
            if index + 1 < total {
                sleep(self.config.courtesy_delay()).await;
            }
        }
    }

    /// One full fallback pass over a single record.
    ///
    /// Never fails: a failed step is logged and contributes nothing, and the
    /// caller only ever observes missing fields.
    pub async fn enrich(&self, record: &ScholarRecord) -> Enrichment {
        let mut abstract_text = non_empty(record.r#abstract.trim());
        let mut methods = None;

        if record.has_pdf() {
            if let Some(path) = download_pdf(&self.client, &record.pdf_url, &self.downloads).await
            {
                let text = extract_text(&path);
                if text.is_empty() {
                    tracing::debug!("No text extracted from {}", path.display());
                } else {
                    if abstract_text.is_none() {
                        abstract_text = self.pdf_abstract(&text);
                    }
                    if let Some(section) = self.section.locate(&text) {
                        tracing::debug!("Found \"{}\" section in PDF text", section.heading);
                        methods = Some(section.text);
                    }
                }
            }
        }

        if (abstract_text.is_none() || methods.is_none()) && !record.link.is_empty() {
            if let Some(html) = self.fetch_page(&record.link).await {
                let document = Html::parse_document(&html);
                if abstract_text.is_none() {
                    abstract_text = sniff_abstract(&document);
                }
                if methods.is_none() {
                    let page_text = flatten_text(&document);
                    if let Some(section) = self.section.locate(&page_text) {
                        tracing::debug!(
                            "Found \"{}\" section in landing page",
                            section.heading
                        );
                        methods = Some(section.text);
                    }
                }
            }
        }

        Enrichment {
            abstract_text,
            methods,
        }
    }

    /// Pull an abstract straight out of PDF text: find the word "abstract"
    /// near the top, take the run after it, and cut at the first line that
    /// looks like the next heading
    fn pdf_abstract(&self, text: &str) -> Option<String> {
        let head_end = section::char_offset(text, self.config.abstract_scan_chars);
        let found = self.abstract_word.find(&text[..head_end])?;

        let start = found.end();
        let end = section::char_offset(&text[start..], self.config.abstract_take_chars) + start;
        let candidate = text[start..end].trim();
        let candidate = match self.heading_line.find(candidate) {
            Some(m) => candidate[..m.start()].trim(),
            None => candidate,
        };

        non_empty(candidate)
    }

    async fn fetch_page(&self, url: &str) -> Option<String> {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!("Landing page request failed for {}: {}", url, e);
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::debug!("Landing page {} returned {}", url, response.status());
            return None;
        }

        match response.text().await {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::debug!("Failed to read landing page {}: {}", url, e);
                None
            }
        }
    }
}

/// Flatten a document to plain text with newline separators, so that the
/// newline-anchored section end markers can match
fn flatten_text(document: &Html) -> String {
    document
        .root_element()
        .text()
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn non_empty(text: &str) -> Option<String> {
    (!text.is_empty()).then(|| text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enricher() -> Enricher {
        Enricher::new(
            HttpClient::default(),
            EnrichConfig::default(),
            DownloadConfig::default(),
        )
        .unwrap()
    }

    const PDF_TEXT: &str = "Some Journal Header\nABSTRACT\nThis paper shows Y.\nIntroduction\nLots of context.\nMethods\nWe used Z.\nResults\nIt worked.\nReferences\n[1] ...";

    #[test]
    fn test_pdf_abstract_cut_at_heading_line() {
        let abstract_text = enricher().pdf_abstract(PDF_TEXT).unwrap();
        assert_eq!(abstract_text, "This paper shows Y.");
    }

    #[test]
    fn test_pdf_abstract_without_heading_runs_to_window() {
        let text = "ABSTRACT\nA short note about nothing in particular.";
        let abstract_text = enricher().pdf_abstract(text).unwrap();
        assert_eq!(
            abstract_text,
            "A short note about nothing in particular."
        );
    }

    #[test]
    fn test_pdf_abstract_missing_word() {
        assert!(enricher().pdf_abstract("No such marker anywhere.").is_none());
    }

    #[test]
    fn test_pdf_abstract_respects_scan_window() {
        let padding = "x".repeat(5000);
        let text = format!("{}\nAbstract\nToo deep to find.", padding);
        assert!(enricher().pdf_abstract(&text).is_none());
    }

    #[test]
    fn test_methods_from_pdf_text() {
        let section = enricher().section.locate(PDF_TEXT).unwrap();
        assert_eq!(section.text, "Methods\nWe used Z.");
    }

    #[test]
    fn test_flatten_text_inserts_newlines() {
        let document = Html::parse_document(
            "<html><body><p>Methods</p><p>We measured things.</p><p>Results</p></body></html>",
        );
        assert_eq!(flatten_text(&document), "Methods\nWe measured things.\nResults");
    }

    #[tokio::test]
    async fn test_record_without_sources_stays_bare() {
        let record = ScholarRecord {
            title: "Untraceable".to_string(),
            ..Default::default()
        };
        let enrichment = enricher().enrich(&record).await;
        assert_eq!(enrichment, Enrichment::default());
    }

    #[tokio::test]
    async fn test_snippet_abstract_is_seeded() {
        let record = ScholarRecord {
            r#abstract: "From the snippet.".to_string(),
            ..Default::default()
        };
        let enrichment = enricher().enrich(&record).await;
        assert_eq!(
            enrichment.abstract_text.as_deref(),
            Some("From the snippet.")
        );
        assert!(enrichment.methods.is_none());
    }
}

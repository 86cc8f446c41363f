//! Results-page scraping for the scholar search engine.

use scraper::{ElementRef, Html, Selector};

use crate::config::SearchConfig;
use crate::models::ScholarRecord;
use crate::sources::SourceError;
use crate::utils::HttpClient;

/// Scholar search source.
///
/// There is no official API; this scrapes the public results page. The page
/// structure is undocumented and changes without notice, so every field is
/// parsed on a best-effort basis.
#[derive(Debug, Clone)]
pub struct ScholarSource {
    client: HttpClient,
    config: SearchConfig,
}

impl ScholarSource {
    pub fn new(client: HttpClient, config: SearchConfig) -> Self {
        Self { client, config }
    }

    /// Fetch one results page and parse it into records.
    ///
    /// Transport trouble (connection failure, timeout, non-2xx status) is
    /// logged and yields an empty list; a flaky network must never abort the
    /// run.
    pub async fn search(&self, query: &str, max_results: usize) -> Vec<ScholarRecord> {
        match self.fetch_results_page(query, max_results).await {
            Ok(html) => parse_results(&html, &self.config.base_url),
            Err(e) => {
                tracing::warn!("Search request failed: {}", e);
                Vec::new()
            }
        }
    }

    async fn fetch_results_page(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<String, SourceError> {
        let url = format!(
            "{}/scholar?hl=en&as_sdt=0%2C5&q={}&num={}",
            self.config.base_url.trim_end_matches('/'),
            urlencoding::encode(query),
            max_results
        );
        tracing::debug!("Requesting {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SourceError::Network(format!("search request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(SourceError::Api(format!(
                "search returned status {}",
                response.status()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| SourceError::Parse(format!("failed to read search response: {e}")))
    }
}

/// Parse a results page into records, one per result container, in document
/// order.
///
/// Each field is recovered independently; a missing sub-element leaves that
/// field empty rather than dropping the record.
pub fn parse_results(html: &str, origin: &str) -> Vec<ScholarRecord> {
    let document = Html::parse_document(html);
    let Ok(container) = Selector::parse("div.gs_r.gs_or.gs_scl") else {
        return Vec::new();
    };

    document
        .select(&container)
        .map(|entry| parse_result_entry(&entry, origin))
        .collect()
}

fn parse_result_entry(entry: &ElementRef, origin: &str) -> ScholarRecord {
    let mut record = ScholarRecord::default();

    if let Some(heading) = select_first(entry, ".gs_rt") {
        record.title = collect_text(&heading);
        record.link = select_first(&heading, "a")
            .and_then(|anchor| anchor.value().attr("href"))
            .unwrap_or_default()
            .to_string();
    }

    if let Some(byline) = select_first(entry, ".gs_a") {
        let (authors, year, publication) = parse_byline(&collect_text(&byline));
        record.authors = authors;
        record.year = year;
        record.publication = publication;
    }

    if let Some(snippet) = select_first(entry, ".gs_rs") {
        record.r#abstract = collect_text(&snippet);
    }

    if let Some(cite_link) = select_first(entry, r#".gs_fl a[href*="cites="]"#) {
        record.citations = first_numeric_token(&collect_text(&cite_link)).unwrap_or(0);
    }

    if let Some(related) = select_first(entry, r#".gs_fl a[href*="related:"]"#) {
        if let Some(href) = related.value().attr("href") {
            record.related_url = format!("{}{}", origin.trim_end_matches('/'), href);
        }
    }

    if let Some(badge) = select_first(entry, ".gs_ggs a") {
        record.pdf_url = badge
            .value()
            .attr("href")
            .unwrap_or_default()
            .to_string();
    }

    record
}

/// First element under `element` matching `selector`, or `None`; a selector
/// that fails to parse also yields `None`
fn select_first<'a>(element: &ElementRef<'a>, selector: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(selector).ok()?;
    element.select(&selector).next()
}

fn collect_text(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Split the `<authors> - <venue info>` byline.
///
/// Authors come before the first hyphen; everything after it, untouched, is
/// the publication, and the year is the first 4-digit token inside it. With
/// no hyphen at all the line is unusable and every part stays empty.
fn parse_byline(byline: &str) -> (String, String, String) {
    let mut parts = byline.splitn(2, '-');
    let (Some(authors), Some(rest)) = (parts.next(), parts.next()) else {
        return (String::new(), String::new(), String::new());
    };

    let publication = rest.trim().to_string();
    let year = publication
        .split_whitespace()
        .find(|token| token.len() == 4 && token.chars().all(|c| c.is_ascii_digit()))
        .unwrap_or_default()
        .to_string();

    (authors.trim().to_string(), year, publication)
}

/// First whitespace-delimited all-digit token, e.g. the count in "Cited by 89"
fn first_numeric_token(text: &str) -> Option<u32> {
    text.split_whitespace()
        .find(|token| token.chars().all(|c| c.is_ascii_digit()) && !token.is_empty())
        .and_then(|token| token.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESULT_PAGE: &str = r#"<html><body>
        <div class="gs_r gs_or gs_scl">
            <div class="gs_ggs"><a href="https://repo.example.org/files/deep2019.pdf">[PDF] example.org</a></div>
            <h3 class="gs_rt"><a href="https://x.org/a">Deep Learning</a></h3>
            <div class="gs_a">J. Doe - Nature 2019 - Springer</div>
            <div class="gs_rs">We study deep things.</div>
            <div class="gs_fl">
                <a href="/scholar?cites=123456">Cited by 89</a>
                <a href="/scholar?q=related:abc:scholar.google.com/">Related articles</a>
            </div>
        </div>
        <div class="gs_r gs_or gs_scl">
            <h3 class="gs_rt">Untitled manuscript</h3>
        </div>
    </body></html>"#;

    #[test]
    fn test_parse_full_container() {
        let records = parse_results(RESULT_PAGE, "https://scholar.google.com");
        assert_eq!(records.len(), 2);

        let record = &records[0];
        assert_eq!(record.title, "Deep Learning");
        assert_eq!(record.link, "https://x.org/a");
        assert_eq!(record.authors, "J. Doe");
        assert_eq!(record.year, "2019");
        assert_eq!(record.publication, "Nature 2019 - Springer");
        assert_eq!(record.r#abstract, "We study deep things.");
        assert_eq!(record.citations, 89);
        assert_eq!(
            record.related_url,
            "https://scholar.google.com/scholar?q=related:abc:scholar.google.com/"
        );
        assert_eq!(
            record.pdf_url,
            "https://repo.example.org/files/deep2019.pdf"
        );
    }

    #[test]
    fn test_sparse_container_yields_empty_fields() {
        let records = parse_results(RESULT_PAGE, "https://scholar.google.com");
        let record = &records[1];
        assert_eq!(record.title, "Untitled manuscript");
        assert_eq!(record.link, "");
        assert_eq!(record.authors, "");
        assert_eq!(record.year, "");
        assert_eq!(record.citations, 0);
        assert_eq!(record.pdf_url, "");
    }

    #[test]
    fn test_no_containers() {
        assert!(parse_results("<html><body></body></html>", "https://s.example").is_empty());
    }

    #[test]
    fn test_byline_well_formed() {
        let (authors, year, publication) = parse_byline("A, B - Journal 2020 - Publisher");
        assert_eq!(authors, "A, B");
        assert_eq!(year, "2020");
        assert_eq!(publication, "Journal 2020 - Publisher");
    }

    #[test]
    fn test_byline_without_hyphen() {
        let (authors, year, publication) = parse_byline("just some text");
        assert_eq!(authors, "");
        assert_eq!(year, "");
        assert_eq!(publication, "");
    }

    #[test]
    fn test_byline_without_year() {
        let (authors, year, publication) = parse_byline("C. Author - Some Venue");
        assert_eq!(authors, "C. Author");
        assert_eq!(year, "");
        assert_eq!(publication, "Some Venue");
    }

    #[test]
    fn test_first_numeric_token() {
        assert_eq!(first_numeric_token("Cited by 89"), Some(89));
        assert_eq!(first_numeric_token("Related articles"), None);
        assert_eq!(first_numeric_token(""), None);
    }
}

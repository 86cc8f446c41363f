//! Abstract recovery from an article landing page.

use scraper::{Html, Selector};

/// Ordered `<meta>` probes: attribute name and value, checked for a
/// non-empty `content`. These run before any structural probe.
const META_PROBES: &[(&str, &str)] = &[
    ("name", "citation_abstract"),
    ("name", "dc.Description"),
    ("name", "description"),
    ("property", "og:description"),
    ("name", "twitter:description"),
];

/// Ordered structural selectors commonly wrapping abstract blocks
const BLOCK_SELECTORS: &[&str] = &[
    "div.abstract",
    "section.abstract",
    ".article__abstract",
    "#abstract",
    ".abstractInFull",
    ".Abstract",
    ".abstractSection",
];

/// Minimum length before the first-paragraph fallback is trusted; shorter
/// paragraphs are usually navigation or cookie boilerplate
const MIN_PARAGRAPH_CHARS: usize = 80;

/// Try to recover an abstract from a landing page document.
///
/// Probes run in fixed priority order (metadata tags, then known abstract
/// containers, then the first sufficiently long paragraph) and the first
/// hit wins. Returns `None` when nothing plausible is found.
pub fn sniff_abstract(document: &Html) -> Option<String> {
    meta_abstract(document)
        .or_else(|| block_abstract(document))
        .or_else(|| first_paragraph(document))
}

fn meta_abstract(document: &Html) -> Option<String> {
    META_PROBES.iter().find_map(|(attr, value)| {
        let selector = Selector::parse(&format!("meta[{attr}='{value}']")).ok()?;
        document.select(&selector).find_map(|element| {
            element
                .value()
                .attr("content")
                .map(str::trim)
                .filter(|content| !content.is_empty())
                .map(str::to_string)
        })
    })
}

fn block_abstract(document: &Html) -> Option<String> {
    BLOCK_SELECTORS.iter().find_map(|selector_str| {
        let selector = Selector::parse(selector_str).ok()?;
        document.select(&selector).find_map(|element| {
            let text = element.text().collect::<String>();
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
    })
}

fn first_paragraph(document: &Html) -> Option<String> {
    let selector = Selector::parse("p").ok()?;
    let element = document.select(&selector).next()?;
    let text = element.text().collect::<String>();
    let trimmed = text.trim();
    (trimmed.chars().count() > MIN_PARAGRAPH_CHARS).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(body: &str) -> Html {
        Html::parse_document(&format!("<html><head></head><body>{}</body></html>", body))
    }

    #[test]
    fn test_meta_beats_structure() {
        let html = Html::parse_document(
            "<html><head>\
             <meta name='citation_abstract' content='From metadata.'>\
             </head><body><div class='abstract'>From the page.</div></body></html>",
        );
        assert_eq!(sniff_abstract(&html).unwrap(), "From metadata.");
    }

    #[test]
    fn test_meta_priority_order() {
        let html = Html::parse_document(
            "<html><head>\
             <meta name='description' content='Generic description.'>\
             <meta name='citation_abstract' content='The real abstract.'>\
             </head><body></body></html>",
        );
        assert_eq!(sniff_abstract(&html).unwrap(), "The real abstract.");
    }

    #[test]
    fn test_empty_meta_content_is_skipped() {
        let html = Html::parse_document(
            "<html><head>\
             <meta name='citation_abstract' content='  '>\
             <meta property='og:description' content='Fallback text.'>\
             </head><body></body></html>",
        );
        assert_eq!(sniff_abstract(&html).unwrap(), "Fallback text.");
    }

    #[test]
    fn test_structural_selector() {
        let html = page("<section class='abstract'> We present a method. </section>");
        assert_eq!(sniff_abstract(&html).unwrap(), "We present a method.");
    }

    #[test]
    fn test_long_first_paragraph_fallback() {
        let long = "x".repeat(100);
        let html = page(&format!("<p>{}</p>", long));
        assert_eq!(sniff_abstract(&html).unwrap(), long);
    }

    #[test]
    fn test_short_first_paragraph_rejected() {
        let html = page("<p>Cookie notice</p>");
        assert!(sniff_abstract(&html).is_none());
    }

    #[test]
    fn test_empty_document() {
        let html = page("");
        assert!(sniff_abstract(&html).is_none());
    }
}

//! Heading-heuristic location of a named section inside flat document text.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// A section slice found in a document, with the heading text that matched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedSection {
    /// The section text, trimmed
    pub text: String,

    /// The heading as it appeared in the document, kept for diagnostics
    pub heading: String,
}

/// Ordered heading and boundary heuristics for section location.
///
/// Headings are tried in order and the earliest occurrence in the document
/// wins; list order breaks offset ties. End markers bound the section inside
/// the lookahead window. None of this is a structural parse: tables of
/// contents and running headers can and do produce false positives. The only
/// guarantee is determinism for identical input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionPatterns {
    /// Heading regexes, matched case-insensitively
    #[serde(default = "default_headings")]
    pub headings: Vec<String>,

    /// Newline-prefixed literals that mark the start of the next section
    #[serde(default = "default_end_markers")]
    pub end_markers: Vec<String>,

    /// Numbered-chapter pattern that also ends a section
    #[serde(default = "default_numbered_heading")]
    pub numbered_heading: String,

    /// Window, in characters after the heading, inside which the section ends
    #[serde(default = "default_lookahead_chars")]
    pub lookahead_chars: usize,
}

impl Default for SectionPatterns {
    fn default() -> Self {
        Self {
            headings: default_headings(),
            end_markers: default_end_markers(),
            numbered_heading: default_numbered_heading(),
            lookahead_chars: default_lookahead_chars(),
        }
    }
}

fn default_headings() -> Vec<String> {
    [
        r"\bmaterials and methods\b",
        r"\bmaterials & methods\b",
        r"\bmethods\b",
        r"\bmethodology\b",
        r"\bexperimental\b",
        r"\bexperimental procedures\b",
        r"\bparticipants\b",
        r"\bsubjects and methods\b",
        r"\bstudy design\b",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_end_markers() -> Vec<String> {
    [
        "\nresults",
        "\ndiscussion",
        "\nconclusion",
        "\nacknowledg",
        "\nreferences",
        "\nconclusions",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_numbered_heading() -> String {
    r"\n\d+[.)]\s".to_string()
}

fn default_lookahead_chars() -> usize {
    3000
}

/// Locates a section by its heading inside otherwise unstructured text
#[derive(Debug)]
pub struct SectionLocator {
    headings: Vec<Regex>,
    end_markers: Vec<String>,
    numbered_heading: Regex,
    lookahead_chars: usize,
}

impl SectionLocator {
    /// Compile the configured patterns. Fails only on a malformed regex.
    pub fn new(patterns: &SectionPatterns) -> Result<Self, regex::Error> {
        let headings = patterns
            .headings
            .iter()
            .map(|pattern| {
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            headings,
            end_markers: patterns
                .end_markers
                .iter()
                .map(|marker| marker.to_ascii_lowercase())
                .collect(),
            numbered_heading: Regex::new(&patterns.numbered_heading)?,
            lookahead_chars: patterns.lookahead_chars,
        })
    }

    /// Build a locator with the default patterns
    pub fn with_defaults() -> Self {
        Self::new(&SectionPatterns::default()).expect("default section patterns are valid")
    }

    /// Find the earliest heading match and slice up to the nearest
    /// end-of-section marker inside the lookahead window. With no end marker
    /// in range, the whole window is the section.
    pub fn locate(&self, text: &str) -> Option<LocatedSection> {
        let mut best: Option<(usize, String)> = None;
        for regex in &self.headings {
            if let Some(m) = regex.find(text) {
                // strict < keeps the earlier list entry on offset ties
                let replace = match &best {
                    Some((offset, _)) => m.start() < *offset,
                    None => true,
                };
                if replace {
                    best = Some((m.start(), m.as_str().to_string()));
                }
            }
        }
        let (start, heading) = best?;

        let window_end = char_offset(&text[start..], self.lookahead_chars) + start;
        let window = &text[start..window_end];

        let mut cut = window.len();
        let lowered = window.to_ascii_lowercase();
        for marker in &self.end_markers {
            if let Some(offset) = lowered.find(marker.as_str()) {
                cut = cut.min(offset);
            }
        }
        if let Some(m) = self.numbered_heading.find(window) {
            cut = cut.min(m.start());
        }

        let section = window[..cut].trim();
        if section.is_empty() {
            return None;
        }

        Some(LocatedSection {
            text: section.to_string(),
            heading,
        })
    }
}

/// Byte offset of the `chars`-th character, clamped to the end of `text`
pub(crate) fn char_offset(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map_or(text.len(), |(offset, _)| offset)
}

//! Search engine access and results-page parsing.
//!
//! The single source implemented here scrapes a scholar-style results page.
//! There is no official API for it, so everything downstream of the HTTP
//! fetch is heuristic HTML parsing: each field of a result is recovered
//! independently, and a field that cannot be recovered stays empty rather
//! than failing the record.

mod scholar;

pub use scholar::{parse_results, ScholarSource};

/// Errors that can occur when talking to the search engine or a publisher
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Network or HTTP transport error
    #[error("Network error: {0}")]
    Network(String),

    /// Parsing error (HTML, PDF, JSON)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Unexpected response from the remote host
    #[error("API error: {0}")]
    Api(String),

    /// IO error (file system)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        SourceError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Parse(format!("JSON: {}", err))
    }
}

//! Utility modules supporting the harvest pipeline.
//!
//! - [`HttpClient`]: shared HTTP client with the fixed browser header profile
//! - [`download_pdf`]: PDF acquisition with content-type confirmation
//! - [`extract_text`]: page-ordered PDF text extraction

mod download;
mod http;
mod pdf;

pub use download::download_pdf;
pub use http::HttpClient;
pub use pdf::extract_text;

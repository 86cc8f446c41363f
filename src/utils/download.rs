//! PDF acquisition: fetch a URL only when it really is a PDF.

use std::path::PathBuf;

use crate::config::DownloadConfig;
use crate::utils::HttpClient;

/// Download `url` into the configured directory and return the local path.
///
/// The response is accepted only when the declared content type mentions
/// "pdf" or the URL path itself ends in `.pdf`; many "PDF" badge links on
/// results pages actually redirect to HTML landing pages. Re-acquiring the
/// same URL overwrites the previous file. Every failure mode (transport,
/// disk, wrong content type) collapses to `None`.
pub async fn download_pdf(
    client: &HttpClient,
    url: &str,
    config: &DownloadConfig,
) -> Option<PathBuf> {
    if let Err(e) = std::fs::create_dir_all(&config.dir) {
        tracing::debug!(
            "Cannot create download dir {}: {}",
            config.dir.display(),
            e
        );
        return None;
    }

    let response = match client.get(url).timeout(config.timeout()).send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::debug!("PDF request failed for {}: {}", url, e);
            return None;
        }
    };

    if !response.status().is_success() {
        tracing::debug!("PDF request for {} returned {}", url, response.status());
        return None;
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
        .to_ascii_lowercase();

    if !content_type.contains("pdf") && !url_path_ends_with_pdf(url) {
        tracing::debug!(
            "Rejecting {}: content type {:?} is not a PDF",
            url,
            content_type
        );
        return None;
    }

    let path = config.dir.join(pdf_filename(url, &config.fallback_filename));

    let bytes = match response.bytes().await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::debug!("Failed to read PDF body from {}: {}", url, e);
            return None;
        }
    };

    if let Err(e) = std::fs::write(&path, &bytes) {
        tracing::debug!("Failed to write {}: {}", path.display(), e);
        return None;
    }

    tracing::debug!("Saved {} bytes to {}", bytes.len(), path.display());
    Some(path)
}

/// Case-insensitive `.pdf` check on the URL path, ignoring any query string
fn url_path_ends_with_pdf(url: &str) -> bool {
    match url::Url::parse(url) {
        Ok(parsed) => parsed.path().to_ascii_lowercase().ends_with(".pdf"),
        Err(_) => url.to_ascii_lowercase().ends_with(".pdf"),
    }
}

/// Derive the local filename from the URL's basename.
///
/// Two different URLs with the same basename overwrite each other;
/// last write wins.
fn pdf_filename(url: &str, fallback: &str) -> String {
    url::Url::parse(url)
        .ok()
        .and_then(|parsed| {
            parsed
                .path_segments()
                .and_then(|mut segments| segments.next_back().map(str::to_string))
        })
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_from_basename() {
        assert_eq!(
            pdf_filename("https://x.org/papers/deep2019.pdf", "article.pdf"),
            "deep2019.pdf"
        );
    }

    #[test]
    fn test_filename_ignores_query() {
        assert_eq!(
            pdf_filename("https://x.org/download/p.pdf?token=abc", "article.pdf"),
            "p.pdf"
        );
    }

    #[test]
    fn test_filename_fallback_on_bare_host() {
        assert_eq!(
            pdf_filename("https://x.org/", "article.pdf"),
            "article.pdf"
        );
    }

    #[test]
    fn test_pdf_extension_check() {
        assert!(url_path_ends_with_pdf("https://x.org/a/b.PDF"));
        assert!(!url_path_ends_with_pdf("https://x.org/a/b.html"));
        // the extension lives in the path, not the query
        assert!(!url_path_ends_with_pdf("https://x.org/view?file=b.pdf"));
    }
}

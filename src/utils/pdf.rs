//! PDF text extraction utilities.

use std::path::Path;

/// Extract the text of a PDF as one string, page texts in page order joined
/// by a newline.
///
/// Pages that yield no text (scanned images, broken content streams) are
/// skipped, not treated as an error. When the page-by-page pass comes up
/// completely empty the whole document is handed to `pdf-extract` once,
/// which copes better with some font encodings. A document that cannot be
/// opened or parsed yields an empty string: an unreadable PDF contributes
/// nothing to enrichment, it does not abort it.
pub fn extract_text(path: &Path) -> String {
    let doc = match lopdf::Document::load(path) {
        Ok(doc) => doc,
        Err(e) => {
            tracing::debug!("Failed to open PDF {}: {}", path.display(), e);
            return String::new();
        }
    };

    let mut pages = Vec::new();
    for (number, _) in doc.get_pages() {
        match doc.extract_text(&[number]) {
            Ok(text) if !text.trim().is_empty() => pages.push(text),
            Ok(_) => {}
            Err(e) => {
                tracing::debug!("Skipping page {} of {}: {}", number, path.display(), e);
            }
        }
    }

    if !pages.is_empty() {
        return pages.join("\n");
    }

    match pdf_extract::extract_text(path) {
        Ok(text) => text,
        Err(e) => {
            tracing::debug!("pdf-extract fallback failed for {}: {}", path.display(), e);
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_nonexistent_file() {
        let text = extract_text(Path::new("/nonexistent/file.pdf"));
        assert!(text.is_empty());
    }

    #[test]
    fn test_extract_non_pdf_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not_a_pdf.pdf");
        std::fs::write(&path, b"just some text").unwrap();
        let text = extract_text(&path);
        assert!(text.is_empty());
    }
}

// PDF text extraction via pdf-extract.
//
// Only digital PDFs with a text layer produce anything useful; scanned PDFs
// come back empty and should be uploaded as images instead.

use super::ExtractionError;

/// Extract every page's text and join the non-empty pages with newlines.
pub fn extract_pdf_text(pdf_bytes: &[u8]) -> Result<String, ExtractionError> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(pdf_bytes)
        .map_err(|e| ExtractionError::PdfParsing(e.to_string()))?;

    let text = pages
        .into_iter()
        .filter(|page| !page.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    Ok(text)
}

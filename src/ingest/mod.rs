// Text acquisition: turns uploaded or on-disk reports into plain text.
//
// The comparison engine only ever sees strings. This module decides what
// kind of input a file is, validates its extension, and hands the bytes to
// the matching extractor: UTF-8 decoding for text, pdf-extract for PDFs, and
// an OcrEngine for images.

pub mod ocr;
pub mod pdf;

use std::path::Path;

use thiserror::Error;
use tracing::info;

use self::ocr::OcrEngine;

/// File extensions accepted for report uploads.
pub const ALLOWED_EXTENSIONS: &[&str] = &["txt", "pdf", "png", "jpg", "jpeg", "gif"];

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File type not allowed: {0}")]
    DisallowedFile(String),

    #[error("Text encoding error: {0}")]
    Encoding(String),

    #[error("Error reading PDF: {0}")]
    PdfParsing(String),

    #[error("OCR initialization failed: {0}")]
    OcrInit(String),

    #[error("Error processing image: {0}")]
    OcrProcessing(String),

    #[error("OCR is not available: {0}")]
    OcrUnavailable(String),
}

/// How a report's text is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Typed text or a .txt file
    Text,
    /// A PDF with an embedded text layer
    Pdf,
    /// A scanned page or photo, read with OCR
    Image,
}

impl InputKind {
    /// Map a (case-insensitive) file extension to its input kind.
    /// Returns None for anything outside the allowed set.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "txt" => Some(InputKind::Text),
            "pdf" => Some(InputKind::Pdf),
            "png" | "jpg" | "jpeg" | "gif" => Some(InputKind::Image),
            _ => None,
        }
    }

    /// Parse the input-type selector used by the upload form
    /// ("text", "pdf", or "image"). Unknown values fall back to text.
    pub fn from_form_value(value: &str) -> Self {
        match value {
            "pdf" => InputKind::Pdf,
            "image" => InputKind::Image,
            _ => InputKind::Text,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InputKind::Text => "text",
            InputKind::Pdf => "pdf",
            InputKind::Image => "image",
        }
    }
}

/// Check that a filename has an extension in `ALLOWED_EXTENSIONS`.
///
/// Only the text after the final '.' counts, so "scan.pdf.png" is an image
/// and a name without any '.' is rejected.
pub fn allowed_file(filename: &str) -> bool {
    match filename.rsplit_once('.') {
        Some((_, ext)) => {
            let ext = ext.to_ascii_lowercase();
            ALLOWED_EXTENSIONS.contains(&ext.as_str())
        }
        None => false,
    }
}

/// Extract plain text from raw bytes of the given kind.
pub fn extract_text(
    kind: InputKind,
    bytes: &[u8],
    ocr: &dyn OcrEngine,
) -> Result<String, ExtractionError> {
    match kind {
        InputKind::Text => String::from_utf8(bytes.to_vec())
            .map_err(|e| ExtractionError::Encoding(e.to_string())),
        InputKind::Pdf => pdf::extract_pdf_text(bytes),
        InputKind::Image => ocr.image_to_text(bytes),
    }
}

/// Read a report from disk, choosing the extractor from its extension.
pub fn load_file(path: &Path, ocr: &dyn OcrEngine) -> Result<String, ExtractionError> {
    let name = path.to_string_lossy();
    if !allowed_file(&name) {
        return Err(ExtractionError::DisallowedFile(name.into_owned()));
    }

    let kind = path
        .extension()
        .and_then(|e| e.to_str())
        .and_then(InputKind::from_extension)
        .ok_or_else(|| ExtractionError::DisallowedFile(name.to_string()))?;

    let bytes = std::fs::read(path)?;
    let text = extract_text(kind, &bytes, ocr)?;

    info!(
        path = %path.display(),
        kind = kind.as_str(),
        chars = text.chars().count(),
        "Extracted report text"
    );

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::ocr::{MockOcrEngine, UnavailableOcr};
    use super::*;

    #[test]
    fn test_allowed_file() {
        assert!(allowed_file("report.txt"));
        assert!(allowed_file("scan.JPEG"));
        assert!(allowed_file("archive.tar.pdf"));
        assert!(!allowed_file("notes.docx"));
        assert!(!allowed_file("README"));
        assert!(!allowed_file("trailing."));
    }

    #[test]
    fn test_kind_from_extension() {
        assert_eq!(InputKind::from_extension("PDF"), Some(InputKind::Pdf));
        assert_eq!(InputKind::from_extension("gif"), Some(InputKind::Image));
        assert_eq!(InputKind::from_extension("txt"), Some(InputKind::Text));
        assert_eq!(InputKind::from_extension("bmp"), None);
    }

    #[test]
    fn test_kind_from_form_value() {
        assert_eq!(InputKind::from_form_value("pdf"), InputKind::Pdf);
        assert_eq!(InputKind::from_form_value("image"), InputKind::Image);
        assert_eq!(InputKind::from_form_value("text"), InputKind::Text);
        assert_eq!(InputKind::from_form_value(""), InputKind::Text);
    }

    #[test]
    fn test_extract_text_utf8() {
        let text = extract_text(InputKind::Text, "Give Aspirin.".as_bytes(), &UnavailableOcr).unwrap();
        assert_eq!(text, "Give Aspirin.");
    }

    #[test]
    fn test_extract_text_invalid_utf8() {
        let err = extract_text(InputKind::Text, &[0xff, 0xfe, 0x00], &UnavailableOcr).unwrap_err();
        assert!(matches!(err, ExtractionError::Encoding(_)));
    }

    #[test]
    fn test_extract_image_uses_ocr_engine() {
        let ocr = MockOcrEngine::new("Heparin 5000 units");
        let text = extract_text(InputKind::Image, b"not really a png", &ocr).unwrap();
        assert_eq!(text, "Heparin 5000 units");
    }

    #[test]
    fn test_load_file_rejects_disallowed_extension() {
        let err = load_file(Path::new("/tmp/report.docx"), &UnavailableOcr).unwrap_err();
        assert!(matches!(err, ExtractionError::DisallowedFile(_)));
    }

    #[test]
    fn test_load_text_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("original.txt");
        std::fs::write(&path, "Administer Paracetamol.").unwrap();
        let text = load_file(&path, &UnavailableOcr).unwrap();
        assert_eq!(text, "Administer Paracetamol.");
    }
}

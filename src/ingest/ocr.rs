// OCR engines for image uploads.
//
// Tesseract is only compiled in with the `ocr` feature because it links the
// system tesseract and leptonica libraries. Without it, image inputs fail
// with ExtractionError::OcrUnavailable instead of silently producing no text.

use super::ExtractionError;

/// Trait for turning an image into text.
pub trait OcrEngine: Send + Sync {
    /// Recognize the text in an encoded image (PNG, JPEG, GIF).
    fn image_to_text(&self, image_bytes: &[u8]) -> Result<String, ExtractionError>;

    /// Short human-readable description for status output.
    fn describe(&self) -> String;
}

/// Tesseract OCR engine.
#[cfg(feature = "ocr")]
pub struct TesseractOcr {
    tessdata_dir: Option<std::path::PathBuf>,
    lang: String,
}

#[cfg(feature = "ocr")]
impl TesseractOcr {
    /// Use `tessdata_dir` when given, otherwise Tesseract's built-in search path.
    pub fn new(tessdata_dir: Option<&std::path::Path>, lang: &str) -> Result<Self, ExtractionError> {
        if let Some(dir) = tessdata_dir {
            if !dir.is_dir() {
                return Err(ExtractionError::OcrInit(format!(
                    "tessdata directory not found: {}",
                    dir.display()
                )));
            }
        }
        Ok(Self {
            tessdata_dir: tessdata_dir.map(|d| d.to_path_buf()),
            lang: lang.to_string(),
        })
    }
}

#[cfg(feature = "ocr")]
impl OcrEngine for TesseractOcr {
    fn image_to_text(&self, image_bytes: &[u8]) -> Result<String, ExtractionError> {
        let datapath = match &self.tessdata_dir {
            Some(dir) => Some(
                dir.to_str()
                    .ok_or_else(|| ExtractionError::OcrInit("Invalid tessdata path".into()))?,
            ),
            None => None,
        };

        let tess = tesseract::Tesseract::new(datapath, Some(&self.lang))
            .map_err(|e| ExtractionError::OcrInit(format!("{e:?}")))?;

        let mut tess = tess
            .set_image_from_mem(image_bytes)
            .map_err(|e| ExtractionError::OcrProcessing(format!("{e:?}")))?;

        tess.get_text()
            .map_err(|e| ExtractionError::OcrProcessing(format!("{e:?}")))
    }

    fn describe(&self) -> String {
        match &self.tessdata_dir {
            Some(dir) => format!("tesseract ({}, tessdata {})", self.lang, dir.display()),
            None => format!("tesseract ({})", self.lang),
        }
    }
}

/// Placeholder used when the binary was built without the `ocr` feature
/// or Tesseract failed to initialize.
pub struct UnavailableOcr;

impl OcrEngine for UnavailableOcr {
    fn image_to_text(&self, _image_bytes: &[u8]) -> Result<String, ExtractionError> {
        Err(ExtractionError::OcrUnavailable(
            "rebuild with `--features ocr` to read image reports".into(),
        ))
    }

    fn describe(&self) -> String {
        "unavailable (built without the `ocr` feature)".to_string()
    }
}

/// Fixed-output OCR engine for tests.
pub struct MockOcrEngine {
    pub text: String,
}

impl MockOcrEngine {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}

impl OcrEngine for MockOcrEngine {
    fn image_to_text(&self, _image_bytes: &[u8]) -> Result<String, ExtractionError> {
        Ok(self.text.clone())
    }

    fn describe(&self) -> String {
        "mock".to_string()
    }
}

/// Build the best OCR engine this binary supports.
pub fn create_engine(config: &crate::config::Config) -> Box<dyn OcrEngine> {
    #[cfg(feature = "ocr")]
    {
        match TesseractOcr::new(config.tessdata_dir.as_deref(), &config.ocr_lang) {
            Ok(engine) => return Box::new(engine),
            Err(e) => {
                tracing::warn!(error = %e, "Tesseract unavailable, image reports will be rejected");
            }
        }
    }

    #[cfg(not(feature = "ocr"))]
    let _ = config;

    Box::new(UnavailableOcr)
}

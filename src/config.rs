use std::env;
use std::path::PathBuf;

use anyhow::Result;

/// Default web upload limit: 10 MiB per request.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Central configuration loaded from environment variables.
///
/// The comparison engine itself takes no configuration; everything here
/// belongs to the collaborators around it (classifier storage, OCR, web
/// uploads). The .env file is loaded automatically at startup via dotenvy.
#[derive(Debug, Clone)]
pub struct Config {
    /// Where the trained condition classifier is saved and loaded
    pub model_path: PathBuf,
    /// Medicine/condition CSV used by `train` when --csv isn't given
    pub dataset_path: Option<PathBuf>,
    /// Tesseract language data directory (None = Tesseract's own default)
    pub tessdata_dir: Option<PathBuf>,
    /// Tesseract language(s), e.g. "eng" or "eng+fra"
    pub ocr_lang: String,
    /// Maximum request body size accepted by the upload endpoint
    pub max_upload_bytes: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Every setting has a default except the dataset path, which only the
    /// `train` command needs.
    pub fn load() -> Result<Self> {
        let max_upload_bytes = match env::var("RXDIFF_MAX_UPLOAD_BYTES") {
            Ok(raw) => raw.trim().parse::<usize>().map_err(|_| {
                anyhow::anyhow!("RXDIFF_MAX_UPLOAD_BYTES must be a whole number of bytes, got {raw:?}")
            })?,
            Err(_) => DEFAULT_MAX_UPLOAD_BYTES,
        };

        Ok(Self {
            model_path: env::var("RXDIFF_MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_model_path()),
            dataset_path: env::var("RXDIFF_DATASET_PATH").ok().map(PathBuf::from),
            tessdata_dir: env::var("RXDIFF_TESSDATA_DIR").ok().map(PathBuf::from),
            ocr_lang: env::var("RXDIFF_OCR_LANG").unwrap_or_else(|_| "eng".to_string()),
            max_upload_bytes,
        })
    }

    /// Resolve the training dataset: an explicit path wins over the env var.
    pub fn require_dataset(&self, explicit: Option<PathBuf>) -> Result<PathBuf> {
        match explicit.or_else(|| self.dataset_path.clone()) {
            Some(path) => Ok(path),
            None => anyhow::bail!(
                "No medicine dataset given. Pass --csv <path> or set RXDIFF_DATASET_PATH.\n\
                 The CSV needs `Condition` and `Medicine Names` columns."
            ),
        }
    }

    /// Check that a trained model exists at `model_path`.
    /// Call this before anything that predicts conditions.
    pub fn require_model(&self) -> Result<()> {
        if !self.model_path.exists() {
            anyhow::bail!(
                "No trained model found at {}\n\
                 Run `rxdiff train --csv <path>` first, or set RXDIFF_MODEL_PATH.",
                self.model_path.display()
            );
        }
        Ok(())
    }
}

/// Platform data directory for the classifier, e.g.
/// ~/.local/share/rxdiff/condition_model.json on Linux.
pub fn default_model_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("rxdiff")
        .join("condition_model.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_model(path: PathBuf) -> Config {
        Config {
            model_path: path,
            dataset_path: None,
            tessdata_dir: None,
            ocr_lang: "eng".to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    #[test]
    fn test_default_model_path_file_name() {
        let path = default_model_path();
        assert!(path.ends_with("rxdiff/condition_model.json"));
    }

    #[test]
    fn test_require_dataset_prefers_explicit() {
        let mut config = config_with_model(PathBuf::from("model.json"));
        config.dataset_path = Some(PathBuf::from("from_env.csv"));
        let path = config
            .require_dataset(Some(PathBuf::from("explicit.csv")))
            .unwrap();
        assert_eq!(path, PathBuf::from("explicit.csv"));
        assert_eq!(
            config.require_dataset(None).unwrap(),
            PathBuf::from("from_env.csv")
        );
    }

    #[test]
    fn test_require_dataset_missing() {
        let config = config_with_model(PathBuf::from("model.json"));
        assert!(config.require_dataset(None).is_err());
    }

    #[test]
    fn test_require_model_missing() {
        let config = config_with_model(PathBuf::from("/nonexistent/rxdiff/model.json"));
        let err = config.require_model().unwrap_err();
        assert!(err.to_string().contains("rxdiff train"));
    }
}

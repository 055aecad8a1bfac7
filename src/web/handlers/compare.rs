// POST /api/compare and POST /api/compare/upload: transcript comparison.
//
// /api/compare takes both texts as JSON. /api/compare/upload takes the
// multipart form: for each side an input-type selector ("text", "pdf",
// "image"), a typed-text field, and a file field named after the side and
// type (e.g. `original_pdf`, `wrong_image`).
//
// Returns 400 for missing/invalid input, 422 when a file can't be read.

use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::compare::{compare, ComparisonResult};
use crate::ingest::{allowed_file, extract_text, InputKind};
use crate::web::{api_error, AppState};

const MISSING_CONTENT: &str = "Please provide both original and transcribed content";

#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    #[serde(default)]
    pub original_text: String,
    #[serde(default)]
    pub wrong_text: String,
}

/// Upload response: the texts that were compared plus the result.
#[derive(Debug, Serialize)]
pub struct UploadCompareResponse {
    pub original_text: String,
    pub wrong_text: String,
    #[serde(flatten)]
    pub result: ComparisonResult,
}

/// POST /api/compare: compare two typed texts.
pub async fn compare_texts(Json(req): Json<CompareRequest>) -> Response {
    match compare(&req.original_text, &req.wrong_text) {
        Ok(result) => Json(result).into_response(),
        Err(e) => {
            tracing::debug!(error = %e, "Rejected comparison request");
            api_error(StatusCode::BAD_REQUEST, MISSING_CONTENT)
        }
    }
}

/// One uploaded file field.
struct UploadedFile {
    filename: String,
    bytes: Bytes,
}

/// The multipart form, split into plain text fields and file fields.
#[derive(Default)]
struct UploadForm {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

/// Field names for one side of the form.
struct FormSide {
    type_field: &'static str,
    text_field: &'static str,
    file_prefix: &'static str,
    label: &'static str,
}

const ORIGINAL: FormSide = FormSide {
    type_field: "input_type",
    text_field: "original_report",
    file_prefix: "original_",
    label: "original report",
};

const TRANSCRIBED: FormSide = FormSide {
    type_field: "wrong_input_type",
    text_field: "wrong_report",
    file_prefix: "wrong_",
    label: "transcription",
};

/// POST /api/compare/upload: extract text from each side, then compare.
pub async fn compare_uploads(State(state): State<AppState>, multipart: Multipart) -> Response {
    let mut form = match read_form(multipart).await {
        Ok(form) => form,
        Err(message) => return api_error(StatusCode::BAD_REQUEST, &message),
    };

    let original = match side_source(&mut form, &ORIGINAL) {
        Ok(source) => source,
        Err(message) => return api_error(StatusCode::BAD_REQUEST, &message),
    };
    let transcribed = match side_source(&mut form, &TRANSCRIBED) {
        Ok(source) => source,
        Err(message) => return api_error(StatusCode::BAD_REQUEST, &message),
    };

    let original_text = match resolve_text(&state, original).await {
        Ok(text) => text,
        Err(message) => return api_error(StatusCode::UNPROCESSABLE_ENTITY, &message),
    };
    let wrong_text = match resolve_text(&state, transcribed).await {
        Ok(text) => text,
        Err(message) => return api_error(StatusCode::UNPROCESSABLE_ENTITY, &message),
    };

    match compare(&original_text, &wrong_text) {
        Ok(result) => Json(UploadCompareResponse {
            original_text,
            wrong_text,
            result,
        })
        .into_response(),
        Err(_) => api_error(StatusCode::BAD_REQUEST, MISSING_CONTENT),
    }
}

async fn read_form(mut multipart: Multipart) -> Result<UploadForm, String> {
    let mut form = UploadForm::default();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return Err(format!("Malformed upload: {e}")),
        };

        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match field.file_name().map(str::to_string) {
            Some(filename) => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| format!("Malformed upload: {e}"))?;
                form.files.insert(name, UploadedFile { filename, bytes });
            }
            None => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| format!("Malformed upload: {e}"))?;
                form.fields.insert(name, text);
            }
        }
    }

    Ok(form)
}

/// Where one side's text comes from.
enum TextSource {
    Typed(String),
    File(InputKind, Bytes),
}

fn side_source(form: &mut UploadForm, side: &FormSide) -> Result<TextSource, String> {
    let kind = form
        .fields
        .get(side.type_field)
        .map(|v| InputKind::from_form_value(v))
        .unwrap_or(InputKind::Text);

    if kind == InputKind::Text {
        let text = form.fields.remove(side.text_field).unwrap_or_default();
        return Ok(TextSource::Typed(text));
    }

    let file_key = format!("{}{}", side.file_prefix, kind.as_str());
    match form.files.remove(&file_key) {
        Some(file) if !file.filename.is_empty() && allowed_file(&file.filename) => {
            Ok(TextSource::File(kind, file.bytes))
        }
        _ => Err(format!(
            "Invalid or missing {} file for {}",
            kind.as_str(),
            side.label
        )),
    }
}

/// Run extraction off the async runtime: OCR and PDF parsing are CPU-bound.
async fn resolve_text(state: &AppState, source: TextSource) -> Result<String, String> {
    match source {
        TextSource::Typed(text) => Ok(text),
        TextSource::File(kind, bytes) => {
            let ocr = state.ocr.clone();
            let extracted =
                tokio::task::spawn_blocking(move || extract_text(kind, &bytes, ocr.as_ref())).await;

            match extracted {
                Ok(Ok(text)) => Ok(text),
                Ok(Err(e)) => {
                    tracing::warn!(error = %e, kind = kind.as_str(), "Text extraction failed");
                    Err(format!("An error occurred: {e}"))
                }
                Err(e) => {
                    tracing::error!(error = %e, "Extraction task panicked");
                    Err("An error occurred: text extraction was interrupted".to_string())
                }
            }
        }
    }
}

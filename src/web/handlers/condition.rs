// POST /api/condition: predict a condition from a list of medicines.
//
// Returns 503 when the server started without a trained model.

use std::collections::BTreeMap;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::web::{api_error, AppState};

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub medicines: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub medicines: Vec<String>,
    pub condition: String,
    pub probabilities: BTreeMap<String, f64>,
}

/// POST /api/condition: most likely condition plus per-condition probabilities.
pub async fn predict_condition(
    State(state): State<AppState>,
    Json(req): Json<PredictRequest>,
) -> Response {
    let Some(classifier) = state.classifier.as_ref() else {
        return api_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "No condition model loaded. Run `rxdiff train` and restart the server.",
        );
    };

    let medicines: Vec<String> = req
        .medicines
        .iter()
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .collect();

    if medicines.is_empty() {
        return api_error(StatusCode::BAD_REQUEST, "Provide at least one medicine name");
    }

    let prediction = classifier
        .predict_condition(&medicines)
        .and_then(|condition| {
            classifier
                .condition_probabilities(&medicines)
                .map(|probabilities| (condition, probabilities))
        });

    match prediction {
        Ok((condition, probabilities)) => Json(PredictResponse {
            medicines,
            condition,
            probabilities,
        })
        .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Condition prediction failed");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Prediction failed")
        }
    }
}

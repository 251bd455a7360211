use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use tokio::sync::oneshot;

use crate::models::scam::ScamCheckRequest;
use crate::services::scam::ScamServiceRequest;

pub async fn check_scam(
    State(state): State<super::AppState>,
    Json(req): Json<ScamCheckRequest>,
) -> impl IntoResponse {
    let Some(text) = req.text else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "Text is required"})),
        );
    };

    let (scam_tx, scam_rx) = oneshot::channel();

    let send_result = state
        .scam_channel
        .send(ScamServiceRequest::Check {
            text,
            response: scam_tx,
        })
        .await;
    if let Err(e) = send_result {
        log::error!("Scam check error: {e}");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"message": "Server error during scam check"})),
        );
    }

    match scam_rx.await {
        Ok(Ok(verdict)) => (StatusCode::OK, Json(json!(verdict))),
        Ok(Err(_)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"message": "Server error during scam check"})),
        ),
        Err(e) => {
            log::error!("Scam check error: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"message": "Server error during scam check"})),
            )
        }
    }
}

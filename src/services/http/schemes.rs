use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use tokio::sync::oneshot;

use crate::models::schemes::{SchemeSearchRequest, SchemeSearchResult};
use crate::services::schemes::SchemeServiceRequest;

pub async fn search_schemes(
    State(state): State<super::AppState>,
    Json(req): Json<SchemeSearchRequest>,
) -> impl IntoResponse {
    // Presence only: an empty query is still forwarded to the provider.
    let Some(query) = req.query else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "Query is required", "schemes": []})),
        );
    };

    let (scheme_tx, scheme_rx) = oneshot::channel();

    let send_result = state
        .scheme_channel
        .send(SchemeServiceRequest::Search {
            query,
            language: req.language,
            response: scheme_tx,
        })
        .await;
    if let Err(e) = send_result {
        log::error!("Scheme search error: {e}");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!(SchemeSearchResult::failure())),
        );
    }

    match scheme_rx.await {
        Ok(Ok(result)) => (StatusCode::OK, Json(json!(result))),
        // The body stays renderable no matter what failed upstream.
        Ok(Err(_)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!(SchemeSearchResult::failure())),
        ),
        Err(e) => {
            log::error!("Scheme search error: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!(SchemeSearchResult::failure())),
            )
        }
    }
}

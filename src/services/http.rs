use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tokio::sync::mpsc;
use tower_http::{
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use super::scam::ScamServiceRequest;
use super::schemes::SchemeServiceRequest;
use super::users::UserRequest;

mod scam;
mod schemes;
mod users;

#[derive(Clone)]
struct AppState {
    user_channel: mpsc::Sender<UserRequest>,
    scheme_channel: mpsc::Sender<SchemeServiceRequest>,
    scam_channel: mpsc::Sender<ScamServiceRequest>,
}

// Empty strings count as missing, matching the falsiness checks the frontend
// already relies on.
fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({"status": "YojanaSaathi Unified Backend is running"})),
    )
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/signup", post(users::signup))
        .route("/login", post(users::login))
        .route("/api/schemes/search", post(schemes::search_schemes))
        .route("/api/check-scam", post(scam::check_scam))
        // Serve the SPA bundle for everything else, index.html as fallback.
        .fallback_service(
            ServeDir::new("public").not_found_service(ServeFile::new("public/index.html")),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

pub async fn start_http_server(
    listen: String,
    user_channel: mpsc::Sender<UserRequest>,
    scheme_channel: mpsc::Sender<SchemeServiceRequest>,
    scam_channel: mpsc::Sender<ScamServiceRequest>,
) -> Result<(), anyhow::Error> {
    let app_state = AppState {
        user_channel,
        scheme_channel,
        scam_channel,
    };

    let app = router(app_state);

    let listener = tokio::net::TcpListener::bind(&listen).await?;
    println!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use tokio::sync::oneshot;

use crate::models::users::{LoginRequest, SignupRequest};
use crate::services::users::UserRequest;
use crate::services::ServiceError;

pub async fn signup(
    State(state): State<super::AppState>,
    Json(req): Json<SignupRequest>,
) -> impl IntoResponse {
    let name = super::non_empty(&req.name);
    let password = super::non_empty(&req.password);
    let confirm_password = super::non_empty(&req.confirm_password);

    let (Some(name), Some(password), Some(confirm_password)) = (name, password, confirm_password)
    else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "All fields are required"})),
        );
    };

    if password != confirm_password {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "Passwords do not match"})),
        );
    }

    let (user_tx, user_rx) = oneshot::channel();

    let send_result = state
        .user_channel
        .send(UserRequest::CreateUser {
            name: name.to_owned(),
            password: password.to_owned(),
            response: user_tx,
        })
        .await;
    if let Err(e) = send_result {
        log::error!("Signup error: {e}");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"message": "Server error during signup"})),
        );
    }

    match user_rx.await {
        Ok(Ok(user)) => (
            StatusCode::CREATED,
            Json(json!({
                "message": "Signup successful",
                "user": {"id": user.id, "name": user.name}
            })),
        ),
        Ok(Err(ServiceError::DuplicateName)) => (
            StatusCode::CONFLICT,
            Json(json!({"message": "Username already exists"})),
        ),
        Ok(Err(service_error)) => {
            log::error!("Signup error: {service_error}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"message": "Server error during signup"})),
            )
        }
        Err(e) => {
            log::error!("Signup error: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"message": "Server error during signup"})),
            )
        }
    }
}

pub async fn login(
    State(state): State<super::AppState>,
    Json(req): Json<LoginRequest>,
) -> impl IntoResponse {
    let name = super::non_empty(&req.name);
    let password = super::non_empty(&req.password);

    let (Some(name), Some(password)) = (name, password) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "Name and password are required"})),
        );
    };

    let (user_tx, user_rx) = oneshot::channel();

    let send_result = state
        .user_channel
        .send(UserRequest::VerifyUser {
            name: name.to_owned(),
            password: password.to_owned(),
            response: user_tx,
        })
        .await;
    if let Err(e) = send_result {
        log::error!("Login error: {e}");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"message": "Server error during login"})),
        );
    }

    match user_rx.await {
        Ok(Ok(user)) => (
            StatusCode::OK,
            Json(json!({
                "message": "Login successful",
                "user": {"id": user.id, "name": user.name}
            })),
        ),
        Ok(Err(ServiceError::InvalidCredentials)) => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Invalid username or password"})),
        ),
        Ok(Err(service_error)) => {
            log::error!("Login error: {service_error}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"message": "Server error during login"})),
            )
        }
        Err(e) => {
            log::error!("Login error: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"message": "Server error during login"})),
            )
        }
    }
}

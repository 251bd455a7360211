use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::mpsc;

use crate::repositories::gateway::{GatewayError, OpenRouterGateway};
use crate::repositories::users::CredentialStoreError;
use crate::settings::Settings;

pub mod http;
pub mod scam;
pub mod schemes;
pub mod users;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Internal error: {0}")]
    Internal(String),
    #[error("Database error: {0}")]
    Database(String),
    #[error("Username already exists")]
    DuplicateName,
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("Upstream provider error: {0}")]
    Upstream(String),
    #[error("Provider response parse error: {0}")]
    Parse(String),
}

impl From<GatewayError> for ServiceError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Upstream(msg) => ServiceError::Upstream(msg),
            GatewayError::Parse(e) => ServiceError::Parse(e.to_string()),
        }
    }
}

impl From<CredentialStoreError> for ServiceError {
    fn from(err: CredentialStoreError) -> Self {
        match err {
            CredentialStoreError::DuplicateName => ServiceError::DuplicateName,
            CredentialStoreError::InvalidCredentials => ServiceError::InvalidCredentials,
            CredentialStoreError::Unavailable(e) => ServiceError::Database(e.to_string()),
            CredentialStoreError::Hasher(e) => ServiceError::Internal(e.to_string()),
        }
    }
}

#[async_trait]
pub trait RequestHandler<T>: Send + Sync + 'static
where
    T: Send + 'static,
{
    async fn handle_request(&self, request: T);
}

#[async_trait]
pub trait Service<T, H>: Send + Sync + 'static
where
    T: Send + 'static,
    H: RequestHandler<T> + Clone + Send,
{
    async fn run(&mut self, handler: H, receiver: &mut mpsc::Receiver<T>) {
        while let Some(request) = receiver.recv().await {
            let handler = handler.clone();

            tokio::spawn(async move {
                handler.handle_request(request).await;
            });
        }
    }
}

pub async fn start_services(
    pool: PgPool,
    settings: Settings,
    listen: String,
) -> Result<(), anyhow::Error> {
    let (user_tx, mut user_rx) = mpsc::channel(512);
    let (scheme_tx, mut scheme_rx) = mpsc::channel(512);
    let (scam_tx, mut scam_rx) = mpsc::channel(512);

    let mut user_service = users::UserService::new();
    let mut scheme_service = schemes::SchemeService::new();
    let mut scam_service = scam::ScamService::new();

    // One provider client for the whole process, built from settings at
    // startup and shared by reference with both AI services.
    let gateway = Arc::new(OpenRouterGateway::new(settings.openrouter)?);

    println!("[*] Starting user service.");
    let user_pool_clone = pool.clone();
    tokio::spawn(async move {
        user_service
            .run(
                users::UserRequestHandler::new(user_pool_clone),
                &mut user_rx,
            )
            .await;
    });

    println!("[*] Starting scheme recommendation service.");
    let scheme_gateway = gateway.clone();
    tokio::spawn(async move {
        scheme_service
            .run(
                schemes::SchemeRequestHandler::new(scheme_gateway),
                &mut scheme_rx,
            )
            .await;
    });

    println!("[*] Starting scam classification service.");
    let scam_gateway = gateway.clone();
    tokio::spawn(async move {
        scam_service
            .run(scam::ScamRequestHandler::new(scam_gateway), &mut scam_rx)
            .await;
    });

    println!("[*] Starting HTTP server.");
    http::start_http_server(listen, user_tx, scheme_tx, scam_tx).await
}

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::oneshot;

use super::{RequestHandler, Service, ServiceError};
use crate::{
    models::users,
    repositories::users::{BcryptHasher, UserRepository},
};

pub enum UserRequest {
    CreateUser {
        name: String,
        password: String,
        response: oneshot::Sender<Result<users::User, ServiceError>>,
    },
    VerifyUser {
        name: String,
        password: String,
        response: oneshot::Sender<Result<users::User, ServiceError>>,
    },
}

#[derive(Clone)]
pub struct UserRequestHandler {
    repository: UserRepository,
}

impl UserRequestHandler {
    pub fn new(sql_conn: PgPool) -> Self {
        let repository = UserRepository::new(sql_conn, Arc::new(BcryptHasher::default()));

        UserRequestHandler { repository }
    }

    async fn create_user(&self, name: &str, password: &str) -> Result<users::User, ServiceError> {
        let user = self.repository.create_user(name, password).await?;
        log::info!("Created user {}", user.id);

        Ok(user)
    }

    async fn verify_user(&self, name: &str, password: &str) -> Result<users::User, ServiceError> {
        Ok(self.repository.verify_user(name, password).await?)
    }
}

#[async_trait]
impl RequestHandler<UserRequest> for UserRequestHandler {
    async fn handle_request(&self, request: UserRequest) {
        match request {
            UserRequest::CreateUser {
                name,
                password,
                response,
            } => {
                let user = self.create_user(&name, &password).await;
                let _ = response.send(user);
            }
            UserRequest::VerifyUser {
                name,
                password,
                response,
            } => {
                let user = self.verify_user(&name, &password).await;
                let _ = response.send(user);
            }
        }
    }
}

pub struct UserService;

impl UserService {
    pub fn new() -> Self {
        UserService {}
    }
}

#[async_trait]
impl Service<UserRequest, UserRequestHandler> for UserService {}

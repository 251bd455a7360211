use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::oneshot;

use super::{RequestHandler, Service, ServiceError};
use crate::models::schemes::SchemeSearchResult;
use crate::repositories::gateway::ModelGateway;

pub enum SchemeServiceRequest {
    Search {
        query: String,
        language: Option<String>,
        response: oneshot::Sender<Result<SchemeSearchResult, ServiceError>>,
    },
}

#[derive(Clone)]
pub struct SchemeRequestHandler {
    gateway: Arc<dyn ModelGateway>,
}

impl SchemeRequestHandler {
    pub fn new(gateway: Arc<dyn ModelGateway>) -> Self {
        SchemeRequestHandler { gateway }
    }

    fn build_prompt(query: &str, language: Option<&str>) -> String {
        let language = language.unwrap_or("Auto-detect");

        format!(
            r#"You are an Indian government scheme reasoning engine.

User message:
"{query}"
Language requested: {language}

Your tasks:
- Detect the user's language automatically
- Identify suitable Indian government schemes
- Respond in the SAME language as the user
- Keep response simple and helpful

IMPORTANT:
- You MUST include documents array for EVERY scheme
- documents MUST be an array of strings

Return JSON ONLY in this exact format:

{{
  "message": "",
  "schemes": [
    {{
      "name": "",
      "description": "",
      "eligibility": "",
      "documents": [
        "Aadhaar Card",
        "Income Certificate"
      ],
      "apply_link": ""
    }}
  ]
}}
"#
        )
    }

    async fn search(
        &self,
        query: &str,
        language: Option<&str>,
    ) -> Result<SchemeSearchResult, ServiceError> {
        let prompt = Self::build_prompt(query, language);
        let value = self.gateway.invoke(&prompt).await?;

        Ok(SchemeSearchResult::from_provider(&value))
    }
}

#[async_trait]
impl RequestHandler<SchemeServiceRequest> for SchemeRequestHandler {
    async fn handle_request(&self, request: SchemeServiceRequest) {
        match request {
            SchemeServiceRequest::Search {
                query,
                language,
                response,
            } => {
                let result = self.search(&query, language.as_deref()).await;
                if let Err(e) = &result {
                    log::error!("Scheme search error: {e}");
                }
                let _ = response.send(result);
            }
        }
    }
}

pub struct SchemeService;

impl SchemeService {
    pub fn new() -> Self {
        SchemeService {}
    }
}

#[async_trait]
impl Service<SchemeServiceRequest, SchemeRequestHandler> for SchemeService {}

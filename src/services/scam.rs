use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::oneshot;

use super::{RequestHandler, Service, ServiceError};
use crate::models::scam::ScamVerdict;
use crate::repositories::gateway::ModelGateway;

pub enum ScamServiceRequest {
    Check {
        text: String,
        response: oneshot::Sender<Result<ScamVerdict, ServiceError>>,
    },
}

#[derive(Clone)]
pub struct ScamRequestHandler {
    gateway: Arc<dyn ModelGateway>,
}

impl ScamRequestHandler {
    pub fn new(gateway: Arc<dyn ModelGateway>) -> Self {
        ScamRequestHandler { gateway }
    }

    fn build_prompt(text: &str) -> String {
        format!(
            r#"You are a cybersecurity expert.

Analyze the following text or URL and determine if it is a scam.

"{text}"

Return ONLY valid JSON:
{{
  "isScam": true or false,
  "riskLevel": "Low | Medium | High",
  "reason": "Short explanation"
}}
"#
        )
    }

    /// Relays the provider verdict with no repair: fields the provider left
    /// out stay absent in the result.
    async fn check(&self, text: &str) -> Result<ScamVerdict, ServiceError> {
        let prompt = Self::build_prompt(text);
        let value = self.gateway.invoke(&prompt).await?;

        Ok(ScamVerdict::from_provider(&value))
    }
}

#[async_trait]
impl RequestHandler<ScamServiceRequest> for ScamRequestHandler {
    async fn handle_request(&self, request: ScamServiceRequest) {
        match request {
            ScamServiceRequest::Check { text, response } => {
                let verdict = self.check(&text).await;
                if let Err(e) = &verdict {
                    log::error!("Scam check error: {e}");
                }
                let _ = response.send(verdict);
            }
        }
    }
}

pub struct ScamService;

impl ScamService {
    pub fn new() -> Self {
        ScamService {}
    }
}

#[async_trait]
impl Service<ScamServiceRequest, ScamRequestHandler> for ScamService {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::gateway::GatewayError;
    use serde_json::{json, Value};

    struct CannedGateway(Value);

    #[async_trait]
    impl ModelGateway for CannedGateway {
        async fn invoke(&self, _prompt: &str) -> Result<Value, GatewayError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn prompt_carries_the_suspicious_text() {
        let prompt = ScamRequestHandler::build_prompt("Click here to claim your prize");

        assert!(prompt.contains("\"Click here to claim your prize\""));
        assert!(prompt.contains("cybersecurity expert"));
    }

    #[tokio::test]
    async fn complete_verdict_is_relayed_unmodified() {
        let provider = json!({
            "isScam": true,
            "riskLevel": "High",
            "reason": "Classic lottery prize bait"
        });
        let handler = ScamRequestHandler::new(Arc::new(CannedGateway(provider.clone())));

        let verdict = handler
            .check("Click here to claim your free lottery prize")
            .await
            .unwrap();

        assert_eq!(serde_json::to_value(&verdict).unwrap(), provider);
    }

    #[tokio::test]
    async fn partial_verdict_is_not_repaired() {
        let handler =
            ScamRequestHandler::new(Arc::new(CannedGateway(json!({"isScam": false}))));

        let verdict = handler.check("hello").await.unwrap();

        assert_eq!(verdict.is_scam, Some(false));
        assert_eq!(verdict.risk_level, None);
        assert_eq!(verdict.reason, None);
    }
}

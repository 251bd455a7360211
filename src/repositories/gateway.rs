use crate::settings;

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("model provider unavailable: {0}")]
    Upstream(String),
    #[error("model completion is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Single-turn prompt forwarding to a chat-completion provider. The gateway
/// does not interpret the prompt; it returns whatever JSON object the
/// completion contained.
#[async_trait]
pub trait ModelGateway: Send + Sync + 'static {
    async fn invoke(&self, prompt: &str) -> Result<Value, GatewayError>;
}

pub struct OpenRouterGateway {
    url: String,
    api_key: String,
    model: String,
    referer: Option<String>,
    title: Option<String>,
    policy: settings::GatewayPolicy,
    client: reqwest::Client,
}

impl OpenRouterGateway {
    pub fn new(config: settings::OpenRouter) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.policy.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            url: config.url,
            api_key: config.api_key,
            model: config.model,
            referer: config.referer,
            title: config.title,
            policy: config.policy,
            client: builder.build()?,
        })
    }

    async fn send_once(&self, payload: &Value) -> Result<Value, GatewayError> {
        let mut request = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(payload);
        if let Some(referer) = &self.referer {
            request = request.header("HTTP-Referer", referer);
        }
        if let Some(title) = &self.title {
            request = request.header("X-Title", title);
        }

        let response = request
            .send()
            .await
            .map_err(|e| GatewayError::Upstream(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::Upstream(e.to_string()))?;

        if !status.is_success() {
            return Err(GatewayError::Upstream(format!(
                "provider returned {status}: {body}"
            )));
        }

        let envelope: Value = serde_json::from_str(&body)
            .map_err(|e| GatewayError::Upstream(format!("bad provider envelope: {e}")))?;

        extract_completion(&envelope)
    }
}

#[async_trait]
impl ModelGateway for OpenRouterGateway {
    async fn invoke(&self, prompt: &str) -> Result<Value, GatewayError> {
        let payload = json!({
            "model": self.model,
            "messages": [{"role": "user", "content": prompt}],
            "response_format": {"type": "json_object"}
        });

        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.send_once(&payload).await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < self.policy.max_attempts => {
                    log::warn!("Model provider call failed (attempt {attempt}): {e}");
                    if self.policy.backoff_ms > 0 {
                        tokio::time::sleep(Duration::from_millis(self.policy.backoff_ms)).await;
                    }
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Pulls `choices[0].message.content` out of the provider envelope and parses
/// it as JSON. A missing completion is an upstream failure; unparseable
/// completion text is a parse failure.
fn extract_completion(envelope: &Value) -> Result<Value, GatewayError> {
    let content = envelope
        .get("choices")
        .and_then(|choices| choices.get(0))
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(Value::as_str)
        .ok_or_else(|| GatewayError::Upstream("missing completion content".to_owned()))?;

    Ok(serde_json::from_str(content)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope_with_content(content: &str) -> Value {
        json!({
            "id": "gen-123",
            "choices": [
                {"message": {"role": "assistant", "content": content}}
            ]
        })
    }

    #[test]
    fn completion_content_is_parsed_as_json() {
        let envelope = envelope_with_content(r#"{"message": "ok", "schemes": []}"#);

        let value = extract_completion(&envelope).unwrap();

        assert_eq!(value["message"], "ok");
    }

    #[test]
    fn missing_choices_is_an_upstream_error() {
        let envelope = json!({"error": {"message": "rate limited"}});

        let err = extract_completion(&envelope).unwrap_err();

        assert!(matches!(err, GatewayError::Upstream(_)));
    }

    #[test]
    fn non_json_completion_is_a_parse_error() {
        let envelope = envelope_with_content("Sorry, I cannot answer that.");

        let err = extract_completion(&envelope).unwrap_err();

        assert!(matches!(err, GatewayError::Parse(_)));
    }

    #[test]
    fn non_string_content_is_an_upstream_error() {
        let envelope = json!({"choices": [{"message": {"content": 42}}]});

        let err = extract_completion(&envelope).unwrap_err();

        assert!(matches!(err, GatewayError::Upstream(_)));
    }
}

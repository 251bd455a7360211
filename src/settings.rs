use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
pub struct Postgres {
    pub url: String,
}

/// Retry/timeout policy for the model provider. The defaults mirror the
/// upstream behavior: a single attempt, no backoff, no explicit timeout.
#[derive(Clone, Debug, Deserialize)]
pub struct GatewayPolicy {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default)]
    pub backoff_ms: u64,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for GatewayPolicy {
    fn default() -> Self {
        GatewayPolicy {
            max_attempts: default_max_attempts(),
            backoff_ms: 0,
            timeout_secs: None,
        }
    }
}

fn default_max_attempts() -> u32 {
    1
}

#[derive(Clone, Debug, Deserialize)]
pub struct OpenRouter {
    pub url: String,
    pub api_key: String,
    pub model: String,
    pub referer: Option<String>,
    pub title: Option<String>,
    #[serde(default)]
    pub policy: GatewayPolicy,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Settings {
    pub postgres: Postgres,
    pub openrouter: OpenRouter,
}

impl Settings {
    pub fn new(path: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name(path))
            // Secrets (API key, database URL) come from the environment:
            // SAATHI__OPENROUTER__API_KEY, SAATHI__POSTGRES__URL, ...
            .add_source(
                Environment::with_prefix("SAATHI")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn settings_from(toml: &str) -> Settings {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn policy_defaults_to_single_attempt() {
        let settings = settings_from(
            r#"
            [postgres]
            url = "postgres://localhost/saathi"

            [openrouter]
            url = "https://openrouter.ai/api/v1/chat/completions"
            api_key = "test-key"
            model = "google/gemini-2.0-flash-001"
            "#,
        );

        assert_eq!(settings.openrouter.policy.max_attempts, 1);
        assert_eq!(settings.openrouter.policy.backoff_ms, 0);
        assert_eq!(settings.openrouter.policy.timeout_secs, None);
    }

    #[test]
    fn policy_overrides_are_read() {
        let settings = settings_from(
            r#"
            [postgres]
            url = "postgres://localhost/saathi"

            [openrouter]
            url = "https://openrouter.ai/api/v1/chat/completions"
            api_key = "test-key"
            model = "google/gemini-2.0-flash-001"
            referer = "http://localhost:3000"
            title = "YojanaSaathi"

            [openrouter.policy]
            max_attempts = 3
            backoff_ms = 250
            timeout_secs = 30
            "#,
        );

        assert_eq!(settings.openrouter.policy.max_attempts, 3);
        assert_eq!(settings.openrouter.policy.backoff_ms, 250);
        assert_eq!(settings.openrouter.policy.timeout_secs, Some(30));
        assert_eq!(
            settings.openrouter.referer.as_deref(),
            Some("http://localhost:3000")
        );
    }
}

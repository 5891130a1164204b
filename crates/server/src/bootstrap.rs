use std::sync::Arc;
use std::time::Duration;

use parley_agent::llm::{GeminiClient, GeminiConfig, GenerationError};
use parley_agent::runtime::NegotiationRuntime;
use parley_core::config::{AppConfig, ConfigError, LoadOptions};
use thiserror::Error;
use tracing::info;

pub struct Application {
    pub config: AppConfig,
    pub runtime: Arc<NegotiationRuntime>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("llm.api_key is not configured")]
    MissingApiKey,
    #[error("generation client construction failed: {0}")]
    LlmClient(#[source] GenerationError),
}

pub fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config)
}

pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let api_key = config.llm.api_key.clone().ok_or(BootstrapError::MissingApiKey)?;
    let gemini = GeminiClient::new(GeminiConfig {
        api_key,
        base_url: config.llm.base_url.clone(),
        model: config.llm.model.clone(),
        timeout: Duration::from_secs(config.llm.timeout_secs),
    })
    .map_err(BootstrapError::LlmClient)?;

    info!(
        event_name = "system.bootstrap.llm_client_ready",
        correlation_id = "bootstrap",
        model = %config.llm.model,
        "generation client constructed"
    );

    Ok(Application { config, runtime: Arc::new(NegotiationRuntime::new(Arc::new(gemini))) })
}

#[cfg(test)]
mod tests {
    use parley_core::config::{ConfigOverrides, LoadOptions};

    use crate::bootstrap::{bootstrap, BootstrapError};

    #[test]
    fn bootstrap_fails_fast_without_an_api_key() {
        let result = bootstrap(LoadOptions {
            overrides: ConfigOverrides {
                llm_api_key: Some("  ".to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        });

        let message = match result {
            Ok(_) => panic!("bootstrap should fail without a usable api key"),
            Err(error) => error.to_string(),
        };
        assert!(message.contains("llm.api_key"));
    }

    #[tokio::test]
    async fn bootstrap_succeeds_with_valid_overrides() {
        let result = bootstrap(LoadOptions {
            overrides: ConfigOverrides {
                llm_api_key: Some("test-key".to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        });

        let app = result.expect("bootstrap should succeed with a key override");
        assert_eq!(app.config.llm.model, "gemini-1.5-flash");
        assert!(app.runtime.snapshot("default").await.is_none(), "no conversations yet");
    }
}

//! Generative Fallback Module
//!
//! The generative model is an external collaborator behind the
//! `GenerativeBackend` trait. Calls are bounded by a timeout and a
//! cancellation token, and every failure is a typed `ProviderError` that the
//! service turns into a fixed apology. Nothing here ever reaches the HTTP
//! caller as an error status.
//!
//! ## Backends
//!
//! - `OpenAiCompatibleBackend`: chat completions over HTTP (`reqwest`)
//! - `DisabledBackend`: always `ProviderError::Disabled` (no provider configured)

mod openai;
pub mod prompt;

pub use openai::OpenAiCompatibleBackend;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::LlmConfig;

/// Generative provider failures
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Generative provider is disabled")]
    Disabled,
    #[error("API key environment variable {0} is not set")]
    MissingApiKey(String),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Provider returned status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("Provider returned no text")]
    EmptyResponse,
    #[error("Provider call timed out after {0:?}")]
    Timeout(Duration),
    #[error("Provider call cancelled")]
    Cancelled,
}

/// Unified trait for generative backends
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Reply to `prompt`, grounded on `knowledge_context` (sent as system text).
    async fn generate(&self, prompt: &str, knowledge_context: &str) -> Result<String, ProviderError>;

    /// Backend name for logging
    fn backend_name(&self) -> &'static str;

    /// Whether calling `generate` can succeed at all
    fn is_enabled(&self) -> bool {
        true
    }
}

/// Backend used when no provider is configured.
pub struct DisabledBackend;

#[async_trait]
impl GenerativeBackend for DisabledBackend {
    async fn generate(&self, _prompt: &str, _knowledge_context: &str) -> Result<String, ProviderError> {
        Err(ProviderError::Disabled)
    }

    fn backend_name(&self) -> &'static str {
        "disabled"
    }

    fn is_enabled(&self) -> bool {
        false
    }
}

/// Build the configured backend. Misconfiguration degrades to `DisabledBackend`.
pub fn backend_from_config(config: &LlmConfig) -> Arc<dyn GenerativeBackend> {
    if !config.enabled {
        info!("Generative provider disabled");
        return Arc::new(DisabledBackend);
    }
    match OpenAiCompatibleBackend::from_config(config) {
        Ok(backend) => {
            info!(model = %config.model, base_url = %config.base_url, "Generative provider configured");
            Arc::new(backend)
        }
        Err(e) => {
            warn!(error = %e, "Generative provider unavailable — falling back to disabled");
            Arc::new(DisabledBackend)
        }
    }
}

/// Call the backend, giving up after `timeout` or when `cancel` fires.
pub async fn generate_bounded(
    backend: &dyn GenerativeBackend,
    prompt: &str,
    knowledge_context: &str,
    timeout: Duration,
    cancel: &CancellationToken,
) -> Result<String, ProviderError> {
    tokio::select! {
        () = cancel.cancelled() => Err(ProviderError::Cancelled),
        result = tokio::time::timeout(timeout, backend.generate(prompt, knowledge_context)) => {
            result.unwrap_or(Err(ProviderError::Timeout(timeout)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SlowBackend;

    #[async_trait]
    impl GenerativeBackend for SlowBackend {
        async fn generate(&self, _prompt: &str, _ctx: &str) -> Result<String, ProviderError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok("late".to_string())
        }

        fn backend_name(&self) -> &'static str {
            "slow"
        }
    }

    struct EchoBackend;

    #[async_trait]
    impl GenerativeBackend for EchoBackend {
        async fn generate(&self, prompt: &str, _ctx: &str) -> Result<String, ProviderError> {
            Ok(format!("echo: {prompt}"))
        }

        fn backend_name(&self) -> &'static str {
            "echo"
        }
    }

    #[tokio::test]
    async fn test_disabled_backend() {
        let result = DisabledBackend.generate("hi", "").await;
        assert!(matches!(result, Err(ProviderError::Disabled)));
        assert!(!DisabledBackend.is_enabled());
    }

    #[tokio::test]
    async fn test_timeout_is_provider_error() {
        let cancel = CancellationToken::new();
        let result =
            generate_bounded(&SlowBackend, "hi", "", Duration::from_millis(20), &cancel).await;
        assert!(matches!(result, Err(ProviderError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_cancellation() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = generate_bounded(&SlowBackend, "hi", "", Duration::from_secs(5), &cancel).await;
        assert!(matches!(result, Err(ProviderError::Cancelled)));
    }

    #[tokio::test]
    async fn test_success_passes_through() {
        let cancel = CancellationToken::new();
        let result = generate_bounded(&EchoBackend, "hi", "", Duration::from_secs(5), &cancel).await;
        assert_eq!(result.unwrap(), "echo: hi");
    }

    #[test]
    fn test_backend_from_config_disabled() {
        let backend = backend_from_config(&LlmConfig::default());
        assert_eq!(backend.backend_name(), "disabled");
    }

    #[test]
    fn test_backend_from_config_missing_key_degrades() {
        let config = LlmConfig {
            enabled: true,
            api_key_env: "FAQ_ASSIST_TEST_UNSET_KEY_VAR".to_string(),
            ..LlmConfig::default()
        };
        assert!(!backend_from_config(&config).is_enabled());
    }
}

//! Narrative generation: an unreliable text-generation service behind the
//! [`Narrator`] trait, plus the deterministic rule-based fallback.

pub mod fallback;
pub mod openai;
pub mod prompts;
pub mod types;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::NarrativeConfig;

pub use openai::OpenAiNarrator;
pub use types::{NarrativeInput, NarrativeResponse};

#[derive(Error, Debug)]
pub enum NarrativeError {
    #[error("narrative generation is disabled")]
    Disabled,

    #[error("no API key configured")]
    MissingCredentials,

    #[error("request failed: {0}")]
    Request(#[from] reqwest_middleware::Error),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("response contained no output text")]
    EmptyOutput,

    #[error("response failed validation: {0}")]
    Invalid(String),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Turns computed metrics into a narrative report.
#[async_trait]
pub trait Narrator: Send + Sync {
    async fn generate(&self, input: &NarrativeInput) -> Result<NarrativeResponse, NarrativeError>;

    /// Short identifier stored with the report, e.g. the model name.
    fn name(&self) -> &str;
}

/// Narrator used when generation is switched off; every call falls back.
#[derive(Debug, Default, Clone)]
pub struct DisabledNarrator;

#[async_trait]
impl Narrator for DisabledNarrator {
    async fn generate(&self, _input: &NarrativeInput) -> Result<NarrativeResponse, NarrativeError> {
        Err(NarrativeError::Disabled)
    }

    fn name(&self) -> &str {
        "disabled"
    }
}

/// Picks the narrator for a process. A client that cannot be built is
/// logged and replaced by [`DisabledNarrator`] so reports still come out.
pub fn build_narrator(config: &NarrativeConfig) -> Arc<dyn Narrator> {
    if !config.enabled {
        info!("Narrative generation disabled, reports will use the rule-based text");
        return Arc::new(DisabledNarrator);
    }
    if config.api_key.is_none() {
        warn!("OPENAI_API_KEY is not set; every report will fall back");
    }
    match OpenAiNarrator::new(config) {
        Ok(narrator) => {
            info!(model = %config.model, "Narrative client ready");
            Arc::new(narrator)
        }
        Err(e) => {
            warn!(error = %e, "Could not build narrative client, falling back to rules");
            Arc::new(DisabledNarrator)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_config_yields_disabled_narrator() {
        let config = NarrativeConfig { enabled: false, ..NarrativeConfig::default() };
        assert_eq!(build_narrator(&config).name(), "disabled");
    }

    #[test]
    fn enabled_config_uses_model_name() {
        let config = NarrativeConfig {
            api_key: Some("sk-test".into()),
            model: "test-model".into(),
            ..NarrativeConfig::default()
        };
        assert_eq!(build_narrator(&config).name(), "test-model");
    }
}

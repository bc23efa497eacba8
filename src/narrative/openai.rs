use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota};
use nonzero_ext::*;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use super::prompts::{SCHEMA_NAME, SYSTEM_PROMPT, response_schema};
use super::{NarrativeError, NarrativeInput, NarrativeResponse, Narrator};
use crate::config::NarrativeConfig;

struct ModelRateLimiter {
    rate_limiter: Arc<DefaultDirectRateLimiter>,
}

impl reqwest_ratelimit::RateLimiter for ModelRateLimiter {
    async fn acquire_permit(&self) {
        self.rate_limiter.until_ready().await;
    }
}

/// Subset of the Responses API body we read.
#[derive(Debug, Deserialize)]
struct ResponsesApiResponse {
    #[serde(default)]
    output: Vec<OutputItem>,
}

#[derive(Debug, Deserialize)]
struct OutputItem {
    #[serde(default)]
    content: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
struct ContentPart {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

/// Narrator backed by the OpenAI Responses API with structured output.
#[derive(Debug, Clone)]
pub struct OpenAiNarrator {
    http_client: ClientWithMiddleware,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl OpenAiNarrator {
    pub fn new(config: &NarrativeConfig) -> Result<Self, NarrativeError> {
        let reqwest_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(5))
            .build()?;

        let retry_policy = ExponentialBackoff::builder()
            .retry_bounds(Duration::from_millis(500), Duration::from_secs(4))
            .build_with_max_retries(config.max_retries);

        let rate_limiter = ModelRateLimiter {
            rate_limiter: Arc::new(DefaultDirectRateLimiter::direct(Quota::per_second(nonzero!(2u32)))),
        };

        let http_client = ClientBuilder::new(reqwest_client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .with(reqwest_ratelimit::all(rate_limiter))
            .build();

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }

    fn request_body(&self, input: &NarrativeInput) -> Result<serde_json::Value, NarrativeError> {
        Ok(json!({
            "model": self.model,
            "input": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": serde_json::to_string(input)? },
            ],
            "text": {
                "format": {
                    "type": "json_schema",
                    "name": SCHEMA_NAME,
                    "strict": true,
                    "schema": response_schema(),
                }
            }
        }))
    }
}

#[async_trait]
impl Narrator for OpenAiNarrator {
    #[instrument(skip(self, input), fields(month = %input.month, projects = input.projects.len()))]
    async fn generate(&self, input: &NarrativeInput) -> Result<NarrativeResponse, NarrativeError> {
        let api_key = self.api_key.as_deref().ok_or(NarrativeError::MissingCredentials)?;
        let url = Url::parse(&format!("{}/responses", self.base_url))?;
        let body = self.request_body(input)?;

        let response = self
            .http_client
            .post(url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let raw = response.text().await?;
        if !status.is_success() {
            return Err(NarrativeError::Status {
                status: status.as_u16(),
                body: raw.chars().take(500).collect(),
            });
        }

        let parsed: ResponsesApiResponse = serde_json::from_str(&raw)?;
        let text = extract_output_text(&parsed).ok_or(NarrativeError::EmptyOutput)?;
        debug!(chars = text.len(), "Received structured narrative");

        let narrative: NarrativeResponse = serde_json::from_str(&text)?;
        narrative.validate()
    }

    fn name(&self) -> &str {
        &self.model
    }
}

/// Concatenates every `output_text` part. `None` when there is nothing.
fn extract_output_text(response: &ResponsesApiResponse) -> Option<String> {
    let text: String = response
        .output
        .iter()
        .flat_map(|item| item.content.iter())
        .filter(|part| part.kind == "output_text")
        .filter_map(|part| part.text.as_deref())
        .collect();
    let text = text.trim();
    if text.is_empty() { None } else { Some(text.to_string()) }
}

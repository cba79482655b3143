// src/gemini/mod.rs
//! Gemini generateContent client.
//!
//! The relay talks to the model through the [`Upstream`] trait so handlers can
//! be exercised against a scripted upstream. [`GeminiClient`] is the real
//! implementation over reqwest. Each call is a single attempt bounded by the
//! configured timeout; failures are reported, never retried.

pub mod types;

pub use types::{
    GeminiCandidate, GeminiContent, GeminiError, GeminiGenerationConfig, GeminiPart,
    GeminiRequest, GeminiResponse,
};

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client as HttpClient;
use tracing::{debug, warn};

use crate::error::{RelayError, Result};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Longest slice of an upstream error body carried into the client message
const MAX_ERROR_BODY_CHARS: usize = 500;

/// The generation service the relay forwards prompts to.
#[async_trait]
pub trait Upstream: Send + Sync {
    async fn generate_content(
        &self,
        api_key: &str,
        request: &GeminiRequest,
    ) -> Result<GeminiResponse>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiConfig {
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

pub struct GeminiClient {
    client: HttpClient,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> anyhow::Result<Self> {
        let client = HttpClient::builder()
            .timeout(config.timeout)
            .build()
            .context("failed to build Gemini HTTP client")?;

        Ok(Self { client, config })
    }

    /// generateContent endpoint for the configured model (without the key)
    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl Upstream for GeminiClient {
    async fn generate_content(
        &self,
        api_key: &str,
        request: &GeminiRequest,
    ) -> Result<GeminiResponse> {
        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", api_key)])
            .json(request)
            .send()
            .await
            // The URL carries the API key, keep it out of messages and logs
            .map_err(|e| RelayError::Upstream(format!("request failed: {}", e.without_url())))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, model = %self.config.model, "Gemini returned an error status");
            return Err(RelayError::Upstream(format!(
                "{} - {}",
                status,
                truncate(&body, MAX_ERROR_BODY_CHARS)
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| RelayError::Upstream(format!("failed to read response: {}", e.without_url())))?;

        let parsed: GeminiResponse = serde_json::from_slice(&bytes)
            .map_err(|e| RelayError::Upstream(format!("malformed response: {}", e)))?;

        if let Some(error) = &parsed.error {
            return Err(RelayError::Upstream(error.describe()));
        }

        debug!(
            candidates = parsed.candidates.len(),
            bytes = bytes.len(),
            "Gemini response decoded"
        );
        Ok(parsed)
    }
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

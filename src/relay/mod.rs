// src/relay/mod.rs
//! Chat relay pipeline.
//!
//! credential pre-flight → validation → persona → prompt → Gemini → reply.
//! Each request is handled independently; the only shared state in the
//! process is the admission controller, which runs before this.

pub mod types;

pub use types::{ChatReply, ChatRequest};

use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::error::{RelayError, Result};
use crate::gemini::{GeminiGenerationConfig, GeminiRequest, Upstream};
use crate::persona::Persona;
use crate::prompt::compose_prompt;

/// Reply used when Gemini answers with nothing to say
pub const FALLBACK_REPLY: &str = "No joo... Gemini ei nyt sanonut mitään. Kyllä se siitä.";

pub const MISSING_KEY_MESSAGE: &str = "GEMINI_API_KEY puuttuu palvelimelta.";
pub const MISSING_MESSAGE: &str = "Missing message.";

pub const DEFAULT_TEMPERATURE: f32 = 0.9;
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 250;

/// Fixed generation parameters and input limits
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelaySettings {
    pub temperature: f32,
    pub max_output_tokens: u32,
    /// Optional cap on message length in characters (MAX_MESSAGE_CHARS); off by default
    pub max_message_chars: Option<usize>,
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            max_message_chars: None,
        }
    }
}

pub struct RelayHandler {
    upstream: Arc<dyn Upstream>,
    api_key: Option<String>,
    settings: RelaySettings,
}

impl RelayHandler {
    /// A blank `api_key` counts as unset
    pub fn new(upstream: Arc<dyn Upstream>, api_key: Option<String>, settings: RelaySettings) -> Self {
        Self {
            upstream,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            settings,
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Turn an admitted request into a reply.
    pub async fn handle(&self, request: ChatRequest) -> Result<ChatReply> {
        // Checked before anything else so a misconfigured server never builds a prompt
        let Some(api_key) = self.api_key.as_deref() else {
            error!("GEMINI_API_KEY is not configured, rejecting chat request");
            return Err(RelayError::Configuration(MISSING_KEY_MESSAGE.to_string()));
        };

        let message = self.validate(request.message.as_deref())?;
        let persona = Persona::from_mode(request.mode.as_deref());
        let payload = GeminiRequest::single_turn(
            compose_prompt(persona, message),
            GeminiGenerationConfig {
                temperature: self.settings.temperature,
                max_output_tokens: self.settings.max_output_tokens,
            },
        );

        debug!(
            persona = %persona,
            message_chars = message.chars().count(),
            "Forwarding chat request to Gemini"
        );

        let response = self
            .upstream
            .generate_content(api_key, &payload)
            .await
            .inspect_err(|e| error!(error = %e, persona = %persona, "Gemini request failed"))?;

        let reply = match response.first_text() {
            Some(text) => text.to_string(),
            None => {
                warn!(
                    persona = %persona,
                    candidates = response.candidates.len(),
                    "Gemini returned no text, using fallback reply"
                );
                FALLBACK_REPLY.to_string()
            }
        };

        Ok(ChatReply { reply })
    }

    fn validate<'a>(&self, message: Option<&'a str>) -> Result<&'a str> {
        // Any non-empty string is a message, whitespace included
        let message = message
            .filter(|m| !m.is_empty())
            .ok_or_else(|| RelayError::InvalidInput(MISSING_MESSAGE.to_string()))?;

        if let Some(max) = self.settings.max_message_chars
            && message.chars().count() > max
        {
            return Err(RelayError::InvalidInput(format!(
                "Message too long (max {} characters).",
                max
            )));
        }

        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gemini::GeminiResponse;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records every request and answers with a fixed outcome
    struct ScriptedUpstream {
        reply: Option<GeminiResponse>,
        seen: Mutex<Vec<(String, GeminiRequest)>>,
    }

    impl ScriptedUpstream {
        fn replying(response: GeminiResponse) -> Arc<Self> {
            Arc::new(Self {
                reply: Some(response),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                reply: None,
                seen: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.seen.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Upstream for ScriptedUpstream {
        async fn generate_content(
            &self,
            api_key: &str,
            request: &GeminiRequest,
        ) -> Result<GeminiResponse> {
            self.seen
                .lock()
                .unwrap()
                .push((api_key.to_string(), request.clone()));
            self.reply
                .clone()
                .ok_or_else(|| RelayError::Upstream("500 Internal Server Error - boom".into()))
        }
    }

    fn handler(upstream: Arc<ScriptedUpstream>, key: Option<&str>) -> RelayHandler {
        RelayHandler::new(upstream, key.map(String::from), RelaySettings::default())
    }

    fn chat(message: &str, mode: Option<&str>) -> ChatRequest {
        ChatRequest {
            message: Some(message.to_string()),
            mode: mode.map(String::from),
        }
    }

    #[tokio::test]
    async fn test_reply_is_first_candidate_text() {
        let upstream = ScriptedUpstream::replying(GeminiResponse::from_text("Kyllä se siitä."));
        let relay = handler(upstream.clone(), Some("k"));

        let reply = relay.handle(chat("moi", None)).await.unwrap();
        assert_eq!(reply.reply, "Kyllä se siitä.");

        let seen = upstream.seen.lock().unwrap();
        let (key, request) = &seen[0];
        assert_eq!(key, "k");
        assert_eq!(request.generation_config.max_output_tokens, 250);
        assert!((request.generation_config.temperature - 0.9).abs() < f32::EPSILON);
        assert_eq!(
            request.prompt_text(),
            Some(compose_prompt(Persona::Default, "moi").as_str())
        );
    }

    #[tokio::test]
    async fn test_mode_selects_persona() {
        let upstream = ScriptedUpstream::replying(GeminiResponse::from_text("NOSTO!"));
        let relay = handler(upstream.clone(), Some("k"));

        relay.handle(chat("malja?", Some("sitsikapteeni"))).await.unwrap();

        let seen = upstream.seen.lock().unwrap();
        let prompt = seen[0].1.prompt_text().unwrap();
        assert!(prompt.starts_with(Persona::Sitsikapteeni.prompt()));
    }

    #[tokio::test]
    async fn test_unknown_mode_uses_baseline() {
        let upstream = ScriptedUpstream::replying(GeminiResponse::from_text("noni"));
        let relay = handler(upstream.clone(), Some("k"));

        let reply = relay.handle(chat("hello", Some("unknown-mode"))).await.unwrap();
        assert_eq!(reply.reply, "noni");

        let seen = upstream.seen.lock().unwrap();
        assert!(seen[0].1.prompt_text().unwrap().starts_with(Persona::Default.prompt()));
    }

    #[tokio::test]
    async fn test_empty_candidates_use_fallback() {
        let upstream = ScriptedUpstream::replying(GeminiResponse::default());
        let relay = handler(upstream, Some("k"));

        let reply = relay.handle(chat("moi", None)).await.unwrap();
        assert_eq!(reply.reply, FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn test_empty_message_is_invalid() {
        let upstream = ScriptedUpstream::replying(GeminiResponse::default());
        let relay = handler(upstream.clone(), Some("k"));

        let err = relay.handle(chat("", Some("x"))).await.unwrap_err();
        assert!(matches!(err, RelayError::InvalidInput(ref m) if m == MISSING_MESSAGE));
        let err = relay.handle(ChatRequest::default()).await.unwrap_err();
        assert!(matches!(err, RelayError::InvalidInput(_)));
        assert_eq!(upstream.calls(), 0);
    }

    #[tokio::test]
    async fn test_overlong_message_is_invalid() {
        let upstream = ScriptedUpstream::replying(GeminiResponse::default());
        let relay = RelayHandler::new(
            upstream.clone(),
            Some("k".into()),
            RelaySettings {
                max_message_chars: Some(5),
                ..RelaySettings::default()
            },
        );

        // Counted in characters, not bytes
        assert!(relay.handle(chat("ääääå", None)).await.is_ok());
        let err = relay.handle(chat("ääääåå", None)).await.unwrap_err();
        assert!(matches!(err, RelayError::InvalidInput(ref m) if m.contains("max 5")));
        assert_eq!(upstream.calls(), 1);
    }

    #[tokio::test]
    async fn test_whitespace_message_is_forwarded_verbatim() {
        let upstream = ScriptedUpstream::replying(GeminiResponse::from_text("Hiljaista."));
        let relay = handler(upstream.clone(), Some("k"));

        let reply = relay.handle(chat("   \n", None)).await.unwrap();
        assert_eq!(reply.reply, "Hiljaista.");

        let seen = upstream.seen.lock().unwrap();
        assert_eq!(
            seen[0].1.prompt_text(),
            Some(compose_prompt(Persona::Default, "   \n").as_str())
        );
    }

    #[tokio::test]
    async fn test_long_message_is_accepted_without_a_cap() {
        let upstream = ScriptedUpstream::replying(GeminiResponse::from_text("pitkä"));
        let relay = handler(upstream.clone(), Some("k"));

        let message = "a".repeat(10_000);
        assert!(relay.handle(chat(&message, None)).await.is_ok());
        assert_eq!(upstream.calls(), 1);
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_validation_and_upstream() {
        let upstream = ScriptedUpstream::replying(GeminiResponse::from_text("ei"));

        for key in [None, Some(""), Some("  ")] {
            let relay = handler(upstream.clone(), key);
            assert!(!relay.has_api_key());

            let err = relay.handle(chat("moi", None)).await.unwrap_err();
            assert!(matches!(err, RelayError::Configuration(ref m) if m == MISSING_KEY_MESSAGE));

            let err = relay.handle(ChatRequest::default()).await.unwrap_err();
            assert!(matches!(err, RelayError::Configuration(_)));
        }
        assert_eq!(upstream.calls(), 0);
    }

    #[tokio::test]
    async fn test_upstream_failure_is_not_retried() {
        let upstream = ScriptedUpstream::failing();
        let relay = handler(upstream.clone(), Some("k"));

        let err = relay.handle(chat("moi", None)).await.unwrap_err();
        assert!(matches!(err, RelayError::Upstream(_)));
        assert_eq!(upstream.calls(), 1);
    }
}

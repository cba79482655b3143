// src/gemini/types.rs
// Wire schema for Gemini generateContent (only the fields the relay uses)

use serde::{Deserialize, Deserializer, Serialize};

// ============================================================================
// Request
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeminiRequest {
    pub contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig")]
    pub generation_config: GeminiGenerationConfig,
}

impl GeminiRequest {
    /// One user turn carrying `text`
    pub fn single_turn(text: String, generation_config: GeminiGenerationConfig) -> Self {
        Self {
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart { text: Some(text) }],
            }],
            generation_config,
        }
    }

    /// Text of the first part of the first content block
    pub fn prompt_text(&self) -> Option<&str> {
        self.contents.first()?.parts.first()?.text.as_deref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeminiGenerationConfig {
    pub temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    pub max_output_tokens: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub parts: Vec<GeminiPart>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

// ============================================================================
// Response
// ============================================================================

/// Response envelope.
///
/// Every field is optional: Gemini omits `candidates` entirely when a prompt
/// is blocked, and a candidate may come back without content. Such envelopes
/// are well-formed but empty. A body that does not fit this shape at all
/// fails to decode.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GeminiResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub candidates: Vec<GeminiCandidate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<GeminiError>,
}

impl GeminiResponse {
    /// Generated text of the first candidate's first part, if non-empty
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()?
            .text
            .as_deref()
            .filter(|text| !text.is_empty())
    }

    /// Convenience constructor for a single-candidate text reply
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            candidates: vec![GeminiCandidate {
                content: Some(GeminiContent {
                    role: Some("model".to_string()),
                    parts: vec![GeminiPart {
                        text: Some(text.into()),
                    }],
                }),
            }],
            error: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GeminiCandidate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<GeminiContent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeminiError {
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: Option<String>,
}

impl GeminiError {
    /// Human-readable description: message, else status, else code
    pub fn describe(&self) -> String {
        if !self.message.trim().is_empty() {
            return self.message.clone();
        }
        match (&self.status, self.code) {
            (Some(status), _) if !status.trim().is_empty() => status.clone(),
            (_, Some(code)) => format!("error code {}", code),
            _ => "unknown error".to_string(),
        }
    }
}

/// Treats an explicit `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

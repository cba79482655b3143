// src/relay/types.rs
// Request/response bodies for POST /chat

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Body of `POST /chat`.
///
/// Decoding is lenient: a field that is absent, null or not a string decodes
/// as `None`. Rejecting a bad `message` is the relay's job (400), and a bad
/// `mode` simply selects the baseline persona.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default, deserialize_with = "string_or_none")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "string_or_none", skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
}

impl ChatRequest {
    /// Builds a request from an arbitrary JSON body.
    ///
    /// Only an object carries fields. Arrays, scalars and null are an empty
    /// request, so a positional array never fills `message` or `mode`.
    pub fn from_json(body: Value) -> Self {
        match body {
            Value::Object(_) => serde_json::from_value(body).unwrap_or_default(),
            _ => Self::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
}

fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

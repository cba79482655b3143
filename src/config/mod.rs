// src/config/mod.rs
// Environment-based configuration - single source of truth for all env vars

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use tracing::{info, warn};

use crate::admission::{AdmissionConfig, DEFAULT_WINDOW};
use crate::gemini::{DEFAULT_TIMEOUT_SECS, GeminiConfig};
use crate::relay::RelaySettings;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;

/// Everything the relay process needs, resolved once at startup.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    // ── Server
    pub host: String,
    pub port: u16,

    // ── Upstream
    /// GEMINI_API_KEY. Absence only fails `/chat` calls, not startup.
    pub gemini_api_key: Option<String>,
    pub gemini: GeminiConfig,
    pub relay: RelaySettings,

    // ── Admission
    pub admission: AdmissionConfig,
    /// Key clients by the first X-Forwarded-For entry (TRUST_FORWARDED_FOR)
    pub trust_forwarded_for: bool,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            gemini_api_key: None,
            gemini: GeminiConfig::default(),
            relay: RelaySettings::default(),
            admission: AdmissionConfig::default(),
            trust_forwarded_for: true,
        }
    }
}

impl RelayConfig {
    /// Load configuration from process environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Unset or blank variables keep their defaults; unparsable ones log a
    /// warning and keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let timeout_secs = parse_or(
            "UPSTREAM_TIMEOUT_SECS",
            read("UPSTREAM_TIMEOUT_SECS"),
            defaults.gemini.timeout.as_secs(),
        );
        let window_secs = parse_or(
            "RATE_LIMIT_WINDOW_SECS",
            read("RATE_LIMIT_WINDOW_SECS"),
            defaults.admission.window.as_secs(),
        );

        Self {
            host: read("HOST").unwrap_or(defaults.host),
            port: parse_or("PORT", read("PORT"), defaults.port),
            gemini_api_key: read("GEMINI_API_KEY"),
            gemini: GeminiConfig {
                base_url: read("GEMINI_BASE_URL").unwrap_or(defaults.gemini.base_url),
                model: read("GEMINI_MODEL").unwrap_or(defaults.gemini.model),
                timeout: Duration::from_secs(positive("UPSTREAM_TIMEOUT_SECS", timeout_secs, DEFAULT_TIMEOUT_SECS)),
            },
            relay: RelaySettings {
                temperature: finite(
                    "GEMINI_TEMPERATURE",
                    parse_or(
                        "GEMINI_TEMPERATURE",
                        read("GEMINI_TEMPERATURE"),
                        defaults.relay.temperature,
                    ),
                    defaults.relay.temperature,
                ),
                max_output_tokens: parse_or(
                    "GEMINI_MAX_OUTPUT_TOKENS",
                    read("GEMINI_MAX_OUTPUT_TOKENS"),
                    defaults.relay.max_output_tokens,
                ),
                max_message_chars: read("MAX_MESSAGE_CHARS")
                    .and_then(|v| parse_limit("MAX_MESSAGE_CHARS", &v)),
            },
            admission: AdmissionConfig {
                max_requests: parse_or(
                    "RATE_LIMIT_MAX_REQUESTS",
                    read("RATE_LIMIT_MAX_REQUESTS"),
                    defaults.admission.max_requests,
                ),
                window: Duration::from_secs(positive("RATE_LIMIT_WINDOW_SECS", window_secs, DEFAULT_WINDOW.as_secs())),
            },
            trust_forwarded_for: read("TRUST_FORWARDED_FOR")
                .and_then(|v| parse_bool("TRUST_FORWARDED_FOR", &v))
                .unwrap_or(defaults.trust_forwarded_for),
        }
    }

    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }

    /// Log the effective configuration (without exposing the key)
    pub fn log_summary(&self) {
        info!(
            host = %self.host,
            port = self.port,
            model = %self.gemini.model,
            timeout_secs = self.gemini.timeout.as_secs(),
            max_requests = self.admission.max_requests,
            window_secs = self.admission.window.as_secs(),
            trust_forwarded_for = self.trust_forwarded_for,
            "Relay configuration loaded"
        );

        if self.gemini_api_key.is_none() {
            warn!("GEMINI_API_KEY not set - /chat will answer 500 until it is configured");
        }
    }
}

fn parse_or<T: FromStr + std::fmt::Display>(name: &str, raw: Option<String>, default: T) -> T {
    let Some(raw) = raw else {
        return default;
    };

    match raw.parse::<T>() {
        Ok(value) => value,
        Err(_) => {
            warn!(
                env_var = name,
                value = %raw,
                default = %default,
                "Invalid value for environment variable, using default"
            );
            default
        }
    }
}

fn positive(name: &str, value: u64, default: u64) -> u64 {
    if value == 0 {
        warn!(env_var = name, default, "Zero is not allowed, using default");
        return default;
    }
    value
}

fn finite(name: &str, value: f32, default: f32) -> f32 {
    if !value.is_finite() {
        warn!(env_var = name, value = %value, default = %default, "Non-finite value, using default");
        return default;
    }
    value
}

/// Optional positive limit; unset, zero or unparsable means no limit
fn parse_limit(name: &str, value: &str) -> Option<usize> {
    match value.parse::<usize>() {
        Ok(0) => None,
        Ok(limit) => Some(limit),
        Err(_) => {
            warn!(env_var = name, value = %value, "Invalid limit, leaving it disabled");
            None
        }
    }
}

fn parse_bool(name: &str, value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => {
            warn!(env_var = name, value = %value, "Invalid boolean, using default");
            None
        }
    }
}

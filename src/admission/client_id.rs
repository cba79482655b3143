// src/admission/client_id.rs
// Derives the rate-limit key for an inbound request

use std::net::SocketAddr;

use axum::http::HeaderMap;

/// Key used when neither a forwarded header nor a peer address is available
pub const UNKNOWN_CLIENT: &str = "unknown";

const FORWARDED_FOR: &str = "x-forwarded-for";

/// Client id for admission control.
///
/// With `trust_forwarded` set, the first entry of `X-Forwarded-For` wins (the
/// original client as seen by the fronting proxy). Otherwise, or when the
/// header is missing or blank, the peer IP is used.
pub fn client_id(headers: &HeaderMap, peer: Option<SocketAddr>, trust_forwarded: bool) -> String {
    if trust_forwarded {
        let forwarded = headers
            .get(FORWARDED_FOR)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|first| !first.is_empty());

        if let Some(first) = forwarded {
            return first.to_string();
        }
    }

    peer.map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

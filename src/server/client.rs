//! Client address extraction for rate-limit bookkeeping.
//!
//! The limiter keys failure counters by network address. Behind a reverse
//! proxy the socket peer is the proxy, so the `X-Forwarded-For` header takes
//! precedence when present.

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;

/// Fallback key when neither a forwarding header nor socket peer info is
/// available (e.g. in `oneshot` tests without `ConnectInfo`).
const UNKNOWN_CLIENT: &str = "unknown";

/// The client's network address, as a rate-limiter key.
///
/// Resolution order:
/// 1. First entry of the `X-Forwarded-For` header
/// 2. IP of the connected socket peer ([`ConnectInfo`])
/// 3. `"unknown"`
///
/// Note that `X-Forwarded-For` is client-controlled unless a trusted proxy
/// strips it; deployments not behind a proxy should filter the header at the
/// edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientAddr(pub String);

impl ClientAddr {
    /// The extracted address as a limiter key.
    pub fn key(&self) -> &str {
        &self.0
    }
}

impl<S> FromRequestParts<S> for ClientAddr
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let forwarded = parts
            .headers
            .get("x-forwarded-for")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(|addr| addr.trim().to_string())
            .filter(|addr| !addr.is_empty());

        if let Some(addr) = forwarded {
            return Ok(ClientAddr(addr));
        }

        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string());

        Ok(ClientAddr(
            peer.unwrap_or_else(|| UNKNOWN_CLIENT.to_string()),
        ))
    }
}

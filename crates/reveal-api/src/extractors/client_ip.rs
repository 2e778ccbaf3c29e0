//! Client IP extractor
//!
//! Rate limiting is keyed by the caller's IP. Behind a proxy the socket peer
//! is the proxy, so the first hop of `x-forwarded-for` wins, then
//! `x-real-ip`; with neither header present the key degrades to a shared
//! `"unknown"` bucket.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
};
use std::convert::Infallible;

/// Best-effort client IP for rate-limit keying
#[derive(Debug, Clone)]
pub struct ClientIp(pub String);

impl ClientIp {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let forwarded = parts
            .headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());

        let real_ip = parts
            .headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty());

        let ip = forwarded
            .or(real_ip)
            .unwrap_or("unknown")
            .to_string();

        Ok(Self(ip))
    }
}

//! Server API seam
//!
//! The state machine talks to the server through the `StatusApi` trait so
//! tests can drive it without a network. `HttpStatusApi` is the real
//! transport over reqwest.

use async_trait::async_trait;
use reveal_core::{RevealPayload, VoteSide};
use serde::Deserialize;

/// Snapshot returned by the status endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteStatus {
    pub prince: i64,
    pub princess: i64,
    pub total: i64,
    pub is_revealed: bool,
    /// Server time in epoch milliseconds
    pub server_time: i64,
}

/// A verified token, tagged by scope
#[derive(Debug, Clone)]
pub enum VerifiedToken {
    Countdown(RevealPayload),
    Reveal(RevealPayload),
}

/// Result of a vote submission.
///
/// `AlreadyVoted` is a normal outcome, not an error: the caller reconciles
/// its local state to the side the server recorded.
#[derive(Debug, Clone)]
pub enum VoteOutcome {
    Accepted { prince: i64, princess: i64 },
    AlreadyVoted { previous: VoteSide },
}

/// Client-side API errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiClientError {
    #[error("invalid token")]
    InvalidToken,

    #[error("token expired")]
    TokenExpired,

    #[error("not found")]
    NotFound,

    #[error("rate limited")]
    RateLimited,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("server error: {0}")]
    Server(String),
}

/// Server operations the state machine depends on
#[async_trait]
pub trait StatusApi: Send + Sync {
    /// Verify a held token and return its payload and scope
    async fn verify_token(&self, token: &str) -> Result<VerifiedToken, ApiClientError>;

    /// Read the current vote status
    async fn fetch_status(&self, reveal_id: &str) -> Result<VoteStatus, ApiClientError>;

    /// Submit one vote for this device
    async fn submit_vote(
        &self,
        reveal_id: &str,
        side: VoteSide,
        device_id: &str,
    ) -> Result<VoteOutcome, ApiClientError>;
}

// ---------------------------------------------------------------------------
// HTTP transport
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VerifyWire {
    payload: RevealPayload,
    variant: String,
}

#[derive(Debug, Deserialize)]
struct CountsWire {
    prince: i64,
    princess: i64,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetailWire,
}

#[derive(Debug, Deserialize)]
struct ErrorDetailWire {
    code: String,
    message: String,
    #[serde(default)]
    details: Option<serde_json::Value>,
}

/// `StatusApi` over HTTP
#[derive(Debug, Clone)]
pub struct HttpStatusApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpStatusApi {
    /// Create a transport against a server base URL (no trailing slash)
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Map a non-success response onto the client error taxonomy
    async fn error_from(response: reqwest::Response) -> ApiClientError {
        let status = response.status();
        let envelope: Option<ErrorEnvelope> = response.json().await.ok();
        let Some(envelope) = envelope else {
            return ApiClientError::Server(format!("HTTP {status}"));
        };

        match envelope.error.code.as_str() {
            "INVALID_TOKEN" => ApiClientError::InvalidToken,
            "TOKEN_EXPIRED" => ApiClientError::TokenExpired,
            "NOT_FOUND" => ApiClientError::NotFound,
            "RATE_LIMIT_EXCEEDED" => ApiClientError::RateLimited,
            _ => ApiClientError::Server(envelope.error.message),
        }
    }
}

#[async_trait]
impl StatusApi for HttpStatusApi {
    async fn verify_token(&self, token: &str) -> Result<VerifiedToken, ApiClientError> {
        let response = self
            .client
            .post(self.url("/api/v1/tokens/verify"))
            .json(&serde_json::json!({ "token": token }))
            .send()
            .await
            .map_err(|e| ApiClientError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let wire: VerifyWire = response
            .json()
            .await
            .map_err(|e| ApiClientError::Transport(e.to_string()))?;

        if wire.variant == "countdown" {
            Ok(VerifiedToken::Countdown(wire.payload))
        } else {
            Ok(VerifiedToken::Reveal(wire.payload))
        }
    }

    async fn fetch_status(&self, reveal_id: &str) -> Result<VoteStatus, ApiClientError> {
        let response = self
            .client
            .get(self.url("/api/v1/votes"))
            .query(&[("revealId", reveal_id)])
            .send()
            .await
            .map_err(|e| ApiClientError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| ApiClientError::Transport(e.to_string()))
    }

    async fn submit_vote(
        &self,
        reveal_id: &str,
        side: VoteSide,
        device_id: &str,
    ) -> Result<VoteOutcome, ApiClientError> {
        let response = self
            .client
            .post(self.url("/api/v1/votes"))
            .json(&serde_json::json!({
                "revealId": reveal_id,
                "vote": side,
                "deviceId": device_id,
            }))
            .send()
            .await
            .map_err(|e| ApiClientError::Transport(e.to_string()))?;

        if response.status().is_success() {
            let counts: CountsWire = response
                .json()
                .await
                .map_err(|e| ApiClientError::Transport(e.to_string()))?;
            return Ok(VoteOutcome::Accepted {
                prince: counts.prince,
                princess: counts.princess,
            });
        }

        // A conflict carrying the recorded side is a reconcilable outcome
        if response.status() == reqwest::StatusCode::CONFLICT {
            let envelope: Option<ErrorEnvelope> = response.json().await.ok();
            if let Some(envelope) = envelope {
                if envelope.error.code == "ALREADY_VOTED" {
                    let previous = envelope
                        .error
                        .details
                        .as_ref()
                        .and_then(|d| d.get("previousVote"))
                        .and_then(|v| v.as_str())
                        .and_then(|s| s.parse().ok())
                        .unwrap_or(side);
                    return Ok(VoteOutcome::AlreadyVoted { previous });
                }
                return Err(ApiClientError::Server(envelope.error.message));
            }
            return Err(ApiClientError::Server("conflict".to_string()));
        }

        Err(Self::error_from(response).await)
    }
}

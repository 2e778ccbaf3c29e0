//! Dual-variant reveal tokens
//!
//! One reservation yields two signed tokens from the same secret: the
//! countdown token handed to guests and the reveal token kept by the owner.
//! On the wire they differ only by a `type: "countdown"` discriminator, so
//! verification surfaces a tagged union and callers must pattern-match before
//! trusting the scope.
//!
//! Verification is a pure function of the token string and the process
//! secret; no server-side session exists, which is what lets verification
//! scale horizontally.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use reveal_core::RevealPayload;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Fixed token lifetime: 30 days from issuance, independent of the payload's
/// `scheduledAt`, so a token stays usable well past the scheduled instant.
pub const TOKEN_TTL_SECONDS: i64 = 30 * 24 * 60 * 60;

/// Discriminator value carried by countdown tokens
const COUNTDOWN_VARIANT: &str = "countdown";

/// Wire-level claims: the flattened payload plus standard JWT fields
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    #[serde(flatten)]
    payload: RevealPayload,
    /// Present (as `"countdown"`) only on the guest-facing variant
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    variant: Option<String>,
    iat: i64,
    exp: i64,
}

/// Verified token contents, tagged by capability scope
#[derive(Debug, Clone, PartialEq)]
pub enum TokenClaims {
    /// Guest scope: watch the countdown, cast one vote
    Countdown(RevealPayload),
    /// Owner scope: drive the reveal presentation
    Reveal(RevealPayload),
}

impl TokenClaims {
    /// The payload regardless of scope
    #[must_use]
    pub fn payload(&self) -> &RevealPayload {
        match self {
            Self::Countdown(p) | Self::Reveal(p) => p,
        }
    }

    /// Variant name as used on the wire
    #[must_use]
    pub fn variant_name(&self) -> &'static str {
        match self {
            Self::Countdown(_) => COUNTDOWN_VARIANT,
            Self::Reveal(_) => "reveal",
        }
    }
}

/// Signer/verifier for both token variants
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenService {
    /// Create a token service from the process-wide signing secret
    #[must_use]
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Issue the guest-facing countdown token
    ///
    /// # Errors
    /// Returns an error if token encoding fails
    pub fn issue_countdown(&self, payload: &RevealPayload) -> Result<String, AppError> {
        self.encode(payload, Some(COUNTDOWN_VARIANT.to_string()))
    }

    /// Issue the owner-facing reveal token
    ///
    /// # Errors
    /// Returns an error if token encoding fails
    pub fn issue_reveal(&self, payload: &RevealPayload) -> Result<String, AppError> {
        self.encode(payload, None)
    }

    fn encode(&self, payload: &RevealPayload, variant: Option<String>) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            payload: payload.clone(),
            variant,
            iat: now.timestamp(),
            exp: (now + Duration::seconds(TOKEN_TTL_SECONDS)).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|_| AppError::Internal(anyhow::anyhow!("Failed to encode token")))
    }

    /// Decode and validate a token of either variant.
    ///
    /// # Errors
    /// `TokenExpired` when the signature is valid but `exp` has passed,
    /// `InvalidToken` for malformed structure or a bad signature. Callers
    /// rely on the distinction for "expired" vs "tampered" messaging.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, AppError> {
        let validation = Validation::default();

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::TokenExpired,
                _ => AppError::InvalidToken,
            })?;

        let claims = token_data.claims;
        if claims.variant.as_deref() == Some(COUNTDOWN_VARIANT) {
            Ok(TokenClaims::Countdown(claims.payload))
        } else {
            Ok(TokenClaims::Reveal(claims.payload))
        }
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reveal_core::{Gender, RevealId, RevealStyle};

    fn create_test_service() -> TokenService {
        TokenService::new("test-secret-key-that-is-long-enough")
    }

    fn payload() -> RevealPayload {
        RevealPayload {
            mother_name: "Mina".to_string(),
            father_name: "Jun".to_string(),
            baby_name: "Bean".to_string(),
            gender: Gender::Boy,
            due_date: Some("2026-10-01".to_string()),
            message: None,
            animation_type: RevealStyle::Fireworks,
            countdown_time: 5,
            is_multiple: false,
            babies_info: None,
            scheduled_at: "2026-09-01T12:00:00Z".to_string(),
            reveal_id: RevealId::from("aB3dEf9h"),
        }
    }

    #[test]
    fn test_countdown_round_trip() {
        let service = create_test_service();
        let token = service.issue_countdown(&payload()).unwrap();

        match service.verify(&token).unwrap() {
            TokenClaims::Countdown(p) => assert_eq!(p, payload()),
            TokenClaims::Reveal(_) => panic!("expected countdown variant"),
        }
    }

    #[test]
    fn test_reveal_round_trip() {
        let service = create_test_service();
        let token = service.issue_reveal(&payload()).unwrap();

        match service.verify(&token).unwrap() {
            TokenClaims::Reveal(p) => assert_eq!(p, payload()),
            TokenClaims::Countdown(_) => panic!("expected reveal variant"),
        }
    }

    #[test]
    fn test_variants_share_one_secret_but_differ() {
        let service = create_test_service();
        let countdown = service.issue_countdown(&payload()).unwrap();
        let reveal = service.issue_reveal(&payload()).unwrap();
        assert_ne!(countdown, reveal);
    }

    #[test]
    fn test_wrong_secret_is_invalid_token() {
        let issuer = create_test_service();
        let verifier = TokenService::new("a-completely-different-secret-value");

        let token = issuer.issue_countdown(&payload()).unwrap();
        assert!(matches!(
            verifier.verify(&token),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn test_garbage_is_invalid_token() {
        let service = create_test_service();
        assert!(matches!(
            service.verify("not.a.token"),
            Err(AppError::InvalidToken)
        ));
        assert!(matches!(service.verify(""), Err(AppError::InvalidToken)));
    }

    #[test]
    fn test_expired_token_is_distinguished() {
        // Hand-roll claims whose exp is already in the past
        let service = create_test_service();
        let now = Utc::now();
        let claims = Claims {
            payload: payload(),
            variant: Some(COUNTDOWN_VARIANT.to_string()),
            iat: (now - Duration::days(40)).timestamp(),
            exp: (now - Duration::days(10)).timestamp(),
        };
        let token = encode(&Header::default(), &claims, &service.encoding_key).unwrap();

        assert!(matches!(
            service.verify(&token),
            Err(AppError::TokenExpired)
        ));
    }

    #[test]
    fn test_expiry_is_fixed_thirty_days() {
        let service = create_test_service();
        let before = Utc::now().timestamp();
        let token = service.issue_reveal(&payload()).unwrap();

        // Decode without the service to inspect raw claims
        let data = decode::<Claims>(
            &token,
            &service.decoding_key,
            &Validation::default(),
        )
        .unwrap();
        let lifetime = data.claims.exp - data.claims.iat;
        assert_eq!(lifetime, TOKEN_TTL_SECONDS);
        assert!(data.claims.iat >= before);
    }
}

//! Reservation service
//!
//! Orchestrates the creation path: rate limit, lead-time validation, unique
//! id allocation, ledger initialization, and dual-token issuance. The rate
//! limit check runs before any mutation so a rejected request performs no
//! writes.

use chrono::{DateTime, Duration, Utc};
use reveal_cache::RateLimitClass;
use reveal_common::{AppError, AppResult};
use reveal_core::RevealId;
use tracing::{info, instrument, warn};

use crate::dto::{CreateReservationRequest, CreateReservationResponse};

use super::context::ServiceContext;

/// Required lead time between creation and the scheduled instant
fn min_lead() -> Duration {
    Duration::hours(1)
}

/// How long a reservation outlives its scheduled instant (30 days)
fn retention() -> Duration {
    Duration::days(30)
}

/// Collision retries for id allocation. Collisions are astronomically rare
/// over 62^8 ids; the loop is defense-in-depth, not the uniqueness guarantee.
const MAX_ID_ATTEMPTS: u32 = 3;

/// Reservation service
pub struct ReservationService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ReservationService<'a> {
    /// Create a new ReservationService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a reservation and issue both tokens
    #[instrument(skip(self, request))]
    pub async fn create(
        &self,
        ip: &str,
        request: CreateReservationRequest,
    ) -> AppResult<CreateReservationResponse> {
        if !self
            .ctx
            .rate_limiter()
            .allow(RateLimitClass::CreateReservation, ip)
            .await
        {
            return Err(AppError::RateLimitExceeded);
        }

        let now = Utc::now();
        let scheduled_at = parse_scheduled_at(&request.scheduled_at)?;
        if scheduled_at <= now + min_lead() {
            return Err(AppError::validation(
                "scheduledAt must be more than one hour in the future",
            ));
        }

        let reveal_id = self.allocate_reveal_id().await?;

        let ttl_seconds = (scheduled_at + retention() - now).num_seconds();
        self.ctx.ledger().init(&reveal_id, ttl_seconds).await?;

        let payload = request.into_payload(reveal_id.clone());
        let countdown_token = self.ctx.tokens().issue_countdown(&payload)?;
        let reveal_token = self.ctx.tokens().issue_reveal(&payload)?;

        info!(
            reveal_id = %reveal_id,
            scheduled_at = %payload.scheduled_at,
            ttl_seconds,
            "Reservation created"
        );

        Ok(CreateReservationResponse {
            reveal_id,
            countdown_token,
            reveal_token,
        })
    }

    /// Generate an id and check it against the live ledgers, retrying a
    /// bounded number of times on collision
    async fn allocate_reveal_id(&self) -> AppResult<RevealId> {
        for attempt in 1..=MAX_ID_ATTEMPTS {
            let candidate = self.ctx.id_generator().generate();
            if !self.ctx.ledger().exists(&candidate).await? {
                return Ok(candidate);
            }
            warn!(attempt, reveal_id = %candidate, "reveal id collision, retrying");
        }
        Err(AppError::IdAllocation)
    }
}

fn parse_scheduled_at(raw: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| AppError::validation("scheduledAt must be an RFC 3339 timestamp"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::feedback::LogFeedbackSink;
    use reveal_cache::MemoryKv;
    use reveal_common::{TokenClaims, TokenService};
    use reveal_core::{IdGenerator, RandomIdGenerator};
    use std::sync::Arc;

    fn context() -> ServiceContext {
        context_with_generator(Arc::new(RandomIdGenerator))
    }

    fn context_with_generator(id_generator: Arc<dyn IdGenerator>) -> ServiceContext {
        ServiceContext::new(
            Arc::new(MemoryKv::new()),
            Arc::new(TokenService::new("test-secret-key-that-is-long-enough")),
            id_generator,
            Arc::new(LogFeedbackSink),
        )
    }

    fn request(scheduled_at: DateTime<Utc>) -> CreateReservationRequest {
        serde_json::from_value(serde_json::json!({
            "motherName": "Mina",
            "fatherName": "Jun",
            "babyName": "Bean",
            "gender": "girl",
            "animationType": "confetti",
            "scheduledAt": scheduled_at.to_rfc3339()
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_issues_two_distinct_tokens() {
        let ctx = context();
        let service = ReservationService::new(&ctx);
        let scheduled = Utc::now() + Duration::hours(2);

        let response = service.create("1.2.3.4", request(scheduled)).await.unwrap();

        assert_eq!(response.reveal_id.as_str().len(), 8);
        assert_ne!(response.countdown_token, response.reveal_token);

        // Countdown token carries the discriminator and the allocated id
        match ctx.tokens().verify(&response.countdown_token).unwrap() {
            TokenClaims::Countdown(payload) => {
                assert_eq!(payload.reveal_id, response.reveal_id);
            }
            TokenClaims::Reveal(_) => panic!("expected countdown variant"),
        }
        match ctx.tokens().verify(&response.reveal_token).unwrap() {
            TokenClaims::Reveal(payload) => {
                assert_eq!(payload.reveal_id, response.reveal_id);
            }
            TokenClaims::Countdown(_) => panic!("expected reveal variant"),
        }

        // Ledger initialized with zeroed counters
        let counts = ctx.ledger().counts(&response.reveal_id).await.unwrap();
        assert_eq!(counts.total(), 0);
    }

    #[tokio::test]
    async fn test_lead_time_under_one_hour_rejected() {
        let ctx = context();
        let service = ReservationService::new(&ctx);

        let too_soon = Utc::now() + Duration::minutes(59);
        assert!(matches!(
            service.create("1.2.3.4", request(too_soon)).await,
            Err(AppError::Validation(_))
        ));

        let in_the_past = Utc::now() - Duration::hours(1);
        assert!(matches!(
            service.create("1.2.3.4", request(in_the_past)).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_unparseable_schedule_rejected() {
        let ctx = context();
        let service = ReservationService::new(&ctx);

        let mut bad = request(Utc::now() + Duration::hours(2));
        bad.scheduled_at = "next tuesday".to_string();
        assert!(matches!(
            service.create("1.2.3.4", bad).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_sixth_create_from_one_ip_rate_limited() {
        let ctx = context();
        let service = ReservationService::new(&ctx);
        let scheduled = Utc::now() + Duration::hours(2);

        for _ in 0..5 {
            service.create("5.5.5.5", request(scheduled)).await.unwrap();
        }
        assert!(matches!(
            service.create("5.5.5.5", request(scheduled)).await,
            Err(AppError::RateLimitExceeded)
        ));

        // A different IP is unaffected
        service.create("6.6.6.6", request(scheduled)).await.unwrap();
    }

    #[tokio::test]
    async fn test_persistent_collision_exhausts_retries() {
        struct StuckGenerator;
        impl IdGenerator for StuckGenerator {
            fn generate(&self) -> RevealId {
                RevealId::from("SameIdAA")
            }
        }

        let ctx = context_with_generator(Arc::new(StuckGenerator));
        // Occupy the only id the generator will ever produce
        ctx.ledger()
            .init(&RevealId::from("SameIdAA"), 3600)
            .await
            .unwrap();

        let service = ReservationService::new(&ctx);
        let scheduled = Utc::now() + Duration::hours(2);
        assert!(matches!(
            service.create("1.2.3.4", request(scheduled)).await,
            Err(AppError::IdAllocation)
        ));
    }
}

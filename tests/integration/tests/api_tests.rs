//! End-to-end API tests over the in-memory store

use chrono::{Duration, Utc};
use integration_tests::fixtures::{
    reservation_body, reservation_body_at, vote_body, vote_body_for_device,
};
use integration_tests::TestServer;
use reveal_core::RevealId;
use serde_json::Value;

#[tokio::test]
async fn test_end_to_end_reservation_and_vote_flow() {
    let server = TestServer::start().await.unwrap();

    // Create a reservation two hours out
    let response = server
        .post_json("/api/v1/reservations", &reservation_body())
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    let created: Value = response.json().await.unwrap();

    let reveal_id = created["revealId"].as_str().unwrap().to_string();
    let countdown_token = created["countdownToken"].as_str().unwrap().to_string();
    let reveal_token = created["revealToken"].as_str().unwrap().to_string();
    assert_eq!(reveal_id.len(), 8);
    assert_ne!(countdown_token, reveal_token);

    // Countdown token verifies to its variant and carries the reveal id
    let response = server
        .post_json(
            "/api/v1/tokens/verify",
            &serde_json::json!({ "token": countdown_token }),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let verified: Value = response.json().await.unwrap();
    assert_eq!(verified["variant"], "countdown");
    assert_eq!(verified["payload"]["revealId"], reveal_id.as_str());
    assert_eq!(verified["payload"]["babyName"], "Bean");

    // Reveal token is the other variant
    let response = server
        .post_json(
            "/api/v1/tokens/verify",
            &serde_json::json!({ "token": reveal_token }),
        )
        .await
        .unwrap();
    let verified: Value = response.json().await.unwrap();
    assert_eq!(verified["variant"], "reveal");

    // Fresh ledger reads all zeros
    let response = server
        .get(&format!("/api/v1/votes?revealId={reveal_id}"))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let status: Value = response.json().await.unwrap();
    assert_eq!(status["prince"], 0);
    assert_eq!(status["princess"], 0);
    assert_eq!(status["total"], 0);
    assert_eq!(status["isRevealed"], false);
    assert!(status["serverTime"].as_i64().unwrap() > 0);

    // First vote counts
    let device = uuid::Uuid::new_v4().to_string();
    let response = server
        .post_json(
            "/api/v1/votes",
            &vote_body_for_device(&reveal_id, "prince", &device),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let counts: Value = response.json().await.unwrap();
    assert_eq!(counts["prince"], 1);
    assert_eq!(counts["princess"], 0);

    // The identical repeat conflicts and surfaces the original side
    let response = server
        .post_json(
            "/api/v1/votes",
            &vote_body_for_device(&reveal_id, "prince", &device),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), 409);
    let error: Value = response.json().await.unwrap();
    assert_eq!(error["error"]["code"], "ALREADY_VOTED");
    assert_eq!(error["error"]["details"]["previousVote"], "prince");

    // Still exactly one counted vote
    let response = server
        .get(&format!("/api/v1/votes?revealId={reveal_id}"))
        .await
        .unwrap();
    let status: Value = response.json().await.unwrap();
    assert_eq!(status["total"], 1);
}

#[tokio::test]
async fn test_reservation_validation_errors() {
    let server = TestServer::start().await.unwrap();

    // Less than one hour of lead time
    let response = server
        .post_json(
            "/api/v1/reservations",
            &reservation_body_at(Utc::now() + Duration::minutes(30)),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    let error: Value = response.json().await.unwrap();
    assert_eq!(error["error"]["code"], "VALIDATION_ERROR");

    // Missing required fields
    let response = server
        .post_json(
            "/api/v1/reservations",
            &serde_json::json!({ "motherName": "Mina" }),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    // Empty name fails shape validation
    let mut body = reservation_body();
    body["babyName"] = Value::String(String::new());
    let response = server
        .post_json("/api/v1/reservations", &body)
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_garbage_token_is_unauthorized() {
    let server = TestServer::start().await.unwrap();

    let response = server
        .post_json(
            "/api/v1/tokens/verify",
            &serde_json::json!({ "token": "not.a.token" }),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), 401);
    let error: Value = response.json().await.unwrap();
    assert_eq!(error["error"]["code"], "INVALID_TOKEN");
}

#[tokio::test]
async fn test_unknown_reveal_id_is_not_found() {
    let server = TestServer::start().await.unwrap();

    let response = server.get("/api/v1/votes?revealId=gone1234").await.unwrap();
    assert_eq!(response.status(), 404);

    let response = server
        .post_json("/api/v1/votes", &vote_body("gone1234", "princess"))
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
    let error: Value = response.json().await.unwrap();
    assert_eq!(error["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_vote_requires_uuid_device_id() {
    let server = TestServer::start().await.unwrap();

    let response = server
        .post_json(
            "/api/v1/votes",
            &vote_body_for_device("whatever1", "prince", "not-a-uuid"),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_sixth_reservation_from_one_ip_is_rate_limited() {
    let server = TestServer::start().await.unwrap();

    for _ in 0..5 {
        let response = server
            .post_json_from("/api/v1/reservations", &reservation_body(), "198.51.100.7")
            .await
            .unwrap();
        assert_eq!(response.status(), 201);
    }

    let response = server
        .post_json_from("/api/v1/reservations", &reservation_body(), "198.51.100.7")
        .await
        .unwrap();
    assert_eq!(response.status(), 429);
    let error: Value = response.json().await.unwrap();
    assert_eq!(error["error"]["code"], "RATE_LIMIT_EXCEEDED");

    // Another IP still goes through
    let response = server
        .post_json_from("/api/v1/reservations", &reservation_body(), "198.51.100.8")
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
}

#[tokio::test]
async fn test_status_reports_reveal_performed_elsewhere() {
    let server = TestServer::start().await.unwrap();

    let response = server
        .post_json("/api/v1/reservations", &reservation_body())
        .await
        .unwrap();
    let created: Value = response.json().await.unwrap();
    let reveal_id = created["revealId"].as_str().unwrap().to_string();

    // The reveal presentation (out of band here) flips the flag
    server
        .ledger()
        .mark_revealed(&RevealId::from(reveal_id.as_str()))
        .await
        .unwrap();

    let response = server
        .get(&format!("/api/v1/votes?revealId={reveal_id}"))
        .await
        .unwrap();
    let status: Value = response.json().await.unwrap();
    assert_eq!(status["isRevealed"], true);
}

#[tokio::test]
async fn test_feedback_accepted_and_validated() {
    let server = TestServer::start().await.unwrap();

    let response = server
        .post_json(
            "/api/v1/feedback",
            &serde_json::json!({ "rating": 5, "comment": "lovely" }),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), 204);

    let response = server
        .post_json("/api/v1/feedback", &serde_json::json!({ "rating": 0 }))
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_health_endpoints() {
    let server = TestServer::start().await.unwrap();

    let response = server.get("/health").await.unwrap();
    assert_eq!(response.status(), 200);

    let response = server.get("/health/ready").await.unwrap();
    assert_eq!(response.status(), 200);
}

//! End-to-end tests driving the client state machine against a live server

use std::sync::Arc;
use std::time::Duration;

use integration_tests::fixtures::reservation_body;
use integration_tests::TestServer;
use reveal_client::{
    ClientEvent, ClientState, CountdownController, DeviceStore, HttpStatusApi, MemoryDeviceStore,
    Phase,
};
use reveal_core::{RevealId, VoteSide};
use serde_json::Value;
use tokio::sync::watch;

async fn wait_until(
    state: &mut watch::Receiver<ClientState>,
    what: &str,
    predicate: impl Fn(&ClientState) -> bool,
) {
    tokio::time::timeout(Duration::from_secs(15), async {
        loop {
            if predicate(&state.borrow()) {
                return;
            }
            state.changed().await.expect("driver dropped");
        }
    })
    .await
    .unwrap_or_else(|_| panic!("timed out waiting for {what}"));
}

async fn create_reservation(server: &TestServer) -> (String, String, String) {
    let response = server
        .post_json("/api/v1/reservations", &reservation_body())
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    let created: Value = response.json().await.unwrap();
    (
        created["revealId"].as_str().unwrap().to_string(),
        created["countdownToken"].as_str().unwrap().to_string(),
        created["revealToken"].as_str().unwrap().to_string(),
    )
}

#[tokio::test]
async fn test_client_counts_down_votes_and_sees_the_reveal() {
    let server = TestServer::start().await.unwrap();
    let (reveal_id, countdown_token, _) = create_reservation(&server).await;

    let api = Arc::new(HttpStatusApi::new(server.base_url()));
    let device = Arc::new(MemoryDeviceStore::new());
    let controller =
        CountdownController::start(api, device.clone(), countdown_token);
    let mut state = controller.state();

    // Token verifies, countdown starts, first poll lands
    wait_until(&mut state, "countdown with a poll result", |s| {
        s.phase == Phase::Countdown && s.votes.is_some()
    })
    .await;
    let snapshot = state.borrow().clone();
    assert_eq!(snapshot.votes.unwrap().total, 0);
    assert!(!snapshot.remaining.unwrap().is_expired);

    // Cast one vote and watch it confirm
    controller.cast_vote(VoteSide::Princess);
    wait_until(&mut state, "vote confirmation", |s| s.has_voted).await;
    assert_eq!(state.borrow().my_vote, Some(VoteSide::Princess));
    assert_eq!(
        device.recorded_vote(&reveal_id),
        Some(VoteSide::Princess)
    );

    // The owner reveals elsewhere; the next poll preempts the countdown
    server
        .ledger()
        .mark_revealed(&RevealId::from(reveal_id.as_str()))
        .await
        .unwrap();
    wait_until(&mut state, "revealed", |s| s.phase == Phase::Revealed).await;

    controller.shutdown();
}

#[tokio::test]
async fn test_client_hands_off_owner_link_to_reveal_flow() {
    let server = TestServer::start().await.unwrap();
    let (_, _, reveal_token) = create_reservation(&server).await;

    let api = Arc::new(HttpStatusApi::new(server.base_url()));
    let device = Arc::new(MemoryDeviceStore::new());
    let mut controller = CountdownController::start(api, device, reveal_token);

    let event = tokio::time::timeout(Duration::from_secs(15), controller.next_event())
        .await
        .expect("no event")
        .expect("event channel closed");
    assert_eq!(event, ClientEvent::HandoffToReveal);
}

#[tokio::test]
async fn test_client_treats_garbage_link_as_terminal() {
    let server = TestServer::start().await.unwrap();

    let api = Arc::new(HttpStatusApi::new(server.base_url()));
    let device = Arc::new(MemoryDeviceStore::new());
    let mut controller = CountdownController::start(api, device, "not.a.token");

    let event = tokio::time::timeout(Duration::from_secs(15), controller.next_event())
        .await
        .expect("no event")
        .expect("event channel closed");
    assert_eq!(event, ClientEvent::LinkInvalid { expired: false });
    assert_eq!(controller.state().borrow().phase, Phase::Failed);
}

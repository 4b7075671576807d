//! Rate limiting integration tests.
//!
//! Tests verify:
//! - Repeated credential failures lock an address out, even for later
//!   correct credentials
//! - Lockouts are per-address and sticky
//! - Token guessing counts toward the same per-address counter
//! - Expiry rejections do not count as failures

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use tower::ServiceExt;

use gallery_gate::session::{Session, DEFAULT_FAILURE_THRESHOLD};

use super::test_utils::{
    body_message, create_request, mint_session, test_request_query, test_router,
    test_router_with_threshold, TEST_CLIENT, TEST_SECRET,
};

// =============================================================================
// Admin Lockout
// =============================================================================

#[tokio::test]
async fn test_failures_past_default_threshold_lock_out() {
    let (router, _store) = test_router();

    // One more failure than the threshold allows
    for _ in 0..(DEFAULT_FAILURE_THRESHOLD + 1) {
        let response = router
            .clone()
            .oneshot(create_request(TEST_CLIENT, Some("wrong-secret")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_message(response).await, "Not authenticated as admin");
    }

    // Even the correct credential is now rejected
    let response = router
        .oneshot(create_request(TEST_CLIENT, Some(TEST_SECRET)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_message(response).await, "Too many login attempts");
}

#[tokio::test]
async fn test_failures_at_threshold_still_allowed() {
    let (router, _store) = test_router_with_threshold(3);

    for _ in 0..3 {
        let _ = router
            .clone()
            .oneshot(create_request(TEST_CLIENT, Some("wrong-secret")))
            .await
            .unwrap();
    }

    // Exactly at the threshold: the correct credential still works
    let response = router
        .oneshot(create_request(TEST_CLIENT, Some(TEST_SECRET)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_lockout_is_sticky() {
    let (router, _store) = test_router_with_threshold(1);

    for _ in 0..2 {
        let _ = router
            .clone()
            .oneshot(create_request(TEST_CLIENT, Some("wrong-secret")))
            .await
            .unwrap();
    }

    // No decay: every subsequent attempt is rejected
    for _ in 0..5 {
        let response = router
            .clone()
            .oneshot(create_request(TEST_CLIENT, Some(TEST_SECRET)))
            .await
            .unwrap();
        assert_eq!(body_message(response).await, "Too many login attempts");
    }
}

#[tokio::test]
async fn test_lockout_is_per_address() {
    let (router, _store) = test_router_with_threshold(1);

    for _ in 0..2 {
        let _ = router
            .clone()
            .oneshot(create_request("203.0.113.1", Some("wrong-secret")))
            .await
            .unwrap();
    }

    // The locked address is rejected
    let response = router
        .clone()
        .oneshot(create_request("203.0.113.1", Some(TEST_SECRET)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // A different address is unaffected
    let response = router
        .oneshot(create_request("203.0.113.2", Some(TEST_SECRET)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// =============================================================================
// Token Guessing
// =============================================================================

#[tokio::test]
async fn test_token_guessing_locks_out_session_route() {
    let (router, _store) = test_router_with_threshold(2);

    for _ in 0..3 {
        let response = router
            .clone()
            .oneshot(test_request_query(TEST_CLIENT, "guess"))
            .await
            .unwrap();
        assert_eq!(body_message(response).await, "Invalid session");
    }

    let response = router
        .oneshot(test_request_query(TEST_CLIENT, "guess"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_message(response).await, "Too many login attempts");
}

#[tokio::test]
async fn test_counter_is_shared_across_routes() {
    let (router, _store) = test_router_with_threshold(1);

    // One credential failure, one token failure: combined count exceeds the
    // threshold
    let _ = router
        .clone()
        .oneshot(create_request(TEST_CLIENT, Some("wrong-secret")))
        .await
        .unwrap();
    let _ = router
        .clone()
        .oneshot(test_request_query(TEST_CLIENT, "guess"))
        .await
        .unwrap();

    let response = router
        .oneshot(create_request(TEST_CLIENT, Some(TEST_SECRET)))
        .await
        .unwrap();
    assert_eq!(body_message(response).await, "Too many login attempts");
}

// =============================================================================
// Expiry Is Not a Failure
// =============================================================================

#[tokio::test]
async fn test_expiry_does_not_count_toward_lockout() {
    let (router, store) = test_router_with_threshold(0);

    let session = mint_session(&router, TEST_CLIENT).await;
    store.overwrite(Session::issued_at(
        &session.id,
        Utc::now() - Duration::milliseconds(session.lifetime + 1),
        session.lifetime,
    ));

    // Threshold 0: a single recorded failure would lock the address out
    let response = router
        .clone()
        .oneshot(test_request_query(TEST_CLIENT, &session.id))
        .await
        .unwrap();
    assert_eq!(body_message(response).await, "Session expired");

    // The address can still mint a new session
    let response = router
        .oneshot(create_request(TEST_CLIENT, Some(TEST_SECRET)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

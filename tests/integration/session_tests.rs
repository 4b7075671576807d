//! Session lifecycle integration tests.
//!
//! Tests verify:
//! - Minting a session with the admin credential and using it
//! - Rejection of missing and wrong admin credentials
//! - Lazy expiry: deletion on the first post-expiry lookup
//! - The health endpoint is public

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use tower::ServiceExt;

use gallery_gate::session::{Session, DEFAULT_SESSION_LIFETIME_MS};

use super::test_utils::{
    body_message, create_request, mint_session, test_request_bare, test_request_query,
    test_router, TEST_CLIENT,
};

// =============================================================================
// Minting and Using Sessions
// =============================================================================

#[tokio::test]
async fn test_mint_then_use_session() {
    let (router, _store) = test_router();

    let session = mint_session(&router, TEST_CLIENT).await;
    assert!(!session.id.is_empty());
    assert_eq!(session.lifetime, DEFAULT_SESSION_LIFETIME_MS);
    assert!(session.issued_at_time().is_ok());

    let response = router
        .oneshot(test_request_query(TEST_CLIENT, &session.id))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_message(response).await, "Success!");
}

#[tokio::test]
async fn test_minted_sessions_are_unique() {
    let (router, store) = test_router();

    let first = mint_session(&router, TEST_CLIENT).await;
    let second = mint_session(&router, TEST_CLIENT).await;

    assert_ne!(first.id, second.id);
    assert_eq!(store.len(), 2);
}

// =============================================================================
// Admin Credential Rejection
// =============================================================================

#[tokio::test]
async fn test_create_without_credential_rejected() {
    let (router, store) = test_router();

    let response = router
        .oneshot(create_request(TEST_CLIENT, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_message(response).await, "Not authenticated as admin");
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_create_with_wrong_credential_rejected() {
    let (router, store) = test_router();

    let response = router
        .oneshot(create_request(TEST_CLIENT, Some("wrong-secret")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_message(response).await, "Not authenticated as admin");
    assert!(store.is_empty());
}

// =============================================================================
// Token Rejection
// =============================================================================

#[tokio::test]
async fn test_missing_token_rejected() {
    let (router, _store) = test_router();

    let response = router
        .oneshot(test_request_bare(TEST_CLIENT))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_message(response).await, "Missing smid");
}

#[tokio::test]
async fn test_unknown_token_rejected() {
    let (router, _store) = test_router();

    let response = router
        .oneshot(test_request_query(TEST_CLIENT, "no-such-session"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_message(response).await, "Invalid session");
}

// =============================================================================
// Lazy Expiry
// =============================================================================

#[tokio::test]
async fn test_expired_session_rejected_then_deleted() {
    let (router, store) = test_router();

    let session = mint_session(&router, TEST_CLIENT).await;

    // Back-date the record past its lifetime
    store.overwrite(Session::issued_at(
        &session.id,
        Utc::now() - Duration::milliseconds(session.lifetime + 1),
        session.lifetime,
    ));

    let response = router
        .clone()
        .oneshot(test_request_query(TEST_CLIENT, &session.id))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_message(response).await, "Session expired");

    // The lookup deleted the record, so a retry reports an unknown token
    assert!(store.is_empty());

    let response = router
        .oneshot(test_request_query(TEST_CLIENT, &session.id))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_message(response).await, "Invalid session");
}

// =============================================================================
// Health Endpoint
// =============================================================================

#[tokio::test]
async fn test_health_is_public() {
    let (router, _store) = test_router();

    let request = axum::http::Request::builder()
        .uri("/health")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "healthy");
}

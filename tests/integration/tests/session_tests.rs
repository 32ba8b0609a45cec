//! Session lifecycle against in-memory backends
//!
//! Run with: cargo test -p integration-tests --test session_tests

use std::sync::Arc;

use chrono::Duration;
use cinema_core::{Clock, DomainError};
use cinema_service::{
    LogoutRequest, MaintenanceService, RefreshTokenRequest, RegisterRequest, SessionService,
};
use integration_tests::*;

fn refresh_request(token: &str) -> RefreshTokenRequest {
    RefreshTokenRequest {
        refresh_token: token.to_string(),
    }
}

fn logout_request(token: &str) -> LogoutRequest {
    LogoutRequest {
        refresh_token: token.to_string(),
    }
}

// ============================================================================
// Registration and login
// ============================================================================

#[tokio::test]
async fn test_register_opens_session() {
    let harness = TestHarness::new();
    let email = unique_email();

    let auth = register(&harness, &email).await;

    assert_eq!(auth.member.email, email);
    assert_eq!(auth.token_type, "Bearer");
    assert_eq!(auth.expires_in, ACCESS_TTL_SECS);
    assert_eq!(
        harness
            .sessions
            .active_count(auth.member.id, harness.clock.now()),
        1
    );
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let harness = TestHarness::new();
    let email = unique_email();
    register(&harness, &email).await;

    let err = SessionService::new(&harness.ctx)
        .register(register_request(&email.to_uppercase()))
        .await
        .unwrap_err();

    assert!(matches!(err.as_domain(), Some(DomainError::EmailAlreadyExists)));
    assert_eq!(err.status_code(), 409);
}

#[tokio::test]
async fn test_register_weak_password() {
    let harness = TestHarness::new();

    let err = SessionService::new(&harness.ctx)
        .register(RegisterRequest {
            password: "alllowercase".to_string(),
            ..register_request(&unique_email())
        })
        .await
        .unwrap_err();

    assert!(matches!(err.as_domain(), Some(DomainError::WeakPassword(_))));
    assert!(harness.sessions.is_empty());
}

#[tokio::test]
async fn test_login_unknown_email_and_wrong_password_look_alike() {
    let harness = TestHarness::new();
    let email = unique_email();
    register(&harness, &email).await;
    let service = SessionService::new(&harness.ctx);

    let unknown = service
        .login(login_request(&unique_email(), PASSWORD))
        .await
        .unwrap_err();
    let wrong = service
        .login(login_request(&email, "WrongPass999"))
        .await
        .unwrap_err();

    assert_eq!(unknown.status_code(), 401);
    assert_eq!(wrong.status_code(), 401);
    assert_eq!(unknown.error_code(), wrong.error_code());
}

// ============================================================================
// Refresh
// ============================================================================

#[tokio::test]
async fn test_refresh_rotates_session() {
    let harness = TestHarness::new();
    let auth = register(&harness, &unique_email()).await;
    let service = SessionService::new(&harness.ctx);

    let rotated = service
        .refresh(refresh_request(&auth.refresh_token))
        .await
        .unwrap();
    assert_ne!(rotated.refresh_token, auth.refresh_token);

    // The old token is spent
    let err = service
        .refresh(refresh_request(&auth.refresh_token))
        .await
        .unwrap_err();
    assert!(matches!(err.as_domain(), Some(DomainError::TokenRevoked)));

    // The new one works
    assert!(service
        .refresh(refresh_request(&rotated.refresh_token))
        .await
        .is_ok());
}

#[tokio::test]
async fn test_logout_then_refresh_is_revoked() {
    let harness = TestHarness::new();
    let auth = register(&harness, &unique_email()).await;
    let service = SessionService::new(&harness.ctx);

    service
        .logout(logout_request(&auth.refresh_token))
        .await
        .unwrap();

    let err = service
        .refresh(refresh_request(&auth.refresh_token))
        .await
        .unwrap_err();
    assert!(matches!(err.as_domain(), Some(DomainError::TokenRevoked)));
    assert_eq!(err.status_code(), 401);
}

#[tokio::test]
async fn test_refresh_past_ttl_is_expired() {
    let harness = TestHarness::new();
    let auth = register(&harness, &unique_email()).await;

    harness.clock.advance(Duration::seconds(REFRESH_TTL_SECS + 1));

    let err = SessionService::new(&harness.ctx)
        .refresh(refresh_request(&auth.refresh_token))
        .await
        .unwrap_err();
    assert!(matches!(err.as_domain(), Some(DomainError::TokenExpired)));
}

#[tokio::test]
async fn test_refresh_unknown_token_is_not_found() {
    let harness = TestHarness::new();
    let service = SessionService::new(&harness.ctx);

    let err = service
        .refresh(refresh_request("garbage"))
        .await
        .unwrap_err();
    assert!(matches!(err.as_domain(), Some(DomainError::TokenNotFound)));

    // An access token is not a refresh token
    let auth = register(&harness, &unique_email()).await;
    let err = service
        .refresh(refresh_request(&auth.access_token))
        .await
        .unwrap_err();
    assert!(matches!(err.as_domain(), Some(DomainError::TokenNotFound)));
}

#[tokio::test]
async fn test_concurrent_refresh_succeeds_once() {
    let harness = Arc::new(TestHarness::new());
    let auth = register(&harness, &unique_email()).await;

    let mut handles = Vec::new();
    for _ in 0..6 {
        let harness = Arc::clone(&harness);
        let token = auth.refresh_token.clone();
        handles.push(tokio::spawn(async move {
            SessionService::new(&harness.ctx)
                .refresh(refresh_request(&token))
                .await
                .is_ok()
        }));
    }

    let mut successes = 0;
    for handle in handles {
        if handle.await.unwrap() {
            successes += 1;
        }
    }
    assert_eq!(successes, 1);
}

// ============================================================================
// Logout
// ============================================================================

#[tokio::test]
async fn test_logout_is_idempotent() {
    let harness = TestHarness::new();
    let auth = register(&harness, &unique_email()).await;
    let service = SessionService::new(&harness.ctx);

    service
        .logout(logout_request(&auth.refresh_token))
        .await
        .unwrap();
    service
        .logout(logout_request(&auth.refresh_token))
        .await
        .unwrap();
    service.logout(logout_request("garbage")).await.unwrap();
    service.logout(logout_request("")).await.unwrap();
}

#[tokio::test]
async fn test_logout_all_revokes_every_session() {
    let harness = TestHarness::new();
    let email = unique_email();
    let auth = register(&harness, &email).await;
    let service = SessionService::new(&harness.ctx);
    let second = service
        .login(login_request(&email, PASSWORD))
        .await
        .unwrap();

    let revoked = service.logout_all(auth.member.id).await.unwrap();
    assert_eq!(revoked, 2);

    for token in [&auth.refresh_token, &second.refresh_token] {
        let err = service.refresh(refresh_request(token)).await.unwrap_err();
        assert!(matches!(err.as_domain(), Some(DomainError::TokenRevoked)));
    }
}

// ============================================================================
// Access tokens
// ============================================================================

#[tokio::test]
async fn test_authenticate_access_token() {
    let harness = TestHarness::new();
    let auth = register(&harness, &unique_email()).await;
    let service = SessionService::new(&harness.ctx);

    let member = service.authenticate(&auth.access_token).unwrap();
    assert_eq!(member.member_id, auth.member.id);

    let current = service.current_member(member.member_id).await.unwrap();
    assert_eq!(current.email, auth.member.email);

    // Refresh tokens are not accepted as bearer credentials
    assert!(service.authenticate(&auth.refresh_token).is_err());

    harness.clock.advance(Duration::seconds(ACCESS_TTL_SECS));
    let err = service.authenticate(&auth.access_token).unwrap_err();
    assert_eq!(err.status_code(), 401);
    assert_eq!(err.error_code(), "TOKEN_EXPIRED");
}

// ============================================================================
// Purge
// ============================================================================

#[tokio::test]
async fn test_purge_removes_only_expired_sessions() {
    let harness = TestHarness::new();
    register(&harness, &unique_email()).await;

    harness.clock.advance(Duration::seconds(REFRESH_TTL_SECS / 2));
    register(&harness, &unique_email()).await;

    harness.clock.advance(Duration::seconds(REFRESH_TTL_SECS / 2 + 1));
    let report = MaintenanceService::new(&harness.ctx)
        .purge_expired()
        .await
        .unwrap();

    assert_eq!(report.sessions, 1);
    assert_eq!(harness.sessions.len(), 1);
}

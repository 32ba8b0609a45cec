//! Credential reset flow against in-memory backends
//!
//! Run with: cargo test -p integration-tests --test password_reset_tests

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::Duration;
use cinema_core::{Clock, DomainError, OtpStatus};
use cinema_service::{
    ChangePasswordRequest, MaintenanceService, PasswordResetRequest, PasswordResetService,
    ResetPolicy, SessionService,
};
use integration_tests::*;

fn reset_request(email: &str) -> PasswordResetRequest {
    PasswordResetRequest {
        email: email.to_string(),
    }
}

fn change_request(proof_token: &str, new_password: &str) -> ChangePasswordRequest {
    ChangePasswordRequest {
        proof_token: proof_token.to_string(),
        new_password: new_password.to_string(),
    }
}

// ============================================================================
// Issuing codes
// ============================================================================

#[tokio::test]
async fn test_second_request_supersedes_first() {
    let harness = TestHarness::new();
    let email = unique_email();
    register(&harness, &email).await;

    request_code(&harness, &email).await;
    request_code(&harness, &email).await;

    assert_eq!(harness.otps.outstanding_count(&email), 1);

    let now = harness.clock.now();
    let statuses: Vec<OtpStatus> = harness
        .otps
        .records_for(&email)
        .iter()
        .map(|otp| otp.status(now))
        .collect();
    assert_eq!(statuses.len(), 2);
    assert_eq!(
        statuses.iter().filter(|s| **s == OtpStatus::Superseded).count(),
        1
    );
    assert_eq!(
        statuses.iter().filter(|s| **s == OtpStatus::Active).count(),
        1
    );
}

#[tokio::test]
async fn test_issued_code_is_numeric_with_configured_length() {
    let harness = TestHarness::with_policy(ResetPolicy {
        code_length: 8,
        ..ResetPolicy::default()
    });
    let email = unique_email();
    register(&harness, &email).await;

    let code = request_code(&harness, &email).await;
    assert_eq!(code.len(), 8);
    assert!(code.chars().all(|c| c.is_ascii_digit()));
}

#[tokio::test]
async fn test_request_normalizes_email() {
    let harness = TestHarness::new();
    let email = unique_email();
    register(&harness, &email).await;

    PasswordResetService::new(&harness.ctx)
        .request_reset(reset_request(&format!("  {}  ", email.to_uppercase())))
        .await
        .unwrap();

    assert!(harness.delivery.last_code_for(&email).is_some());
}

#[tokio::test]
async fn test_malformed_email_is_rejected() {
    let harness = TestHarness::new();
    let err = PasswordResetService::new(&harness.ctx)
        .request_reset(reset_request("not-an-email"))
        .await
        .unwrap_err();

    assert!(matches!(err.as_domain(), Some(DomainError::InvalidEmail)));
    assert_eq!(err.status_code(), 400);
}

#[tokio::test]
async fn test_unknown_account_gets_uniform_answer() {
    let harness = TestHarness::new();
    let email = unique_email();

    let response = PasswordResetService::new(&harness.ctx)
        .request_reset(reset_request(&email))
        .await
        .unwrap();

    assert_eq!(response.expires_in, 300);
    assert_eq!(harness.delivery.sent_count(), 0);
    assert!(harness.otps.is_empty());
}

#[tokio::test]
async fn test_unknown_account_revealed_when_configured() {
    let harness = TestHarness::with_policy(ResetPolicy {
        reveal_unknown_accounts: true,
        ..ResetPolicy::default()
    });

    let err = PasswordResetService::new(&harness.ctx)
        .request_reset(reset_request(&unique_email()))
        .await
        .unwrap_err();

    assert!(matches!(err.as_domain(), Some(DomainError::AccountNotFound)));
    assert_eq!(err.status_code(), 404);
}

#[tokio::test]
async fn test_concurrent_requests_leave_one_active_code() {
    let harness = Arc::new(TestHarness::new());
    let email = unique_email();
    register(&harness, &email).await;

    let mut handles = Vec::new();
    for _ in 0..10 {
        let harness = Arc::clone(&harness);
        let email = email.clone();
        handles.push(tokio::spawn(async move {
            PasswordResetService::new(&harness.ctx)
                .request_reset(reset_request(&email))
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(harness.otps.outstanding_count(&email), 1);
    assert_eq!(harness.otps.records_for(&email).len(), 10);
}

// ============================================================================
// Delivery
// ============================================================================

#[tokio::test]
async fn test_delivery_failure_is_retryable() {
    let harness = TestHarness::with_delivery(ResetPolicy::default(), Arc::new(FailingDelivery));
    let email = unique_email();
    register(&harness, &email).await;

    let err = PasswordResetService::new(&harness.ctx)
        .request_reset(reset_request(&email))
        .await
        .unwrap_err();

    assert!(matches!(err.as_domain(), Some(DomainError::DeliveryFailure(_))));
    assert!(err.is_retryable());
    assert_eq!(err.status_code(), 503);
}

#[tokio::test]
async fn test_slow_delivery_times_out() {
    let policy = ResetPolicy {
        delivery_timeout: StdDuration::from_millis(50),
        ..ResetPolicy::default()
    };
    let harness = TestHarness::with_delivery(
        policy,
        Arc::new(SlowDelivery {
            delay: StdDuration::from_secs(5),
        }),
    );
    let email = unique_email();
    register(&harness, &email).await;

    let err = PasswordResetService::new(&harness.ctx)
        .request_reset(reset_request(&email))
        .await
        .unwrap_err();

    match err.as_domain() {
        Some(DomainError::DeliveryFailure(reason)) => assert!(reason.contains("timed out")),
        other => panic!("expected delivery failure, got {other:?}"),
    }
}

// ============================================================================
// Verifying codes
// ============================================================================

#[tokio::test]
async fn test_correct_code_verifies_exactly_once() {
    let harness = TestHarness::new();
    let email = unique_email();
    register(&harness, &email).await;
    let code = request_code(&harness, &email).await;

    let proof = verify(&harness, &email, &code).await.unwrap();
    assert_eq!(proof.proof_token.len(), 43);
    assert_eq!(proof.expires_in, 600);

    let err = verify(&harness, &email, &code).await.unwrap_err();
    assert!(matches!(err.as_domain(), Some(DomainError::CodeNotFound)));
}

#[tokio::test]
async fn test_code_past_ttl_is_expired() {
    let harness = TestHarness::new();
    let email = unique_email();
    register(&harness, &email).await;
    let code = request_code(&harness, &email).await;

    harness.clock.advance(Duration::seconds(301));

    let err = verify(&harness, &email, &code).await.unwrap_err();
    assert!(matches!(err.as_domain(), Some(DomainError::CodeExpired)));
    assert_eq!(err.status_code(), 401);

    // The expired record was discarded
    assert!(harness.otps.records_for(&email).is_empty());
    let err = verify(&harness, &email, &code).await.unwrap_err();
    assert!(matches!(err.as_domain(), Some(DomainError::CodeNotFound)));
}

#[tokio::test]
async fn test_code_expires_exactly_at_ttl() {
    let harness = TestHarness::new();
    let email = unique_email();
    register(&harness, &email).await;
    let code = request_code(&harness, &email).await;

    harness.clock.advance(Duration::seconds(300));

    let err = verify(&harness, &email, &code).await.unwrap_err();
    assert!(matches!(err.as_domain(), Some(DomainError::CodeExpired)));
}

#[tokio::test]
async fn test_code_verifies_just_before_ttl() {
    let harness = TestHarness::new();
    let email = unique_email();
    register(&harness, &email).await;
    let code = request_code(&harness, &email).await;

    harness.clock.advance(Duration::seconds(299));

    assert!(verify(&harness, &email, &code).await.is_ok());
}

#[tokio::test]
async fn test_superseded_code_is_not_found() {
    let harness = TestHarness::new();
    let email = unique_email();
    register(&harness, &email).await;

    let first = request_code(&harness, &email).await;
    let mut second = request_code(&harness, &email).await;
    while second == first {
        second = request_code(&harness, &email).await;
    }

    let err = verify(&harness, &email, &first).await.unwrap_err();
    assert!(matches!(err.as_domain(), Some(DomainError::CodeNotFound)));

    // The stale submission does not count against the live code
    let active = harness.otps.active_record(&email).unwrap();
    assert_eq!(active.attempts, 0);

    assert!(verify(&harness, &email, &second).await.is_ok());
}

#[tokio::test]
async fn test_code_from_an_earlier_window_counts_as_attempt() {
    let harness = TestHarness::new();
    let email = unique_email();
    register(&harness, &email).await;

    let first = request_code(&harness, &email).await;
    harness.clock.advance(Duration::seconds(301));

    let mut second = request_code(&harness, &email).await;
    while second == first {
        second = request_code(&harness, &email).await;
    }

    let err = verify(&harness, &email, &first).await.unwrap_err();
    assert!(matches!(err.as_domain(), Some(DomainError::CodeMismatch)));

    let active = harness.otps.active_record(&email).unwrap();
    assert_eq!(active.attempts, 1);
    assert!(verify(&harness, &email, &second).await.is_ok());
}

#[tokio::test]
async fn test_wrong_code_is_mismatch_and_counted() {
    let harness = TestHarness::new();
    let email = unique_email();
    register(&harness, &email).await;
    let code = request_code(&harness, &email).await;

    let err = verify(&harness, &email, &wrong_code(&code)).await.unwrap_err();
    assert!(matches!(err.as_domain(), Some(DomainError::CodeMismatch)));

    let active = harness.otps.active_record(&email).unwrap();
    assert_eq!(active.attempts, 1);

    // Still usable afterwards
    assert!(verify(&harness, &email, &code).await.is_ok());
}

#[tokio::test]
async fn test_attempt_limit_discards_code() {
    let harness = TestHarness::with_policy(ResetPolicy {
        max_attempts: 3,
        ..ResetPolicy::default()
    });
    let email = unique_email();
    register(&harness, &email).await;
    let code = request_code(&harness, &email).await;
    let wrong = wrong_code(&code);

    for _ in 0..3 {
        let err = verify(&harness, &email, &wrong).await.unwrap_err();
        assert!(matches!(err.as_domain(), Some(DomainError::CodeMismatch)));
    }

    let err = verify(&harness, &email, &code).await.unwrap_err();
    assert!(matches!(err.as_domain(), Some(DomainError::CodeNotFound)));
}

#[tokio::test]
async fn test_malformed_code_is_invalid() {
    let harness = TestHarness::new();
    let email = unique_email();
    register(&harness, &email).await;
    request_code(&harness, &email).await;

    for bad in ["12ab56", "123", "1234567"] {
        let err = verify(&harness, &email, bad).await.unwrap_err();
        assert!(matches!(err.as_domain(), Some(DomainError::InvalidCode)));
    }

    // Malformed input never reaches the attempt counter
    let active = harness.otps.active_record(&email).unwrap();
    assert_eq!(active.attempts, 0);
}

#[tokio::test]
async fn test_verify_without_request_is_not_found() {
    let harness = TestHarness::new();
    let email = unique_email();
    register(&harness, &email).await;

    let err = verify(&harness, &email, "123456").await.unwrap_err();
    assert!(matches!(err.as_domain(), Some(DomainError::CodeNotFound)));
    assert_eq!(err.status_code(), 404);
}

#[tokio::test]
async fn test_concurrent_verify_succeeds_once() {
    let harness = Arc::new(TestHarness::new());
    let email = unique_email();
    register(&harness, &email).await;
    let code = request_code(&harness, &email).await;

    let mut handles = Vec::new();
    for _ in 0..8 {
        let harness = Arc::clone(&harness);
        let email = email.clone();
        let code = code.clone();
        handles.push(tokio::spawn(async move {
            verify(&harness, &email, &code).await.is_ok()
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
// Changing the password
// ============================================================================

#[tokio::test]
async fn test_full_reset_scenario() {
    let harness = TestHarness::new();
    let email = unique_email();
    register(&harness, &email).await;

    let code = request_code(&harness, &email).await;
    harness.clock.advance(Duration::seconds(120));
    let proof = verify(&harness, &email, &code).await.unwrap();

    PasswordResetService::new(&harness.ctx)
        .change_password(change_request(&proof.proof_token, NEW_PASSWORD))
        .await
        .unwrap();

    let sessions = SessionService::new(&harness.ctx);
    let err = sessions
        .login(login_request(&email, PASSWORD))
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 401);
    assert_eq!(err.error_code(), "INVALID_CREDENTIALS");

    let auth = sessions
        .login(login_request(&email, NEW_PASSWORD))
        .await
        .unwrap();
    assert_eq!(auth.member.email, email);
}

#[tokio::test]
async fn test_password_change_revokes_all_sessions() {
    let harness = TestHarness::new();
    let email = unique_email();
    let registered = register(&harness, &email).await;
    let sessions = SessionService::new(&harness.ctx);
    sessions
        .login(login_request(&email, PASSWORD))
        .await
        .unwrap();

    let member_id = registered.member.id;
    let now = harness.clock.now();
    assert_eq!(harness.sessions.active_count(member_id, now), 2);

    let code = request_code(&harness, &email).await;
    let proof = verify(&harness, &email, &code).await.unwrap();
    PasswordResetService::new(&harness.ctx)
        .change_password(change_request(&proof.proof_token, NEW_PASSWORD))
        .await
        .unwrap();

    assert_eq!(harness.sessions.active_count(member_id, now), 0);

    let err = sessions
        .refresh(cinema_service::RefreshTokenRequest {
            refresh_token: registered.refresh_token,
        })
        .await
        .unwrap_err();
    assert!(matches!(err.as_domain(), Some(DomainError::TokenRevoked)));
}

#[tokio::test]
async fn test_weak_password_keeps_proof_usable() {
    let harness = TestHarness::new();
    let email = unique_email();
    register(&harness, &email).await;
    let code = request_code(&harness, &email).await;
    let proof = verify(&harness, &email, &code).await.unwrap();
    let service = PasswordResetService::new(&harness.ctx);

    let err = service
        .change_password(change_request(&proof.proof_token, "weak"))
        .await
        .unwrap_err();
    assert!(matches!(err.as_domain(), Some(DomainError::WeakPassword(_))));
    assert_eq!(harness.proofs.len(), 1);

    service
        .change_password(change_request(&proof.proof_token, NEW_PASSWORD))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_proof_is_single_use() {
    let harness = TestHarness::new();
    let email = unique_email();
    register(&harness, &email).await;
    let code = request_code(&harness, &email).await;
    let proof = verify(&harness, &email, &code).await.unwrap();
    let service = PasswordResetService::new(&harness.ctx);

    service
        .change_password(change_request(&proof.proof_token, NEW_PASSWORD))
        .await
        .unwrap();

    let err = service
        .change_password(change_request(&proof.proof_token, "AnotherPass456"))
        .await
        .unwrap_err();
    assert!(matches!(err.as_domain(), Some(DomainError::InvalidProof)));
}

#[tokio::test]
async fn test_expired_proof_is_invalid() {
    let harness = TestHarness::new();
    let email = unique_email();
    register(&harness, &email).await;
    let code = request_code(&harness, &email).await;
    let proof = verify(&harness, &email, &code).await.unwrap();

    harness.clock.advance(Duration::seconds(601));

    let err = PasswordResetService::new(&harness.ctx)
        .change_password(change_request(&proof.proof_token, NEW_PASSWORD))
        .await
        .unwrap_err();
    assert!(matches!(err.as_domain(), Some(DomainError::InvalidProof)));
}

#[tokio::test]
async fn test_forged_proof_is_invalid() {
    let harness = TestHarness::new();

    for token in ["", "   ", "not-a-real-proof"] {
        let err = PasswordResetService::new(&harness.ctx)
            .change_password(change_request(token, NEW_PASSWORD))
            .await
            .unwrap_err();
        assert!(matches!(err.as_domain(), Some(DomainError::InvalidProof)));
    }
}

// ============================================================================
// Purge
// ============================================================================

#[tokio::test]
async fn test_purge_waits_for_ttl_whatever_the_state() {
    let harness = TestHarness::new();
    let email = unique_email();
    register(&harness, &email).await;

    request_code(&harness, &email).await;
    let code = request_code(&harness, &email).await;
    verify(&harness, &email, &code).await.unwrap();

    let other = unique_email();
    register(&harness, &other).await;
    request_code(&harness, &other).await;

    // One superseded, one consumed, one active: all still inside their TTL
    let report = MaintenanceService::new(&harness.ctx)
        .purge_expired()
        .await
        .unwrap();
    assert_eq!(report.codes, 0);
    assert_eq!(harness.otps.len(), 3);

    harness.clock.advance(Duration::seconds(301));
    let report = MaintenanceService::new(&harness.ctx)
        .purge_expired()
        .await
        .unwrap();
    assert_eq!(report.codes, 3);
    assert!(harness.otps.is_empty());
}

#[tokio::test]
async fn test_superseded_code_still_not_found_after_purge() {
    let harness = TestHarness::new();
    let email = unique_email();
    register(&harness, &email).await;

    let first = request_code(&harness, &email).await;
    let mut second = request_code(&harness, &email).await;
    while second == first {
        second = request_code(&harness, &email).await;
    }

    MaintenanceService::new(&harness.ctx)
        .purge_expired()
        .await
        .unwrap();

    let err = verify(&harness, &email, &first).await.unwrap_err();
    assert!(matches!(err.as_domain(), Some(DomainError::CodeNotFound)));

    let active = harness.otps.active_record(&email).unwrap();
    assert_eq!(active.attempts, 0);
    assert!(verify(&harness, &email, &second).await.is_ok());
}

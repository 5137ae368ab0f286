//! Unit tests for the verification-code crate
//! Flow-level coverage over the in-memory store with a manual clock.

#[cfg(test)]
mod flow_tests {
    use std::sync::Arc;
    use std::time::Duration;

    use platform::clock::{Clock, ManualClock};
    use platform::throttle::ThrottleConfig;

    use crate::application::config::OtpConfig;
    use crate::application::issue_code::IssueCodeUseCase;
    use crate::application::verify_code::VerifyCodeUseCase;
    use crate::domain::repository::{CodeDelivery, CodeRepository};
    use crate::domain::value_objects::CodePurpose;
    use crate::error::{OtpError, OtpResult};
    use crate::infra::memory::{CapturingCodeDelivery, MemoryCodeRepository};

    struct Harness {
        repo: Arc<MemoryCodeRepository>,
        delivery: Arc<CapturingCodeDelivery>,
        clock: Arc<ManualClock>,
        issue: IssueCodeUseCase<MemoryCodeRepository, CapturingCodeDelivery>,
        verify: VerifyCodeUseCase<MemoryCodeRepository>,
    }

    fn harness(config: OtpConfig) -> Harness {
        let repo = Arc::new(MemoryCodeRepository::new());
        let delivery = Arc::new(CapturingCodeDelivery::new());
        let clock = Arc::new(ManualClock::new(0));
        let config = Arc::new(config);

        let clock_dyn: Arc<dyn Clock> = clock.clone();
        let issue = IssueCodeUseCase::new(
            repo.clone(),
            delivery.clone(),
            clock_dyn.clone(),
            config.clone(),
        );
        let verify = VerifyCodeUseCase::new(repo.clone(), clock_dyn);

        Harness {
            repo,
            delivery,
            clock,
            issue,
            verify,
        }
    }

    fn default_harness() -> Harness {
        harness(OtpConfig::default())
    }

    #[tokio::test]
    async fn test_issue_and_verify_roundtrip() {
        let h = default_harness();

        let out = h.issue.execute("a@b.com", CodePurpose::Signup).await.unwrap();
        assert_eq!(out.expires_at_ms, OtpConfig::default().code_ttl_ms());

        let code = h.delivery.last_code("a@b.com", CodePurpose::Signup).unwrap();
        assert_eq!(code.len(), 6);

        h.verify
            .execute("a@b.com", CodePurpose::Signup, &code)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_second_verify_is_already_used() {
        let h = default_harness();

        h.issue.execute("a@b.com", CodePurpose::Signup).await.unwrap();
        let code = h.delivery.last_code("a@b.com", CodePurpose::Signup).unwrap();

        h.verify
            .execute("a@b.com", CodePurpose::Signup, &code)
            .await
            .unwrap();

        let err = h
            .verify
            .execute("a@b.com", CodePurpose::Signup, &code)
            .await
            .unwrap_err();
        assert!(matches!(err, OtpError::CodeAlreadyUsed));

        // Still deterministic after the TTL has also elapsed
        h.clock.advance_ms(OtpConfig::default().code_ttl_ms() + 1);
        let err = h
            .verify
            .execute("a@b.com", CodePurpose::Signup, &code)
            .await
            .unwrap_err();
        assert!(matches!(err, OtpError::CodeAlreadyUsed));
    }

    #[tokio::test]
    async fn test_expired_code() {
        let h = default_harness();

        h.issue.execute("a@b.com", CodePurpose::Signup).await.unwrap();
        let code = h.delivery.last_code("a@b.com", CodePurpose::Signup).unwrap();

        h.clock.advance_ms(OtpConfig::default().code_ttl_ms() + 1);

        let err = h
            .verify
            .execute("a@b.com", CodePurpose::Signup, &code)
            .await
            .unwrap_err();
        assert!(matches!(err, OtpError::CodeExpired));
        assert!(err.offer_resend());
    }

    #[tokio::test]
    async fn test_wrong_code_is_invalid() {
        let h = default_harness();

        h.issue.execute("a@b.com", CodePurpose::Signup).await.unwrap();
        let code = h.delivery.last_code("a@b.com", CodePurpose::Signup).unwrap();
        let wrong = if code == "000000" { "000001" } else { "000000" };

        let err = h
            .verify
            .execute("a@b.com", CodePurpose::Signup, wrong)
            .await
            .unwrap_err();
        assert!(matches!(err, OtpError::CodeInvalid));
        assert!(!err.offer_resend());

        // The right code still works afterwards
        h.verify
            .execute("a@b.com", CodePurpose::Signup, &code)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_unknown_email_is_invalid() {
        let h = default_harness();

        let err = h
            .verify
            .execute("nobody@b.com", CodePurpose::Signup, "123456")
            .await
            .unwrap_err();
        assert!(matches!(err, OtpError::CodeInvalid));
    }

    #[tokio::test]
    async fn test_reissue_replaces_prior_code() {
        let h = default_harness();

        h.issue.execute("a@b.com", CodePurpose::Signup).await.unwrap();
        let first = h.delivery.last_code("a@b.com", CodePurpose::Signup).unwrap();

        h.clock.advance_ms(1_000);
        h.issue.execute("a@b.com", CodePurpose::Signup).await.unwrap();
        let second = h.delivery.last_code("a@b.com", CodePurpose::Signup).unwrap();

        if first != second {
            let err = h
                .verify
                .execute("a@b.com", CodePurpose::Signup, &first)
                .await
                .unwrap_err();
            assert!(matches!(err, OtpError::CodeInvalid));
        }

        h.verify
            .execute("a@b.com", CodePurpose::Signup, &second)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_purpose_isolation() {
        let h = default_harness();

        h.issue.execute("a@b.com", CodePurpose::Signup).await.unwrap();
        let code = h.delivery.last_code("a@b.com", CodePurpose::Signup).unwrap();

        let err = h
            .verify
            .execute("a@b.com", CodePurpose::EmailChange, &code)
            .await
            .unwrap_err();
        assert!(matches!(err, OtpError::CodeInvalid));
    }

    #[tokio::test]
    async fn test_issue_throttled() {
        let h = harness(OtpConfig {
            issue_throttle: ThrottleConfig::new(1, 300),
            ..OtpConfig::default()
        });

        h.issue.execute("a@b.com", CodePurpose::Signup).await.unwrap();
        let err = h
            .issue
            .execute("a@b.com", CodePurpose::Signup)
            .await
            .unwrap_err();
        assert!(matches!(err, OtpError::ResendThrottled));

        // A different address is unaffected
        h.issue.execute("c@d.com", CodePurpose::Signup).await.unwrap();

        // The window eventually reopens
        h.clock.advance_ms(301_000);
        h.issue.execute("a@b.com", CodePurpose::Signup).await.unwrap();
    }

    #[tokio::test]
    async fn test_code_normalization() {
        let h = default_harness();

        h.issue.execute("a@b.com", CodePurpose::Signup).await.unwrap();
        let code = h.delivery.last_code("a@b.com", CodePurpose::Signup).unwrap();
        let spaced = format!("{} {}", &code[..3], &code[3..]);

        h.verify
            .execute("a@b.com", CodePurpose::Signup, &spaced)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_cleanup_expired() {
        let h = default_harness();

        h.issue.execute("a@b.com", CodePurpose::Signup).await.unwrap();
        h.issue.execute("c@d.com", CodePurpose::Signup).await.unwrap();

        let removed = h.repo.cleanup_expired(h.clock.now_ms()).await.unwrap();
        assert_eq!(removed, 0);

        h.clock.advance_ms(OtpConfig::default().code_ttl_ms() + 1);
        let removed = h.repo.cleanup_expired(h.clock.now_ms()).await.unwrap();
        assert_eq!(removed, 2);
    }

    // Delivery adapters that misbehave, for the failure paths

    struct FailingDelivery;

    impl CodeDelivery for FailingDelivery {
        async fn deliver(&self, _: &str, _: CodePurpose, _: &str) -> OtpResult<()> {
            Err(OtpError::Delivery("smtp refused".into()))
        }
    }

    struct HangingDelivery;

    impl CodeDelivery for HangingDelivery {
        async fn deliver(&self, _: &str, _: CodePurpose, _: &str) -> OtpResult<()> {
            std::future::pending::<()>().await;
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_delivery_failure_propagates() {
        let repo = Arc::new(MemoryCodeRepository::new());
        let clock: Arc<dyn Clock> = Arc::new(ManualClock::new(0));
        let issue = IssueCodeUseCase::new(
            repo,
            Arc::new(FailingDelivery),
            clock,
            Arc::new(OtpConfig::default()),
        );

        let err = issue
            .execute("a@b.com", CodePurpose::Signup)
            .await
            .unwrap_err();
        assert!(matches!(err, OtpError::Delivery(_)));
    }

    #[tokio::test]
    async fn test_delivery_timeout_is_distinct() {
        let repo = Arc::new(MemoryCodeRepository::new());
        let clock: Arc<dyn Clock> = Arc::new(ManualClock::new(0));
        let issue = IssueCodeUseCase::new(
            repo,
            Arc::new(HangingDelivery),
            clock,
            Arc::new(OtpConfig {
                delivery_timeout: Duration::from_millis(20),
                ..OtpConfig::default()
            }),
        );

        let err = issue
            .execute("a@b.com", CodePurpose::Signup)
            .await
            .unwrap_err();
        assert!(matches!(err, OtpError::DeliveryTimedOut));
    }
}

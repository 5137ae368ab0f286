//! Two-Phase Signup Flow
//!
//! Phase 1 (`initiate`) collects details and issues a verification code;
//! phase 2 (`complete`) consumes the code, creates the remote account,
//! and logs the user in. In-progress data lives only in a
//! [`PendingSignup`] held in memory.
//!
//! ## State machine
//! `Idle → DetailsCollected → CodeIssued → Verified → AccountCreated →
//! LoggedIn`; `Abandoned` from any non-terminal state; resend is the
//! `CodeIssued → CodeIssued` self-loop. `initiate` always starts a fresh
//! flow, replacing any prior pending data.
//!
//! ## Late continuations
//! Every await re-validates the flow epoch afterwards. A result that
//! arrives after the flow was replaced or abandoned is discarded with
//! `SignupSuperseded` instead of mutating state that no longer belongs
//! to it.

use std::sync::Arc;

use otp::application::issue_code::IssueCodeUseCase;
use otp::application::verify_code::VerifyCodeUseCase;
use otp::domain::repository::{CodeDelivery, CodeRepository};
use otp::domain::value_objects::CodePurpose;
use tokio::sync::Mutex;

use crate::domain::entity::identity::Identity;
use crate::domain::entity::pending_signup::PendingSignup;
use crate::domain::entity::profile::ProfilePatch;
use crate::domain::repository::{IdentityGateway, ProfileStore};
use crate::domain::value_object::{
    email::Email, metadata::IdentityMetadata, password::RawPassword, signup_state::SignupState,
};
use crate::error::{AuthError, AuthResult};
use crate::session::SessionManager;
use platform::clock::Clock;

/// Signup phase-1 input
pub struct InitiateSignupInput {
    pub email: String,
    pub password: String,
    /// Profile fields collected on the details form
    pub profile: ProfilePatch,
}

/// Signup phase-1 output
#[derive(Debug, Clone)]
pub struct InitiateSignupOutput {
    pub code_expires_at_ms: i64,
}

/// Signup phase-2 input
pub struct CompleteSignupInput {
    pub code: String,
    /// Late-collected profile fields, merged over the phase-1 draft
    pub profile: ProfilePatch,
}

/// Signup phase-2 output
#[derive(Debug, Clone)]
pub struct CompleteSignupOutput {
    pub identity: Identity,
    /// False when auto-login failed; route to the manual login form
    /// instead of retrying silently
    pub logged_in: bool,
}

struct FlowState {
    state: SignupState,
    pending: Option<PendingSignup>,
    /// Bumped whenever the flow restarts; continuations compare against
    /// their captured value and discard themselves on mismatch
    epoch: u64,
}

/// Two-phase signup flow
pub struct SignupFlow<G, P, R, D>
where
    G: IdentityGateway,
    P: ProfileStore,
    R: CodeRepository,
    D: CodeDelivery,
{
    gateway: Arc<G>,
    profiles: Arc<P>,
    issue_code: Arc<IssueCodeUseCase<R, D>>,
    verify_code: Arc<VerifyCodeUseCase<R>>,
    sessions: Arc<SessionManager<G>>,
    clock: Arc<dyn Clock>,
    flow: Mutex<FlowState>,
}

impl<G, P, R, D> SignupFlow<G, P, R, D>
where
    G: IdentityGateway,
    P: ProfileStore,
    R: CodeRepository,
    D: CodeDelivery,
{
    pub fn new(
        gateway: Arc<G>,
        profiles: Arc<P>,
        issue_code: Arc<IssueCodeUseCase<R, D>>,
        verify_code: Arc<VerifyCodeUseCase<R>>,
        sessions: Arc<SessionManager<G>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            gateway,
            profiles,
            issue_code,
            verify_code,
            sessions,
            clock,
            flow: Mutex::new(FlowState {
                state: SignupState::Idle,
                pending: None,
                epoch: 0,
            }),
        }
    }

    /// Current phase, for routing
    pub async fn state(&self) -> SignupState {
        self.flow.lock().await.state
    }

    /// Phase 1: validate details, stash them, issue a code
    ///
    /// Re-entrant: calling again replaces any prior pending signup and
    /// issues a fresh code (which invalidates the old one).
    pub async fn initiate(&self, input: InitiateSignupInput) -> AuthResult<InitiateSignupOutput> {
        let email = Email::new(input.email)?;
        let password = RawPassword::new(input.password)?;

        let epoch = {
            let mut flow = self.flow.lock().await;
            flow.epoch += 1;
            flow.pending = Some(PendingSignup::new(
                email.clone(),
                password,
                input.profile,
                self.clock.now_ms(),
            ));
            flow.state = SignupState::DetailsCollected;
            flow.epoch
        };

        let issued = self
            .issue_code
            .execute(email.as_str(), CodePurpose::Signup)
            .await;

        let mut flow = self.flow.lock().await;
        if flow.epoch != epoch {
            return Err(AuthError::SignupSuperseded);
        }
        match issued {
            Ok(out) => {
                flow.state = SignupState::CodeIssued;
                tracing::info!("Signup code issued, awaiting confirmation");
                Ok(InitiateSignupOutput {
                    code_expires_at_ms: out.expires_at_ms,
                })
            }
            // Details stay collected so a resend can retry the issue
            Err(err) => Err(err.into()),
        }
    }

    /// Re-issue a code for the held pending signup (resend button)
    pub async fn resend_code(&self) -> AuthResult<InitiateSignupOutput> {
        let (epoch, email) = {
            let flow = self.flow.lock().await;
            if !flow.state.accepts_resend() {
                return Err(AuthError::SignupNotInProgress);
            }
            let pending = flow.pending.as_ref().ok_or(AuthError::SignupNotInProgress)?;
            (flow.epoch, pending.email.clone())
        };

        let issued = self
            .issue_code
            .execute(email.as_str(), CodePurpose::Signup)
            .await;

        let mut flow = self.flow.lock().await;
        if flow.epoch != epoch {
            return Err(AuthError::SignupSuperseded);
        }
        match issued {
            Ok(out) => {
                flow.state = SignupState::CodeIssued;
                tracing::info!("Signup code re-issued");
                Ok(InitiateSignupOutput {
                    code_expires_at_ms: out.expires_at_ms,
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Phase 2: consume the code, create the account, auto-login
    ///
    /// A failed verification keeps the flow in `CodeIssued` with the
    /// pending data intact; the specific code error reaches the caller
    /// verbatim so the UI can choose between "retry" and "resend".
    pub async fn complete(&self, input: CompleteSignupInput) -> AuthResult<CompleteSignupOutput> {
        let (epoch, email) = {
            let flow = self.flow.lock().await;
            if !flow.state.accepts_code() {
                return Err(AuthError::SignupNotInProgress);
            }
            let pending = flow.pending.as_ref().ok_or(AuthError::SignupNotInProgress)?;
            (flow.epoch, pending.email.clone())
        };

        self.verify_code
            .execute(email.as_str(), CodePurpose::Signup, &input.code)
            .await?;

        // Code consumed; take ownership of the pending data
        let mut pending = {
            let mut flow = self.flow.lock().await;
            if flow.epoch != epoch {
                return Err(AuthError::SignupSuperseded);
            }
            flow.state = SignupState::Verified;
            flow.pending.take().ok_or(AuthError::SignupNotInProgress)?
        };
        pending.merge_profile(input.profile);

        let mut metadata = IdentityMetadata::new();
        metadata.set_has_completed_onboarding(false);
        if let Some(name) = pending.profile.display_name() {
            metadata.set_display_name(name);
        }

        let identity = match self
            .gateway
            .create_identity(&pending.email, pending.password().expose(), &metadata)
            .await
        {
            Ok(identity) => identity,
            Err(err) => {
                // Hand the details back so the user can resend and retry
                let mut flow = self.flow.lock().await;
                if flow.epoch == epoch {
                    flow.pending = Some(pending);
                    flow.state = SignupState::DetailsCollected;
                }
                return Err(err);
            }
        };

        {
            let mut flow = self.flow.lock().await;
            if flow.epoch != epoch {
                return Err(AuthError::SignupSuperseded);
            }
            flow.state = SignupState::AccountCreated;
        }
        tracing::info!(identity_id = %identity.identity_id, "Account created");

        // Best-effort profile write; the identity is never rolled back,
        // the reconciler recreates a lost profile at read time
        let mut profile_patch = pending.profile.clone();
        profile_patch.email = Some(identity.email.as_str().to_string());
        profile_patch.email_verified = Some(true);
        profile_patch.has_completed_onboarding = Some(false);
        if let Err(err) = self
            .profiles
            .upsert_profile(identity.identity_id, &profile_patch)
            .await
        {
            tracing::warn!(
                error = %err,
                identity_id = %identity.identity_id,
                "Profile write failed after account creation"
            );
        }

        // Auto-login with the just-used credentials
        let logged_in = match self
            .gateway
            .authenticate(&pending.email, pending.password().expose())
            .await
        {
            Ok(session) => {
                let mut flow = self.flow.lock().await;
                if flow.epoch == epoch {
                    self.sessions.install(session);
                    flow.state = SignupState::LoggedIn;
                    true
                } else {
                    // Flow restarted while we were logging in; drop the grant
                    false
                }
            }
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    identity_id = %identity.identity_id,
                    "Auto-login after signup failed"
                );
                false
            }
        };

        Ok(CompleteSignupOutput {
            identity,
            logged_in,
        })
    }

    /// Discard the flow (navigation away, explicit "start over")
    pub async fn abandon(&self) {
        let mut flow = self.flow.lock().await;
        if flow.state.can_abandon() {
            flow.state = SignupState::Abandoned;
            flow.pending = None;
            flow.epoch += 1;
            tracing::info!("Signup flow abandoned");
        }
    }
}

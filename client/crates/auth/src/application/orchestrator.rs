//! Auth Orchestrator
//!
//! Facade owning the whole authentication lifecycle: the two-phase
//! signup state machine, login/logout, session refresh, onboarding
//! reconciliation, and account maintenance. Collaborators are plain
//! constructor parameters; there is no service locator or lazy lookup.
//!
//! This is the only surface auth-consuming UI should talk to. Every
//! operation returns a typed `AuthResult`; expected failures never
//! panic or throw.

use std::sync::Arc;

use otp::application::config::OtpConfig;
use otp::application::issue_code::IssueCodeUseCase;
use otp::application::verify_code::VerifyCodeUseCase;
use otp::domain::repository::{CodeDelivery, CodeRepository};
use tokio::sync::watch;

use crate::application::change_email::{ChangeEmailOutput, ChangeEmailRequested, ChangeEmailUseCase};
use crate::application::change_password::ChangePasswordUseCase;
use crate::application::config::AuthConfig;
use crate::application::password_reset::PasswordResetUseCase;
use crate::application::registration_status::RegistrationStatusUseCase;
use crate::application::sign_in::{SignInInput, SignInOutput, SignInUseCase};
use crate::application::sign_out::SignOutUseCase;
use crate::application::signup::{
    CompleteSignupInput, CompleteSignupOutput, InitiateSignupInput, InitiateSignupOutput,
    SignupFlow,
};
use crate::domain::entity::{identity::Identity, session::Session};
use crate::domain::repository::{IdentityGateway, ProfileStore, TravelPreferencesStore};
use crate::domain::value_object::{
    registration_status::RegistrationStatus, signup_state::SignupState,
};
use crate::error::AuthResult;
use crate::reconcile::OnboardingReconciler;
use crate::session::SessionManager;
use kernel::id::IdentityId;
use platform::clock::Clock;
use platform::local_store::LocalStore;

/// Auth orchestrator facade
pub struct AuthOrchestrator<G, P, T, R, D>
where
    G: IdentityGateway,
    P: ProfileStore,
    T: TravelPreferencesStore,
    R: CodeRepository,
    D: CodeDelivery,
{
    sessions: Arc<SessionManager<G>>,
    reconciler: Arc<OnboardingReconciler<G, P>>,
    signup: SignupFlow<G, P, R, D>,
    sign_in: SignInUseCase<G, P>,
    sign_out: SignOutUseCase<G>,
    registration: RegistrationStatusUseCase<P, T>,
    password_reset: PasswordResetUseCase<G>,
    change_email: ChangeEmailUseCase<G, R, D>,
    change_password: ChangePasswordUseCase<G>,
}

impl<G, P, T, R, D> AuthOrchestrator<G, P, T, R, D>
where
    G: IdentityGateway,
    P: ProfileStore,
    T: TravelPreferencesStore,
    R: CodeRepository,
    D: CodeDelivery,
{
    pub fn new(
        gateway: Arc<G>,
        profiles: Arc<P>,
        preferences: Arc<T>,
        codes: Arc<R>,
        delivery: Arc<D>,
        local: Arc<dyn LocalStore>,
        clock: Arc<dyn Clock>,
        config: AuthConfig,
        otp_config: OtpConfig,
    ) -> Self {
        let config = Arc::new(config);
        let otp_config = Arc::new(otp_config);

        let sessions = Arc::new(SessionManager::new(
            gateway.clone(),
            clock.clone(),
            config.clone(),
        ));
        let reconciler = Arc::new(OnboardingReconciler::new(
            gateway.clone(),
            profiles.clone(),
            local,
            config.clone(),
        ));
        let issue_code = Arc::new(IssueCodeUseCase::new(
            codes.clone(),
            delivery,
            clock.clone(),
            otp_config,
        ));
        let verify_code = Arc::new(VerifyCodeUseCase::new(codes, clock.clone()));

        let signup = SignupFlow::new(
            gateway.clone(),
            profiles.clone(),
            issue_code.clone(),
            verify_code.clone(),
            sessions.clone(),
            clock,
        );
        let sign_in = SignInUseCase::new(
            gateway.clone(),
            sessions.clone(),
            reconciler.clone(),
            config,
        );
        let sign_out = SignOutUseCase::new(sessions.clone());
        let registration = RegistrationStatusUseCase::new(profiles, preferences);
        let password_reset = PasswordResetUseCase::new(gateway.clone());
        let change_email = ChangeEmailUseCase::new(
            gateway.clone(),
            sessions.clone(),
            issue_code,
            verify_code,
        );
        let change_password = ChangePasswordUseCase::new(gateway, sessions.clone());

        Self {
            sessions,
            reconciler,
            signup,
            sign_in,
            sign_out,
            registration,
            password_reset,
            change_email,
            change_password,
        }
    }

    // ========================================================================
    // Signup
    // ========================================================================

    /// Start (or restart) the two-phase signup flow
    pub async fn initiate_signup(
        &self,
        input: InitiateSignupInput,
    ) -> AuthResult<InitiateSignupOutput> {
        self.signup.initiate(input).await
    }

    /// Re-send the signup verification code
    pub async fn resend_signup_code(&self) -> AuthResult<InitiateSignupOutput> {
        self.signup.resend_code().await
    }

    /// Finish signup with the delivered code
    pub async fn complete_signup(
        &self,
        input: CompleteSignupInput,
    ) -> AuthResult<CompleteSignupOutput> {
        self.signup.complete(input).await
    }

    /// Discard any in-progress signup
    pub async fn abandon_signup(&self) {
        self.signup.abandon().await
    }

    /// Current signup phase, for routing
    pub async fn signup_state(&self) -> SignupState {
        self.signup.state().await
    }

    // ========================================================================
    // Session
    // ========================================================================

    /// Authenticate with email and password
    pub async fn login(&self, input: SignInInput) -> AuthResult<SignInOutput> {
        self.sign_in.execute(input).await
    }

    /// Invalidate the current session
    pub async fn logout(&self) -> AuthResult<()> {
        self.sign_out.execute().await
    }

    /// Force a session refresh
    pub async fn refresh_session(&self) -> AuthResult<Session> {
        self.sessions.refresh().await
    }

    /// Current session, silently refreshed when stale
    pub async fn current_session(&self) -> AuthResult<Option<Session>> {
        self.sessions.current_session().await
    }

    /// Identity behind the current session, if any
    pub async fn current_user(&self) -> AuthResult<Option<Identity>> {
        Ok(self
            .sessions
            .current_session()
            .await?
            .map(|session| session.identity))
    }

    /// Observe session changes instead of polling
    pub fn subscribe_session(&self) -> watch::Receiver<Option<Session>> {
        self.sessions.subscribe()
    }

    // ========================================================================
    // Onboarding
    // ========================================================================

    /// Where to route this identity after authentication
    pub async fn check_user_registration_status(
        &self,
        identity_id: IdentityId,
    ) -> AuthResult<RegistrationStatus> {
        self.registration.execute(identity_id).await
    }

    /// Replicate "onboarding complete" to all stores
    pub async fn mark_onboarding_complete(&self, identity_id: IdentityId) -> AuthResult<()> {
        self.reconciler.mark_complete(identity_id).await
    }

    /// Read-time repair of the replicated onboarding flag
    pub async fn reconcile_onboarding(&self, identity_id: IdentityId) -> AuthResult<bool> {
        self.reconciler.reconcile(identity_id).await
    }

    /// Local fast-path hint; never authoritative
    pub fn onboarding_hint(&self) -> bool {
        self.reconciler.local_hint()
    }

    // ========================================================================
    // Account maintenance
    // ========================================================================

    /// Trigger the password-reset email
    pub async fn send_password_reset(&self, email: &str) -> AuthResult<()> {
        self.password_reset.send(email).await
    }

    /// Apply a new password with the recovery token from the email
    pub async fn apply_password_reset(
        &self,
        recovery_token: &str,
        new_password: String,
    ) -> AuthResult<()> {
        self.password_reset.apply(recovery_token, new_password).await
    }

    /// Deliver a confirmation code to a new login address
    pub async fn request_email_change(&self, new_email: &str) -> AuthResult<ChangeEmailRequested> {
        self.change_email.request(new_email).await
    }

    /// Confirm the code and switch the login address
    pub async fn update_email(
        &self,
        new_email: &str,
        code: &str,
        password: Option<&str>,
    ) -> AuthResult<ChangeEmailOutput> {
        self.change_email.confirm(new_email, code, password).await
    }

    /// Change the password of the signed-in user
    pub async fn update_password(
        &self,
        current_password: &str,
        new_password: String,
    ) -> AuthResult<()> {
        self.change_password
            .execute(current_password, new_password)
            .await
    }
}

//! Sign Out Use Case
//!
//! Invalidates the local session. Remote data and any pending signup
//! (already gone by this point) are untouched.

use std::sync::Arc;

use crate::domain::repository::IdentityGateway;
use crate::error::AuthResult;
use crate::session::SessionManager;

/// Sign out use case
pub struct SignOutUseCase<G>
where
    G: IdentityGateway,
{
    sessions: Arc<SessionManager<G>>,
}

impl<G> SignOutUseCase<G>
where
    G: IdentityGateway,
{
    pub fn new(sessions: Arc<SessionManager<G>>) -> Self {
        Self { sessions }
    }

    pub async fn execute(&self) -> AuthResult<()> {
        let had_session = self.sessions.invalidate();
        tracing::info!(had_session, "User signed out");
        Ok(())
    }
}

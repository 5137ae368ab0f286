//! Session Manager
//!
//! Single source of truth for "am I logged in, and with which token".
//! The current session lives in a watch channel: writes are atomic,
//! reads are synchronous snapshots, and UI layers subscribe instead of
//! polling or re-fetching.
//!
//! ## Concurrency
//! Concurrent refresh attempts collapse into one remote call: callers
//! serialize on a gate and re-check the cached session after acquiring
//! it, so whoever arrives second finds the fresh session already
//! installed. Two overlapping refreshes would otherwise race the remote
//! into handing out two mutually-invalidating token pairs.

use std::sync::Arc;

use tokio::sync::{Mutex, watch};

use crate::application::config::AuthConfig;
use crate::domain::entity::session::Session;
use crate::domain::repository::IdentityGateway;
use crate::error::{AuthError, AuthResult};
use platform::clock::Clock;

/// Session manager
pub struct SessionManager<G>
where
    G: IdentityGateway,
{
    gateway: Arc<G>,
    clock: Arc<dyn Clock>,
    config: Arc<AuthConfig>,
    current: watch::Sender<Option<Session>>,
    refresh_gate: Mutex<()>,
}

impl<G> SessionManager<G>
where
    G: IdentityGateway,
{
    pub fn new(gateway: Arc<G>, clock: Arc<dyn Clock>, config: Arc<AuthConfig>) -> Self {
        let (current, _) = watch::channel(None);
        Self {
            gateway,
            clock,
            config,
            current,
            refresh_gate: Mutex::new(()),
        }
    }

    /// Install a session granted by login or signup completion
    pub fn install(&self, session: Session) {
        tracing::info!(
            identity_id = %session.identity_id(),
            expires_at_ms = session.expires_at_ms,
            "Session installed"
        );
        self.current.send_replace(Some(session));
    }

    /// Synchronous snapshot of the cached session, stale or not
    pub fn snapshot(&self) -> Option<Session> {
        self.current.borrow().clone()
    }

    /// Current session, silently refreshing a stale one
    ///
    /// `Ok(None)` means "not logged in" - including the case where the
    /// refresh token was rejected and the session was just cleared.
    /// Transport errors propagate so the caller can apply its own retry
    /// policy against a still-cached session.
    pub async fn current_session(&self) -> AuthResult<Option<Session>> {
        let now_ms = self.clock.now_ms();
        match self.snapshot() {
            None => Ok(None),
            Some(session)
                if !session.needs_refresh_at(now_ms, self.config.refresh_leeway_ms()) =>
            {
                Ok(Some(session))
            }
            Some(_) => match self.refresh().await {
                Ok(session) => Ok(Some(session)),
                Err(AuthError::SessionExpired) => Ok(None),
                Err(e) => Err(e),
            },
        }
    }

    /// Exchange the refresh token for a fresh session
    ///
    /// A rejected refresh token is fatal: the session is cleared before
    /// this returns `SessionExpired`, so no dependent operation can
    /// proceed with a stale token. Transport failures leave the cached
    /// session untouched and are not retried here.
    pub async fn refresh(&self) -> AuthResult<Session> {
        let _gate = self.refresh_gate.lock().await;

        // Whoever held the gate before us may have already done the work
        let now_ms = self.clock.now_ms();
        let stale = match self.snapshot() {
            None => return Err(AuthError::SessionExpired),
            Some(session)
                if !session.needs_refresh_at(now_ms, self.config.refresh_leeway_ms()) =>
            {
                return Ok(session);
            }
            Some(session) => session,
        };

        match self.gateway.refresh_session(&stale.refresh_token).await {
            Ok(fresh) => {
                tracing::debug!(
                    identity_id = %fresh.identity_id(),
                    expires_at_ms = fresh.expires_at_ms,
                    "Session refreshed"
                );
                self.current.send_replace(Some(fresh.clone()));
                Ok(fresh)
            }
            Err(err) if err.is_auth_rejection() => {
                tracing::warn!("Refresh token rejected, invalidating session");
                self.invalidate();
                Err(AuthError::SessionExpired)
            }
            Err(err) => Err(err),
        }
    }

    /// Clear the cached session and notify observers
    ///
    /// Idempotent; returns whether a session was actually cleared.
    pub fn invalidate(&self) -> bool {
        let cleared = self.current.send_if_modified(|current| {
            if current.is_some() {
                *current = None;
                true
            } else {
                false
            }
        });
        if cleared {
            tracing::info!("Session invalidated");
        }
        cleared
    }

    /// Observe session changes (login, refresh, invalidation)
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.current.subscribe()
    }

    /// Current session or `SessionExpired`, for operations that require
    /// an authenticated caller
    pub async fn require_session(&self) -> AuthResult<Session> {
        self.current_session()
            .await?
            .ok_or(AuthError::SessionExpired)
    }
}

//! Process-wide auth context.
//!
//! DESIGN
//! ======
//! State is published as immutable [`AuthState`] snapshots on a
//! `tokio::sync::watch` channel; this type holds the only sender. Every
//! mutation (initialize, sign-in commit, sign-out) runs under one async commit
//! lock, so snapshots never interleave.
//!
//! TRADE-OFFS
//! ==========
//! Sign-in attempts are fenced by a generation counter instead of being
//! coalesced. Each attempt, and every sign-out, bumps the generation; an
//! attempt may only commit if the generation is still its own. Two rapid taps
//! therefore both reach the backend, but only the latest result lands in
//! state. Sign-out is optimistic: local state is reset even when the
//! persisted slot cannot be cleared, and that failure comes back as a
//! warning.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use time::OffsetDateTime;
use tokio::sync::{Mutex, RwLock, watch};
use tracing::{debug, info, warn};

use super::state::{AuthState, derive_auth_state};
use super::{AuthError, NewAccount, SignOut};
use crate::backend::{Backend, USERS_COLLECTION, decode_record};
use crate::session::{Session, SessionSlot, UserRecord};

#[cfg(test)]
#[path = "context_test.rs"]
mod tests;

pub struct AuthContext {
    slot: SessionSlot,
    backend: RwLock<Option<Arc<dyn Backend>>>,
    state: watch::Sender<AuthState>,
    generation: AtomicU64,
    commit: Mutex<()>,
}

impl AuthContext {
    /// Context with no backend yet and an uninitialized snapshot.
    #[must_use]
    pub fn new(slot: SessionSlot) -> Self {
        let (state, _) = watch::channel(AuthState::uninitialized());
        Self { slot, backend: RwLock::new(None), state, generation: AtomicU64::new(0), commit: Mutex::new(()) }
    }

    /// Receiver that observes every published snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    /// Current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> AuthState {
        self.state.borrow().clone()
    }

    /// The attached backend, for screens that issue their own queries.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::NotInitialized`] before [`AuthContext::initialize`].
    pub async fn backend(&self) -> Result<Arc<dyn Backend>, AuthError> {
        self.backend
            .read()
            .await
            .clone()
            .ok_or(AuthError::NotInitialized)
    }

    /// Attach `backend` and derive state from the persisted session.
    ///
    /// Runs once per backend instance: attaching the same instance again
    /// returns the current snapshot untouched. A different instance re-reads
    /// the session; the snapshot stays initialized either way. An unreadable
    /// session is logged and treated as absent.
    pub async fn initialize(&self, backend: Arc<dyn Backend>) -> AuthState {
        let _commit = self.commit.lock().await;

        let already_attached = self
            .backend
            .read()
            .await
            .as_ref()
            .is_some_and(|current| std::ptr::addr_eq(Arc::as_ptr(current), Arc::as_ptr(&backend)));
        if already_attached {
            debug!("auth already initialized for this backend");
            return self.snapshot();
        }

        let session = match self.slot.load().await {
            Ok(session) => session,
            Err(e) => {
                warn!(error = %e, key = self.slot.key(), "session read failed; starting signed out");
                None
            }
        };
        let state = derive_auth_state(session.as_ref(), OffsetDateTime::now_utc());
        let token = session.filter(|_| state.is_logged_in()).map(|s| s.token);
        backend.set_auth_token(token);

        *self.backend.write().await = Some(backend);
        self.generation.fetch_add(1, Ordering::SeqCst);
        info!(logged_in = state.is_logged_in(), "auth initialized");
        self.state.send_replace(state.clone());
        state
    }

    /// Authenticate with email and password.
    ///
    /// On success the session is persisted, the backend starts sending the new
    /// token, and a logged-in snapshot is published. On failure state is left
    /// exactly as it was.
    ///
    /// # Errors
    ///
    /// - [`AuthError::NotInitialized`] without a backend (no request is made)
    /// - [`AuthError::Backend`] for transport or credential errors
    /// - [`AuthError::InvalidSession`] if the returned token is unusable
    /// - [`AuthError::Superseded`] if a newer sign-in or a sign-out started
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<UserRecord, AuthError> {
        let backend = self.backend().await?;
        let attempt = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let response = match backend
            .auth_with_password(USERS_COLLECTION, email.trim(), password)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, attempt, "sign-in failed");
                return Err(e.into());
            }
        };

        let user = response.record;
        let session = Session::new(response.token, Some(user.clone()));
        let state = derive_auth_state(Some(&session), OffsetDateTime::now_utc());
        if !state.is_logged_in() {
            warn!(attempt, user_id = %user.id, "sign-in returned an unusable session");
            return Err(AuthError::InvalidSession);
        }

        let _commit = self.commit.lock().await;
        if self.generation.load(Ordering::SeqCst) != attempt {
            warn!(attempt, "sign-in superseded; discarding result");
            return Err(AuthError::Superseded);
        }

        backend.set_auth_token(Some(session.token.clone()));
        if let Err(e) = self.slot.save(&session).await {
            warn!(error = %e, "session persist failed; signed in for this launch only");
        }
        self.state.send_replace(state);
        info!(user_id = %user.id, "signed in");
        Ok(user)
    }

    /// Sign out, resetting local state even if the persisted slot survives.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::NotInitialized`] without a backend.
    pub async fn sign_out(&self) -> Result<SignOut, AuthError> {
        let backend = self.backend().await?;
        let _commit = self.commit.lock().await;
        self.generation.fetch_add(1, Ordering::SeqCst);

        backend.set_auth_token(None);
        let warning = match self.slot.clear().await {
            Ok(()) => None,
            Err(e) => {
                warn!(error = %e, "clearing persisted session failed; signed out locally");
                Some(e)
            }
        };
        self.state.send_replace(AuthState::logged_out());
        info!(clean = warning.is_none(), "signed out");
        Ok(SignOut { warning })
    }

    /// Register a new account. Does not sign in.
    ///
    /// The form is validated before anything else, so a mismatched password
    /// confirmation never reaches the network.
    ///
    /// # Errors
    ///
    /// - [`AuthError::Validation`] for form errors
    /// - [`AuthError::NotInitialized`] without a backend
    /// - [`AuthError::Backend`] if the backend rejects the record
    pub async fn create_account(&self, account: &NewAccount) -> Result<UserRecord, AuthError> {
        account.validate()?;
        let backend = self.backend().await?;
        let record = match backend.create(USERS_COLLECTION, &account.to_body()).await {
            Ok(record) => record,
            Err(e) => {
                warn!(error = %e, "account creation failed");
                return Err(e.into());
            }
        };
        let user: UserRecord = decode_record(record)?;
        info!(user_id = %user.id, "account created");
        Ok(user)
    }
}

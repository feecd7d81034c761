use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{AuthError, AuthResult};
use crate::models::{Profile, SessionUser};
use crate::storage::KeyValueStore;

use super::store::CredentialStore;
use super::token::{self, Token};

/// Storage key holding the persisted token
pub const TOKEN_KEY: &str = "token";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Anonymous,
    Authenticating,
    Authenticated,
}

/// Snapshot of the session as seen by guards and views.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub user: Option<SessionUser>,
    /// A login call is in flight
    pub loading: bool,
}

impl SessionState {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(user: SessionUser) -> Self {
        Self {
            user: Some(user),
            loading: false,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn phase(&self) -> SessionPhase {
        if self.loading {
            SessionPhase::Authenticating
        } else if self.user.is_some() {
            SessionPhase::Authenticated
        } else {
            SessionPhase::Anonymous
        }
    }
}

/// The pending expiry timer. Every change to the persisted token or the
/// published identity happens while this is locked.
#[derive(Default)]
struct Watchdog {
    // Bumped on every arm/cancel; a timer only acts on its own generation
    generation: u64,
    handle: Option<JoinHandle<()>>,
}

impl Watchdog {
    fn cancel(&mut self) -> u64 {
        self.generation += 1;
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
        self.generation
    }
}

struct Inner {
    store: CredentialStore,
    storage: Arc<dyn KeyValueStore>,
    state: watch::Sender<SessionState>,
    watchdog: Mutex<Watchdog>,
    login_in_flight: AtomicBool,
    expiry_grace: Duration,
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, Watchdog> {
        self.watchdog.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn persisted_token(&self) -> Option<Token> {
        match self.storage.get(TOKEN_KEY) {
            Ok(Some(raw)) => token::decode(&raw),
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "Failed to read persisted token");
                None
            }
        }
    }

    /// Remove the persisted token, then publish an anonymous state. If the
    /// token cannot be removed nothing changes and the error is returned.
    fn clear_locked(&self, watchdog: &mut Watchdog) -> AuthResult<()> {
        self.storage.remove(TOKEN_KEY)?;
        watchdog.cancel();
        self.state.send_modify(|state| state.user = None);
        Ok(())
    }

    /// End a session whose token is expired or unreadable. The in-memory
    /// state goes anonymous even if storage refuses the removal; the leftover
    /// token is discarded on the next restore.
    fn expire_locked(&self, watchdog: &mut Watchdog) {
        if let Err(e) = self.clear_locked(watchdog) {
            warn!(error = %e, "Failed to clear persisted token");
            watchdog.cancel();
            self.state.send_modify(|state| state.user = None);
        }
    }

    /// (Re)schedule the one-shot logout for the currently persisted token.
    fn arm_locked(inner: &Arc<Inner>, watchdog: &mut Watchdog) {
        let generation = watchdog.cancel();

        if inner.state.borrow().user.is_none() {
            return;
        }

        let Some(token) = inner.persisted_token() else {
            warn!("Session has no readable token, logging out");
            inner.expire_locked(watchdog);
            return;
        };

        let remaining = match token.time_until_expiry().to_std() {
            Ok(remaining) if !remaining.is_zero() => remaining,
            _ => {
                info!("Session already expired, logging out");
                inner.expire_locked(watchdog);
                return;
            }
        };

        let delay = remaining.saturating_add(inner.expiry_grace);
        debug!(delay_ms = delay.as_millis() as u64, generation, "Expiry watchdog armed");

        let weak: Weak<Inner> = Arc::downgrade(inner);
        watchdog.handle = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(inner) = weak.upgrade() {
                inner.fire(generation);
            }
        }));
    }

    /// Timer callback. Checking the generation and clearing happen under the
    /// same lock, so a login that re-armed in between is never undone.
    fn fire(&self, generation: u64) {
        let mut watchdog = self.lock();
        if watchdog.generation != generation {
            debug!(generation, "Stale expiry watchdog ignored");
            return;
        }
        // This task is the one running; it must not abort itself
        watchdog.handle.take();
        info!("Session expired, logging out");
        self.expire_locked(&mut watchdog);
    }
}

/// Resets the in-flight marker and loading flag when a login call ends,
/// including when its future is dropped early.
struct LoginFlight<'a>(&'a Inner);

impl Drop for LoginFlight<'_> {
    fn drop(&mut self) {
        self.0.login_in_flight.store(false, Ordering::Release);
        self.0.state.send_if_modified(|state| {
            let was_loading = state.loading;
            state.loading = false;
            was_loading
        });
    }
}

/// Owns the session: the persisted token, the published state and the
/// expiry watchdog. Dropping the manager cancels the watchdog.
pub struct SessionManager {
    inner: Arc<Inner>,
}

impl SessionManager {
    /// Build a manager from whatever token is persisted in `storage`.
    /// Absent, malformed or expired tokens start an anonymous session and
    /// are cleared. Must be called from within a tokio runtime.
    pub fn restore(store: CredentialStore, storage: Arc<dyn KeyValueStore>, config: &Config) -> Self {
        let (state, _) = watch::channel(SessionState::anonymous());
        let inner = Arc::new(Inner {
            store,
            storage,
            state,
            watchdog: Mutex::new(Watchdog::default()),
            login_in_flight: AtomicBool::new(false),
            expiry_grace: config.expiry_grace(),
        });

        {
            let mut watchdog = inner.lock();
            let initial = match inner.storage.get(TOKEN_KEY) {
                Ok(Some(raw)) => match token::decode(&raw) {
                    Some(token) if !token.is_expired() => {
                        info!(user_id = token.payload.sub, "Restored persisted session");
                        SessionState::authenticated(token.user())
                    }
                    Some(token) => {
                        info!(exp = token.exp, "Persisted session expired");
                        inner.expire_locked(&mut watchdog);
                        SessionState::anonymous()
                    }
                    None => {
                        warn!("Discarding malformed persisted token");
                        inner.expire_locked(&mut watchdog);
                        SessionState::anonymous()
                    }
                },
                Ok(None) => {
                    debug!("No persisted session");
                    SessionState::anonymous()
                }
                Err(e) => {
                    warn!(error = %e, "Failed to read persisted session, resetting storage");
                    inner.expire_locked(&mut watchdog);
                    SessionState::anonymous()
                }
            };

            inner.state.send_replace(initial);
            Inner::arm_locked(&inner, &mut watchdog);
        }

        Self { inner }
    }

    /// Watch the session state. The receiver sees every transition.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    pub fn state(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    pub fn current_user(&self) -> Option<SessionUser> {
        self.inner.state.borrow().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.state.borrow().is_authenticated()
    }

    /// Log in and persist the issued token. On failure the previous state is
    /// kept and the error is returned to the caller. A second call while one
    /// is in flight fails with `LoginInProgress`.
    pub async fn login(&self, email: &str, password: &str) -> AuthResult<SessionUser> {
        if self.inner.login_in_flight.swap(true, Ordering::AcqRel) {
            debug!(email, "Duplicate login ignored");
            return Err(AuthError::LoginInProgress);
        }
        let _flight = LoginFlight(&self.inner);
        self.inner.state.send_modify(|state| state.loading = true);

        let response = self.inner.store.login(email, password).await?;
        let token = token::decode(&response.token).ok_or(AuthError::Unauthenticated)?;
        let user = token.user();

        {
            let mut watchdog = self.inner.lock();
            self.inner.storage.set(TOKEN_KEY, &response.token)?;
            self.inner.state.send_replace(SessionState::authenticated(user.clone()));
            Inner::arm_locked(&self.inner, &mut watchdog);
        }
        info!(user_id = user.id, role = %user.role, "Login successful");

        Ok(user)
    }

    /// Clear the session. Safe to call when already anonymous. If the token
    /// cannot be removed from storage the session is left untouched.
    pub fn logout(&self) -> AuthResult<()> {
        let was_authenticated = self.is_authenticated();
        self.inner.clear_locked(&mut self.inner.lock())?;
        if was_authenticated {
            info!("Logged out");
        }
        Ok(())
    }

    /// Fetch the profile for the persisted token.
    pub async fn fetch_profile(&self) -> AuthResult<Profile> {
        let raw = self
            .inner
            .storage
            .get(TOKEN_KEY)?
            .ok_or(AuthError::Unauthenticated)?;
        self.inner.store.fetch_profile(&raw).await
    }

    pub fn time_until_expiry(&self) -> Option<chrono::Duration> {
        if !self.is_authenticated() {
            return None;
        }
        self.inner.persisted_token().map(|t| t.time_until_expiry())
    }

    /// Get minutes remaining until expiry (for display)
    pub fn minutes_until_expiry(&self) -> Option<i64> {
        self.time_until_expiry().map(|d| d.num_minutes().max(0))
    }

    /// Cancel the expiry watchdog. The session itself is left as is.
    pub fn shutdown(&self) {
        self.inner.lock().cancel();
    }
}

impl Drop for SessionManager {
    fn drop(&mut self) {
        self.shutdown();
    }
}

//! Session store - owns the bearer token and the signed-in profile
//!
//! The store is the single writer of [`SessionState`]. Observers hold a
//! `watch::Receiver` and see every replacement of the state; dropping the
//! receiver unsubscribes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{watch, Mutex};

use crate::adapters::ApiClient;
use crate::domain::result::{Error, OperationResult, Result};
use crate::domain::{BearerToken, Session, SessionState, UserProfile};
use crate::ports::{KeyValueStore, TOKEN_KEY, USER_KEY};
use crate::services::logging::{Diagnostics, LogEvent};

pub const MSG_LOGIN_FAILED: &str = "Terjadi kesalahan saat login";
pub const MSG_REGISTER_FAILED: &str = "Terjadi kesalahan saat registrasi";

const SCREEN: &str = "session";

/// Authentication lifecycle: restore, login, register, logout
pub struct SessionStore {
    storage: Arc<dyn KeyValueStore>,
    api: ApiClient,
    state: watch::Sender<SessionState>,
    /// Serializes the entry points so two calls never interleave their
    /// storage writes and state updates
    gate: Mutex<()>,
    restored: AtomicBool,
    diagnostics: Diagnostics,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn KeyValueStore>, api: ApiClient) -> Self {
        let (state, _) = watch::channel(SessionState::restoring());
        Self {
            storage,
            api,
            state,
            gate: Mutex::new(()),
            restored: AtomicBool::new(false),
            diagnostics: Diagnostics::disabled(),
        }
    }

    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Current state snapshot
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn token(&self) -> Option<BearerToken> {
        self.state.borrow().token().cloned()
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.state.borrow().user().cloned()
    }

    /// Session required by authenticated operations
    pub fn require_session(&self) -> Result<Session> {
        self.state
            .borrow()
            .session
            .clone()
            .ok_or(Error::Unauthenticated)
    }

    /// Observe state changes. The receiver starts at the current state.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    fn publish(&self, next: SessionState) {
        self.restored.store(true, Ordering::SeqCst);
        self.state.send_replace(next);
    }

    /// Load the persisted session. Only the first call touches storage;
    /// later calls return the current state.
    pub async fn restore(&self) -> SessionState {
        let _gate = self.gate.lock().await;
        if self.restored.load(Ordering::SeqCst) {
            return self.state();
        }

        let (token, user) = tokio::join!(
            self.storage.get(TOKEN_KEY),
            self.storage.get(USER_KEY)
        );

        let session = match (token, user) {
            (Ok(Some(token)), Ok(Some(user))) => self.parse_persisted(token, &user),
            (Ok(_), Ok(_)) => None,
            (Err(e), _) | (_, Err(e)) => {
                self.diagnostics.failure("session_restore_failed", SCREEN, &e);
                None
            }
        };

        match session {
            Some(session) => self.publish(SessionState::signed_in(session)),
            None => self.publish(SessionState::signed_out()),
        }
        self.state()
    }

    fn parse_persisted(&self, token: String, user: &str) -> Option<Session> {
        let token = BearerToken::new(token)?;
        if user.trim().is_empty() {
            return None;
        }
        match serde_json::from_str::<UserProfile>(user) {
            Ok(profile) => Some(Session::new(token, profile)),
            Err(e) => {
                self.diagnostics
                    .failure("session_restore_failed", SCREEN, &Error::Json(e));
                None
            }
        }
    }

    /// Exchange credentials for a session, persist it, then adopt it
    pub async fn login(&self, email: &str, password: &str) -> OperationResult<UserProfile> {
        let _gate = self.gate.lock().await;

        let response = match self.api.login(email, password).await {
            Ok(response) => response,
            Err(e) => {
                self.diagnostics.failure("login_failed", SCREEN, &e);
                return OperationResult::from_error(&e, MSG_LOGIN_FAILED);
            }
        };

        let Some(token) = BearerToken::new(response.token) else {
            self.diagnostics.event(
                LogEvent::new("login_failed")
                    .with_screen(SCREEN)
                    .with_error("server returned an empty token"),
            );
            return OperationResult::fail(MSG_LOGIN_FAILED);
        };

        let user = response.user;
        if let Err(e) = self.persist(&token, &user).await {
            self.diagnostics.failure("session_persist_failed", SCREEN, &e);
            return OperationResult::fail(MSG_LOGIN_FAILED);
        }

        self.publish(SessionState::signed_in(Session::new(token, user.clone())));
        self.diagnostics
            .event(LogEvent::new("login_succeeded").with_screen(SCREEN));
        OperationResult::ok(user)
    }

    async fn persist(&self, token: &BearerToken, user: &UserProfile) -> Result<()> {
        let user_json = serde_json::to_string(user)?;
        self.storage
            .set_many(&[
                (TOKEN_KEY, token.as_str().to_string()),
                (USER_KEY, user_json),
            ])
            .await
    }

    /// Create an account. Never signs in.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> OperationResult<()> {
        let _gate = self.gate.lock().await;

        match self.api.register(name, email, password).await {
            Ok(()) => {
                self.diagnostics
                    .event(LogEvent::new("register_succeeded").with_screen(SCREEN));
                OperationResult::ok(())
            }
            Err(e) => {
                self.diagnostics.failure("register_failed", SCREEN, &e);
                OperationResult::from_error(&e, MSG_REGISTER_FAILED)
            }
        }
    }

    /// Forget the session. Storage failures are recorded, never surfaced;
    /// the in-memory session is cleared either way.
    pub async fn logout(&self) {
        let _gate = self.gate.lock().await;

        if let Err(e) = self.storage.remove_many(&[TOKEN_KEY, USER_KEY]).await {
            self.diagnostics.failure("logout_storage_failed", SCREEN, &e);
        }

        let already_signed_out = *self.state.borrow() == SessionState::signed_out();
        if !already_signed_out {
            self.publish(SessionState::signed_out());
        }
    }
}

//! Session domain model

use std::fmt;

use serde::{Deserialize, Serialize};

use super::UserProfile;

/// Opaque bearer credential issued at login.
///
/// `Debug` is redacted so the token never ends up in logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BearerToken(String);

impl BearerToken {
    /// Wrap a raw token; empty strings are not tokens
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(***)")
    }
}

/// An authenticated session: token and profile always travel together
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: BearerToken,
    pub user: UserProfile,
}

impl Session {
    pub fn new(token: BearerToken, user: UserProfile) -> Self {
        Self { token, user }
    }
}

/// Observable session state
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub session: Option<Session>,
    /// True until the persisted session has been read at startup
    pub is_restoring: bool,
}

impl SessionState {
    /// State at process start, before restore has run
    pub fn restoring() -> Self {
        Self {
            session: None,
            is_restoring: true,
        }
    }

    pub fn signed_out() -> Self {
        Self {
            session: None,
            is_restoring: false,
        }
    }

    pub fn signed_in(session: Session) -> Self {
        Self {
            session: Some(session),
            is_restoring: false,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn token(&self) -> Option<&BearerToken> {
        self.session.as_ref().map(|s| &s.token)
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.session.as_ref().map(|s| &s.user)
    }
}

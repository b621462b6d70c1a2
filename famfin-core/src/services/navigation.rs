//! Navigation guard - picks the screen flow from the session state

use std::fmt;

use tokio::sync::watch;

use crate::domain::result::{Error, Result};
use crate::domain::SessionState;

/// Where the app is in the auth lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavState {
    /// Persisted session not read yet; nothing is mounted
    Restoring,
    Unauthenticated,
    Authenticated,
}

impl NavState {
    pub fn from_session(state: &SessionState) -> Self {
        if state.is_restoring {
            NavState::Restoring
        } else if state.is_authenticated() {
            NavState::Authenticated
        } else {
            NavState::Unauthenticated
        }
    }
}

impl fmt::Display for NavState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            NavState::Restoring => "restoring",
            NavState::Unauthenticated => "signed out",
            NavState::Authenticated => "signed in",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Register,
    Dashboard,
    Transactions,
    Family,
    Profile,
    AddTransaction,
    Settings,
}

/// A set of screens mounted together
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flow {
    /// Bottom-tab screens (empty for the sign-in flow)
    pub tabs: &'static [Screen],
    /// Screens pushed on top of the tabs, or the whole stack when there
    /// are no tabs
    pub stack: &'static [Screen],
    pub initial: Screen,
}

impl Flow {
    pub const UNAUTHENTICATED: Flow = Flow {
        tabs: &[],
        stack: &[Screen::Login, Screen::Register],
        initial: Screen::Login,
    };

    pub const AUTHENTICATED: Flow = Flow {
        tabs: &[
            Screen::Dashboard,
            Screen::Transactions,
            Screen::Family,
            Screen::Profile,
        ],
        stack: &[Screen::AddTransaction, Screen::Settings],
        initial: Screen::Dashboard,
    };

    pub fn contains(&self, screen: Screen) -> bool {
        self.tabs.contains(&screen) || self.stack.contains(&screen)
    }
}

/// Watches the session store and reports which flow should be mounted
pub struct NavigationGuard {
    receiver: watch::Receiver<SessionState>,
    last: NavState,
}

impl NavigationGuard {
    pub fn new(mut receiver: watch::Receiver<SessionState>) -> Self {
        let last = NavState::from_session(&receiver.borrow_and_update());
        Self { receiver, last }
    }

    /// Latest state, whether or not `changed` has reported it yet
    pub fn state(&self) -> NavState {
        NavState::from_session(&self.receiver.borrow())
    }

    /// Flow to mount; `None` while restoring
    pub fn mounted_flow(&self) -> Option<Flow> {
        match self.state() {
            NavState::Restoring => None,
            NavState::Unauthenticated => Some(Flow::UNAUTHENTICATED),
            NavState::Authenticated => Some(Flow::AUTHENTICATED),
        }
    }

    /// Wait for the next distinct state. Returns `None` once the store is
    /// gone.
    pub async fn changed(&mut self) -> Option<NavState> {
        loop {
            self.receiver.changed().await.ok()?;
            let next = NavState::from_session(&self.receiver.borrow_and_update());
            if next != self.last {
                self.last = next;
                return Some(next);
            }
        }
    }

    /// Wait until restore has finished and return the settled state
    pub async fn settled(&mut self) -> NavState {
        while self.state() == NavState::Restoring {
            if self.changed().await.is_none() {
                break;
            }
        }
        self.last = self.state();
        self.last
    }

    /// Check that `screen` belongs to the mounted flow
    pub fn require(&self, screen: Screen) -> Result<()> {
        match self.mounted_flow() {
            Some(flow) if flow.contains(screen) => Ok(()),
            Some(_) if self.state() == NavState::Unauthenticated => Err(Error::Unauthenticated),
            Some(_) => Err(Error::Other(format!("{:?} is not available while signed in", screen))),
            None => Err(Error::Other("Session is still being restored".to_string())),
        }
    }

    /// Stop observing the store
    pub fn unsubscribe(self) {
        drop(self.receiver);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BearerToken, Session, UserProfile};

    fn signed_in() -> SessionState {
        SessionState::signed_in(Session::new(
            BearerToken::new("abc").unwrap(),
            UserProfile::new("Ana", "ana@example.com"),
        ))
    }

    #[test]
    fn test_nothing_mounted_while_restoring() {
        let (_tx, rx) = watch::channel(SessionState::restoring());
        let guard = NavigationGuard::new(rx);
        assert_eq!(guard.state(), NavState::Restoring);
        assert!(guard.mounted_flow().is_none());
        assert!(guard.require(Screen::Login).is_err());
    }

    #[test]
    fn test_flows() {
        assert_eq!(Flow::UNAUTHENTICATED.initial, Screen::Login);
        assert!(Flow::UNAUTHENTICATED.contains(Screen::Register));
        assert!(!Flow::UNAUTHENTICATED.contains(Screen::Dashboard));

        assert_eq!(Flow::AUTHENTICATED.initial, Screen::Dashboard);
        assert_eq!(Flow::AUTHENTICATED.tabs.len(), 4);
        assert!(Flow::AUTHENTICATED.contains(Screen::Settings));
        assert!(!Flow::AUTHENTICATED.contains(Screen::Login));
    }

    #[tokio::test]
    async fn test_transitions_are_reported_once() {
        let (tx, rx) = watch::channel(SessionState::restoring());
        let mut guard = NavigationGuard::new(rx);

        tx.send_replace(SessionState::signed_out());
        assert_eq!(guard.changed().await, Some(NavState::Unauthenticated));
        assert!(matches!(guard.require(Screen::Dashboard), Err(Error::Unauthenticated)));

        // Same nav state again is not a transition
        tx.send_replace(SessionState::signed_out());
        tx.send_replace(signed_in());
        assert_eq!(guard.changed().await, Some(NavState::Authenticated));
        assert_eq!(guard.mounted_flow(), Some(Flow::AUTHENTICATED));
        assert!(guard.require(Screen::Transactions).is_ok());

        tx.send_replace(SessionState::signed_out());
        assert_eq!(guard.changed().await, Some(NavState::Unauthenticated));

        drop(tx);
        assert_eq!(guard.changed().await, None);
    }

    #[tokio::test]
    async fn test_settled_waits_for_restore() {
        let (tx, rx) = watch::channel(SessionState::restoring());
        let mut guard = NavigationGuard::new(rx);

        let handle = tokio::spawn(async move {
            tx.send_replace(signed_in());
            tx
        });
        assert_eq!(guard.settled().await, NavState::Authenticated);
        let _tx = handle.await.unwrap();
        guard.unsubscribe();
    }
}

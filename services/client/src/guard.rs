//! services/client/src/guard.rs
//!
//! Gatekeeper for protected screens: nothing protected is shown until the
//! session has settled, and only an authenticated session gets through.

use sysfree_core::domain::{SessionStatus, UserProfile};

use crate::session::{SessionSnapshot, SessionStore};

#[derive(Debug, Clone, PartialEq)]
pub enum GuardDecision {
    /// The session is still initializing; show a loading indicator.
    Pending,
    /// Send the user to the login screen.
    Redirect { to: String },
    Allow(UserProfile),
}

#[derive(Debug, Clone)]
pub struct RouteGuard {
    login_path: String,
}

impl RouteGuard {
    pub fn new(login_path: impl Into<String>) -> Self {
        Self {
            login_path: login_path.into(),
        }
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    pub fn decide(&self, session: &SessionSnapshot) -> GuardDecision {
        match (&session.status, &session.current_user) {
            (SessionStatus::Initializing, _) => GuardDecision::Pending,
            (SessionStatus::Authenticated, Some(user)) => GuardDecision::Allow(user.clone()),
            _ => GuardDecision::Redirect {
                to: self.login_path.clone(),
            },
        }
    }

    /// Initializes the session if needed, waits for it to settle and decides.
    /// Never returns `Pending`.
    pub async fn resolve(&self, session: &SessionStore) -> GuardDecision {
        self.decide(&session.ready().await)
    }
}

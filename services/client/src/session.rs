//! services/client/src/session.rs
//!
//! The authentication lifecycle for the whole application lifetime.
//!
//! ```text
//! initializing ──► authenticated | anonymous | error
//! authenticated ──logout──► anonymous ──login──► authenticated
//! ```
//!
//! Views read the session through [`SessionSnapshot`]s and never touch the
//! persisted tokens; the store and the request pipeline are the only writers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sysfree_core::domain::{SessionStatus, StorageKey, UserProfile};
use sysfree_core::ports::{PortError, PortResult, TokenStore};
use sysfree_core::token;
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::services::AuthService;

pub const USER_INFO_ERROR: &str = "Error fetching user info.";
pub const SESSION_EXPIRED_ERROR: &str = "Session expired, please log in again.";
pub const LOGIN_ERROR: &str = "Login failed. Please check your credentials.";
pub const PROFILE_UPDATE_ERROR: &str = "Error updating profile.";

/// What every consumer of the session sees.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub status: SessionStatus,
    /// Present iff `status` is `Authenticated`.
    pub current_user: Option<UserProfile>,
    /// User-facing message of the last failure.
    pub error: Option<String>,
}

impl SessionSnapshot {
    fn initializing() -> Self {
        Self {
            status: SessionStatus::Initializing,
            current_user: None,
            error: None,
        }
    }

    pub fn loading(&self) -> bool {
        self.status == SessionStatus::Initializing
    }

    pub fn is_authenticated(&self) -> bool {
        self.status == SessionStatus::Authenticated
    }
}

pub struct SessionStore {
    auth: AuthService,
    tokens: Arc<dyn TokenStore>,
    state: watch::Sender<SessionSnapshot>,
    started: AtomicBool,
}

impl SessionStore {
    pub fn new(auth: AuthService, tokens: Arc<dyn TokenStore>) -> Self {
        let (state, _) = watch::channel(SessionSnapshot::initializing());
        Self {
            auth,
            tokens,
            state,
            started: AtomicBool::new(false),
        }
    }

    //-------------------------------------------------------------------------------------
    // Read surface
    //-------------------------------------------------------------------------------------

    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }

    pub fn status(&self) -> SessionStatus {
        self.state.borrow().status
    }

    pub fn current_user(&self) -> Option<UserProfile> {
        self.state.borrow().current_user.clone()
    }

    pub fn loading(&self) -> bool {
        self.state.borrow().loading()
    }

    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state.subscribe()
    }

    /// Resolves once initialization has finished, with the state at that point.
    ///
    /// Starts initialization if nobody has yet; otherwise waits for the run in progress.
    pub async fn ready(&self) -> SessionSnapshot {
        self.initialize().await;
        let mut rx = self.state.subscribe();
        let result = rx.wait_for(|snapshot| !snapshot.loading()).await;
        match result {
            Ok(snapshot) => snapshot.clone(),
            // The sender lives in `self`, so it cannot be gone while we borrow it.
            Err(_) => self.snapshot(),
        }
    }

    //-------------------------------------------------------------------------------------
    // Lifecycle
    //-------------------------------------------------------------------------------------

    /// Restores the session from persisted tokens. Runs once; later calls are no-ops.
    ///
    /// Always leaves `initializing`, whatever goes wrong on the way.
    pub async fn initialize(&self) {
        if self.started.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Err(e) = self.restore(Utc::now()).await {
            error!("session initialization failed: {:?}", e);
            self.state.send_modify(|s| {
                s.status = SessionStatus::Error;
                s.current_user = None;
            });
        }
    }

    async fn restore(&self, now: DateTime<Utc>) -> PortResult<()> {
        let Some(access) = self.persisted(StorageKey::AccessToken) else {
            self.become_anonymous(None);
            return Ok(());
        };

        if token::is_expired(&access, now)? {
            let Some(refresh) = self.persisted(StorageKey::RefreshToken) else {
                info!("access token expired and no refresh token is stored");
                self.clear_tokens();
                self.become_anonymous(None);
                return Ok(());
            };
            match self.auth.refresh_token(&refresh).await {
                Ok(access) => self.tokens.set(StorageKey::AccessToken, &access)?,
                Err(e) => {
                    warn!("refreshing an expired session failed: {:?}", e);
                    self.clear_tokens();
                    self.become_anonymous(Some(SESSION_EXPIRED_ERROR.to_string()));
                    return Ok(());
                }
            }
        }

        match self.auth.current_user().await {
            Ok(user) => self.become_authenticated(user),
            Err(e) => {
                error!("fetching the current user failed: {:?}", e);
                self.clear_tokens();
                self.become_anonymous(Some(USER_INFO_ERROR.to_string()));
            }
        }
        Ok(())
    }

    /// Logs in, persists both tokens and loads the profile.
    ///
    /// On failure the user-facing message is stored and the error returned.
    pub async fn login(&self, email: &str, password: &str) -> PortResult<UserProfile> {
        self.set_error(None);
        let result = async {
            let pair = self.auth.login(email, password).await?;
            self.tokens.set(StorageKey::AccessToken, &pair.access)?;
            self.tokens.set(StorageKey::RefreshToken, &pair.refresh)?;
            self.auth.current_user().await
        }
        .await;

        match result {
            Ok(user) => {
                info!(user = %user.email, "logged in");
                self.become_authenticated(user.clone());
                Ok(user)
            }
            Err(e) => {
                error!("login failed: {:?}", e);
                self.set_error(Some(friendly(&e, LOGIN_ERROR)));
                Err(e)
            }
        }
    }

    /// Clears every persisted entry and forgets the user. Never fails.
    pub fn logout(&self) {
        self.clear_tokens();
        self.state.send_modify(|s| {
            s.status = SessionStatus::Anonymous;
            s.current_user = None;
        });
    }

    pub async fn update_profile<B: Serialize + ?Sized>(&self, profile: &B) -> PortResult<UserProfile> {
        self.set_error(None);
        match self.auth.update_profile(profile).await {
            Ok(user) => {
                self.become_authenticated(user.clone());
                Ok(user)
            }
            Err(e) => {
                error!("profile update failed: {:?}", e);
                self.set_error(Some(friendly(&e, PROFILE_UPDATE_ERROR)));
                Err(e)
            }
        }
    }

    //-------------------------------------------------------------------------------------
    // Helpers
    //-------------------------------------------------------------------------------------

    fn persisted(&self, key: StorageKey) -> Option<String> {
        self.tokens.get(key).filter(|value| !value.is_empty())
    }

    fn clear_tokens(&self) {
        if let Err(e) = self.tokens.clear() {
            error!("failed to clear persisted session: {:?}", e);
        }
    }

    fn become_authenticated(&self, user: UserProfile) {
        // Written for older readers of the storage, never read back.
        match serde_json::to_string(&user) {
            Ok(raw) => {
                if let Err(e) = self.tokens.set(StorageKey::User, &raw) {
                    warn!("failed to cache user profile: {:?}", e);
                }
            }
            Err(e) => warn!("failed to serialize user profile: {:?}", e),
        }
        self.state.send_modify(|s| {
            s.status = SessionStatus::Authenticated;
            s.current_user = Some(user);
        });
    }

    fn become_anonymous(&self, error: Option<String>) {
        self.state.send_modify(|s| {
            s.status = SessionStatus::Anonymous;
            s.current_user = None;
            if error.is_some() {
                s.error = error;
            }
        });
    }

    fn set_error(&self, error: Option<String>) {
        self.state.send_modify(|s| s.error = error);
    }
}

/// The server's `detail`, or `fallback` when there is none.
fn friendly(error: &PortError, fallback: &str) -> String {
    error.detail().unwrap_or(fallback).to_string()
}

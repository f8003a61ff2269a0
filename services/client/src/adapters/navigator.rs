//! services/client/src/adapters/navigator.rs
//!
//! A `Navigator` for headless use: the redirect is recorded and logged, and
//! anyone holding a receiver learns that the login screen is required.

use sysfree_core::ports::Navigator;
use tokio::sync::watch;
use tracing::warn;

pub struct LoginRedirect {
    login_path: String,
    redirects: watch::Sender<u64>,
}

impl LoginRedirect {
    pub fn new(login_path: impl Into<String>) -> Self {
        let (redirects, _) = watch::channel(0);
        Self {
            login_path: login_path.into(),
            redirects,
        }
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// Number of forced redirects so far.
    pub fn count(&self) -> u64 {
        *self.redirects.borrow()
    }

    /// Observes forced redirects; the value is the running count.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.redirects.subscribe()
    }
}

impl Navigator for LoginRedirect {
    fn redirect_to_login(&self) {
        warn!(to = %self.login_path, "session ended, redirecting to login");
        self.redirects.send_modify(|count| *count += 1);
    }
}

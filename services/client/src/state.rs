//! services/client/src/state.rs
//!
//! Defines the application's shared state: every adapter and service, built
//! once from the configuration and shared by all screens.

use std::sync::Arc;

use sysfree_core::ports::{TokenStore, Transport};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::adapters::{FileTokenStore, LoginRedirect, MemoryTokenStore, ReqwestTransport};
use crate::config::Config;
use crate::error::ClientError;
use crate::guard::RouteGuard;
use crate::http::HttpClient;
use crate::services::Api;
use crate::session::SessionStore;

//=========================================================================================
// AppState (Shared Across All Screens)
//=========================================================================================

/// The shared application state, created once at startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub tokens: Arc<dyn TokenStore>,
    pub navigator: Arc<LoginRedirect>,
    pub http: Arc<HttpClient>,
    pub api: Api,
    pub session: Arc<SessionStore>,
    pub guard: RouteGuard,
    /// Cancelled when the application shuts down.
    pub shutdown: CancellationToken,
}

impl AppState {
    /// Builds the real adapters: reqwest for the network and a file or
    /// in-memory store for the session tokens.
    pub fn from_config(config: Arc<Config>) -> Result<Self, ClientError> {
        let transport = Arc::new(ReqwestTransport::new(&config.api_url, config.request_timeout)?);
        let tokens: Arc<dyn TokenStore> = match &config.token_store_path {
            Some(path) => {
                info!("Persisting session in {}", path.display());
                Arc::new(FileTokenStore::open(path)?)
            }
            None => Arc::new(MemoryTokenStore::default()),
        };
        Ok(Self::with_ports(config, transport, tokens))
    }

    /// Wires the services on top of arbitrary transport and storage adapters.
    pub fn with_ports(config: Arc<Config>, transport: Arc<dyn Transport>, tokens: Arc<dyn TokenStore>) -> Self {
        let navigator = Arc::new(LoginRedirect::new(config.login_path.clone()));
        let http = Arc::new(HttpClient::new(transport, tokens.clone(), navigator.clone()));
        let api = Api::new(http.clone());
        let session = Arc::new(SessionStore::new(api.auth(), tokens.clone()));
        let guard = RouteGuard::new(config.login_path.clone());

        Self {
            config,
            tokens,
            navigator,
            http,
            api,
            session,
            guard,
            shutdown: CancellationToken::new(),
        }
    }

    /// Keeps the session in step with forced redirects: when the request
    /// pipeline gives up on the session, the store forgets the user too.
    pub fn watch_forced_logouts(&self) -> JoinHandle<()> {
        let mut redirects = self.navigator.subscribe();
        let session = self.session.clone();
        let shutdown = self.shutdown.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    changed = redirects.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        redirects.borrow_and_update();
                        session.logout();
                    }
                }
            }
        })
    }
}

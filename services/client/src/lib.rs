pub mod adapters;
pub mod config;
pub mod debounce;
pub mod error;
pub mod guard;
pub mod http;
pub mod pagination;
pub mod services;
pub mod session;
pub mod state;

pub use guard::{GuardDecision, RouteGuard};
pub use http::HttpClient;
pub use pagination::{ListController, ListState};
pub use session::{SessionSnapshot, SessionStore};
pub use state::AppState;

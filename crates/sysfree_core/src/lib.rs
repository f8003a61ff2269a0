pub mod domain;
pub mod formatters;
pub mod forms;
pub mod paging;
pub mod ports;
pub mod query;
pub mod token;
pub mod validators;
pub mod wire;

pub use domain::{
    AccessToken, Credentials, Page, Record, RefreshRequest, SessionStatus, StorageKey, TokenPair,
    UserProfile,
};
pub use ports::{Navigator, PageFetcher, PortError, PortResult, TokenStore, Transport};
pub use query::{Filters, QueryParams};
pub use wire::{ApiRequest, ApiResponse, Method};

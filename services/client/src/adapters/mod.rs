pub mod http_transport;
pub mod navigator;
pub mod token_store;

pub use http_transport::ReqwestTransport;
pub use navigator::LoginRedirect;
pub use token_store::{FileTokenStore, MemoryTokenStore};

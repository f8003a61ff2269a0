pub mod auth;
pub mod backoffice;
pub mod reports;
pub mod resource;
pub mod storefront;

use std::sync::Arc;

use crate::http::HttpClient;

pub use auth::{AuthService, PasswordChange};
pub use backoffice::{Accounting, Customers, Inventory, Repairs, Sales};
pub use reports::Reports;
pub use resource::Resource;
pub use storefront::Storefront;

/// Entry point to every backend service, all sharing one request pipeline.
#[derive(Clone)]
pub struct Api {
    http: Arc<HttpClient>,
}

impl Api {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    pub fn http(&self) -> &Arc<HttpClient> {
        &self.http
    }

    pub fn auth(&self) -> AuthService {
        AuthService::new(self.http.clone())
    }

    pub fn inventory(&self) -> Inventory {
        Inventory::new(self.http.clone())
    }

    pub fn customers(&self) -> Customers {
        Customers::new(self.http.clone())
    }

    pub fn sales(&self) -> Sales {
        Sales::new(self.http.clone())
    }

    pub fn repairs(&self) -> Repairs {
        Repairs::new(self.http.clone())
    }

    pub fn accounting(&self) -> Accounting {
        Accounting::new(self.http.clone())
    }

    pub fn reports(&self) -> Reports {
        Reports::new(self.http.clone())
    }

    pub fn storefront(&self) -> Storefront {
        Storefront::new(self.http.clone())
    }
}

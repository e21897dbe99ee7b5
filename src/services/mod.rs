//! Service layer for business logic
//!
//! Transport-free operations shared by the HTTP API and the CLI.

mod admin;
pub mod allocation;
mod auth;
pub mod code_generator;
mod link_service;
pub mod quota;
mod redirect;
pub mod session;

use std::sync::Arc;

pub use admin::{AccountUpdate, AdminService};
pub use allocation::Allocator;
pub use auth::{AuthService, NewAccountOptions, require_admin};
pub use code_generator::{CodeLength, generate_candidate};
pub use link_service::{CreateLinkRequest, LinkService};
pub use quota::{QuotaGuard, QuotaReservation};
pub use redirect::RedirectResolver;
pub use session::{JwtService, SessionToken};

use crate::config::AppConfig;
use crate::errors::Result;
use crate::storage::Stores;

/// Every service, built once at startup from the config and the stores
#[derive(Clone)]
pub struct AppServices {
    pub auth: AuthService,
    pub links: LinkService,
    pub admin: AdminService,
    pub redirect: RedirectResolver,
    pub sessions: Arc<JwtService>,
    pub stores: Stores,
}

impl AppServices {
    /// `config.auth.jwt_secret` must already be set.
    pub fn build(config: &AppConfig, stores: Stores) -> Result<Self> {
        let allocator = Allocator::new(stores.links.clone(), stores.accounts.clone(), &config.links)?;

        Ok(Self {
            auth: AuthService::new(stores.accounts.clone(), config.links.default_url_limit),
            links: LinkService::new(stores.links.clone(), allocator),
            admin: AdminService::new(stores.links.clone(), stores.accounts.clone()),
            redirect: RedirectResolver::new(stores.links.clone()),
            sessions: Arc::new(JwtService::from_config(&config.auth)),
            stores,
        })
    }
}

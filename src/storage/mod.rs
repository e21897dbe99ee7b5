//! Persistence layer
//!
//! Two store seams, [`LinkStore`] and [`AccountStore`], both backed either by
//! SeaORM (SQLite / MySQL / PostgreSQL) or by an in-process DashMap store.
//! Each store provides the two atomic primitives the allocation protocol
//! relies on: conditional create, and conditional increment of `url_count`.

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::DatabaseConfig;
use crate::errors::Result;

pub mod backend;
pub mod memory;
pub mod models;

pub use backend::SeaOrmStorage;
pub use memory::MemoryStorage;
pub use models::{InsertOutcome, ShortLink, UserAccount};

pub const MEMORY_BACKEND_URL: &str = "memory://";

#[async_trait]
pub trait LinkStore: Send + Sync {
    /// Creates the record only if no record with the same code exists.
    async fn insert_link_if_absent(&self, link: &ShortLink) -> Result<InsertOutcome>;

    async fn get_link(&self, code: &str) -> Result<Option<ShortLink>>;

    /// Returns `false` when the code did not exist.
    async fn remove_link(&self, code: &str) -> Result<bool>;

    async fn list_links(&self) -> Result<Vec<ShortLink>>;

    async fn list_links_by_owner(&self, owner_id: &str) -> Result<Vec<ShortLink>>;

    /// Cheap round-trip used by readiness probes
    async fn ping(&self) -> Result<()>;

    fn backend_name(&self) -> &str;
}

#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn insert_account_if_absent(&self, account: &UserAccount) -> Result<InsertOutcome>;

    async fn get_account(&self, user_id: &str) -> Result<Option<UserAccount>>;

    /// `url_count = url_count + 1` only while `url_count < url_limit`.
    ///
    /// Returns `false` when the user is absent or already at the limit.
    async fn increment_url_count_within_limit(&self, user_id: &str) -> Result<bool>;

    /// Returns `false` when the user does not exist.
    async fn set_password_hash(&self, user_id: &str, password_hash: &str) -> Result<bool>;

    /// Applies whichever fields are given. Returns `false` when the user does
    /// not exist.
    async fn update_account_privileges(
        &self,
        user_id: &str,
        url_limit: Option<i64>,
        is_admin: Option<bool>,
    ) -> Result<bool>;
}

/// Store handles shared by every service
#[derive(Clone)]
pub struct Stores {
    pub links: Arc<dyn LinkStore>,
    pub accounts: Arc<dyn AccountStore>,
    sea_orm: Option<Arc<SeaOrmStorage>>,
}

impl Stores {
    pub fn memory() -> Self {
        let storage = Arc::new(MemoryStorage::new());
        Self {
            links: storage.clone(),
            accounts: storage,
            sea_orm: None,
        }
    }

    pub fn from_sea_orm(storage: Arc<SeaOrmStorage>) -> Self {
        Self {
            links: storage.clone(),
            accounts: storage.clone(),
            sea_orm: Some(storage),
        }
    }

    pub fn backend_name(&self) -> &str {
        self.links.backend_name()
    }

    /// Closes the database pool, if there is one.
    pub async fn close(&self) {
        if let Some(storage) = &self.sea_orm {
            storage.close().await;
        }
    }
}

pub struct StorageFactory;

impl StorageFactory {
    pub async fn create(config: &DatabaseConfig) -> Result<Stores> {
        if config.database_url == MEMORY_BACKEND_URL {
            tracing::warn!("Using in-memory storage, data will not survive a restart");
            return Ok(Stores::memory());
        }

        let storage = SeaOrmStorage::new(config).await?;
        Ok(Stores::from_sea_orm(Arc::new(storage)))
    }
}

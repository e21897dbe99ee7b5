//! Administrative mutations

use std::sync::Arc;

use tracing::info;

use super::auth::require_admin;
use crate::errors::{Result, UrlVaultError};
use crate::storage::{AccountStore, LinkStore, UserAccount};

/// Fields an admin may change on an account
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccountUpdate {
    pub url_limit: Option<i64>,
    pub is_admin: Option<bool>,
}

#[derive(Clone)]
pub struct AdminService {
    links: Arc<dyn LinkStore>,
    accounts: Arc<dyn AccountStore>,
}

impl AdminService {
    pub fn new(links: Arc<dyn LinkStore>, accounts: Arc<dyn AccountStore>) -> Self {
        Self { links, accounts }
    }

    /// Deleting does not give the owner's quota slot back.
    pub async fn delete_link(&self, actor: &UserAccount, code: &str) -> Result<()> {
        require_admin(actor)?;

        if !self.links.remove_link(code).await? {
            return Err(UrlVaultError::not_found("Short URL does not exist."));
        }

        info!("Admin {} deleted short link {}", actor.user_id, code);
        Ok(())
    }

    pub async fn update_account(
        &self,
        actor: &UserAccount,
        user_id: &str,
        update: AccountUpdate,
    ) -> Result<UserAccount> {
        require_admin(actor)?;
        self.apply_account_update(user_id, update).await
    }

    /// Applies an update without an acting admin. Used by the operator CLI.
    pub async fn apply_account_update(
        &self,
        user_id: &str,
        update: AccountUpdate,
    ) -> Result<UserAccount> {
        if let Some(limit) = update.url_limit
            && limit < 0
        {
            return Err(UrlVaultError::invalid_format(
                "url_limit must be greater than or equal to 0",
            ));
        }

        let found = self
            .accounts
            .update_account_privileges(user_id, update.url_limit, update.is_admin)
            .await?;
        if !found {
            return Err(UrlVaultError::user_not_found(format!(
                "User '{}' not found",
                user_id
            )));
        }

        info!(
            "Account {} updated (url_limit: {:?}, is_admin: {:?})",
            user_id, update.url_limit, update.is_admin
        );

        self.accounts
            .get_account(user_id)
            .await?
            .ok_or_else(|| UrlVaultError::user_not_found(format!("User '{}' not found", user_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::storage::{MemoryStorage, ShortLink};

    async fn setup() -> (AdminService, Arc<MemoryStorage>, UserAccount, UserAccount) {
        let store = Arc::new(MemoryStorage::new());
        let alice = UserAccount::new("alice123", "h", 20);
        let mut admin = UserAccount::new("rootadmin1", "h", 20);
        admin.is_admin = true;
        store.insert_account_if_absent(&alice).await.unwrap();
        store.insert_account_if_absent(&admin).await.unwrap();
        (
            AdminService::new(store.clone(), store.clone()),
            store,
            alice,
            admin,
        )
    }

    #[tokio::test]
    async fn test_delete_link_keeps_quota_count() {
        let (service, store, alice, admin) = setup().await;
        store
            .insert_link_if_absent(&ShortLink::new("abcdefghij", "https://example.com/", "alice123"))
            .await
            .unwrap();
        store.increment_url_count_within_limit("alice123").await.unwrap();

        let err = service.delete_link(&alice, "abcdefghij").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AdminRequired);

        service.delete_link(&admin, "abcdefghij").await.unwrap();
        assert!(store.get_link("abcdefghij").await.unwrap().is_none());
        assert_eq!(
            store.get_account("alice123").await.unwrap().unwrap().url_count,
            1
        );

        let err = service.delete_link(&admin, "abcdefghij").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_update_account() {
        let (service, _, alice, admin) = setup().await;

        let err = service
            .update_account(&alice, "alice123", AccountUpdate { url_limit: Some(99), is_admin: None })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AdminRequired);

        let updated = service
            .update_account(
                &admin,
                "alice123",
                AccountUpdate {
                    url_limit: Some(99),
                    is_admin: Some(true),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.url_limit, 99);
        assert!(updated.is_admin);
    }

    #[tokio::test]
    async fn test_update_account_errors() {
        let (service, _, _, admin) = setup().await;

        let err = service
            .update_account(&admin, "nobody99", AccountUpdate { url_limit: Some(1), is_admin: None })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UserNotFound);

        let err = service
            .update_account(&admin, "alice123", AccountUpdate { url_limit: Some(-1), is_admin: None })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFormat);
    }
}

//! In-process store backed by DashMap
//!
//! Conditional create goes through the `entry` API and the quota increment
//! runs under the per-entry write lock, so both are atomic per key.

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use super::{AccountStore, InsertOutcome, LinkStore, ShortLink, UserAccount};
use crate::errors::Result;

#[derive(Default)]
pub struct MemoryStorage {
    links: DashMap<String, ShortLink>,
    accounts: DashMap<String, UserAccount>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LinkStore for MemoryStorage {
    async fn insert_link_if_absent(&self, link: &ShortLink) -> Result<InsertOutcome> {
        match self.links.entry(link.code.clone()) {
            Entry::Occupied(_) => Ok(InsertOutcome::AlreadyExists),
            Entry::Vacant(slot) => {
                slot.insert(link.clone());
                Ok(InsertOutcome::Inserted)
            }
        }
    }

    async fn get_link(&self, code: &str) -> Result<Option<ShortLink>> {
        Ok(self.links.get(code).map(|entry| entry.value().clone()))
    }

    async fn remove_link(&self, code: &str) -> Result<bool> {
        Ok(self.links.remove(code).is_some())
    }

    async fn list_links(&self) -> Result<Vec<ShortLink>> {
        Ok(self.links.iter().map(|entry| entry.value().clone()).collect())
    }

    async fn list_links_by_owner(&self, owner_id: &str) -> Result<Vec<ShortLink>> {
        Ok(self
            .links
            .iter()
            .filter(|entry| entry.owner_id == owner_id)
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    fn backend_name(&self) -> &str {
        "memory"
    }
}

#[async_trait]
impl AccountStore for MemoryStorage {
    async fn insert_account_if_absent(&self, account: &UserAccount) -> Result<InsertOutcome> {
        match self.accounts.entry(account.user_id.clone()) {
            Entry::Occupied(_) => Ok(InsertOutcome::AlreadyExists),
            Entry::Vacant(slot) => {
                slot.insert(account.clone());
                Ok(InsertOutcome::Inserted)
            }
        }
    }

    async fn get_account(&self, user_id: &str) -> Result<Option<UserAccount>> {
        Ok(self.accounts.get(user_id).map(|entry| entry.value().clone()))
    }

    async fn increment_url_count_within_limit(&self, user_id: &str) -> Result<bool> {
        let Some(mut account) = self.accounts.get_mut(user_id) else {
            return Ok(false);
        };
        if account.url_count < account.url_limit {
            account.url_count += 1;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn set_password_hash(&self, user_id: &str, password_hash: &str) -> Result<bool> {
        match self.accounts.get_mut(user_id) {
            Some(mut account) => {
                account.password_hash = password_hash.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn update_account_privileges(
        &self,
        user_id: &str,
        url_limit: Option<i64>,
        is_admin: Option<bool>,
    ) -> Result<bool> {
        let Some(mut account) = self.accounts.get_mut(user_id) else {
            return Ok(false);
        };
        if let Some(limit) = url_limit {
            account.url_limit = limit;
        }
        if let Some(admin) = is_admin {
            account.is_admin = admin;
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_conditional_create_keeps_first_record() {
        let store = MemoryStorage::new();
        let first = ShortLink::new("abcdefghij", "https://a.example/", "alice123");
        let second = ShortLink::new("abcdefghij", "https://b.example/", "bobby123");

        assert_eq!(
            store.insert_link_if_absent(&first).await.unwrap(),
            InsertOutcome::Inserted
        );
        assert_eq!(
            store.insert_link_if_absent(&second).await.unwrap(),
            InsertOutcome::AlreadyExists
        );

        let stored = store.get_link("abcdefghij").await.unwrap().unwrap();
        assert_eq!(stored.target_url, "https://a.example/");
        assert_eq!(stored.owner_id, "alice123");
    }

    #[tokio::test]
    async fn test_increment_stops_at_limit() {
        let store = MemoryStorage::new();
        store
            .insert_account_if_absent(&UserAccount::new("alice123", "h", 2))
            .await
            .unwrap();

        assert!(store.increment_url_count_within_limit("alice123").await.unwrap());
        assert!(store.increment_url_count_within_limit("alice123").await.unwrap());
        assert!(!store.increment_url_count_within_limit("alice123").await.unwrap());
        assert!(!store.increment_url_count_within_limit("nobody99").await.unwrap());

        let account = store.get_account("alice123").await.unwrap().unwrap();
        assert_eq!(account.url_count, 2);
    }

    #[tokio::test]
    async fn test_list_by_owner_and_remove() {
        let store = MemoryStorage::new();
        for (code, owner) in [("code000001", "alice123"), ("code000002", "bobby123"), ("code000003", "alice123")] {
            store
                .insert_link_if_absent(&ShortLink::new(code, "https://example.com/", owner))
                .await
                .unwrap();
        }

        let mut own: Vec<String> = store
            .list_links_by_owner("alice123")
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.code)
            .collect();
        own.sort();
        assert_eq!(own, vec!["code000001", "code000003"]);
        assert_eq!(store.list_links().await.unwrap().len(), 3);

        assert!(store.remove_link("code000001").await.unwrap());
        assert!(!store.remove_link("code000001").await.unwrap());
        assert!(store.get_link("code000001").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_privileges_partial() {
        let store = MemoryStorage::new();
        store
            .insert_account_if_absent(&UserAccount::new("alice123", "h", 20))
            .await
            .unwrap();

        assert!(store
            .update_account_privileges("alice123", Some(50), None)
            .await
            .unwrap());
        let account = store.get_account("alice123").await.unwrap().unwrap();
        assert_eq!(account.url_limit, 50);
        assert!(!account.is_admin);

        assert!(store
            .update_account_privileges("alice123", None, Some(true))
            .await
            .unwrap());
        let account = store.get_account("alice123").await.unwrap().unwrap();
        assert_eq!(account.url_limit, 50);
        assert!(account.is_admin);

        assert!(!store
            .update_account_privileges("nobody99", Some(1), None)
            .await
            .unwrap());
    }
}

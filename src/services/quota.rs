//! Per-user creation quota
//!
//! A request is admitted by [`QuotaGuard::check_and_reserve`] and charged by
//! [`QuotaGuard::commit`] once its code has been claimed. The commit is a
//! single conditional increment in the store, so two requests racing for the
//! last slot cannot both be charged.

use std::sync::Arc;

use tracing::debug;

use crate::errors::{Result, UrlVaultError};
use crate::storage::AccountStore;

/// Proof that the owner had capacity when the request was admitted
#[derive(Debug)]
#[must_use = "a reservation must be committed once the code is claimed"]
pub struct QuotaReservation {
    user_id: String,
}

impl QuotaReservation {
    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}

#[derive(Clone)]
pub struct QuotaGuard {
    accounts: Arc<dyn AccountStore>,
}

impl QuotaGuard {
    pub fn new(accounts: Arc<dyn AccountStore>) -> Self {
        Self { accounts }
    }

    /// Fails with `QuotaExceeded` when `url_count >= url_limit`. Mutates nothing.
    pub async fn check_and_reserve(&self, owner_id: &str) -> Result<QuotaReservation> {
        let account = self
            .accounts
            .get_account(owner_id)
            .await?
            .ok_or_else(|| UrlVaultError::user_not_found(format!("User '{}' not found", owner_id)))?;

        if !account.has_capacity() {
            return Err(UrlVaultError::quota_exceeded(format!(
                "URL limit reached ({} of {})",
                account.url_count, account.url_limit
            )));
        }

        Ok(QuotaReservation {
            user_id: account.user_id,
        })
    }

    /// Charges the reservation. Returns `false` when a concurrent request took
    /// the last slot first.
    pub async fn commit(&self, reservation: QuotaReservation) -> Result<bool> {
        let charged = self
            .accounts
            .increment_url_count_within_limit(&reservation.user_id)
            .await?;
        debug!(
            "Quota commit for '{}': {}",
            reservation.user_id,
            if charged { "charged" } else { "rejected" }
        );
        Ok(charged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCategory;
    use crate::storage::{MemoryStorage, UserAccount};

    async fn guard_with(limit: i64, count: i64) -> (QuotaGuard, Arc<MemoryStorage>) {
        let store = Arc::new(MemoryStorage::new());
        let mut account = UserAccount::new("alice123", "h", limit);
        account.url_count = count;
        store.insert_account_if_absent(&account).await.unwrap();
        (QuotaGuard::new(store.clone()), store)
    }

    #[tokio::test]
    async fn test_reserve_and_commit() {
        let (guard, store) = guard_with(1, 0).await;

        let reservation = guard.check_and_reserve("alice123").await.unwrap();
        assert_eq!(reservation.user_id(), "alice123");
        assert!(guard.commit(reservation).await.unwrap());

        let account = store.get_account("alice123").await.unwrap().unwrap();
        assert_eq!(account.url_count, 1);
    }

    #[tokio::test]
    async fn test_at_limit_is_rejected_without_mutation() {
        let (guard, store) = guard_with(3, 3).await;

        let err = guard.check_and_reserve("alice123").await.unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Capacity);

        let account = store.get_account("alice123").await.unwrap().unwrap();
        assert_eq!(account.url_count, 3);
    }

    #[tokio::test]
    async fn test_zero_limit_is_rejected() {
        let (guard, _) = guard_with(0, 0).await;
        assert!(matches!(
            guard.check_and_reserve("alice123").await,
            Err(UrlVaultError::QuotaExceeded(_))
        ));
    }

    #[tokio::test]
    async fn test_unknown_user() {
        let (guard, _) = guard_with(1, 0).await;
        assert!(matches!(
            guard.check_and_reserve("nobody99").await,
            Err(UrlVaultError::UserNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_second_commit_for_last_slot_fails() {
        let (guard, _) = guard_with(1, 0).await;

        let first = guard.check_and_reserve("alice123").await.unwrap();
        let second = guard.check_and_reserve("alice123").await.unwrap();

        assert!(guard.commit(first).await.unwrap());
        assert!(!guard.commit(second).await.unwrap());
    }
}

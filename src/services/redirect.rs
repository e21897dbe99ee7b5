//! Short code resolution

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::errors::{Result, UrlVaultError};
use crate::storage::LinkStore;
use crate::utils::validators::is_valid_short_code;

#[derive(Clone)]
pub struct RedirectResolver {
    links: Arc<dyn LinkStore>,
}

impl RedirectResolver {
    pub fn new(links: Arc<dyn LinkStore>) -> Self {
        Self { links }
    }

    /// Target URL for `code`, or `NotFound`. Codes that cannot exist are
    /// rejected before the store is consulted.
    #[instrument(skip(self))]
    pub async fn resolve(&self, code: &str) -> Result<String> {
        if !is_valid_short_code(code) {
            debug!("Rejected malformed short code");
            return Err(not_found());
        }

        match self.links.get_link(code).await? {
            Some(link) => Ok(link.target_url),
            None => {
                debug!("Redirect link not found");
                Err(not_found())
            }
        }
    }
}

fn not_found() -> UrlVaultError {
    UrlVaultError::not_found("Short URL does not exist.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::storage::{InsertOutcome, MemoryStorage, ShortLink};

    /// Counts store reads
    struct CountingStore {
        inner: MemoryStorage,
        reads: AtomicUsize,
    }

    #[async_trait]
    impl LinkStore for CountingStore {
        async fn insert_link_if_absent(&self, link: &ShortLink) -> Result<InsertOutcome> {
            self.inner.insert_link_if_absent(link).await
        }
        async fn get_link(&self, code: &str) -> Result<Option<ShortLink>> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.inner.get_link(code).await
        }
        async fn remove_link(&self, code: &str) -> Result<bool> {
            self.inner.remove_link(code).await
        }
        async fn list_links(&self) -> Result<Vec<ShortLink>> {
            self.inner.list_links().await
        }
        async fn list_links_by_owner(&self, owner_id: &str) -> Result<Vec<ShortLink>> {
            self.inner.list_links_by_owner(owner_id).await
        }
        async fn ping(&self) -> Result<()> {
            Ok(())
        }
        fn backend_name(&self) -> &str {
            "counting"
        }
    }

    fn counting_store() -> Arc<CountingStore> {
        Arc::new(CountingStore {
            inner: MemoryStorage::new(),
            reads: AtomicUsize::new(0),
        })
    }

    #[tokio::test]
    async fn test_resolve_existing() {
        let store = counting_store();
        store
            .insert_link_if_absent(&ShortLink::new("abcdefghij", "https://example.com/", "alice123"))
            .await
            .unwrap();

        let resolver = RedirectResolver::new(store.clone());
        assert_eq!(
            resolver.resolve("abcdefghij").await.unwrap(),
            "https://example.com/"
        );
    }

    #[tokio::test]
    async fn test_resolve_missing() {
        let resolver = RedirectResolver::new(counting_store());
        assert!(matches!(
            resolver.resolve("abcdefghij").await,
            Err(UrlVaultError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_malformed_codes_skip_store() {
        let store = counting_store();
        let resolver = RedirectResolver::new(store.clone());

        for code in ["", "has space", "../etc", &"x".repeat(65)] {
            assert!(matches!(
                resolver.resolve(code).await,
                Err(UrlVaultError::NotFound(_))
            ));
        }
        assert_eq!(store.reads.load(Ordering::SeqCst), 0);
    }
}

//! Short code allocation
//!
//! Claims a custom or generated code in the store with a conditional create,
//! then charges the owner's quota. If the charge is lost to a concurrent
//! request the claimed record is deleted again, so a record and its quota
//! charge are either both persisted or neither is.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::code_generator::{CodeLength, generate_candidate};
use super::quota::{QuotaGuard, QuotaReservation};
use crate::config::LinksConfig;
use crate::errors::{Result, UrlVaultError};
use crate::storage::{AccountStore, InsertOutcome, LinkStore, ShortLink};
use crate::utils::url_validator::normalize_url;
use crate::utils::validators::validate_custom_code;

/// Produces a candidate code of the requested length
pub type CandidateFn = Arc<dyn Fn(CodeLength) -> String + Send + Sync>;

#[derive(Clone)]
pub struct Allocator {
    links: Arc<dyn LinkStore>,
    quota: QuotaGuard,
    default_length: CodeLength,
    max_collision_attempts: u32,
    generator: CandidateFn,
}

impl Allocator {
    pub fn new(
        links: Arc<dyn LinkStore>,
        accounts: Arc<dyn AccountStore>,
        config: &LinksConfig,
    ) -> Result<Self> {
        Ok(Self {
            links,
            quota: QuotaGuard::new(accounts),
            default_length: CodeLength::new(config.default_code_length)?,
            max_collision_attempts: config.max_collision_attempts.max(1),
            generator: Arc::new(generate_candidate),
        })
    }

    /// Replaces the candidate source
    pub fn with_generator(mut self, generator: CandidateFn) -> Self {
        self.generator = generator;
        self
    }

    pub fn default_length(&self) -> CodeLength {
        self.default_length
    }

    /// Allocates a short code for `target_url` on behalf of `owner_id`.
    ///
    /// An empty `custom_code` counts as absent. `length` only applies to
    /// generated codes and defaults to `links.default_code_length`.
    pub async fn allocate(
        &self,
        target_url: &str,
        owner_id: &str,
        custom_code: Option<&str>,
        length: Option<usize>,
    ) -> Result<ShortLink> {
        let target_url = normalize_url(target_url)?;

        let custom_code = custom_code.filter(|code| !code.is_empty());
        if let Some(code) = custom_code {
            validate_custom_code(code)?;
        }
        let length = match length {
            Some(length) => CodeLength::new(length)?,
            None => self.default_length,
        };

        let reservation = self.quota.check_and_reserve(owner_id).await?;

        let link = match custom_code {
            Some(code) => self.claim_custom(code, &target_url, owner_id).await?,
            None => self.claim_generated(length, &target_url, owner_id).await?,
        };

        self.commit_or_release(reservation, &link).await?;

        info!(
            "Short link created: {} -> {} (owner: {})",
            link.code, link.target_url, link.owner_id
        );
        Ok(link)
    }

    async fn claim_custom(&self, code: &str, target_url: &str, owner_id: &str) -> Result<ShortLink> {
        let link = ShortLink::new(code, target_url, owner_id);
        match self.links.insert_link_if_absent(&link).await? {
            InsertOutcome::Inserted => Ok(link),
            InsertOutcome::AlreadyExists => Err(UrlVaultError::custom_code_taken(format!(
                "Custom code '{}' is already in use",
                code
            ))),
        }
    }

    async fn claim_generated(
        &self,
        start: CodeLength,
        target_url: &str,
        owner_id: &str,
    ) -> Result<ShortLink> {
        let mut length = start;
        loop {
            for attempt in 1..=self.max_collision_attempts {
                let candidate = (self.generator)(length);
                let link = ShortLink::new(candidate, target_url, owner_id);
                match self.links.insert_link_if_absent(&link).await? {
                    InsertOutcome::Inserted => return Ok(link),
                    InsertOutcome::AlreadyExists => {
                        debug!(
                            "Short code collision on '{}' (length {}, attempt {}/{})",
                            link.code, length, attempt, self.max_collision_attempts
                        );
                    }
                }
            }

            match length.escalate() {
                Some(next) => {
                    warn!(
                        "{} consecutive collisions at length {}, escalating to {}",
                        self.max_collision_attempts, length, next
                    );
                    length = next;
                }
                None => {
                    error!(
                        "Short code space exhausted after {} attempts at length {}",
                        self.max_collision_attempts, length
                    );
                    return Err(UrlVaultError::database_operation(
                        "Short code space exhausted, try again later",
                    ));
                }
            }
        }
    }

    async fn commit_or_release(&self, reservation: QuotaReservation, link: &ShortLink) -> Result<()> {
        match self.quota.commit(reservation).await {
            Ok(true) => Ok(()),
            Ok(false) => {
                warn!(
                    "Quota for '{}' was consumed concurrently, releasing '{}'",
                    link.owner_id, link.code
                );
                self.release(&link.code).await;
                Err(UrlVaultError::quota_exceeded("URL limit reached"))
            }
            Err(e) => {
                self.release(&link.code).await;
                Err(e)
            }
        }
    }

    async fn release(&self, code: &str) {
        if let Err(e) = self.links.remove_link(code).await {
            error!("Failed to release claimed short code '{}': {}", code, e);
        }
    }
}

//! Link creation and listing
//!
//! Shared by the HTTP handlers and the CLI.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use super::allocation::Allocator;
use super::auth::require_admin;
use crate::errors::Result;
use crate::storage::{LinkStore, ShortLink, UserAccount};

/// Request to create a new link
#[derive(Debug, Clone, Default)]
pub struct CreateLinkRequest {
    pub target_url: String,
    /// Custom short code, generated when absent or empty
    pub custom_code: Option<String>,
    /// Generated code length, defaults to `links.default_code_length`
    pub length: Option<usize>,
}

#[derive(Clone)]
pub struct LinkService {
    links: Arc<dyn LinkStore>,
    allocator: Allocator,
}

impl LinkService {
    pub fn new(links: Arc<dyn LinkStore>, allocator: Allocator) -> Self {
        Self { links, allocator }
    }

    pub async fn create_link(&self, owner_id: &str, request: CreateLinkRequest) -> Result<ShortLink> {
        self.allocator
            .allocate(
                &request.target_url,
                owner_id,
                request.custom_code.as_deref(),
                request.length,
            )
            .await
    }

    /// Every mapping in the store. Admin only.
    pub async fn list_all(&self, actor: &UserAccount) -> Result<BTreeMap<String, String>> {
        require_admin(actor)?;
        let links = self.links.list_links().await?;
        debug!("Listing {} links for admin {}", links.len(), actor.user_id);
        Ok(to_mapping(links))
    }

    pub async fn list_for_owner(&self, owner_id: &str) -> Result<BTreeMap<String, String>> {
        let links = self.links.list_links_by_owner(owner_id).await?;
        Ok(to_mapping(links))
    }
}

fn to_mapping(links: Vec<ShortLink>) -> BTreeMap<String, String> {
    links
        .into_iter()
        .map(|link| (link.code, link.target_url))
        .collect()
}

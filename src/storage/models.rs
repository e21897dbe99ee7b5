use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortLink {
    pub code: String,
    pub target_url: String,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
}

impl ShortLink {
    pub fn new(code: impl Into<String>, target_url: impl Into<String>, owner_id: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            target_url: target_url.into(),
            owner_id: owner_id.into(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub user_id: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub is_admin: bool,
    pub url_limit: i64,
    pub url_count: i64,
    pub created_at: DateTime<Utc>,
}

impl UserAccount {
    pub fn new(user_id: impl Into<String>, password_hash: impl Into<String>, url_limit: i64) -> Self {
        Self {
            user_id: user_id.into(),
            password_hash: password_hash.into(),
            is_admin: false,
            url_limit,
            url_count: 0,
            created_at: Utc::now(),
        }
    }

    /// 是否还能再创建一条短链接
    pub fn has_capacity(&self) -> bool {
        self.url_count < self.url_limit
    }
}

/// 条件写入的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    AlreadyExists,
}

impl InsertOutcome {
    pub fn is_inserted(self) -> bool {
        matches!(self, InsertOutcome::Inserted)
    }
}

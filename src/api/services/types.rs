//! API 请求 / 响应类型定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ErrorKind;
use crate::storage::{ShortLink, UserAccount};

/// 统一响应信封
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    #[serde(default)]
    pub kind: Option<ErrorKind>,
    pub data: Option<T>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ShortenRequest {
    pub url: String,
    #[serde(default)]
    pub custom_url: Option<String>,
    #[serde(default)]
    pub length: Option<usize>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ShortenResponse {
    pub short_url: String,
    pub original_url: String,
    pub timestamp: DateTime<Utc>,
}

impl From<ShortLink> for ShortenResponse {
    fn from(link: ShortLink) -> Self {
        Self {
            short_url: link.code,
            original_url: link.target_url,
            timestamp: link.created_at,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ChangePasswordRequest {
    pub new_password: String,
}

/// 管理员更新用户；两个字段都可省略
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub url_limit: Option<i64>,
    #[serde(default)]
    pub is_admin: Option<bool>,
}

/// 账户概要，不含密码哈希
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct AccountSummary {
    pub user_id: String,
    pub is_admin: bool,
    pub url_limit: i64,
    pub url_count: i64,
    pub created_at: DateTime<Utc>,
}

impl From<UserAccount> for AccountSummary {
    fn from(account: UserAccount) -> Self {
        Self {
            user_id: account.user_id,
            is_admin: account.is_admin,
            url_limit: account.url_limit,
            url_count: account.url_count,
            created_at: account.created_at,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct MessageResponse {
    pub message: String,
}

/// 健康检查响应
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub uptime: u64,
    pub storage: HealthStorageCheck,
    pub response_time_ms: u32,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct HealthStorageCheck {
    pub status: String,
    pub backend: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

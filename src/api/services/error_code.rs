//! 统一 API 错误码定义

use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::errors::UrlVaultError;

/// API 错误码枚举
///
/// 使用 serde_repr 序列化为数字。按千位分域：
/// - 0: 成功
/// - 1000-1099: 通用错误
/// - 2000-2099: 认证错误
/// - 3000-3099: 链接错误
/// - 4000-4099: 账户错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(i32)]
pub enum ErrorCode {
    // 成功
    Success = 0,

    // 通用错误 1000-1099
    BadRequest = 1000,
    ValidationFailed = 1001,
    NotFound = 1004,
    InternalServerError = 1005,
    ServiceUnavailable = 1030,

    // 认证错误 2000-2099
    AuthFailed = 2000,
    TokenExpired = 2001,
    TokenInvalid = 2002,
    MissingToken = 2003,
    AdminRequired = 2004,

    // 链接错误 3000-3099
    LinkNotFound = 3000,
    LinkAlreadyExists = 3001,
    LinkInvalidUrl = 3002,
    LinksEmpty = 3003,
    LinkDatabaseError = 3005,

    // 账户错误 4000-4099
    UserNotFound = 4000,
    UsernameTaken = 4001,
    QuotaExceeded = 4002,
}

impl From<&UrlVaultError> for ErrorCode {
    fn from(err: &UrlVaultError) -> Self {
        match err {
            UrlVaultError::InvalidUrl(_) => ErrorCode::LinkInvalidUrl,
            UrlVaultError::InvalidFormat(_) => ErrorCode::ValidationFailed,
            UrlVaultError::CustomCodeTaken(_) => ErrorCode::LinkAlreadyExists,
            UrlVaultError::UsernameTaken(_) => ErrorCode::UsernameTaken,
            UrlVaultError::NotFound(_) => ErrorCode::LinkNotFound,
            UrlVaultError::UserNotFound(_) => ErrorCode::UserNotFound,
            UrlVaultError::Empty(_) => ErrorCode::LinksEmpty,
            UrlVaultError::InvalidCredentials(_) => ErrorCode::AuthFailed,
            UrlVaultError::TokenExpired(_) => ErrorCode::TokenExpired,
            UrlVaultError::TokenInvalid(_) => ErrorCode::TokenInvalid,
            UrlVaultError::MissingToken(_) => ErrorCode::MissingToken,
            UrlVaultError::AdminRequired(_) => ErrorCode::AdminRequired,
            UrlVaultError::QuotaExceeded(_) => ErrorCode::QuotaExceeded,
            UrlVaultError::DatabaseConfig(_)
            | UrlVaultError::DatabaseConnection(_)
            | UrlVaultError::DatabaseOperation(_) => ErrorCode::LinkDatabaseError,
            UrlVaultError::PasswordHash(_)
            | UrlVaultError::TokenIssue(_)
            | UrlVaultError::Config(_)
            | UrlVaultError::FileOperation(_)
            | UrlVaultError::Serialization(_) => ErrorCode::InternalServerError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_number() {
        assert_eq!(serde_json::to_string(&ErrorCode::Success).unwrap(), "0");
        assert_eq!(
            serde_json::to_string(&ErrorCode::QuotaExceeded).unwrap(),
            "4002"
        );
    }

    #[test]
    fn test_from_error() {
        assert_eq!(
            ErrorCode::from(&UrlVaultError::token_expired("x")),
            ErrorCode::TokenExpired
        );
        assert_eq!(
            ErrorCode::from(&UrlVaultError::database_operation("x")),
            ErrorCode::LinkDatabaseError
        );
    }
}

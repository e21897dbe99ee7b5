use std::fmt;

use serde::{Deserialize, Serialize};
use strum::AsRefStr;

/// Stable, machine-checkable failure kind surfaced to API callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    InvalidUrl,
    InvalidFormat,
    CustomCodeTaken,
    UsernameTaken,
    NotFound,
    UserNotFound,
    Empty,
    InvalidCredentials,
    TokenExpired,
    TokenInvalid,
    MissingToken,
    AdminRequired,
    QuotaExceeded,
    Storage,
}

/// Coarse error taxonomy used by the boundary layer to pick a response class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Conflict,
    NotFound,
    Auth,
    Capacity,
    Storage,
}

#[derive(Debug, Clone)]
pub enum UrlVaultError {
    InvalidUrl(String),
    InvalidFormat(String),
    CustomCodeTaken(String),
    UsernameTaken(String),
    NotFound(String),
    UserNotFound(String),
    Empty(String),
    InvalidCredentials(String),
    TokenExpired(String),
    TokenInvalid(String),
    MissingToken(String),
    AdminRequired(String),
    QuotaExceeded(String),
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    PasswordHash(String),
    TokenIssue(String),
    Config(String),
    FileOperation(String),
    Serialization(String),
}

impl UrlVaultError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            UrlVaultError::InvalidUrl(_) => "E001",
            UrlVaultError::InvalidFormat(_) => "E002",
            UrlVaultError::CustomCodeTaken(_) => "E003",
            UrlVaultError::UsernameTaken(_) => "E004",
            UrlVaultError::NotFound(_) => "E005",
            UrlVaultError::UserNotFound(_) => "E006",
            UrlVaultError::Empty(_) => "E007",
            UrlVaultError::InvalidCredentials(_) => "E008",
            UrlVaultError::TokenExpired(_) => "E009",
            UrlVaultError::TokenInvalid(_) => "E010",
            UrlVaultError::MissingToken(_) => "E011",
            UrlVaultError::AdminRequired(_) => "E012",
            UrlVaultError::QuotaExceeded(_) => "E013",
            UrlVaultError::DatabaseConfig(_) => "E014",
            UrlVaultError::DatabaseConnection(_) => "E015",
            UrlVaultError::DatabaseOperation(_) => "E016",
            UrlVaultError::PasswordHash(_) => "E017",
            UrlVaultError::TokenIssue(_) => "E018",
            UrlVaultError::Config(_) => "E019",
            UrlVaultError::FileOperation(_) => "E020",
            UrlVaultError::Serialization(_) => "E021",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            UrlVaultError::InvalidUrl(_) => "Invalid URL",
            UrlVaultError::InvalidFormat(_) => "Invalid Format",
            UrlVaultError::CustomCodeTaken(_) => "Custom Code Taken",
            UrlVaultError::UsernameTaken(_) => "Username Taken",
            UrlVaultError::NotFound(_) => "Resource Not Found",
            UrlVaultError::UserNotFound(_) => "User Not Found",
            UrlVaultError::Empty(_) => "Nothing To List",
            UrlVaultError::InvalidCredentials(_) => "Invalid Credentials",
            UrlVaultError::TokenExpired(_) => "Token Expired",
            UrlVaultError::TokenInvalid(_) => "Token Invalid",
            UrlVaultError::MissingToken(_) => "Missing Token",
            UrlVaultError::AdminRequired(_) => "Admin Privileges Required",
            UrlVaultError::QuotaExceeded(_) => "Quota Exceeded",
            UrlVaultError::DatabaseConfig(_) => "Database Configuration Error",
            UrlVaultError::DatabaseConnection(_) => "Database Connection Error",
            UrlVaultError::DatabaseOperation(_) => "Database Operation Error",
            UrlVaultError::PasswordHash(_) => "Password Hash Error",
            UrlVaultError::TokenIssue(_) => "Token Issue Error",
            UrlVaultError::Config(_) => "Configuration Error",
            UrlVaultError::FileOperation(_) => "File Operation Error",
            UrlVaultError::Serialization(_) => "Serialization Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            UrlVaultError::InvalidUrl(msg)
            | UrlVaultError::InvalidFormat(msg)
            | UrlVaultError::CustomCodeTaken(msg)
            | UrlVaultError::UsernameTaken(msg)
            | UrlVaultError::NotFound(msg)
            | UrlVaultError::UserNotFound(msg)
            | UrlVaultError::Empty(msg)
            | UrlVaultError::InvalidCredentials(msg)
            | UrlVaultError::TokenExpired(msg)
            | UrlVaultError::TokenInvalid(msg)
            | UrlVaultError::MissingToken(msg)
            | UrlVaultError::AdminRequired(msg)
            | UrlVaultError::QuotaExceeded(msg)
            | UrlVaultError::DatabaseConfig(msg)
            | UrlVaultError::DatabaseConnection(msg)
            | UrlVaultError::DatabaseOperation(msg)
            | UrlVaultError::PasswordHash(msg)
            | UrlVaultError::TokenIssue(msg)
            | UrlVaultError::Config(msg)
            | UrlVaultError::FileOperation(msg)
            | UrlVaultError::Serialization(msg) => msg,
        }
    }

    /// Stable kind reported to callers. Infrastructure failures all collapse
    /// into `Storage` so internals never leak through the API.
    pub fn kind(&self) -> ErrorKind {
        match self {
            UrlVaultError::InvalidUrl(_) => ErrorKind::InvalidUrl,
            UrlVaultError::InvalidFormat(_) => ErrorKind::InvalidFormat,
            UrlVaultError::CustomCodeTaken(_) => ErrorKind::CustomCodeTaken,
            UrlVaultError::UsernameTaken(_) => ErrorKind::UsernameTaken,
            UrlVaultError::NotFound(_) => ErrorKind::NotFound,
            UrlVaultError::UserNotFound(_) => ErrorKind::UserNotFound,
            UrlVaultError::Empty(_) => ErrorKind::Empty,
            UrlVaultError::InvalidCredentials(_) => ErrorKind::InvalidCredentials,
            UrlVaultError::TokenExpired(_) => ErrorKind::TokenExpired,
            UrlVaultError::TokenInvalid(_) => ErrorKind::TokenInvalid,
            UrlVaultError::MissingToken(_) => ErrorKind::MissingToken,
            UrlVaultError::AdminRequired(_) => ErrorKind::AdminRequired,
            UrlVaultError::QuotaExceeded(_) => ErrorKind::QuotaExceeded,
            UrlVaultError::DatabaseConfig(_)
            | UrlVaultError::DatabaseConnection(_)
            | UrlVaultError::DatabaseOperation(_)
            | UrlVaultError::PasswordHash(_)
            | UrlVaultError::TokenIssue(_)
            | UrlVaultError::Config(_)
            | UrlVaultError::FileOperation(_)
            | UrlVaultError::Serialization(_) => ErrorKind::Storage,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self.kind() {
            ErrorKind::InvalidUrl | ErrorKind::InvalidFormat => ErrorCategory::Validation,
            ErrorKind::CustomCodeTaken | ErrorKind::UsernameTaken => ErrorCategory::Conflict,
            ErrorKind::NotFound | ErrorKind::UserNotFound | ErrorKind::Empty => {
                ErrorCategory::NotFound
            }
            ErrorKind::InvalidCredentials
            | ErrorKind::TokenExpired
            | ErrorKind::TokenInvalid
            | ErrorKind::MissingToken
            | ErrorKind::AdminRequired => ErrorCategory::Auth,
            ErrorKind::QuotaExceeded => ErrorCategory::Capacity,
            ErrorKind::Storage => ErrorCategory::Storage,
        }
    }

    /// 格式化为彩色输出（用于 Server 启动失败）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出（用于 CLI 模式）
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for UrlVaultError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for UrlVaultError {}

// 便捷的构造函数
impl UrlVaultError {
    pub fn invalid_url<T: Into<String>>(msg: T) -> Self {
        UrlVaultError::InvalidUrl(msg.into())
    }

    pub fn invalid_format<T: Into<String>>(msg: T) -> Self {
        UrlVaultError::InvalidFormat(msg.into())
    }

    pub fn custom_code_taken<T: Into<String>>(msg: T) -> Self {
        UrlVaultError::CustomCodeTaken(msg.into())
    }

    pub fn username_taken<T: Into<String>>(msg: T) -> Self {
        UrlVaultError::UsernameTaken(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        UrlVaultError::NotFound(msg.into())
    }

    pub fn user_not_found<T: Into<String>>(msg: T) -> Self {
        UrlVaultError::UserNotFound(msg.into())
    }

    pub fn empty<T: Into<String>>(msg: T) -> Self {
        UrlVaultError::Empty(msg.into())
    }

    pub fn invalid_credentials<T: Into<String>>(msg: T) -> Self {
        UrlVaultError::InvalidCredentials(msg.into())
    }

    pub fn token_expired<T: Into<String>>(msg: T) -> Self {
        UrlVaultError::TokenExpired(msg.into())
    }

    pub fn token_invalid<T: Into<String>>(msg: T) -> Self {
        UrlVaultError::TokenInvalid(msg.into())
    }

    pub fn missing_token<T: Into<String>>(msg: T) -> Self {
        UrlVaultError::MissingToken(msg.into())
    }

    pub fn admin_required<T: Into<String>>(msg: T) -> Self {
        UrlVaultError::AdminRequired(msg.into())
    }

    pub fn quota_exceeded<T: Into<String>>(msg: T) -> Self {
        UrlVaultError::QuotaExceeded(msg.into())
    }

    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        UrlVaultError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        UrlVaultError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        UrlVaultError::DatabaseOperation(msg.into())
    }

    pub fn password_hash<T: Into<String>>(msg: T) -> Self {
        UrlVaultError::PasswordHash(msg.into())
    }

    pub fn token_issue<T: Into<String>>(msg: T) -> Self {
        UrlVaultError::TokenIssue(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        UrlVaultError::Config(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        UrlVaultError::FileOperation(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        UrlVaultError::Serialization(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for UrlVaultError {
    fn from(err: sea_orm::DbErr) -> Self {
        UrlVaultError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for UrlVaultError {
    fn from(err: std::io::Error) -> Self {
        UrlVaultError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for UrlVaultError {
    fn from(err: serde_json::Error) -> Self {
        UrlVaultError::Serialization(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for UrlVaultError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind as JwtErrorKind;

        match err.kind() {
            JwtErrorKind::ExpiredSignature => {
                UrlVaultError::TokenExpired("Session token has expired".to_string())
            }
            _ => UrlVaultError::TokenInvalid(format!("Could not validate credentials: {}", err)),
        }
    }
}

pub type Result<T> = std::result::Result<T, UrlVaultError>;

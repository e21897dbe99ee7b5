//! URL 验证模块
//!
//! 验证目标 URL 安全性并规范化为 `url` crate 的标准序列化形式

use url::Url;

use crate::errors::UrlVaultError;

/// URL 验证错误
#[derive(Debug)]
pub enum UrlValidationError {
    EmptyUrl,
    InvalidProtocol(String),
    DangerousProtocol(String),
    InvalidFormat(String),
}

impl std::fmt::Display for UrlValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUrl => write!(f, "URL cannot be empty"),
            Self::InvalidProtocol(proto) => write!(
                f,
                "Invalid protocol: {}. Only http:// and https:// are allowed",
                proto
            ),
            Self::DangerousProtocol(proto) => {
                write!(f, "Dangerous protocol blocked: {}", proto)
            }
            Self::InvalidFormat(msg) => write!(f, "Invalid URL format: {}", msg),
        }
    }
}

impl std::error::Error for UrlValidationError {}

impl From<UrlValidationError> for UrlVaultError {
    fn from(err: UrlValidationError) -> Self {
        UrlVaultError::invalid_url(format!(
            "{} ({})",
            validation_error_message(&err),
            err
        ))
    }
}

/// 危险协议列表
const DANGEROUS_PROTOCOLS: &[&str] = &[
    "javascript:",
    "data:",
    "file:",
    "vbscript:",
    "about:",
    "blob:",
];

/// 验证 URL 安全性并返回解析结果
///
/// 检查项目：
/// 1. URL 不为空
/// 2. 不是危险协议（javascript:, data:, file: 等）
/// 3. 必须是 http:// 或 https://
/// 4. URL 格式有效且包含主机
fn parse_checked(url: &str) -> Result<Url, UrlValidationError> {
    let url = url.trim();

    if url.is_empty() {
        return Err(UrlValidationError::EmptyUrl);
    }

    let url_lower = url.to_lowercase();

    for proto in DANGEROUS_PROTOCOLS {
        if url_lower.starts_with(proto) {
            return Err(UrlValidationError::DangerousProtocol(proto.to_string()));
        }
    }

    if !url_lower.starts_with("http://") && !url_lower.starts_with("https://") {
        let proto = url_lower
            .split(':')
            .next()
            .map(|s| format!("{}:", s))
            .unwrap_or_default();
        return Err(UrlValidationError::InvalidProtocol(proto));
    }

    let parsed = Url::parse(url).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(UrlValidationError::InvalidFormat(
            "missing host".to_string(),
        ));
    }

    Ok(parsed)
}

/// 验证 URL 安全性
pub fn validate_url(url: &str) -> Result<(), UrlValidationError> {
    parse_checked(url).map(|_| ())
}

/// 验证并规范化 URL
///
/// 返回值即存储值，也是创建短链接时回传给调用方的值：
/// `https://example.com` → `https://example.com/`
pub fn normalize_url(url: &str) -> Result<String, UrlValidationError> {
    parse_checked(url).map(|parsed| parsed.to_string())
}

/// 获取 URL 验证错误的用户友好消息
pub fn validation_error_message(error: &UrlValidationError) -> &'static str {
    match error {
        UrlValidationError::EmptyUrl => "URL cannot be empty",
        UrlValidationError::InvalidProtocol(_) => "URL must start with http:// or https://",
        UrlValidationError::DangerousProtocol(_) => "This URL protocol is not allowed",
        UrlValidationError::InvalidFormat(_) => "Invalid URL format",
    }
}

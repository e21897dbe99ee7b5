//! 字段格式校验
//!
//! 用户名、密码、自定义短码的格式规则。与传输层无关，服务层直接调用。

use crate::errors::{Result, UrlVaultError};
use crate::services::code_generator::{MAX_CODE_LENGTH, MIN_CODE_LENGTH};

pub const MIN_CREDENTIAL_LENGTH: usize = 8;
pub const MAX_CREDENTIAL_LENGTH: usize = 15;

/// 密码中必须出现至少一个的特殊字符
pub const PASSWORD_SPECIAL_CHARS: &str = "!@#$%^&*()-_=+[]{};:,.?/~";

/// 路由层可接受的最长短码，超出直接判定不存在
pub const MAX_LOOKUP_CODE_LENGTH: usize = 64;

fn is_code_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// 用户名：8-15 位，仅 ASCII 字母和数字
pub fn validate_username(username: &str) -> Result<()> {
    let len = username.chars().count();
    if !(MIN_CREDENTIAL_LENGTH..=MAX_CREDENTIAL_LENGTH).contains(&len) {
        return Err(UrlVaultError::invalid_format(format!(
            "Username must be between {} and {} characters",
            MIN_CREDENTIAL_LENGTH, MAX_CREDENTIAL_LENGTH
        )));
    }
    if !username.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(UrlVaultError::invalid_format(
            "Username may only contain letters and digits",
        ));
    }
    Ok(())
}

/// 密码：8-15 位，必须包含大写、小写、数字和特殊字符
pub fn validate_password(password: &str) -> Result<()> {
    let len = password.chars().count();
    if !(MIN_CREDENTIAL_LENGTH..=MAX_CREDENTIAL_LENGTH).contains(&len) {
        return Err(UrlVaultError::invalid_format(format!(
            "Password must be between {} and {} characters",
            MIN_CREDENTIAL_LENGTH, MAX_CREDENTIAL_LENGTH
        )));
    }

    let mut missing = Vec::new();
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        missing.push("an uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        missing.push("a lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        missing.push("a digit");
    }
    if !password.chars().any(|c| PASSWORD_SPECIAL_CHARS.contains(c)) {
        missing.push("a special character");
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(UrlVaultError::invalid_format(format!(
            "Password must contain {}",
            missing.join(", ")
        )))
    }
}

/// 自定义短码：10-15 位，字符集 `[A-Za-z0-9_-]`
pub fn validate_custom_code(code: &str) -> Result<()> {
    let len = code.chars().count();
    if !(MIN_CODE_LENGTH..=MAX_CODE_LENGTH).contains(&len) {
        return Err(UrlVaultError::invalid_format(format!(
            "Custom code must be between {} and {} characters",
            MIN_CODE_LENGTH, MAX_CODE_LENGTH
        )));
    }
    if !code.chars().all(is_code_char) {
        return Err(UrlVaultError::invalid_format(
            "Custom code may only contain letters, digits, '_' and '-'",
        ));
    }
    Ok(())
}

/// 判断一个待解析的短码是否可能存在于存储中
pub fn is_valid_short_code(code: &str) -> bool {
    !code.is_empty() && code.len() <= MAX_LOOKUP_CODE_LENGTH && code.chars().all(is_code_char)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_rules() {
        assert!(validate_username("alice123").is_ok());
        assert!(validate_username("abcdefghijklmno").is_ok());
        assert!(validate_username("short").is_err());
        assert!(validate_username("abcdefghijklmnop").is_err());
        assert!(validate_username("alice_123").is_err());
        assert!(validate_username("alice 123").is_err());
    }

    #[test]
    fn test_password_rules() {
        assert!(validate_password("Passw0rd!1").is_ok());
        assert!(validate_password("Aa1~aaaa").is_ok());
        assert!(validate_password("Pa0!").is_err());
        assert!(validate_password("Passw0rd!1234567").is_err());

        let err = validate_password("password1!").unwrap_err();
        assert!(err.message().contains("uppercase"));
        let err = validate_password("PASSWORD1!").unwrap_err();
        assert!(err.message().contains("lowercase"));
        let err = validate_password("Password!!").unwrap_err();
        assert!(err.message().contains("digit"));
        let err = validate_password("Password11").unwrap_err();
        assert!(err.message().contains("special"));
    }

    #[test]
    fn test_password_error_kind() {
        let err = validate_password("x").unwrap_err();
        assert_eq!(err.kind(), crate::errors::ErrorKind::InvalidFormat);
    }

    #[test]
    fn test_custom_code_rules() {
        assert!(validate_custom_code("myuniquecode123").is_ok());
        assert!(validate_custom_code("my-code_0001").is_ok());
        assert!(validate_custom_code("short").is_err());
        assert!(validate_custom_code("waytoolongcustomcode").is_err());
        assert!(validate_custom_code("bad/code/here").is_err());
        assert!(validate_custom_code("emoji😀code12").is_err());
    }

    #[test]
    fn test_is_valid_short_code() {
        assert!(is_valid_short_code("abc"));
        assert!(is_valid_short_code("my-code_01"));
        assert!(!is_valid_short_code(""));
        assert!(!is_valid_short_code("a/b"));
        assert!(!is_valid_short_code("favicon.ico"));
        assert!(!is_valid_short_code(&"a".repeat(65)));
        assert!(is_valid_short_code(&"a".repeat(64)));
    }
}

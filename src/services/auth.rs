//! Accounts and credentials

use std::sync::Arc;

use tracing::{info, warn};

use crate::errors::{Result, UrlVaultError};
use crate::storage::{AccountStore, InsertOutcome, UserAccount};
use crate::utils::password::{hash_password, verify_password};
use crate::utils::validators::{validate_password, validate_username};

/// Checked on the unknown-user login path so it costs the same Argon2 work as
/// a wrong password. Uses the default Argon2id parameters.
const UNKNOWN_USER_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// Optional overrides applied when an account is created
#[derive(Debug, Clone, Copy, Default)]
pub struct NewAccountOptions {
    pub is_admin: bool,
    pub url_limit: Option<i64>,
}

#[derive(Clone)]
pub struct AuthService {
    accounts: Arc<dyn AccountStore>,
    default_url_limit: i64,
}

impl AuthService {
    pub fn new(accounts: Arc<dyn AccountStore>, default_url_limit: i64) -> Self {
        Self {
            accounts,
            default_url_limit,
        }
    }

    /// Signs up a regular user with the default quota.
    pub async fn create_account(&self, user_id: &str, password: &str) -> Result<UserAccount> {
        self.create_account_with(user_id, password, NewAccountOptions::default())
            .await
    }

    pub async fn create_account_with(
        &self,
        user_id: &str,
        password: &str,
        options: NewAccountOptions,
    ) -> Result<UserAccount> {
        validate_username(user_id)?;
        validate_password(password)?;
        let url_limit = options.url_limit.unwrap_or(self.default_url_limit);
        if url_limit < 0 {
            return Err(UrlVaultError::invalid_format("url_limit must not be negative"));
        }

        let mut account = UserAccount::new(user_id, hash_password(password)?, url_limit);
        account.is_admin = options.is_admin;

        match self.accounts.insert_account_if_absent(&account).await? {
            InsertOutcome::Inserted => {
                info!("Account created: {} (admin: {})", user_id, account.is_admin);
                Ok(account)
            }
            InsertOutcome::AlreadyExists => Err(UrlVaultError::username_taken(format!(
                "Username '{}' is already registered",
                user_id
            ))),
        }
    }

    /// Absent user and wrong password yield the same error.
    pub async fn authenticate(&self, user_id: &str, password: &str) -> Result<UserAccount> {
        let invalid = || UrlVaultError::invalid_credentials("Incorrect username or password");

        let Some(account) = self.accounts.get_account(user_id).await? else {
            verify_password(password, UNKNOWN_USER_HASH)?;
            warn!("Login failed: unknown user");
            return Err(invalid());
        };

        if verify_password(password, &account.password_hash)? {
            info!("Login succeeded: {}", user_id);
            Ok(account)
        } else {
            warn!("Login failed: wrong password for {}", user_id);
            Err(invalid())
        }
    }

    pub async fn get_account(&self, user_id: &str) -> Result<UserAccount> {
        self.accounts
            .get_account(user_id)
            .await?
            .ok_or_else(|| UrlVaultError::user_not_found(format!("User '{}' not found", user_id)))
    }

    /// Tokens issued before the change stay valid until they expire.
    pub async fn change_password(&self, user_id: &str, new_password: &str) -> Result<()> {
        validate_password(new_password)?;
        let hash = hash_password(new_password)?;

        if !self.accounts.set_password_hash(user_id, &hash).await? {
            return Err(UrlVaultError::user_not_found(format!(
                "User '{}' not found",
                user_id
            )));
        }

        info!("Password changed for {}", user_id);
        Ok(())
    }
}

pub fn require_admin(account: &UserAccount) -> Result<()> {
    if account.is_admin {
        Ok(())
    } else {
        Err(UrlVaultError::admin_required(
            "Administrator privileges are required",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{ErrorCategory, ErrorKind};
    use crate::storage::MemoryStorage;

    fn service() -> AuthService {
        AuthService::new(Arc::new(MemoryStorage::new()), 20)
    }

    #[tokio::test]
    async fn test_signup_defaults() {
        let auth = service();
        let account = auth.create_account("alice123", "Passw0rd!1").await.unwrap();

        assert_eq!(account.url_limit, 20);
        assert_eq!(account.url_count, 0);
        assert!(!account.is_admin);
        assert_ne!(account.password_hash, "Passw0rd!1");
    }

    #[tokio::test]
    async fn test_duplicate_username() {
        let auth = service();
        auth.create_account("alice123", "Passw0rd!1").await.unwrap();
        let err = auth
            .create_account("alice123", "Other0rd!2")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UsernameTaken);
        assert_eq!(err.category(), ErrorCategory::Conflict);
    }

    #[tokio::test]
    async fn test_signup_validation() {
        let auth = service();
        for (user, pass) in [
            ("alice", "Passw0rd!1"),
            ("alice_123", "Passw0rd!1"),
            ("alice123", "password"),
            ("alice123", "Passw0rd!1234567"),
        ] {
            let err = auth.create_account(user, pass).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidFormat, "{user}/{pass}");
        }
    }

    #[tokio::test]
    async fn test_authenticate() {
        let auth = service();
        auth.create_account("alice123", "Passw0rd!1").await.unwrap();

        let account = auth.authenticate("alice123", "Passw0rd!1").await.unwrap();
        assert_eq!(account.user_id, "alice123");

        let wrong = auth.authenticate("alice123", "Wrong0rd!1").await.unwrap_err();
        let missing = auth.authenticate("nobody99", "Passw0rd!1").await.unwrap_err();
        assert_eq!(wrong.kind(), ErrorKind::InvalidCredentials);
        assert_eq!(missing.kind(), ErrorKind::InvalidCredentials);
        assert_eq!(wrong.message(), missing.message());
    }

    #[test]
    fn test_unknown_user_hash_is_verifiable() {
        // 必须能被解析，否则未知用户分支会提前以哈希错误返回
        assert!(!verify_password("Passw0rd!1", UNKNOWN_USER_HASH).unwrap());
        assert!(UNKNOWN_USER_HASH.starts_with("$argon2id$v=19$m=19456,t=2,p=1$"));
    }

    #[tokio::test]
    async fn test_unknown_user_fails_as_invalid_credentials() {
        let auth = service();
        for password in ["Passw0rd!1", "", "not a password"] {
            let err = auth.authenticate("ghost1234", password).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidCredentials);
        }
    }

    #[tokio::test]
    async fn test_change_password() {
        let auth = service();
        auth.create_account("alice123", "Passw0rd!1").await.unwrap();

        let err = auth.change_password("alice123", "weak").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFormat);

        auth.change_password("alice123", "N3wPass!word").await.unwrap();
        assert!(auth.authenticate("alice123", "Passw0rd!1").await.is_err());
        assert!(auth.authenticate("alice123", "N3wPass!word").await.is_ok());
    }

    #[tokio::test]
    async fn test_create_with_options() {
        let auth = service();
        let account = auth
            .create_account_with(
                "rootadmin1",
                "Adm1n!pass",
                NewAccountOptions {
                    is_admin: true,
                    url_limit: Some(1000),
                },
            )
            .await
            .unwrap();
        assert!(account.is_admin);
        assert_eq!(account.url_limit, 1000);
        assert!(require_admin(&account).is_ok());
    }

    #[test]
    fn test_require_admin() {
        let account = UserAccount::new("alice123", "h", 20);
        let err = require_admin(&account).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AdminRequired);
        assert_eq!(err.category(), ErrorCategory::Auth);
    }
}

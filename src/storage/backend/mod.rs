//! SeaORM storage backend
//!
//! This module provides database storage using SeaORM,
//! supporting SQLite, MySQL/MariaDB, and PostgreSQL.

mod accounts;
mod connection;
mod converters;
mod links;
pub mod retry;

use sea_orm::{DatabaseConnection, DbErr};
use tracing::warn;

use crate::config::DatabaseConfig;
use crate::errors::{Result, UrlVaultError};
use crate::storage::InsertOutcome;

pub use connection::{connect_generic, connect_sqlite, run_migrations};
pub use converters::{
    account_to_active_model, model_to_account, model_to_shortlink, shortlink_to_active_model,
};

/// 从数据库 URL 推断数据库类型
pub fn infer_backend_from_url(database_url: &str) -> Result<String> {
    if database_url.starts_with("sqlite://")
        || database_url.ends_with(".db")
        || database_url.ends_with(".sqlite")
        || database_url == ":memory:"
    {
        Ok("sqlite".to_string())
    } else if database_url.starts_with("mysql://") || database_url.starts_with("mariadb://") {
        Ok("mysql".to_string())
    } else if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        Ok("postgres".to_string())
    } else {
        Err(UrlVaultError::database_config(format!(
            "无法从 URL 推断数据库类型: {}. 支持的 URL 格式: sqlite://, mysql://, mariadb://, postgres://, memory://",
            database_url
        )))
    }
}

/// Bare file paths are handed to sqlx as `sqlite://<path>`
fn sqlite_url(database_url: &str) -> String {
    if database_url.starts_with("sqlite:") {
        database_url.to_string()
    } else if database_url == ":memory:" {
        "sqlite::memory:".to_string()
    } else {
        format!("sqlite://{}", database_url)
    }
}

/// `ON CONFLICT DO NOTHING` reports a skipped row differently per backend:
/// zero rows affected, `RecordNotInserted`, or a "no rows" message.
pub(crate) fn classify_insert(
    result: std::result::Result<u64, DbErr>,
) -> std::result::Result<InsertOutcome, DbErr> {
    match result {
        Ok(0) => Ok(InsertOutcome::AlreadyExists),
        Ok(_) => Ok(InsertOutcome::Inserted),
        Err(DbErr::RecordNotInserted) => Ok(InsertOutcome::AlreadyExists),
        Err(e) => {
            let err_str = e.to_string().to_lowercase();
            if err_str.contains("no rows") || err_str.contains("record not inserted") {
                Ok(InsertOutcome::AlreadyExists)
            } else {
                Err(e)
            }
        }
    }
}

/// SeaORM-based storage backend
#[derive(Clone)]
pub struct SeaOrmStorage {
    db: DatabaseConnection,
    backend_name: String,
    retry_config: retry::RetryConfig,
}

impl SeaOrmStorage {
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let database_url = config.database_url.trim();
        if database_url.is_empty() {
            return Err(UrlVaultError::database_config(
                "database.database_url 未设置".to_string(),
            ));
        }

        let backend_name = infer_backend_from_url(database_url)?;

        let db = if backend_name == "sqlite" {
            connect_sqlite(&sqlite_url(database_url)).await?
        } else {
            connect_generic(database_url, &backend_name, config.pool_size, config.timeout).await?
        };

        let storage = SeaOrmStorage {
            db,
            backend_name,
            retry_config: retry::RetryConfig::from(config),
        };

        run_migrations(&storage.db).await?;

        warn!(
            "{} Storage initialized.",
            storage.backend_name.to_uppercase()
        );
        Ok(storage)
    }

    pub async fn close(&self) {
        if let Err(e) = self.db.clone().close().await {
            warn!("Failed to close database pool: {}", e);
        } else {
            tracing::info!("Database pool closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_backend_from_url() {
        assert_eq!(infer_backend_from_url("sqlite://data.db").unwrap(), "sqlite");
        assert_eq!(infer_backend_from_url("urlvault.db").unwrap(), "sqlite");
        assert_eq!(infer_backend_from_url(":memory:").unwrap(), "sqlite");
        assert_eq!(infer_backend_from_url("mysql://u:p@h/db").unwrap(), "mysql");
        assert_eq!(infer_backend_from_url("mariadb://u:p@h/db").unwrap(), "mysql");
        assert_eq!(infer_backend_from_url("postgres://u@h/db").unwrap(), "postgres");
        assert!(matches!(
            infer_backend_from_url("redis://localhost"),
            Err(UrlVaultError::DatabaseConfig(_))
        ));
    }

    #[test]
    fn test_sqlite_url() {
        assert_eq!(sqlite_url("urlvault.db"), "sqlite://urlvault.db");
        assert_eq!(sqlite_url("sqlite://x.db?mode=rwc"), "sqlite://x.db?mode=rwc");
        assert_eq!(sqlite_url(":memory:"), "sqlite::memory:");
    }

    #[test]
    fn test_classify_insert() {
        assert_eq!(classify_insert(Ok(1)).unwrap(), InsertOutcome::Inserted);
        assert_eq!(classify_insert(Ok(0)).unwrap(), InsertOutcome::AlreadyExists);
        assert_eq!(
            classify_insert(Err(DbErr::RecordNotInserted)).unwrap(),
            InsertOutcome::AlreadyExists
        );
        assert!(classify_insert(Err(DbErr::Custom("disk full".to_string()))).is_err());
    }
}

//! `AccountStore` on SeaORM

use async_trait::async_trait;
use sea_orm::{ColumnTrait, EntityTrait, ExprTrait, QueryFilter, sea_query::Expr, sea_query::OnConflict};
use tracing::debug;

use super::converters::{account_to_active_model, model_to_account};
use super::retry::{self, Replay};
use super::{SeaOrmStorage, classify_insert};
use crate::errors::{Result, UrlVaultError};
use crate::storage::{AccountStore, InsertOutcome, UserAccount};

use migration::entities::user_account;

impl SeaOrmStorage {
    /// MySQL reports zero affected rows when an UPDATE leaves values unchanged,
    /// so a zero count alone does not prove the row is missing.
    async fn account_exists(&self, user_id: &str) -> Result<bool> {
        Ok(self.get_account(user_id).await?.is_some())
    }
}

#[async_trait]
impl AccountStore for SeaOrmStorage {
    async fn insert_account_if_absent(&self, account: &UserAccount) -> Result<InsertOutcome> {
        let db = &self.db;

        retry::with_retry(
            &format!("insert_account({})", account.user_id),
            self.retry_config,
            Replay::Conditional,
            || async {
                let result = user_account::Entity::insert(account_to_active_model(account))
                    .on_conflict(
                        OnConflict::column(user_account::Column::UserId)
                            .do_nothing()
                            .to_owned(),
                    )
                    .exec_without_returning(db)
                    .await;
                classify_insert(result)
            },
        )
        .await
        .map_err(|e| {
            UrlVaultError::database_operation(format!(
                "创建用户 '{}' 失败: {}",
                account.user_id, e
            ))
        })
    }

    async fn get_account(&self, user_id: &str) -> Result<Option<UserAccount>> {
        let db = &self.db;

        let model = retry::with_retry(
            &format!("get_account({})", user_id),
            self.retry_config,
            Replay::Idempotent,
            || async {
                user_account::Entity::find_by_id(user_id.to_string())
                    .one(db)
                    .await
            },
        )
        .await
        .map_err(|e| UrlVaultError::database_operation(format!("查询用户失败: {}", e)))?;

        Ok(model.map(model_to_account))
    }

    async fn increment_url_count_within_limit(&self, user_id: &str) -> Result<bool> {
        let db = &self.db;

        let result = retry::with_retry(
            &format!("increment_url_count({})", user_id),
            self.retry_config,
            Replay::Conditional,
            || async {
                user_account::Entity::update_many()
                    .col_expr(
                        user_account::Column::UrlCount,
                        Expr::col(user_account::Column::UrlCount).add(1i64),
                    )
                    .filter(user_account::Column::UserId.eq(user_id))
                    .filter(
                        Expr::col(user_account::Column::UrlCount)
                            .lt(Expr::col(user_account::Column::UrlLimit)),
                    )
                    .exec(db)
                    .await
            },
        )
        .await
        .map_err(|e| UrlVaultError::database_operation(format!("更新配额失败: {}", e)))?;

        debug!(
            "Conditional url_count increment for '{}' affected {} row(s)",
            user_id, result.rows_affected
        );
        Ok(result.rows_affected == 1)
    }

    async fn set_password_hash(&self, user_id: &str, password_hash: &str) -> Result<bool> {
        let db = &self.db;

        let result = retry::with_retry(
            &format!("set_password_hash({})", user_id),
            self.retry_config,
            Replay::Idempotent,
            || async {
                user_account::Entity::update_many()
                    .col_expr(
                        user_account::Column::PasswordHash,
                        Expr::value(password_hash.to_string()),
                    )
                    .filter(user_account::Column::UserId.eq(user_id))
                    .exec(db)
                    .await
            },
        )
        .await
        .map_err(|e| UrlVaultError::database_operation(format!("更新密码失败: {}", e)))?;

        if result.rows_affected > 0 {
            Ok(true)
        } else {
            self.account_exists(user_id).await
        }
    }

    async fn update_account_privileges(
        &self,
        user_id: &str,
        url_limit: Option<i64>,
        is_admin: Option<bool>,
    ) -> Result<bool> {
        if url_limit.is_none() && is_admin.is_none() {
            return self.account_exists(user_id).await;
        }

        let db = &self.db;

        let result = retry::with_retry(
            &format!("update_account_privileges({})", user_id),
            self.retry_config,
            Replay::Idempotent,
            || async {
                let mut update = user_account::Entity::update_many()
                    .filter(user_account::Column::UserId.eq(user_id));
                if let Some(limit) = url_limit {
                    update = update.col_expr(user_account::Column::UrlLimit, Expr::value(limit));
                }
                if let Some(admin) = is_admin {
                    update = update.col_expr(user_account::Column::IsAdmin, Expr::value(admin));
                }
                update.exec(db).await
            },
        )
        .await
        .map_err(|e| UrlVaultError::database_operation(format!("更新用户权限失败: {}", e)))?;

        if result.rows_affected > 0 {
            Ok(true)
        } else {
            self.account_exists(user_id).await
        }
    }
}

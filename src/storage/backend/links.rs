//! `LinkStore` on SeaORM

use async_trait::async_trait;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, sea_query::OnConflict};
use tracing::info;

use super::converters::{model_to_shortlink, shortlink_to_active_model};
use super::retry::{self, Replay};
use super::{SeaOrmStorage, classify_insert};
use crate::errors::{Result, UrlVaultError};
use crate::storage::{InsertOutcome, LinkStore, ShortLink};

use migration::entities::short_link;

#[async_trait]
impl LinkStore for SeaOrmStorage {
    async fn insert_link_if_absent(&self, link: &ShortLink) -> Result<InsertOutcome> {
        let db = &self.db;

        retry::with_retry(
            &format!("insert_link({})", link.code),
            self.retry_config,
            Replay::Conditional,
            || async {
                let result = short_link::Entity::insert(shortlink_to_active_model(link))
                    .on_conflict(
                        OnConflict::column(short_link::Column::ShortCode)
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
            UrlVaultError::database_operation(format!("写入短链接 '{}' 失败: {}", link.code, e))
        })
    }

    async fn get_link(&self, code: &str) -> Result<Option<ShortLink>> {
        let db = &self.db;

        let model = retry::with_retry(
            &format!("get_link({})", code),
            self.retry_config,
            Replay::Idempotent,
            || async {
                short_link::Entity::find_by_id(code.to_string()).one(db).await
            },
        )
        .await
        .map_err(|e| UrlVaultError::database_operation(format!("查询短链接失败: {}", e)))?;

        Ok(model.map(model_to_shortlink))
    }

    async fn remove_link(&self, code: &str) -> Result<bool> {
        let db = &self.db;

        let result = retry::with_retry(
            &format!("remove_link({})", code),
            self.retry_config,
            Replay::Conditional,
            || async {
                short_link::Entity::delete_by_id(code.to_string()).exec(db).await
            },
        )
        .await
        .map_err(|e| UrlVaultError::database_operation(format!("删除短链接失败: {}", e)))?;

        if result.rows_affected > 0 {
            info!("Short link deleted: {}", code);
        }
        Ok(result.rows_affected > 0)
    }

    async fn list_links(&self) -> Result<Vec<ShortLink>> {
        let db = &self.db;

        let models = retry::with_retry(
            "list_links",
            self.retry_config,
            Replay::Idempotent,
            || async {
                short_link::Entity::find()
                    .order_by_asc(short_link::Column::ShortCode)
                    .all(db)
                    .await
            },
        )
        .await
        .map_err(|e| UrlVaultError::database_operation(format!("加载短链接失败: {}", e)))?;

        Ok(models.into_iter().map(model_to_shortlink).collect())
    }

    async fn list_links_by_owner(&self, owner_id: &str) -> Result<Vec<ShortLink>> {
        let db = &self.db;

        let models = retry::with_retry(
            &format!("list_links_by_owner({})", owner_id),
            self.retry_config,
            Replay::Idempotent,
            || async {
                short_link::Entity::find()
                    .filter(short_link::Column::OwnerId.eq(owner_id))
                    .order_by_asc(short_link::Column::ShortCode)
                    .all(db)
                    .await
            },
        )
        .await
        .map_err(|e| UrlVaultError::database_operation(format!("加载用户短链接失败: {}", e)))?;

        Ok(models.into_iter().map(model_to_shortlink).collect())
    }

    async fn ping(&self) -> Result<()> {
        self.db
            .ping()
            .await
            .map_err(|e| UrlVaultError::database_connection(format!("数据库不可用: {}", e)))
    }

    fn backend_name(&self) -> &str {
        &self.backend_name
    }
}

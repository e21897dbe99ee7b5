use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建 short_links 表，short_code 作为唯一主键
        manager
            .create_table(
                Table::create()
                    .table(ShortLink::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ShortLink::ShortCode)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ShortLink::TargetUrl).text().not_null())
                    .col(
                        ColumnDef::new(ShortLink::OwnerId)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ShortLink::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // owner 二级索引，用于按用户列出链接
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_short_links_owner_id")
                    .table(ShortLink::Table)
                    .col(ShortLink::OwnerId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_short_links_owner_id").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(ShortLink::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ShortLink {
    #[sea_orm(iden = "short_links")]
    Table,
    ShortCode,
    TargetUrl,
    OwnerId,
    CreatedAt,
}

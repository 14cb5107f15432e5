use sea_orm_migration::prelude::*;

/// Blocked-website listings, soft deleted through `is_deleted`
#[derive(DeriveIden)]
enum BlackWebsites {
    Table,
    Id,
    WebsiteId,
    Name,
    Url,
    Description,
    IsAvailable,
    IsDeleted,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BlackWebsites::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BlackWebsites::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(BlackWebsites::WebsiteId)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(ColumnDef::new(BlackWebsites::Name).string_len(255).not_null())
                    .col(ColumnDef::new(BlackWebsites::Url).text().not_null())
                    .col(ColumnDef::new(BlackWebsites::Description).text().null())
                    .col(
                        ColumnDef::new(BlackWebsites::IsAvailable)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(BlackWebsites::IsDeleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(BlackWebsites::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(BlackWebsites::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_black_websites_website_id")
                    .table(BlackWebsites::Table)
                    .col(BlackWebsites::WebsiteId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        for (name, column) in [
            ("idx_black_websites_is_available", BlackWebsites::IsAvailable),
            ("idx_black_websites_is_deleted", BlackWebsites::IsDeleted),
            ("idx_black_websites_name", BlackWebsites::Name),
        ] {
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name(name)
                        .table(BlackWebsites::Table)
                        .col(column)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(BlackWebsites::Table)
                    .to_owned(),
            )
            .await?;
        Ok(())
    }
}

use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Countries {
    Table,
    Id,
    Code,
    Name,
    Flag,
    IsActive,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Cards {
    Table,
    CountryCode,
    Price,
    IsAvailable,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Countries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Countries::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Countries::Code).string_len(8).not_null())
                    .col(ColumnDef::new(Countries::Name).string_len(128).not_null())
                    .col(ColumnDef::new(Countries::Flag).string_len(16).not_null())
                    // inactive countries are hidden from the catalogue
                    .col(
                        ColumnDef::new(Countries::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Countries::CreatedAt)
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
                    .name("idx_countries_code")
                    .table(Countries::Table)
                    .col(Countries::Code)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // SQLite only accepts one column per ALTER TABLE, so add them separately
        if !manager.has_column("cards", "country_code").await? {
            manager
                .alter_table(
                    Table::alter()
                        .table(Cards::Table)
                        .add_column(ColumnDef::new(Cards::CountryCode).string_len(8).null())
                        .to_owned(),
                )
                .await?;
        }
        if !manager.has_column("cards", "price").await? {
            manager
                .alter_table(
                    Table::alter()
                        .table(Cards::Table)
                        .add_column(ColumnDef::new(Cards::Price).double().null())
                        .to_owned(),
                )
                .await?;
        }

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_cards_country_code")
                    .table(Cards::Table)
                    .col(Cards::CountryCode)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_cards_is_available")
                    .table(Cards::Table)
                    .col(Cards::IsAvailable)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .if_exists()
                    .name("idx_cards_is_available")
                    .table(Cards::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .if_exists()
                    .name("idx_cards_country_code")
                    .table(Cards::Table)
                    .to_owned(),
            )
            .await?;
        // indexes on these columns are gone, so SQLite accepts the drop
        if manager.has_column("cards", "price").await? {
            manager
                .alter_table(
                    Table::alter()
                        .table(Cards::Table)
                        .drop_column(Cards::Price)
                        .to_owned(),
                )
                .await?;
        }
        if manager.has_column("cards", "country_code").await? {
            manager
                .alter_table(
                    Table::alter()
                        .table(Cards::Table)
                        .drop_column(Cards::CountryCode)
                        .to_owned(),
                )
                .await?;
        }
        manager
            .drop_table(Table::drop().if_exists().table(Countries::Table).to_owned())
            .await?;
        Ok(())
    }
}

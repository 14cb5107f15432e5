use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Orders {
    Table,
    Id,
    OrderId,
    UserId,
    CardId,
    CardType,
    CountryCode,
    Amount,
    Status,
    CreatedAt,
    UpdatedAt,
}

/// Outbox consumed by the order-management bot
#[derive(DeriveIden)]
enum Notifications {
    Table,
    Id,
    NotificationId,
    Type,
    Status,
    Data,
    CreatedAt,
    ProcessedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Orders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Orders::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Orders::OrderId).string_len(64).not_null())
                    .col(ColumnDef::new(Orders::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Orders::CardId).string_len(64).not_null())
                    .col(ColumnDef::new(Orders::CardType).string_len(64).not_null())
                    .col(ColumnDef::new(Orders::CountryCode).string_len(8).not_null())
                    .col(ColumnDef::new(Orders::Amount).double().not_null())
                    .col(
                        ColumnDef::new(Orders::Status)
                            .string_len(32)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Orders::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Orders::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        for (name, column) in [
            ("idx_orders_user_id", Orders::UserId),
            ("idx_orders_status", Orders::Status),
            ("idx_orders_created_at", Orders::CreatedAt),
        ] {
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name(name)
                        .table(Orders::Table)
                        .col(column)
                        .to_owned(),
                )
                .await?;
        }

        manager
            .create_table(
                Table::create()
                    .table(Notifications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Notifications::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Notifications::NotificationId)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Notifications::Type).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Notifications::Status)
                            .string_len(32)
                            .not_null()
                            .default("pending"),
                    )
                    // payload shape depends on type
                    .col(ColumnDef::new(Notifications::Data).json_binary().not_null())
                    .col(
                        ColumnDef::new(Notifications::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    // NULL while pending
                    .col(
                        ColumnDef::new(Notifications::ProcessedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_notifications_notification_id")
                    .table(Notifications::Table)
                    .col(Notifications::NotificationId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        for (name, column) in [
            ("idx_notifications_status", Notifications::Status),
            ("idx_notifications_type", Notifications::Type),
            ("idx_notifications_created_at", Notifications::CreatedAt),
        ] {
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name(name)
                        .table(Notifications::Table)
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
                    .table(Notifications::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(Orders::Table).to_owned())
            .await?;
        Ok(())
    }
}

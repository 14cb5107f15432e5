use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    UserId,
    Username,
    FirstName,
    LastName,
    Balance,
    IsActive,
    CreatedAt,
}

/// Purchasable prepaid-card SKUs
#[derive(DeriveIden)]
enum Cards {
    Table,
    Id,
    CardId,
    CardType,
    Value,
    Currency,
    IsAvailable,
    ReservedBy,
    ReservedAt,
    CreatedAt,
}

/// Append-only balance ledger
#[derive(DeriveIden)]
enum Transactions {
    Table,
    Id,
    UserId,
    Type,
    Amount,
    Description,
    Status,
    Timestamp,
}

#[derive(DeriveIden)]
enum Blacklist {
    Table,
    Id,
    UserId,
    Reason,
    AddedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Users::Username).string_len(255).null())
                    .col(ColumnDef::new(Users::FirstName).string_len(255).null())
                    .col(ColumnDef::new(Users::LastName).string_len(255).null())
                    .col(
                        ColumnDef::new(Users::Balance)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Users::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Users::CreatedAt)
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
                    .name("idx_users_user_id")
                    .table(Users::Table)
                    .col(Users::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_users_username")
                    .table(Users::Table)
                    .col(Users::Username)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Cards::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Cards::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Cards::CardId).string_len(64).not_null())
                    .col(ColumnDef::new(Cards::CardType).string_len(64).not_null())
                    .col(ColumnDef::new(Cards::Value).double().not_null())
                    .col(ColumnDef::new(Cards::Currency).string_len(8).not_null())
                    .col(
                        ColumnDef::new(Cards::IsAvailable)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    // set when a buyer reserves the card
                    .col(ColumnDef::new(Cards::ReservedBy).big_integer().null())
                    .col(
                        ColumnDef::new(Cards::ReservedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Cards::CreatedAt)
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
                    .name("idx_cards_card_id")
                    .table(Cards::Table)
                    .col(Cards::CardId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transactions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Transactions::UserId).big_integer().not_null())
                    // deposit / withdrawal / card_purchase
                    .col(ColumnDef::new(Transactions::Type).string_len(32).not_null())
                    .col(ColumnDef::new(Transactions::Amount).double().not_null())
                    .col(ColumnDef::new(Transactions::Description).text().null())
                    .col(
                        ColumnDef::new(Transactions::Status)
                            .string_len(32)
                            .not_null()
                            .default("completed"),
                    )
                    .col(
                        ColumnDef::new(Transactions::Timestamp)
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
                    .name("idx_transactions_user_id")
                    .table(Transactions::Table)
                    .col(Transactions::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_transactions_timestamp")
                    .table(Transactions::Table)
                    .col(Transactions::Timestamp)
                    .to_owned(),
            )
            .await?;

        // a row here means the user is blocked
        manager
            .create_table(
                Table::create()
                    .table(Blacklist::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Blacklist::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Blacklist::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Blacklist::Reason).text().null())
                    .col(
                        ColumnDef::new(Blacklist::AddedAt)
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
                    .name("idx_blacklist_user_id")
                    .table(Blacklist::Table)
                    .col(Blacklist::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().if_exists().table(Blacklist::Table).to_owned())
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(Transactions::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(Cards::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

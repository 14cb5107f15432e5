use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum SupportConversations {
    Table,
    Id,
    UserId,
    Username,
    Status,
    MessageCount,
    CreatedAt,
    LastMessageAt,
    ClosedAt,
}

/// One aggregate row per calendar date
#[derive(DeriveIden)]
enum SupportStats {
    Table,
    Id,
    Date,
    TotalConversations,
    ActiveConversations,
    ClosedConversations,
    TotalMessages,
    CreatedAt,
    UpdatedAt,
}

/// sea-query 0.30 cannot express a partial index, so it is written by hand.
/// Both PostgreSQL and SQLite accept this statement verbatim.
const ONE_ACTIVE_CONVERSATION_PER_USER: &str = "CREATE UNIQUE INDEX IF NOT EXISTS \
idx_support_conversations_user_id_status ON support_conversations (user_id, status) \
WHERE status = 'active'";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SupportConversations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SupportConversations::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SupportConversations::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SupportConversations::Username)
                            .string_len(255)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SupportConversations::Status)
                            .string_len(32)
                            .not_null()
                            .default("active"),
                    )
                    .col(
                        ColumnDef::new(SupportConversations::MessageCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(SupportConversations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(SupportConversations::LastMessageAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(SupportConversations::ClosedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        for (name, column) in [
            ("idx_support_conversations_user_id", SupportConversations::UserId),
            ("idx_support_conversations_status", SupportConversations::Status),
            (
                "idx_support_conversations_created_at",
                SupportConversations::CreatedAt,
            ),
            (
                "idx_support_conversations_last_message_at",
                SupportConversations::LastMessageAt,
            ),
        ] {
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name(name)
                        .table(SupportConversations::Table)
                        .col(column)
                        .to_owned(),
                )
                .await?;
        }

        // at most one active conversation per user; closed ones are unrestricted
        manager
            .get_connection()
            .execute_unprepared(ONE_ACTIVE_CONVERSATION_PER_USER)
            .await?;

        // most recently active open conversations
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_support_conversations_status_last_message_at_desc")
                    .table(SupportConversations::Table)
                    .col(SupportConversations::Status)
                    .col((SupportConversations::LastMessageAt, IndexOrder::Desc))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SupportStats::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SupportStats::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SupportStats::Date).date().not_null())
                    .col(
                        ColumnDef::new(SupportStats::TotalConversations)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(SupportStats::ActiveConversations)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(SupportStats::ClosedConversations)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(SupportStats::TotalMessages)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(SupportStats::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(SupportStats::UpdatedAt)
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
                    .name("idx_support_stats_date")
                    .table(SupportStats::Table)
                    .col(SupportStats::Date)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(SupportStats::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(SupportConversations::Table)
                    .to_owned(),
            )
            .await?;
        Ok(())
    }
}

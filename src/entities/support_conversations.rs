use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// Status value covered by the one-active-conversation-per-user index
pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_CLOSED: &str = "closed";

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "support_conversations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i64,
    pub username: Option<String>,
    pub status: String,
    pub message_count: i32,
    pub created_at: DateTime<Utc>,
    pub last_message_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "support_stats")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub date: NaiveDate,
    pub total_conversations: i32,
    pub active_conversations: i32,
    pub closed_conversations: i32,
    pub total_messages: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub notification_id: String,
    #[sea_orm(column_name = "type")]
    pub notification_type: String,
    pub status: String,
    /// Free-form payload; for `new_order` it embeds the order id and user/card snapshots
    #[sea_orm(column_type = "JsonBinary")]
    pub data: Json,
    pub created_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

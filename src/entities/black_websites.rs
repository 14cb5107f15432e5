use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "black_websites")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub website_id: String,
    pub name: String,
    pub url: String,
    pub description: Option<String>,
    pub is_available: bool,
    /// Soft delete flag; rows are never removed
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

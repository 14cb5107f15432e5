use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "cards")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub card_id: String,
    pub card_type: String,
    /// Face value in `currency`
    #[sea_orm(column_name = "value")]
    pub face_value: f64,
    pub currency: String,
    pub is_available: bool,
    pub reserved_by: Option<i64>,
    pub reserved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    /// Refers to `countries.code`, not enforced
    pub country_code: Option<String>,
    pub price: Option<f64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

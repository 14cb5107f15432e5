use crate::entities::{notification_entity as notifications, order_entity as orders};
use crate::error::AppResult;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};

pub const ORDER_PENDING: &str = "pending";
pub const NOTIFICATION_PENDING: &str = "pending";
pub const NOTIFICATION_PROCESSED: &str = "processed";

/// Reads and transitions used by the order-handling bot.
#[derive(Clone)]
pub struct OrderService {
    pool: DatabaseConnection,
}

impl OrderService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn get_order(&self, order_id: &str) -> AppResult<Option<orders::Model>> {
        Ok(orders::Entity::find()
            .filter(orders::Column::OrderId.eq(order_id))
            .one(&self.pool)
            .await?)
    }

    /// Oldest first.
    pub async fn get_pending_orders(&self, limit: u64) -> AppResult<Vec<orders::Model>> {
        Ok(orders::Entity::find()
            .filter(orders::Column::Status.eq(ORDER_PENDING))
            .order_by_asc(orders::Column::CreatedAt)
            .order_by_asc(orders::Column::Id)
            .limit(limit)
            .all(&self.pool)
            .await?)
    }

    /// Status values are not constrained here; the bot owns the lifecycle.
    pub async fn update_order_status(&self, order_id: &str, status: &str) -> AppResult<bool> {
        let result = orders::Entity::update_many()
            .col_expr(orders::Column::Status, Expr::value(status))
            .col_expr(orders::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(orders::Column::OrderId.eq(order_id))
            .exec(&self.pool)
            .await?;
        if result.rows_affected > 0 {
            log::info!("Order {order_id} moved to {status}");
        }
        Ok(result.rows_affected > 0)
    }

    pub async fn get_pending_notifications(&self) -> AppResult<Vec<notifications::Model>> {
        Ok(notifications::Entity::find()
            .filter(notifications::Column::Status.eq(NOTIFICATION_PENDING))
            .order_by_asc(notifications::Column::CreatedAt)
            .order_by_asc(notifications::Column::Id)
            .all(&self.pool)
            .await?)
    }

    /// Leaves `pending` and stamps `processed_at`. Only pending notifications move, so
    /// a notification is processed at most once; returns false otherwise.
    pub async fn mark_notification_processed(&self, notification_id: &str) -> AppResult<bool> {
        let result = notifications::Entity::update_many()
            .col_expr(
                notifications::Column::Status,
                Expr::value(NOTIFICATION_PROCESSED),
            )
            .col_expr(notifications::Column::ProcessedAt, Expr::value(Utc::now()))
            .filter(notifications::Column::NotificationId.eq(notification_id))
            .filter(notifications::Column::Status.eq(NOTIFICATION_PENDING))
            .exec(&self.pool)
            .await?;
        Ok(result.rows_affected == 1)
    }
}

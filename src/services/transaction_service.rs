use crate::entities::transaction_entity as transactions;
use crate::error::AppResult;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

pub const TRANSACTION_COMPLETED: &str = "completed";

/// Balance ledger entries. Rows are only ever appended.
#[derive(Clone)]
pub struct TransactionService {
    pool: DatabaseConnection,
}

impl TransactionService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// `transaction_type` is deposit, withdrawal or card_purchase.
    pub async fn create_transaction(
        &self,
        user_id: i64,
        transaction_type: &str,
        amount: f64,
        description: Option<String>,
    ) -> AppResult<transactions::Model> {
        let model = transactions::ActiveModel {
            id: NotSet,
            user_id: Set(user_id),
            transaction_type: Set(transaction_type.to_string()),
            amount: Set(amount),
            description: Set(description),
            status: Set(TRANSACTION_COMPLETED.to_string()),
            timestamp: Set(Utc::now()),
        };
        let created = model.insert(&self.pool).await?;
        log::info!("Created transaction for user {user_id}: {transaction_type} {amount}");
        Ok(created)
    }

    /// Newest first, at most `limit` entries.
    pub async fn get_user_transactions(
        &self,
        user_id: i64,
        limit: u64,
    ) -> AppResult<Vec<transactions::Model>> {
        Ok(transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id))
            .order_by_desc(transactions::Column::Timestamp)
            .order_by_desc(transactions::Column::Id)
            .limit(limit)
            .all(&self.pool)
            .await?)
    }
}

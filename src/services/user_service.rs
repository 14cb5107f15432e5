use crate::entities::{blacklist_entity as blacklist, user_entity as users};
use crate::error::{AppResult, is_unique_violation};
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, QueryFilter, Set,
};

#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub user_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Bot users and the block list.
#[derive(Clone)]
pub struct UserService {
    pool: DatabaseConnection,
}

impl UserService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// Registers a user with a zero balance. Returns false when the user already exists.
    pub async fn create_user(&self, user: NewUser) -> AppResult<bool> {
        let model = users::ActiveModel {
            id: NotSet,
            user_id: Set(user.user_id),
            username: Set(user.username),
            first_name: Set(user.first_name),
            last_name: Set(user.last_name),
            balance: Set(0.0),
            is_active: Set(true),
            created_at: Set(Utc::now()),
        };

        match model.insert(&self.pool).await {
            Ok(_) => {
                log::info!("Created new user: {}", user.user_id);
                Ok(true)
            }
            Err(e) if is_unique_violation(&e) => {
                log::info!("User {} already exists", user.user_id);
                Ok(false)
            }
            Err(e) => {
                log::error!("Error creating user {}: {e}", user.user_id);
                Err(e.into())
            }
        }
    }

    pub async fn get_user(&self, user_id: i64) -> AppResult<Option<users::Model>> {
        Ok(users::Entity::find()
            .filter(users::Column::UserId.eq(user_id))
            .one(&self.pool)
            .await?)
    }

    /// Balance of a user, 0 for unknown users.
    pub async fn get_user_balance(&self, user_id: i64) -> AppResult<f64> {
        Ok(self.get_user(user_id).await?.map_or(0.0, |u| u.balance))
    }

    /// Adds `amount` (negative to debit) to the stored balance in a single statement,
    /// so concurrent updates never overwrite each other. Returns false for unknown users.
    pub async fn update_user_balance(&self, user_id: i64, amount: f64) -> AppResult<bool> {
        let result = users::Entity::update_many()
            .col_expr(
                users::Column::Balance,
                Expr::col(users::Column::Balance).add(amount),
            )
            .filter(users::Column::UserId.eq(user_id))
            .exec(&self.pool)
            .await?;
        Ok(result.rows_affected > 0)
    }

    /// Returns false when the user is already blocked.
    pub async fn add_to_blacklist(&self, user_id: i64, reason: Option<String>) -> AppResult<bool> {
        let entry = blacklist::ActiveModel {
            id: NotSet,
            user_id: Set(user_id),
            reason: Set(reason),
            added_at: Set(Utc::now()),
        };

        match entry.insert(&self.pool).await {
            Ok(_) => {
                log::info!("Added user {user_id} to blacklist");
                Ok(true)
            }
            Err(e) if is_unique_violation(&e) => {
                log::info!("User {user_id} already in blacklist");
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn is_blacklisted(&self, user_id: i64) -> AppResult<bool> {
        let entry = blacklist::Entity::find()
            .filter(blacklist::Column::UserId.eq(user_id))
            .one(&self.pool)
            .await?;
        Ok(entry.is_some())
    }

    /// Returns false when the user was not blocked.
    pub async fn remove_from_blacklist(&self, user_id: i64) -> AppResult<bool> {
        let result = blacklist::Entity::delete_many()
            .filter(blacklist::Column::UserId.eq(user_id))
            .exec(&self.pool)
            .await?;
        Ok(result.rows_affected > 0)
    }
}

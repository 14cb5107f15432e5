use crate::entities::card_entity as cards;
use crate::error::AppResult;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

#[derive(Clone)]
pub struct CardService {
    pool: DatabaseConnection,
}

impl CardService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn get_available_cards(&self) -> AppResult<Vec<cards::Model>> {
        Ok(cards::Entity::find()
            .filter(cards::Column::IsAvailable.eq(true))
            .order_by_asc(cards::Column::CardId)
            .all(&self.pool)
            .await?)
    }

    /// Available cards of one country, for the country picker.
    pub async fn get_available_cards_by_country(
        &self,
        country_code: &str,
    ) -> AppResult<Vec<cards::Model>> {
        Ok(cards::Entity::find()
            .filter(cards::Column::IsAvailable.eq(true))
            .filter(cards::Column::CountryCode.eq(country_code))
            .order_by_asc(cards::Column::CardId)
            .all(&self.pool)
            .await?)
    }

    pub async fn get_card(&self, card_id: &str) -> AppResult<Option<cards::Model>> {
        Ok(cards::Entity::find()
            .filter(cards::Column::CardId.eq(card_id))
            .one(&self.pool)
            .await?)
    }

    /// Takes a card off sale for `user_id`.
    ///
    /// The availability check and the update are one conditional statement, so of two
    /// buyers racing for the same card exactly one gets `true`.
    pub async fn reserve_card(&self, card_id: &str, user_id: i64) -> AppResult<bool> {
        let result = cards::Entity::update_many()
            .col_expr(cards::Column::IsAvailable, Expr::value(false))
            .col_expr(cards::Column::ReservedBy, Expr::value(user_id))
            .col_expr(cards::Column::ReservedAt, Expr::value(Utc::now()))
            .filter(cards::Column::CardId.eq(card_id))
            .filter(cards::Column::IsAvailable.eq(true))
            .exec(&self.pool)
            .await?;

        let reserved = result.rows_affected == 1;
        if reserved {
            log::info!("Card {card_id} reserved by user {user_id}");
        } else {
            log::info!("Card {card_id} is not available for user {user_id}");
        }
        Ok(reserved)
    }
}

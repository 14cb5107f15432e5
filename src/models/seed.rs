use crate::entities::{
    black_website_entity as black_websites, card_entity as cards, country_entity as countries,
    notification_entity as notifications, support_stats_entity as support_stats,
    user_entity as users,
};
use crate::error::AppResult;
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{NotSet, Set};
use serde::Deserialize;

/// Sample documents for development stores. Kept as data in `seeds/sample_data.json`.
const SAMPLE_DATA: &str = include_str!("../../seeds/sample_data.json");

#[derive(Debug, Clone, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub users: Vec<SeedUser>,
    #[serde(default)]
    pub countries: Vec<SeedCountry>,
    #[serde(default)]
    pub cards: Vec<SeedCard>,
    #[serde(default)]
    pub black_websites: Vec<SeedBlackWebsite>,
    #[serde(default)]
    pub notifications: Vec<SeedNotification>,
    #[serde(default)]
    pub support_stats: Vec<SeedSupportStats>,
}

impl SeedData {
    pub fn bundled() -> AppResult<Self> {
        Ok(serde_json::from_str(SAMPLE_DATA)?)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedUser {
    pub user_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(default)]
    pub balance: f64,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedCountry {
    pub code: String,
    pub name: String,
    pub flag: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedCard {
    pub card_id: String,
    pub card_type: String,
    pub country_code: Option<String>,
    pub value: f64,
    pub price: Option<f64>,
    pub currency: String,
    #[serde(default = "default_true")]
    pub is_available: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedBlackWebsite {
    pub website_id: String,
    pub name: String,
    pub url: String,
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub is_available: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedNotification {
    pub notification_id: String,
    #[serde(rename = "type")]
    pub notification_type: String,
    pub status: String,
    pub data: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedSupportStats {
    pub date: NaiveDate,
    #[serde(default)]
    pub total_conversations: i32,
    #[serde(default)]
    pub active_conversations: i32,
    #[serde(default)]
    pub closed_conversations: i32,
    #[serde(default)]
    pub total_messages: i32,
}

fn default_true() -> bool {
    true
}

impl SeedUser {
    pub fn into_active_model(self, now: DateTime<Utc>) -> users::ActiveModel {
        users::ActiveModel {
            id: NotSet,
            user_id: Set(self.user_id),
            username: Set(self.username),
            first_name: Set(self.first_name),
            last_name: Set(self.last_name),
            balance: Set(self.balance),
            is_active: Set(self.is_active),
            created_at: Set(now),
        }
    }
}

impl SeedCountry {
    pub fn into_active_model(self, now: DateTime<Utc>) -> countries::ActiveModel {
        countries::ActiveModel {
            id: NotSet,
            code: Set(self.code),
            name: Set(self.name),
            flag: Set(self.flag),
            is_active: Set(self.is_active),
            created_at: Set(now),
        }
    }
}

impl SeedCard {
    pub fn into_active_model(self, now: DateTime<Utc>) -> cards::ActiveModel {
        cards::ActiveModel {
            card_id: Set(self.card_id),
            card_type: Set(self.card_type),
            face_value: Set(self.value),
            currency: Set(self.currency),
            is_available: Set(self.is_available),
            country_code: Set(self.country_code),
            price: Set(self.price),
            created_at: Set(now),
            ..Default::default()
        }
    }
}

impl SeedBlackWebsite {
    pub fn into_active_model(self, now: DateTime<Utc>) -> black_websites::ActiveModel {
        black_websites::ActiveModel {
            id: NotSet,
            website_id: Set(self.website_id),
            name: Set(self.name),
            url: Set(self.url),
            description: Set(self.description),
            is_available: Set(self.is_available),
            is_deleted: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
        }
    }
}

impl SeedNotification {
    pub fn into_active_model(self, now: DateTime<Utc>) -> notifications::ActiveModel {
        notifications::ActiveModel {
            id: NotSet,
            notification_id: Set(self.notification_id),
            notification_type: Set(self.notification_type),
            status: Set(self.status),
            data: Set(self.data),
            created_at: Set(now),
            processed_at: Set(None),
        }
    }
}

impl SeedSupportStats {
    pub fn into_active_model(self, now: DateTime<Utc>) -> support_stats::ActiveModel {
        support_stats::ActiveModel {
            id: NotSet,
            date: Set(self.date),
            total_conversations: Set(self.total_conversations),
            active_conversations: Set(self.active_conversations),
            closed_conversations: Set(self.closed_conversations),
            total_messages: Set(self.total_messages),
            created_at: Set(now),
            updated_at: Set(now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_sample_data_parses() {
        let data = SeedData::bundled().unwrap();
        assert_eq!(data.users.len(), 1);
        assert_eq!(data.users[0].user_id, 123456789);

        let codes: Vec<&str> = data.countries.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, vec!["US", "UK", "CA", "DE"]);

        assert!(data.cards.iter().any(|c| c.card_id == "US_VISA_25"));
        assert_eq!(data.support_stats.len(), 1);
    }

    #[test]
    fn test_cards_reference_seeded_countries() {
        let data = SeedData::bundled().unwrap();
        for card in &data.cards {
            let code = card.country_code.as_deref().unwrap();
            assert!(data.countries.iter().any(|c| c.code == code), "{code}");
        }
    }

    #[test]
    fn test_new_order_notification_payload() {
        let data = SeedData::bundled().unwrap();
        let notification = &data.notifications[0];
        assert_eq!(notification.notification_type, "new_order");
        assert_eq!(notification.status, "pending");
        assert_eq!(notification.data["card"]["card_id"], "US_VISA_25");
        assert!(notification.data["order_id"].is_string());
        assert!(notification.data["timestamp"].is_string());
    }
}

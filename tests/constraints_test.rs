mod common;

use chrono::{NaiveDate, Utc};
use common::{setup_initialized_store, setup_store};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, Set,
};
use serde_json::json;
use telegram_bot_db::entities::{
    black_website_entity as black_websites, blacklist_entity as blacklist,
    card_entity as cards, country_entity as countries, notification_entity as notifications,
    order_entity as orders, support_conversation_entity as conversations,
    support_stats_entity as support_stats, transaction_entity as transactions,
    user_entity as users,
};
use telegram_bot_db::error::is_unique_violation;

fn assert_unique_violation<T: std::fmt::Debug>(result: Result<T, DbErr>) {
    match result {
        Err(err) => assert!(is_unique_violation(&err), "unexpected error: {err}"),
        Ok(value) => panic!("duplicate accepted: {value:?}"),
    }
}

fn user(user_id: i64) -> users::ActiveModel {
    users::ActiveModel {
        user_id: Set(user_id),
        username: Set(Some(format!("user_{user_id}"))),
        balance: Set(0.0),
        is_active: Set(true),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
}

fn card(card_id: &str) -> cards::ActiveModel {
    cards::ActiveModel {
        card_id: Set(card_id.to_string()),
        card_type: Set("VISA".to_string()),
        face_value: Set(25.0),
        currency: Set("USD".to_string()),
        is_available: Set(true),
        country_code: Set(Some("US".to_string())),
        price: Set(Some(26.0)),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
}

fn conversation(user_id: i64, status: &str) -> conversations::ActiveModel {
    let now = Utc::now();
    conversations::ActiveModel {
        user_id: Set(user_id),
        status: Set(status.to_string()),
        message_count: Set(1),
        created_at: Set(now),
        last_message_at: Set(now),
        ..Default::default()
    }
}

async fn insert_country(pool: &DatabaseConnection, code: &str) -> Result<countries::Model, DbErr> {
    countries::ActiveModel {
        code: Set(code.to_string()),
        name: Set(format!("Country {code}")),
        flag: Set("🏳️".to_string()),
        is_active: Set(true),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(pool)
    .await
}

async fn insert_blacklist(pool: &DatabaseConnection, user_id: i64) -> Result<blacklist::Model, DbErr> {
    blacklist::ActiveModel {
        user_id: Set(user_id),
        reason: Set(Some("spam".to_string())),
        added_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(pool)
    .await
}

async fn insert_notification(
    pool: &DatabaseConnection,
    notification_id: &str,
) -> Result<notifications::Model, DbErr> {
    notifications::ActiveModel {
        notification_id: Set(notification_id.to_string()),
        notification_type: Set("new_order".to_string()),
        status: Set("pending".to_string()),
        data: Set(json!({ "order_id": "ORD-1", "card": { "card_id": "US_VISA_25" } })),
        created_at: Set(Utc::now()),
        processed_at: Set(None),
        ..Default::default()
    }
    .insert(pool)
    .await
}

async fn insert_website(
    pool: &DatabaseConnection,
    website_id: &str,
) -> Result<black_websites::Model, DbErr> {
    let now = Utc::now();
    black_websites::ActiveModel {
        website_id: Set(website_id.to_string()),
        name: Set("Fake Store".to_string()),
        url: Set("https://fake-store.example".to_string()),
        description: Set(None),
        is_available: Set(true),
        is_deleted: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(pool)
    .await
}

async fn insert_stats(pool: &DatabaseConnection, date: NaiveDate) -> Result<support_stats::Model, DbErr> {
    let now = Utc::now();
    support_stats::ActiveModel {
        date: Set(date),
        total_conversations: Set(3),
        active_conversations: Set(1),
        closed_conversations: Set(2),
        total_messages: Set(10),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(pool)
    .await
}

#[tokio::test]
async fn test_unique_keys_reject_duplicates() {
    let store = setup_initialized_store().await;
    let pool = &store.pool;

    user(1001).insert(pool).await.unwrap();
    assert_unique_violation(user(1001).insert(pool).await);

    card("DE_VISA_10").insert(pool).await.unwrap();
    assert_unique_violation(card("DE_VISA_10").insert(pool).await);

    insert_country(pool, "FR").await.unwrap();
    assert_unique_violation(insert_country(pool, "FR").await);

    insert_blacklist(pool, 1001).await.unwrap();
    assert_unique_violation(insert_blacklist(pool, 1001).await);

    insert_notification(pool, "NOTIF-1").await.unwrap();
    assert_unique_violation(insert_notification(pool, "NOTIF-1").await);

    insert_website(pool, "WEB-1").await.unwrap();
    assert_unique_violation(insert_website(pool, "WEB-1").await);

    let date = NaiveDate::from_ymd_opt(2025, 9, 21).unwrap();
    insert_stats(pool, date).await.unwrap();
    assert_unique_violation(insert_stats(pool, date).await);
}

#[tokio::test]
async fn test_non_unique_indexes_accept_repeated_values() {
    let store = setup_initialized_store().await;
    let pool = &store.pool;

    for amount in [10.0, 25.0] {
        transactions::ActiveModel {
            user_id: Set(1001),
            transaction_type: Set("deposit".to_string()),
            amount: Set(amount),
            description: Set(None),
            status: Set("completed".to_string()),
            timestamp: Set(Utc::now()),
            ..Default::default()
        }
        .insert(pool)
        .await
        .unwrap();
    }

    for order_id in ["ORD-1", "ORD-2"] {
        orders::ActiveModel {
            order_id: Set(order_id.to_string()),
            user_id: Set(1001),
            card_id: Set("US_VISA_25".to_string()),
            card_type: Set("VISA".to_string()),
            country_code: Set("US".to_string()),
            amount: Set(27.5),
            status: Set("pending".to_string()),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
            ..Default::default()
        }
        .insert(pool)
        .await
        .unwrap();
    }

    let user_orders = orders::Entity::find()
        .filter(orders::Column::UserId.eq(1001i64))
        .count(pool)
        .await
        .unwrap();
    assert_eq!(user_orders, 2);

    // same username is allowed for different users
    let mut other = user(1002);
    other.username = Set(Some("user_1001".to_string()));
    user(1001).insert(pool).await.unwrap();
    other.insert(pool).await.unwrap();
}

#[tokio::test]
async fn test_seeded_card_cannot_be_inserted_again() {
    let store = setup_store().await;
    store.initialize(None, true).await.unwrap();

    assert_unique_violation(card("US_VISA_25").insert(&store.pool).await);

    let stored = cards::Entity::find()
        .filter(cards::Column::CardId.eq("US_VISA_25"))
        .all(&store.pool)
        .await
        .unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].price, Some(27.5));
}

#[tokio::test]
async fn test_one_active_conversation_per_user() {
    let store = setup_initialized_store().await;
    let pool = &store.pool;

    conversation(42, conversations::STATUS_ACTIVE)
        .insert(pool)
        .await
        .unwrap();
    assert_unique_violation(
        conversation(42, conversations::STATUS_ACTIVE)
            .insert(pool)
            .await,
    );
    conversation(42, conversations::STATUS_CLOSED)
        .insert(pool)
        .await
        .unwrap();
    conversation(42, conversations::STATUS_CLOSED)
        .insert(pool)
        .await
        .unwrap();

    let rows = conversations::Entity::find()
        .filter(conversations::Column::UserId.eq(42i64))
        .count(pool)
        .await
        .unwrap();
    assert_eq!(rows, 3);
}

#[tokio::test]
async fn test_closing_a_conversation_frees_the_active_slot() {
    let store = setup_initialized_store().await;
    let pool = &store.pool;

    conversation(43, conversations::STATUS_ACTIVE)
        .insert(pool)
        .await
        .unwrap();
    // other users are unaffected
    conversation(44, conversations::STATUS_ACTIVE)
        .insert(pool)
        .await
        .unwrap();

    let active = conversations::Entity::find()
        .filter(conversations::Column::UserId.eq(43i64))
        .filter(conversations::Column::Status.eq(conversations::STATUS_ACTIVE))
        .one(pool)
        .await
        .unwrap()
        .unwrap();
    let mut closing = active.into_active_model();
    closing.status = Set(conversations::STATUS_CLOSED.to_string());
    closing.closed_at = Set(Some(Utc::now()));
    closing.update(pool).await.unwrap();

    conversation(43, conversations::STATUS_ACTIVE)
        .insert(pool)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_foreign_keys_are_not_enforced() {
    let store = setup_initialized_store().await;
    let pool = &store.pool;

    // no countries and no users exist yet
    card("ZZ_VISA_5").insert(pool).await.unwrap();
    insert_blacklist(pool, 999).await.unwrap();
    conversation(999, conversations::STATUS_ACTIVE)
        .insert(pool)
        .await
        .unwrap();
}

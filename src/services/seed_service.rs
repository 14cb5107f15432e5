use crate::entities::{
    black_website_entity as black_websites, card_entity as cards, country_entity as countries,
    notification_entity as notifications, support_stats_entity as support_stats,
    user_entity as users,
};
use crate::error::{AppResult, is_unique_violation};
use crate::models::SeedData;
use chrono::Utc;
use sea_orm::sea_query::{IntoIden, OnConflict};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub inserted: usize,
    /// Documents whose unique key was already present
    pub skipped: usize,
}

impl SeedSummary {
    fn add(&mut self, other: SeedSummary) {
        self.inserted += other.inserted;
        self.skipped += other.skipped;
    }
}

#[derive(Clone)]
pub struct SeedService {
    pool: DatabaseConnection,
}

impl SeedService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// Insert every sample document whose unique key is absent.
    ///
    /// Running this any number of times, or from two processes at once, leaves
    /// exactly one copy of each document.
    pub async fn seed(&self, data: SeedData) -> AppResult<SeedSummary> {
        let now = Utc::now();
        let mut summary = SeedSummary::default();

        summary.add(
            self.insert_missing(
                "users",
                users::Column::UserId,
                data.users.into_iter().map(|u| u.into_active_model(now)),
            )
            .await?,
        );
        summary.add(
            self.insert_missing(
                "countries",
                countries::Column::Code,
                data.countries.into_iter().map(|c| c.into_active_model(now)),
            )
            .await?,
        );
        summary.add(
            self.insert_missing(
                "cards",
                cards::Column::CardId,
                data.cards.into_iter().map(|c| c.into_active_model(now)),
            )
            .await?,
        );
        summary.add(
            self.insert_missing(
                "black_websites",
                black_websites::Column::WebsiteId,
                data.black_websites
                    .into_iter()
                    .map(|w| w.into_active_model(now)),
            )
            .await?,
        );
        summary.add(
            self.insert_missing(
                "notifications",
                notifications::Column::NotificationId,
                data.notifications
                    .into_iter()
                    .map(|n| n.into_active_model(now)),
            )
            .await?,
        );
        summary.add(
            self.insert_missing(
                "support_stats",
                support_stats::Column::Date,
                data.support_stats
                    .into_iter()
                    .map(|s| s.into_active_model(now)),
            )
            .await?,
        );

        log::info!(
            "Seeding finished: {} inserted, {} already present",
            summary.inserted,
            summary.skipped
        );
        Ok(summary)
    }

    /// Upsert-by-key with `ON CONFLICT (key) DO NOTHING`.
    async fn insert_missing<A, I>(
        &self,
        collection: &str,
        key: impl IntoIden,
        models: I,
    ) -> AppResult<SeedSummary>
    where
        A: ActiveModelTrait,
        <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
        I: IntoIterator<Item = A>,
    {
        let models: Vec<A> = models.into_iter().collect();
        if models.is_empty() {
            return Ok(SeedSummary::default());
        }
        let total = models.len();

        let result = <A::Entity as EntityTrait>::insert_many(models)
            .on_conflict(OnConflict::column(key).do_nothing().to_owned())
            .exec_without_returning(&self.pool)
            .await;

        let inserted = match result {
            Ok(rows) => rows as usize,
            // a concurrent run inserted the same keys first
            Err(e) if is_unique_violation(&e) => {
                log::info!("Seed rows for {collection} already present: {e}");
                0
            }
            Err(e) => {
                log::error!("Failed to seed {collection}: {e}");
                return Err(e.into());
            }
        };

        if inserted < total {
            log::info!(
                "Skipped {} existing {collection} seed document(s)",
                total - inserted
            );
        }
        Ok(SeedSummary {
            inserted,
            skipped: total - inserted,
        })
    }
}

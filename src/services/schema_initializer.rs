use crate::config::SchemaConfig;
use crate::database::{latest_revision, run_migrations};
use crate::error::AppResult;
use crate::models::SeedData;
use crate::schema;
use crate::services::{SeedService, SeedSummary};
use sea_orm::DatabaseConnection;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitReport {
    pub revision: usize,
    /// Migration steps applied by this run
    pub applied: Vec<String>,
    /// None when seeding was not requested or not possible
    pub seeded: Option<SeedSummary>,
}

/// Brings a store to the declared schema: migrate, verify, then optionally seed.
///
/// Every step is idempotent, so the whole procedure can run on each deployment.
/// Structure created before a later failure stays in place.
#[derive(Clone)]
pub struct SchemaInitializer {
    pool: DatabaseConnection,
    seed_service: SeedService,
    options: SchemaConfig,
}

impl SchemaInitializer {
    pub fn new(pool: DatabaseConnection, options: SchemaConfig) -> Self {
        Self {
            seed_service: SeedService::new(pool.clone()),
            pool,
            options,
        }
    }

    pub async fn run(&self) -> AppResult<InitReport> {
        let outcome = run_migrations(&self.pool, self.options.target_revision).await?;
        for name in &outcome.applied {
            log::info!("Applied migration {name}");
        }

        schema::verify(&self.pool, outcome.revision).await?;

        let seeded = if !self.options.seed_sample_data {
            None
        } else if outcome.revision < latest_revision() {
            log::warn!(
                "Sample data targets revision {}, store is at {}; skipping seed",
                latest_revision(),
                outcome.revision
            );
            None
        } else {
            Some(self.seed_service.seed(SeedData::bundled()?).await?)
        };

        Ok(InitReport {
            revision: outcome.revision,
            applied: outcome.applied,
            seeded,
        })
    }
}

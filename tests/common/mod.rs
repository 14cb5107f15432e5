#![allow(dead_code)]

use sea_orm::{ConnectionTrait, DatabaseConnection};
use telegram_bot_db::config::{DatabaseConfig, SchemaConfig};
use telegram_bot_db::database::create_pool;
use telegram_bot_db::services::{InitReport, SchemaInitializer};
use telegram_bot_db::AppResult;
use tempfile::TempDir;

pub struct TestStore {
    pub pool: DatabaseConnection,
    pub config: DatabaseConfig,
    _dir: TempDir,
}

impl TestStore {
    /// A second, independent pool on the same file, like another process would open.
    pub async fn reopen(&self) -> DatabaseConnection {
        create_pool(&self.config).await.expect("reopen failed")
    }

    pub async fn initialize(&self, target: Option<usize>, seed: bool) -> AppResult<InitReport> {
        initialize(&self.pool, target, seed).await
    }

    /// Run a raw SQL batch on a short-lived pool of its own, like a manual change
    /// made by an operator between two deployments.
    pub async fn execute_batch(&self, sql: &str) {
        let pool = self.reopen().await;
        pool.execute_unprepared(sql).await.expect("batch failed");
        pool.close().await.expect("close failed");
    }
}

pub async fn setup_store() -> TestStore {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("telegram_bot.db");
    let mut config = DatabaseConfig::new(format!("sqlite://{}?mode=rwc", path.display()));
    config.connect_retry_secs = 1;

    let pool = create_pool(&config).await.expect("create_pool failed");
    TestStore {
        pool,
        config,
        _dir: dir,
    }
}

pub async fn initialize(
    pool: &DatabaseConnection,
    target: Option<usize>,
    seed: bool,
) -> AppResult<InitReport> {
    let options = SchemaConfig {
        target_revision: target,
        seed_sample_data: seed,
    };
    SchemaInitializer::new(pool.clone(), options).run().await
}

/// Initialized at the latest revision, without sample data.
pub async fn setup_initialized_store() -> TestStore {
    let store = setup_store().await;
    store.initialize(None, false).await.expect("initialize failed");
    store
}

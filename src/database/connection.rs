use crate::config::DatabaseConfig;
use crate::error::{AppError, AppResult, is_unique_violation};
use backoff::ExponentialBackoff;
use backoff::future::retry;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr};
use std::time::Duration;

/// Open the pool and ping the store, retrying while it is not reachable yet.
///
/// In a multi-service deployment the store may still be starting, so connectivity
/// errors are retried with exponential backoff for at most `connect_retry_secs`.
/// Any other error fails immediately.
pub async fn create_pool(config: &DatabaseConfig) -> AppResult<DatabaseConnection> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .sqlx_logging(false);

    let backoff = ExponentialBackoff {
        max_elapsed_time: Some(Duration::from_secs(config.connect_retry_secs)),
        ..Default::default()
    };

    let options = &options;
    let pool = retry(backoff, || async move {
        let pool = Database::connect(options.clone())
            .await
            .map_err(classify_connect_error)?;
        pool.ping().await.map_err(classify_connect_error)?;
        Ok::<_, backoff::Error<DbErr>>(pool)
    })
    .await
    .inspect_err(|e: &DbErr| log::error!("Store unreachable, giving up: {e}"))?;

    log::info!("Connected to {:?} store", pool.get_database_backend());
    Ok(pool)
}

fn classify_connect_error(err: DbErr) -> backoff::Error<DbErr> {
    match err {
        DbErr::Conn(_) | DbErr::ConnectionAcquire(..) => {
            log::warn!("Store not ready yet, retrying: {err}");
            backoff::Error::transient(err)
        }
        other => backoff::Error::permanent(other),
    }
}

/// Number of schema revisions this build knows about.
pub fn latest_revision() -> usize {
    Migrator::migrations().len()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationOutcome {
    /// Revision the store is at after migrating
    pub revision: usize,
    /// Steps that landed while this run was migrating, oldest first
    pub applied: Vec<String>,
}

const CONTENDED_PAUSE: Duration = Duration::from_millis(200);

/// Apply pending revisions up to `target` (latest when `None`).
///
/// The migrator's bookkeeping table is the schema-version marker, so only the
/// steps between the stored revision and the target run. Steps are applied one at
/// a time and the marker is re-read before each, so a concurrent run on the same
/// store either finishes the work for us or is waited out. Downgrades are refused,
/// including when another run moved the store past `target` meanwhile.
pub async fn run_migrations(
    pool: &DatabaseConnection,
    target: Option<usize>,
) -> AppResult<MigrationOutcome> {
    let latest = latest_revision();
    let target = match target {
        None => latest,
        Some(t) if t == 0 || t > latest => {
            return Err(AppError::UnknownRevision {
                requested: t,
                latest,
            });
        }
        Some(t) => t,
    };

    let before = applied_revision(pool).await?;
    if before < target {
        log::info!("Migrating schema from revision {before} to {target}");
    } else if before == target {
        log::info!("Schema already at revision {target}");
    }

    // collisions with another run tolerated over the whole migration
    let max_contended = 2 * latest;
    let mut contended = 0;
    let revision = loop {
        let current = applied_revision(pool).await?;
        if current > target {
            return Err(AppError::SchemaAhead {
                applied: current,
                target,
            });
        }
        if current == target {
            break current;
        }

        let Err(err) = Migrator::up(pool, Some(1)).await else {
            continue;
        };
        contended += 1;
        if contended > max_contended {
            log::error!("Migration step failed after {max_contended} retries: {err}");
            return Err(err.into());
        }

        // another run may be applying the same step
        tokio::time::sleep(CONTENDED_PAUSE).await;
        let after = applied_revision(pool).await?;
        if after > current || is_unique_violation(&err) {
            log::warn!("Migration step raced with another run, re-reading revision: {err}");
            continue;
        }
        log::error!("Migration step {} failed: {err}", current + 1);
        return Err(err.into());
    };

    let applied = Migrator::get_applied_migrations(pool).await?;
    Ok(MigrationOutcome {
        revision,
        applied: applied
            .iter()
            .take(revision)
            .skip(before)
            .map(|m| m.name().to_string())
            .collect(),
    })
}

async fn applied_revision(pool: &DatabaseConnection) -> AppResult<usize> {
    Ok(Migrator::get_applied_migrations(pool).await?.len())
}

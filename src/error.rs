use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DbErr),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Seed data error: {0}")]
    SeedDataError(#[from] serde_json::Error),

    #[error("Collection {0} is missing")]
    MissingCollection(String),

    #[error("Index {name} on {collection} is missing")]
    MissingIndex { collection: String, name: String },

    #[error("Index {name} on {collection} conflicts with its declaration: {detail}")]
    IndexConflict {
        collection: String,
        name: String,
        detail: String,
    },

    #[error("Store is at schema revision {applied}, ahead of target revision {target}")]
    SchemaAhead { applied: usize, target: usize },

    #[error("Unknown schema revision {requested} (latest is {latest})")]
    UnknownRevision { requested: usize, latest: usize },
}

impl AppError {
    /// Duplicate-key rejection from the store.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            AppError::DatabaseError(err) => is_unique_violation(err),
            _ => false,
        }
    }
}

pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

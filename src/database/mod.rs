pub mod connection;

pub use connection::{MigrationOutcome, create_pool, latest_revision, run_migrations};

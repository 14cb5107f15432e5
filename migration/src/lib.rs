pub use sea_orm_migration::prelude::*;

mod m20250901_000001_create_core_collections;
mod m20250905_000002_add_countries;
mod m20250910_000003_add_orders_and_notifications;
mod m20250915_000004_add_black_websites;
mod m20250920_000005_add_support;

/// Schema revisions, oldest first. Revision N is the first N entries.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250901_000001_create_core_collections::Migration),
            Box::new(m20250905_000002_add_countries::Migration),
            Box::new(m20250910_000003_add_orders_and_notifications::Migration),
            Box::new(m20250915_000004_add_black_websites::Migration),
            Box::new(m20250920_000005_add_support::Migration),
        ]
    }
}

//! Migrator creating the `items` demo table on boot if absent.
pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_items;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20240101_000001_create_items::Migration)]
    }
}

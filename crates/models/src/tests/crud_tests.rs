use crate::{db, item};
use anyhow::Result;
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use serde_json::json;
use uuid::Uuid;

/// Setup test database with migrations. Tests are skipped when no database
/// is reachable (SKIP_DB_TESTS or missing DATABASE_URL).
async fn setup_test_db() -> Result<Option<DatabaseConnection>> {
    if std::env::var("SKIP_DB_TESTS").is_ok() || std::env::var("DATABASE_URL").is_err() {
        return Ok(None);
    }
    let mut cfg = configs::DatabaseConfig::default();
    cfg.normalize_from_env();
    cfg.validate()?;

    let db = db::connect(&cfg).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(Some(db))
}

#[tokio::test]
async fn test_item_crud() -> Result<()> {
    let Some(db) = setup_test_db().await? else { return Ok(()) };

    // Create
    let name = format!("test_item_{}", Uuid::new_v4());
    let created = item::create(&db, &name, json!({"tasty": true})).await?;
    assert_eq!(created.name, name);
    assert_eq!(created.value, json!({"tasty": true}));

    // Read
    let found = item::find(&db, created.id).await?;
    let found = found.expect("item should exist after create");
    assert_eq!(found.id, created.id);
    assert_eq!(found.created_at, created.created_at);

    // Update: name and value change, created_at does not
    let updated = item::update(&db, created.id, "renamed", json!({"tasty": false}))
        .await?
        .expect("item should exist for update");
    assert_eq!(updated.name, "renamed");
    assert_eq!(updated.value, json!({"tasty": false}));
    assert_eq!(updated.created_at, created.created_at);

    // Delete
    assert!(item::delete(&db, created.id).await?);

    // Idempotent delete: second attempt affects zero rows
    assert!(!item::delete(&db, created.id).await?);

    // Read after delete
    assert!(item::find(&db, created.id).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_update_missing_item_is_none() -> Result<()> {
    let Some(db) = setup_test_db().await? else { return Ok(()) };

    let missing = item::update(&db, Uuid::new_v4(), "whatever", json!({})).await?;
    assert!(missing.is_none());
    Ok(())
}

#[test]
fn test_name_validation() {
    assert!(item::validate_name("banana").is_ok());
    assert!(item::validate_name("   ").is_err());
    assert!(item::validate_name(&"x".repeat(256)).is_err());
}

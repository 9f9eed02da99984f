//! Startup/on-demand self-test.
//!
//! Runs one CRUD cycle against each backing store, strictly one store after
//! another. Each sequence sits inside its own failure boundary: an error is
//! captured into that store's slot of the report and the remaining
//! sequences still run.

use anyhow::{anyhow, bail};
use bytes::Bytes;
use chrono::Utc;
use common::metrics::{SELFTEST_FAILURES_TOTAL, SELFTEST_RUNS_TOTAL};
use common::types::{SelfTestReport, StoreCheck};
use sea_orm::DatabaseConnection;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::cache::CacheClient;
use crate::object::ObjectClient;

pub async fn run(
    db: &DatabaseConnection,
    cache: &CacheClient,
    objects: Option<&ObjectClient>,
) -> SelfTestReport {
    SELFTEST_RUNS_TOTAL.inc();
    let s3 = capture("s3", object_sequence(objects).await);
    let db_check = capture("db", db_sequence(db).await);
    let redis = capture("redis", cache_sequence(cache).await);
    SelfTestReport { s3, db: db_check, redis }
}

/// Isolated error capture: one sequence's failure populates its slot and
/// nothing else.
fn capture(store: &'static str, outcome: anyhow::Result<String>) -> StoreCheck {
    match outcome {
        Ok(key) => {
            info!(store, key = %key, "self-test sequence passed");
            StoreCheck::passed(key)
        }
        Err(e) => {
            warn!(store, error = %e, "self-test sequence failed");
            SELFTEST_FAILURES_TOTAL.with_label_values(&[store]).inc();
            StoreCheck::failed(e.to_string())
        }
    }
}

/// put → get → byte-for-byte compare → delete, under a time-based key.
async fn object_sequence(objects: Option<&ObjectClient>) -> anyhow::Result<String> {
    let store = objects.ok_or_else(|| anyhow!("S3_BUCKET not configured"))?;
    let id = format!("selftest-{}", Utc::now().timestamp_millis());
    let body = Bytes::from(format!("conncheck selftest marker {}", Utc::now().to_rfc3339()));

    info!(store = "s3", step = "put", id = %id, "self-test");
    let key = store.put(&id, body.clone()).await?;

    info!(store = "s3", step = "get", id = %id, "self-test");
    let read = store.get(&id).await?;
    if read != body {
        bail!("content mismatch for {key}");
    }

    info!(store = "s3", step = "delete", id = %id, "self-test");
    store.delete(&id).await?;
    Ok(key)
}

/// create → read → update → delete against the items table.
async fn db_sequence(db: &DatabaseConnection) -> anyhow::Result<String> {
    let marker = Uuid::new_v4();
    let name = format!("selftest-{marker}");
    let payload = json!({"source": "selftest", "ts": Utc::now().to_rfc3339()});

    info!(store = "db", step = "create", name = %name, "self-test");
    let created = models::item::create(db, &name, payload).await?;

    info!(store = "db", step = "read", id = %created.id, "self-test");
    if models::item::find(db, created.id).await?.is_none() {
        bail!("read failed for item {}", created.id);
    }

    info!(store = "db", step = "update", id = %created.id, "self-test");
    let renamed = format!("selftest-updated-{marker}");
    let updated = models::item::update(
        db,
        created.id,
        &renamed,
        json!({"source": "selftest", "updated": true}),
    )
    .await?;
    if updated.is_none() {
        bail!("update failed for item {}", created.id);
    }

    info!(store = "db", step = "delete", id = %created.id, "self-test");
    if !models::item::delete(db, created.id).await? {
        bail!("delete failed for item {}", created.id);
    }
    Ok(created.id.to_string())
}

/// set → get → compare → delete, under a unique key.
async fn cache_sequence(cache: &CacheClient) -> anyhow::Result<String> {
    let key = format!("selftest:{}", Uuid::new_v4());
    let value = format!("conncheck {}", Utc::now().to_rfc3339());

    info!(store = "redis", step = "set", key = %key, "self-test");
    cache.set(&key, &value).await?;

    info!(store = "redis", step = "get", key = %key, "self-test");
    let read = cache.get(&key).await?;
    if read.as_deref() != Some(value.as_str()) {
        bail!("value mismatch for {key}");
    }

    info!(store = "redis", step = "delete", key = %key, "self-test");
    cache.delete(&key).await?;
    Ok(key)
}

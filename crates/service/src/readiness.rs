//! Readiness aggregation.
//!
//! Point-in-time probe of the three backing stores reduced to a single
//! ready/degraded verdict. Probes never propagate errors; any failure reads
//! as `false`. Intended to be polled externally, so no retries here.

use common::metrics::READINESS_DEGRADED_TOTAL;
use common::types::{Readiness, ServiceStates};
use sea_orm::DatabaseConnection;
use tracing::{info, warn};

use crate::cache::CacheClient;
use crate::object::ObjectClient;

pub async fn check(
    db: &DatabaseConnection,
    cache: &CacheClient,
    objects: Option<&ObjectClient>,
    version: &str,
    env: &str,
) -> Readiness {
    let db_ok = match db.ping().await {
        Ok(()) => true,
        Err(e) => {
            warn!(store = "db", error = %e, "database probe failed");
            false
        }
    };
    let redis_ok = cache.probe().await;
    // Unconfigured object storage is neither required nor checked.
    let s3_ok = match objects {
        Some(client) => Some(client.probe().await),
        None => None,
    };

    let status = verdict(db_ok, redis_ok, s3_ok);
    let ready = status == "ready";
    if ready {
        info!(db = db_ok, redis = redis_ok, s3 = ?s3_ok, "readiness check passed");
    } else {
        READINESS_DEGRADED_TOTAL.inc();
        warn!(db = db_ok, redis = redis_ok, s3 = ?s3_ok, "readiness check degraded");
    }

    Readiness {
        status: status.to_string(),
        version: version.to_string(),
        env: env.to_string(),
        services: ServiceStates { s3: s3_ok, db: db_ok, redis: redis_ok },
    }
}

/// The database is mandatory; the cache is required; object storage only
/// counts when configured (`Some`).
fn verdict(db: bool, redis: bool, s3: Option<bool>) -> &'static str {
    if db && redis && s3.unwrap_or(true) {
        "ready"
    } else {
        "degraded"
    }
}

#[cfg(test)]
mod tests {
    use super::verdict;

    #[test]
    fn db_failure_always_degrades() {
        assert_eq!(verdict(false, true, Some(true)), "degraded");
        assert_eq!(verdict(false, true, None), "degraded");
        assert_eq!(verdict(false, false, Some(false)), "degraded");
    }

    #[test]
    fn cache_failure_degrades() {
        assert_eq!(verdict(true, false, Some(true)), "degraded");
        assert_eq!(verdict(true, false, None), "degraded");
    }

    #[test]
    fn configured_object_store_failure_degrades() {
        assert_eq!(verdict(true, true, Some(false)), "degraded");
    }

    #[test]
    fn unconfigured_object_store_is_irrelevant() {
        assert_eq!(verdict(true, true, None), "ready");
    }

    #[test]
    fn all_healthy_is_ready() {
        assert_eq!(verdict(true, true, Some(true)), "ready");
    }
}

use std::net::SocketAddr;

use axum::Router;
use common::utils::logging::{init_logging_default, init_logging_json};
use dotenvy::dotenv;
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::auth::{AppState, GateConfig};
use crate::routes;
use service::{cache::CacheClient, object::ObjectClient, runtime};

fn init_logging(log_format: &str) {
    match log_format {
        "json" => init_logging_json(),
        _ => init_logging_default(),
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Public entry: connect the backing stores, build the app, run the HTTP
/// server. Only an unreachable database (after the bounded startup retries)
/// makes this return an error and terminate the process.
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    let cfg = configs::AppConfig::load_and_validate()?;
    init_logging(&cfg.server.log_format);

    runtime::ensure_env("frontend").await?;

    if let Some(endpoint) = &cfg.telemetry.endpoint {
        // Exporter wiring lives outside this service; the agent reads the
        // same variables, so just record what was configured.
        info!(
            endpoint = %endpoint,
            service_name = cfg.telemetry.service_name.as_deref().unwrap_or("conncheck"),
            "telemetry exporter configured"
        );
    }

    // DB is mandatory: bounded retry wait, then migrations.
    let db = models::db::connect_with_retry(&cfg.database).await?;
    migration::Migrator::up(&db, None).await?;

    // Cache connects lazily on first use; a down cache only degrades.
    let cache = CacheClient::new(&cfg.cache)?;

    // Object storage is optional end-to-end.
    let objects = match ObjectClient::from_config(&cfg.object_store) {
        Ok(Some(client)) => Some(client),
        Ok(None) => {
            warn!("S3_BUCKET not configured; object storage endpoints disabled");
            None
        }
        Err(e) => {
            warn!(error = %e, "object storage client unavailable; endpoints disabled");
            None
        }
    };

    let state = AppState {
        db,
        cache,
        objects,
        auth: GateConfig { secret: cfg.auth.secret.clone() },
        env: cfg.env.clone(),
    };

    if cfg.selftest.run_on_boot {
        let report = service::selftest::run(&state.db, &state.cache, state.objects.as_ref()).await;
        info!(
            s3 = report.s3.ok,
            db = report.db.ok,
            redis = report.redis.ok,
            report = %serde_json::to_string(&report).unwrap_or_default(),
            "boot self-test finished"
        );
    }

    // Build router
    let app: Router = routes::build_router(state, build_cors());

    // Bind and serve
    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    info!(%addr, env = %cfg.env, "starting server crate");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

use axum::{
    middleware,
    routing::get,
    Router,
};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::auth::{self, AppState};

pub mod cache;
pub mod items;
pub mod objects;
pub mod probes;
pub mod selftest;

/// Build the full application router: public probes and static assets, and
/// the credential-gated store API.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let static_dir = ServeDir::new("frontend").fallback(ServeFile::new("frontend/index.html"));

    // Public routes (probes + metrics); static assets are the fallback so
    // API routes always win
    let public = Router::new()
        .route("/healthz", get(probes::healthz))
        .route("/readyz", get(probes::readyz))
        .route("/metrics", get(probes::metrics))
        .fallback_service(static_dir);

    // Protected store API
    let api = Router::new()
        .route("/selftest", get(selftest::run_selftest))
        .route(
            "/s3/:id",
            get(objects::get_object)
                .post(objects::put_object)
                .delete(objects::delete_object),
        )
        .route("/db/items", get(items::list_items).post(items::create_item))
        .route(
            "/db/items/:id",
            get(items::get_item)
                .put(items::update_item)
                .delete(items::delete_item),
        )
        .route(
            "/cache/:key",
            get(cache::get_value)
                .post(cache::set_value)
                .delete(cache::delete_value),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_shared_secret,
        ));

    // Compose
    public
        .merge(api)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // 每次请求创建 span，包含方法和路径等，日志级别为 INFO
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                // 响应返回时打点，包含状态码与耗时
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 失败（5xx 等）时以 ERROR 记录
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}

use axum::{
    Router,
    routing::{get, post},
};
use tower::ServiceBuilder;

use crate::{
    AppState,
    middleware::log_errors,
    routes::{lookup, page, system},
};

// 页面路由：表单提交与 CSV 下载
fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(page::index))
        .route("/lookup", post(page::submit_batch))
        .route("/search", post(page::submit_search))
        .route("/export/{batch_id}", get(page::download_export))
}

// JSON 接口
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/lookup", post(lookup::lookup_batch))
        .route("/users/{user_id}", get(lookup::get_user))
        .route("/progress", get(lookup::get_progress))
        .route("/ping", get(system::ping))
}

pub fn create_router(state: AppState) -> Router {
    // 页面和接口都有 /lookup，接口始终挂在非空前缀下
    let router = page_routes().nest(state.config.api_base(), api_routes());

    let router = router.layer(ServiceBuilder::new().layer(axum::middleware::from_fn(log_errors)));

    // 开发模式下允许所有来源
    #[cfg(debug_assertions)]
    let router = router.layer(tower_http::cors::CorsLayer::permissive());

    router.with_state(state)
}

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;

use crate::{AppState, utils::success_to_api_response};

/// Ping响应
#[derive(Serialize)]
pub struct PingResponse {
    /// 服务状态
    pub status: String,
    /// 是否已配置 Discord 令牌
    pub configured: bool,
    /// 服务器时间
    pub timestamp: i64,
}

/// 健康检查接口
pub async fn ping(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        success_to_api_response(PingResponse {
            status: "ok".to_string(),
            configured: state.resolver.is_some(),
            timestamp: chrono::Utc::now().timestamp(),
        }),
    )
}

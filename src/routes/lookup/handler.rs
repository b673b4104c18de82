use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use super::model::{BatchLookupRequest, BatchLookupResponse};
use crate::{
    AppState,
    error::AppError,
    lookup::{ResultRecord, SingleLookup, UserProfile, parse_ids, parse_single_id},
    utils::success_to_api_response,
};

/// 批量流程：先检查令牌，再校验输入，最后顺序查询
pub async fn run_batch(
    state: &AppState,
    raw: &str,
) -> Result<(Uuid, Vec<ResultRecord>), AppError> {
    let resolver = state.resolver()?;

    if raw.trim().is_empty() {
        return Err(AppError::EmptyInput);
    }
    let ids = parse_ids(raw);
    if ids.is_empty() {
        return Err(AppError::NoValidIds);
    }

    let records = state.batches.run(resolver, &ids).await;
    let batch_id = state.exports.insert(records.clone()).await;
    tracing::info!("Batch {} finished with {} records", batch_id, records.len());
    Ok((batch_id, records))
}

pub async fn run_single(state: &AppState, raw: &str) -> Result<UserProfile, AppError> {
    let resolver = state.resolver()?;
    let user_id = parse_single_id(raw)?.to_string();

    match resolver.lookup(&user_id).await {
        SingleLookup::Found(profile) => Ok(profile),
        SingleLookup::NotFound => Err(AppError::NotFound(user_id)),
        SingleLookup::Unauthorized => Err(AppError::AuthenticationFailure),
        SingleLookup::Failed(message) => Err(AppError::LookupFailed(message)),
    }
}

#[axum::debug_handler]
pub async fn lookup_batch(
    State(state): State<AppState>,
    Json(req): Json<BatchLookupRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (batch_id, records) = run_batch(&state, &req.ids).await?;
    Ok((
        StatusCode::OK,
        success_to_api_response(BatchLookupResponse {
            batch_id,
            total: records.len(),
            records,
        }),
    ))
}

#[axum::debug_handler]
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let profile = run_single(&state, &user_id).await?;
    Ok((StatusCode::OK, success_to_api_response(profile)))
}

pub async fn get_progress(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        success_to_api_response(state.batches.progress()),
    )
}

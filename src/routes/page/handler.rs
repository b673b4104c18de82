use axum::{
    Form,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use chrono::Local;
use uuid::Uuid;

use super::model::{BatchForm, SearchForm};
use crate::{
    AppState,
    error::AppError,
    presenter::{Notice, PageView, export_file_name, render, to_csv},
    routes::lookup::{run_batch, run_single},
};

fn base_view(state: &AppState) -> PageView<'_> {
    let mut view = PageView {
        configured: state.resolver.is_some(),
        api_base: state.config.api_base(),
        ..PageView::default()
    };
    if !view.configured {
        view.notices
            .push(Notice::Error(AppError::ConfigurationMissing.to_string()));
    }
    view
}

pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render(&base_view(&state)))
}

pub async fn submit_batch(
    State(state): State<AppState>,
    Form(form): Form<BatchForm>,
) -> Html<String> {
    let mut view = base_view(&state);
    if !view.configured {
        return Html(render(&view));
    }
    view.raw_input = &form.ids;

    let outcome = run_batch(&state, &form.ids).await;
    match &outcome {
        Ok((batch_id, records)) => {
            view.notices.push(Notice::Success(format!(
                "已完成 {} 个 ID 的查询",
                records.len()
            )));
            view.results = Some((*batch_id, records.as_slice()));
        }
        Err(e @ AppError::EmptyInput) => view.notices.push(Notice::Warning(e.to_string())),
        Err(e) => view.notices.push(Notice::Error(e.to_string())),
    }

    Html(render(&view))
}

pub async fn submit_search(
    State(state): State<AppState>,
    Form(form): Form<SearchForm>,
) -> Html<String> {
    let mut view = base_view(&state);
    if !view.configured {
        return Html(render(&view));
    }
    view.single_input = &form.user_id;

    let outcome = run_single(&state, &form.user_id).await;
    match &outcome {
        Ok(profile) => {
            view.notices.push(Notice::Success("已找到用户".to_string()));
            view.profile = Some(profile);
        }
        Err(e @ AppError::NotFound(_)) => view.notices.push(Notice::Warning(e.to_string())),
        Err(e) => view.notices.push(Notice::Error(e.to_string())),
    }

    Html(render(&view))
}

pub async fn download_export(
    State(state): State<AppState>,
    Path(batch_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let records = state
        .exports
        .get(&batch_id)
        .await
        .ok_or(AppError::ExportNotFound)?;
    let body = to_csv(&records).map_err(|e| AppError::Internal(e.to_string()))?;
    let file_name = export_file_name(&Local::now());

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        body,
    )
        .into_response())
}

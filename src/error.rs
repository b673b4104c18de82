use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::utils::{error_codes, error_to_api_response};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("未找到 Discord 令牌，请在 secrets 文件的 [discord] 段配置 token")]
    ConfigurationMissing,

    #[error("列表为空")]
    EmptyInput,

    #[error("没有找到有效的 ID")]
    NoValidIds,

    #[error("请只输入数字")]
    InvalidId,

    #[error("ID 过大或无效")]
    IdOutOfRange,

    #[error("找不到 ID 为 {0} 的用户")]
    NotFound(String),

    #[error("认证失败：secrets 文件中的令牌无效")]
    AuthenticationFailure,

    #[error("查询出错：{0}")]
    LookupFailed(String),

    #[error("导出不存在或已过期")]
    ExportNotFound,

    #[error("内部服务器错误")]
    Internal(String),
}

impl AppError {
    pub fn code(&self) -> i32 {
        match self {
            AppError::ConfigurationMissing => error_codes::CONFIG_MISSING,
            AppError::EmptyInput
            | AppError::NoValidIds
            | AppError::InvalidId
            | AppError::IdOutOfRange => error_codes::VALIDATION_ERROR,
            AppError::NotFound(_) | AppError::ExportNotFound => error_codes::NOT_FOUND,
            AppError::AuthenticationFailure => error_codes::AUTH_FAILED,
            AppError::LookupFailed(_) => error_codes::LOOKUP_FAILED,
            AppError::Internal(_) => error_codes::INTERNAL_ERROR,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ExportNotFound => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::OK,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Internal(detail) = &self {
            tracing::error!("Internal error: {}", detail);
        }
        (
            self.status(),
            error_to_api_response::<()>(self.code(), self.to_string()),
        )
            .into_response()
    }
}

//! Discord REST API 的最小客户端
//!
//! 每次查询都会建立独立的会话（`connect` 时校验令牌），用完即释放。
//! 429 限流由会话内部处理，调用方只看到最终结果。

use async_trait::async_trait;
use thiserror::Error;

use crate::config::Credential;

mod client;
mod models;
pub mod snowflake;

pub use client::{DiscordClient, DiscordSession};
pub use models::{CDN_BASE, DEFAULT_AVATAR_URL, DiscordUser};

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("user not found")]
    NotFound,

    #[error("invalid bot token")]
    Unauthorized,

    #[error("rate limited after {0} attempts")]
    RateLimited(u32),

    #[error("Discord API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("invalid user id: {0}")]
    InvalidId(String),
}

/// 身份查询服务，按令牌建立会话
#[async_trait]
pub trait IdentityService: Send + Sync {
    async fn connect(&self, token: &Credential)
    -> Result<Box<dyn IdentitySession>, LookupError>;
}

/// 已认证的会话，drop 时释放连接
#[async_trait]
pub trait IdentitySession: Send + Sync {
    async fn fetch_user(&self, user_id: u64) -> Result<DiscordUser, LookupError>;
}

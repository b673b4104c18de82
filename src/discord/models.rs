use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::snowflake;

pub const CDN_BASE: &str = "https://cdn.discordapp.com";
pub const DEFAULT_AVATAR_URL: &str = "https://cdn.discordapp.com/embed/avatars/0.png";

/// `GET /users/{id}` 返回的用户对象（只取用到的字段）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscordUser {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub global_name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

impl DiscordUser {
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.id.parse().ok().and_then(snowflake::created_at)
    }

    /// 自定义头像地址，动图哈希以 `a_` 开头
    pub fn avatar_url(&self) -> Option<String> {
        let hash = self.avatar.as_deref()?;
        let ext = if hash.starts_with("a_") { "gif" } else { "png" };
        Some(format!(
            "{}/avatars/{}/{}.{}?size=1024",
            CDN_BASE, self.id, hash, ext
        ))
    }
}

use serde::{Deserialize, Serialize};

use crate::discord::{DEFAULT_AVATAR_URL, DiscordUser, snowflake};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupStatus {
    Success,
    NotFound,
    Error,
}

impl LookupStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LookupStatus::Success => "success",
            LookupStatus::NotFound => "not_found",
            LookupStatus::Error => "error",
        }
    }
}

/// 每个输入 ID 对应一行结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub id: String,
    pub username: String,
    pub global_name: Option<String>,
    pub created_at_fmt: Option<String>,
    pub avatar_url: Option<String>,
    pub status: LookupStatus,
}

impl ResultRecord {
    pub fn success(id: &str, user: &DiscordUser) -> Self {
        let created_at_fmt = id
            .parse()
            .ok()
            .and_then(snowflake::created_at)
            .map(|ts| ts.format("%d/%m/%Y").to_string());

        Self {
            id: id.to_string(),
            username: user.username.clone(),
            global_name: Some(user.global_name.clone().unwrap_or_else(|| "-".to_string())),
            created_at_fmt,
            avatar_url: Some(
                user.avatar_url()
                    .unwrap_or_else(|| DEFAULT_AVATAR_URL.to_string()),
            ),
            status: LookupStatus::Success,
        }
    }

    pub fn not_found(id: &str) -> Self {
        Self::failed(id, "N/A", LookupStatus::NotFound)
    }

    pub fn error(id: &str) -> Self {
        Self::failed(id, "Error", LookupStatus::Error)
    }

    fn failed(id: &str, username: &str, status: LookupStatus) -> Self {
        Self {
            id: id.to_string(),
            username: username.to_string(),
            global_name: None,
            created_at_fmt: None,
            avatar_url: None,
            status,
        }
    }
}

/// 单个查询的详情视图
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Username")]
    pub username: String,
    #[serde(rename = "Global Name")]
    pub global_name: String,
    #[serde(rename = "Creation Date")]
    pub created_at: String,
    #[serde(rename = "Avatar URL")]
    pub avatar_url: String,
    #[serde(skip)]
    pub has_avatar: bool,
}

impl UserProfile {
    pub fn from_user(user: &DiscordUser) -> Self {
        let avatar = user.avatar_url();
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            global_name: user.global_name.clone().unwrap_or_else(|| "N/A".to_string()),
            created_at: user
                .created_at()
                .map(|ts| ts.format("%d/%m/%Y %H:%M:%S UTC").to_string())
                .unwrap_or_else(|| "-".to_string()),
            has_avatar: avatar.is_some(),
            avatar_url: avatar.unwrap_or_else(|| "No avatar".to_string()),
        }
    }
}

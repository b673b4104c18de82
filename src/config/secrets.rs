use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

/// 机器人令牌，Debug 输出时隐藏内容
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Credential(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

#[derive(Debug, Default, Deserialize)]
struct SecretsFile {
    #[serde(default)]
    discord: Option<DiscordSection>,
}

#[derive(Debug, Default, Deserialize)]
struct DiscordSection {
    #[serde(default)]
    token: Option<String>,
}

/// 从 secrets 文件的 `[discord] token` 读取令牌
pub fn load_credential(path: &Path) -> Option<Credential> {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) => {
            tracing::warn!("Secrets file {} not readable: {}", path.display(), e);
            return None;
        }
    };

    parse_credential(&data).or_else(|| {
        tracing::warn!("No discord.token found in {}", path.display());
        None
    })
}

fn parse_credential(data: &str) -> Option<Credential> {
    let secrets: SecretsFile = match toml::from_str(data) {
        Ok(secrets) => secrets,
        Err(e) => {
            tracing::warn!("Failed to parse secrets file: {}", e);
            return None;
        }
    };

    secrets
        .discord
        .and_then(|section| section.token)
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
        .map(Credential)
}

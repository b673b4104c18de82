use std::env;
use std::path::PathBuf;
use std::time::Duration;

mod secrets;

pub use secrets::{Credential, load_credential};

pub const DEFAULT_DISCORD_API_BASE: &str = "https://discord.com/api/v10";
pub const DEFAULT_API_BASE: &str = "/api";
pub const DEFAULT_SECRETS_PATH: &str = ".secrets/secrets.toml";

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub api_base_uri: String,
    pub discord_api_base: String,
    pub lookup_delay_ms: u64,
    pub max_stored_exports: usize,
    pub secrets_path: PathBuf,
    /// 缺失时整个查询流程被禁用
    pub discord_token: Option<Credential>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server_host: "0.0.0.0".to_string(),
            server_port: 3000,
            api_base_uri: DEFAULT_API_BASE.to_string(),
            discord_api_base: DEFAULT_DISCORD_API_BASE.to_string(),
            lookup_delay_ms: 200,
            max_stored_exports: 16,
            secrets_path: PathBuf::from(DEFAULT_SECRETS_PATH),
            discord_token: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        let defaults = Config::default();
        let secrets_path = env::var("SECRETS_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.secrets_path);
        let discord_token = load_credential(&secrets_path);

        Config {
            server_host: env::var("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            api_base_uri: match env::var("API_BASE_URI") {
                Ok(base) if base.trim_end_matches('/').is_empty() => {
                    tracing::warn!("Empty API_BASE_URI, using {}", DEFAULT_API_BASE);
                    defaults.api_base_uri
                }
                Ok(base) => base,
                Err(_) => defaults.api_base_uri,
            },
            discord_api_base: env::var("DISCORD_API_BASE")
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or(defaults.discord_api_base),
            lookup_delay_ms: parse_var("LOOKUP_DELAY_MS").unwrap_or(defaults.lookup_delay_ms),
            max_stored_exports: parse_var("MAX_STORED_EXPORTS")
                .unwrap_or(defaults.max_stored_exports),
            secrets_path,
            discord_token,
        }
    }

    /// 去掉结尾斜杠的接口前缀，为空时回退到默认值
    pub fn api_base(&self) -> &str {
        let base = self.api_base_uri.trim_end_matches('/');
        if base.is_empty() {
            DEFAULT_API_BASE
        } else {
            base
        }
    }

    pub fn lookup_delay(&self) -> Duration {
        Duration::from_millis(self.lookup_delay_ms)
    }
}

// 变量存在但无法解析时记录警告并回退到默认值
fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Invalid value for {}: {:?}, using default", key, raw);
            None
        }
    }
}

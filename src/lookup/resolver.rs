use std::sync::Arc;
use std::time::Duration;

use super::record::{ResultRecord, UserProfile};
use crate::config::Credential;
use crate::discord::{DiscordUser, IdentityService, LookupError};

/// 单个查询的分类结果
#[derive(Debug)]
pub enum SingleLookup {
    Found(UserProfile),
    NotFound,
    Unauthorized,
    Failed(String),
}

pub struct UserResolver {
    service: Arc<dyn IdentityService>,
    token: Credential,
    delay: Duration,
}

impl UserResolver {
    pub fn new(service: Arc<dyn IdentityService>, token: Credential, delay: Duration) -> Self {
        Self {
            service,
            token,
            delay,
        }
    }

    /// 批量流程使用：任何失败都转成记录，不向上传播
    pub async fn resolve(&self, id: &str) -> ResultRecord {
        match self.fetch_throttled(id).await {
            Ok(user) => {
                tracing::debug!("Resolved {} as {}", id, user.username);
                ResultRecord::success(id, &user)
            }
            Err(LookupError::NotFound) => {
                tracing::debug!("User {} not found", id);
                ResultRecord::not_found(id)
            }
            Err(e) => {
                tracing::warn!("Lookup for {} failed: {}", id, e);
                ResultRecord::error(id)
            }
        }
    }

    pub async fn lookup(&self, id: &str) -> SingleLookup {
        match self.fetch_throttled(id).await {
            Ok(user) => SingleLookup::Found(UserProfile::from_user(&user)),
            Err(LookupError::NotFound) => SingleLookup::NotFound,
            Err(LookupError::Unauthorized) => SingleLookup::Unauthorized,
            Err(e) => {
                tracing::warn!("Lookup for {} failed: {}", id, e);
                SingleLookup::Failed(e.to_string())
            }
        }
    }

    // 会话在等待结束后才释放，无论成功与否都等待固定时间
    async fn fetch_throttled(&self, id: &str) -> Result<DiscordUser, LookupError> {
        let (session, outcome) = match id.parse::<u64>() {
            Err(_) => (None, Err(LookupError::InvalidId(id.to_string()))),
            Ok(user_id) => match self.service.connect(&self.token).await {
                Ok(session) => {
                    let outcome = session.fetch_user(user_id).await;
                    (Some(session), outcome)
                }
                Err(e) => (None, Err(e)),
            },
        };

        tokio::time::sleep(self.delay).await;
        drop(session);
        outcome
    }
}

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use super::UserResolver;
use crate::config::Credential;
use crate::discord::{DiscordUser, IdentityService, IdentitySession, LookupError};

type Responder = dyn Fn(u64) -> Result<DiscordUser, LookupError> + Send + Sync;

/// 可编排结果的身份服务，记录建立会话的次数
pub(crate) struct FakeService {
    respond: Arc<Responder>,
    reject_token: bool,
    connects: AtomicUsize,
    latency: Duration,
    in_flight: Arc<InFlight>,
}

#[derive(Default)]
struct InFlight {
    current: AtomicUsize,
    max: AtomicUsize,
}

impl FakeService {
    pub fn new(
        respond: impl Fn(u64) -> Result<DiscordUser, LookupError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            respond: Arc::new(respond),
            reject_token: false,
            connects: AtomicUsize::new(0),
            latency: Duration::ZERO,
            in_flight: Arc::new(InFlight::default()),
        }
    }

    /// 每次 fetch_user 都等待一段时间，便于观察调用是否重叠
    pub fn with_latency(self, latency: Duration) -> Self {
        Self { latency, ..self }
    }

    pub fn max_in_flight(&self) -> usize {
        self.in_flight.max.load(Ordering::SeqCst)
    }

    pub fn found() -> Self {
        Self::new(|id| Ok(user(id)))
    }

    pub fn not_found() -> Self {
        Self::new(|_| Err(LookupError::NotFound))
    }

    pub fn rejecting_token() -> Self {
        Self {
            reject_token: true,
            ..Self::found()
        }
    }

    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

struct FakeSession {
    respond: Arc<Responder>,
    latency: Duration,
    in_flight: Arc<InFlight>,
}

#[async_trait]
impl IdentityService for FakeService {
    async fn connect(
        &self,
        _token: &Credential,
    ) -> Result<Box<dyn IdentitySession>, LookupError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        if self.reject_token {
            return Err(LookupError::Unauthorized);
        }
        Ok(Box::new(FakeSession {
            respond: self.respond.clone(),
            latency: self.latency,
            in_flight: self.in_flight.clone(),
        }))
    }
}

#[async_trait]
impl IdentitySession for FakeSession {
    async fn fetch_user(&self, user_id: u64) -> Result<DiscordUser, LookupError> {
        let current = self.in_flight.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.in_flight.max.fetch_max(current, Ordering::SeqCst);
        tokio::time::sleep(self.latency).await;
        self.in_flight.current.fetch_sub(1, Ordering::SeqCst);
        (self.respond)(user_id)
    }
}

pub(crate) fn user(id: u64) -> DiscordUser {
    DiscordUser {
        id: id.to_string(),
        username: format!("user{}", id),
        global_name: None,
        avatar: None,
    }
}

pub(crate) fn resolver(service: Arc<FakeService>) -> UserResolver {
    UserResolver::new(service, Credential::new("test-token"), Duration::ZERO)
}

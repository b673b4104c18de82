use std::sync::Arc;

use config::Config;
use discord::IdentityService;
use error::AppError;
use lookup::{BatchDriver, UserResolver};
use presenter::ExportStore;

pub mod config;
pub mod discord;
pub mod error;
pub mod lookup;
pub mod middleware;
pub mod presenter;
pub mod router;
pub mod routes;
pub mod utils;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// 没有令牌时为 None
    pub resolver: Option<Arc<UserResolver>>,
    pub batches: Arc<BatchDriver>,
    pub exports: ExportStore,
}

impl AppState {
    pub fn new(config: Config, service: Arc<dyn IdentityService>) -> Self {
        let resolver = config.discord_token.clone().map(|token| {
            Arc::new(UserResolver::new(service, token, config.lookup_delay()))
        });

        Self {
            exports: ExportStore::new(config.max_stored_exports),
            batches: Arc::new(BatchDriver::new()),
            resolver,
            config,
        }
    }

    pub fn resolver(&self) -> Result<&UserResolver, AppError> {
        self.resolver
            .as_deref()
            .ok_or(AppError::ConfigurationMissing)
    }
}

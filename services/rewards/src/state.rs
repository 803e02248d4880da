use crate::config::Config;
use crate::domain::PrizeTable;
use redis::aio::ConnectionManager;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub redis: ConnectionManager,
    pub prizes: Arc<PrizeTable>,
}

impl AppState {
    pub fn new(config: Config, redis: ConnectionManager, prizes: PrizeTable) -> Self {
        Self {
            config: Arc::new(config),
            redis,
            prizes: Arc::new(prizes),
        }
    }
}

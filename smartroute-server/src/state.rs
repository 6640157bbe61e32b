use std::sync::Arc;

use smartroute_core::RoutingService;
use tokio::sync::RwLock;

use crate::config::ServerConfig;

/// Shared between handlers. Queries take the read lock; reload swaps the
/// graph under the write lock after building it outside.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<RwLock<RoutingService>>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(service: RoutingService, config: ServerConfig) -> Self {
        Self {
            service: Arc::new(RwLock::new(service)),
            config: Arc::new(config),
        }
    }
}

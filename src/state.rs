use std::sync::Arc;

use crate::client::TrackingClient;
use crate::config::ConfigProvider;

/// Handles shared by every worker; nothing in here is mutated per request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<dyn ConfigProvider>,
    pub client: Arc<dyn TrackingClient>,
}

impl AppState {
    pub fn new(config: Arc<dyn ConfigProvider>, client: Arc<dyn TrackingClient>) -> Self {
        Self { config, client }
    }
}

use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use visawatch_core::CoreResult;
use visawatch_shared::models::events::DashboardEvent;
use visawatch_store::app_config::Config;
use visawatch_store::seed::mock_passengers;

use crate::dashboard::Dashboard;

#[derive(Clone)]
pub struct AppState {
    /// Writers (handlers and the clock) hold the write lock for a whole mutation
    pub dashboard: Arc<RwLock<Dashboard>>,
    pub events_tx: broadcast::Sender<DashboardEvent>,
}

impl AppState {
    /// State seeded with the demo roster
    pub fn from_config(config: &Config) -> CoreResult<Self> {
        let (events_tx, _) = broadcast::channel(config.events.channel_capacity);
        let dashboard = Dashboard::new(
            mock_passengers(),
            config.business_rules.clone(),
            config.clock.rules()?,
            events_tx.clone(),
        );
        Ok(Self {
            dashboard: Arc::new(RwLock::new(dashboard)),
            events_tx,
        })
    }
}

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::dashboard::Dashboard;

/// Running simulated clock; stop it with [`ClockHandle::stop`]
pub struct ClockHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl ClockHandle {
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        let _ = self.task.await;
        info!("Simulated clock stopped");
    }
}

/// Age the roster by one step every `period`, first tick one period from now
pub fn start_clock(dashboard: Arc<RwLock<Dashboard>>, period: Duration) -> ClockHandle {
    let (shutdown, shutdown_rx) = watch::channel(false);
    let task = tokio::spawn(run_clock(dashboard, period, shutdown_rx));
    ClockHandle { shutdown, task }
}

async fn run_clock(dashboard: Arc<RwLock<Dashboard>>, period: Duration, mut shutdown: watch::Receiver<bool>) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!("Simulated clock started, ticking every {:?}", period);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let raised = dashboard.write().await.tick(Utc::now());
                if raised.is_empty() {
                    debug!("clock tick");
                } else {
                    info!("clock tick raised {} threshold alert(s)", raised.len());
                }
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }
}

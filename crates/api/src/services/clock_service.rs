use std::time::Duration;
use tokio::time::{interval, Interval, MissedTickBehavior};
use tracing::{error, info, warn};

use crate::gql::domains::games::service::clock_view;
use crate::gql::subscriptions::publish_clock_update;
use crate::AppState;
use infra::repos::GameClockRepo;

const DEFAULT_SWEEP_SECONDS: u64 = 1;

/// Background sweeper that stops game clocks whose period ran out.
pub struct ClockService {
    state: AppState,
    interval: Interval,
}

impl ClockService {
    pub fn new(state: AppState, every: Duration) -> Self {
        let mut interval = interval(every);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        Self { state, interval }
    }

    /// Sweep period from `CLOCK_SWEEP_INTERVAL_SECONDS`, one second by default.
    pub fn sweep_interval_from_env() -> Duration {
        let seconds = std::env::var("CLOCK_SWEEP_INTERVAL_SECONDS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|s| *s > 0)
            .unwrap_or(DEFAULT_SWEEP_SECONDS);
        Duration::from_secs(seconds)
    }

    pub async fn run(&mut self) {
        info!("Starting game clock service");

        loop {
            self.interval.tick().await;

            if let Err(e) = self.expire_clocks().await {
                error!("Error processing game clocks: {}", e);
            }
        }
    }

    /// Stop every running clock that reached 00:00 and publish it.
    pub async fn expire_clocks(&self) -> Result<usize, Box<dyn std::error::Error + Send + Sync>> {
        let repo = GameClockRepo::new(self.state.db.clone());
        let game_ids = repo.get_expired_clocks().await?;
        let mut expired = 0;

        for game_id in game_ids {
            match repo.expire_clock(game_id).await {
                Ok(Some(row)) => {
                    expired += 1;
                    info!(%game_id, period = %row.period_name, "Game clock expired");

                    match clock_view(&self.state.db, &row).await {
                        Ok(clock) => publish_clock_update(game_id, clock),
                        Err(e) => warn!(%game_id, "Failed to build expired clock update: {}", e),
                    }
                }
                // Paused or adjusted between the sweep and the update.
                Ok(None) => {}
                Err(e) => warn!(%game_id, "Failed to expire game clock: {}", e),
            }
        }

        Ok(expired)
    }
}

/// Spawn the clock service as a background task
pub fn spawn_clock_service(state: AppState) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut service = ClockService::new(state, ClockService::sweep_interval_from_env());
        service.run().await;
    })
}

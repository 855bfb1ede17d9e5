// Periodic trigger for like-count reconciliation
//
// The cadence lives here, not in the likes service: every tick performs the
// full idempotent recompute, and a failed pass is logged and left for the
// next tick rather than retried.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use crate::services::LikesService;

pub fn spawn(likes: LikesService, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // The first tick of an interval fires immediately; consume it so the
        // first pass runs a full period after startup.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            match likes.reconcile_all().await {
                Ok(()) => tracing::debug!("like count reconciliation pass complete"),
                Err(e) => tracing::error!("like count reconciliation failed: {}", e),
            }
        }
    })
}

//! services/engine/src/host.rs
//!
//! The long-running host loop. On every tick it offers the newest book to the
//! announcement throttle and logs the recommendation of the day. The engine
//! decides whether anything is actually sent.

use bookshare_core::{DispatchOutcome, EngagementEngine, EngineError};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// What a single tick did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub catalog_size: usize,
    pub announcement: Option<DispatchOutcome>,
    pub daily_titles: Vec<String>,
}

pub async fn tick(engine: &EngagementEngine) -> TickReport {
    let catalog_size = engine.catalog_size().await.unwrap_or_else(|e| {
        error!("Failed to count the catalog: {}", e);
        0
    });

    let announcement = match engine.announce_latest_book().await {
        Ok(outcome) => Some(outcome),
        Err(EngineError::NotFound(_)) => {
            warn!("Catalog is empty, nothing to announce.");
            None
        }
        Err(e) => {
            error!("Daily announcement failed: {}", e);
            None
        }
    };

    let daily_titles = match engine.recommendation_of_the_day().await {
        Ok(books) => books.into_iter().map(|b| b.title).collect(),
        Err(e) => {
            error!("Failed to compute the recommendation of the day: {}", e);
            Vec::new()
        }
    };
    info!(catalog_size, ?announcement, picks = ?daily_titles, "Tick complete.");

    TickReport {
        catalog_size,
        announcement,
        daily_titles,
    }
}

/// Ticks every `every` until `cancellation_token` is cancelled. The first tick
/// runs immediately.
pub async fn run(
    engine: Arc<EngagementEngine>,
    every: Duration,
    cancellation_token: CancellationToken,
) {
    let mut interval = tokio::time::interval(every);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancellation_token.cancelled() => {
                info!("Host loop cancelled.");
                return;
            }
            _ = interval.tick() => {
                tick(&engine).await;
            }
        }
    }
}

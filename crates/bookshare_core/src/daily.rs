//! crates/bookshare_core/src/daily.rs
//!
//! The process-wide "recommendation of the day".
//!
//! The sample is a contiguous block of the catalog (creation order) starting at
//! a uniformly drawn offset. It is drawn lazily by the first request that sees
//! a new calendar day, and every other request that day gets the same block.

use chrono::NaiveDate;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::domain::Book;
use crate::error::{EngineError, EngineResult};
use crate::ports::{BookStore, Clock, RandomSource};

#[derive(Debug, Default)]
enum DailyState {
    #[default]
    Empty,
    Fresh { day: NaiveDate, sample: Vec<Book> },
}

pub struct DailyRecommendationCache {
    store: Arc<dyn BookStore>,
    clock: Arc<dyn Clock>,
    random: Arc<dyn RandomSource>,
    // Held across the day check, the redraw and the store so concurrent first
    // requests of a day draw once and readers never see a half-written entry.
    state: Mutex<DailyState>,
}

impl DailyRecommendationCache {
    pub fn new(
        store: Arc<dyn BookStore>,
        clock: Arc<dyn Clock>,
        random: Arc<dyn RandomSource>,
    ) -> Self {
        Self {
            store,
            clock,
            random,
            state: Mutex::new(DailyState::Empty),
        }
    }

    /// Returns today's sample, at most `sample_size` books long.
    ///
    /// The block is drawn with the size of the first request of the day; later
    /// requests that day asking for fewer books get a prefix of it. A later
    /// request asking for more gets only the drawn block, which can be shorter
    /// than `min(sample_size, catalog size)`.
    pub async fn today(&self, sample_size: usize) -> EngineResult<Vec<Book>> {
        if sample_size == 0 {
            return Err(EngineError::InvalidInput(
                "sample size must be greater than zero".to_string(),
            ));
        }

        let today = self.clock.today();
        let mut state = self.state.lock().await;

        if let DailyState::Fresh { day, sample } = &*state {
            if *day == today {
                debug!(%today, "Daily recommendation cache hit.");
                return Ok(sample.iter().take(sample_size).cloned().collect());
            }
        }

        let catalog = self.store.list_all().await?;
        if catalog.is_empty() {
            // Nothing was drawn; the next request retries against the store.
            return Ok(Vec::new());
        }

        let sample = self.draw(catalog, sample_size);
        info!(%today, size = sample.len(), "Daily recommendation redrawn.");
        let result = sample.clone();
        *state = DailyState::Fresh { day: today, sample };
        Ok(result)
    }

    /// The day the cached sample belongs to, if any.
    pub async fn cached_day(&self) -> Option<NaiveDate> {
        match &*self.state.lock().await {
            DailyState::Fresh { day, .. } => Some(*day),
            DailyState::Empty => None,
        }
    }

    fn draw(&self, mut catalog: Vec<Book>, sample_size: usize) -> Vec<Book> {
        catalog.sort_by_key(|b| b.created_at);
        let max_offset = catalog.len().saturating_sub(sample_size);
        let offset = if max_offset == 0 {
            0
        } else {
            self.random.index_up_to(max_offset).min(max_offset)
        };
        catalog.into_iter().skip(offset).take(sample_size).collect()
    }
}

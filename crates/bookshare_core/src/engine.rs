//! crates/bookshare_core/src/engine.rs
//!
//! Wires the engine components over one set of ports. Created once at startup
//! and shared by every request handler.

use std::sync::Arc;

use crate::affinity::{AffinityProfile, AffinityProfiler};
use crate::announce::{DailyBookAnnouncer, UpdateBroadcaster};
use crate::config::EngineConfig;
use crate::daily::DailyRecommendationCache;
use crate::domain::{Book, BookId, UserId};
use crate::error::EngineResult;
use crate::gate::{DispatchOutcome, NotificationGate};
use crate::ports::{BookStore, Clock, NotificationSender, RandomSource, UserDirectory};
use crate::rating::{RatingAggregator, RatingSummary};
use crate::ranker::RecommendationRanker;

/// The ports the engine is built over.
#[derive(Clone)]
pub struct EnginePorts {
    pub books: Arc<dyn BookStore>,
    pub users: Arc<dyn UserDirectory>,
    pub clock: Arc<dyn Clock>,
    pub random: Arc<dyn RandomSource>,
    pub sender: Arc<dyn NotificationSender>,
}

pub struct EngagementEngine {
    config: EngineConfig,
    books: Arc<dyn BookStore>,
    ratings: RatingAggregator,
    profiler: Arc<AffinityProfiler>,
    ranker: RecommendationRanker,
    daily: DailyRecommendationCache,
    announcer: DailyBookAnnouncer,
    broadcaster: UpdateBroadcaster,
}

impl EngagementEngine {
    pub fn new(config: EngineConfig, ports: EnginePorts) -> Self {
        let profiler = Arc::new(AffinityProfiler::new(
            ports.books.clone(),
            config.affinity_view_signal,
        ));
        let gate = Arc::new(NotificationGate::new(
            ports.sender.clone(),
            ports.clock.clone(),
        ));

        Self {
            books: ports.books.clone(),
            ratings: RatingAggregator::new(ports.books.clone()),
            ranker: RecommendationRanker::new(
                ports.books.clone(),
                profiler.clone(),
                config.genre_match_bonus,
                config.views_divisor,
            ),
            daily: DailyRecommendationCache::new(
                ports.books.clone(),
                ports.clock.clone(),
                ports.random.clone(),
            ),
            announcer: DailyBookAnnouncer::new(
                ports.books.clone(),
                ports.users.clone(),
                gate,
                config.priority_authors.clone(),
            ),
            broadcaster: UpdateBroadcaster::new(ports.users, ports.sender),
            profiler,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub async fn catalog_size(&self) -> EngineResult<usize> {
        Ok(self.books.count_all().await?)
    }

    pub async fn submit_rating(
        &self,
        book_id: BookId,
        user_id: UserId,
        value: i64,
    ) -> EngineResult<RatingSummary> {
        self.ratings.submit_rating(book_id, user_id, value).await
    }

    pub async fn record_view(&self, book_id: BookId) -> EngineResult<u64> {
        self.ratings.record_view(book_id).await
    }

    pub async fn profile(&self, user_id: UserId) -> EngineResult<AffinityProfile> {
        self.profiler.profile(user_id).await
    }

    pub async fn recommend(&self, user_id: UserId, limit: usize) -> EngineResult<Vec<Book>> {
        self.ranker.recommend(user_id, limit).await
    }

    /// Today's shared sample, sized by `daily_sample_size`.
    pub async fn recommendation_of_the_day(&self) -> EngineResult<Vec<Book>> {
        self.daily.today(self.config.daily_sample_size).await
    }

    pub async fn announce_latest_book(&self) -> EngineResult<DispatchOutcome> {
        self.announcer.announce().await
    }

    pub async fn broadcast_update(&self, version: &str, features: &str) -> EngineResult<usize> {
        self.broadcaster.broadcast(version, features).await
    }
}

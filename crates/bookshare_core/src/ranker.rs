//! crates/bookshare_core/src/ranker.rs
//!
//! Personalized book ranking with a popularity fallback.
//!
//! Users with an affinity set get unrated books from their genres, scored by
//! `mean + views / views_divisor + genre_match_bonus`. Everyone else gets the
//! rated catalog ordered by mean rating, then views.

use std::sync::Arc;
use tracing::debug;

use crate::affinity::{AffinityProfile, AffinityProfiler};
use crate::domain::{Book, UserId};
use crate::error::{EngineError, EngineResult};
use crate::ports::BookStore;

pub struct RecommendationRanker {
    store: Arc<dyn BookStore>,
    profiler: Arc<AffinityProfiler>,
    genre_match_bonus: f64,
    views_divisor: f64,
}

impl RecommendationRanker {
    pub fn new(
        store: Arc<dyn BookStore>,
        profiler: Arc<AffinityProfiler>,
        genre_match_bonus: f64,
        views_divisor: f64,
    ) -> Self {
        Self {
            store,
            profiler,
            genre_match_bonus,
            views_divisor,
        }
    }

    /// Returns at most `limit` books for `user_id`, best first.
    pub async fn recommend(&self, user_id: UserId, limit: usize) -> EngineResult<Vec<Book>> {
        if limit == 0 {
            return Err(EngineError::InvalidInput(
                "limit must be greater than zero".to_string(),
            ));
        }

        let catalog = self.store.list_all().await?;
        let profile = self.profiler.profile_from(&catalog, user_id);

        let ranked = if profile.is_empty() {
            debug!(%user_id, "No affinity, using popularity fallback.");
            rank_by_popularity(catalog, limit)
        } else {
            debug!(%user_id, genres = profile.genres.len(), "Ranking by affinity.");
            self.rank_by_affinity(catalog, &profile, user_id, limit)
        };
        Ok(ranked)
    }

    fn rank_by_affinity(
        &self,
        catalog: Vec<Book>,
        profile: &AffinityProfile,
        user_id: UserId,
        limit: usize,
    ) -> Vec<Book> {
        let mut scored: Vec<(f64, Book)> = catalog
            .into_iter()
            .filter(|b| profile.contains(b.genre) && !b.is_rated_by(user_id))
            .map(|b| (self.score(&b), b))
            .collect();

        // `sort_by` is stable, so equal scores keep catalog order.
        scored.sort_by(|(a, _), (b, _)| b.total_cmp(a));
        scored.into_iter().take(limit).map(|(_, b)| b).collect()
    }

    fn score(&self, book: &Book) -> f64 {
        // The bonus is the same for every candidate; every candidate already
        // matches one of the user's genres.
        book.mean_rating().unwrap_or(0.0)
            + book.views as f64 / self.views_divisor
            + self.genre_match_bonus
    }
}

/// Rated books ordered by `(mean desc, views desc)`, catalog order on ties.
pub fn rank_by_popularity(catalog: Vec<Book>, limit: usize) -> Vec<Book> {
    let mut rated: Vec<(f64, Book)> = catalog
        .into_iter()
        .filter_map(|b| b.mean_rating().map(|mean| (mean, b)))
        .collect();

    rated.sort_by(|(mean_a, a), (mean_b, b)| {
        mean_b
            .total_cmp(mean_a)
            .then_with(|| b.views.cmp(&a.views))
    });
    rated.into_iter().take(limit).map(|(_, b)| b).collect()
}

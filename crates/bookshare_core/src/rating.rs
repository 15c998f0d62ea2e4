//! crates/bookshare_core/src/rating.rs
//!
//! Maintains per-book rating aggregates and view counters.
//!
//! Every read-modify-write of a book goes through a lock keyed by the book's id,
//! so concurrent votes on the same book never recompute from a stale snapshot.
//! Writes to different books do not contend. A book's lock entry lives only
//! while some call holds or waits on it.

use chrono::Utc;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info};

use crate::domain::{Book, BookId, Rating, UserId, MAX_RATING, MIN_RATING};
use crate::error::{EngineError, EngineResult};
use crate::ports::BookStore;

/// The aggregate of a book's ratings right after a vote was committed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingSummary {
    pub mean_rating: f64,
    pub rating_count: usize,
}

/// Exclusive access to one book. Dropping it releases the lock and forgets the
/// entry once nobody else is queued on it.
struct BookLock<'a> {
    locks: &'a DashMap<BookId, Arc<Mutex<()>>>,
    book_id: BookId,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for BookLock<'_> {
    fn drop(&mut self) {
        self.guard.take();
        self.locks
            .remove_if(&self.book_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}

pub struct RatingAggregator {
    store: Arc<dyn BookStore>,
    book_locks: DashMap<BookId, Arc<Mutex<()>>>,
}

impl RatingAggregator {
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        Self {
            store,
            book_locks: DashMap::new(),
        }
    }

    async fn lock_book(&self, book_id: BookId) -> BookLock<'_> {
        let lock = self
            .book_locks
            .entry(book_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        BookLock {
            locks: &self.book_locks,
            book_id,
            guard: Some(lock.lock_owned().await),
        }
    }

    /// Records `user_id`'s vote on `book_id`, replacing any earlier vote by them.
    ///
    /// The book is persisted before the new aggregate is returned. If the save
    /// fails nothing is committed and the caller may retry the whole call.
    pub async fn submit_rating(
        &self,
        book_id: BookId,
        user_id: UserId,
        value: i64,
    ) -> EngineResult<RatingSummary> {
        let value = validate_rating(value)?;

        let _lock = self.lock_book(book_id).await;

        let mut book = self.store.get(book_id).await?;
        let replaced = book.is_rated_by(user_id);
        book.apply_rating(Rating {
            user_id,
            value,
            rated_at: Utc::now(),
        });

        let summary = summarize(&book)?;
        self.store.save(book).await?;

        info!(
            %book_id,
            %user_id,
            value,
            replaced,
            mean = summary.mean_rating,
            count = summary.rating_count,
            "Rating committed."
        );
        Ok(summary)
    }

    /// Increments the view counter of `book_id` and returns the new count.
    pub async fn record_view(&self, book_id: BookId) -> EngineResult<u64> {
        let _lock = self.lock_book(book_id).await;

        let mut book = self.store.get(book_id).await?;
        book.views = book.views.saturating_add(1);
        let views = book.views;
        self.store.save(book).await?;

        debug!(%book_id, views, "View recorded.");
        Ok(views)
    }
}

#[cfg(test)]
impl RatingAggregator {
    fn tracked_locks(&self) -> usize {
        self.book_locks.len()
    }
}

fn validate_rating(value: i64) -> EngineResult<u8> {
    u8::try_from(value)
        .ok()
        .filter(|v| (MIN_RATING..=MAX_RATING).contains(v))
        .ok_or_else(|| {
            EngineError::InvalidInput(format!(
                "rating must be an integer between {} and {}, got {}",
                MIN_RATING, MAX_RATING, value
            ))
        })
}

fn summarize(book: &Book) -> EngineResult<RatingSummary> {
    let mean_rating = book.mean_rating().ok_or_else(|| {
        EngineError::Storage(format!("book {} has no ratings after a vote", book.id))
    })?;
    Ok(RatingSummary {
        mean_rating,
        rating_count: book.rating_count(),
    })
}

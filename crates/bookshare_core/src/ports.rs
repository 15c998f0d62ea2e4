//! crates/bookshare_core/src/ports.rs
//!
//! Defines the service contracts (traits) the engine consumes.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of the document store, the wall clock, the random number
//! generator and the push-delivery provider.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{Book, BookId, PushMessage};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Durable book storage with atomic single-document saves.
#[async_trait]
pub trait BookStore: Send + Sync {
    async fn get(&self, id: BookId) -> PortResult<Book>;

    /// Every book, in creation order.
    async fn list_all(&self) -> PortResult<Vec<Book>>;

    /// Replaces the stored document for `book.id` (or inserts it) in one step.
    async fn save(&self, book: Book) -> PortResult<()>;

    async fn count_all(&self) -> PortResult<usize>;
}

/// Read access to the user accounts that can receive push notifications.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Device tokens of every user that registered one.
    async fn push_tokens(&self) -> PortResult<Vec<String>>;
}

/// Source of the current calendar day.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Uniform integer draws, injectable so sampling can be reproduced in tests.
pub trait RandomSource: Send + Sync {
    /// Returns a value in `0..=upper`.
    fn index_up_to(&self, upper: usize) -> usize;
}

/// Abstract push-delivery call.
#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send_batch(&self, messages: &[PushMessage]) -> PortResult<()>;
}

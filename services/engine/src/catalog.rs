//! services/engine/src/catalog.rs
//!
//! Loads a JSON seed document into the in-memory stores at startup.
//!
//! ```json
//! {
//!   "users": [{ "id": "…", "push_token": "ExponentPushToken[…]" }],
//!   "books": [{
//!     "title": "Dune", "author": "Frank Herbert", "uploader": "…",
//!     "genre": "Science Fiction", "views": 12,
//!     "created_at": "2024-01-01T00:00:00Z",
//!     "ratings": [{ "user": "…", "value": 5 }]
//!   }]
//! }
//! ```

use bookshare_core::{Book, BookStore, Genre, Rating, UserId};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::Path;
use tracing::info;
use uuid::Uuid;

use crate::adapters::InMemoryUserDirectory;
use crate::error::ServiceError;

//=========================================================================================
// "Impure" Seed Record Structs
//=========================================================================================

#[derive(Deserialize, Default)]
pub struct SeedDocument {
    #[serde(default)]
    users: Vec<UserRecord>,
    #[serde(default)]
    books: Vec<BookRecord>,
}

#[derive(Deserialize)]
struct UserRecord {
    id: UserId,
    #[serde(default)]
    push_token: Option<String>,
}

#[derive(Deserialize)]
struct BookRecord {
    #[serde(default)]
    id: Option<Uuid>,
    title: String,
    author: String,
    uploader: UserId,
    #[serde(default)]
    genre: Option<String>,
    #[serde(default)]
    views: u64,
    created_at: DateTime<Utc>,
    #[serde(default)]
    ratings: Vec<RatingRecord>,
}

#[derive(Deserialize)]
struct RatingRecord {
    user: UserId,
    value: i64,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

impl BookRecord {
    fn to_domain(self) -> Result<Book, ServiceError> {
        let genre = match self.genre.as_deref() {
            Some(label) => label
                .parse::<Genre>()
                .map_err(|e| ServiceError::Internal(format!("book '{}': {}", self.title, e)))?,
            None => Genre::default(),
        };

        let ratings = self
            .ratings
            .into_iter()
            .map(|r| {
                let value = u8::try_from(r.value)
                    .ok()
                    .filter(|v| (1..=5).contains(v))
                    .ok_or_else(|| {
                        ServiceError::Internal(format!(
                            "book '{}': rating {} is outside 1..=5",
                            self.title, r.value
                        ))
                    })?;
                Ok(Rating {
                    user_id: r.user,
                    value,
                    rated_at: r.created_at.unwrap_or(self.created_at),
                })
            })
            .collect::<Result<Vec<_>, ServiceError>>()?;

        Ok(Book::restore(
            self.id.unwrap_or_else(Uuid::new_v4),
            self.title,
            self.author,
            self.uploader,
            genre,
            self.views,
            self.created_at,
            ratings,
        ))
    }
}

//=========================================================================================
// Loading
//=========================================================================================

/// How much of a seed document was loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub users: usize,
    pub books: usize,
}

pub fn parse_seed(raw: &str) -> Result<SeedDocument, ServiceError> {
    Ok(serde_json::from_str(raw)?)
}

/// Writes `seed` into the stores. Books are saved in creation order.
pub async fn apply_seed(
    seed: SeedDocument,
    books: &dyn BookStore,
    users: &InMemoryUserDirectory,
) -> Result<SeedSummary, ServiceError> {
    let user_count = seed.users.len();
    for user in seed.users {
        users.register(user.id, user.push_token).await;
    }

    let mut domain_books = seed
        .books
        .into_iter()
        .map(BookRecord::to_domain)
        .collect::<Result<Vec<_>, _>>()?;
    domain_books.sort_by_key(|b| b.created_at);

    let book_count = domain_books.len();
    for book in domain_books {
        books.save(book).await?;
    }

    Ok(SeedSummary {
        users: user_count,
        books: book_count,
    })
}

pub async fn load_seed(
    path: &Path,
    books: &dyn BookStore,
    users: &InMemoryUserDirectory,
) -> Result<SeedSummary, ServiceError> {
    let raw = tokio::fs::read_to_string(path).await?;
    let summary = apply_seed(parse_seed(&raw)?, books, users).await?;
    info!(
        path = %path.display(),
        users = summary.users,
        books = summary.books,
        "Catalog seed loaded."
    );
    Ok(summary)
}

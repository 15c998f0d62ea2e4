//! crates/bookshare_core/src/domain.rs
//!
//! Defines the pure, core data structures for the engagement engine.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

pub type BookId = Uuid;
pub type UserId = Uuid;

/// The lowest accepted rating value.
pub const MIN_RATING: u8 = 1;
/// The highest accepted rating value.
pub const MAX_RATING: u8 = 5;

//=========================================================================================
// Genre
//=========================================================================================

/// The closed set of genres a book can be filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Genre {
    Fiction,
    Fantasy,
    ScienceFiction,
    Mystery,
    Thriller,
    Romance,
    NonFiction,
    Biography,
    History,
    SelfHelp,
    Business,
    Children,
    YoungAdult,
    Poetry,
    #[default]
    Other,
}

impl Genre {
    pub const ALL: [Genre; 15] = [
        Genre::Fiction,
        Genre::Fantasy,
        Genre::ScienceFiction,
        Genre::Mystery,
        Genre::Thriller,
        Genre::Romance,
        Genre::NonFiction,
        Genre::Biography,
        Genre::History,
        Genre::SelfHelp,
        Genre::Business,
        Genre::Children,
        Genre::YoungAdult,
        Genre::Poetry,
        Genre::Other,
    ];

    /// The display label used at the boundary.
    pub fn label(&self) -> &'static str {
        match self {
            Genre::Fiction => "Fiction",
            Genre::Fantasy => "Fantasy",
            Genre::ScienceFiction => "Science Fiction",
            Genre::Mystery => "Mystery",
            Genre::Thriller => "Thriller",
            Genre::Romance => "Romance",
            Genre::NonFiction => "Non-fiction",
            Genre::Biography => "Biography",
            Genre::History => "History",
            Genre::SelfHelp => "Self-help",
            Genre::Business => "Business",
            Genre::Children => "Children",
            Genre::YoungAdult => "Young Adult",
            Genre::Poetry => "Poetry",
            Genre::Other => "Other",
        }
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown genre label: {0}")]
pub struct ParseGenreError(pub String);

impl FromStr for Genre {
    type Err = ParseGenreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Genre::ALL
            .iter()
            .copied()
            .find(|g| g.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseGenreError(s.to_string()))
    }
}

//=========================================================================================
// Book & Rating
//=========================================================================================

/// One user's vote on a book. Owned by its `Book`.
#[derive(Debug, Clone, PartialEq)]
pub struct Rating {
    pub user_id: UserId,
    pub value: u8,
    pub rated_at: DateTime<Utc>,
}

/// A book in the catalog.
///
/// `mean_rating` and `rating_count` are derived from `ratings` and can only be
/// changed through [`Book::apply_rating`], which recomputes both together.
#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub uploader: UserId,
    pub genre: Genre,
    pub views: u64,
    pub created_at: DateTime<Utc>,
    ratings: Vec<Rating>,
    mean_rating: Option<f64>,
    rating_count: usize,
}

impl Book {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        uploader: UserId,
        genre: Genre,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            author: author.into(),
            uploader,
            genre,
            views: 0,
            created_at,
            ratings: Vec::new(),
            mean_rating: None,
            rating_count: 0,
        }
    }

    /// Rebuilds a book from stored parts, deriving the aggregate from `ratings`.
    ///
    /// Duplicate votes by one user are collapsed, keeping the latest.
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: BookId,
        title: String,
        author: String,
        uploader: UserId,
        genre: Genre,
        views: u64,
        created_at: DateTime<Utc>,
        ratings: Vec<Rating>,
    ) -> Self {
        let mut book = Self {
            id,
            title,
            author,
            uploader,
            genre,
            views,
            created_at,
            ratings: Vec::with_capacity(ratings.len()),
            mean_rating: None,
            rating_count: 0,
        };
        for rating in ratings {
            book.upsert(rating);
        }
        book.recompute();
        book
    }

    pub fn ratings(&self) -> &[Rating] {
        &self.ratings
    }

    /// `None` when nobody has rated the book yet.
    pub fn mean_rating(&self) -> Option<f64> {
        self.mean_rating
    }

    pub fn rating_count(&self) -> usize {
        self.rating_count
    }

    pub fn rating_by(&self, user_id: UserId) -> Option<&Rating> {
        self.ratings.iter().find(|r| r.user_id == user_id)
    }

    pub fn is_rated_by(&self, user_id: UserId) -> bool {
        self.rating_by(user_id).is_some()
    }

    /// Records `rating`, replacing any earlier vote by the same user, and
    /// recomputes the aggregate.
    pub fn apply_rating(&mut self, rating: Rating) {
        self.upsert(rating);
        self.recompute();
    }

    fn upsert(&mut self, rating: Rating) {
        match self.ratings.iter_mut().find(|r| r.user_id == rating.user_id) {
            Some(existing) => {
                existing.value = rating.value;
                existing.rated_at = rating.rated_at;
            }
            None => self.ratings.push(rating),
        }
    }

    fn recompute(&mut self) {
        self.rating_count = self.ratings.len();
        self.mean_rating = if self.ratings.is_empty() {
            None
        } else {
            let sum: u64 = self.ratings.iter().map(|r| u64::from(r.value)).sum();
            Some(sum as f64 / self.rating_count as f64)
        };
    }
}

//=========================================================================================
// Push notifications
//=========================================================================================

/// What a push notification points the app at when tapped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushPayload {
    Book { book_id: BookId },
    Update { version: String },
}

/// A single outbound push notification addressed to one device token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushMessage {
    pub to: String,
    pub title: String,
    pub body: String,
    pub payload: PushPayload,
}

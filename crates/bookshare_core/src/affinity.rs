//! crates/bookshare_core/src/affinity.rs
//!
//! Derives the set of genres a user is inferred to prefer.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::domain::{Book, Genre, UserId};
use crate::error::EngineResult;
use crate::ports::BookStore;

/// Where an affinity set came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AffinitySource {
    /// Genres of books the user rated.
    Ratings,
    /// Genres of books with any views. Views are not attributed to users, so
    /// this is a catalog-wide signal.
    GlobalViews,
    /// No signal; callers should use the popularity fallback.
    None,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AffinityProfile {
    pub genres: BTreeSet<Genre>,
    pub source: AffinitySource,
}

impl AffinityProfile {
    fn empty() -> Self {
        Self {
            genres: BTreeSet::new(),
            source: AffinitySource::None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.genres.is_empty()
    }

    pub fn contains(&self, genre: Genre) -> bool {
        self.genres.contains(&genre)
    }
}

pub struct AffinityProfiler {
    store: Arc<dyn BookStore>,
    view_signal: bool,
}

impl AffinityProfiler {
    pub fn new(store: Arc<dyn BookStore>, view_signal: bool) -> Self {
        Self { store, view_signal }
    }

    pub async fn profile(&self, user_id: UserId) -> EngineResult<AffinityProfile> {
        let catalog = self.store.list_all().await?;
        Ok(self.profile_from(&catalog, user_id))
    }

    /// Computes the profile against an already loaded catalog.
    pub fn profile_from(&self, catalog: &[Book], user_id: UserId) -> AffinityProfile {
        let rated: BTreeSet<Genre> = catalog
            .iter()
            .filter(|b| b.is_rated_by(user_id))
            .map(|b| b.genre)
            .collect();
        if !rated.is_empty() {
            return AffinityProfile {
                genres: rated,
                source: AffinitySource::Ratings,
            };
        }

        if self.view_signal {
            let viewed: BTreeSet<Genre> = catalog
                .iter()
                .filter(|b| b.views > 0)
                .map(|b| b.genre)
                .collect();
            if !viewed.is_empty() {
                return AffinityProfile {
                    genres: viewed,
                    source: AffinitySource::GlobalViews,
                };
            }
        }

        AffinityProfile::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::support::{book, rated, MemoryStore};
    use uuid::Uuid;

    #[tokio::test]
    async fn test_profile_is_union_of_rated_genres() {
        let user = Uuid::new_v4();
        let store = Arc::new(MemoryStore::default());
        store.insert(rated(book("Dune", Genre::ScienceFiction), &[(user, 4)])).await;
        store.insert(rated(book("Gone Girl", Genre::Thriller), &[(user, 2)])).await;
        store.insert(rated(book("Emma", Genre::Romance), &[(Uuid::new_v4(), 5)])).await;

        let profile = AffinityProfiler::new(store, false)
            .profile(user)
            .await
            .unwrap();
        assert_eq!(profile.source, AffinitySource::Ratings);
        assert_eq!(
            profile.genres.into_iter().collect::<Vec<_>>(),
            vec![Genre::ScienceFiction, Genre::Thriller]
        );
    }

    #[tokio::test]
    async fn test_no_history_yields_empty_profile() {
        let store = Arc::new(MemoryStore::default());
        let mut viewed = book("Emma", Genre::Romance);
        viewed.views = 12;
        store.insert(viewed).await;

        let profile = AffinityProfiler::new(store, false)
            .profile(Uuid::new_v4())
            .await
            .unwrap();
        assert!(profile.is_empty());
        assert_eq!(profile.source, AffinitySource::None);
    }

    #[tokio::test]
    async fn test_view_signal_only_applies_without_ratings() {
        let user = Uuid::new_v4();
        let store = Arc::new(MemoryStore::default());
        let mut viewed = book("Emma", Genre::Romance);
        viewed.views = 12;
        store.insert(viewed).await;
        store.insert(book("Unread", Genre::Poetry)).await;
        let profiler = AffinityProfiler::new(store.clone(), true);

        let cold = profiler.profile(user).await.unwrap();
        assert_eq!(cold.source, AffinitySource::GlobalViews);
        assert!(cold.contains(Genre::Romance));
        assert!(!cold.contains(Genre::Poetry));

        store.insert(rated(book("Dune", Genre::ScienceFiction), &[(user, 3)])).await;
        let warm = profiler.profile(user).await.unwrap();
        assert_eq!(warm.source, AffinitySource::Ratings);
        assert!(!warm.contains(Genre::Romance));
    }
}

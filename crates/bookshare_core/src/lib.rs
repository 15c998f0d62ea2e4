//! Engagement & recommendation engine for the book-sharing service.
//!
//! Rating aggregation, genre affinity, personalized ranking, the shared
//! recommendation of the day, and the daily push announcement throttle. Storage,
//! time, randomness and push delivery are consumed through the traits in `ports`.

pub mod affinity;
pub mod announce;
pub mod config;
pub mod daily;
pub mod domain;
pub mod engine;
pub mod error;
pub mod gate;
pub mod ports;
pub mod ranker;
pub mod rating;

pub use affinity::{AffinityProfile, AffinityProfiler, AffinitySource};
pub use announce::{DailyBookAnnouncer, UpdateBroadcaster};
pub use config::EngineConfig;
pub use daily::DailyRecommendationCache;
pub use domain::{Book, BookId, Genre, PushMessage, PushPayload, Rating, UserId};
pub use engine::{EngagementEngine, EnginePorts};
pub use error::{EngineError, EngineResult};
pub use gate::{DispatchOutcome, NotificationGate};
pub use ports::{
    BookStore, Clock, NotificationSender, PortError, PortResult, RandomSource, UserDirectory,
};
pub use ranker::RecommendationRanker;
pub use rating::{RatingAggregator, RatingSummary};

#[cfg(test)]
mod tests;

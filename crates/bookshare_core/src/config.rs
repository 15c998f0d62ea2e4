//! crates/bookshare_core/src/config.rs
//!
//! Tunables for the engagement engine.

/// Engine configuration
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Constant added to every personalized candidate's score (default: 2.0)
    pub genre_match_bonus: f64,
    /// Views are divided by this before joining the score (default: 100.0)
    pub views_divisor: f64,
    /// Size of the recommendation of the day (default: 2)
    pub daily_sample_size: usize,
    /// Fall back to genres of viewed books when a user has rated nothing (default: false)
    pub affinity_view_signal: bool,
    /// Authors whose releases bypass the daily announcement throttle.
    /// Compared trimmed and case-insensitively.
    pub priority_authors: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            genre_match_bonus: 2.0,
            views_divisor: 100.0,
            daily_sample_size: 2,
            affinity_view_signal: false,
            priority_authors: Vec::new(),
        }
    }
}

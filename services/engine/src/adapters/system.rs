//! services/engine/src/adapters/system.rs
//!
//! Wall-clock and thread-RNG implementations of the `Clock` and `RandomSource` ports.

use bookshare_core::{Clock, RandomSource};
use chrono::{Local, NaiveDate};
use rand::Rng;

/// Reports the calendar day in the host's local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Draws from the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandomSource;

impl RandomSource for ThreadRandomSource {
    fn index_up_to(&self, upper: usize) -> usize {
        rand::thread_rng().gen_range(0..=upper)
    }
}

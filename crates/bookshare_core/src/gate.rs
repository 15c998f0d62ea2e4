//! crates/bookshare_core/src/gate.rs
//!
//! Throttles the daily announcement to one successful ordinary dispatch per
//! calendar day.
//!
//! Override triggers are sent every time and never touch the throttle state.
//! Ordinary triggers are sent only when nothing was sent yet today, and the day
//! is committed only after the sender confirms, so a failed send can be retried
//! the same day. The lock is released while the sender runs; an in-flight
//! marker keeps a second caller from sending in the meantime. The marker is
//! cleared when the attempt ends, including when the caller's future is dropped
//! mid-send.

use chrono::NaiveDate;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

use crate::domain::PushMessage;
use crate::ports::{Clock, NotificationSender};

/// What happened to a dispatch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Sent,
    /// Not due: already sent today, or another send for today is in flight.
    Skipped,
    /// The sender reported an error. The throttle state was not advanced.
    Failed,
}

impl DispatchOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, DispatchOutcome::Sent)
    }
}

#[derive(Debug, Default)]
struct GateState {
    last_sent_day: Option<NaiveDate>,
    in_flight_day: Option<NaiveDate>,
}

/// Holds today's in-flight marker for one ordinary attempt.
struct InFlight<'a> {
    state: &'a Mutex<GateState>,
    day: NaiveDate,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut state = lock_state(self.state);
        if state.in_flight_day == Some(self.day) {
            state.in_flight_day = None;
        }
    }
}

// Never held across an await, so a std mutex is enough and `Drop` can take it.
fn lock_state(state: &Mutex<GateState>) -> MutexGuard<'_, GateState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct NotificationGate {
    sender: Arc<dyn NotificationSender>,
    clock: Arc<dyn Clock>,
    state: Mutex<GateState>,
}

impl NotificationGate {
    pub fn new(sender: Arc<dyn NotificationSender>, clock: Arc<dyn Clock>) -> Self {
        Self {
            sender,
            clock,
            state: Mutex::new(GateState::default()),
        }
    }

    /// Returns `true` only when `messages` were handed to the sender successfully.
    pub async fn try_dispatch<T, F>(
        &self,
        trigger: &T,
        override_predicate: F,
        messages: &[PushMessage],
    ) -> bool
    where
        F: FnOnce(&T) -> bool,
    {
        self.try_dispatch_outcome(trigger, override_predicate, messages)
            .await
            .is_sent()
    }

    pub async fn try_dispatch_outcome<T, F>(
        &self,
        trigger: &T,
        override_predicate: F,
        messages: &[PushMessage],
    ) -> DispatchOutcome
    where
        F: FnOnce(&T) -> bool,
    {
        if override_predicate(trigger) {
            debug!("Override trigger, bypassing the daily throttle.");
            return self.send(messages).await;
        }

        let today = self.clock.today();
        let in_flight = {
            let mut state = lock_state(&self.state);
            if state.last_sent_day == Some(today) {
                debug!(%today, "Announcement already sent today.");
                return DispatchOutcome::Skipped;
            }
            if state.in_flight_day == Some(today) {
                debug!(%today, "Announcement for today already in flight.");
                return DispatchOutcome::Skipped;
            }
            state.in_flight_day = Some(today);
            InFlight {
                state: &self.state,
                day: today,
            }
        };

        let outcome = self.send(messages).await;

        if outcome.is_sent() {
            let mut state = lock_state(&self.state);
            if state.last_sent_day.map_or(true, |d| d < today) {
                state.last_sent_day = Some(today);
            }
        }
        drop(in_flight);
        outcome
    }

    /// The day of the last successful ordinary dispatch.
    pub fn last_sent_day(&self) -> Option<NaiveDate> {
        lock_state(&self.state).last_sent_day
    }

    async fn send(&self, messages: &[PushMessage]) -> DispatchOutcome {
        match self.sender.send_batch(messages).await {
            Ok(()) => {
                info!(recipients = messages.len(), "Push batch sent.");
                DispatchOutcome::Sent
            }
            Err(e) => {
                warn!("Push batch failed: {}", e);
                DispatchOutcome::Failed
            }
        }
    }
}

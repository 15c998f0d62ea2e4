//! Daily announcement throttle under concurrency and day rollover.

use futures::future::join_all;
use std::sync::Arc;

use super::support::{FixedClock, RecordingSender};
use crate::gate::{DispatchOutcome, NotificationGate};
use crate::ports::Clock;

fn gate() -> (Arc<NotificationGate>, Arc<RecordingSender>, Arc<FixedClock>) {
    let sender = Arc::new(RecordingSender::default());
    let clock = Arc::new(FixedClock::new(2024, 2, 28));
    let gate = Arc::new(NotificationGate::new(sender.clone(), clock.clone()));
    (gate, sender, clock)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_ordinary_triggers_send_at_most_once() {
    let (gate, sender, clock) = gate();

    let tasks = (0..50).map(|_| {
        let gate = gate.clone();
        tokio::spawn(async move { gate.try_dispatch_outcome(&(), |_| false, &[]).await })
    });
    let outcomes: Vec<DispatchOutcome> = join_all(tasks)
        .await
        .into_iter()
        .map(|r| r.unwrap())
        .collect();

    let sent = outcomes.iter().filter(|o| o.is_sent()).count();
    assert_eq!(sent, 1);
    assert_eq!(sender.batches(), 1);
    assert_eq!(gate.last_sent_day(), Some(clock.today()));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_overrides_all_send() {
    let (gate, sender, _clock) = gate();

    let tasks = (0..20).map(|_| {
        let gate = gate.clone();
        tokio::spawn(async move { gate.try_dispatch(&(), |_| true, &[]).await })
    });
    let results = join_all(tasks).await;

    assert!(results.into_iter().all(|r| r.unwrap()));
    assert_eq!(sender.batches(), 20);
    assert_eq!(gate.last_sent_day(), None);
}

#[tokio::test]
async fn test_failures_across_days_keep_retrying() {
    let (gate, sender, clock) = gate();

    sender.fail(true);
    assert!(!gate.try_dispatch(&(), |_| false, &[]).await);
    assert!(!gate.try_dispatch(&(), |_| false, &[]).await);
    assert_eq!(sender.attempts(), 2);

    clock.advance_days(1);
    sender.fail(false);
    assert!(gate.try_dispatch(&(), |_| false, &[]).await);
    assert!(!gate.try_dispatch(&(), |_| false, &[]).await);
    assert_eq!(sender.attempts(), 3);
    assert_eq!(gate.last_sent_day(), Some(clock.today()));
}

#[tokio::test]
async fn test_predicate_sees_the_trigger() {
    let (gate, sender, _clock) = gate();
    let is_priority = |author: &&str| author.eq_ignore_ascii_case("priority author");

    assert!(gate.try_dispatch(&"someone", is_priority, &[]).await);
    assert!(!gate.try_dispatch(&"someone else", is_priority, &[]).await);
    assert!(gate.try_dispatch(&"Priority Author", is_priority, &[]).await);
    assert_eq!(sender.batches(), 2);
}

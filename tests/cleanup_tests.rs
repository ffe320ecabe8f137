//! Lifecycle tests for the message cleaner: TTL expiry, exactly-once
//! removal and concurrent tracking.

use std::sync::Arc;
use std::time::{Duration, Instant};

use teloxide::prelude::*;
use teloxide::types::MessageId;

use numscan::cleanup::MessageCleaner;

#[test]
fn zero_ttl_entry_is_removed_by_the_next_sweep_pass() {
    let cleaner = MessageCleaner::new(Duration::from_secs(120));
    cleaner.schedule_delete(ChatId(7), MessageId(42), Duration::ZERO);

    let expired = cleaner.take_expired(Instant::now());
    assert_eq!(expired, vec![(ChatId(7), MessageId(42))]);
    assert!(!cleaner.is_tracked(ChatId(7), MessageId(42)));

    // Deleting again is a no-op, not an error
    assert!(cleaner.take_expired(Instant::now()).is_empty());
}

#[test]
fn nothing_is_removed_before_its_ttl_elapses() {
    let cleaner = MessageCleaner::new(Duration::from_secs(3600));
    for m in 0..10 {
        cleaner.track(ChatId(1), MessageId(m));
    }

    assert!(cleaner.take_expired(Instant::now()).is_empty());
    assert_eq!(cleaner.tracked_count(), 10);
}

#[test]
fn expired_and_live_entries_are_separated() {
    let cleaner = MessageCleaner::new(Duration::from_secs(3600));
    cleaner.schedule_delete(ChatId(1), MessageId(1), Duration::ZERO);
    cleaner.schedule_delete(ChatId(1), MessageId(2), Duration::ZERO);
    cleaner.track(ChatId(1), MessageId(3));

    let mut expired = cleaner.take_expired(Instant::now());
    expired.sort_by_key(|(_, m)| m.0);

    assert_eq!(
        expired,
        vec![(ChatId(1), MessageId(1)), (ChatId(1), MessageId(2))]
    );
    assert_eq!(cleaner.tracked_count(), 1);
    assert!(cleaner.is_tracked(ChatId(1), MessageId(3)));
}

#[tokio::test]
async fn concurrent_tracking_from_many_events_loses_no_entry() {
    let cleaner = Arc::new(MessageCleaner::new(Duration::from_secs(120)));
    let mut handles = Vec::new();

    for chat in 0..16i64 {
        let cleaner = Arc::clone(&cleaner);
        handles.push(tokio::spawn(async move {
            for m in 0..50 {
                cleaner.track(ChatId(chat), MessageId(m));
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(cleaner.tracked_count(), 800);
}

#[tokio::test]
async fn tracking_stays_consistent_while_sweeping_concurrently() {
    let cleaner = Arc::new(MessageCleaner::new(Duration::ZERO));

    let tracker = {
        let cleaner = Arc::clone(&cleaner);
        tokio::spawn(async move {
            for m in 0..300 {
                cleaner.track(ChatId(1), MessageId(m));
                tokio::task::yield_now().await;
            }
        })
    };

    let mut taken = Vec::new();
    for _ in 0..100 {
        taken.extend(cleaner.take_expired(Instant::now()));
        tokio::task::yield_now().await;
    }
    tracker.await.unwrap();
    taken.extend(cleaner.take_expired(Instant::now()));

    // Each tracked message was handed out exactly once
    assert_eq!(taken.len(), 300);
    let unique: std::collections::HashSet<_> = taken.iter().collect();
    assert_eq!(unique.len(), 300);
    assert_eq!(cleaner.tracked_count(), 0);
}

#[test]
fn retracking_refreshes_the_deadline_consistently() {
    let cleaner = MessageCleaner::new(Duration::from_secs(3600));

    // First tracked with an expired deadline, then refreshed by the default
    cleaner.schedule_delete(ChatId(1), MessageId(1), Duration::ZERO);
    cleaner.track(ChatId(1), MessageId(1));

    assert!(cleaner.take_expired(Instant::now()).is_empty());
    assert_eq!(cleaner.tracked_count(), 1);
}

#[test]
fn per_message_ttls_are_independent() {
    let cleaner = MessageCleaner::new(Duration::from_secs(3600));
    cleaner.schedule_delete(ChatId(1), MessageId(1), Duration::from_secs(1));
    cleaner.schedule_delete(ChatId(2), MessageId(2), Duration::from_secs(7200));

    // A deadline sampled between the two TTLs only releases the first
    let expired = cleaner.take_expired(Instant::now() + Duration::from_secs(60));
    assert_eq!(expired, vec![(ChatId(1), MessageId(1))]);
    assert!(cleaner.is_tracked(ChatId(2), MessageId(2)));
}

//! # Message Cleanup Module
//!
//! This module owns the ephemeral message lifecycle: every message the bot
//! sends or receives is tracked with a deadline and deleted once its TTL
//! elapses. One `MessageCleaner` instance is constructed at startup and shared
//! by reference; it owns the only shared mutable collection in the process and
//! the single sweep loop that performs deletions, so TTL behavior lives in one
//! place instead of scattered sleep-then-delete tasks.
//!
//! Deletion is best-effort and exactly-once: an entry leaves tracking
//! synchronously when it is picked up for deletion, before the transport call,
//! so no message is ever attempted twice. "Already gone" and "not allowed"
//! responses count as success; other transport failures are logged and not
//! retried.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use teloxide::prelude::*;
use teloxide::types::MessageId;
use teloxide::{ApiError, RequestError};
use tracing::{debug, warn};

/// Tracks messages that must expire and deletes them after their TTL
#[derive(Debug)]
pub struct MessageCleaner {
    /// Deletion deadline per tracked message; the mutex scope never spans
    /// an await
    entries: Mutex<HashMap<(ChatId, MessageId), Instant>>,
    default_ttl: Duration,
}

impl MessageCleaner {
    /// Create a cleaner with the given default time-to-live
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            default_ttl,
        }
    }

    /// Register a message for deletion after the default TTL
    ///
    /// Tracking an already-tracked message refreshes its deadline; the entry
    /// is keyed by (chat, message) so this is idempotent, never a duplicate.
    pub fn track(&self, chat: ChatId, message: MessageId) {
        self.schedule_delete(chat, message, self.default_ttl);
    }

    /// Register a message for deletion after an explicit TTL
    pub fn schedule_delete(&self, chat: ChatId, message: MessageId, ttl: Duration) {
        let deadline = Instant::now() + ttl;
        let mut entries = self.entries.lock().unwrap();
        entries.insert((chat, message), deadline);
        debug!(
            chat_id = %chat,
            message_id = message.0,
            ttl_secs = ttl.as_secs(),
            tracked = entries.len(),
            "Message tracked for deletion"
        );
    }

    /// Remove and return every entry whose deadline has passed
    ///
    /// Entries leave tracking here, before any deletion attempt, which is
    /// what guarantees at-most-once deletion even if a sweep overlaps with
    /// new `track` calls. Unexpired entries are untouched.
    pub fn take_expired(&self, now: Instant) -> Vec<(ChatId, MessageId)> {
        let mut entries = self.entries.lock().unwrap();
        let expired: Vec<(ChatId, MessageId)> = entries
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(key, _)| *key)
            .collect();
        for key in &expired {
            entries.remove(key);
        }
        expired
    }

    /// Number of currently tracked messages
    pub fn tracked_count(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    /// Whether a specific message is currently tracked
    pub fn is_tracked(&self, chat: ChatId, message: MessageId) -> bool {
        self.entries.lock().unwrap().contains_key(&(chat, message))
    }

    /// Delete every expired message, isolating failures per message
    pub async fn sweep(&self, bot: &Bot) {
        let due = self.take_expired(Instant::now());
        if due.is_empty() {
            return;
        }
        debug!(expired = due.len(), "Sweeping expired messages");

        for (chat, message) in due {
            match bot.delete_message(chat, message).await {
                Ok(_) => {
                    debug!(chat_id = %chat, message_id = message.0, "Message deleted");
                }
                Err(e) if is_benign_delete_error(&e) => {
                    // The goal (message not visible) is already satisfied
                    debug!(
                        chat_id = %chat,
                        message_id = message.0,
                        error = %e,
                        "Message already gone or undeletable"
                    );
                }
                Err(e) => {
                    // Fire-and-forget: best-effort cleanup must not turn
                    // into a retry storm
                    warn!(
                        chat_id = %chat,
                        message_id = message.0,
                        error = %e,
                        "Failed to delete message, not retrying"
                    );
                }
            }
        }
    }

    /// Periodic sweep loop; spawn once at startup
    pub async fn run(self: std::sync::Arc<Self>, bot: Bot, interval: Duration) {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            self.sweep(&bot).await;
        }
    }
}

/// Delete-message errors that mean the message is already not visible
fn is_benign_delete_error(err: &RequestError) -> bool {
    matches!(
        err,
        RequestError::Api(
            ApiError::MessageToDeleteNotFound
                | ApiError::MessageCantBeDeleted
                | ApiError::MessageIdInvalid
        )
    )
}

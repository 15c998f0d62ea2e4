//! crates/bookshare_core/src/announce.rs
//!
//! Composes the push notifications the engine sends: the daily new-book
//! announcement (throttled through the `NotificationGate`) and the manual app
//! update broadcast (never throttled).

use std::sync::Arc;
use tracing::info;

use crate::domain::{Book, PushMessage, PushPayload};
use crate::error::{EngineError, EngineResult};
use crate::gate::{DispatchOutcome, NotificationGate};
use crate::ports::{BookStore, NotificationSender, UserDirectory};

//=========================================================================================
// Daily new-book announcement
//=========================================================================================

pub struct DailyBookAnnouncer {
    store: Arc<dyn BookStore>,
    users: Arc<dyn UserDirectory>,
    gate: Arc<NotificationGate>,
    priority_authors: Vec<String>,
}

impl DailyBookAnnouncer {
    pub fn new(
        store: Arc<dyn BookStore>,
        users: Arc<dyn UserDirectory>,
        gate: Arc<NotificationGate>,
        priority_authors: Vec<String>,
    ) -> Self {
        Self {
            store,
            users,
            gate,
            priority_authors: priority_authors
                .iter()
                .map(|a| a.trim().to_lowercase())
                .collect(),
        }
    }

    /// Announces the newest book to every registered device.
    ///
    /// Books by a priority author bypass the once-per-day throttle.
    pub async fn announce(&self) -> EngineResult<DispatchOutcome> {
        let latest = latest_book(self.store.list_all().await?)
            .ok_or_else(|| EngineError::NotFound("no books in the catalog".to_string()))?;

        let priority = self.is_priority(&latest);
        let tokens = self.users.push_tokens().await?;
        let messages = new_book_messages(&latest, priority, tokens);

        let outcome = self
            .gate
            .try_dispatch_outcome(&latest, |book| self.is_priority(book), &messages)
            .await;
        info!(book_id = %latest.id, priority, ?outcome, "Daily book announcement handled.");
        Ok(outcome)
    }

    fn is_priority(&self, book: &Book) -> bool {
        let author = book.author.trim().to_lowercase();
        self.priority_authors.iter().any(|a| *a == author)
    }
}

fn latest_book(catalog: Vec<Book>) -> Option<Book> {
    // Last maximum wins, so the later-inserted of two same-instant books is picked.
    catalog.into_iter().reduce(|newest, b| {
        if b.created_at >= newest.created_at {
            b
        } else {
            newest
        }
    })
}

fn new_book_messages(book: &Book, priority: bool, tokens: Vec<String>) -> Vec<PushMessage> {
    let title = if priority {
        format!("🔥 Exclusive Release by {}!", book.author.trim())
    } else {
        "📚 New Book Uploaded!".to_string()
    };
    let body = format!("Check out \"{}\" by {}", book.title, book.author);

    tokens
        .into_iter()
        .map(|to| PushMessage {
            to,
            title: title.clone(),
            body: body.clone(),
            payload: PushPayload::Book { book_id: book.id },
        })
        .collect()
}

//=========================================================================================
// Manual update broadcast
//=========================================================================================

pub struct UpdateBroadcaster {
    users: Arc<dyn UserDirectory>,
    sender: Arc<dyn NotificationSender>,
}

impl UpdateBroadcaster {
    pub fn new(users: Arc<dyn UserDirectory>, sender: Arc<dyn NotificationSender>) -> Self {
        Self { users, sender }
    }

    /// Sends an app update notice to every registered device. Returns the
    /// number of messages handed to the sender.
    pub async fn broadcast(&self, version: &str, features: &str) -> EngineResult<usize> {
        let (version, features) = (version.trim(), features.trim());
        if version.is_empty() || features.is_empty() {
            return Err(EngineError::InvalidInput(
                "version and features are required".to_string(),
            ));
        }

        let messages: Vec<PushMessage> = self
            .users
            .push_tokens()
            .await?
            .into_iter()
            .map(|to| PushMessage {
                to,
                title: format!("App Update {} 🚀", version),
                body: format!("What's new: {}", features),
                payload: PushPayload::Update {
                    version: version.to_string(),
                },
            })
            .collect();

        self.sender
            .send_batch(&messages)
            .await
            .map_err(|e| EngineError::Dispatch(e.to_string()))?;
        info!(version, recipients = messages.len(), "Update broadcast sent.");
        Ok(messages.len())
    }
}

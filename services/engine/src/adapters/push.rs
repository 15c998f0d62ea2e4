//! services/engine/src/adapters/push.rs
//!
//! A `NotificationSender` that renders each batch in the push provider's JSON
//! shape and writes it to the log instead of delivering it.

use async_trait::async_trait;
use bookshare_core::{BookId, NotificationSender, PortError, PortResult, PushMessage, PushPayload};
use serde::Serialize;
use tracing::info;

//=========================================================================================
// Wire records
//=========================================================================================

#[derive(Serialize)]
struct PushRecord<'a> {
    to: &'a str,
    title: &'a str,
    body: &'a str,
    data: PushData<'a>,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum PushData<'a> {
    Book {
        #[serde(rename = "bookId")]
        book_id: BookId,
    },
    Update { version: &'a str },
}

impl<'a> From<&'a PushMessage> for PushRecord<'a> {
    fn from(message: &'a PushMessage) -> Self {
        let data = match &message.payload {
            PushPayload::Book { book_id } => PushData::Book { book_id: *book_id },
            PushPayload::Update { version } => PushData::Update { version },
        };
        Self {
            to: &message.to,
            title: &message.title,
            body: &message.body,
            data,
        }
    }
}

/// Serializes a batch the way the push provider expects it.
pub fn render_batch(messages: &[PushMessage]) -> Result<String, serde_json::Error> {
    let records: Vec<PushRecord<'_>> = messages.iter().map(PushRecord::from).collect();
    serde_json::to_string(&records)
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct LogPushSender;

#[async_trait]
impl NotificationSender for LogPushSender {
    async fn send_batch(&self, messages: &[PushMessage]) -> PortResult<()> {
        let body = render_batch(messages).map_err(|e| PortError::Unexpected(e.to_string()))?;
        info!(recipients = messages.len(), %body, "Push batch rendered.");
        Ok(())
    }
}

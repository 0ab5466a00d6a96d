use std::sync::Arc;

use crate::{domain::ChatId, ports::MessagingPort};

/// Telegram's hard limit for a single text message, in UTF-16 units.
pub const CHAT_MESSAGE_LIMIT: usize = 4096;

/// Operator-facing sinks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Destination {
    /// Publish results.
    Info,
    /// Traffic from anyone other than the publish channel.
    Manager,
}

/// Fire-and-forget status messages to the operator chats.
pub struct Notifier {
    messenger: Arc<dyn MessagingPort>,
    info_chat: ChatId,
    manager_chat: ChatId,
}

impl Notifier {
    pub fn new(messenger: Arc<dyn MessagingPort>, info_chat: ChatId, manager_chat: ChatId) -> Self {
        Self {
            messenger,
            info_chat,
            manager_chat,
        }
    }

    pub fn chat_for(&self, destination: Destination) -> ChatId {
        match destination {
            Destination::Info => self.info_chat,
            Destination::Manager => self.manager_chat,
        }
    }

    /// Send `text`; delivery failures are logged and swallowed.
    pub async fn notify(&self, destination: Destination, text: &str) {
        let chat_id = self.chat_for(destination);
        let text = truncate_for_chat(text, CHAT_MESSAGE_LIMIT);
        if let Err(e) = self.messenger.send_text(chat_id, &text).await {
            tracing::warn!(?destination, chat_id = chat_id.0, "notification not delivered: {e}");
        }
    }
}

/// Cut `text` so it fits in `limit` UTF-16 units, marking the cut with an ellipsis.
pub fn truncate_for_chat(text: &str, limit: usize) -> String {
    if text.encode_utf16().count() <= limit {
        return text.to_string();
    }

    let budget = limit.saturating_sub(1);
    let mut used = 0usize;
    let mut out = String::new();
    for ch in text.chars() {
        used += ch.len_utf16();
        if used > budget {
            break;
        }
        out.push(ch);
    }
    out.push('…');
    out
}

//! Per-message routing: publish-channel traffic is posted, everything else is
//! relayed to the manager chat.

use crate::{
    domain::{ChatId, InboundMessage},
    notifier::{Destination, Notifier},
    publisher::{PostOutcome, Publisher},
    sanitize::sanitize,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Publish,
    Relay { summary: String },
}

/// Authorization is origin-chat equality, nothing else.
pub fn route(msg: &InboundMessage, publish_chat: ChatId) -> Action {
    if msg.chat_id == publish_chat {
        return Action::Publish;
    }
    Action::Relay {
        summary: relay_summary(msg),
    }
}

/// `name: <handle>, id: <id>` plus the sanitized text on the next line.
pub fn relay_summary(msg: &InboundMessage) -> String {
    let mut out = format!("name: {}, id: {}", msg.sender.handle(), msg.sender.id.0);
    if let Some(last) = msg.attachments.last() {
        out.push_str(&format!(", attachment: {}", last.kind.label()));
    }

    let text = sanitize(msg.rich_text());
    if !text.trim().is_empty() {
        out.push('\n');
        out.push_str(&text);
    }
    out
}

/// What happened to a message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Handled {
    Posted(PostOutcome),
    Relayed,
}

/// Route → publish or relay → exactly one notification.
pub struct Router {
    publish_chat: ChatId,
    publisher: Publisher,
    notifier: Notifier,
}

impl Router {
    pub fn new(publish_chat: ChatId, publisher: Publisher, notifier: Notifier) -> Self {
        Self {
            publish_chat,
            publisher,
            notifier,
        }
    }

    pub async fn handle(&self, msg: &InboundMessage) -> Handled {
        match route(msg, self.publish_chat) {
            Action::Publish => {
                let outcome = self.publisher.publish(msg).await;
                self.notifier
                    .notify(Destination::Info, &outcome.notification())
                    .await;
                Handled::Posted(outcome)
            }
            Action::Relay { summary } => {
                tracing::info!(
                    chat_id = msg.chat_id.0,
                    sender_id = msg.sender.id.0,
                    "relaying message from outside the publish channel"
                );
                self.notifier.notify(Destination::Manager, &summary).await;
                Handled::Relayed
            }
        }
    }
}

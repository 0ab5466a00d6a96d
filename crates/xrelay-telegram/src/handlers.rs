//! Update handlers: map the Telegram message, hand it to the core router.

use std::sync::Arc;

use teloxide::{prelude::*, types::Message};

use crate::{inbound, router::AppState};

pub async fn handle_message(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(inbound) = inbound::from_message(&msg) else {
        tracing::debug!(chat_id = msg.chat.id.0, "ignoring message without content");
        return Ok(());
    };

    // Outcomes are reported through the notifier; nothing here can fail intake.
    let handled = state.router.handle(&inbound).await;
    tracing::debug!(chat_id = inbound.chat_id.0, ?handled, "message handled");
    Ok(())
}

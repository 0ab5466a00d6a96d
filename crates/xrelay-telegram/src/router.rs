use std::sync::Arc;

use teloxide::{dispatching::Dispatcher, dptree, prelude::*};

use xrelay_core::{
    clients::LazyApiClients,
    config::Config,
    notifier::Notifier,
    ports::{AttachmentFetcher, MessagingPort},
    publisher::Publisher,
    router::Router,
};

use crate::{handlers, TelegramFiles, TelegramMessenger};

pub struct AppState {
    pub router: Router,
}

pub async fn run_polling(cfg: Arc<Config>, clients: Arc<LazyApiClients>) -> anyhow::Result<()> {
    let bot = Bot::new(cfg.telegram_bot_token.expose());

    match bot.get_me().await {
        Ok(me) => tracing::info!("xrelay started: @{}", me.username()),
        Err(e) => tracing::warn!("getMe failed, continuing: {e}"),
    }
    tracing::info!(
        publish_chat = cfg.publish_chat_id.0,
        info_chat = cfg.info_chat_id.0,
        manager_chat = cfg.manager_chat_id.0,
        "relay configured"
    );

    let messenger: Arc<dyn MessagingPort> = Arc::new(TelegramMessenger::new(bot.clone()));
    let fetcher: Arc<dyn AttachmentFetcher> = Arc::new(TelegramFiles::new(bot.clone()));

    let state = Arc::new(AppState {
        router: Router::new(
            cfg.publish_chat_id,
            Publisher::new(clients, fetcher),
            Notifier::new(messenger, cfg.info_chat_id, cfg.manager_chat_id),
        ),
    });

    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(handlers::handle_message))
        .branch(Update::filter_channel_post().endpoint(handlers::handle_message));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .build()
        .dispatch()
        .await;

    Ok(())
}

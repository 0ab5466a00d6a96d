use std::sync::Arc;

use xrelay_core::{clients::LazyApiClients, config::Config};
use xrelay_twitter::TwitterSettings;

#[tokio::main]
async fn main() -> Result<(), xrelay_core::Error> {
    xrelay_core::logging::init("xrelay")?;

    let cfg = Arc::new(Config::load()?);

    // Built on the first publish and reused for the life of the process.
    let settings = TwitterSettings::from_config(&cfg);
    let clients = Arc::new(LazyApiClients::new(move || {
        xrelay_twitter::build_clients(&settings)
    }));

    xrelay_telegram::router::run_polling(cfg, clients)
        .await
        .map_err(|e| xrelay_core::Error::External(format!("telegram bot failed: {e}")))?;

    tracing::info!("xrelay stopped");
    Ok(())
}

use crate::{errors::Error, Result};

/// Initialize tracing for the relay.
///
/// Default: info for our crates, warn for the HTTP stack. Can be overridden with `RUST_LOG`.
pub fn init(service_name: &str) -> Result<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(service_name)));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(true)
        .try_init()
        .map_err(|e| Error::Config(format!("logging init failed: {e}")))
}

fn default_directives(service_name: &str) -> String {
    let crate_name = service_name.replace('-', "_");
    format!(
        "info,xrelay_core=info,xrelay_telegram=info,xrelay_twitter=info,{crate_name}=info,hyper=warn,reqwest=warn"
    )
}

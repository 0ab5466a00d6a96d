/// Core error type for the relay.
///
/// Adapter crates map their transport errors into this type so the publisher can
/// turn every failure into a named outcome (platform vs. everything else).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("attachment fetch failed: {0}")]
    AttachmentFetch(String),

    /// The posting platform reported a server-side failure (5xx).
    #[error("platform error {status}: {message}")]
    Platform { status: u16, message: String },

    /// The posting platform rejected the request (4xx and friends).
    #[error("api error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("external error: {0}")]
    External(String),
}

pub type Result<T> = std::result::Result<T, Error>;

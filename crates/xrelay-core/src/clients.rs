use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::{
    ports::{MediaUploadPort, PostPort},
    Result,
};

/// The posting platform handles: media upload and post creation.
#[derive(Clone)]
pub struct ApiClients {
    pub media: Arc<dyn MediaUploadPort>,
    pub posts: Arc<dyn PostPort>,
}

type ClientFactory = Box<dyn Fn() -> Result<ApiClients> + Send + Sync>;

/// Process-lifetime client pair built on first use.
///
/// Concurrent first callers wait on the same initializer, so the factory runs at
/// most once per successful build. A failed build is not cached and the next
/// publish tries again.
pub struct LazyApiClients {
    cell: OnceCell<ApiClients>,
    factory: ClientFactory,
}

impl LazyApiClients {
    pub fn new(factory: impl Fn() -> Result<ApiClients> + Send + Sync + 'static) -> Self {
        Self {
            cell: OnceCell::new(),
            factory: Box::new(factory),
        }
    }

    /// Already-built clients (tests, eager startup).
    pub fn ready(clients: ApiClients) -> Self {
        Self {
            cell: OnceCell::new_with(Some(clients)),
            factory: Box::new(|| -> Result<ApiClients> {
                Err(crate::Error::Config(
                    "api clients were provided pre-built".to_string(),
                ))
            }),
        }
    }

    pub async fn get(&self) -> Result<&ApiClients> {
        self.cell
            .get_or_try_init(|| async {
                tracing::info!("initializing posting api clients");
                (self.factory)()
            })
            .await
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.initialized()
    }
}

//! X (Twitter) adapter.
//!
//! Implements the `xrelay-core` posting ports: v2 `POST /2/tweets` for posts and
//! the v1.1 upload endpoint for media, both signed with OAuth 1.0a user context.

use std::{sync::Arc, time::Duration};

use xrelay_core::{
    clients::ApiClients,
    config::{Config, TwitterCredentials},
    Result,
};

mod http;
pub mod media;
pub mod oauth;
pub mod posts;

pub use media::TwitterMediaClient;
pub use posts::TwitterClient;

#[derive(Clone, Debug)]
pub struct TwitterSettings {
    pub credentials: TwitterCredentials,
    pub api_base: String,
    pub upload_base: String,
    pub wait_on_rate_limit: bool,
    pub timeout: Duration,
}

impl TwitterSettings {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            credentials: cfg.twitter.clone(),
            api_base: cfg.twitter_api_base.clone(),
            upload_base: cfg.twitter_upload_base.clone(),
            wait_on_rate_limit: cfg.twitter_wait_on_rate_limit,
            timeout: cfg.http_timeout,
        }
    }
}

/// Build the media + post client pair over one shared HTTP client.
pub fn build_clients(settings: &TwitterSettings) -> Result<ApiClients> {
    let http = Arc::new(http::XHttp::new(settings)?);
    Ok(ApiClients {
        media: Arc::new(TwitterMediaClient::with_http(
            http.clone(),
            &settings.upload_base,
        )),
        posts: Arc::new(TwitterClient::with_http(http, &settings.api_base)),
    })
}

#[cfg(test)]
pub(crate) mod testing {
    use std::time::Duration;

    use xrelay_core::config::{Secret, TwitterCredentials};

    use crate::TwitterSettings;

    pub fn settings(base: &str) -> TwitterSettings {
        TwitterSettings {
            credentials: TwitterCredentials {
                consumer_key: Secret::new("ck"),
                consumer_secret: Secret::new("cs"),
                access_token: Secret::new("at"),
                access_token_secret: Secret::new("ats"),
            },
            api_base: base.to_string(),
            upload_base: base.to_string(),
            wait_on_rate_limit: false,
            timeout: Duration::from_secs(5),
        }
    }
}

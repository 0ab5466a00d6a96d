use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;
use serde_json::json;

use xrelay_core::{
    domain::{MediaRef, PostId},
    errors::Error,
    ports::PostPort,
    Result,
};

use crate::{http::XHttp, TwitterSettings};

#[derive(Deserialize)]
struct CreateTweetResponse {
    data: CreatedTweet,
}

#[derive(Deserialize)]
struct CreatedTweet {
    id: String,
}

/// X API v2 client (post creation).
#[derive(Clone)]
pub struct TwitterClient {
    http: Arc<XHttp>,
    tweets_url: String,
}

impl TwitterClient {
    pub fn new(settings: &TwitterSettings) -> Result<Self> {
        Ok(Self::with_http(
            Arc::new(XHttp::new(settings)?),
            &settings.api_base,
        ))
    }

    pub(crate) fn with_http(http: Arc<XHttp>, api_base: &str) -> Self {
        Self {
            http,
            tweets_url: format!("{}/2/tweets", api_base.trim_end_matches('/')),
        }
    }
}

#[async_trait]
impl PostPort for TwitterClient {
    async fn create_post(&self, text: &str, media: Option<&MediaRef>) -> Result<PostId> {
        let mut body = json!({ "text": text });
        if let Some(m) = media {
            body["media"] = json!({ "media_ids": [m.0] });
        }

        let resp = self
            .http
            .execute("create tweet", || {
                Ok(self
                    .http
                    .signed(Method::POST, &self.tweets_url, &[])?
                    .json(&body))
            })
            .await?;

        let created: CreateTweetResponse = resp
            .json()
            .await
            .map_err(|e| Error::External(format!("x create tweet response: {e}")))?;
        Ok(PostId(created.data.id))
    }
}

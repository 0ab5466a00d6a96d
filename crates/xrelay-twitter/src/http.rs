use std::time::{Duration, SystemTime, UNIX_EPOCH};

use reqwest::{header::AUTHORIZATION, Method, RequestBuilder, Response, StatusCode};
use tokio::time::sleep;

use xrelay_core::{errors::Error, Result};

use crate::{oauth::OAuth1Signer, TwitterSettings};

const MAX_RATE_LIMIT_WAIT: Duration = Duration::from_secs(15 * 60);

/// Signed HTTP access to the X API, shared by the post and media clients.
pub(crate) struct XHttp {
    http: reqwest::Client,
    signer: OAuth1Signer,
    wait_on_rate_limit: bool,
}

impl XHttp {
    pub(crate) fn new(settings: &TwitterSettings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| Error::External(format!("x http client build failed: {e}")))?;
        Ok(Self {
            http,
            signer: OAuth1Signer::new(settings.credentials.clone()),
            wait_on_rate_limit: settings.wait_on_rate_limit,
        })
    }

    /// Request with query parameters and an OAuth header signed over them.
    pub(crate) fn signed(
        &self,
        method: Method,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<RequestBuilder> {
        let params = query
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect::<Vec<_>>();
        let auth = self.signer.authorization(method.as_str(), url, &params)?;

        let mut req = self.http.request(method, url).header(AUTHORIZATION, auth);
        if !query.is_empty() {
            req = req.query(query);
        }
        Ok(req)
    }

    /// Send the request built by `build`; non-2xx becomes an error.
    ///
    /// A 429 is waited out once (until `x-rate-limit-reset`) when enabled. The
    /// request is rebuilt so the retry carries a fresh nonce.
    pub(crate) async fn execute(
        &self,
        what: &str,
        mut build: impl FnMut() -> Result<RequestBuilder>,
    ) -> Result<Response> {
        let mut waited = false;
        loop {
            let resp = build()?
                .send()
                .await
                .map_err(|e| Error::External(format!("x {what} request failed: {e}")))?;

            let status = resp.status();
            if status.is_success() {
                return Ok(resp);
            }

            if status == StatusCode::TOO_MANY_REQUESTS && self.wait_on_rate_limit && !waited {
                let wait = rate_limit_wait(
                    resp.headers()
                        .get("x-rate-limit-reset")
                        .and_then(|v| v.to_str().ok()),
                    SystemTime::now(),
                );
                tracing::warn!(what, wait_secs = wait.as_secs(), "x rate limit hit, waiting");
                sleep(wait).await;
                waited = true;
                continue;
            }

            let body = resp.text().await.unwrap_or_default();
            return Err(status_error(status.as_u16(), &body));
        }
    }
}

/// How long to wait for a rate-limit window to reset.
pub(crate) fn rate_limit_wait(reset_header: Option<&str>, now: SystemTime) -> Duration {
    let now_secs = now.duration_since(UNIX_EPOCH).unwrap_or_default().as_secs();
    let wait = match reset_header.and_then(|v| v.trim().parse::<u64>().ok()) {
        Some(reset) => Duration::from_secs(reset.saturating_sub(now_secs) + 1),
        None => Duration::from_secs(60),
    };
    wait.min(MAX_RATE_LIMIT_WAIT)
}

/// 5xx → platform error, anything else → api error, with a short message.
pub(crate) fn status_error(status: u16, body: &str) -> Error {
    let message = error_message(body);
    if (500..600).contains(&status) {
        Error::Platform { status, message }
    } else {
        Error::Api { status, message }
    }
}

fn error_message(body: &str) -> String {
    let from_json = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("detail")
                .or_else(|| v.get("title"))
                .or_else(|| v.pointer("/errors/0/message"))
                .or_else(|| v.get("error"))
                .and_then(|m| m.as_str())
                .map(|s| s.to_string())
        });
    from_json.unwrap_or_else(|| body.chars().take(200).collect())
}

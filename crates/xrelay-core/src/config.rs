use std::{env, fs, path::Path, time::Duration};

use crate::{domain::ChatId, errors::Error, Result};

pub const DEFAULT_TWITTER_API_BASE: &str = "https://api.twitter.com";
pub const DEFAULT_TWITTER_UPLOAD_BASE: &str = "https://upload.twitter.com";

/// A credential string that never shows up in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Secret(***)")
    }
}

/// OAuth 1.0a user-context credentials for the X API.
#[derive(Clone, Debug)]
pub struct TwitterCredentials {
    pub consumer_key: Secret,
    pub consumer_secret: Secret,
    pub access_token: Secret,
    pub access_token_secret: Secret,
}

/// Typed configuration, read from the environment (plus an optional `.env`).
#[derive(Clone, Debug)]
pub struct Config {
    // Telegram
    pub telegram_bot_token: Secret,
    pub publish_chat_id: ChatId,
    pub info_chat_id: ChatId,
    pub manager_chat_id: ChatId,

    // X
    pub twitter: TwitterCredentials,
    pub twitter_api_base: String,
    pub twitter_upload_base: String,
    pub twitter_wait_on_rate_limit: bool,
    pub http_timeout: Duration,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any key → value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |keys: &[&str]| {
            keys.iter()
                .find_map(|k| lookup(k))
                .and_then(non_empty)
        };
        let required = |keys: &[&str]| {
            get(keys).ok_or_else(|| {
                Error::Config(format!("{} environment variable is required", keys[0]))
            })
        };
        let chat = |keys: &[&str]| -> Result<ChatId> {
            let raw = required(keys)?;
            raw.trim().parse::<i64>().map(ChatId).map_err(|_| {
                Error::Config(format!("{} must be a numeric chat id, got {raw:?}", keys[0]))
            })
        };

        let telegram_bot_token = Secret::new(required(&["BOT_TOKEN", "TELEGRAM_BOT_TOKEN"])?);
        let publish_chat_id = chat(&["PUBLISH_CHAT_ID", "XBOX_CHAT"])?;
        let info_chat_id = chat(&["INFO_CHAT_ID"])?;
        let manager_chat_id = chat(&["MANAGER_CHAT_ID"])?;

        let twitter = TwitterCredentials {
            consumer_key: Secret::new(required(&["API_KEY"])?),
            consumer_secret: Secret::new(required(&["API_KEY_SECRET"])?),
            access_token: Secret::new(required(&["ACCESS_TOKEN"])?),
            access_token_secret: Secret::new(required(&["ACCESS_TOKEN_SECRET"])?),
        };

        let twitter_api_base = get(&["TWITTER_API_BASE"])
            .map(|s| s.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_TWITTER_API_BASE.to_string());
        let twitter_upload_base = get(&["TWITTER_UPLOAD_BASE"])
            .map(|s| s.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_TWITTER_UPLOAD_BASE.to_string());
        let twitter_wait_on_rate_limit = get(&["TWITTER_WAIT_ON_RATE_LIMIT"])
            .map(|s| parse_bool(&s))
            .unwrap_or(true);
        let http_timeout = Duration::from_secs(
            get(&["HTTP_TIMEOUT_SECS"])
                .and_then(|s| s.trim().parse::<u64>().ok())
                .unwrap_or(30),
        );

        Ok(Self {
            telegram_bot_token,
            publish_chat_id,
            info_chat_id,
            manager_chat_id,
            twitter,
            twitter_api_base,
            twitter_upload_base,
            twitter_wait_on_rate_limit,
            http_timeout,
        })
    }
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for (key, val) in parse_dotenv(&contents) {
        if env::var_os(&key).is_some() {
            continue; // do not override existing env
        }
        env::set_var(key, val);
    }
}

fn parse_dotenv(contents: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        out.push((key.to_string(), val));
    }
    out
}

fn parse_bool(s: &str) -> bool {
    matches!(
        s.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

//! OAuth 1.0a (HMAC-SHA1) request signing for X user-context calls.
//!
//! Query and form parameters take part in the signature; JSON and multipart
//! bodies do not.

use std::time::{SystemTime, UNIX_EPOCH};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use rand::{distributions::Alphanumeric, Rng};
use sha1::Sha1;

use xrelay_core::{config::TwitterCredentials, errors::Error, Result};

type HmacSha1 = Hmac<Sha1>;

/// RFC 3986 percent-encoding (everything but `A-Z a-z 0-9 - . _ ~`).
pub fn percent_encode(s: &str) -> String {
    urlencoding::encode(s).into_owned()
}

#[derive(Clone, Debug)]
pub struct OAuth1Signer {
    creds: TwitterCredentials,
}

impl OAuth1Signer {
    pub fn new(creds: TwitterCredentials) -> Self {
        Self { creds }
    }

    /// `Authorization` header value for a request with a fresh nonce and timestamp.
    pub fn authorization(
        &self,
        method: &str,
        url: &str,
        params: &[(String, String)],
    ) -> Result<String> {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        self.authorization_with(method, url, params, &nonce(), timestamp)
    }

    pub fn authorization_with(
        &self,
        method: &str,
        url: &str,
        params: &[(String, String)],
        nonce: &str,
        timestamp: u64,
    ) -> Result<String> {
        let mut oauth = self.oauth_params(nonce, timestamp);

        let mut all = params.to_vec();
        all.extend(oauth.iter().cloned());
        let signature = self.sign(&signature_base(method, url, &all))?;
        oauth.push(("oauth_signature".to_string(), signature));
        oauth.sort();

        let fields = oauth
            .iter()
            .map(|(k, v)| format!(r#"{}="{}""#, percent_encode(k), percent_encode(v)))
            .collect::<Vec<_>>()
            .join(", ");
        Ok(format!("OAuth {fields}"))
    }

    fn oauth_params(&self, nonce: &str, timestamp: u64) -> Vec<(String, String)> {
        vec![
            (
                "oauth_consumer_key".to_string(),
                self.creds.consumer_key.expose().to_string(),
            ),
            ("oauth_nonce".to_string(), nonce.to_string()),
            ("oauth_signature_method".to_string(), "HMAC-SHA1".to_string()),
            ("oauth_timestamp".to_string(), timestamp.to_string()),
            (
                "oauth_token".to_string(),
                self.creds.access_token.expose().to_string(),
            ),
            ("oauth_version".to_string(), "1.0".to_string()),
        ]
    }

    fn sign(&self, base: &str) -> Result<String> {
        let key = format!(
            "{}&{}",
            percent_encode(self.creds.consumer_secret.expose()),
            percent_encode(self.creds.access_token_secret.expose())
        );
        let mut mac = HmacSha1::new_from_slice(key.as_bytes())
            .map_err(|e| Error::External(format!("oauth signing key rejected: {e}")))?;
        mac.update(base.as_bytes());
        Ok(STANDARD.encode(mac.finalize().into_bytes()))
    }
}

/// `METHOD&url&sorted-params`, each part percent-encoded.
pub fn signature_base(method: &str, url: &str, params: &[(String, String)]) -> String {
    let mut encoded = params
        .iter()
        .map(|(k, v)| (percent_encode(k), percent_encode(v)))
        .collect::<Vec<_>>();
    encoded.sort();
    let param_string = encoded
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.to_ascii_uppercase(),
        percent_encode(url),
        percent_encode(&param_string)
    )
}

fn nonce() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

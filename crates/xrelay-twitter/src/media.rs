use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Method, Response,
};
use serde::Deserialize;
use tokio::time::sleep;

use xrelay_core::{
    attachment::MediaBlob,
    domain::{MediaKind, MediaRef},
    errors::Error,
    ports::MediaUploadPort,
    Result,
};

use crate::{http::XHttp, TwitterSettings};

/// APPEND segment size.
pub const CHUNK_SIZE: usize = 1024 * 1024;
const MAX_STATUS_POLLS: usize = 60;

#[derive(Debug, Deserialize)]
struct UploadResponse {
    media_id_string: String,
    #[serde(default)]
    processing_info: Option<ProcessingInfo>,
}

#[derive(Debug, Deserialize)]
struct ProcessingInfo {
    state: String,
    #[serde(default)]
    check_after_secs: Option<u64>,
    #[serde(default)]
    error: Option<ProcessingError>,
}

#[derive(Debug, Deserialize)]
struct ProcessingError {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// X API v1.1 media upload client.
///
/// Images go through the one-shot multipart upload; videos use the chunked
/// INIT / APPEND / FINALIZE flow and wait for server-side processing.
#[derive(Clone)]
pub struct TwitterMediaClient {
    http: Arc<XHttp>,
    upload_url: String,
}

impl TwitterMediaClient {
    pub fn new(settings: &TwitterSettings) -> Result<Self> {
        Ok(Self::with_http(
            Arc::new(XHttp::new(settings)?),
            &settings.upload_base,
        ))
    }

    pub(crate) fn with_http(http: Arc<XHttp>, upload_base: &str) -> Self {
        Self {
            http,
            upload_url: format!("{}/1.1/media/upload.json", upload_base.trim_end_matches('/')),
        }
    }

    async fn simple_upload(&self, media: &MediaBlob) -> Result<MediaRef> {
        let query = [("media_category", "tweet_image".to_string())];
        let resp = self
            .http
            .execute("media upload", || {
                Ok(self
                    .http
                    .signed(Method::POST, &self.upload_url, &query)?
                    .multipart(media_form(&media.bytes, &media.mime_type)?))
            })
            .await?;

        let uploaded = parse_upload(resp).await?;
        Ok(MediaRef(uploaded.media_id_string))
    }

    async fn chunked_upload(&self, media: &MediaBlob) -> Result<MediaRef> {
        let init_query = [
            ("command", "INIT".to_string()),
            ("total_bytes", media.len().to_string()),
            ("media_type", media.mime_type.clone()),
            ("media_category", "tweet_video".to_string()),
        ];
        let resp = self
            .http
            .execute("media INIT", || {
                self.http.signed(Method::POST, &self.upload_url, &init_query)
            })
            .await?;
        let media_id = parse_upload(resp).await?.media_id_string;

        for (index, chunk) in media.bytes.chunks(CHUNK_SIZE).enumerate() {
            let query = [
                ("command", "APPEND".to_string()),
                ("media_id", media_id.clone()),
                ("segment_index", index.to_string()),
            ];
            self.http
                .execute("media APPEND", || {
                    Ok(self
                        .http
                        .signed(Method::POST, &self.upload_url, &query)?
                        .multipart(media_form(chunk, &media.mime_type)?))
                })
                .await?;
        }

        let finalize_query = [
            ("command", "FINALIZE".to_string()),
            ("media_id", media_id.clone()),
        ];
        let resp = self
            .http
            .execute("media FINALIZE", || {
                self.http
                    .signed(Method::POST, &self.upload_url, &finalize_query)
            })
            .await?;
        let finalized = parse_upload(resp).await?;

        if let Some(info) = finalized.processing_info {
            self.wait_for_processing(&media_id, info).await?;
        }

        tracing::info!(media_id = %media_id, bytes = media.len(), "video uploaded");
        Ok(MediaRef(media_id))
    }

    async fn wait_for_processing(&self, media_id: &str, mut info: ProcessingInfo) -> Result<()> {
        let status_query = [
            ("command", "STATUS".to_string()),
            ("media_id", media_id.to_string()),
        ];

        for _ in 0..MAX_STATUS_POLLS {
            match info.state.as_str() {
                "succeeded" => return Ok(()),
                "failed" => {
                    let detail = info
                        .error
                        .as_ref()
                        .and_then(|e| e.message.clone().or_else(|| e.name.clone()))
                        .unwrap_or_else(|| "unknown reason".to_string());
                    return Err(Error::Api {
                        status: 400,
                        message: format!("media processing failed: {detail}"),
                    });
                }
                _ => {}
            }

            let wait = Duration::from_secs(info.check_after_secs.unwrap_or(1));
            tracing::debug!(media_id, state = %info.state, wait_secs = wait.as_secs(), "media processing");
            sleep(wait).await;

            let resp = self
                .http
                .execute("media STATUS", || {
                    self.http.signed(Method::GET, &self.upload_url, &status_query)
                })
                .await?;
            match parse_upload(resp).await?.processing_info {
                Some(next) => info = next,
                None => return Ok(()),
            }
        }

        Err(Error::External(format!(
            "media {media_id} still processing after {MAX_STATUS_POLLS} status checks"
        )))
    }
}

fn media_form(bytes: &[u8], mime_type: &str) -> Result<Form> {
    let part = Part::bytes(bytes.to_vec())
        .file_name("media")
        .mime_str(mime_type)
        .map_err(|e| Error::External(format!("x multipart error: {e}")))?;
    Ok(Form::new().part("media", part))
}

async fn parse_upload(resp: Response) -> Result<UploadResponse> {
    resp.json()
        .await
        .map_err(|e| Error::External(format!("x media upload response: {e}")))
}

#[async_trait]
impl MediaUploadPort for TwitterMediaClient {
    async fn upload_media(&self, media: &MediaBlob) -> Result<MediaRef> {
        match media.kind {
            MediaKind::Image => self.simple_upload(media).await,
            MediaKind::Video => self.chunked_upload(media).await,
        }
    }
}

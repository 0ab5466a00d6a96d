use std::sync::Arc;

use crate::{
    attachment::{self, MediaBlob, ResolveError},
    clients::LazyApiClients,
    domain::{AttachmentKind, InboundMessage, PostId},
    errors::Error,
    length::{self, TooLong},
    ports::AttachmentFetcher,
    sanitize::sanitize,
    Result,
};

/// Why a publish attempt failed after passing validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FailureCause {
    /// The posting platform reported a server-side error.
    Platform { status: u16 },
    /// The attachment could not be downloaded from the chat platform.
    AttachmentFetch,
    Unknown,
}

/// Terminal state of one publish attempt. Never retried by the core.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PostOutcome {
    Published { post_id: PostId },
    RejectedTooLong { limit: usize, actual: usize },
    RejectedAttachmentType { kind: AttachmentKind },
    RejectedEmpty,
    Failed { cause: FailureCause },
}

impl PostOutcome {
    pub fn is_published(&self) -> bool {
        matches!(self, PostOutcome::Published { .. })
    }

    /// User-facing status line. Internal error detail stays in the log.
    pub fn notification(&self) -> String {
        match self {
            PostOutcome::Published { .. } => "Tweet published successfully".to_string(),
            PostOutcome::RejectedTooLong { limit, actual } => format!(
                "Tweet rejected: text is {actual} characters long, the limit is {limit}"
            ),
            PostOutcome::RejectedAttachmentType { kind } => format!(
                "Tweet rejected: {} attachments cannot be published, send a photo or a video",
                kind.label()
            ),
            PostOutcome::RejectedEmpty => "Tweet rejected: nothing to publish".to_string(),
            PostOutcome::Failed {
                cause: FailureCause::Platform { status },
            } => format!("Error: X server error ({status}), tweet not published"),
            PostOutcome::Failed {
                cause: FailureCause::AttachmentFetch,
            } => "Error: could not download the attachment, tweet not published".to_string(),
            PostOutcome::Failed {
                cause: FailureCause::Unknown,
            } => "Unknown error, tweet not published".to_string(),
        }
    }
}

fn failure(err: &Error) -> PostOutcome {
    let cause = match err {
        Error::Platform { status, .. } => FailureCause::Platform { status: *status },
        Error::AttachmentFetch(_) => FailureCause::AttachmentFetch,
        _ => FailureCause::Unknown,
    };
    tracing::error!(?cause, "publish failed: {err}");
    PostOutcome::Failed { cause }
}

/// sanitize → validate → (resolve + upload) → post.
pub struct Publisher {
    clients: Arc<LazyApiClients>,
    fetcher: Arc<dyn AttachmentFetcher>,
}

impl Publisher {
    pub fn new(clients: Arc<LazyApiClients>, fetcher: Arc<dyn AttachmentFetcher>) -> Self {
        Self { clients, fetcher }
    }

    pub async fn publish(&self, msg: &InboundMessage) -> PostOutcome {
        let text = sanitize(msg.rich_text());

        if let Err(TooLong { limit, actual }) = length::validate(&text) {
            tracing::info!(limit, actual, "post rejected: too long");
            return PostOutcome::RejectedTooLong { limit, actual };
        }

        let media = if msg.has_attachment() {
            match attachment::resolve(&msg.attachments, self.fetcher.as_ref()).await {
                Ok(blob) => Some(blob),
                Err(ResolveError::UnsupportedType(kind)) => {
                    tracing::info!(kind = kind.label(), "post rejected: unsupported attachment");
                    return PostOutcome::RejectedAttachmentType { kind };
                }
                Err(ResolveError::Fetch(e)) => return failure(&e),
                Err(ResolveError::Missing) => None,
            }
        } else {
            None
        };

        if media.is_none() && text.trim().is_empty() {
            tracing::info!("post rejected: empty");
            return PostOutcome::RejectedEmpty;
        }

        // `media` is dropped when this attempt returns, whatever the result.
        match self.submit(&text, media.as_ref()).await {
            Ok(post_id) => {
                tracing::info!(post_id = %post_id.0, with_media = media.is_some(), "post published");
                PostOutcome::Published { post_id }
            }
            Err(e) => failure(&e),
        }
    }

    async fn submit(&self, text: &str, media: Option<&MediaBlob>) -> Result<PostId> {
        let clients = self.clients.get().await?;
        let media_ref = match media {
            Some(blob) => Some(clients.media.upload_media(blob).await?),
            None => None,
        };
        clients.posts.create_post(text, media_ref.as_ref()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        clients::ApiClients,
        domain::MediaRef,
        test_support::{descriptor, message, FakeFetcher, FakeMedia, FakePosts, PostBehavior},
    };

    struct Harness {
        media: Arc<FakeMedia>,
        posts: Arc<FakePosts>,
        fetcher: Arc<FakeFetcher>,
        publisher: Publisher,
    }

    fn harness(behavior: PostBehavior, fetcher: FakeFetcher) -> Harness {
        let media = Arc::new(FakeMedia::default());
        let posts = Arc::new(FakePosts::with_behavior(behavior));
        let fetcher = Arc::new(fetcher);
        let clients = Arc::new(LazyApiClients::ready(ApiClients {
            media: media.clone(),
            posts: posts.clone(),
        }));
        let publisher = Publisher::new(clients, fetcher.clone());
        Harness {
            media,
            posts,
            fetcher,
            publisher,
        }
    }

    #[tokio::test]
    async fn text_only_post_is_sanitized() {
        let h = harness(PostBehavior::Succeed, FakeFetcher::default());

        let out = h
            .publisher
            .publish(&message(1, "Hello <b>world</b>", vec![]))
            .await;

        assert!(out.is_published());
        assert_eq!(h.posts.posts(), vec![("Hello world".to_string(), None)]);
        assert_eq!(h.media.upload_count(), 0);
    }

    #[tokio::test]
    async fn too_long_never_posts() {
        let h = harness(PostBehavior::Succeed, FakeFetcher::default());

        let out = h.publisher.publish(&message(1, &"x".repeat(300), vec![])).await;

        assert_eq!(
            out,
            PostOutcome::RejectedTooLong {
                limit: 280,
                actual: 300
            }
        );
        assert!(h.posts.posts().is_empty());
    }

    #[tokio::test]
    async fn length_is_measured_after_sanitizing() {
        let h = harness(PostBehavior::Succeed, FakeFetcher::default());
        let raw = format!("<b>{}</b>", "y".repeat(278));
        assert!(raw.chars().count() > 280);

        let out = h.publisher.publish(&message(1, &raw, vec![])).await;

        assert!(out.is_published());
    }

    #[tokio::test]
    async fn anchor_urls_count_toward_length() {
        let h = harness(PostBehavior::Succeed, FakeFetcher::default());
        let raw = format!(r#"{} <a href="https://example.com/a/long/path">x</a>"#, "z".repeat(250));

        let out = h.publisher.publish(&message(1, &raw, vec![])).await;

        assert!(matches!(out, PostOutcome::RejectedTooLong { .. }));
    }

    #[tokio::test]
    async fn photo_is_uploaded_then_posted() {
        let h = harness(PostBehavior::Succeed, FakeFetcher::default());
        let atts = vec![
            descriptor("small", AttachmentKind::Photo),
            descriptor("large", AttachmentKind::Photo),
        ];

        let out = h.publisher.publish(&message(1, "caption", atts)).await;

        assert!(out.is_published());
        assert_eq!(h.fetcher.fetched(), vec!["large".to_string()]);
        assert_eq!(h.media.upload_count(), 1);
        assert_eq!(
            h.posts.posts(),
            vec![("caption".to_string(), Some(MediaRef("media-1".to_string())))]
        );
    }

    #[tokio::test]
    async fn media_without_caption_is_allowed() {
        let h = harness(PostBehavior::Succeed, FakeFetcher::default());
        let mut msg = message(1, "", vec![descriptor("p", AttachmentKind::Photo)]);
        msg.text = None;

        assert!(h.publisher.publish(&msg).await.is_published());
    }

    #[tokio::test]
    async fn unsupported_attachment_skips_upload() {
        let h = harness(PostBehavior::Succeed, FakeFetcher::default());
        let atts = vec![descriptor("s", AttachmentKind::Sticker)];

        let out = h.publisher.publish(&message(1, "hi", atts)).await;

        assert_eq!(
            out,
            PostOutcome::RejectedAttachmentType {
                kind: AttachmentKind::Sticker
            }
        );
        assert_eq!(h.media.upload_count(), 0);
        assert!(h.fetcher.fetched().is_empty());
        assert!(h.posts.posts().is_empty());
    }

    #[tokio::test]
    async fn fetch_failure_is_reported() {
        let h = harness(PostBehavior::Succeed, FakeFetcher::failing());
        let atts = vec![descriptor("p", AttachmentKind::Photo)];

        let out = h.publisher.publish(&message(1, "hi", atts)).await;

        assert_eq!(
            out,
            PostOutcome::Failed {
                cause: FailureCause::AttachmentFetch
            }
        );
        assert!(h.posts.posts().is_empty());
    }

    #[tokio::test]
    async fn empty_text_without_media_is_rejected() {
        let h = harness(PostBehavior::Succeed, FakeFetcher::default());

        let out = h.publisher.publish(&message(1, "<b> </b>", vec![])).await;

        assert_eq!(out, PostOutcome::RejectedEmpty);
        assert!(h.posts.posts().is_empty());
    }

    #[tokio::test]
    async fn server_errors_are_platform_failures() {
        let h = harness(PostBehavior::ServerError(503), FakeFetcher::default());

        let out = h.publisher.publish(&message(1, "hi", vec![])).await;

        assert_eq!(
            out,
            PostOutcome::Failed {
                cause: FailureCause::Platform { status: 503 }
            }
        );
        assert_eq!(
            out.notification(),
            "Error: X server error (503), tweet not published"
        );
    }

    #[tokio::test]
    async fn client_errors_are_unknown_failures() {
        let h = harness(PostBehavior::Rejected(403), FakeFetcher::default());

        let out = h.publisher.publish(&message(1, "hi", vec![])).await;

        assert_eq!(
            out,
            PostOutcome::Failed {
                cause: FailureCause::Unknown
            }
        );
        assert!(!out.notification().contains("duplicate"));
    }

    #[tokio::test]
    async fn client_build_failure_is_unknown() {
        let fetcher = Arc::new(FakeFetcher::default());
        let clients = Arc::new(LazyApiClients::new(|| {
            Err(Error::Config("API_KEY is required".to_string()))
        }));
        let publisher = Publisher::new(clients, fetcher);

        let out = publisher.publish(&message(1, "hi", vec![])).await;

        assert_eq!(
            out,
            PostOutcome::Failed {
                cause: FailureCause::Unknown
            }
        );
    }

    #[test]
    fn notifications_are_fixed_format() {
        assert_eq!(
            PostOutcome::Published {
                post_id: PostId("1".to_string())
            }
            .notification(),
            "Tweet published successfully"
        );
        assert_eq!(
            PostOutcome::RejectedTooLong {
                limit: 280,
                actual: 300
            }
            .notification(),
            "Tweet rejected: text is 300 characters long, the limit is 280"
        );
    }
}

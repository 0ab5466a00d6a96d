//! Hexagonal ports. Telegram and X live behind these traits in adapter crates.

use async_trait::async_trait;

use crate::{
    attachment::MediaBlob,
    domain::{AttachmentDescriptor, ChatId, MediaRef, PostId},
    Result,
};

/// Outbound chat messaging (operator notifications).
#[async_trait]
pub trait MessagingPort: Send + Sync {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<()>;
}

/// Downloads attachment bytes from the chat platform.
#[async_trait]
pub trait AttachmentFetcher: Send + Sync {
    async fn fetch(&self, attachment: &AttachmentDescriptor) -> Result<Vec<u8>>;
}

/// Binary media upload on the posting platform.
#[async_trait]
pub trait MediaUploadPort: Send + Sync {
    async fn upload_media(&self, media: &MediaBlob) -> Result<MediaRef>;
}

/// Post creation on the posting platform.
#[async_trait]
pub trait PostPort: Send + Sync {
    async fn create_post(&self, text: &str, media: Option<&MediaRef>) -> Result<PostId>;
}

use async_trait::async_trait;

use teloxide::{net::Download, prelude::*};

use xrelay_core::{domain::AttachmentDescriptor, errors::Error, ports::AttachmentFetcher, Result};

/// Downloads attachments through the Bot API straight into memory.
#[derive(Clone)]
pub struct TelegramFiles {
    bot: Bot,
}

impl TelegramFiles {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl AttachmentFetcher for TelegramFiles {
    async fn fetch(&self, attachment: &AttachmentDescriptor) -> Result<Vec<u8>> {
        let file = self
            .bot
            .get_file(attachment.file_id.clone())
            .await
            .map_err(|e| Error::AttachmentFetch(format!("getFile failed: {e}")))?;

        let mut buf = Vec::new();
        self.bot
            .download_file(&file.path, &mut buf)
            .await
            .map_err(|e| Error::AttachmentFetch(format!("download failed: {e}")))?;

        Ok(buf)
    }
}

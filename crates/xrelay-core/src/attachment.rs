use crate::{
    domain::{AttachmentDescriptor, AttachmentKind, MediaKind},
    errors::Error,
    ports::AttachmentFetcher,
};

/// Attachment bytes held in memory for the duration of one publish attempt.
///
/// Dropping the blob releases the buffer; nothing is written to disk.
#[derive(Clone, Debug)]
pub struct MediaBlob {
    pub kind: MediaKind,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl MediaBlob {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[derive(Debug)]
pub enum ResolveError {
    /// Nothing to resolve.
    Missing,
    /// The attachment kind cannot be posted; nothing was downloaded.
    UnsupportedType(AttachmentKind),
    /// Download from the chat platform failed.
    Fetch(Error),
}

/// Decide whether an attachment can be posted, and as what.
pub fn classify(attachment: &AttachmentDescriptor) -> Option<(MediaKind, String)> {
    let mime = attachment.mime_type.as_deref().map(|m| m.to_ascii_lowercase());
    match attachment.kind {
        // Telegram re-encodes photos as JPEG.
        AttachmentKind::Photo => Some((
            MediaKind::Image,
            mime.unwrap_or_else(|| "image/jpeg".to_string()),
        )),
        // Telegram animations are silent MP4s.
        AttachmentKind::Video | AttachmentKind::Animation => Some((
            MediaKind::Video,
            mime.unwrap_or_else(|| "video/mp4".to_string()),
        )),
        AttachmentKind::Document => match mime {
            Some(m) if m.starts_with("image/") => Some((MediaKind::Image, m)),
            Some(m) if m.starts_with("video/") => Some((MediaKind::Video, m)),
            _ => None,
        },
        AttachmentKind::Audio
        | AttachmentKind::Voice
        | AttachmentKind::Sticker
        | AttachmentKind::VideoNote => None,
    }
}

/// Pick the highest-quality attachment, check its type, and download it.
pub async fn resolve(
    attachments: &[AttachmentDescriptor],
    fetcher: &dyn AttachmentFetcher,
) -> Result<MediaBlob, ResolveError> {
    let best = attachments.last().ok_or(ResolveError::Missing)?;
    let (kind, mime_type) = classify(best).ok_or(ResolveError::UnsupportedType(best.kind))?;

    let bytes = fetcher.fetch(best).await.map_err(|e| match e {
        Error::AttachmentFetch(_) => ResolveError::Fetch(e),
        other => ResolveError::Fetch(Error::AttachmentFetch(other.to_string())),
    })?;

    tracing::debug!(
        file_id = %best.file_id,
        bytes = bytes.len(),
        mime = %mime_type,
        "attachment downloaded"
    );

    Ok(MediaBlob {
        kind,
        mime_type,
        bytes,
    })
}

/// Telegram user id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UserId(pub i64);

/// Telegram chat id (numeric). Channels and groups are negative.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);

/// Who sent an inbound message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sender {
    pub id: UserId,
    pub name: String,
    pub username: Option<String>,
}

impl Sender {
    /// `@handle` when the sender has one, otherwise the display name.
    pub fn handle(&self) -> String {
        match self.username.as_deref() {
            Some(u) if !u.trim().is_empty() => format!("@{u}"),
            _ => self.name.clone(),
        }
    }
}

/// What kind of file the chat platform attached.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttachmentKind {
    Photo,
    Video,
    Animation,
    Document,
    Audio,
    Voice,
    Sticker,
    VideoNote,
}

impl AttachmentKind {
    pub fn label(self) -> &'static str {
        match self {
            AttachmentKind::Photo => "photo",
            AttachmentKind::Video => "video",
            AttachmentKind::Animation => "animation",
            AttachmentKind::Document => "document",
            AttachmentKind::Audio => "audio",
            AttachmentKind::Voice => "voice",
            AttachmentKind::Sticker => "sticker",
            AttachmentKind::VideoNote => "video note",
        }
    }
}

/// Handle to a file that still lives on the chat platform.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttachmentDescriptor {
    pub file_id: String,
    pub kind: AttachmentKind,
    pub mime_type: Option<String>,
}

/// A message as delivered by the inbound transport.
///
/// `text` holds the body for plain messages and the caption for messages with
/// attachments, already rendered to HTML. Attachments are ordered by ascending
/// quality.
#[derive(Clone, Debug)]
pub struct InboundMessage {
    pub chat_id: ChatId,
    pub sender: Sender,
    pub text: Option<String>,
    pub attachments: Vec<AttachmentDescriptor>,
}

impl InboundMessage {
    pub fn has_attachment(&self) -> bool {
        !self.attachments.is_empty()
    }

    pub fn rich_text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }
}

/// Media category accepted by the posting platform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

/// Opaque media id returned by the posting platform after an upload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaRef(pub String);

/// Id of a published post.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PostId(pub String);

//! Telegram `Message` → core `InboundMessage`.

use teloxide::types::{Message, MessageEntity, MessageEntityKind};

use xrelay_core::{
    domain::{AttachmentDescriptor, AttachmentKind, ChatId, InboundMessage, Sender, UserId},
    formatting::{render_html, EntityStyle, TextEntity},
};

fn style_of(kind: &MessageEntityKind) -> Option<EntityStyle> {
    match kind {
        MessageEntityKind::Bold => Some(EntityStyle::Bold),
        MessageEntityKind::Italic => Some(EntityStyle::Italic),
        MessageEntityKind::Underline => Some(EntityStyle::Underline),
        MessageEntityKind::Strikethrough => Some(EntityStyle::Strikethrough),
        MessageEntityKind::Spoiler => Some(EntityStyle::Spoiler),
        MessageEntityKind::Code => Some(EntityStyle::Code),
        MessageEntityKind::Pre { language } => Some(EntityStyle::Pre {
            language: language.clone(),
        }),
        MessageEntityKind::TextLink { url } => Some(EntityStyle::TextLink {
            url: url.as_str().to_string(),
        }),
        // Mentions, hashtags, plain URLs etc. are already literal text.
        _ => None,
    }
}

fn to_entities(entities: Option<&[MessageEntity]>) -> Vec<TextEntity> {
    entities
        .unwrap_or_default()
        .iter()
        .filter_map(|e| {
            style_of(&e.kind).map(|style| TextEntity {
                offset: e.offset,
                length: e.length,
                style,
            })
        })
        .collect()
}

fn mime_of<M: std::fmt::Display>(m: Option<&M>) -> Option<String> {
    m.map(|m| m.to_string())
}

/// Attachments ordered by ascending quality (photo sizes come that way).
pub fn attachments(msg: &Message) -> Vec<AttachmentDescriptor> {
    let one = |file_id: &str, kind: AttachmentKind, mime_type: Option<String>| {
        vec![AttachmentDescriptor {
            file_id: file_id.to_string(),
            kind,
            mime_type,
        }]
    };

    if let Some(sizes) = msg.photo() {
        return sizes
            .iter()
            .map(|p| AttachmentDescriptor {
                file_id: p.file.id.clone(),
                kind: AttachmentKind::Photo,
                mime_type: None,
            })
            .collect();
    }
    // Animations also carry a `document`; check them first.
    if let Some(a) = msg.animation() {
        return one(&a.file.id, AttachmentKind::Animation, mime_of(a.mime_type.as_ref()));
    }
    if let Some(v) = msg.video() {
        return one(&v.file.id, AttachmentKind::Video, mime_of(v.mime_type.as_ref()));
    }
    if let Some(d) = msg.document() {
        return one(&d.file.id, AttachmentKind::Document, mime_of(d.mime_type.as_ref()));
    }
    if let Some(a) = msg.audio() {
        return one(&a.file.id, AttachmentKind::Audio, mime_of(a.mime_type.as_ref()));
    }
    if let Some(v) = msg.voice() {
        return one(&v.file.id, AttachmentKind::Voice, mime_of(v.mime_type.as_ref()));
    }
    if let Some(s) = msg.sticker() {
        return one(&s.file.id, AttachmentKind::Sticker, None);
    }
    if let Some(v) = msg.video_note() {
        return one(&v.file.id, AttachmentKind::VideoNote, None);
    }
    Vec::new()
}

fn sender(msg: &Message) -> Sender {
    if let Some(user) = msg.from() {
        return Sender {
            id: UserId(user.id.0 as i64),
            name: user.full_name(),
            username: user.username.clone(),
        };
    }
    // Channel posts have no user; the channel speaks for itself.
    Sender {
        id: UserId(msg.chat.id.0),
        name: msg.chat.title().unwrap_or("unknown").to_string(),
        username: msg.chat.username().map(|s| s.to_string()),
    }
}

/// Map a Telegram message into the core model.
///
/// Returns `None` for bot commands and for messages carrying neither text nor
/// an attachment; those never reach the relay.
pub fn from_message(msg: &Message) -> Option<InboundMessage> {
    if msg.text().map(|t| t.starts_with('/')).unwrap_or(false) {
        return None;
    }

    let attachments = attachments(msg);
    let text = if attachments.is_empty() {
        msg.text()
            .map(|t| render_html(t, &to_entities(msg.entities())))
    } else {
        msg.caption()
            .map(|c| render_html(c, &to_entities(msg.caption_entities())))
    };

    if text.is_none() && attachments.is_empty() {
        return None;
    }

    Some(InboundMessage {
        chat_id: ChatId(msg.chat.id.0),
        sender: sender(msg),
        text,
        attachments,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn parse(v: serde_json::Value) -> Message {
        serde_json::from_value(v).unwrap()
    }

    fn private_chat() -> serde_json::Value {
        json!({ "id": 4242, "type": "private", "first_name": "Grace" })
    }

    fn user() -> serde_json::Value {
        json!({ "id": 4242, "is_bot": false, "first_name": "Grace", "last_name": "Hopper", "username": "grace" })
    }

    #[test]
    fn text_message_renders_entities() {
        let msg = parse(json!({
            "message_id": 1,
            "date": 1700000000,
            "chat": private_chat(),
            "from": user(),
            "text": "Hello world & docs",
            "entities": [
                { "type": "bold", "offset": 6, "length": 5 },
                { "type": "text_link", "offset": 14, "length": 4, "url": "https://example.com/" }
            ]
        }));

        let inbound = from_message(&msg).unwrap();

        assert_eq!(inbound.chat_id, ChatId(4242));
        assert_eq!(inbound.sender.id, UserId(4242));
        assert_eq!(inbound.sender.handle(), "@grace");
        assert_eq!(inbound.sender.name, "Grace Hopper");
        assert!(inbound.attachments.is_empty());
        assert_eq!(
            inbound.text.as_deref(),
            Some(r#"Hello <b>world</b> &amp; <a href="https://example.com/">docs</a>"#)
        );
    }

    #[test]
    fn photo_sizes_keep_order_and_use_caption() {
        let msg = parse(json!({
            "message_id": 2,
            "date": 1700000000,
            "chat": private_chat(),
            "from": user(),
            "photo": [
                { "file_id": "small", "file_unique_id": "s", "width": 90, "height": 90, "file_size": 1000 },
                { "file_id": "large", "file_unique_id": "l", "width": 1280, "height": 1280, "file_size": 90000 }
            ],
            "caption": "look"
        }));

        let inbound = from_message(&msg).unwrap();

        let ids: Vec<_> = inbound.attachments.iter().map(|a| a.file_id.as_str()).collect();
        assert_eq!(ids, vec!["small", "large"]);
        assert!(inbound
            .attachments
            .iter()
            .all(|a| a.kind == AttachmentKind::Photo));
        assert_eq!(inbound.text.as_deref(), Some("look"));
    }

    #[test]
    fn channel_post_uses_channel_as_sender() {
        let msg = parse(json!({
            "message_id": 3,
            "date": 1700000000,
            "chat": { "id": -1001234, "type": "channel", "title": "News", "username": "newsroom" },
            "text": "breaking"
        }));

        let inbound = from_message(&msg).unwrap();

        assert_eq!(inbound.chat_id, ChatId(-1001234));
        assert_eq!(inbound.sender.id, UserId(-1001234));
        assert_eq!(inbound.sender.handle(), "@newsroom");
    }

    #[test]
    fn commands_are_ignored() {
        let msg = parse(json!({
            "message_id": 4,
            "date": 1700000000,
            "chat": private_chat(),
            "from": user(),
            "text": "/start",
            "entities": [{ "type": "bot_command", "offset": 0, "length": 6 }]
        }));

        assert!(from_message(&msg).is_none());
    }
}

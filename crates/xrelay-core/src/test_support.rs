//! In-memory port fakes shared by the unit tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::{
    attachment::MediaBlob,
    domain::{
        AttachmentDescriptor, AttachmentKind, ChatId, InboundMessage, MediaRef, PostId, Sender,
        UserId,
    },
    errors::Error,
    ports::{AttachmentFetcher, MediaUploadPort, MessagingPort, PostPort},
    Result,
};

pub fn descriptor(file_id: &str, kind: AttachmentKind) -> AttachmentDescriptor {
    AttachmentDescriptor {
        file_id: file_id.to_string(),
        kind,
        mime_type: None,
    }
}

pub fn message(chat_id: i64, text: &str, attachments: Vec<AttachmentDescriptor>) -> InboundMessage {
    InboundMessage {
        chat_id: ChatId(chat_id),
        sender: Sender {
            id: UserId(4242),
            name: "Grace Hopper".to_string(),
            username: Some("grace".to_string()),
        },
        text: Some(text.to_string()),
        attachments,
    }
}

#[derive(Default)]
pub struct FakeFetcher {
    fail: bool,
    fetched: Mutex<Vec<String>>,
}

impl FakeFetcher {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl AttachmentFetcher for FakeFetcher {
    async fn fetch(&self, attachment: &AttachmentDescriptor) -> Result<Vec<u8>> {
        self.fetched.lock().unwrap().push(attachment.file_id.clone());
        if self.fail {
            return Err(Error::External("download interrupted".to_string()));
        }
        Ok(format!("bytes:{}", attachment.file_id).into_bytes())
    }
}

#[derive(Default)]
pub struct FakeMedia {
    uploads: Mutex<Vec<usize>>,
}

impl FakeMedia {
    pub fn upload_count(&self) -> usize {
        self.uploads.lock().unwrap().len()
    }
}

#[async_trait]
impl MediaUploadPort for FakeMedia {
    async fn upload_media(&self, media: &MediaBlob) -> Result<MediaRef> {
        let mut uploads = self.uploads.lock().unwrap();
        uploads.push(media.len());
        Ok(MediaRef(format!("media-{}", uploads.len())))
    }
}

/// What the fake post API does when called.
#[derive(Clone, Debug, Default)]
pub enum PostBehavior {
    #[default]
    Succeed,
    ServerError(u16),
    Rejected(u16),
}

#[derive(Default)]
pub struct FakePosts {
    behavior: PostBehavior,
    posts: Mutex<Vec<(String, Option<MediaRef>)>>,
}

impl FakePosts {
    pub fn with_behavior(behavior: PostBehavior) -> Self {
        Self {
            behavior,
            ..Self::default()
        }
    }

    pub fn posts(&self) -> Vec<(String, Option<MediaRef>)> {
        self.posts.lock().unwrap().clone()
    }
}

#[async_trait]
impl PostPort for FakePosts {
    async fn create_post(&self, text: &str, media: Option<&MediaRef>) -> Result<PostId> {
        self.posts
            .lock()
            .unwrap()
            .push((text.to_string(), media.cloned()));
        match self.behavior {
            PostBehavior::Succeed => Ok(PostId("1700000000000000000".to_string())),
            PostBehavior::ServerError(status) => Err(Error::Platform {
                status,
                message: "Service Unavailable".to_string(),
            }),
            PostBehavior::Rejected(status) => Err(Error::Api {
                status,
                message: "duplicate content".to_string(),
            }),
        }
    }
}

#[derive(Default)]
pub struct FakeMessenger {
    fail: bool,
    sent: Mutex<Vec<(ChatId, String)>>,
}

impl FakeMessenger {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<(ChatId, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessagingPort for FakeMessenger {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<()> {
        self.sent.lock().unwrap().push((chat_id, text.to_string()));
        if self.fail {
            return Err(Error::External("telegram error: bot was blocked".to_string()));
        }
        Ok(())
    }
}

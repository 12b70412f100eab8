use brusio_core::{ContentType, MessageVM, UserVM};
use url::Url;

use crate::error::ServiceError;
use crate::repository::{Message, MessageRepository};

/// Orchestrates the message store and the content renderer. Holds no
/// cross-request state beyond the repository handle; the repository is
/// injected at construction.
#[derive(Clone)]
pub struct MessageService {
    repository: MessageRepository,
}

impl MessageService {
    pub fn new(repository: MessageRepository) -> Self {
        Self { repository }
    }

    /// Latest messages, oldest-first, rendered and converted to the view
    /// shape.
    pub async fn latest(&self) -> Result<Vec<MessageVM>, ServiceError> {
        let messages = self.repository.find_latest().await?;
        messages.iter().map(to_message_vm).collect()
    }

    /// Messages after the one identified by `message_id`; an unknown id
    /// falls back to the latest window.
    pub async fn after(&self, message_id: &str) -> Result<Vec<MessageVM>, ServiceError> {
        let messages = self.repository.find_latest_after(message_id).await?;
        messages.iter().map(to_message_vm).collect()
    }

    /// Stores a posted message. `content` is kept as raw source under the
    /// given content type; rendering happens only on subsequent reads.
    pub async fn post(
        &self,
        message: MessageVM,
        content_type: ContentType,
    ) -> Result<(), ServiceError> {
        self.repository.save(to_message(message, content_type)).await?;
        Ok(())
    }
}

fn to_message_vm(message: &Message) -> Result<MessageVM, ServiceError> {
    // The one place the stored avatar link is parsed; written unvalidated,
    // so fail fast here rather than hand a bogus URL to clients.
    let avatar_image_link =
        Url::parse(&message.user_avatar_image_link).map_err(|source| ServiceError::Rendering {
            link: message.user_avatar_image_link.clone(),
            source,
        })?;
    Ok(MessageVM {
        id: message.id.clone(),
        content: message.content_type.render(&message.content),
        user: UserVM {
            name: message.username.clone(),
            avatar_image_link,
        },
        sent: message.sent,
    })
}

fn to_message(message: MessageVM, content_type: ContentType) -> Message {
    Message {
        id: None, // store-assigned; any id a client sent along is ignored
        content: message.content,
        content_type,
        sent: message.sent,
        username: message.user.name,
        user_avatar_image_link: message.user.avatar_image_link.to_string(),
    }
}

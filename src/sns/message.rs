//! Chat rendering of SNS notifications.

use crate::core::models::{Attachment, AttachmentField, SnsPayload};
use crate::slack::escape_text;

/// Topic name without the ARN prefix, e.g. `my-topic` for
/// `arn:aws:sns:us-east-1:123:my-topic`.
#[must_use]
pub fn short_topic(topic_arn: &str) -> &str {
    topic_arn
        .rfind(':')
        .map_or(topic_arn, |idx| &topic_arn[idx + 1..])
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    pub text: String,
    pub attachment: Attachment,
}

/// Renders a notification as message text plus a Subject/Message/Time attachment.
///
/// The Subject field is only present when the payload carries a non-empty subject.
#[must_use]
pub fn build_notification(payload: &SnsPayload) -> NotificationMessage {
    let text = format!("Notification from {}", escape_text(payload.topic_arn()));

    let mut fields = Vec::with_capacity(3);

    if let Some(subject) = payload.subject.as_deref().filter(|s| !s.is_empty()) {
        fields.push(AttachmentField {
            title: "Subject".to_string(),
            value: escape_text(subject),
            short: false,
        });
    }

    fields.push(AttachmentField {
        title: "Message".to_string(),
        value: escape_text(payload.message.as_deref().unwrap_or("")),
        short: false,
    });

    fields.push(AttachmentField {
        title: "Time".to_string(),
        value: escape_text(payload.timestamp.as_deref().unwrap_or("")),
        short: true,
    });

    NotificationMessage {
        text,
        attachment: Attachment { fields },
    }
}

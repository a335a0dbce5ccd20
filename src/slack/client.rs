//! Slack API client module
//!
//! Posts relayed notifications and lists the channels a hook can target.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::{Value, json};
use slack_morphism::hyper_tokio::{SlackClientHyperConnector, SlackHyperClient};
use slack_morphism::prelude::SlackApiConversationsListRequest;
use slack_morphism::{SlackApiToken, SlackApiTokenValue, SlackCursorId};
use tracing::{debug, warn};

use crate::core::models::{ChannelId, PostParams};
use crate::errors::HookError;
use crate::http::HTTP_CLIENT;
use crate::plugin::{ChannelDirectory, ChatPoster};

// Build the Slack client connector safely without panicking.
// If connector construction fails, store None and surface a HookError at call sites.
static SLACK_CLIENT: std::sync::LazyLock<Option<SlackHyperClient>> =
    std::sync::LazyLock::new(|| match SlackClientHyperConnector::new() {
        Ok(connector) => Some(SlackHyperClient::new(connector)),
        Err(e) => {
            warn!("Failed to create Slack HTTP connector: {}", e);
            None
        }
    });

const CHAT_POST_MESSAGE_URL: &str = "https://slack.com/api/chat.postMessage";

/// Page size for `conversations.list`; Slack caps it at 1000.
const CHANNEL_PAGE_LIMIT: u16 = 200;

/// Build the JSON payload for `chat.postMessage`.
#[must_use]
pub fn build_post_message_payload(text: &str, params: &PostParams) -> Value {
    let mut payload = json!({
        "channel": params.channel,
        "text": text,
        "username": params.username,
    });

    if !params.icon_emoji.is_empty() {
        payload["icon_emoji"] = Value::String(params.icon_emoji.clone());
    }

    if !params.icon_url.is_empty() {
        payload["icon_url"] = Value::String(params.icon_url.clone());
    }

    if !params.attachments.is_empty() {
        payload["attachments"] = json!(params.attachments);
    }

    payload
}

/// Slack Web API client bound to one bot token.
pub struct SlackClient {
    token: SlackApiToken,
}

impl SlackClient {
    #[must_use]
    pub fn new(token: String) -> Self {
        Self {
            token: SlackApiToken::new(SlackApiTokenValue::new(token)),
        }
    }

    /// Post a message with legacy attachments as a custom bot identity.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails or Slack returns an error.
    pub async fn post_message_with_attachments(
        &self,
        text: &str,
        params: &PostParams,
    ) -> Result<(), HookError> {
        let payload = build_post_message_payload(text, params);

        let resp = HTTP_CLIENT
            .post(CHAT_POST_MESSAGE_URL)
            .bearer_auth(&self.token.token_value.0)
            .json(&payload)
            .send()
            .await
            .map_err(|e| HookError::HttpError(format!("Failed to post message: {e}")))?;

        if !resp.status().is_success() {
            return Err(HookError::ApiError(format!(
                "chat.postMessage HTTP {}",
                resp.status()
            )));
        }

        let body: Value = resp.json().await.map_err(|e| {
            HookError::ApiError(format!("chat.postMessage JSON parse error: {e}"))
        })?;

        if !body.get("ok").and_then(Value::as_bool).unwrap_or(false) {
            return Err(HookError::ApiError(format!(
                "chat.postMessage error: {}",
                body.get("error")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown")
            )));
        }

        Ok(())
    }

    /// List non-archived public channels as `id -> #name`, following pagination.
    ///
    /// # Errors
    ///
    /// Returns an error if the Slack API call fails.
    pub async fn list_channels(&self) -> Result<BTreeMap<ChannelId, String>, HookError> {
        let session = SLACK_CLIENT
            .as_ref()
            .ok_or_else(|| {
                HookError::GeneralError("Slack HTTP connector not initialized".to_string())
            })?
            .open_session(&self.token);

        let mut channels = BTreeMap::new();
        let mut cursor: Option<SlackCursorId> = None;

        loop {
            let request = SlackApiConversationsListRequest::new()
                .with_exclude_archived(true)
                .with_limit(CHANNEL_PAGE_LIMIT)
                .opt_cursor(cursor.take());

            let resp = session.conversations_list(&request).await?;

            for info in resp.channels {
                let name = info.name.unwrap_or_else(|| info.id.0.clone());
                channels.insert(info.id.0, format!("#{name}"));
            }

            cursor = resp
                .response_metadata
                .and_then(|m| m.next_cursor)
                .filter(|c| !c.0.is_empty());

            if cursor.is_none() {
                break;
            }
        }

        debug!(count = channels.len(), "Fetched Slack channel list");
        Ok(channels)
    }
}

#[async_trait]
impl ChatPoster for SlackClient {
    async fn post_to_channel(&self, text: &str, params: &PostParams) -> Result<(), HookError> {
        self.post_message_with_attachments(text, params).await
    }
}

#[async_trait]
impl ChannelDirectory for SlackClient {
    async fn channels(&self) -> Result<BTreeMap<ChannelId, String>, HookError> {
        self.list_channels().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{Attachment, AttachmentField};

    fn params() -> PostParams {
        PostParams {
            channel: "C123ABC456".into(),
            username: "AWS Simple Notification Service".into(),
            icon_emoji: String::new(),
            icon_url: "https://hooks.example.com/plugins/aws_sns/icon_48.png".into(),
            attachments: Vec::new(),
        }
    }

    #[test]
    fn test_build_post_message_payload_minimal() {
        let payload = build_post_message_payload("hello", &params());

        assert_eq!(payload["channel"], "C123ABC456");
        assert_eq!(payload["text"], "hello");
        assert_eq!(payload["username"], "AWS Simple Notification Service");
        assert_eq!(
            payload["icon_url"],
            "https://hooks.example.com/plugins/aws_sns/icon_48.png"
        );
        assert!(payload.get("icon_emoji").is_none());
        assert!(payload.get("attachments").is_none());
    }

    #[test]
    fn test_build_post_message_payload_with_attachments() {
        let mut p = params();
        p.icon_emoji = ":rotating_light:".into();
        p.attachments = vec![Attachment {
            fields: vec![AttachmentField {
                title: "Time".into(),
                value: "2024-01-01T00:00:00Z".into(),
                short: true,
            }],
        }];

        let payload = build_post_message_payload("hello", &p);

        assert_eq!(payload["icon_emoji"], ":rotating_light:");
        let fields = payload["attachments"][0]["fields"]
            .as_array()
            .expect("fields array");
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0]["title"], "Time");
        assert_eq!(fields[0]["short"], true);
    }
}

use serde_json::{Value, json};
use tracing::{error, info, warn};

use super::message::{build_notification, short_topic};
use super::{AwsSnsPlugin, HEADER_MESSAGE_TYPE, HEADER_TOPIC_ARN};
use crate::core::models::{
    HandlerResult, InboundRequest, MessageExtras, PostParams, SnsMessageType, SnsPayload,
};
use crate::errors::HookError;

pub const ERR_NO_PAYLOAD: &str = "No payload received from SNS";
pub const ERR_SUBSCRIBE: &str = "Error subscribing to SNS topic";

/// Decodes the request body; SNS always sends a non-empty JSON object.
fn decode_body(body: &str) -> Option<Value> {
    let value: Value = serde_json::from_str(body).ok()?;
    match &value {
        Value::Object(map) if !map.is_empty() => Some(value),
        Value::Array(items) if !items.is_empty() => Some(value),
        _ => None,
    }
}

impl AwsSnsPlugin {
    pub(super) async fn on_hook(&self, request: &InboundRequest) -> HandlerResult {
        let Some(document) = decode_body(&request.body) else {
            warn!("Rejected SNS request without a JSON payload");
            return HandlerResult::failure(ERR_NO_PAYLOAD);
        };

        let topic_arn = request.header(HEADER_TOPIC_ARN).unwrap_or("");
        let Some(pattern) = self.topics.find_match(topic_arn) else {
            warn!(topic_arn = %topic_arn, "Topic not in allow-list");
            return HandlerResult::failure(format!(
                "Received notification from topic that was not defined in the hook instance's topic list: '{topic_arn}'"
            ));
        };

        let message_type = SnsMessageType::parse(request.header(HEADER_MESSAGE_TYPE).unwrap_or(""));
        let payload = SnsPayload::from_json(&document);
        info!(
            topic_arn = %topic_arn,
            pattern = %pattern,
            message_type = %message_type,
            message_id = payload.message_id.as_deref().unwrap_or(""),
            "Accepted SNS request"
        );

        match message_type {
            SnsMessageType::SubscriptionConfirmation => self.subscription_confirmation(&payload).await,
            SnsMessageType::Notification => self.notification(&payload).await,
            SnsMessageType::UnsubscribeConfirmation => Self::unsubscribe_confirmation(&payload),
            SnsMessageType::Unknown(raw) => HandlerResult::failure(format!(
                "Unknown X-Amz-Sns-Message-Type header received: '{raw}'"
            )),
        }
    }

    async fn subscription_confirmation(&self, payload: &SnsPayload) -> HandlerResult {
        let Some(url) = payload.subscribe_url.as_deref().filter(|u| !u.is_empty()) else {
            error!("SubscriptionConfirmation without SubscribeURL");
            return HandlerResult::failure(ERR_SUBSCRIBE)
                .with_extra("resp", json!({ "error": "missing SubscribeURL" }));
        };

        match self.services.http.get(url).await {
            Ok(resp) if resp.is_ok() => {
                info!(topic_arn = %payload.topic_arn(), "Confirmed SNS subscription");
                HandlerResult::success(format!("Subscribed to '{}'", payload.topic_arn()))
            }
            Ok(resp) => {
                error!(status = resp.status, "SNS subscription confirmation rejected");
                HandlerResult::failure(ERR_SUBSCRIBE)
                    .with_extra("resp", json!({ "status": resp.status, "body": resp.body }))
            }
            Err(e) => {
                error!("SNS subscription confirmation failed: {}", e);
                HandlerResult::failure(ERR_SUBSCRIBE)
                    .with_extra("resp", json!({ "error": e.to_string() }))
            }
        }
    }

    async fn notification(&self, payload: &SnsPayload) -> HandlerResult {
        let rendered = build_notification(payload);
        let extras = MessageExtras {
            attachments: vec![rendered.attachment],
            ..MessageExtras::default()
        };

        match self.send_message(&rendered.text, extras).await {
            Ok(_) => HandlerResult::success(short_topic(payload.topic_arn())),
            Err(e) => {
                error!(topic_arn = %payload.topic_arn(), "Failed to relay SNS notification: {}", e);
                HandlerResult::failure(format!("Error posting SNS notification: {e}"))
            }
        }
    }

    fn unsubscribe_confirmation(payload: &SnsPayload) -> HandlerResult {
        info!(topic_arn = %payload.topic_arn(), "SNS subscription removed");
        HandlerResult::success(format!("Unsubscribed from '{}'", payload.topic_arn()))
    }

    /// Posts `text` to the configured channel as the configured bot.
    ///
    /// `extras` override channel, username and icons where set; attachments are added.
    ///
    /// # Errors
    ///
    /// Returns the chat service error when the message was not delivered.
    pub async fn send_message(
        &self,
        text: &str,
        extras: MessageExtras,
    ) -> Result<HandlerResult, HookError> {
        let params = PostParams::from_config(&self.config).merge(extras);
        self.services.chat.post_to_channel(text, &params).await?;
        Ok(HandlerResult::success("Sent a message"))
    }
}

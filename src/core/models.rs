use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

pub type ChannelId = String;

/// Persisted configuration of one hook instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookConfig {
    #[serde(default)]
    pub channel: ChannelId,
    #[serde(default)]
    pub channel_name: String,
    /// Regex patterns matched against the topic ARN of every inbound message.
    #[serde(default, deserialize_with = "deserialize_topics")]
    pub topics: Vec<String>,
    #[serde(default)]
    pub botname: String,
    #[serde(default)]
    pub icon_emoji: String,
    #[serde(default)]
    pub icon_url: String,
}

// Freshly installed instances stored the topic list as a (blank) string.
fn deserialize_topics<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Topics {
        List(Vec<String>),
        Text(String),
        Missing(Option<()>),
    }

    Ok(match Topics::deserialize(deserializer)? {
        Topics::List(list) => list,
        Topics::Text(text) => super::topics::split_topics(&text),
        Topics::Missing(_) => Vec::new(),
    })
}

/// A single inbound HTTP call handed to the plugin by the host.
#[derive(Debug, Clone, Default)]
pub struct InboundRequest {
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl InboundRequest {
    #[must_use]
    pub fn new(headers: HashMap<String, String>, body: impl Into<String>) -> Self {
        Self {
            headers,
            body: body.into(),
        }
    }

    /// Case-insensitive header lookup; API Gateway lower-cases header names.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        if let Some(v) = self.headers.get(name) {
            return Some(v.as_str());
        }
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Value of the `X-Amz-Sns-Message-Type` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnsMessageType {
    SubscriptionConfirmation,
    Notification,
    UnsubscribeConfirmation,
    Unknown(String),
}

impl SnsMessageType {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "SubscriptionConfirmation" => Self::SubscriptionConfirmation,
            "Notification" => Self::Notification,
            "UnsubscribeConfirmation" => Self::UnsubscribeConfirmation,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for SnsMessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SubscriptionConfirmation => f.write_str("SubscriptionConfirmation"),
            Self::Notification => f.write_str("Notification"),
            Self::UnsubscribeConfirmation => f.write_str("UnsubscribeConfirmation"),
            Self::Unknown(raw) => f.write_str(raw),
        }
    }
}

/// Decoded SNS message body. Absent fields read as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnsPayload {
    pub message_id: Option<String>,
    pub topic_arn: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
    pub timestamp: Option<String>,
    pub subscribe_url: Option<String>,
}

impl SnsPayload {
    /// Reads the known SNS keys out of an already-decoded JSON document.
    ///
    /// Non-string scalars are stringified; `null` and nested values are treated as absent.
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        let field = |key: &str| -> Option<String> {
            match value.get(key)? {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                Value::Bool(b) => Some(b.to_string()),
                _ => None,
            }
        };

        Self {
            message_id: field("MessageId"),
            topic_arn: field("TopicArn"),
            subject: field("Subject"),
            message: field("Message"),
            timestamp: field("Timestamp"),
            subscribe_url: field("SubscribeURL"),
        }
    }

    #[must_use]
    pub fn topic_arn(&self) -> &str {
        self.topic_arn.as_deref().unwrap_or("")
    }
}

/// Outcome of a hook call, returned to the host as JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HandlerResult {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl HandlerResult {
    #[must_use]
    pub fn success(status: impl Into<String>) -> Self {
        Self {
            ok: true,
            status: Some(status.into()),
            error: None,
            extra: Map::new(),
        }
    }

    #[must_use]
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            status: None,
            error: Some(error.into()),
            extra: Map::new(),
        }
    }

    #[must_use]
    pub fn with_extra(mut self, key: &str, value: Value) -> Self {
        self.extra.insert(key.to_string(), value);
        self
    }

    #[must_use]
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| Value::Object(Map::new()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentField {
    pub title: String,
    pub value: String,
    pub short: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub fields: Vec<AttachmentField>,
}

/// Caller-supplied overrides for an outgoing chat message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageExtras {
    pub channel: Option<ChannelId>,
    pub username: Option<String>,
    pub icon_emoji: Option<String>,
    pub icon_url: Option<String>,
    pub attachments: Vec<Attachment>,
}

/// Fully resolved parameters of a `chat.postMessage` call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PostParams {
    pub channel: ChannelId,
    pub username: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub icon_emoji: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub icon_url: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

impl PostParams {
    /// Defaults taken from the hook instance configuration.
    #[must_use]
    pub fn from_config(config: &HookConfig) -> Self {
        Self {
            channel: config.channel.clone(),
            username: config.botname.clone(),
            icon_emoji: config.icon_emoji.clone(),
            icon_url: config.icon_url.clone(),
            attachments: Vec::new(),
        }
    }

    /// Applies caller overrides. Attachments are appended, everything else replaces.
    #[must_use]
    pub fn merge(mut self, extras: MessageExtras) -> Self {
        if let Some(channel) = extras.channel {
            self.channel = channel;
        }
        if let Some(username) = extras.username {
            self.username = username;
        }
        if let Some(icon_emoji) = extras.icon_emoji {
            self.icon_emoji = icon_emoji;
        }
        if let Some(icon_url) = extras.icon_url {
            self.icon_url = icon_url;
        }
        self.attachments.extend(extras.attachments);
        self
    }
}

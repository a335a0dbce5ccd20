//! AWS Simple Notification Service hook.
//!
//! Accepts SNS HTTP deliveries, checks the topic ARN against the configured
//! allow-list and relays notifications into a Slack channel.

mod handlers;
pub mod message;

pub use handlers::{ERR_NO_PAYLOAD, ERR_SUBSCRIBE};

use async_trait::async_trait;
use tracing::{info, warn};

use crate::core::models::{HandlerResult, HookConfig, InboundRequest};
use crate::core::topics::{TopicMatcher, split_topics};
use crate::errors::HookError;
use crate::plugin::{EditForm, EditOutcome, EditRequest, HostServices, ServicePlugin, ViewPage};

pub const PLUGIN_NAME: &str = "AWS Simple Notification Service";
pub const PLUGIN_DESCRIPTION: &str = "Post notifications from an AWS SNS topic.";
pub const DEFAULT_BOT_NAME: &str = "AWS Simple Notification Service";
pub const DEFAULT_CHANNEL_NAME: &str = "#general";
const ICON_PATH: &str = "/plugins/aws_sns/icon_48.png";

pub const HEADER_TOPIC_ARN: &str = "X-Amz-Sns-Topic-Arn";
pub const HEADER_MESSAGE_TYPE: &str = "X-Amz-Sns-Message-Type";

/// One installed SNS hook instance.
pub struct AwsSnsPlugin {
    services: HostServices,
    config: HookConfig,
    topics: TopicMatcher,
}

impl AwsSnsPlugin {
    /// An instance that has not been installed yet; call [`ServicePlugin::init`].
    #[must_use]
    pub fn new(services: HostServices) -> Self {
        Self {
            services,
            config: HookConfig::default(),
            topics: TopicMatcher::default(),
        }
    }

    /// # Errors
    ///
    /// Returns `HookError::InvalidTopicPattern` if a stored pattern does not compile.
    pub fn with_config(services: HostServices, config: HookConfig) -> Result<Self, HookError> {
        let topics = TopicMatcher::compile(&config.topics)?;
        Ok(Self {
            services,
            config,
            topics,
        })
    }

    /// Loads the stored configuration, installing defaults on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or holds an uncompilable pattern.
    pub async fn load(services: HostServices) -> Result<Self, HookError> {
        match services.store.load().await? {
            Some(config) => Self::with_config(services, config),
            None => {
                info!("No stored hook configuration, installing defaults");
                let mut plugin = Self::new(services);
                plugin.init().await?;
                Ok(plugin)
            }
        }
    }

    #[must_use]
    pub fn config(&self) -> &HookConfig {
        &self.config
    }

    fn default_icon_url(&self) -> String {
        format!("{}{ICON_PATH}", self.services.root_url.trim_matches('/'))
    }

    fn saved_redirect_url(&self) -> String {
        let view_url = &self.services.view_url;
        let sep = if !view_url.contains('?') {
            "?"
        } else if view_url.ends_with('?') || view_url.ends_with('&') {
            ""
        } else {
            "&"
        };
        format!("{view_url}{sep}saved=1")
    }

    async fn channel_choices(&self) -> Vec<(String, String)> {
        let mut channels: Vec<(String, String)> = match self.services.channels.channels().await {
            Ok(map) => map.into_iter().collect(),
            Err(e) => {
                warn!("Failed to list channels: {}", e);
                Vec::new()
            }
        };
        channels.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        channels
    }
}

#[async_trait]
impl ServicePlugin for AwsSnsPlugin {
    fn name(&self) -> &'static str {
        PLUGIN_NAME
    }

    fn description(&self) -> &'static str {
        PLUGIN_DESCRIPTION
    }

    fn label(&self) -> String {
        format!(
            "Post SNS notifications to {} as {}",
            self.config.channel_name, self.config.botname
        )
    }

    async fn init(&mut self) -> Result<(), HookError> {
        let mut config = HookConfig {
            botname: DEFAULT_BOT_NAME.to_string(),
            icon_url: self.default_icon_url(),
            ..HookConfig::default()
        };

        match self.services.channels.channels().await {
            Ok(channels) => {
                if let Some((id, name)) = channels
                    .into_iter()
                    .find(|(_, name)| name == DEFAULT_CHANNEL_NAME)
                {
                    config.channel = id;
                    config.channel_name = name;
                }
            }
            Err(e) => warn!("Failed to list channels during install: {}", e),
        }

        self.services.store.save(&config).await?;
        info!(channel = %config.channel, "Installed SNS hook with default configuration");

        self.config = config;
        self.topics = TopicMatcher::default();
        Ok(())
    }

    fn view(&self, saved: bool) -> ViewPage {
        ViewPage {
            title: PLUGIN_NAME.to_string(),
            label: self.label(),
            config: self.config.clone(),
            saved,
        }
    }

    async fn edit(&mut self, request: &EditRequest) -> Result<EditOutcome, HookError> {
        let channels = self.channel_choices().await;

        if !request.save {
            return Ok(EditOutcome::Form(EditForm {
                config: self.config.clone(),
                topics_text: self.config.topics.join("\n"),
                channels,
                error: None,
            }));
        }

        let channel = request.field("channel").to_string();
        let channel_name = channels
            .iter()
            .find(|(id, _)| *id == channel)
            .map(|(_, name)| name.clone())
            .unwrap_or_default();

        let config = HookConfig {
            channel,
            channel_name,
            topics: split_topics(request.field("topics")),
            botname: request.field("botname").to_string(),
            icon_emoji: request.field("icon_emoji").to_string(),
            icon_url: request.field("icon_url").to_string(),
        };

        let topics = match TopicMatcher::compile(&config.topics) {
            Ok(topics) => topics,
            Err(e) => {
                warn!("Rejected hook configuration: {}", e);
                return Ok(EditOutcome::Form(EditForm {
                    topics_text: request.field("topics").to_string(),
                    config,
                    channels,
                    error: Some(e.to_string()),
                }));
            }
        };

        self.services.store.save(&config).await?;
        info!(
            channel = %config.channel,
            topics = config.topics.len(),
            "Saved SNS hook configuration"
        );

        self.config = config;
        self.topics = topics;

        Ok(EditOutcome::Redirect(self.saved_redirect_url()))
    }

    async fn handle(&self, request: &InboundRequest) -> HandlerResult {
        self.on_hook(request).await
    }
}

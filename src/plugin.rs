//! Contract between a service plugin and the host that drives it.
//!
//! The host owns persistence, channel lookup, outbound HTTP and chat delivery.
//! A plugin receives those capabilities as a [`HostServices`] bundle and exposes
//! its lifecycle through [`ServicePlugin`].

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::core::models::{ChannelId, HandlerResult, HookConfig, InboundRequest, PostParams};
use crate::errors::HookError;

/// Posts a message into a chat channel.
#[async_trait]
pub trait ChatPoster: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the chat service rejects or fails to deliver the message.
    async fn post_to_channel(&self, text: &str, params: &PostParams) -> Result<(), HookError>;
}

/// Lists the channels a hook may post to, keyed by id. Names carry a leading `#`.
#[async_trait]
pub trait ChannelDirectory: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the channel listing cannot be fetched.
    async fn channels(&self) -> Result<BTreeMap<ChannelId, String>, HookError>;
}

/// Response of an outbound GET, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait HttpFetcher: Send + Sync {
    /// # Errors
    ///
    /// Returns an error on transport failure. Non-2xx responses are returned as `Ok`.
    async fn get(&self, url: &str) -> Result<FetchResponse, HookError>;
}

/// Persistence of the hook instance configuration.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Returns `None` when the instance has never been installed.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store fails or holds malformed data.
    async fn load(&self) -> Result<Option<HookConfig>, HookError>;

    /// # Errors
    ///
    /// Returns an error if the backing store rejects the write.
    async fn save(&self, config: &HookConfig) -> Result<(), HookError>;
}

/// Capabilities the host lends to a plugin instance.
#[derive(Clone)]
pub struct HostServices {
    pub chat: Arc<dyn ChatPoster>,
    pub channels: Arc<dyn ChannelDirectory>,
    pub http: Arc<dyn HttpFetcher>,
    pub store: Arc<dyn ConfigStore>,
    pub root_url: String,
    pub view_url: String,
}

/// A request against the edit page.
#[derive(Debug, Clone, Default)]
pub struct EditRequest {
    /// Set by the `save` query flag.
    pub save: bool,
    pub form: HashMap<String, String>,
}

impl EditRequest {
    #[must_use]
    pub fn field(&self, name: &str) -> &str {
        self.form.get(name).map_or("", String::as_str)
    }
}

/// Model of the edit form, rendered by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditForm {
    pub config: HookConfig,
    /// Topic patterns as shown in the textarea, one per line.
    pub topics_text: String,
    /// `(id, name)` pairs sorted by name.
    pub channels: Vec<(ChannelId, String)>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    Redirect(String),
    Form(EditForm),
}

/// Model of the read-only view page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewPage {
    pub title: String,
    pub label: String,
    pub config: HookConfig,
    pub saved: bool,
}

/// Lifecycle implemented by every service plugin.
#[async_trait]
pub trait ServicePlugin: Send + Sync {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// One-line summary shown in the host's list of installed hooks.
    fn label(&self) -> String;

    /// First-install defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial configuration cannot be persisted.
    async fn init(&mut self) -> Result<(), HookError>;

    fn view(&self, saved: bool) -> ViewPage;

    /// # Errors
    ///
    /// Returns an error if a valid configuration cannot be persisted.
    async fn edit(&mut self, request: &EditRequest) -> Result<EditOutcome, HookError>;

    /// Processes one inbound webhook call. Failures are reported in the result.
    async fn handle(&self, request: &InboundRequest) -> HandlerResult;
}

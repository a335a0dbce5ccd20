//! In-memory host collaborators shared by the integration tests.
#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use sns_hook::HookError;
use sns_hook::core::models::{HookConfig, InboundRequest, PostParams};
use sns_hook::plugin::{
    ChannelDirectory, ChatPoster, ConfigStore, FetchResponse, HostServices, HttpFetcher,
};

pub const TOPIC_ARN: &str = "arn:aws:sns:us-east-1:123:my-topic";

#[derive(Default)]
pub struct RecordingChat {
    pub posts: Mutex<Vec<(String, PostParams)>>,
    pub fail_with: Option<String>,
}

#[async_trait]
impl ChatPoster for RecordingChat {
    async fn post_to_channel(&self, text: &str, params: &PostParams) -> Result<(), HookError> {
        self.posts
            .lock()
            .unwrap()
            .push((text.to_string(), params.clone()));
        match &self.fail_with {
            Some(msg) => Err(HookError::ApiError(msg.clone())),
            None => Ok(()),
        }
    }
}

#[derive(Default)]
pub struct StaticChannels {
    pub channels: BTreeMap<String, String>,
    pub fail: bool,
}

#[async_trait]
impl ChannelDirectory for StaticChannels {
    async fn channels(&self) -> Result<BTreeMap<String, String>, HookError> {
        if self.fail {
            return Err(HookError::ApiError("channel_not_found".to_string()));
        }
        Ok(self.channels.clone())
    }
}

pub struct StubFetcher {
    pub response: Result<FetchResponse, String>,
    pub calls: Mutex<Vec<String>>,
}

impl Default for StubFetcher {
    fn default() -> Self {
        Self {
            response: Ok(FetchResponse {
                status: 200,
                body: "<ConfirmSubscriptionResponse/>".to_string(),
            }),
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl HttpFetcher for StubFetcher {
    async fn get(&self, url: &str) -> Result<FetchResponse, HookError> {
        self.calls.lock().unwrap().push(url.to_string());
        self.response
            .clone()
            .map_err(HookError::HttpError)
    }
}

#[derive(Default)]
pub struct MemoryStore {
    pub config: Mutex<Option<HookConfig>>,
    pub saves: Mutex<Vec<HookConfig>>,
    pub fail_saves: bool,
}

impl MemoryStore {
    pub fn with_config(config: HookConfig) -> Self {
        Self {
            config: Mutex::new(Some(config)),
            ..Self::default()
        }
    }

    pub fn stored(&self) -> Option<HookConfig> {
        self.config.lock().unwrap().clone()
    }

    pub fn save_count(&self) -> usize {
        self.saves.lock().unwrap().len()
    }
}

#[async_trait]
impl ConfigStore for MemoryStore {
    async fn load(&self) -> Result<Option<HookConfig>, HookError> {
        Ok(self.config.lock().unwrap().clone())
    }

    async fn save(&self, config: &HookConfig) -> Result<(), HookError> {
        if self.fail_saves {
            return Err(HookError::AwsError("ssm put_parameter: throttled".to_string()));
        }
        self.saves.lock().unwrap().push(config.clone());
        *self.config.lock().unwrap() = Some(config.clone());
        Ok(())
    }
}

/// One set of fakes plus handles to inspect them afterwards.
pub struct Host {
    pub chat: Arc<RecordingChat>,
    pub channels: Arc<StaticChannels>,
    pub http: Arc<StubFetcher>,
    pub store: Arc<MemoryStore>,
}

impl Host {
    pub fn new() -> Self {
        Self::with_store(MemoryStore::default())
    }

    pub fn with_store(store: MemoryStore) -> Self {
        let mut channels = BTreeMap::new();
        channels.insert("C001".to_string(), "#random".to_string());
        channels.insert("C002".to_string(), "#general".to_string());
        channels.insert("C003".to_string(), "#alerts".to_string());

        Self {
            chat: Arc::new(RecordingChat::default()),
            channels: Arc::new(StaticChannels {
                channels,
                fail: false,
            }),
            http: Arc::new(StubFetcher::default()),
            store: Arc::new(store),
        }
    }

    pub fn services(&self) -> HostServices {
        HostServices {
            chat: self.chat.clone(),
            channels: self.channels.clone(),
            http: self.http.clone(),
            store: self.store.clone(),
            root_url: "https://hooks.example.com/".to_string(),
            view_url: "https://hooks.example.com/view?".to_string(),
        }
    }

    pub fn posts(&self) -> Vec<(String, PostParams)> {
        self.chat.posts.lock().unwrap().clone()
    }

    pub fn fetched(&self) -> Vec<String> {
        self.http.calls.lock().unwrap().clone()
    }
}

pub fn hook_config(topics: &[&str]) -> HookConfig {
    HookConfig {
        channel: "C003".to_string(),
        channel_name: "#alerts".to_string(),
        topics: topics.iter().map(ToString::to_string).collect(),
        botname: "AWS Simple Notification Service".to_string(),
        icon_emoji: String::new(),
        icon_url: "https://hooks.example.com/plugins/aws_sns/icon_48.png".to_string(),
    }
}

pub fn sns_request(message_type: &str, topic_arn: &str, body: &str) -> InboundRequest {
    let mut headers = HashMap::new();
    headers.insert("X-Amz-Sns-Message-Type".to_string(), message_type.to_string());
    headers.insert("X-Amz-Sns-Topic-Arn".to_string(), topic_arn.to_string());
    InboundRequest::new(headers, body)
}

use std::error::Error as _;

use slack_morphism::errors::SlackClientError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HookError {
    #[error("Failed to parse request: {0}")]
    ParseError(String),

    #[error("Invalid topic pattern '{pattern}': {reason}")]
    InvalidTopicPattern { pattern: String, reason: String },

    #[error("Failed to access Slack API: {0}")]
    ApiError(String),

    #[error("Failed to send HTTP request: {0}")]
    HttpError(String),

    #[error("Failed to interact with AWS services: {0}")]
    AwsError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Failed to render page: {0}")]
    TemplateError(String),

    #[error("{0}")]
    GeneralError(String),
}

impl From<SlackClientError> for HookError {
    fn from(error: SlackClientError) -> Self {
        HookError::ApiError(error.to_string())
    }
}

impl From<reqwest::Error> for HookError {
    fn from(error: reqwest::Error) -> Self {
        HookError::HttpError(error.to_string())
    }
}

impl From<serde_json::Error> for HookError {
    fn from(error: serde_json::Error) -> Self {
        HookError::ParseError(error.to_string())
    }
}

impl From<anyhow::Error> for HookError {
    fn from(error: anyhow::Error) -> Self {
        HookError::GeneralError(error.to_string())
    }
}

impl HookError {
    /// Tera puts the useful detail in the source chain, not the top-level message.
    pub(crate) fn from_template(error: &tera::Error) -> Self {
        let mut message = error.to_string();
        let mut source = error.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        HookError::TemplateError(message)
    }
}

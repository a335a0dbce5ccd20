use async_trait::async_trait;
use aws_sdk_ssm::operation::get_parameter::GetParameterError;
use aws_sdk_ssm::{Client as SsmClient, types::ParameterType};
use tracing::info;

use crate::core::models::HookConfig;
use crate::errors::HookError;
use crate::plugin::ConfigStore;

/// Keeps the hook configuration as a JSON document in one SSM parameter.
pub struct SsmConfigStore {
    client: SsmClient,
    parameter_name: String,
}

impl SsmConfigStore {
    #[must_use]
    pub fn new(client: SsmClient, parameter_name: impl Into<String>) -> Self {
        Self {
            client,
            parameter_name: parameter_name.into(),
        }
    }

    /// Builds the SSM client from the ambient AWS environment.
    pub async fn from_env(parameter_name: impl Into<String>) -> Self {
        let shared = aws_config::from_env().load().await;
        Self::new(SsmClient::new(&shared), parameter_name)
    }
}

/// # Errors
///
/// Returns an error if the stored value is not a valid configuration document.
pub fn decode_config(value: &str) -> Result<HookConfig, HookError> {
    serde_json::from_str(value)
        .map_err(|e| HookError::GeneralError(format!("hook config parse: {e}")))
}

/// # Errors
///
/// Returns an error if the configuration cannot be serialized.
pub fn encode_config(config: &HookConfig) -> Result<String, HookError> {
    serde_json::to_string(config)
        .map_err(|e| HookError::GeneralError(format!("hook config serialize: {e}")))
}

#[async_trait]
impl ConfigStore for SsmConfigStore {
    async fn load(&self) -> Result<Option<HookConfig>, HookError> {
        match self
            .client
            .get_parameter()
            .name(&self.parameter_name)
            .send()
            .await
        {
            Ok(resp) => {
                let Some(param) = resp.parameter else {
                    return Ok(None);
                };
                let Some(value) = param.value() else {
                    return Ok(None);
                };
                decode_config(value).map(Some)
            }
            Err(e) => {
                // If not found, return Ok(None); otherwise bubble error
                if e
                    .as_service_error()
                    .is_some_and(GetParameterError::is_parameter_not_found)
                {
                    Ok(None)
                } else {
                    Err(HookError::AwsError(format!("ssm get_parameter: {e}")))
                }
            }
        }
    }

    async fn save(&self, config: &HookConfig) -> Result<(), HookError> {
        let value = encode_config(config)?;

        self.client
            .put_parameter()
            .name(&self.parameter_name)
            .value(value)
            .r#type(ParameterType::String)
            .overwrite(true)
            .send()
            .await
            .map_err(|e| HookError::AwsError(format!("ssm put_parameter: {e}")))?;

        info!(parameter = %self.parameter_name, "Saved hook configuration");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_document_roundtrip_keeps_topic_order() {
        let config = HookConfig {
            channel: "C1".into(),
            channel_name: "#general".into(),
            topics: vec!["z".into(), "a".into(), ".*prod.*".into()],
            botname: "AWS Simple Notification Service".into(),
            icon_emoji: String::new(),
            icon_url: "https://hooks.example.com/plugins/aws_sns/icon_48.png".into(),
        };

        let decoded = decode_config(&encode_config(&config).unwrap()).unwrap();
        assert_eq!(decoded, config);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = decode_config("not json").unwrap_err();
        assert!(err.to_string().contains("hook config parse"));
    }
}

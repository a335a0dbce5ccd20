use std::env;

use crate::errors::HookError;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub slack_bot_token: String,
    /// SSM parameter holding the hook instance configuration as JSON.
    pub hook_config_param: String,
    pub root_url: String,
    pub view_url: String,
    pub edit_url: String,
}

impl AppConfig {
    /// # Errors
    ///
    /// Returns `HookError::ConfigError` naming the first required variable that is unset.
    pub fn from_env() -> Result<Self, HookError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `HookError::ConfigError` naming the first required variable that is missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, HookError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| HookError::ConfigError(format!("{key}: environment variable not set")))
        };

        let slack_bot_token = required("SLACK_BOT_TOKEN")?;
        let hook_config_param = required("HOOK_CONFIG_PARAM")?;
        let root_url = required("ROOT_URL")?;
        let root = root_url.trim_end_matches('/');

        let view_url = lookup("VIEW_URL").unwrap_or_else(|| format!("{root}/view?"));
        let edit_url = lookup("EDIT_URL").unwrap_or_else(|| format!("{root}/edit"));

        Ok(Self {
            slack_bot_token,
            hook_config_param,
            root_url,
            view_url,
            edit_url,
        })
    }
}

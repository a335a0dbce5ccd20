//! API Lambda handler - thin router between API Gateway and the SNS hook plugin.
//!
//! This module handles:
//! - Loading the hook instance (installing defaults on first use)
//! - SNS deliveries (`POST …/hook`)
//! - The admin view and edit pages (`…/view`, `…/edit`)

use std::sync::Arc;

use lambda_runtime::{Error, LambdaEvent};
use serde_json::Value;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::{helpers, parsing};
use crate::core::config::AppConfig;
use crate::core::models::InboundRequest;
use crate::errors::HookError;
use crate::http::ReqwestFetcher;
use crate::plugin::{EditOutcome, EditRequest, HostServices, ServicePlugin};
use crate::slack::SlackClient;
use crate::sns::AwsSnsPlugin;
use crate::store::SsmConfigStore;
use crate::views;

pub use self::function_handler as handler;

/// Lambda handler for the API entrypoint.
///
/// # Errors
///
/// Returns an error only when the environment configuration is incomplete;
/// every request-level failure is reported in the response payload.
#[tracing::instrument(level = "info", skip(event))]
pub async fn function_handler(event: LambdaEvent<Value>) -> Result<Value, Error> {
    let config = AppConfig::from_env().map_err(|e| {
        error!("Config error: {}", e);
        Error::from(e)
    })?;

    let services = build_services(&config).await;
    Ok(route(services, &config, &event.payload).await)
}

/// Wire the production collaborators: Slack, SSM and `reqwest`.
pub async fn build_services(config: &AppConfig) -> HostServices {
    let slack = Arc::new(SlackClient::new(config.slack_bot_token.clone()));
    let store = SsmConfigStore::from_env(config.hook_config_param.clone()).await;

    HostServices {
        chat: slack.clone(),
        channels: slack,
        http: Arc::new(ReqwestFetcher),
        store: Arc::new(store),
        root_url: config.root_url.clone(),
        view_url: config.view_url.clone(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Page {
    Hook,
    View,
    Edit,
}

fn resolve_page(path: &str) -> Option<Page> {
    let trimmed = path.trim_end_matches('/');
    if trimmed.ends_with("/hook") {
        Some(Page::Hook)
    } else if trimmed.ends_with("/view") {
        Some(Page::View)
    } else if trimmed.ends_with("/edit") {
        Some(Page::Edit)
    } else {
        None
    }
}

/// Dispatch one API Gateway event to the plugin.
///
/// The route is resolved before the hook instance is loaded, so requests that
/// are answered with 404 or 405 never install defaults.
pub async fn route(services: HostServices, config: &AppConfig, payload: &Value) -> Value {
    let request_id = Uuid::new_v4();
    let path = parsing::request_path(payload);
    let method = parsing::request_method(payload);
    info!(%request_id, path, method, "API Lambda received request");

    let Some(page) = resolve_page(path) else {
        warn!(%request_id, path, "No route for request");
        return helpers::err_response(404, "Not found");
    };

    if page == Page::Hook && !method.eq_ignore_ascii_case("POST") {
        return helpers::err_response(405, "SNS deliveries must use POST");
    }

    let mut plugin = match AwsSnsPlugin::load(services).await {
        Ok(plugin) => plugin,
        Err(e) => {
            error!(%request_id, "Failed to load hook instance: {}", e);
            return helpers::err_response(500, &format!("Hook instance unavailable: {e}"));
        }
    };

    match page {
        Page::Hook => handle_hook(&plugin, payload).await,
        Page::View => {
            let query = parsing::query_params(payload);
            let saved = parsing::is_truthy(query.get("saved").map(String::as_str));
            let view = plugin.view(saved);
            match views::render_view_page(&view, &config.edit_url) {
                Ok(html) => helpers::html(&html),
                Err(e) => render_failure(&e),
            }
        }
        Page::Edit => handle_edit(&mut plugin, config, payload).await,
    }
}

fn render_failure(e: &HookError) -> Value {
    error!("Failed to render page: {}", e);
    helpers::err_response(500, &e.to_string())
}

async fn handle_hook(plugin: &AwsSnsPlugin, payload: &Value) -> Value {
    let body = match parsing::extract_body(payload) {
        Ok(body) => body,
        Err(e) => {
            error!("Unreadable request body: {}", e);
            return helpers::err_response(400, &e.to_string());
        }
    };

    let request = InboundRequest::new(parsing::headers_map(payload), body);
    let result = plugin.handle(&request).await;

    if result.ok {
        info!(status = ?result.status, "SNS request handled");
    } else {
        warn!(error = ?result.error, "SNS request rejected");
    }

    helpers::hook_response(&result)
}

async fn handle_edit(plugin: &mut AwsSnsPlugin, config: &AppConfig, payload: &Value) -> Value {
    let query = parsing::query_params(payload);
    let save = parsing::is_truthy(query.get("save").map(String::as_str));

    let form = if save {
        let parsed = parsing::extract_body(payload).and_then(|body| parsing::parse_form(&body));
        match parsed {
            Ok(form) => form,
            Err(e) => {
                error!("Edit form parse error: {}", e);
                return helpers::err_response(400, &format!("Parse Error: {e}"));
            }
        }
    } else {
        Default::default()
    };

    match plugin.edit(&EditRequest { save, form }).await {
        Ok(EditOutcome::Redirect(url)) => helpers::redirect(&url),
        Ok(EditOutcome::Form(form)) => match views::render_edit_page(&form, &config.edit_url) {
            Ok(html) => helpers::html(&html),
            Err(e) => render_failure(&e),
        },
        Err(e) => {
            error!("Failed to save hook configuration: {}", e);
            helpers::err_response(500, &format!("Failed to save settings: {e}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_page() {
        assert_eq!(resolve_page("/prod/hook"), Some(Page::Hook));
        assert_eq!(resolve_page("/hook/"), Some(Page::Hook));
        assert_eq!(resolve_page("/view"), Some(Page::View));
        assert_eq!(resolve_page("/stage/edit"), Some(Page::Edit));
        assert_eq!(resolve_page("/"), None);
        assert_eq!(resolve_page("/webhook-admin"), None);
    }
}

//! SNS Hook - relays AWS SNS notifications into a Slack channel.
//!
//! The crate is a single service plugin plus the Lambda host that drives it:
//! 1. SNS delivers subscription confirmations and notifications over HTTPS
//! 2. The hook checks the topic ARN against its configured allow-list
//! 3. Notifications are posted to Slack as a message with an attachment
//!
//! # Architecture
//!
//! The system uses:
//! - AWS Lambda behind API Gateway for the HTTP surface
//! - SSM Parameter Store to persist the hook configuration
//! - slack-morphism and the Slack Web API for channel listing and posting
//! - Tokio for async runtime
//! - Tera templates for the admin view and edit pages
//!
//! The plugin only sees its host through the traits in [`plugin`], so it can be
//! driven with in-memory collaborators.
//!
//! # Example
//!
//! ```no_run
//! use sns_hook::core::config::AppConfig;
//! use sns_hook::core::models::InboundRequest;
//! use sns_hook::plugin::ServicePlugin;
//! use sns_hook::sns::AwsSnsPlugin;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     sns_hook::setup_logging();
//!
//!     let config = AppConfig::from_env()?;
//!     let services = sns_hook::api::handler::build_services(&config).await;
//!     let plugin = AwsSnsPlugin::load(services).await?;
//!
//!     let mut headers = std::collections::HashMap::new();
//!     headers.insert("X-Amz-Sns-Message-Type".to_string(), "Notification".to_string());
//!     headers.insert(
//!         "X-Amz-Sns-Topic-Arn".to_string(),
//!         "arn:aws:sns:us-east-1:123456789012:alerts".to_string(),
//!     );
//!     let body = r#"{"TopicArn":"arn:aws:sns:us-east-1:123456789012:alerts","Message":"hi","Timestamp":"2024-01-01T00:00:00Z"}"#;
//!
//!     let result = plugin.handle(&InboundRequest::new(headers, body)).await;
//!     println!("{}", result.to_json());
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod api;
pub mod core;
pub mod errors;
pub mod http;
pub mod plugin;
pub mod slack;
pub mod sns;
pub mod store;
pub mod views;

pub use errors::HookError;

/// Configure structured logging with JSON format for AWS Lambda environments.
///
/// This function sets up tracing-subscriber with a JSON formatter suitable for
/// `CloudWatch` Logs integration, filtered by `RUST_LOG` (default `info`).
/// Calling it again after a subscriber is installed is a no-op.
///
/// # Example
///
/// ```
/// // Initialize structured logging at the start of your Lambda handler
/// sns_hook::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let default_level = if cfg!(feature = "debug-logs") { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

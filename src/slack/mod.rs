//! All Slack-specific functionality

pub mod client;
pub mod formatting;

// Re-export main types for convenience
pub use client::{SlackClient, build_post_message_payload};
pub use formatting::escape_text;

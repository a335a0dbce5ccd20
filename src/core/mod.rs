//! Configuration, data model and topic matching shared by the plugin and its host.

pub mod config;
pub mod models;
pub mod topics;

//! Persistence of the hook instance configuration.

pub mod ssm;

pub use ssm::SsmConfigStore;

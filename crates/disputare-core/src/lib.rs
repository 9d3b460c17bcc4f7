pub mod config;
pub mod error;
pub mod safety;
pub mod types;

pub use config::DisputareConfig;
pub use error::{DisputareError, Result};
pub use safety::{Contact, HelpResource, SensitiveTopicFilter, HELP_RESOURCES, SENSITIVE_TOPICS};
pub use types::*;

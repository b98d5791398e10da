pub mod config;
pub mod error;

pub use config::{ChatBackend, LlmConfig};
pub use error::*;

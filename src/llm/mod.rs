pub mod client;
pub mod config;
pub mod prompts;

pub use client::{ChatCompletion, Completion, LlmClient, LlmClientError};
pub use config::{ConfigOverrides, LlmConfig};

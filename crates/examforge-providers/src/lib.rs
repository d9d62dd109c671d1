//! examforge-providers — generative text service integrations.
//!
//! Implements the `LlmProvider` trait for Gemini and Ollama, plus a
//! scripted mock, and builds the question generator from configuration.

pub mod config;
pub mod error;
pub mod gemini;
pub mod mock;
pub mod ollama;

pub use config::{
    create_generator, create_provider, load_config, load_config_from, ExamforgeConfig,
    ProviderConfig,
};
pub use error::ProviderError;

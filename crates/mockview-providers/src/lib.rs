//! mockview-providers: external model integrations.
//!
//! Implements the `LlmProvider` trait for OpenAI-compatible APIs, Google
//! Gemini and Ollama, plus a mock provider, and loads the `mockview.toml`
//! configuration that selects between them.

pub mod config;
pub mod gemini;
mod http;
pub mod mock;
pub mod ollama;
pub mod openai;

pub use config::{create_provider, load_config, load_config_from, MockviewConfig, ProviderConfig};
pub use mockview_core::error::ProviderError;

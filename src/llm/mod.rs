//! LLM provider abstraction layer
//!
//! Provider-agnostic completion interface plus the OpenAI Chat Completions
//! implementation used in production.

pub mod provider;
pub mod providers;

pub use provider::*;
pub use providers::*;

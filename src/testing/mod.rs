//! Testing utilities and mock implementations
//!
//! Lets the turn pipeline and the chat channel run without a real LLM provider.

pub mod mocks;

pub use mocks::*;

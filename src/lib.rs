//! Gym Concierge
//!
//! A conversational front desk for a gym. Each WebSocket connection is one
//! conversation; every inbound message runs through a coordinator that either
//! answers directly or hands off to exactly one specialist (exercise, diet or
//! myth-busting), which then answers and ends the turn.
//!
//! # Overview
//!
//! - [`state`]: per-conversation turn state and the typed updates merged into it
//! - [`agent`]: the coordinator and specialist steps and the turn driver
//! - [`routing`]: handoff tool schemas and the sentinel router
//! - [`llm`]: the completion-service abstraction and the OpenAI provider
//! - [`transport`]: the JSON frame codec and the WebSocket server
//!
//! # Quick Start
//!
//! ```rust
//! use gym_concierge::agent::{TurnDriver, TurnSettings};
//! use gym_concierge::state::TurnState;
//! use gym_concierge::testing::mocks::MockLlmProvider;
//! use std::sync::Arc;
//!
//! # tokio_test_block(async {
//! let driver = TurnDriver::new(
//!     Arc::new(MockLlmProvider::single_response("Welcome to the gym!")),
//!     TurnSettings::default(),
//! );
//!
//! let outcome = driver.run_turn(&TurnState::new(), "hi").await.unwrap();
//! assert_eq!(outcome.response, "Welcome to the gym!");
//! assert_eq!(outcome.state.history.len(), 2);
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Runtime::new().unwrap().block_on(f)
//! # }
//! ```

pub mod agent;
pub mod config;
pub mod error;
pub mod llm;
pub mod observability;
pub mod routing;
pub mod state;
pub mod testing;
pub mod transport;

pub use agent::{TurnDriver, TurnOutcome, TurnSettings};
pub use config::{ConciergeConfig, ConfigError};
pub use error::{ConciergeError, ConciergeResult};
pub use llm::provider::{LlmError, LlmProvider};
pub use state::{RoutingSentinel, StateUpdate, TurnState};
pub use transport::{ChannelServer, OutboundFrame};

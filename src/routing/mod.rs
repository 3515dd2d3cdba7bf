//! Routing between the coordinator and the specialists
//!
//! ## Router (router.rs)
//!
//! A total function from the routing sentinel to the next step. The sentinel is
//! the only input; the router keeps no state.
//!
//! ## Handoff schemas (schema.rs)
//!
//! The structured invocations the coordinator may make, one per specialist,
//! and the JSON Schemas generated for them.

pub mod router;
pub mod schema;

pub use router::{route, NextStep, Specialist};
pub use schema::{handoff_tools, TransferToDiet, TransferToExercise, TransferToMythBuster};

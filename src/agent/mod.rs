//! Turn pipeline
//!
//! The coordinator, the three specialists, their instruction templates, and the
//! driver that strings them together for each inbound message.

pub mod coordinator;
pub mod driver;
pub mod prompts;
pub mod specialist;

pub use coordinator::{run_coordinator, CoordinatorReply};
pub use driver::{TurnDriver, TurnOutcome, TurnSettings};
pub use specialist::run_specialist;

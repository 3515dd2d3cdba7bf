//! Per-connection chat session
//!
//! A session owns the connection's `TurnState` and turns each inbound payload
//! into exactly one outbound frame. The state is replaced only when a turn
//! completes; rejected frames and failed turns leave it as it was.

use crate::agent::driver::TurnDriver;
use crate::observability::metrics::metrics;
use crate::state::TurnState;
use crate::transport::frames::{parse_inbound, OutboundFrame};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};
use uuid::Uuid;

pub struct ChatSession {
    id: Uuid,
    state: TurnState,
    driver: Arc<TurnDriver>,
}

impl ChatSession {
    pub fn new(driver: Arc<TurnDriver>) -> Self {
        Self {
            id: Uuid::new_v4(),
            state: TurnState::new(),
            driver,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> &TurnState {
        &self.state
    }

    /// Handle one inbound payload and produce the reply frame
    ///
    /// Dropping the returned future before it resolves discards the turn
    /// without touching the session state.
    pub async fn handle_payload(&mut self, payload: &[u8]) -> OutboundFrame {
        metrics().frame_received();

        let frame = match parse_inbound(payload) {
            Ok(frame) => frame,
            Err(e) => {
                metrics().frame_rejected();
                warn!(error = %e, bytes = payload.len(), "Rejected inbound frame");
                return e.to_error_frame();
            }
        };

        let started = Instant::now();
        match self.driver.run_turn(&self.state, &frame.message).await {
            Ok(outcome) => {
                metrics().turn_completed(outcome.route.outcome(), started.elapsed());
                info!(
                    route = outcome.route.outcome(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Replying to inbound message"
                );
                self.state = outcome.state;
                OutboundFrame::response(outcome.response)
            }
            Err(e) => {
                metrics().turn_failed(started.elapsed());
                error!(error = %e, "Turn failed");
                e.to_error_frame()
            }
        }
    }
}

//! Turn driver
//!
//! Runs one inbound message through the state machine:
//!
//! ```text
//! start ──► coordinator ──► (exercise | diet | myth) ──► end
//!                   └──────────────────────────────────► end
//! ```
//!
//! The driver works on a copy of the caller's state and hands back the new
//! state only when every step succeeded, so a failed turn leaves no trace.

use crate::agent::coordinator::run_coordinator;
use crate::agent::specialist::run_specialist;
use crate::config::ConciergeConfig;
use crate::error::ConciergeResult;
use crate::llm::provider::{CompletionRequest, LlmProvider, Message, ToolDescription};
use crate::routing::router::{route, NextStep};
use crate::state::TurnState;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Model parameters and branding shared by every step
#[derive(Debug, Clone)]
pub struct TurnSettings {
    pub model: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub gym_name: String,
}

impl Default for TurnSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o".to_string(),
            temperature: None,
            max_tokens: None,
            gym_name: "WTF GYM".to_string(),
        }
    }
}

impl TurnSettings {
    pub fn from_config(config: &ConciergeConfig) -> Self {
        Self {
            model: config.llm.model.clone(),
            temperature: config.llm.temperature,
            max_tokens: config.llm.max_tokens,
            gym_name: config.assistant.gym_name.clone(),
        }
    }

    /// Build a request: system instruction first, then the whole history
    pub fn request(
        &self,
        system: String,
        history: &[Message],
        tools: Option<Vec<ToolDescription>>,
    ) -> CompletionRequest {
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(Message::system(system));
        messages.extend_from_slice(history);

        CompletionRequest {
            messages,
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            tools,
            metadata: HashMap::new(),
        }
    }
}

/// Result of one completed turn
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// State to keep for the next turn
    pub state: TurnState,
    /// Text sent back to the user
    pub response: String,
    /// Step the router chose after the coordinator
    pub route: NextStep,
}

/// Drives the coordinator and at most one specialist per inbound message
pub struct TurnDriver {
    provider: Arc<dyn LlmProvider>,
    settings: TurnSettings,
}

impl TurnDriver {
    pub fn new(provider: Arc<dyn LlmProvider>, settings: TurnSettings) -> Self {
        Self { provider, settings }
    }

    pub fn settings(&self) -> &TurnSettings {
        &self.settings
    }

    /// Process one user message against `state`
    #[tracing::instrument(name = "turn", skip(self, state, user_text), fields(history_len = state.history.len()))]
    pub async fn run_turn(&self, state: &TurnState, user_text: &str) -> ConciergeResult<TurnOutcome> {
        let mut working = state.clone();
        working.begin_turn(user_text);

        let update = run_coordinator(self.provider.as_ref(), &self.settings, &working).await?;
        working = working.apply(update);

        let next = route(working.routing_sentinel);
        debug!(sentinel = working.routing_sentinel.as_key(), next = ?next, "Routed turn");

        if let NextStep::Specialist(specialist) = next {
            let update =
                run_specialist(specialist, self.provider.as_ref(), &self.settings, &working)
                    .await?;
            working = working.apply(update);
        }

        let response = working.last_message_text().unwrap_or_default().to_string();

        info!(
            route = ?next,
            active = %working.active_specialist,
            history_len = working.history.len(),
            "Turn completed"
        );

        Ok(TurnOutcome {
            state: working,
            response,
            route: next,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::provider::MessageRole;
    use crate::routing::router::Specialist;
    use crate::state::RoutingSentinel;
    use crate::testing::mocks::{MockLlmProvider, MockReply};
    use serde_json::json;

    fn driver(provider: MockLlmProvider) -> (TurnDriver, Arc<MockLlmProvider>) {
        let provider = Arc::new(provider);
        (
            TurnDriver::new(provider.clone(), TurnSettings::default()),
            provider,
        )
    }

    #[test]
    fn test_request_prepends_system_instruction() {
        let settings = TurnSettings {
            temperature: Some(0.3),
            ..Default::default()
        };
        let history = vec![Message::user("hi"), Message::assistant("hey")];

        let request = settings.request("rules".to_string(), &history, None);

        assert_eq!(request.model, "gpt-4o");
        assert_eq!(request.temperature, Some(0.3));
        assert_eq!(request.messages.len(), 3);
        assert_eq!(request.messages[0], Message::system("rules"));
        assert_eq!(&request.messages[1..], &history[..]);
    }

    #[tokio::test]
    async fn test_direct_answer_halts_after_coordinator() {
        let (driver, provider) = driver(MockLlmProvider::single_response("Hello"));

        let outcome = driver.run_turn(&TurnState::new(), "hi").await.unwrap();

        assert_eq!(outcome.response, "Hello");
        assert_eq!(outcome.route, NextStep::End);
        assert_eq!(outcome.state.routing_sentinel, RoutingSentinel::Terminal);
        assert_eq!(outcome.state.active_specialist, "coordinator");
        assert_eq!(outcome.state.history.len(), 2);
        assert_eq!(provider.call_count().await, 1);
    }

    #[tokio::test]
    async fn test_handoff_runs_exactly_one_specialist() {
        let (driver, provider) = driver(MockLlmProvider::scripted(vec![
            MockReply::handoff(
                "TransferToExercise",
                json!({
                    "fitness_goal": "fat loss",
                    "target_muscles": "legs",
                    "experience_level": "beginner"
                }),
            ),
            MockReply::text("Goblet squat — 3×12 — chest up"),
        ]));

        let outcome = driver
            .run_turn(&TurnState::new(), "beginner leg workout for fat loss")
            .await
            .unwrap();

        assert_eq!(outcome.route, NextStep::Specialist(Specialist::Exercise));
        assert_eq!(outcome.response, "Goblet squat — 3×12 — chest up");
        assert_eq!(outcome.state.routing_sentinel, RoutingSentinel::Exercise);
        assert_eq!(outcome.state.exercise.target_muscles, "legs");
        assert_eq!(outcome.state.active_specialist, "exercise_specialist");
        assert_eq!(
            outcome.state.last_specialist_output,
            "Goblet squat — 3×12 — chest up"
        );
        assert_eq!(outcome.state.history.len(), 2);
        assert_eq!(outcome.state.history[1].role, MessageRole::Assistant);
        assert_eq!(provider.call_count().await, 2);
    }

    #[tokio::test]
    async fn test_failed_turn_leaves_caller_state_untouched() {
        let (driver, _provider) = driver(MockLlmProvider::with_failure());
        let state = TurnState {
            routing_sentinel: RoutingSentinel::Diet,
            history: vec![Message::user("old"), Message::assistant("older")],
            ..Default::default()
        };

        let result = driver.run_turn(&state, "new message").await;

        assert!(result.is_err());
        assert_eq!(state.history.len(), 2);
        assert_eq!(state.routing_sentinel, RoutingSentinel::Diet);
    }

    #[tokio::test]
    async fn test_specialist_failure_discards_coordinator_update() {
        let (driver, _provider) = driver(MockLlmProvider::scripted(vec![
            MockReply::handoff("TransferToMythBuster", json!({"myth_claim": "toning"})),
            MockReply::failure("upstream down"),
        ]));

        let result = driver.run_turn(&TurnState::new(), "can I tone my arms?").await;
        assert!(result.is_err());
    }
}

//! Coordinator step
//!
//! Talks to the user first on every turn. The model either answers directly or
//! calls one of the handoff tools, in which case the coordinator stays silent
//! and leaves the slot values and routing sentinel for the specialist.

use crate::agent::driver::TurnSettings;
use crate::agent::prompts::coordinator_prompt;
use crate::error::ConciergeResult;
use crate::llm::provider::{CompletionResponse, LlmError, LlmProvider, Message, ToolCall};
use crate::routing::router::Specialist;
use crate::routing::schema::handoff_tools;
use crate::state::{DietSlots, ExerciseSlots, MythSlots, RoutingSentinel, StateUpdate, TurnState};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, warn};

pub const COORDINATOR_LABEL: &str = "coordinator";

/// What the model decided to do with the turn
#[derive(Debug, Clone, PartialEq)]
pub enum CoordinatorReply {
    /// Answer the user in the coordinator's own voice
    DirectText(String),
    /// Hand the turn to a specialist with the extracted slot values
    Handoff {
        target: Specialist,
        fields: HashMap<String, String>,
    },
}

impl CoordinatorReply {
    /// Classify a completion; only the first structured invocation is honoured
    pub fn from_response(response: &CompletionResponse) -> Result<Self, LlmError> {
        let Some(call) = response.first_tool_call() else {
            return Ok(CoordinatorReply::DirectText(
                response.content.clone().unwrap_or_default(),
            ));
        };

        if let Some(calls) = &response.tool_calls {
            if calls.len() > 1 {
                warn!(
                    returned = calls.len(),
                    accepted = %call.name,
                    "Model returned several handoffs; acting on the first only"
                );
            }
        }

        Self::from_tool_call(call)
    }

    fn from_tool_call(call: &ToolCall) -> Result<Self, LlmError> {
        let target = Specialist::from_handoff_name(&call.name).ok_or_else(|| {
            LlmError::InvalidResponse(format!("Unknown handoff '{}'", call.name))
        })?;

        let arguments = call.arguments.as_object().ok_or_else(|| {
            LlmError::InvalidResponse(format!(
                "Handoff '{}' arguments must be a JSON object",
                call.name
            ))
        })?;

        let fields = target
            .slot_names()
            .iter()
            .map(|name| (name.to_string(), field_text(arguments.get(*name))))
            .collect();

        Ok(CoordinatorReply::Handoff { target, fields })
    }

    /// Translate the reply into the coordinator's state update
    pub fn into_update(self) -> StateUpdate {
        match self {
            CoordinatorReply::DirectText(text) => StateUpdate {
                routing_sentinel: Some(RoutingSentinel::Terminal),
                active_specialist: Some(COORDINATOR_LABEL.to_string()),
                append: Some(Message::assistant(text)),
                ..Default::default()
            },
            CoordinatorReply::Handoff { target, fields } => {
                let slot = |name: &str| fields.get(name).cloned().unwrap_or_default();
                let mut update = StateUpdate {
                    routing_sentinel: Some(target.sentinel()),
                    active_specialist: Some(COORDINATOR_LABEL.to_string()),
                    ..Default::default()
                };

                match target {
                    Specialist::Exercise => {
                        update.exercise = Some(ExerciseSlots {
                            fitness_goal: slot("fitness_goal"),
                            target_muscles: slot("target_muscles"),
                            experience_level: slot("experience_level"),
                        });
                    }
                    Specialist::Diet => {
                        update.diet = Some(DietSlots {
                            dietary_goal: slot("dietary_goal"),
                            dietary_restrictions: slot("dietary_restrictions"),
                        });
                    }
                    Specialist::Myth => {
                        update.myth = Some(MythSlots {
                            myth_claim: slot("myth_claim"),
                        });
                    }
                }

                update
            }
        }
    }
}

/// Render one handoff argument as slot text; absent and null become empty
fn field_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

/// Run the coordinator over the current state
pub async fn run_coordinator(
    provider: &dyn LlmProvider,
    settings: &TurnSettings,
    state: &TurnState,
) -> ConciergeResult<StateUpdate> {
    let request = settings.request(
        coordinator_prompt(&settings.gym_name),
        &state.history,
        Some(handoff_tools()),
    );

    let response = provider.complete(request).await?;
    let reply = CoordinatorReply::from_response(&response)?;

    match &reply {
        CoordinatorReply::DirectText(text) => {
            debug!(response_length = text.len(), "Coordinator answered directly");
        }
        CoordinatorReply::Handoff { target, fields } => {
            debug!(target = ?target, slots = ?fields, "Coordinator handed off");
        }
    }

    Ok(reply.into_update())
}

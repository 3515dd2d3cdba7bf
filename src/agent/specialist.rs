//! Specialist steps
//!
//! One-shot responders: fill the specialist's template from its own slot group,
//! send it with the full history, and append whatever comes back.

use crate::agent::driver::TurnSettings;
use crate::agent::prompts::{diet_prompt, exercise_prompt, myth_prompt};
use crate::error::ConciergeResult;
use crate::llm::provider::{LlmProvider, Message};
use crate::routing::router::Specialist;
use crate::state::{StateUpdate, TurnState};
use tracing::debug;

/// System instruction for `specialist`, built from its slots only
pub fn specialist_prompt(specialist: Specialist, gym_name: &str, state: &TurnState) -> String {
    match specialist {
        Specialist::Exercise => exercise_prompt(gym_name, &state.exercise),
        Specialist::Diet => diet_prompt(gym_name, &state.diet),
        Specialist::Myth => myth_prompt(gym_name, &state.myth),
    }
}

/// Run one specialist over the current state
pub async fn run_specialist(
    specialist: Specialist,
    provider: &dyn LlmProvider,
    settings: &TurnSettings,
    state: &TurnState,
) -> ConciergeResult<StateUpdate> {
    let request = settings.request(
        specialist_prompt(specialist, &settings.gym_name, state),
        &state.history,
        None,
    );

    let response = provider.complete(request).await?;
    let text = response.content.unwrap_or_default();

    debug!(
        specialist = specialist.label(),
        response_length = text.len(),
        "Specialist responded"
    );

    Ok(StateUpdate {
        active_specialist: Some(specialist.label().to_string()),
        append: Some(Message::assistant(text.clone())),
        last_specialist_output: Some(text),
        ..Default::default()
    })
}

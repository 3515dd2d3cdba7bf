//! Per-connection turn state
//!
//! `TurnState` is the record threaded through every step of a turn. Steps never
//! mutate it directly: each returns a [`StateUpdate`] and the driver folds it in
//! with [`TurnState::apply`].

use crate::llm::provider::Message;
use serde::{Deserialize, Serialize};

/// Routing signal written by the coordinator and consumed by the router
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutingSentinel {
    /// Not yet decided for this turn
    #[default]
    None,
    Exercise,
    Diet,
    Myth,
    /// Coordinator answered directly
    Terminal,
}

impl RoutingSentinel {
    pub fn as_key(&self) -> &'static str {
        match self {
            RoutingSentinel::None => "",
            RoutingSentinel::Exercise => "exercise",
            RoutingSentinel::Diet => "diet",
            RoutingSentinel::Myth => "myth",
            RoutingSentinel::Terminal => "terminal",
        }
    }

    /// Parse a sentinel key; anything unrecognized is treated as unset
    pub fn from_key(key: &str) -> Self {
        match key {
            "exercise" => RoutingSentinel::Exercise,
            "diet" => RoutingSentinel::Diet,
            "myth" => RoutingSentinel::Myth,
            "terminal" => RoutingSentinel::Terminal,
            _ => RoutingSentinel::None,
        }
    }
}

/// Slots the exercise specialist consumes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseSlots {
    pub fitness_goal: String,
    pub target_muscles: String,
    pub experience_level: String,
}

/// Slots the diet specialist consumes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DietSlots {
    pub dietary_goal: String,
    pub dietary_restrictions: String,
}

/// Slots the myth buster consumes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MythSlots {
    pub myth_claim: String,
}

/// Conversation state owned by a single channel connection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TurnState {
    pub history: Vec<Message>,
    pub routing_sentinel: RoutingSentinel,
    pub active_specialist: String,
    pub exercise: ExerciseSlots,
    pub diet: DietSlots,
    pub myth: MythSlots,
    pub last_specialist_output: String,
}

/// Partial update produced by one step
///
/// Every field is optional; `None` leaves the corresponding state untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateUpdate {
    pub routing_sentinel: Option<RoutingSentinel>,
    pub active_specialist: Option<String>,
    pub exercise: Option<ExerciseSlots>,
    pub diet: Option<DietSlots>,
    pub myth: Option<MythSlots>,
    /// Appended to history; history is never replaced
    pub append: Option<Message>,
    pub last_specialist_output: Option<String>,
}

impl TurnState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepare for a new inbound message: clear the sentinel, record the user turn
    pub fn begin_turn(&mut self, user_text: impl Into<String>) {
        self.routing_sentinel = RoutingSentinel::None;
        self.history.push(Message::user(user_text));
    }

    /// Merge an update into the state; specified fields overwrite
    pub fn apply(mut self, update: StateUpdate) -> Self {
        if let Some(sentinel) = update.routing_sentinel {
            self.routing_sentinel = sentinel;
        }
        if let Some(label) = update.active_specialist {
            self.active_specialist = label;
        }
        if let Some(slots) = update.exercise {
            self.exercise = slots;
        }
        if let Some(slots) = update.diet {
            self.diet = slots;
        }
        if let Some(slots) = update.myth {
            self.myth = slots;
        }
        if let Some(message) = update.append {
            self.history.push(message);
        }
        if let Some(output) = update.last_specialist_output {
            self.last_specialist_output = output;
        }
        self
    }

    /// Text of the most recent history entry
    pub fn last_message_text(&self) -> Option<&str> {
        self.history.last().map(|m| m.content.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::provider::MessageRole;
    use proptest::prelude::*;

    #[test]
    fn test_new_state_is_empty() {
        let state = TurnState::new();
        assert!(state.history.is_empty());
        assert_eq!(state.routing_sentinel, RoutingSentinel::None);
        assert_eq!(state.exercise, ExerciseSlots::default());
        assert!(state.last_specialist_output.is_empty());
    }

    #[test]
    fn test_begin_turn_resets_sentinel_and_appends_user() {
        let mut state = TurnState {
            routing_sentinel: RoutingSentinel::Diet,
            ..Default::default()
        };

        state.begin_turn("what should I eat?");

        assert_eq!(state.routing_sentinel, RoutingSentinel::None);
        assert_eq!(state.history.len(), 1);
        assert_eq!(state.history[0].role, MessageRole::User);
        assert_eq!(state.history[0].content, "what should I eat?");
    }

    #[test]
    fn test_empty_update_changes_nothing() {
        let state = TurnState {
            history: vec![Message::user("hi")],
            routing_sentinel: RoutingSentinel::Terminal,
            active_specialist: "coordinator".to_string(),
            ..Default::default()
        };

        assert_eq!(state.clone().apply(StateUpdate::default()), state);
    }

    #[test]
    fn test_update_overwrites_only_specified_fields() {
        let state = TurnState {
            diet: DietSlots {
                dietary_goal: "cut".to_string(),
                dietary_restrictions: "vegan".to_string(),
            },
            ..Default::default()
        };

        let updated = state.apply(StateUpdate {
            routing_sentinel: Some(RoutingSentinel::Myth),
            myth: Some(MythSlots {
                myth_claim: "spot reduction works".to_string(),
            }),
            ..Default::default()
        });

        assert_eq!(updated.routing_sentinel, RoutingSentinel::Myth);
        assert_eq!(updated.myth.myth_claim, "spot reduction works");
        assert_eq!(updated.diet.dietary_goal, "cut");
        assert!(updated.history.is_empty());
    }

    #[test]
    fn test_sentinel_keys() {
        for sentinel in [
            RoutingSentinel::Exercise,
            RoutingSentinel::Diet,
            RoutingSentinel::Myth,
            RoutingSentinel::Terminal,
        ] {
            assert_eq!(RoutingSentinel::from_key(sentinel.as_key()), sentinel);
        }
        assert_eq!(RoutingSentinel::from_key(""), RoutingSentinel::None);
        assert_eq!(
            RoutingSentinel::from_key("exercise_specialist"),
            RoutingSentinel::None
        );
    }

    proptest! {
        #[test]
        fn prop_apply_never_shrinks_history(
            existing in prop::collection::vec(".{0,20}", 0..8),
            appended in prop::option::of(".{0,20}"),
        ) {
            let state = TurnState {
                history: existing.iter().map(Message::user).collect(),
                ..Default::default()
            };
            let before = state.history.clone();

            let updated = state.apply(StateUpdate {
                append: appended.clone().map(Message::assistant),
                ..Default::default()
            });

            let expected_len = before.len() + usize::from(appended.is_some());
            prop_assert_eq!(updated.history.len(), expected_len);
            prop_assert_eq!(&updated.history[..before.len()], &before[..]);
        }
    }
}

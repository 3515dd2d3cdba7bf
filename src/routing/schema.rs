//! Handoff schemas offered to the coordinator
//!
//! Each schema is presented to the model as a callable tool. Calling one is how
//! the model hands a turn to a specialist, carrying the slot values that
//! specialist needs. The JSON Schemas are generated from the structs below, so
//! field docs double as the descriptions the model sees.

use crate::llm::provider::ToolDescription;
use crate::routing::router::Specialist;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Transfer to the exercise specialist when the user asks about workouts, exercises, or training plans.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TransferToExercise {
    /// The user's fitness goal, e.g. muscle gain, fat loss, strength
    pub fitness_goal: String,
    /// Target muscle groups, e.g. chest, legs, full body
    pub target_muscles: String,
    /// Beginner, Intermediate, or Advanced
    pub experience_level: String,
}

/// Transfer to the diet specialist when the user asks about nutrition, meal plans, or dietary advice.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TransferToDiet {
    /// The user's dietary goal, e.g. muscle gain, weight loss, maintenance
    pub dietary_goal: String,
    /// Any dietary restrictions like vegetarian, vegan, gluten-free, or none
    pub dietary_restrictions: String,
}

/// Transfer to the myth buster when the user asks about common gym myths, misconceptions, or wants fact-checking.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TransferToMythBuster {
    /// The specific gym myth or claim to evaluate
    pub myth_claim: String,
}

impl Specialist {
    /// Tool name the coordinator calls to reach this specialist
    pub fn handoff_name(&self) -> &'static str {
        match self {
            Specialist::Exercise => "TransferToExercise",
            Specialist::Diet => "TransferToDiet",
            Specialist::Myth => "TransferToMythBuster",
        }
    }

    /// Resolve a tool name back to its specialist
    pub fn from_handoff_name(name: &str) -> Option<Self> {
        Specialist::ALL
            .into_iter()
            .find(|specialist| specialist.handoff_name() == name)
    }

    /// Slot names carried by this specialist's handoff, in schema order
    pub fn slot_names(&self) -> &'static [&'static str] {
        match self {
            Specialist::Exercise => &["fitness_goal", "target_muscles", "experience_level"],
            Specialist::Diet => &["dietary_goal", "dietary_restrictions"],
            Specialist::Myth => &["myth_claim"],
        }
    }

    /// Tool description offered to the completion service
    pub fn handoff_tool(&self) -> ToolDescription {
        let (description, schema) = match self {
            Specialist::Exercise => (
                "Transfer to the exercise specialist when the user asks about workouts, exercises, or training plans.",
                schemars::schema_for!(TransferToExercise),
            ),
            Specialist::Diet => (
                "Transfer to the diet specialist when the user asks about nutrition, meal plans, or dietary advice.",
                schemars::schema_for!(TransferToDiet),
            ),
            Specialist::Myth => (
                "Transfer to the myth buster when the user asks about common gym myths, misconceptions, or wants fact-checking.",
                schemars::schema_for!(TransferToMythBuster),
            ),
        };

        ToolDescription {
            name: self.handoff_name().to_string(),
            description: description.to_string(),
            parameters: serde_json::to_value(schema).unwrap_or_default(),
        }
    }
}

/// All three handoff tools, in a stable order
pub fn handoff_tools() -> Vec<ToolDescription> {
    Specialist::ALL.iter().map(Specialist::handoff_tool).collect()
}

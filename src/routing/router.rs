//! Turn router
//!
//! After the coordinator runs, the router looks only at the routing sentinel
//! and picks the single step that runs next. Specialists always end the turn,
//! so there is no edge back into the coordinator.

use crate::state::RoutingSentinel;
use serde::{Deserialize, Serialize};

/// The three domain specialists a turn can be handed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Specialist {
    Exercise,
    Diet,
    Myth,
}

impl Specialist {
    pub const ALL: [Specialist; 3] = [Specialist::Exercise, Specialist::Diet, Specialist::Myth];

    /// Sentinel value that selects this specialist
    pub fn sentinel(&self) -> RoutingSentinel {
        match self {
            Specialist::Exercise => RoutingSentinel::Exercise,
            Specialist::Diet => RoutingSentinel::Diet,
            Specialist::Myth => RoutingSentinel::Myth,
        }
    }

    /// Label recorded as `active_specialist` after this step speaks
    pub fn label(&self) -> &'static str {
        match self {
            Specialist::Exercise => "exercise_specialist",
            Specialist::Diet => "diet_specialist",
            Specialist::Myth => "myth_buster",
        }
    }
}

/// What runs after the coordinator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextStep {
    Specialist(Specialist),
    End,
}

impl NextStep {
    pub fn is_end(&self) -> bool {
        matches!(self, NextStep::End)
    }

    /// Short routing outcome name used in metrics
    pub fn outcome(&self) -> &'static str {
        match self {
            NextStep::End => "direct",
            NextStep::Specialist(Specialist::Exercise) => "exercise",
            NextStep::Specialist(Specialist::Diet) => "diet",
            NextStep::Specialist(Specialist::Myth) => "myth",
        }
    }
}

/// Map the sentinel to the next step; unset and terminal both end the turn
pub fn route(sentinel: RoutingSentinel) -> NextStep {
    match sentinel {
        RoutingSentinel::Exercise => NextStep::Specialist(Specialist::Exercise),
        RoutingSentinel::Diet => NextStep::Specialist(Specialist::Diet),
        RoutingSentinel::Myth => NextStep::Specialist(Specialist::Myth),
        RoutingSentinel::None | RoutingSentinel::Terminal => NextStep::End,
    }
}

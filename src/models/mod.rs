//! Data structures for the substitution planner: roster, settings, plan output.

mod plan;
mod player;
mod settings;

pub use plan::{Half, PlanError, PlanOutput, PlaytimeEntry, RotationPeriod, RotationPlan};
pub use player::{Player, Roster, RosterError, RosterId};
pub use settings::{
    GameSettings, SettingsError, DEFAULT_COURT_CAPACITY, DEFAULT_HALF_MINUTES,
    DEFAULT_MAX_ROSTER_SIZE,
};

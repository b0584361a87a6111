//! Basketball substitution planner: library with models and business logic.

pub mod logic;
pub mod models;

pub use logic::{
    format_minutes, generate_plan, playtime_csv, rotation_csv, shuffle_names, shuffle_roster,
    shuffle_roster_with, ExportError,
};
pub use models::{
    GameSettings, Half, PlanError, PlanOutput, PlaytimeEntry, Player, RotationPeriod, RotationPlan,
    Roster, RosterError, RosterId, SettingsError,
};

//! Rotation plan output: periods, playtime summary, and planner errors.

use serde::Serialize;

/// Errors the planner reports before computing anything.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PlanError {
    /// Fewer active players than fit on court: no full lineup possible.
    InsufficientPlayers { active: usize, required: usize },
}

impl std::fmt::Display for PlanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlanError::InsufficientPlayers { active, required } => write!(
                f,
                "You need at least {} players to generate a fair substitution plan ({} selected)",
                required, active
            ),
        }
    }
}

impl std::error::Error for PlanError {}

/// Which half a period is shown under. Purely presentational.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Half {
    First,
    Second,
}

impl std::fmt::Display for Half {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Half::First => write!(f, "First Half"),
            Half::Second => write!(f, "Second Half"),
        }
    }
}

/// One time slice with a fixed on-court/bench split.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RotationPeriod {
    pub index: usize,
    pub half: Half,
    /// Elapsed game minutes at the start of the period (unrounded).
    pub start_minutes: f64,
    /// Elapsed game minutes at the end of the period (unrounded).
    pub end_minutes: f64,
    pub start_label: String,
    pub end_label: String,
    /// On-court names, in rotation order starting at the cursor.
    pub on_court: Vec<String>,
    /// Active players not on court, in roster order.
    pub bench: Vec<String>,
}

impl RotationPeriod {
    pub fn duration_minutes(&self) -> f64 {
        self.end_minutes - self.start_minutes
    }
}

/// Accumulated on-court time for one player.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlaytimeEntry {
    pub name: String,
    pub minutes: f64,
    /// `m:ss`, rounded to the nearest second.
    pub display: String,
}

/// A full rotation plan for more active players than court spots.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RotationPlan {
    pub court_capacity: usize,
    pub total_minutes: f64,
    /// Fair-share minutes per player (T × C / N).
    pub target_minutes: f64,
    /// Nominal period length.
    pub rotation_minutes: f64,
    /// Index of the first second-half period.
    pub halftime_index: usize,
    pub periods: Vec<RotationPeriod>,
    /// One entry per active player, in the order the players were given.
    pub playtime: Vec<PlaytimeEntry>,
    pub total_playtime_minutes: f64,
    pub average_playtime_minutes: f64,
}

impl RotationPlan {
    /// Periods shown under the given half.
    pub fn periods_in(&self, half: Half) -> impl Iterator<Item = &RotationPeriod> {
        self.periods.iter().filter(move |p| p.half == half)
    }

    /// Playtime entries sorted by player name.
    pub fn playtime_by_name(&self) -> Vec<&PlaytimeEntry> {
        let mut entries: Vec<&PlaytimeEntry> = self.playtime.iter().collect();
        entries.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        entries
    }
}

/// Successful planner result.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlanOutput {
    Rotation(RotationPlan),
    /// Exactly a full lineup is active: everyone plays the whole game.
    NoRotationNeeded { players: usize },
}

impl PlanOutput {
    /// Periods of the plan (empty when no rotation is needed).
    pub fn periods(&self) -> &[RotationPeriod] {
        match self {
            PlanOutput::Rotation(plan) => &plan.periods,
            PlanOutput::NoRotationNeeded { .. } => &[],
        }
    }

    pub fn rotation(&self) -> Option<&RotationPlan> {
        match self {
            PlanOutput::Rotation(plan) => Some(plan),
            PlanOutput::NoRotationNeeded { .. } => None,
        }
    }

    /// Explanation to show instead of a table, if any.
    pub fn message(&self) -> Option<String> {
        match self {
            PlanOutput::Rotation(_) => None,
            PlanOutput::NoRotationNeeded { players } => Some(format!(
                "Exactly {} players selected: everyone plays the whole game, no substitutions needed",
                players
            )),
        }
    }
}

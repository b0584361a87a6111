//! Planner logic: rotation generation, clock formatting, shuffling, CSV export.

mod clock;
mod export;
mod rotation;
mod shuffle;

pub use clock::format_minutes;
pub use export::{playtime_csv, rotation_csv, ExportError};
pub use rotation::generate_plan;
pub use shuffle::{shuffle_names, shuffle_roster, shuffle_roster_with};

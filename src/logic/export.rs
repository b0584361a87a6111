//! CSV export of a rotation plan (for printing or spreadsheets).

use crate::models::{Half, RotationPlan};
use csv::WriterBuilder;

/// Errors while building a CSV document.
#[derive(Debug)]
pub enum ExportError {
    Csv(csv::Error),
    /// The in-memory buffer could not be finished.
    Buffer(String),
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::Csv(e) => write!(f, "CSV error: {}", e),
            ExportError::Buffer(e) => write!(f, "CSV buffer error: {}", e),
        }
    }
}

impl std::error::Error for ExportError {}

impl From<csv::Error> for ExportError {
    fn from(e: csv::Error) -> Self {
        ExportError::Csv(e)
    }
}

/// One row per period: `half,start,end,on_court,bench`.
pub fn rotation_csv(plan: &RotationPlan) -> Result<String, ExportError> {
    let mut wtr = WriterBuilder::new().from_writer(Vec::new());
    wtr.write_record(["half", "start", "end", "on_court", "bench"])?;
    let periods = plan
        .periods_in(Half::First)
        .chain(plan.periods_in(Half::Second));
    for period in periods {
        let half = period.half.to_string();
        let on_court = period.on_court.join(", ");
        let bench = period.bench.join(", ");
        wtr.write_record([
            half.as_str(),
            period.start_label.as_str(),
            period.end_label.as_str(),
            on_court.as_str(),
            bench.as_str(),
        ])?;
    }
    finish(wtr)
}

/// One row per player, sorted by name: `player,minutes,display`.
pub fn playtime_csv(plan: &RotationPlan) -> Result<String, ExportError> {
    let mut wtr = WriterBuilder::new().from_writer(Vec::new());
    wtr.write_record(["player", "minutes", "display"])?;
    for entry in plan.playtime_by_name() {
        let minutes = format!("{:.2}", entry.minutes);
        wtr.write_record([entry.name.as_str(), minutes.as_str(), entry.display.as_str()])?;
    }
    finish(wtr)
}

fn finish(wtr: csv::Writer<Vec<u8>>) -> Result<String, ExportError> {
    let bytes = wtr
        .into_inner()
        .map_err(|e| ExportError::Buffer(e.error().to_string()))?;
    String::from_utf8(bytes).map_err(|e| ExportError::Buffer(e.to_string()))
}

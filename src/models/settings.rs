//! Game settings: court capacity, half length, roster limit.

use serde::Serialize;

/// Default number of players on court at once.
pub const DEFAULT_COURT_CAPACITY: usize = 5;
/// Default length of one half, in minutes.
pub const DEFAULT_HALF_MINUTES: f64 = 20.0;
/// Default roster limit.
pub const DEFAULT_MAX_ROSTER_SIZE: usize = 10;

/// Errors for invalid settings combinations.
#[derive(Clone, Debug, PartialEq)]
pub enum SettingsError {
    /// Court capacity must be at least 1.
    ZeroCourtCapacity,
    /// Half length must be a positive, finite number of minutes.
    InvalidHalfMinutes(f64),
    /// Roster limit is smaller than the court capacity.
    RosterTooSmall { max_roster_size: usize, court_capacity: usize },
}

impl std::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingsError::ZeroCourtCapacity => write!(f, "Court capacity must be at least 1"),
            SettingsError::InvalidHalfMinutes(m) => {
                write!(f, "Half length must be a positive number of minutes (got {})", m)
            }
            SettingsError::RosterTooSmall {
                max_roster_size,
                court_capacity,
            } => write!(
                f,
                "Roster limit {} is smaller than court capacity {}",
                max_roster_size, court_capacity
            ),
        }
    }
}

impl std::error::Error for SettingsError {}

/// Fixed game parameters the planner runs against.
///
/// Fields are private: a constructed value always has a positive capacity and
/// a positive, finite game length.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GameSettings {
    court_capacity: usize,
    half_minutes: f64,
    max_roster_size: usize,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            court_capacity: DEFAULT_COURT_CAPACITY,
            half_minutes: DEFAULT_HALF_MINUTES,
            max_roster_size: DEFAULT_MAX_ROSTER_SIZE,
        }
    }
}

impl GameSettings {
    pub fn new(
        court_capacity: usize,
        half_minutes: f64,
        max_roster_size: usize,
    ) -> Result<Self, SettingsError> {
        if court_capacity == 0 {
            return Err(SettingsError::ZeroCourtCapacity);
        }
        if !half_minutes.is_finite() || half_minutes <= 0.0 {
            return Err(SettingsError::InvalidHalfMinutes(half_minutes));
        }
        if max_roster_size < court_capacity {
            return Err(SettingsError::RosterTooSmall {
                max_roster_size,
                court_capacity,
            });
        }
        Ok(Self {
            court_capacity,
            half_minutes,
            max_roster_size,
        })
    }

    /// Read `COURT_CAPACITY`, `HALF_MINUTES` and `MAX_ROSTER_SIZE` from the environment.
    /// Missing or unparsable values fall back to the defaults.
    pub fn from_env() -> Result<Self, SettingsError> {
        let court_capacity = env_or("COURT_CAPACITY", DEFAULT_COURT_CAPACITY);
        let half_minutes = env_or("HALF_MINUTES", DEFAULT_HALF_MINUTES);
        let max_roster_size = env_or("MAX_ROSTER_SIZE", DEFAULT_MAX_ROSTER_SIZE);
        Self::new(court_capacity, half_minutes, max_roster_size)
    }

    pub fn court_capacity(&self) -> usize {
        self.court_capacity
    }

    pub fn half_minutes(&self) -> f64 {
        self.half_minutes
    }

    pub fn max_roster_size(&self) -> usize {
        self.max_roster_size
    }

    /// Full game length (two halves).
    pub fn total_minutes(&self) -> f64 {
        2.0 * self.half_minutes
    }
}

fn env_or<T: std::str::FromStr + std::fmt::Display>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => match raw.trim().parse() {
            Ok(v) => v,
            Err(_) => {
                log::warn!("Ignoring unparsable {}={:?}, using {}", key, raw, default);
                default
            }
        },
        Err(_) => default,
    }
}

//! Player and Roster data structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a roster (used by the web layer for lookups).
pub type RosterId = Uuid;

/// Errors that can occur while editing a roster.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RosterError {
    /// Player names must not be blank.
    EmptyName,
    /// A player with this name already exists (names are unique, case-insensitive).
    DuplicatePlayerName,
    /// The roster already holds the maximum number of players.
    RosterFull { max: usize },
    /// No player with this name.
    PlayerNotFound(String),
}

impl std::fmt::Display for RosterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterError::EmptyName => write!(f, "Player name cannot be empty"),
            RosterError::DuplicatePlayerName => write!(f, "A player with this name already exists"),
            RosterError::RosterFull { max } => write!(f, "Roster is full (max {} players)", max),
            RosterError::PlayerNotFound(name) => write!(f, "Player '{}' not found", name),
        }
    }
}

impl std::error::Error for RosterError {}

/// A roster member. Only the name and whether they play this game.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    /// Selected players take part in rotation planning.
    pub selected: bool,
}

impl Player {
    /// New players start selected.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            selected: true,
        }
    }
}

/// Ordered team roster. Order matters: the rotation walks it round-robin.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Roster {
    pub id: RosterId,
    pub players: Vec<Player>,
    pub max_size: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Roster {
    /// Create an empty roster.
    pub fn new(max_size: usize) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            players: Vec::new(),
            max_size,
            created_at: now,
            updated_at: now,
        }
    }

    /// Roster shown to a first-time visitor: a single placeholder player.
    pub fn starter(max_size: usize) -> Self {
        let mut roster = Self::new(max_size);
        if max_size > 0 {
            roster.players.push(Player::new("Player 1"));
        }
        roster
    }

    /// Build a roster from names, applying the same checks as `add_player`.
    pub fn with_names<I, S>(names: I, max_size: usize) -> Result<Self, RosterError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut roster = Self::new(max_size);
        for name in names {
            roster.add_player(name.as_ref())?;
        }
        Ok(roster)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// All names in roster order.
    pub fn names(&self) -> Vec<String> {
        self.players.iter().map(|p| p.name.clone()).collect()
    }

    /// Selected names in roster order: the planner's input.
    pub fn active_players(&self) -> Vec<String> {
        self.players
            .iter()
            .filter(|p| p.selected)
            .map(|p| p.name.clone())
            .collect()
    }

    fn position(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.players
            .iter()
            .position(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Add a selected player at the end of the roster. Names are trimmed and must be unique.
    pub fn add_player(&mut self, name: impl Into<String>) -> Result<(), RosterError> {
        let name = name.into();
        let name_trimmed = name.trim();
        if name_trimmed.is_empty() {
            return Err(RosterError::EmptyName);
        }
        if self.position(name_trimmed).is_some() {
            return Err(RosterError::DuplicatePlayerName);
        }
        if self.players.len() >= self.max_size {
            return Err(RosterError::RosterFull { max: self.max_size });
        }
        self.players.push(Player::new(name_trimmed));
        self.touch();
        Ok(())
    }

    /// Remove a player by name.
    pub fn remove_player(&mut self, name: &str) -> Result<(), RosterError> {
        let idx = self
            .position(name)
            .ok_or_else(|| RosterError::PlayerNotFound(name.to_string()))?;
        self.players.remove(idx);
        self.touch();
        Ok(())
    }

    /// Set whether a player takes part in the next plan.
    pub fn set_selected(&mut self, name: &str, selected: bool) -> Result<(), RosterError> {
        let idx = self
            .position(name)
            .ok_or_else(|| RosterError::PlayerNotFound(name.to_string()))?;
        self.players[idx].selected = selected;
        self.touch();
        Ok(())
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

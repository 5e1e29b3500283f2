//! Team data structure.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a team (used in matches and lookups).
pub type TeamId = Uuid;

fn default_checked_in() -> bool {
    true
}

/// A registered team. Immutable once scheduling starts.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    /// Division label (e.g. "Advanced"); `None` means the open division.
    #[serde(default)]
    pub skill_level: Option<String>,
    /// Only checked-in teams are scheduled.
    #[serde(default = "default_checked_in")]
    pub checked_in: bool,
}

impl Team {
    /// Create a new checked-in team with no skill level.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            skill_level: None,
            checked_in: true,
        }
    }

    /// Create a new checked-in team in the given skill level.
    pub fn with_skill_level(name: impl Into<String>, skill_level: impl Into<String>) -> Self {
        Self {
            skill_level: Some(skill_level.into()),
            ..Self::new(name)
        }
    }
}

/// Teams eligible for scheduling (checked in), in roster order.
pub fn eligible_teams(teams: &[Team]) -> Vec<Team> {
    teams.iter().filter(|t| t.checked_in).cloned().collect()
}

//! Owner record - a user together with the goals they own.

use serde::{Deserialize, Serialize};
use crate::goal::Goal;
use crate::id::GoalId;

/// The stored representation of a user and their goals.
///
/// Fields this crate does not model are kept in `extra` and written back
/// unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnerRecord {
    /// Owner's username
    pub username: String,

    /// Goals owned by this user
    #[serde(default)]
    pub goals: Vec<Goal>,

    /// Unmodeled fields
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl OwnerRecord {
    /// Create an owner with no goals.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            goals: Vec::new(),
            extra: serde_json::Map::new(),
        }
    }

    /// Find a goal by id.
    pub fn goal(&self, id: &GoalId) -> Option<&Goal> {
        self.goals.iter().find(|g| &g.id == id)
    }

    /// Find a goal by id for mutation.
    pub fn goal_mut(&mut self, id: &GoalId) -> Option<&mut Goal> {
        self.goals.iter_mut().find(|g| &g.id == id)
    }

    /// Add a goal and return its id.
    pub fn add_goal(&mut self, goal: Goal) -> GoalId {
        let id = goal.id.clone();
        self.goals.push(goal);
        id
    }
}

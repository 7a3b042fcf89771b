//! Unique identifiers for goals, progress records and their owners.
//!
//! Goal and progress ids are opaque strings. New ids are ULIDs, but any
//! non-empty string read from storage is accepted as-is.

use serde::{Deserialize, Deserializer, Serialize};
use ulid::Ulid;

/// Error for an id that cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("identifier must not be empty")]
pub struct EmptyIdError;

fn non_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let s = String::deserialize(deserializer)?;
    if s.is_empty() {
        return Err(serde::de::Error::custom(EmptyIdError));
    }
    Ok(s)
}

/// Unique identifier for a Goal
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GoalId(#[serde(deserialize_with = "non_empty")] String);

impl GoalId {
    /// Generate a new GoalId
    pub fn new() -> Self {
        Self(Ulid::new().to_string())
    }

    /// Borrow the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for GoalId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for GoalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for GoalId {
    type Err = EmptyIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(EmptyIdError);
        }
        Ok(Self(s.to_string()))
    }
}

/// Unique identifier for a Progress record.
///
/// Generated ids are ULIDs, which sort by creation time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgressId(#[serde(deserialize_with = "non_empty")] String);

impl ProgressId {
    /// Generate a new ProgressId
    pub fn new() -> Self {
        Self(Ulid::new().to_string())
    }

    /// Borrow the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ProgressId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ProgressId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Key of an owner record (the owner's username).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerKey(pub String);

impl OwnerKey {
    /// Create a new owner key.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Borrow the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OwnerKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ids_are_ulids() {
        let id = GoalId::new();
        assert_eq!(id.as_str().len(), 26);
        assert!(id.as_str().parse::<Ulid>().is_ok());

        let parsed: GoalId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_ids_serialize_as_plain_strings() {
        let id = ProgressId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id));

        let owner = OwnerKey::new("alice");
        assert_eq!(serde_json::to_string(&owner).unwrap(), "\"alice\"");
    }

    #[test]
    fn test_timestamp_ids_are_accepted() {
        let goal: GoalId = serde_json::from_str("\"1712345678901\"").unwrap();
        assert_eq!(goal.as_str(), "1712345678901");
        assert_eq!(serde_json::to_string(&goal).unwrap(), "\"1712345678901\"");

        let progress: ProgressId = serde_json::from_str("\"1712345679000\"").unwrap();
        assert_eq!(progress.to_string(), "1712345679000");
        assert_eq!("1712345678901".parse::<GoalId>().unwrap(), goal);
    }

    #[test]
    fn test_empty_ids_are_rejected() {
        assert_eq!("".parse::<GoalId>(), Err(EmptyIdError));
        assert!(serde_json::from_str::<GoalId>("\"\"").is_err());
        assert!(serde_json::from_str::<ProgressId>("\"\"").is_err());
    }
}

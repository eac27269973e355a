//! Relationship (edge) types

use crate::person::PersonId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Unique identifier for a relationship record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RelationshipId(pub Ulid);

impl RelationshipId {
    pub fn new() -> Self {
        Self(Ulid::new())
    }

    pub fn from_string(s: &str) -> Result<Self, ulid::DecodeError> {
        Ok(Self(Ulid::from_string(s)?))
    }
}

impl Default for RelationshipId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RelationshipId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for RelationshipId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_string(s)
    }
}

/// What the source person of an edge is to its target
///
/// `Father` on `a -> b` reads "a is the father of b".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationshipLabel {
    Father,
    Mother,
    Son,
    Daughter,
    Husband,
    Wife,
    Spouse,
}

impl RelationshipLabel {
    pub const ALL: [RelationshipLabel; 7] = [
        Self::Father,
        Self::Mother,
        Self::Son,
        Self::Daughter,
        Self::Husband,
        Self::Wife,
        Self::Spouse,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Father => "Father",
            Self::Mother => "Mother",
            Self::Son => "Son",
            Self::Daughter => "Daughter",
            Self::Husband => "Husband",
            Self::Wife => "Wife",
            Self::Spouse => "Spouse",
        }
    }
}

impl std::fmt::Display for RelationshipLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RelationshipLabel {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .find(|label| label.as_str().eq_ignore_ascii_case(wanted))
            .copied()
            .ok_or_else(|| crate::error::Error::InvalidLabel(s.to_string()))
    }
}

/// A stored relationship between two persons
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub id: RelationshipId,

    /// Source person
    pub from_id: PersonId,

    /// Target person
    pub to_id: PersonId,

    /// What the source is to the target
    pub label: RelationshipLabel,

    /// Soft-delete flag; inactive edges are never traversed
    #[serde(default = "default_active")]
    pub active: bool,

    pub created_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

impl Relationship {
    pub fn new(from_id: PersonId, to_id: PersonId, label: RelationshipLabel) -> Self {
        Self {
            id: RelationshipId::new(),
            from_id,
            to_id,
            label,
            active: true,
            created_at: Utc::now(),
        }
    }

    pub fn deactivated(mut self) -> Self {
        self.active = false;
        self
    }

    /// True if this edge touches `id` on either end
    pub fn involves(&self, id: &PersonId) -> bool {
        self.from_id == *id || self.to_id == *id
    }
}

/// One neighbor of a person as seen from that person: `label` is what the
/// person is to `person_id`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connection {
    pub person_id: PersonId,
    pub label: RelationshipLabel,
}

impl Connection {
    pub fn new(person_id: PersonId, label: RelationshipLabel) -> Self {
        Self { person_id, label }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relationship_creation() {
        let a = PersonId::new();
        let b = PersonId::new();
        let rel = Relationship::new(a, b, RelationshipLabel::Father);

        assert!(rel.active);
        assert!(rel.involves(&a));
        assert!(rel.involves(&b));
        assert!(!rel.deactivated().active);
    }

    #[test]
    fn test_label_parse() {
        assert_eq!(
            "daughter".parse::<RelationshipLabel>().unwrap(),
            RelationshipLabel::Daughter
        );
        assert_eq!(
            " Wife ".parse::<RelationshipLabel>().unwrap(),
            RelationshipLabel::Wife
        );
        assert!("Cousin".parse::<RelationshipLabel>().is_err());
    }

    #[test]
    fn test_inactive_defaults_to_active_when_missing() {
        let a = PersonId::new();
        let b = PersonId::new();
        let mut json = serde_json::to_value(Relationship::new(a, b, RelationshipLabel::Spouse)).unwrap();
        json.as_object_mut().unwrap().remove("active");

        let rel: Relationship = serde_json::from_value(json).unwrap();
        assert!(rel.active);
    }
}

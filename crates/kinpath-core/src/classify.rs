//! Relationship classification and inversion
//!
//! Every decision about what a label means for traversal and layout goes
//! through the table in this module.

use crate::person::Gender;
use crate::relation::RelationshipLabel;
use serde::{Deserialize, Serialize};

/// Traversal category of a relationship label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// Source is a parent of the target; stepping forward moves toward a descendant
    Parent,
    /// Source is a child of the target; stepping forward moves toward an ancestor
    Child,
    /// Same generation
    Spouse,
}

impl EdgeKind {
    /// Generation change implied by stepping toward the node connected by
    /// an edge of this kind. Older generations have lower numbers.
    pub fn generation_delta(self) -> i32 {
        match self {
            Self::Child => -1,
            Self::Parent => 1,
            Self::Spouse => 0,
        }
    }
}

/// Classify a label into its traversal category
pub fn classify(label: RelationshipLabel) -> EdgeKind {
    match label {
        RelationshipLabel::Father | RelationshipLabel::Mother => EdgeKind::Parent,
        RelationshipLabel::Son | RelationshipLabel::Daughter => EdgeKind::Child,
        RelationshipLabel::Husband | RelationshipLabel::Wife | RelationshipLabel::Spouse => {
            EdgeKind::Spouse
        }
    }
}

/// Generation delta for a label (see [`EdgeKind::generation_delta`])
pub fn generation_delta(label: RelationshipLabel) -> i32 {
    classify(label).generation_delta()
}

/// Label for the reciprocal edge, given the gender of the person the
/// reciprocal starts from.
///
/// `None` means the reciprocal cannot be derived and must not be created.
pub fn inverse(label: RelationshipLabel, related_gender: Option<Gender>) -> Option<RelationshipLabel> {
    match classify(label) {
        EdgeKind::Parent => match related_gender? {
            Gender::Male => Some(RelationshipLabel::Son),
            Gender::Female => Some(RelationshipLabel::Daughter),
        },
        EdgeKind::Spouse => Some(match related_gender {
            Some(Gender::Male) => RelationshipLabel::Husband,
            Some(Gender::Female) => RelationshipLabel::Wife,
            None => RelationshipLabel::Spouse,
        }),
        EdgeKind::Child => None,
    }
}

/// [`inverse`] over a raw label string; unparseable labels have no inverse
pub fn inverse_of(raw_label: &str, related_gender: Option<Gender>) -> Option<RelationshipLabel> {
    raw_label
        .parse::<RelationshipLabel>()
        .ok()
        .and_then(|label| inverse(label, related_gender))
}

/// Label describing an incoming edge from its target's side when the store
/// holds no explicit reverse edge.
///
/// Unlike [`inverse`] this is total: reads must always see the neighbor, so
/// an unknown gender falls back to the male form of the mirrored kind.
pub fn implied_reciprocal(label: RelationshipLabel, gender: Option<Gender>) -> RelationshipLabel {
    let female = gender == Some(Gender::Female);
    match classify(label) {
        EdgeKind::Parent if female => RelationshipLabel::Daughter,
        EdgeKind::Parent => RelationshipLabel::Son,
        EdgeKind::Child if female => RelationshipLabel::Mother,
        EdgeKind::Child => RelationshipLabel::Father,
        EdgeKind::Spouse => inverse(label, gender).unwrap_or(RelationshipLabel::Spouse),
    }
}

//! Relationship creation with reciprocal edges

use crate::error::{StorageError, StorageResult};
use crate::traits::StorageBackend;
use kinpath_core::{inverse, PersonId, Relationship, RelationshipLabel};

/// Edges written by [`relate`]
#[derive(Debug, Clone, PartialEq)]
pub struct Related {
    pub primary: Relationship,
    /// `None` when the inverse label is unknown or a reverse edge already exists
    pub reciprocal: Option<Relationship>,
}

impl Related {
    /// Every edge written, primary first
    pub fn all(&self) -> Vec<&Relationship> {
        std::iter::once(&self.primary)
            .chain(self.reciprocal.as_ref())
            .collect()
    }
}

/// Record that `from` is `label` of `to`, plus the reverse edge when its
/// label can be derived from `to`'s gender.
///
/// An unknown inverse keeps the primary edge and logs a warning.
pub async fn relate<S: StorageBackend + ?Sized>(
    storage: &S,
    from: PersonId,
    to: PersonId,
    label: RelationshipLabel,
) -> StorageResult<Related> {
    if from == to {
        return Err(StorageError::InvalidRelationship(format!(
            "cannot relate person {} to themselves",
            from
        )));
    }

    if storage.get_person(&from).await?.is_none() {
        return Err(StorageError::PersonNotFound(from.to_string()));
    }
    let target = storage
        .get_person(&to)
        .await?
        .ok_or_else(|| StorageError::PersonNotFound(to.to_string()))?;

    let existing = storage.get_relationships_for_person(&from).await?;
    if let Some(duplicate) = existing
        .iter()
        .find(|r| r.active && r.from_id == from && r.to_id == to && r.label == label)
    {
        tracing::debug!("Relationship {} -[{}]-> {} already stored", from, label, to);
        return Ok(Related {
            primary: duplicate.clone(),
            reciprocal: None,
        });
    }

    let primary = Relationship::new(from, to, label);
    let reverse_exists = existing
        .iter()
        .any(|r| r.active && r.from_id == to && r.to_id == from);

    let reciprocal = if reverse_exists {
        tracing::debug!("Reverse edge {} -> {} already stored", to, from);
        None
    } else {
        match inverse(label, target.gender) {
            Some(inverse_label) => Some(Relationship::new(to, from, inverse_label)),
            None => {
                tracing::warn!(
                    "No inverse for {} with gender {:?}; skipping reciprocal of {} -> {}",
                    label,
                    target.gender,
                    from,
                    to
                );
                None
            }
        }
    };

    // Both edges land in one batch so a pair is never half written
    let related = Related { primary, reciprocal };
    let edges: Vec<Relationship> = related.all().into_iter().cloned().collect();
    storage.save_relationships_batch(&edges).await?;

    tracing::info!("Created relationship: {} -[{}]-> {}", from, label, to);
    if let Some(rel) = &related.reciprocal {
        tracing::info!("Created reciprocal: {} -[{}]-> {}", to, rel.label, from);
    }

    Ok(related)
}

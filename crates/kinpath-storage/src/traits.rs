//! Storage backend trait definitions

use crate::error::{StorageError, StorageResult};
use async_trait::async_trait;
use kinpath_core::{FamilySnapshot, Person, PersonId, Relationship, RelationshipId};

/// Trait for storage backend implementations
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Initialize the storage (create tables, etc.)
    async fn initialize(&self) -> StorageResult<()>;

    /// Health check
    async fn health_check(&self) -> StorageResult<bool>;

    // ─────────────────────────────────────────────────────────────────────────
    // Person Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Save a person (insert or replace)
    async fn save_person(&self, person: &Person) -> StorageResult<()>;

    /// Get a person by id
    async fn get_person(&self, id: &PersonId) -> StorageResult<Option<Person>>;

    /// Get all persons, ordered by id
    async fn get_all_persons(&self) -> StorageResult<Vec<Person>>;

    /// Delete a person and every relationship touching them
    async fn delete_person(&self, id: &PersonId) -> StorageResult<()>;

    // ─────────────────────────────────────────────────────────────────────────
    // Relationship Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Save a relationship (insert or replace)
    async fn save_relationship(&self, relationship: &Relationship) -> StorageResult<()>;

    /// Get a relationship by id
    async fn get_relationship(&self, id: &RelationshipId) -> StorageResult<Option<Relationship>>;

    /// Get relationships touching a person, active or not
    async fn get_relationships_for_person(&self, id: &PersonId) -> StorageResult<Vec<Relationship>>;

    /// Get all relationships in a deterministic order
    async fn get_all_relationships(&self) -> StorageResult<Vec<Relationship>>;

    /// Delete all relationships touching a person
    async fn delete_relationships_for_person(&self, id: &PersonId) -> StorageResult<()>;

    /// Mark a relationship inactive; it stays stored but is no longer traversed
    async fn deactivate_relationship(&self, id: &RelationshipId) -> StorageResult<Relationship> {
        let relationship = self
            .get_relationship(id)
            .await?
            .ok_or_else(|| StorageError::RelationshipNotFound(id.to_string()))?;
        let relationship = relationship.deactivated();
        self.save_relationship(&relationship).await?;
        Ok(relationship)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Bulk Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Save several persons
    async fn save_persons_batch(&self, persons: &[Person]) -> StorageResult<()> {
        for person in persons {
            self.save_person(person).await?;
        }
        Ok(())
    }

    /// Save several relationships
    async fn save_relationships_batch(&self, relationships: &[Relationship]) -> StorageResult<()> {
        for relationship in relationships {
            self.save_relationship(relationship).await?;
        }
        Ok(())
    }

    /// Load a consistent snapshot for path queries
    async fn load_snapshot(&self) -> StorageResult<FamilySnapshot> {
        let persons = self.get_all_persons().await?;
        let relationships = self.get_all_relationships().await?;
        tracing::debug!(
            "Loaded snapshot: {} persons, {} relationships",
            persons.len(),
            relationships.len()
        );
        Ok(FamilySnapshot::new(persons, relationships))
    }
}

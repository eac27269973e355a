//! In-memory storage backend for testing

use crate::error::{StorageError, StorageResult};
use crate::traits::StorageBackend;
use async_trait::async_trait;
use kinpath_core::{Person, PersonId, Relationship, RelationshipId};
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory storage backend
///
/// Useful for testing and temporary storage. Relationships keep insertion
/// order.
pub struct MemoryStorage {
    persons: RwLock<HashMap<PersonId, Person>>,
    relationships: RwLock<Vec<Relationship>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            persons: RwLock::new(HashMap::new()),
            relationships: RwLock::new(Vec::new()),
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

fn lock_error(e: impl std::fmt::Display) -> StorageError {
    StorageError::Database(format!("Lock error: {}", e))
}

#[async_trait]
impl StorageBackend for MemoryStorage {
    async fn initialize(&self) -> StorageResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> StorageResult<bool> {
        Ok(true)
    }

    // Person operations

    async fn save_person(&self, person: &Person) -> StorageResult<()> {
        person.validate()?;
        let mut persons = self.persons.write().map_err(lock_error)?;
        persons.insert(person.id, person.clone());
        Ok(())
    }

    async fn get_person(&self, id: &PersonId) -> StorageResult<Option<Person>> {
        let persons = self.persons.read().map_err(lock_error)?;
        Ok(persons.get(id).cloned())
    }

    async fn get_all_persons(&self) -> StorageResult<Vec<Person>> {
        let persons = self.persons.read().map_err(lock_error)?;
        let mut all: Vec<Person> = persons.values().cloned().collect();
        all.sort_by_key(|p| p.id);
        Ok(all)
    }

    async fn delete_person(&self, id: &PersonId) -> StorageResult<()> {
        self.delete_relationships_for_person(id).await?;
        let mut persons = self.persons.write().map_err(lock_error)?;
        persons.remove(id);
        Ok(())
    }

    // Relationship operations

    async fn save_relationship(&self, relationship: &Relationship) -> StorageResult<()> {
        let mut relationships = self.relationships.write().map_err(lock_error)?;
        match relationships.iter_mut().find(|r| r.id == relationship.id) {
            Some(existing) => *existing = relationship.clone(),
            None => relationships.push(relationship.clone()),
        }
        Ok(())
    }

    async fn get_relationship(&self, id: &RelationshipId) -> StorageResult<Option<Relationship>> {
        let relationships = self.relationships.read().map_err(lock_error)?;
        Ok(relationships.iter().find(|r| r.id == *id).cloned())
    }

    async fn get_relationships_for_person(&self, id: &PersonId) -> StorageResult<Vec<Relationship>> {
        let relationships = self.relationships.read().map_err(lock_error)?;
        Ok(relationships
            .iter()
            .filter(|r| r.involves(id))
            .cloned()
            .collect())
    }

    async fn get_all_relationships(&self) -> StorageResult<Vec<Relationship>> {
        let relationships = self.relationships.read().map_err(lock_error)?;
        Ok(relationships.clone())
    }

    async fn delete_relationships_for_person(&self, id: &PersonId) -> StorageResult<()> {
        let mut relationships = self.relationships.write().map_err(lock_error)?;
        relationships.retain(|r| !r.involves(id));
        Ok(())
    }

    async fn save_relationships_batch(&self, batch: &[Relationship]) -> StorageResult<()> {
        let mut relationships = self.relationships.write().map_err(lock_error)?;
        for relationship in batch {
            match relationships.iter_mut().find(|r| r.id == relationship.id) {
                Some(existing) => *existing = relationship.clone(),
                None => relationships.push(relationship.clone()),
            }
        }
        Ok(())
    }
}

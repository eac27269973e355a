//! ReDB storage backend

use crate::error::{StorageError, StorageResult};
use crate::migration::{Migratable, CURRENT_VERSION};
use crate::traits::StorageBackend;
use async_trait::async_trait;
use kinpath_core::{Person, PersonId, Relationship, RelationshipId};
use redb::{Database, ReadableTable, TableDefinition};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

// Table definitions
const PERSONS: TableDefinition<&str, &[u8]> = TableDefinition::new("persons");
const RELATIONSHIPS: TableDefinition<&str, &[u8]> = TableDefinition::new("relationships");
const META: TableDefinition<&str, u32> = TableDefinition::new("meta");

const SCHEMA_VERSION_KEY: &str = "schema_version";

/// ReDB storage backend
pub struct RedbStorage {
    db: Mutex<Database>,
}

impl RedbStorage {
    /// Open or create a ReDB database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let db = Database::create(path)?;

        // Initialize tables
        {
            let write_txn = db.begin_write()?;
            {
                write_txn.open_table(PERSONS)?;
                write_txn.open_table(RELATIONSHIPS)?;
                write_txn.open_table(META)?;
            }
            write_txn.commit()?;
        }

        let storage = Self { db: Mutex::new(db) };
        storage.migrate_to_latest()?;
        tracing::debug!("Opened redb storage at {}", path.display());
        Ok(storage)
    }

    fn db(&self) -> StorageResult<MutexGuard<'_, Database>> {
        self.db
            .lock()
            .map_err(|e| StorageError::Database(e.to_string()))
    }

    fn read_relationships(db: &Database) -> StorageResult<Vec<Relationship>> {
        let read_txn = db.begin_read()?;
        let table = read_txn.open_table(RELATIONSHIPS)?;

        let mut relationships = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            let relationship: Relationship = serde_json::from_slice(value.value())?;
            relationships.push(relationship);
        }
        relationships.sort_by_key(|r| (r.created_at, r.id));
        Ok(relationships)
    }
}

impl Migratable for RedbStorage {
    fn get_schema_version(&self) -> StorageResult<u32> {
        let db = self.db()?;
        let read_txn = db.begin_read()?;
        let table = read_txn.open_table(META)?;
        let version = table.get(SCHEMA_VERSION_KEY)?.map(|v| v.value());
        Ok(version.unwrap_or(0))
    }

    fn set_schema_version(&self, version: u32) -> StorageResult<()> {
        let db = self.db()?;
        let write_txn = db.begin_write()?;
        {
            let mut table = write_txn.open_table(META)?;
            table.insert(SCHEMA_VERSION_KEY, version)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn run_migration(&self, version: u32) -> StorageResult<()> {
        match version {
            // Tables are created on open
            1 => Ok(()),
            2 => {
                // Older records lack the active flag; rewrite them with it set
                let db = self.db()?;
                let relationships = Self::read_relationships(&db)?;
                let write_txn = db.begin_write()?;
                {
                    let mut table = write_txn.open_table(RELATIONSHIPS)?;
                    for relationship in &relationships {
                        let key = relationship.id.to_string();
                        let value = serde_json::to_vec(relationship)?;
                        table.insert(key.as_str(), value.as_slice())?;
                    }
                }
                write_txn.commit()?;
                tracing::debug!("Rewrote {} relationship records", relationships.len());
                Ok(())
            }
            other if other > CURRENT_VERSION => Err(StorageError::Migration(format!(
                "unknown schema version {}",
                other
            ))),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl StorageBackend for RedbStorage {
    async fn initialize(&self) -> StorageResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> StorageResult<bool> {
        Ok(self.get_schema_version()? == CURRENT_VERSION)
    }

    async fn save_person(&self, person: &Person) -> StorageResult<()> {
        person.validate()?;
        let key = person.id.to_string();
        let value = serde_json::to_vec(person)?;

        let db = self.db()?;
        let write_txn = db.begin_write()?;
        {
            let mut table = write_txn.open_table(PERSONS)?;
            table.insert(key.as_str(), value.as_slice())?;
        }
        write_txn.commit()?;

        Ok(())
    }

    async fn get_person(&self, id: &PersonId) -> StorageResult<Option<Person>> {
        let key = id.to_string();

        let db = self.db()?;
        let read_txn = db.begin_read()?;
        let table = read_txn.open_table(PERSONS)?;

        if let Some(value) = table.get(key.as_str())? {
            let person: Person = serde_json::from_slice(value.value())?;
            Ok(Some(person))
        } else {
            Ok(None)
        }
    }

    async fn get_all_persons(&self) -> StorageResult<Vec<Person>> {
        let db = self.db()?;
        let read_txn = db.begin_read()?;
        let table = read_txn.open_table(PERSONS)?;

        let mut persons = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            let person: Person = serde_json::from_slice(value.value())?;
            persons.push(person);
        }

        Ok(persons)
    }

    async fn delete_person(&self, id: &PersonId) -> StorageResult<()> {
        let key = id.to_string();

        let db = self.db()?;
        let doomed: Vec<String> = Self::read_relationships(&db)?
            .into_iter()
            .filter(|r| r.involves(id))
            .map(|r| r.id.to_string())
            .collect();

        let write_txn = db.begin_write()?;
        {
            let mut persons = write_txn.open_table(PERSONS)?;
            persons.remove(key.as_str())?;
            let mut relationships = write_txn.open_table(RELATIONSHIPS)?;
            for rel_key in &doomed {
                relationships.remove(rel_key.as_str())?;
            }
        }
        write_txn.commit()?;
        tracing::debug!("Deleted person {} and {} relationships", id, doomed.len());

        Ok(())
    }

    async fn save_relationship(&self, relationship: &Relationship) -> StorageResult<()> {
        let key = relationship.id.to_string();
        let value = serde_json::to_vec(relationship)?;

        let db = self.db()?;
        let write_txn = db.begin_write()?;
        {
            let mut table = write_txn.open_table(RELATIONSHIPS)?;
            table.insert(key.as_str(), value.as_slice())?;
        }
        write_txn.commit()?;

        Ok(())
    }

    async fn get_relationship(&self, id: &RelationshipId) -> StorageResult<Option<Relationship>> {
        let key = id.to_string();

        let db = self.db()?;
        let read_txn = db.begin_read()?;
        let table = read_txn.open_table(RELATIONSHIPS)?;

        if let Some(value) = table.get(key.as_str())? {
            let relationship: Relationship = serde_json::from_slice(value.value())?;
            Ok(Some(relationship))
        } else {
            Ok(None)
        }
    }

    async fn get_relationships_for_person(&self, id: &PersonId) -> StorageResult<Vec<Relationship>> {
        let db = self.db()?;
        Ok(Self::read_relationships(&db)?
            .into_iter()
            .filter(|r| r.involves(id))
            .collect())
    }

    async fn get_all_relationships(&self) -> StorageResult<Vec<Relationship>> {
        let db = self.db()?;
        Self::read_relationships(&db)
    }

    async fn delete_relationships_for_person(&self, id: &PersonId) -> StorageResult<()> {
        let db = self.db()?;
        let doomed: Vec<String> = Self::read_relationships(&db)?
            .into_iter()
            .filter(|r| r.involves(id))
            .map(|r| r.id.to_string())
            .collect();

        let write_txn = db.begin_write()?;
        {
            let mut table = write_txn.open_table(RELATIONSHIPS)?;
            for key in &doomed {
                table.remove(key.as_str())?;
            }
        }
        write_txn.commit()?;

        Ok(())
    }

    async fn save_persons_batch(&self, persons: &[Person]) -> StorageResult<()> {
        if persons.is_empty() {
            return Ok(());
        }
        for person in persons {
            person.validate()?;
        }

        let db = self.db()?;
        let write_txn = db.begin_write()?;
        {
            let mut table = write_txn.open_table(PERSONS)?;
            for person in persons {
                let key = person.id.to_string();
                let value = serde_json::to_vec(person)?;
                table.insert(key.as_str(), value.as_slice())?;
            }
        }
        write_txn.commit()?;
        tracing::debug!("Batch saved {} persons in single transaction", persons.len());

        Ok(())
    }

    async fn save_relationships_batch(&self, relationships: &[Relationship]) -> StorageResult<()> {
        if relationships.is_empty() {
            return Ok(());
        }

        let db = self.db()?;
        let write_txn = db.begin_write()?;
        {
            let mut table = write_txn.open_table(RELATIONSHIPS)?;
            for relationship in relationships {
                let key = relationship.id.to_string();
                let value = serde_json::to_vec(relationship)?;
                table.insert(key.as_str(), value.as_slice())?;
            }
        }
        write_txn.commit()?;
        tracing::debug!(
            "Batch saved {} relationships in single transaction",
            relationships.len()
        );

        Ok(())
    }
}

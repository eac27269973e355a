//! CLI command implementations

pub mod completions;
pub mod config;
pub mod find;
pub mod io;
pub mod person;
pub mod relation;

use std::str::FromStr;

use crate::AppContext;
use kinpath_core::{Person, PersonId};
use kinpath_storage::StorageBackend;

/// Look a person up by id, or by a unique "First Last" name
pub async fn resolve_person(key: &str, ctx: &AppContext) -> anyhow::Result<Person> {
    if let Ok(id) = PersonId::from_str(key) {
        if let Some(person) = ctx.storage.get_person(&id).await? {
            return Ok(person);
        }
    }

    let wanted = key.trim().to_lowercase();
    let mut matches: Vec<Person> = ctx
        .storage
        .get_all_persons()
        .await?
        .into_iter()
        .filter(|p| p.full_name().to_lowercase() == wanted)
        .collect();

    match matches.len() {
        0 => anyhow::bail!("Person '{}' not found", key),
        1 => Ok(matches.remove(0)),
        n => anyhow::bail!(
            "Name '{}' matches {} persons; use an id instead",
            key,
            n
        ),
    }
}

//! Import/Export commands

use std::collections::HashSet;
use std::io::Write;
use std::path::PathBuf;

#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;

use clap::Args;
use serde::{Deserialize, Serialize};

use crate::AppContext;
use kinpath_core::limits::validate_import_persons;
use kinpath_core::{Person, PersonId, Relationship};
use kinpath_storage::StorageBackend;

/// Version written into exported files
const EXPORT_VERSION: &str = "1.0";

#[derive(Args)]
pub struct ImportArgs {
    /// Input file (JSON format)
    pub file: PathBuf,

    /// Merge with existing data (default: error if the database is not empty)
    #[arg(long)]
    pub merge: bool,
}

#[derive(Args)]
pub struct ExportArgs {
    /// Output file (stdout if omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// A whole family graph on disk
#[derive(Debug, Serialize, Deserialize)]
pub struct ExportData {
    pub version: String,
    pub persons: Vec<Person>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

pub async fn run_import(args: &ImportArgs, ctx: &AppContext) -> anyhow::Result<()> {
    tracing::info!("Importing from {:?}", args.file);

    let content = std::fs::read_to_string(&args.file)?;
    let data: ExportData = serde_json::from_str(&content)?;
    tracing::debug!("Import format version: {}", data.version);

    validate_import_persons(data.persons.len())?;
    for person in &data.persons {
        person
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid person {}: {}", person.id, e))?;
    }

    let existing = ctx.storage.get_all_persons().await?;
    if !args.merge && !existing.is_empty() {
        anyhow::bail!(
            "Database already has {} persons. Use --merge to add to existing data.",
            existing.len()
        );
    }

    let known: HashSet<PersonId> = existing
        .iter()
        .chain(&data.persons)
        .map(|p| p.id)
        .collect();
    for rel in &data.relationships {
        if rel.from_id == rel.to_id {
            anyhow::bail!("Relationship {} relates a person to themselves", rel.id);
        }
        for end in [rel.from_id, rel.to_id] {
            if !known.contains(&end) {
                anyhow::bail!("Relationship {} refers to unknown person {}", rel.id, end);
            }
        }
    }

    // Batch save for efficiency
    ctx.storage.save_persons_batch(&data.persons).await?;
    ctx.storage
        .save_relationships_batch(&data.relationships)
        .await?;

    tracing::info!(
        "Imported {} persons and {} relationships",
        data.persons.len(),
        data.relationships.len()
    );
    println!(
        "Imported {} persons and {} relationships",
        data.persons.len(),
        data.relationships.len()
    );

    Ok(())
}

pub async fn run_export(args: &ExportArgs, ctx: &AppContext) -> anyhow::Result<()> {
    let data = ExportData {
        version: EXPORT_VERSION.to_string(),
        persons: ctx.storage.get_all_persons().await?,
        relationships: ctx.storage.get_all_relationships().await?,
    };
    tracing::debug!(
        "Exporting {} persons, {} relationships",
        data.persons.len(),
        data.relationships.len()
    );

    let content = serde_json::to_string_pretty(&data)?;

    if let Some(ref path) = args.output {
        // Write with secure permissions (0o600 = owner read/write only)
        #[cfg(unix)]
        {
            let mut file = std::fs::OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(path)?;
            file.write_all(content.as_bytes())?;
        }
        #[cfg(not(unix))]
        {
            std::fs::write(path, &content)?;
        }
        println!("Exported to {:?}", path);
    } else {
        println!("{}", content);
    }

    Ok(())
}

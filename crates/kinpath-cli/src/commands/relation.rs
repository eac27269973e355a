//! Relationship commands

use std::collections::HashMap;

use clap::{Args, Subcommand};

use super::resolve_person;
use crate::output::{to_json, OutputFormat};
use crate::AppContext;
use kinpath_core::{PersonId, Relationship, RelationshipId, RelationshipLabel};
use kinpath_storage::{relate, StorageBackend};

#[derive(Args)]
pub struct RelationArgs {
    #[command(subcommand)]
    pub command: RelationCommands,
}

#[derive(Subcommand)]
pub enum RelationCommands {
    /// Record that FROM is LABEL of TO (e.g. "Ann Lee" Mother "Bo Lee")
    Add {
        /// Person id or "First Last"
        from: String,
        /// Father, Mother, Son, Daughter, Husband, Wife or Spouse
        label: RelationshipLabel,
        /// Person id or "First Last"
        to: String,
    },
    /// List relationships
    List {
        /// Only relationships involving this person
        person: Option<String>,
        /// Include removed relationships
        #[arg(long)]
        all: bool,
    },
    /// Remove a relationship; it is kept but no longer followed
    Remove {
        /// Relationship id
        id: RelationshipId,
    },
}

pub async fn run(args: &RelationArgs, ctx: &AppContext) -> anyhow::Result<()> {
    match &args.command {
        RelationCommands::Add { from, label, to } => {
            let from = resolve_person(from, ctx).await?;
            let to = resolve_person(to, ctx).await?;

            let related = relate(ctx.storage.as_ref(), from.id, to.id, *label).await?;

            match ctx.format {
                OutputFormat::Json => println!("{}", to_json(&related.all())?),
                OutputFormat::Table => {
                    println!(
                        "Created relationship: {} -[{}]-> {}",
                        from.full_name(),
                        label,
                        to.full_name()
                    );
                    match &related.reciprocal {
                        Some(rel) => println!(
                            "Created reciprocal: {} -[{}]-> {}",
                            to.full_name(),
                            rel.label,
                            from.full_name()
                        ),
                        None => println!("No reciprocal relationship recorded"),
                    }
                }
            }
        }
        RelationCommands::List { person, all } => {
            let relationships = match person {
                Some(key) => {
                    let person = resolve_person(key, ctx).await?;
                    ctx.storage.get_relationships_for_person(&person.id).await?
                }
                None => ctx.storage.get_all_relationships().await?,
            };
            let relationships: Vec<Relationship> = relationships
                .into_iter()
                .filter(|r| *all || r.active)
                .collect();

            match ctx.format {
                OutputFormat::Json => println!("{}", to_json(&relationships)?),
                OutputFormat::Table => {
                    if relationships.is_empty() {
                        println!("No relationships found");
                        return Ok(());
                    }
                    let names = name_lookup(ctx).await?;
                    let name = |id: &PersonId| {
                        names.get(id).cloned().unwrap_or_else(|| id.to_string())
                    };
                    for rel in &relationships {
                        let status = if rel.active { "" } else { "  (inactive)" };
                        println!(
                            "{}  {} -[{}]-> {}{}",
                            rel.id,
                            name(&rel.from_id),
                            rel.label,
                            name(&rel.to_id),
                            status
                        );
                    }
                }
            }
        }
        RelationCommands::Remove { id } => {
            let rel = ctx.storage.deactivate_relationship(id).await?;
            tracing::info!("Deactivated relationship: {}", rel.id);
            println!("Removed relationship: {}", rel.id);
        }
    }

    Ok(())
}

async fn name_lookup(ctx: &AppContext) -> anyhow::Result<HashMap<PersonId, String>> {
    Ok(ctx
        .storage
        .get_all_persons()
        .await?
        .into_iter()
        .map(|p| (p.id, p.full_name()))
        .collect())
}

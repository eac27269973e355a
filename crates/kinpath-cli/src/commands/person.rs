//! Person commands

use clap::{Args, Subcommand};
use serde::Serialize;

use super::resolve_person;
use crate::output::{lifespan, person_row, to_json, OutputFormat};
use crate::AppContext;
use kinpath_core::{Gender, Person, Relationship};
use kinpath_storage::StorageBackend;

#[derive(Args)]
pub struct PersonArgs {
    #[command(subcommand)]
    pub command: PersonCommands,
}

#[derive(Subcommand)]
pub enum PersonCommands {
    /// Add a new person
    Add {
        /// First name
        first_name: String,
        /// Last name
        last_name: String,
        /// Year of birth
        #[arg(short, long)]
        birth_year: i32,
        /// Year of death
        #[arg(long)]
        death_year: Option<i32>,
        /// Gender: male, female
        #[arg(short, long)]
        gender: Option<Gender>,
        /// Addresses (repeatable)
        #[arg(long)]
        address: Vec<String>,
        /// Religions (repeatable)
        #[arg(long)]
        religion: Vec<String>,
    },
    /// List persons
    List {
        /// Only names containing this text
        #[arg(short, long)]
        name: Option<String>,
        /// Limit results
        #[arg(short, long, default_value = "100")]
        limit: usize,
    },
    /// Show a person and their relationships
    Get {
        /// Person id or "First Last"
        person: String,
    },
    /// Delete a person and their relationships
    Delete {
        /// Person id or "First Last"
        person: String,
        /// Skip confirmation
        #[arg(long)]
        force: bool,
    },
}

/// A person with the relationships they take part in
#[derive(Serialize)]
struct PersonDetails<'a> {
    person: &'a Person,
    relationships: Vec<&'a Relationship>,
}

pub async fn run(args: &PersonArgs, ctx: &AppContext) -> anyhow::Result<()> {
    match &args.command {
        PersonCommands::Add {
            first_name,
            last_name,
            birth_year,
            death_year,
            gender,
            address,
            religion,
        } => {
            let mut person = Person::new(first_name, last_name, *birth_year);
            person.death_year = *death_year;
            person.gender = *gender;
            person.addresses = address.clone();
            person.religions = religion.clone();

            ctx.storage.save_person(&person).await?;
            tracing::info!("Created person: {} ({})", person.full_name(), person.id);

            match ctx.format {
                OutputFormat::Json => println!("{}", to_json(&person)?),
                OutputFormat::Table => {
                    println!("Created person: {} ({})", person.full_name(), person.id)
                }
            }
        }
        PersonCommands::List { name, limit } => {
            let needle = name.as_ref().map(|n| n.to_lowercase());
            let persons: Vec<Person> = ctx
                .storage
                .get_all_persons()
                .await?
                .into_iter()
                .filter(|p| match &needle {
                    Some(n) => p.full_name().to_lowercase().contains(n),
                    None => true,
                })
                .take(*limit)
                .collect();

            match ctx.format {
                OutputFormat::Json => println!("{}", to_json(&persons)?),
                OutputFormat::Table => {
                    if persons.is_empty() {
                        println!("No persons found");
                    }
                    for person in &persons {
                        println!("{}", person_row(person));
                    }
                }
            }
        }
        PersonCommands::Get { person } => {
            let person = resolve_person(person, ctx).await?;
            let relationships = ctx.storage.get_relationships_for_person(&person.id).await?;
            let outgoing: Vec<&Relationship> = relationships
                .iter()
                .filter(|r| r.from_id == person.id)
                .collect();

            match ctx.format {
                OutputFormat::Json => println!(
                    "{}",
                    to_json(&PersonDetails {
                        person: &person,
                        relationships: relationships.iter().collect(),
                    })?
                ),
                OutputFormat::Table => {
                    println!("{} ({})", person.full_name(), person.id);
                    println!("  Lived: {}", lifespan(&person));
                    if let Some(gender) = person.gender {
                        println!("  Gender: {}", gender);
                    }
                    if !person.addresses.is_empty() {
                        println!("  Addresses: {}", person.address_summary());
                    }
                    if !person.religions.is_empty() {
                        println!("  Religions: {}", person.religion_summary());
                    }
                    if !outgoing.is_empty() {
                        println!("  Relationships:");
                    }
                    for rel in outgoing {
                        let other = ctx
                            .storage
                            .get_person(&rel.to_id)
                            .await?
                            .map(|p| p.full_name())
                            .unwrap_or_else(|| rel.to_id.to_string());
                        let status = if rel.active { "" } else { " (inactive)" };
                        println!("    {} of {} [{}]{}", rel.label, other, rel.id, status);
                    }
                }
            }
        }
        PersonCommands::Delete { person, force } => {
            let person = resolve_person(person, ctx).await?;

            if !force {
                println!(
                    "Use --force to confirm deletion of '{}' ({})",
                    person.full_name(),
                    person.id
                );
                return Ok(());
            }

            ctx.storage.delete_person(&person.id).await?;
            tracing::info!("Deleted person: {}", person.id);
            println!("Deleted person: {}", person.full_name());
        }
    }

    Ok(())
}

//! Relationship path command

use clap::Args;
use serde::Serialize;

use super::resolve_person;
use crate::output::{to_json, OutputFormat};
use crate::AppContext;
use kinpath_core::{find_relationship, LayoutEngine, LayoutResult, PathResult, PersonId};
use kinpath_storage::StorageBackend;

#[derive(Args)]
pub struct FindArgs {
    /// First person (id or "First Last")
    pub person_a: String,

    /// Second person (id or "First Last")
    pub person_b: String,

    /// Hops searched from each side
    #[arg(long, env = "KINPATH_MAX_DEPTH")]
    pub max_depth: Option<u32>,

    /// Also compute the generation layout of the path
    #[arg(long)]
    pub layout: bool,
}

#[derive(Serialize)]
struct FindOutput<'a> {
    #[serde(flatten)]
    result: &'a PathResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    layout: Option<LayoutResult>,
}

pub async fn run(args: &FindArgs, ctx: &AppContext) -> anyhow::Result<()> {
    let person_a = resolve_person(&args.person_a, ctx).await?;
    let person_b = resolve_person(&args.person_b, ctx).await?;
    let max_depth = args.max_depth.unwrap_or(ctx.config.max_depth);

    let snapshot = ctx.storage.load_snapshot().await?;
    let result = find_relationship(&snapshot, person_a.id, person_b.id, max_depth)?;
    tracing::info!(
        "Searched {} nodes in {} rounds",
        result.stats.nodes_expanded,
        result.stats.rounds
    );

    let layout = args
        .layout
        .then(|| result.layout(&LayoutEngine::new(ctx.config.layout)));

    match ctx.format {
        OutputFormat::Json => println!(
            "{}",
            to_json(&FindOutput {
                result: &result,
                layout,
            })?
        ),
        OutputFormat::Table => print_table(&result, layout.as_ref()),
    }

    Ok(())
}

fn print_table(result: &PathResult, layout: Option<&LayoutResult>) {
    println!("{}", result.message);
    if !result.connection_found {
        return;
    }

    let name = |id: &PersonId| {
        result
            .graph
            .get(id)
            .map(|n| n.person.full_name())
            .unwrap_or_else(|| id.to_string())
    };

    if let Some(meeting) = &result.meeting_person_id {
        println!("Meeting point: {}", name(meeting));
    }

    let nodes = result.ordered_nodes();
    if nodes.len() > 1 {
        println!();
    }
    for node in &nodes {
        if let Some(link) = &node.to {
            println!(
                "  {} is {} of {}",
                node.person.full_name(),
                link.label,
                name(&link.person_id)
            );
        }
    }

    if let Some(layout) = layout {
        println!();
        println!("Layout ({} x {}):", layout.width, layout.height);
        for node in &nodes {
            let id = node.id();
            if let (Some(info), Some(pos)) = (layout.generations.get(&id), layout.positions.get(&id)) {
                println!(
                    "  gen {} col {}  ({}, {})  {}",
                    info.generation,
                    info.column,
                    pos.x,
                    pos.y,
                    node.person.full_name()
                );
            }
        }
    }
}

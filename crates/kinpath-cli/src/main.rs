//! Kinpath CLI - Find how two people in a family tree are related

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::{completions, find, io, person, relation};
use config::{config_file_path, default_data_dir, Config};
use kinpath_storage::RedbStorage;
use output::OutputFormat;

#[derive(Parser)]
#[command(name = "kinpath")]
#[command(author, version, about = "Find how two people in a family tree are related")]
pub struct Cli {
    /// Data directory
    #[arg(short, long, env = "KINPATH_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Config file
    #[arg(long, env = "KINPATH_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format: table, json
    #[arg(short, long, global = true)]
    pub format: Option<String>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(config_file_path)
    }

    /// Get the data directory path: flag or env, then config, then default
    pub fn data_dir(&self, config: &Config) -> PathBuf {
        self.data_dir
            .clone()
            .or_else(|| config.data_dir.clone())
            .unwrap_or_else(default_data_dir)
    }

    pub fn output_format(&self, config: &Config) -> OutputFormat {
        OutputFormat::from(self.format.as_deref().unwrap_or(&config.default_format))
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage persons
    Person(person::PersonArgs),
    /// Manage relationships
    Relation(relation::RelationArgs),
    /// Find how two persons are related
    Find(find::FindArgs),
    /// Import persons and relationships from a JSON file
    Import(io::ImportArgs),
    /// Export persons and relationships as JSON
    Export(io::ExportArgs),
    /// Manage configuration
    Config(commands::config::ConfigArgs),
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Application context with storage backend
pub struct AppContext {
    pub storage: Arc<RedbStorage>,
    pub config: Config,
    pub format: OutputFormat,
}

impl AppContext {
    pub async fn new(cli: &Cli, config: Config) -> anyhow::Result<Self> {
        let data_dir = cli.data_dir(&config);
        std::fs::create_dir_all(&data_dir)?;

        let db_path = data_dir.join("kinpath.redb");
        tracing::debug!("Using database at: {:?}", db_path);

        let storage = RedbStorage::open(&db_path)?;
        let format = cli.output_format(&config);

        Ok(Self {
            storage: Arc::new(storage),
            config,
            format,
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .init();

    tracing::debug!("Starting kinpath CLI");

    // These never touch the database
    match &cli.command {
        Commands::Config(args) => return commands::config::run(args, &cli.config_path()),
        Commands::Completions(args) => return completions::run(args),
        _ => {}
    }

    let config = Config::load_from(&cli.config_path())?;
    let ctx = AppContext::new(&cli, config).await?;

    match &cli.command {
        Commands::Person(args) => person::run(args, &ctx).await?,
        Commands::Relation(args) => relation::run(args, &ctx).await?,
        Commands::Find(args) => find::run(args, &ctx).await?,
        Commands::Import(args) => io::run_import(args, &ctx).await?,
        Commands::Export(args) => io::run_export(args, &ctx).await?,
        Commands::Config(_) | Commands::Completions(_) => {}
    }

    Ok(())
}

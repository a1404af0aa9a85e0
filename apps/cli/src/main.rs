//! Aula command-line entry point.

mod app;
mod config;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "aula", version)]
#[command(about = "List, download and upload class files by subject")]
struct Cli {
    /// Base URL of the storage API (overrides the config file)
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// API key sent with every request (overrides the config file)
    #[arg(long, global = true, env = "AULA_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Subject the command applies to
    #[arg(long, short, global = true)]
    category: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the files of a subject
    List {
        /// Only show names containing this text (case-insensitive)
        #[arg(long, short)]
        filter: Option<String>,
    },
    /// Download a file of a subject
    Download {
        /// File name as shown by `list`
        file: String,
        /// Directory to save into (defaults to the configured one)
        #[arg(long, short)]
        out: Option<PathBuf>,
    },
    /// Upload a file to a subject
    Upload {
        /// Local file to upload
        path: PathBuf,
        /// Name to store the file under (defaults to the local name)
        #[arg(long)]
        name: Option<String>,
        /// Declared content type (guessed from the extension by default)
        #[arg(long)]
        content_type: Option<String>,
    },
    /// Show the subjects offered
    Categories,
}

fn main() -> anyhow::Result<ExitCode> {
    // Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = config::Config::load()?;
    config.apply_overrides(cli.endpoint, cli.api_key, cli.category);
    tracing::debug!(
        endpoint = %config.endpoint,
        category = %config.category,
        "configuration loaded"
    );

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(app::run(&config, cli.command))
}

//! yamlview CLI - Main entry point

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "yamlview")]
#[command(version)]
#[command(about = "Render YAML documents as formatted HTML", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a YAML file to a standalone HTML page
    Render {
        /// Input YAML file
        input: PathBuf,

        /// Write output to FILE (stdout if omitted)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Leave the scroll-sync script out of the page
        #[arg(long)]
        no_scroll_sync: bool,

        /// JSON config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Serve a live preview that re-renders whenever the file changes
    Preview {
        /// Input YAML file
        input: PathBuf,

        /// Host to bind to
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short = 'P', long)]
        port: Option<u16>,

        /// Disable scroll synchronization
        #[arg(long)]
        no_scroll_sync: bool,

        /// JSON config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Logs go to stderr so rendered HTML on stdout stays clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "yamlview=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            input,
            output,
            no_scroll_sync,
            config,
        } => commands::render::execute(commands::render::RenderArgs {
            input,
            output,
            no_scroll_sync,
            config,
        }),
        Commands::Preview {
            input,
            host,
            port,
            no_scroll_sync,
            config,
        } => commands::preview::execute(commands::preview::PreviewArgs {
            input,
            host,
            port,
            no_scroll_sync,
            config,
        }),
    }
}

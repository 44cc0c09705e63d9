//! rdb2epub CLI - turn bookmarked articles into EPUB packages

mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "rdb2epub")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (default: ~/.rdb2epub/rdb2epub.toml)
    #[arg(short, long, global = true, env = "RDB2EPUB_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert every bookmark added since the last sync
    Sync {
        /// Directory receiving the packages and the sync marker
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Read articles from a directory of JSON files instead of Readability
        #[arg(long)]
        from_dir: Option<PathBuf>,

        /// Print the run report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Convert a single article stored as JSON
    Convert {
        /// Article JSON file
        input: PathBuf,

        /// Directory receiving the package
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Overwrite an existing package
        #[arg(short, long)]
        force: bool,
    },

    /// Render a cover image for a title
    Cover {
        /// Title drawn on the cover
        title: String,

        /// Output PNG file
        #[arg(short, long)]
        output: PathBuf,

        /// Logo image (default: from config)
        #[arg(short, long)]
        logo: Option<PathBuf>,
    },

    /// Write a default config file
    InitConfig {
        /// Where to write it (default: ~/.rdb2epub/rdb2epub.toml)
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; RUST_LOG wins over --verbose
    let filter = if cli.verbose {
        "rdb2epub_cli=debug,rdb2epub_core=debug"
    } else {
        "rdb2epub_cli=info,rdb2epub_core=info"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let load_config = || config::load_config(cli.config.as_deref());

    match cli.command {
        Commands::Sync {
            output_dir,
            from_dir,
            json,
        } => commands::sync(&load_config()?, output_dir, from_dir, json).await,

        Commands::Convert {
            input,
            output_dir,
            force,
        } => commands::convert(&load_config()?, &input, output_dir, force).await,

        Commands::Cover {
            title,
            output,
            logo,
        } => commands::cover(&load_config()?, &title, &output, logo.as_deref()),

        Commands::InitConfig { path, force } => commands::init_config(path, force),
    }
}

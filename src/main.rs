use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use shelfdl::commands::{self, download::DownloadOptions, Credentials};

#[derive(Parser)]
#[clap(name = "shelfdl")]
#[clap(about = "Download and unpack the audiobooks on your store shelf")]
#[clap(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Store account name (defaults to the one in the config file)
    #[clap(short, long, global = true)]
    username: Option<String>,
    /// Store account password
    #[clap(short, long, global = true, env = "SHELFDL_PASSWORD", hide_env_values = true)]
    password: Option<String>,
    /// Print debug logs to stderr
    #[clap(short, long, global = true)]
    verbose: bool,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the items on your shelf
    List,
    /// Download an item and unpack it
    Download {
        /// Item reference URL (default: the first item on the shelf)
        #[clap(short, long)]
        item: Option<String>,
        /// Folder to download into (default: output_dir from the config file)
        #[clap(short, long)]
        output: Option<PathBuf>,
        /// Choose the item interactively
        #[clap(long, conflicts_with = "item")]
        pick: bool,
    },
    /// Unpack an archive kept by a failed download
    Extract {
        /// Path to the .zip archive
        archive: PathBuf,
        /// Folder to unpack into (default: next to the archive, without .zip)
        #[clap(short, long)]
        output: Option<PathBuf>,
    },
    /// Show the configuration in use
    Config,
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "shelfdl=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let credentials = Credentials {
        username: cli.username,
        password: cli.password,
    };

    let result = match cli.command {
        Commands::List => commands::list::list_items(&credentials).map_err(|e| anyhow::anyhow!(e)),
        Commands::Download { item, output, pick } => {
            let options = DownloadOptions { item, output, pick };
            commands::download::download_item(&credentials, &options)
                .map_err(|e| anyhow::anyhow!(e))
        }
        Commands::Extract { archive, output } => {
            commands::extract::extract_archive(&archive, output.as_deref())
                .map_err(|e| anyhow::anyhow!(e))
        }
        Commands::Config => commands::config::show_config().map_err(|e| anyhow::anyhow!(e)),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    Ok(())
}

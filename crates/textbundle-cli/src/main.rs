//! textbundle CLI - Inspect and convert TextBundles
//!
//! Commands:
//! - `textbundle info` - Show metadata, content and assets of a bundle
//! - `textbundle pack` - Pack a `.textbundle` directory into a `.textpack`
//! - `textbundle unpack` - Unpack a `.textpack` into a directory
//! - `textbundle optimize` - Remove assets the content does not reference
//! - `textbundle add-asset` / `remove-asset` - Edit the asset set
//! - `textbundle write-content` - Replace the primary markdown content

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use textbundle_cli::{CliConfig, DEFAULT_CONFIG_FILE, commands, logging};

#[derive(Parser)]
#[command(name = "textbundle")]
#[command(author, version, about = "Inspect and convert TextBundle and TextPack files", long_about = None)]
struct Cli {
    /// Path to a config file (default: ./textbundle.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show metadata, content and assets of a bundle
    Info {
        /// Bundle directory or archive
        bundle: PathBuf,
    },

    /// Pack a bundle directory into an archive
    Pack {
        /// Bundle directory
        dir: PathBuf,

        /// Archive to create (replaced if it exists)
        archive: PathBuf,
    },

    /// Unpack an archive into a bundle directory
    Unpack {
        /// Archive to read
        archive: PathBuf,

        /// Directory to create or overwrite
        dir: PathBuf,
    },

    /// Remove assets not referenced by the primary content
    Optimize {
        /// Bundle directory or archive
        bundle: PathBuf,
    },

    /// Copy a file into the bundle's assets
    AddAsset {
        /// Bundle directory or archive (an archive is created if missing)
        bundle: PathBuf,

        /// File to add
        file: PathBuf,

        /// Name under assets/ (default: the file's name)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Remove an asset
    RemoveAsset {
        /// Bundle directory or archive
        bundle: PathBuf,

        /// Name under assets/
        name: String,
    },

    /// Replace the primary content with a markdown file
    WriteContent {
        /// Bundle directory or archive (an archive is created if missing)
        bundle: PathBuf,

        /// Markdown file to store
        file: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = CliConfig::load(cli.config.as_deref(), Path::new(DEFAULT_CONFIG_FILE))?;
    logging::init(&config.log_level, cli.verbose)?;
    let options = &config.archive;

    match cli.command {
        Commands::Info { bundle } => {
            commands::info(&bundle, options)?;
        }
        Commands::Pack { dir, archive } => {
            commands::pack(&dir, &archive, options)?;
        }
        Commands::Unpack { archive, dir } => {
            commands::unpack(&archive, &dir, options)?;
        }
        Commands::Optimize { bundle } => {
            commands::optimize(&bundle, options)?;
        }
        Commands::AddAsset { bundle, file, name } => {
            commands::add_asset(&bundle, &file, name.as_deref(), options)?;
        }
        Commands::RemoveAsset { bundle, name } => {
            commands::remove_asset(&bundle, &name, options)?;
        }
        Commands::WriteContent { bundle, file } => {
            commands::write_content(&bundle, &file, options)?;
        }
    }

    Ok(())
}

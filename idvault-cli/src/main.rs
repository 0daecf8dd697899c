//! `idvault`: create, list, inspect, validate, export and delete identity
//! vault documents.
//!
//! Every vault lives in `<base dir>/<vault id>/`, with its document in
//! `vault.json` and exported records in `dids/`, `keys/`, `private-keys/`
//! and `vcs/`.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use eyre::{eyre, Result};
use tracing_subscriber::EnvFilter;

use crate::commands::Workspace;

#[derive(Parser)]
#[command(name = "idvault")]
#[command(author, version, about = "Command-line interface for identity vaults")]
#[command(propagate_version = true)]
struct Cli {
    /// Directory holding one sub-directory per vault
    #[arg(long, env = "IDVAULT_DIR", global = true)]
    base_dir: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an empty vault
    New {
        /// Vault id
        id: String,
        /// Overwrite an existing vault document
        #[arg(long)]
        force: bool,
    },

    /// Print a vault document
    Show {
        /// Vault id
        id: String,
        /// Indent the output
        #[arg(long)]
        pretty: bool,
    },

    /// Show record counts and document size
    Stats {
        /// Vault id
        id: String,
    },

    /// Check vault integrity; exits non-zero on any violation
    Validate {
        /// Vault id
        id: String,
    },

    /// Print the keyed adapter records
    Adapters {
        /// Vault id
        id: String,
    },

    /// Write adapter records into the vault's store directories
    Export {
        /// Vault id
        id: String,
    },

    /// List stored vaults
    List,

    /// Delete a vault with its document and exported records
    Delete {
        /// Vault id
        id: String,
    },

    /// Run a named vault operation
    Exec {
        /// Vault id
        id: String,
        /// Operation name (stats, validate, find-vc)
        operation: String,
        /// Operation arguments as JSON
        #[arg(long, default_value = "null")]
        args: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // also installs the `log` bridge, so records from idvault-core show up here
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with_writer(std::io::stderr)
        .init();

    let base_dir = cli
        .base_dir
        .or_else(|| dirs::data_dir().map(|dir| dir.join("idvault")))
        .ok_or_else(|| eyre!("no data directory found; pass --base-dir or set IDVAULT_DIR"))?;
    tracing::debug!("base directory: {}", base_dir.display());

    let workspace = Workspace::open(&base_dir);
    let output = match &cli.command {
        Commands::New { id, force } => commands::new_vault(&workspace, id, *force)?,
        Commands::Show { id, pretty } => commands::show(&workspace, id, *pretty)?,
        Commands::Stats { id } => commands::stats(&workspace, id)?,
        Commands::Validate { id } => commands::validate(&workspace, id)?,
        Commands::Adapters { id } => commands::adapters(&workspace, id)?,
        Commands::Export { id } => commands::export(&workspace, id)?,
        Commands::List => commands::list(&workspace)?,
        Commands::Delete { id } => commands::delete(&workspace, id)?,
        Commands::Exec {
            id,
            operation,
            args,
        } => commands::exec(&workspace, id, operation, args)?,
    };
    println!("{output}");
    Ok(())
}

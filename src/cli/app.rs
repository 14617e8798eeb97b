//! Main CLI application structure

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::graph_cmd::{self, Session};
use super::output::{Output, OutputFormat};
use crate::storage::{Config, Workspace};

#[derive(Parser)]
#[command(name = "buildgraph")]
#[command(author, version, about = "Declare component packages and inspect their build graph")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the user config, then text; init ignores the config)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Path to the manifest (defaults to the nearest buildgraph.toml)
    #[arg(long, short = 'm', global = true)]
    pub manifest: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a buildgraph.toml with a single component
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Component name (defaults to the directory name)
        #[arg(long)]
        name: Option<String>,
    },

    /// List declared components
    List,

    /// Show the assembled package of a component
    Show {
        /// Component name (defaults to the manifest root)
        component: Option<String>,
    },

    /// Print the package tree of a component
    Tree {
        /// Component name (defaults to the manifest root)
        component: Option<String>,
    },

    /// Print the build plan a generator would receive
    Plan {
        /// Component name (defaults to the manifest root)
        component: Option<String>,
    },

    /// Assemble every declared component and report failures
    Check,
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // init never reads user settings, so a broken config must not block it
    let config = match cli.command {
        Commands::Init { .. } => None,
        _ => Some(Config::load()?),
    };
    let format = cli
        .format
        .or_else(|| config.as_ref().map(|c| c.default_format.into()))
        .unwrap_or_default();
    let config = config.unwrap_or_default();
    let output = Output::new(format, cli.verbose);

    output.verbose("buildgraph starting");
    output.verbose_ctx(
        "config",
        &format!("format={:?}, memoize={}", format, config.memoize),
    );

    let open_session = || Session::open(cli.manifest.as_deref(), &config, &output);

    match cli.command {
        Commands::Init { path, name } => init(&output, &path, name.as_deref())?,
        Commands::List => graph_cmd::list(&open_session()?, &output)?,
        Commands::Show { component } => {
            graph_cmd::show(&open_session()?, &output, component.as_deref())?
        }
        Commands::Tree { component } => {
            graph_cmd::tree(&open_session()?, &output, component.as_deref())?
        }
        Commands::Plan { component } => {
            graph_cmd::plan(&open_session()?, &output, component.as_deref())?
        }
        Commands::Check => graph_cmd::check(&open_session()?, &output)?,
    }

    output.verbose("Command completed successfully");
    Ok(())
}

/// Creates a workspace manifest
fn init(output: &Output, path: &Path, name: Option<&str>) -> Result<()> {
    output.verbose_ctx("init", &format!("Initializing workspace at: {}", path.display()));
    let workspace = Workspace::init(path, name)?;
    output.verbose_ctx(
        "init",
        &format!("Manifest at: {}", workspace.manifest_path().display()),
    );

    if output.is_json() {
        output.data(&serde_json::json!({
            "manifest": workspace.manifest_path().display().to_string(),
            "root": workspace.manifest().root,
        }));
    } else {
        output.success(&format!(
            "Initialized buildgraph workspace at {}",
            workspace.root().display()
        ));
    }

    Ok(())
}

mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use fnpack_core::Language;

#[derive(Parser)]
#[command(
    name = "fnpack",
    about = "Package Node.js function directories into reproducible zip archives"
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean, install, compile, normalize and zip one or more function directories
    Package {
        /// Function directories (default: current directory)
        dirs: Vec<PathBuf>,
        #[command(flatten)]
        function: FunctionArgs,
        /// Print the function manifest(s) as JSON on stdout
        #[arg(long)]
        json: bool,
    },
    /// Remove build outputs, dependencies, lockfile and archive
    Clean {
        /// Function directory (default: current directory)
        #[arg(default_value = ".")]
        dir: PathBuf,
        #[command(flatten)]
        function: FunctionArgs,
    },
    /// Show the stages and commands a package run would execute
    Plan {
        /// Function directory (default: current directory)
        #[arg(default_value = ".")]
        dir: PathBuf,
        #[command(flatten)]
        function: FunctionArgs,
    },
    /// Write a commented fnpack.toml into a function directory
    Init {
        /// Function directory (default: current directory)
        #[arg(default_value = ".")]
        dir: PathBuf,
        /// Source language: ts (compiled) or js (interpreted)
        #[arg(long, short = 'l')]
        language: Language,
    },
    /// Check that the configured toolchain is installed
    Doctor {
        /// Function directory (default: current directory)
        #[arg(default_value = ".")]
        dir: PathBuf,
        #[command(flatten)]
        function: FunctionArgs,
    },
}

/// Overrides for the `[function]` table of fnpack.toml.
#[derive(Args, Clone, Default)]
pub struct FunctionArgs {
    /// Source language: ts (compiled) or js (interpreted).
    /// Required unless fnpack.toml sets `function.language`.
    #[arg(long, short = 'l')]
    pub language: Option<Language>,
    /// Function entrypoint (default: index.handler)
    #[arg(long)]
    pub handler: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(e) => {
            if std::env::var_os("RUST_LOG").is_some() {
                eprintln!("warning: ignoring RUST_LOG: {e}");
            }
            tracing_subscriber::EnvFilter::new("warn")
        }
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    let cli = Cli::parse();

    // Stage processes run in their own process groups and do not see the
    // terminal's Ctrl-C; returning here drops every pipeline, which kills them.
    tokio::select! {
        result = run(cli.command) => result,
        signal = tokio::signal::ctrl_c() => {
            signal?;
            anyhow::bail!("interrupted");
        }
    }
}

async fn run(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Package {
            dirs,
            function,
            json,
        } => commands::package(dirs, function, json).await?,
        Commands::Clean { dir, function } => commands::clean(&dir, &function).await?,
        Commands::Plan { dir, function } => commands::plan(&dir, &function)?,
        Commands::Init { dir, language } => commands::init(&dir, language)?,
        Commands::Doctor { dir, function } => commands::doctor(&dir, &function).await?,
    }

    Ok(())
}

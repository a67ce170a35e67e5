//! hbind CLI: generate C binding headers from interface files.

mod commands;
mod manifest;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use manifest::{HbindManifest, Overrides};

#[derive(Parser)]
#[command(name = "hbind", version, about = "C binding-header generator")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a C header for each interface file
    Generate {
        /// Interface files (*.hbind.toml)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// Output directory (default: hbind.toml out-dir, else the current directory)
        #[arg(long)]
        out_dir: Option<PathBuf>,
        /// ABI version (1, 2)
        #[arg(long)]
        abi: Option<String>,
        /// Include-guard style (ifndef, pragma-once)
        #[arg(long)]
        guard: Option<String>,
    },
    /// Validate interface files and report fingerprints without writing
    Check {
        /// Interface files (*.hbind.toml)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// ABI version (1, 2)
        #[arg(long)]
        abi: Option<String>,
    },
    /// Create a starter interface file
    Init {
        /// Library namespace
        namespace: String,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

/// Install the log subscriber. `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;

    match cli.command {
        Commands::Generate {
            inputs,
            out_dir,
            abi,
            guard,
        } => {
            let overrides = Overrides { abi, guard, out_dir };
            let (options, out_dir) = resolve_settings(&cwd, &overrides)?;
            commands::generate::run(&inputs, &out_dir, &options)?;
            Ok(())
        }

        Commands::Check { inputs, abi } => {
            let overrides = Overrides {
                abi,
                ..Default::default()
            };
            let (options, _) = resolve_settings(&cwd, &overrides)?;
            commands::check::run(&inputs, &options)
        }

        Commands::Init { namespace } => commands::init::run(&namespace),
    }
}

/// Merge `hbind.toml` (if any, searched upward from `cwd`) with flags.
fn resolve_settings(
    cwd: &Path,
    overrides: &Overrides,
) -> anyhow::Result<(hbind_c::GeneratorOptions, PathBuf)> {
    let found = HbindManifest::find_and_load(cwd)?;
    HbindManifest::resolve(
        found.as_ref().map(|(m, dir)| (m, dir.as_path())),
        overrides,
        cwd,
    )
}

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "arw")]
#[command(about = "Registry address watch: fetch subjects by address and reconcile against a baseline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the configured queries against the registry and export the records
    Fetch {
        /// Layered config paths in merge order
        #[arg(long = "config", required = true)]
        config_paths: Vec<PathBuf>,

        /// Export path
        #[arg(long, default_value = "fetched.csv")]
        out: PathBuf,
    },

    /// Fetch (or read an export), reconcile against the baseline, write a run directory
    Reconcile {
        /// Layered config paths in merge order
        #[arg(long = "config", required = true)]
        config_paths: Vec<PathBuf>,

        /// Baseline table
        #[arg(long)]
        baseline: PathBuf,

        /// Use this fetched export instead of querying the registry
        #[arg(long)]
        fetched: Option<PathBuf>,

        /// Output directory
        #[arg(long, default_value = "arw-out")]
        out_dir: PathBuf,

        /// Also report identifiers whose name changed
        #[arg(long, default_value_t = false)]
        name_mismatches: bool,
    },

    /// Compute layered config hash + print canonical JSON
    ConfigHash {
        /// Paths in merge order (base -> site -> local...)
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    match cli.cmd {
        Commands::Fetch { config_paths, out } => commands::fetch::run(&config_paths, &out),

        Commands::Reconcile {
            config_paths,
            baseline,
            fetched,
            out_dir,
            name_mismatches,
        } => commands::reconcile::run(commands::reconcile::ReconcileCmd {
            config_paths: &config_paths,
            baseline: &baseline,
            fetched: fetched.as_deref(),
            out_dir: &out_dir,
            name_mismatches,
        }),

        Commands::ConfigHash { paths } => {
            let (loaded, _) = commands::load_config(&paths)?;
            println!("config_hash={}", loaded.config_hash);
            println!("{}", loaded.canonical_json);
            Ok(())
        }
    }
}

// Logs go to stderr so stdout stays machine-readable.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}

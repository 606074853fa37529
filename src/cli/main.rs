//! CLI binary entry point for record-convert

use clap::{Parser, Subcommand};
use record_format_converter::cli::commands::convert::{ConvertArgs, handle_convert};
use record_format_converter::cli::commands::detect::{DetectArgs, handle_detect};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "record-convert")]
#[command(about = "Convert record files between string-encoded and inline JSON conventions")]
#[command(version)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a file or directory of records
    Convert {
        /// Source file or directory (overrides the config file)
        source: Option<PathBuf>,
        /// Source format: old or new. Detected from the files when omitted or invalid.
        #[arg(short, long)]
        format: Option<String>,
        /// Target directory. Must not exist or be empty.
        #[arg(short, long)]
        target: Option<PathBuf>,
        /// Parent directory for auto-numbered targets (default: output)
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// Config file (default: record-convert.toml in the working directory)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Pretty-print converted files
        #[arg(short, long)]
        pretty: bool,
    },
    /// Report the detected format of files
    Detect {
        /// Files or directories to inspect
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Convert {
            source,
            format,
            target,
            output_dir,
            config,
            pretty,
        } => {
            let args = ConvertArgs {
                source,
                format,
                target,
                output_dir,
                config,
                pretty,
            };
            handle_convert(&args).map(|_| ())
        }
        Commands::Detect { inputs } => handle_detect(&DetectArgs { inputs }).map(|_| ()),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

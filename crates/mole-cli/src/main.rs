mod commands;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use std::env;
use std::path::PathBuf;
use std::sync::OnceLock;

static LOGGER: OnceLock<()> = OnceLock::new();

#[derive(Parser)]
#[command(
    name = "mole",
    version,
    about = "Compliance checks for chemical process samples against reference ranges"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a sample table against a reference range table
    Check {
        /// Sample table (CSV, TSV or XLSX)
        samples: PathBuf,

        /// Reference range table (CSV, TSV or XLSX)
        #[arg(short, long, value_name = "FILE")]
        ranges: PathBuf,

        /// Custom JSON alias file (default: built-in aliases)
        #[arg(short, long, value_name = "FILE")]
        aliases: Option<PathBuf>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Write the evaluated sample table as CSV, or the full report as JSON
        /// when the path ends in .json
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,

        /// Show every sample, not just those needing attention
        #[arg(long)]
        show_all: bool,

        /// Show per-metric statistics for each chemical
        #[arg(long)]
        verbose: bool,
    },
    /// Show how the headers of a table resolve onto the canonical schema
    Headers {
        /// Table to inspect
        file: PathBuf,

        /// Which schema to resolve against
        #[arg(short, long, value_enum, default_value = "sample")]
        schema: SchemaKind,

        /// Custom JSON alias file (default: built-in aliases)
        #[arg(short, long, value_name = "FILE")]
        aliases: Option<PathBuf>,
    },
    /// Load and print a reference range table
    Ranges {
        /// Reference range table
        file: PathBuf,

        /// Custom JSON alias file (default: built-in aliases)
        #[arg(short, long, value_name = "FILE")]
        aliases: Option<PathBuf>,
    },
    /// Inspect and validate alias files
    Aliases {
        #[command(subcommand)]
        action: AliasesAction,
    },
}

#[derive(Subcommand)]
enum AliasesAction {
    /// Print the built-in alias tables
    List {
        /// Print the raw JSON instead, as a starting point for a custom file
        #[arg(long)]
        json: bool,
    },
    /// Validate a custom alias file
    Validate {
        /// Path to JSON alias file
        file: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SchemaKind {
    Sample,
    Ranges,
}

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("mole_core", LevelFilter::Info);
            builder.filter_module("mole", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check {
            samples,
            ranges,
            aliases,
            output,
            out,
            show_all,
            verbose,
        } => commands::check::run(commands::check::CheckArgs {
            samples,
            ranges,
            aliases,
            output_format: output,
            out,
            show_all,
            verbose,
        }),
        Commands::Headers {
            file,
            schema,
            aliases,
        } => commands::headers::run(&file, schema, aliases.as_deref()),
        Commands::Ranges { file, aliases } => commands::ranges::run(&file, aliases.as_deref()),
        Commands::Aliases { action } => match action {
            AliasesAction::List { json } => commands::aliases::list(json),
            AliasesAction::Validate { file } => commands::aliases::validate(&file),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

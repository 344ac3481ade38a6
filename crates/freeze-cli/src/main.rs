//! freeze CLI - freeze, dump, flatten, hash and diff JSON documents.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod input;
mod output;

use commands::{diff, dump, flatten, freeze, hash, sort};

#[derive(Parser)]
#[command(name = "freeze")]
#[command(about = "Structural canonicalization, dumping and diffing of JSON documents")]
struct Cli {
    /// Log debug events to stderr (overridden by RUST_LOG)
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the frozen form of a document
    Freeze {
        /// Input JSON file (or stdin if not provided)
        input: Option<String>,
        /// Output canonical JSON instead of the narrow rendering
        #[arg(long)]
        json: bool,
        /// Replace unrecognised values by their string form
        #[arg(long)]
        stringify: bool,
        /// Stable-sort the frozen form
        #[arg(long)]
        sort: bool,
        /// Keep two-element composites in order while sorting
        #[arg(long)]
        assume_key: bool,
    },
    /// Print the annotated dump of a document
    Dump {
        /// Input JSON file (or stdin if not provided)
        input: Option<String>,
        /// Stable-sort the dump payloads
        #[arg(long)]
        sort: bool,
    },
    /// Print the stably sorted frozen form on one line
    Sort {
        /// Input JSON file (or stdin if not provided)
        input: Option<String>,
        /// Keep two-element composites in order
        #[arg(long)]
        assume_key: bool,
    },
    /// Print one path per leaf
    Flatten {
        /// Input JSON file (or stdin if not provided)
        input: Option<String>,
        /// Treat two-element composites as plain sequences
        #[arg(long)]
        no_assume_key: bool,
    },
    /// Print the content hash of a document
    Hash {
        /// Input JSON file (or stdin if not provided)
        input: Option<String>,
        /// Order-sensitive hash instead of the stable one
        #[arg(long)]
        recursive: bool,
        /// Output the fingerprint as JSON
        #[arg(long)]
        json: bool,
    },
    /// Unified diff of two documents
    Diff {
        /// Left JSON file
        left: String,
        /// Right JSON file
        right: String,
        /// Lines of context around each change
        #[arg(long, default_value_t = freeze_canonical::diff::DEFAULT_CONTEXT)]
        context: usize,
        /// Stable-sort both sides first
        #[arg(long)]
        sort: bool,
        /// Keep two-element composites in order while sorting
        #[arg(long)]
        assume_key: bool,
        /// Diff annotated dumps instead of frozen forms
        #[arg(long)]
        dump: bool,
        /// Exit with error code if the documents differ
        #[arg(long)]
        check: bool,
    },
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Freeze {
            input,
            json,
            stringify,
            sort,
            assume_key,
        } => freeze::run(input, json, stringify, sort, assume_key),
        Commands::Dump { input, sort } => dump::run(input, sort),
        Commands::Sort { input, assume_key } => sort::run(input, assume_key),
        Commands::Flatten {
            input,
            no_assume_key,
        } => flatten::run(input, !no_assume_key),
        Commands::Hash {
            input,
            recursive,
            json,
        } => hash::run(input, recursive, json),
        Commands::Diff {
            left,
            right,
            context,
            sort,
            assume_key,
            dump,
            check,
        } => diff::run(
            left,
            right,
            freeze_canonical::DiffOptions {
                context,
                sort,
                assume_key,
            },
            dump,
            check,
        ),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

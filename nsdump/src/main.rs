use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use ns_reader::ScanPolicy;
use std::path::PathBuf;
use tracing::{error, Level};

mod commands;

use commands::{details::dump_details, list::list_namespaces, resolve::resolve_loc};

#[derive(Parser)]
#[command(name = "nsdump")]
#[command(about = "Inspect MMAPv1 namespace and data files without a running server")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OnCorrupt {
    /// Stop at the first corrupt slot or index record
    Abort,
    /// Log corrupt slots and index records and keep going
    Skip,
}

impl From<OnCorrupt> for ScanPolicy {
    fn from(v: OnCorrupt) -> Self {
        match v {
            OnCorrupt::Abort => ScanPolicy::Abort,
            OnCorrupt::Skip => ScanPolicy::SkipCorrupt,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List the hash table entries of a namespace file
    List {
        /// Namespace file (<db>.ns)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Also print empty slots
        #[arg(long)]
        all: bool,

        #[arg(long, value_enum, default_value_t = OnCorrupt::Abort)]
        on_corrupt: OnCorrupt,
    },

    /// Dump namespace details, optionally with resolved index definitions
    Details {
        /// Namespace file (<db>.ns); data files are looked up beside it
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Resolve each active index definition from the data files
        #[arg(long)]
        indexes: bool,

        /// Only this namespace (e.g. test.users)
        #[arg(long)]
        namespace: Option<String>,

        #[arg(long, value_enum, default_value_t = OnCorrupt::Abort)]
        on_corrupt: OnCorrupt,
    },

    /// Resolve a single disk location to the document stored there
    Resolve {
        /// Directory holding the data files
        dir: PathBuf,
        /// Data file base name (the database name)
        base: String,
        file_counter: i32,
        offset: i32,
    },
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::List {
            input,
            all,
            on_corrupt,
        } => list_namespaces(&input, all, on_corrupt.into()),
        Commands::Details {
            input,
            indexes,
            namespace,
            on_corrupt,
        } => dump_details(&input, indexes, namespace.as_deref(), on_corrupt.into()),
        Commands::Resolve {
            dir,
            base,
            file_counter,
            offset,
        } => resolve_loc(&dir, &base, file_counter, offset),
    }
}

fn main() {
    let cli = Cli::parse();
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).init();

    if let Err(e) = run(cli) {
        error!("{e:#}");
        std::process::exit(1);
    }
}

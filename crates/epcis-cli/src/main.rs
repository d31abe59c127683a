//! EPCIS CLI - normalize captured events, expand indexed documents and
//! resolve identifiers and vocabulary terms.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod input;
mod output;

use commands::{canonicalize, expand, hash, normalize, resolve};

/// Environment variable holding the log filter.
const LOG_ENV: &str = "EPCIS_LOG";

#[derive(Parser)]
#[command(name = "epcis")]
#[command(about = "EPCIS identifier and vocabulary normalization CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assign identity to the events of a capture document and print their
    /// indexed documents, one per line
    Normalize {
        /// EPCIS document or single event (or stdin if not provided)
        input: Option<String>,
        /// Capturing user
        #[arg(long)]
        user: Option<String>,
        /// Default group of the capturing user
        #[arg(long)]
        group: Option<String>,
        /// Capture job identifier (default: derived from the current time)
        #[arg(long)]
        capture_id: Option<String>,
        /// Hide the events from query interfaces
        #[arg(long)]
        hidden: bool,
    },
    /// Convert indexed documents (JSON lines) back into events
    Expand {
        /// Indexed documents, one per line (or stdin if not provided)
        input: Option<String>,
        /// GS1-EPC-Format header value
        #[arg(long)]
        epc_format: Option<String>,
        /// GS1-CBV-XML-Format header value
        #[arg(long)]
        cbv_format: Option<String>,
        /// JSON-LD context file to resolve terms against
        #[arg(long)]
        context: Option<String>,
        /// GS1 company prefix settings file
        #[arg(long)]
        gs1_settings: Option<String>,
    },
    /// Show the content hash of every event in a document
    Hash {
        /// EPCIS document or single event (or stdin if not provided)
        input: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Render one identifier or vocabulary term
    Resolve {
        #[command(subcommand)]
        target: resolve::Target,
    },
    /// Show canonical bytes for input JSON
    Canonicalize {
        /// Input JSON file (or stdin if not provided)
        input: Option<String>,
    },
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Normalize {
            input,
            user,
            group,
            capture_id,
            hidden,
        } => normalize::run(input, user, group, capture_id, hidden),
        Commands::Expand {
            input,
            epc_format,
            cbv_format,
            context,
            gs1_settings,
        } => expand::run(input, epc_format, cbv_format, context, gs1_settings),
        Commands::Hash { input, json } => hash::run(input, json),
        Commands::Resolve { target } => resolve::run(target),
        Commands::Canonicalize { input } => canonicalize::run(input),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

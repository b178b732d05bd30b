//! packdex - inspect package version lists and the catalogs built from them

use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod catalog_cli;

use catalog_cli::SessionOptions;

/// Trace modules for ingestion tracing
#[derive(Debug, Clone, ValueEnum)]
enum TraceModule {
    Ingest,
    Loader,
    Catalog,
    All,
}

/// Log levels
#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_filter_directive(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Parser, Debug)]
#[clap(
    name = "packdex",
    about = "Build and query asset catalogs from package version lists",
    version
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,

    /// Enable ingestion tracing (comma-separated: ingest,loader,catalog,all)
    #[clap(long, value_delimiter = ',', global = true)]
    trace: Vec<TraceModule>,

    /// Set log level
    #[clap(long, default_value = "warn", global = true)]
    log_level: LogLevel,

    /// Override the configuration file path
    #[clap(long, global = true)]
    config: Option<PathBuf>,

    /// Variant to ingest (overrides the configured one)
    #[clap(long, global = true)]
    variant: Option<String>,

    /// Fetch timeout in seconds (overrides the configured one)
    #[clap(long, global = true)]
    timeout: Option<u64>,
}

#[derive(Parser, Debug)]
enum Command {
    /// Summarize the catalog built from a package version list
    Inspect {
        /// Path or URI of the package version list
        manifest: String,

        /// Output as JSON
        #[clap(long)]
        json: bool,
    },

    /// Show one asset, its resource and its dependency closure
    Asset {
        /// Path or URI of the package version list
        manifest: String,

        /// Asset name
        name: String,

        /// Output as JSON
        #[clap(long)]
        json: bool,
    },

    /// List resource groups with their sizes
    Groups {
        /// Path or URI of the package version list
        manifest: String,

        /// Output as JSON
        #[clap(long)]
        json: bool,
    },

    /// Re-encode a local package version list (yaml, json or binary)
    ///
    /// The input is read with the configured manifest format, or sniffed
    /// from its leading bytes when none is configured.
    Convert {
        /// Local package version list to read
        manifest: PathBuf,

        /// Destination file
        output: PathBuf,

        /// Output encoding; guessed from the output extension when omitted
        #[clap(long)]
        format: Option<String>,
    },
}

fn initialize_tracing(log_level: &LogLevel, trace_modules: &[TraceModule]) {
    let mut filter = EnvFilter::new(log_level.to_filter_directive());

    for module in trace_modules {
        let directive = match module {
            TraceModule::Ingest => "packdex_core::builder=trace",
            TraceModule::Loader => "packdex_core::loader=trace",
            TraceModule::Catalog => "packdex_core::catalog=trace",
            TraceModule::All => "packdex_core=trace",
        };

        if let Ok(parsed) = directive.parse() {
            filter = filter.add_directive(parsed);
        }
    }

    // Logs go to stderr; stdout carries command output
    if !trace_modules.is_empty() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_writer(std::io::stderr)
            .init();

        tracing::info!(trace_modules = ?trace_modules, "packdex ingestion tracing enabled");
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    initialize_tracing(&cli.log_level, &cli.trace);

    let session = SessionOptions {
        config_path: cli.config,
        variant: cli.variant,
        timeout_seconds: cli.timeout,
    };

    match cli.command {
        Command::Inspect { manifest, json } => {
            catalog_cli::inspect_command(&session, &manifest, json).await
        }
        Command::Asset {
            manifest,
            name,
            json,
        } => catalog_cli::asset_command(&session, &manifest, &name, json).await,
        Command::Groups { manifest, json } => {
            catalog_cli::groups_command(&session, &manifest, json).await
        }
        Command::Convert {
            manifest,
            output,
            format,
        } => catalog_cli::convert_command(&session, &manifest, &output, format.as_deref()),
    }
}

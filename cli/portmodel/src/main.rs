//! portmodel CLI: builds instruction port-model tables from measurement data.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser, Subcommand};

use portmodel_core::OperandErrorPolicy;

#[derive(Parser)]
#[command(name = "portmodel", version, about = "Instruction port models from uops.info data")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build model tables from a measurement document
    Extract {
        /// Measurement document (uops.info instructions.xml, or .json)
        document: PathBuf,
        /// Architecture to extract (e.g., SKL); table goes to stdout.
        /// Without it, every architecture is written to <ARCH>_data.csv
        arch: Option<String>,
        /// Extra port-layout files or directories of *.ports.toml files
        #[arg(long = "layouts", value_name = "PATH")]
        layouts: Vec<PathBuf>,
        /// Directory for per-architecture tables (default: current directory)
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// What to do with instructions whose operands cannot be parsed (drop, empty)
        #[arg(long, default_value = "drop")]
        on_operand_error: OperandErrorPolicy,
    },
    /// List the architectures present in a measurement document
    Archs {
        /// Measurement document
        document: PathBuf,
    },
    /// Inspect scheduler port layouts
    Layout {
        #[command(subcommand)]
        action: LayoutAction,
    },
}

#[derive(Subcommand)]
enum LayoutAction {
    /// List known port layouts
    List {
        /// Extra port-layout files or directories
        #[arg(long = "layouts", value_name = "PATH")]
        layouts: Vec<PathBuf>,
    },
    /// Show one port layout
    Describe {
        /// Architecture name
        name: String,
        /// Extra port-layout files or directories
        #[arg(long = "layouts", value_name = "PATH")]
        layouts: Vec<PathBuf>,
        /// Output format (default: human-readable, "toml" for TOML)
        #[arg(long)]
        format: Option<String>,
    },
    /// Validate a port-layout file
    Validate {
        /// Path to a .ports.toml file
        path: PathBuf,
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

/// Diagnostics go to stderr through `log`; stdout carries tables only.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Extract {
            document,
            arch,
            layouts,
            output_dir,
            on_operand_error,
        } => {
            let options = commands::extract::ExtractOptions {
                layouts,
                output_dir,
                on_operand_error,
            };
            commands::extract::run(&document, arch.as_deref(), &options)
        }

        Commands::Archs { document } => commands::archs::run(&document),

        Commands::Layout { action } => match action {
            LayoutAction::List { layouts } => commands::layout::list(&layouts),
            LayoutAction::Describe {
                name,
                layouts,
                format,
            } => commands::layout::describe(&name, &layouts, format.as_deref()),
            LayoutAction::Validate { path } => commands::layout::validate(&path),
        },
    }
}

//! CLI definition using clap

use clap::{Parser, Subcommand};
use pedido_types::{ExportFormat, OutputFormat};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pedido-xml")]
#[command(author = "yuuji")]
#[command(version)]
#[command(about = "Extract order lines from XML exports and total quantities per item")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (json, table). Uses config value if not specified.
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract rows and item totals, then export them
    Extract {
        /// XML files or folders containing XML files
        inputs: Vec<PathBuf>,

        /// Output file path (default: pedidos_extracao.<ext>)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Export format (xlsx, csv). Uses config value if not specified.
        #[arg(long, short = 'e')]
        export: Option<ExportFormat>,

        /// Show the tables without writing a file
        #[arg(long)]
        no_export: bool,

        /// Order element tag (overrides config)
        #[arg(long)]
        tag: Option<String>,
    },

    /// Show per-item quantity totals only
    Summary {
        /// XML files or folders containing XML files
        inputs: Vec<PathBuf>,

        /// Order element tag (overrides config)
        #[arg(long)]
        tag: Option<String>,
    },

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set order element tag
        #[arg(long)]
        set_order_tag: Option<String>,

        /// Set default export format
        #[arg(long)]
        set_export: Option<ExportFormat>,

        /// Set default output format
        #[arg(long)]
        set_output: Option<OutputFormat>,

        /// Set directory for exported files
        #[arg(long)]
        set_output_dir: Option<PathBuf>,

        /// Set delimiter of the csv export
        #[arg(long)]
        set_delimiter: Option<char>,

        /// Reset to defaults
        #[arg(long)]
        reset: bool,
    },
}

//! CLI argument definitions

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// TSGate - incremental lint stage for TypeScript build pipelines
#[derive(Parser)]
#[command(name = "tsgate")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Rules document path (default: tslint.json)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Lint an input tree and write generated lint tests
    Build(BuildArgs),

    /// Create a starter tslint.json
    Init {
        /// Force overwrite existing config
        #[arg(long)]
        force: bool,
    },

    /// List built-in rules and presets
    Rules,
}

#[derive(clap::Args)]
pub struct BuildArgs {
    /// Input tree root
    pub input: PathBuf,

    /// Output directory for generated lint tests
    #[arg(short, long)]
    pub out: PathBuf,

    /// Write the lint report to this file instead of the console
    #[arg(long)]
    pub output_file: Option<PathBuf>,

    /// Exit with status 1 when lint errors are found
    #[arg(long)]
    pub fail_build: bool,

    /// Write empty artifacts instead of generated tests
    #[arg(long)]
    pub disable_test_generator: bool,

    /// Template for generated tests
    #[arg(long, value_enum, default_value_t = GeneratorKind::Qunit)]
    pub test_generator: GeneratorKind,

    /// Honor tslint.json files found inside the input tree
    #[arg(long)]
    pub nested_configs: bool,

    /// Glob patterns (relative to the input root) to skip
    #[arg(long)]
    pub exclude: Vec<String>,

    /// Disable the outcome cache
    #[arg(long)]
    pub no_cache: bool,

    /// Outcome cache directory
    #[arg(long, default_value = tsgate_core::DEFAULT_CACHE_DIR)]
    pub cache_dir: PathBuf,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum GeneratorKind {
    Qunit,
    Mocha,
}

impl GeneratorKind {
    pub fn name(self) -> &'static str {
        match self {
            GeneratorKind::Qunit => "qunit",
            GeneratorKind::Mocha => "mocha",
        }
    }
}

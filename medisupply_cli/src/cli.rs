use clap::{Args, Parser, Subcommand};
use medisupply_contract::ValidationConfig;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "medisupply",
    version,
    about = "Inspect and check documents against the MediSupply contract"
)]
pub struct Cli {
    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub validation: ValidationArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, Default, Args)]
pub struct ValidationArgs {
    /// Accept fields the contract does not declare
    #[arg(long, global = true)]
    pub lenient: bool,

    /// Report every failing field instead of the first
    #[arg(long, global = true)]
    pub all_issues: bool,
}

impl ValidationArgs {
    /// Flags only ever loosen or widen what the environment configured
    pub fn resolve(&self, base: ValidationConfig) -> ValidationConfig {
        let mut config = base;
        if self.lenient {
            config = config.lenient();
        }
        if self.all_issues {
            config = config.with_all_issues();
        }
        config
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Validate a JSON document as an entity kind
    Validate { kind: String, file: PathBuf },

    /// Print an operation descriptor as JSON
    Describe { group: String, operation: String },

    /// List every registered operation
    Routes,

    /// Build a concrete path from a template or an operation id
    Path {
        /// `/api/...` template or `group.name` operation id
        template: String,
        /// Placeholder values as key=value
        params: Vec<String>,
    },

    /// Resolve a concrete path to its operation
    Match { method: String, path: String },

    /// Print the payload shape of an error kind
    ErrorShape { kind: String },

    /// Load a persisted AppState snapshot
    CheckState { file: PathBuf },
}

//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint};

use crate::application::parse_amount;
use crate::domain::{Adjustment, AllocationKind};

/// Two-level allocation ledger: percentage and value allocations with parent roll-up and variance tracking
#[derive(Parser, Debug)]
#[command(name = "rsledger")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Project directory for local config (default: cwd)
    #[arg(short = 'C', long, global = true)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the ledger as a table
    Show(AllocationArgs),

    /// Show the ledger as a tree
    Tree(AllocationArgs),

    /// Print the grand total
    Total(AllocationArgs),

    /// Interactive allocation session on stdin
    Session {
        /// Ledger definition file
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        ledger: Option<PathBuf>,
    },

    /// Write the default ledger definition
    Init {
        /// Target file
        #[arg(default_value = "ledger.toml", value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Ledger source plus allocations applied before output.
#[derive(Args, Debug, Default)]
pub struct AllocationArgs {
    /// Ledger definition file
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub ledger: Option<PathBuf>,

    /// Allocation applied in order: `ID%=PCT` (percentage) or `ID=VALUE` (value)
    #[arg(short, long = "allocate", value_name = "OP", value_parser = parse_allocation_op)]
    pub allocate: Vec<AllocationOp>,
}

/// One allocation from the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationOp {
    pub row_id: String,
    pub adjustment: Adjustment,
}

/// Parse `id%=pct` or `id=value`; the amount follows the lenient input contract.
pub fn parse_allocation_op(s: &str) -> Result<AllocationOp, String> {
    let (row_id, amount) = s
        .split_once('=')
        .ok_or_else(|| format!("expected ID=VALUE or ID%=PCT, got '{s}'"))?;
    let (row_id, kind) = match row_id.strip_suffix('%') {
        Some(row_id) => (row_id, AllocationKind::Percentage),
        None => (row_id, AllocationKind::Value),
    };
    let row_id = row_id.trim();
    if row_id.is_empty() {
        return Err(format!("missing row id in '{s}'"));
    }
    Ok(AllocationOp {
        row_id: row_id.to_string(),
        adjustment: kind.with_amount(parse_amount(amount)),
    })
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
    },

    /// Show config paths
    Path,
}

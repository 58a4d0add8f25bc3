//! Command dispatch

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::services::{LedgerDefinition, LedgerService};
use crate::application::PendingInputs;
use crate::cli::args::{AllocationArgs, Cli, Commands, ConfigCommands};
use crate::cli::output::{self, format_amount, render_table, render_tree};
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{AllocationKind, Ledger};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::{InfraError, InfraResult};

/// Run the parsed command line.
pub fn execute(cli: &Cli) -> CliResult<()> {
    let project_dir = match &cli.project_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()
            .map_err(|e| InfraError::io("resolve current directory", e))?,
    };
    let settings = Settings::load(Some(&project_dir))?;
    debug!(?settings, "settings loaded");
    if !settings.color {
        colored::control::set_override(false);
    }
    let container = ServiceContainer::new(settings);

    match &cli.command {
        Some(Commands::Show(args)) => cmd_show(&container, args),
        Some(Commands::Tree(args)) => cmd_tree(&container, args),
        Some(Commands::Total(args)) => cmd_total(&container, args),
        Some(Commands::Session { ledger }) => cmd_session(&container, ledger.as_deref()),
        Some(Commands::Init { file, force }) => cmd_init(&container, file, *force),
        Some(Commands::Config { command }) => cmd_config(&container, &project_dir, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Cli::command()
            .print_help()
            .map_err(|e| InfraError::io("print help", e).into()),
    }
}

/// Seed the ledger and apply the command-line allocations in order.
#[instrument(level = "debug", skip(container))]
fn allocated_ledger(container: &ServiceContainer, args: &AllocationArgs) -> CliResult<Ledger> {
    let service = container.ledger_service(args.ledger.as_deref())?;
    for op in &args.allocate {
        let allocation = service.apply(&op.row_id, op.adjustment);
        if !allocation.is_applied() {
            output::warning(&format!("no ledger entry '{}', allocation skipped", op.row_id));
        }
    }
    Ok(service.tree())
}

fn cmd_show(container: &ServiceContainer, args: &AllocationArgs) -> CliResult<()> {
    let ledger = allocated_ledger(container, args)?;
    output::info(&render_table(&ledger, container.settings.precision));
    Ok(())
}

fn cmd_tree(container: &ServiceContainer, args: &AllocationArgs) -> CliResult<()> {
    let ledger = allocated_ledger(container, args)?;
    output::info(&render_tree(&ledger, container.settings.precision));
    Ok(())
}

fn cmd_total(container: &ServiceContainer, args: &AllocationArgs) -> CliResult<()> {
    let ledger = allocated_ledger(container, args)?;
    output::info(&format_amount(ledger.grand_total(), container.settings.precision));
    Ok(())
}

fn cmd_session(container: &ServiceContainer, ledger: Option<&Path>) -> CliResult<()> {
    let service = container.ledger_service(ledger)?;
    let stdin = io::stdin();
    let stdout = io::stdout();
    run_session(
        &service,
        container.settings.precision,
        stdin.lock(),
        stdout.lock(),
    )?;
    Ok(())
}

fn cmd_init(container: &ServiceContainer, file: &Path, force: bool) -> CliResult<()> {
    container
        .loader
        .write_definition(file, &LedgerDefinition::default_seed(), force)?;
    output::success(&format!("ledger definition written: {}", file.display()));
    Ok(())
}

fn cmd_config(
    container: &ServiceContainer,
    project_dir: &Path,
    command: &ConfigCommands,
) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&container.settings.to_toml()?);
            Ok(())
        }
        ConfigCommands::Path => {
            let global = global_config_path();
            let local = local_config_path(project_dir);
            output::header("Config paths");
            match &global {
                Some(path) => output::detail(&format!("global: {}{}", path.display(), exists_marker(path))),
                None => output::detail(&"global: <no config directory>"),
            }
            output::detail(&format!("local:  {}{}", local.display(), exists_marker(&local)));
            Ok(())
        }
        ConfigCommands::Init { global } => {
            let path: PathBuf = if *global {
                global_config_path()
                    .ok_or_else(|| CliError::Usage("no global config directory available".into()))?
            } else {
                local_config_path(project_dir)
            };
            if container.fs.exists(&path) {
                return Err(CliError::Usage(format!(
                    "config already exists: {}",
                    path.display()
                )));
            }
            container
                .fs
                .ensure_parent(&path)
                .map_err(|e| InfraError::io(format!("create {}", path.display()), e))?;
            container
                .fs
                .write(&path, &Settings::template())
                .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
            output::action("Created", &path.display());
            Ok(())
        }
    }
}

fn exists_marker(path: &Path) -> &'static str {
    if path.exists() {
        ""
    } else {
        " (not found)"
    }
}

const SESSION_HELP: &[&str] = &[
    "input <id> <amount>  set pending input for a row",
    "pct <id>             apply pending input as a percentage",
    "val <id>             apply pending input as a value",
    "show                 print the ledger table",
    "tree                 print the ledger tree",
    "total                print the grand total",
    "help                 show this help",
    "quit                 leave the session",
];

/// Line-oriented allocation session.
///
/// Pending input is kept per row, separate from the ledger, and only applied
/// when `pct` or `val` is issued for that row.
pub fn run_session<R: BufRead, W: Write>(
    service: &LedgerService,
    precision: usize,
    input: R,
    mut out: W,
) -> InfraResult<()> {
    let mut pending = PendingInputs::new();
    let write_err = |e: io::Error| InfraError::io("write session output", e);

    for line in input.lines() {
        let line = line.map_err(|e| InfraError::io("read session input", e))?;
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            continue;
        };
        let row_id = words.next();

        match (command, row_id) {
            ("quit" | "exit", _) => break,
            ("help", _) => writeln!(out, "{}", SESSION_HELP.iter().join("\n")).map_err(write_err)?,
            ("show", _) => {
                writeln!(out, "{}", render_table(&service.tree(), precision)).map_err(write_err)?
            }
            ("tree", _) => {
                writeln!(out, "{}", render_tree(&service.tree(), precision)).map_err(write_err)?
            }
            ("total", _) => writeln!(
                out,
                "Grand Total {}",
                format_amount(service.grand_total(), precision)
            )
            .map_err(write_err)?,
            ("input", Some(row_id)) => {
                let text = words.join(" ");
                pending.set(row_id, text);
            }
            ("pct" | "val", Some(row_id)) => {
                let kind = if command == "pct" {
                    AllocationKind::Percentage
                } else {
                    AllocationKind::Value
                };
                let allocation = pending.commit(service, row_id, kind);
                match allocation.ledger.find(row_id) {
                    Some(entry) if allocation.is_applied() => writeln!(
                        out,
                        "{}: {} ({}); Grand Total {}",
                        entry.label(),
                        format_amount(entry.value(), precision),
                        output::format_variance(entry.variance(), precision),
                        format_amount(allocation.ledger.grand_total(), precision)
                    )
                    .map_err(write_err)?,
                    _ => writeln!(out, "no ledger entry '{row_id}'").map_err(write_err)?,
                }
            }
            ("input" | "pct" | "val", None) => {
                writeln!(out, "{command}: missing row id").map_err(write_err)?
            }
            (other, _) => {
                writeln!(out, "unknown command '{other}', try 'help'").map_err(write_err)?
            }
        }
    }
    out.flush().map_err(write_err)
}

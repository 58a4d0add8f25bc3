//! Command line parsing and the stdin allocation session.

use clap::Parser;
use rstest::rstest;

use rsledger::cli::args::{AllocationOp, ConfigCommands};
use rsledger::cli::commands::run_session;
use rsledger::cli::{Cli, Commands};
use rsledger::domain::Adjustment;
use rsledger::util::testing;

fn run(script: &str) -> String {
    testing::init_test_setup();
    colored::control::set_override(false);
    let service = testing::seed_service();
    let mut out = Vec::new();
    run_session(&service, 2, script.as_bytes(), &mut out).expect("session");
    String::from_utf8(out).expect("utf8")
}

#[test]
fn given_allocations_when_parsing_show_then_kept_in_order() {
    let cli = Cli::try_parse_from([
        "rsledger",
        "show",
        "-a",
        "phones%=10",
        "--allocate",
        "tables=450",
        "-a",
        "phones=900",
    ])
    .expect("parse");

    let Some(Commands::Show(args)) = cli.command else {
        panic!("expected show");
    };
    assert_eq!(
        args.allocate,
        vec![
            AllocationOp {
                row_id: "phones".into(),
                adjustment: Adjustment::Percentage(10.0),
            },
            AllocationOp {
                row_id: "tables".into(),
                adjustment: Adjustment::Value(450.0),
            },
            AllocationOp {
                row_id: "phones".into(),
                adjustment: Adjustment::Value(900.0),
            },
        ]
    );
}

#[test]
fn given_global_flags_after_subcommand_then_parsed() {
    let cli = Cli::try_parse_from(["rsledger", "total", "-dd", "-C", "/tmp/project"]).expect("parse");

    assert_eq!(cli.debug, 2);
    assert_eq!(cli.project_dir.as_deref(), Some(std::path::Path::new("/tmp/project")));
}

#[test]
fn given_config_init_global_then_parsed() {
    let cli = Cli::try_parse_from(["rsledger", "config", "init", "--global"]).expect("parse");

    assert!(matches!(
        cli.command,
        Some(Commands::Config {
            command: ConfigCommands::Init { global: true }
        })
    ));
}

#[rstest]
#[case::no_separator("phones")]
#[case::no_id("=5")]
fn given_malformed_allocation_then_parse_fails(#[case] op: &str) {
    assert!(Cli::try_parse_from(["rsledger", "show", "-a", op]).is_err());
}

#[test]
fn given_session_with_both_kinds_then_prints_each_result() {
    let out = run("input phones 10\npct phones\ninput tables 450\nval tables\ntotal\n");

    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "Phones: 880.00 (10.00%); Grand Total 2580.00");
    assert_eq!(lines[1], "Tables: 450.00 (50.00%); Grand Total 2730.00");
    assert_eq!(lines[2], "Grand Total 2730.00");
}

#[test]
fn given_pending_input_when_committed_twice_then_reapplied_to_current_value() {
    let out = run("input phones 10\npct phones\npct phones\n");

    assert!(out.contains("Phones: 968.00 (21.00%)"), "{out}");
}

#[test]
fn given_lenient_input_when_committing_then_numeric_prefix_used() {
    let out = run("input laptops 12abc\nval laptops\n");

    assert!(out.starts_with("Laptops: 12.00"), "{out}");
}

#[test]
fn given_missing_row_id_then_reports_usage() {
    let out = run("pct\n");

    assert_eq!(out.trim(), "pct: missing row id");
}

#[test]
fn given_tree_command_then_renders_grand_total_root() {
    let out = run("tree\n");

    assert!(out.starts_with("Grand Total 2500.00"));
    assert!(out.contains("Electronics [electronics] 1500.00 (0.00%)"));
}

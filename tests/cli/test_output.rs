//! Tests for output helpers and argument handling

use filedex::cli::commands::audit::AuditArgs;
use filedex::cli::output::format_duration;
use filedex::cli::{Cli, Commands, OutputFormat};
use filedex::core::config::Config;
use clap::Parser;
use std::path::PathBuf;

#[test]
fn test_format_duration_boundaries() {
    assert_eq!(format_duration(0.0), "0ms");
    assert_eq!(format_duration(59.999), "60.00s");
    assert_eq!(format_duration(120.0), "2m 0.0s");
}

#[test]
fn test_default_format_is_human() {
    let cli = Cli::try_parse_from(["filedex", "show-config"]).unwrap();
    assert_eq!(cli.format, OutputFormat::Human);
    assert!(matches!(cli.command, Commands::ShowConfig(_)));
    assert_eq!(cli.log_filter(), "filedex=info");
}

#[test]
fn test_audit_db_override() {
    let cli = Cli::try_parse_from(["filedex", "audit", "--db", "/tmp/other.db"]).unwrap();
    let Commands::Audit(args) = cli.command else {
        panic!("expected audit command");
    };

    let mut config = Config::default();
    args.apply_overrides(&mut config);
    assert_eq!(config.storage.db_path, PathBuf::from("/tmp/other.db"));

    let mut untouched = Config::default();
    AuditArgs { db: None }.apply_overrides(&mut untouched);
    assert_eq!(untouched.storage.db_path, Config::default().storage.db_path);
}

#[test]
fn test_completions_shell_is_validated() {
    assert!(Cli::try_parse_from(["filedex", "completions", "bash"]).is_ok());
    assert!(Cli::try_parse_from(["filedex", "completions", "cmd.exe"]).is_err());
}

//! Tests for batch and config-path subcommands.

use super::parse;
use crate::cli::CliCommand;
use resq_core::Method;

#[test]
fn cli_parse_batch_defaults() {
    match parse(&["resq", "batch", "targets.txt"]) {
        CliCommand::Batch {
            file,
            concurrency,
            method,
        } => {
            assert_eq!(file, std::path::PathBuf::from("targets.txt"));
            assert!(concurrency.is_none());
            assert_eq!(method, Method::Get);
        }
        _ => panic!("expected Batch"),
    }
}

#[test]
fn cli_parse_batch_concurrency() {
    match parse(&["resq", "batch", "t.txt", "--concurrency", "8", "-X", "DELETE"]) {
        CliCommand::Batch {
            concurrency,
            method,
            ..
        } => {
            assert_eq!(concurrency, Some(8));
            assert_eq!(method, Method::Delete);
        }
        _ => panic!("expected Batch with --concurrency"),
    }
}

#[test]
fn cli_parse_config_path() {
    match parse(&["resq", "config-path"]) {
        CliCommand::ConfigPath => {}
        _ => panic!("expected ConfigPath"),
    }
}

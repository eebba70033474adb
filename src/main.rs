//! This crate runs the downlink polar encoding chain on reference test cases and checks the
//! rate-matched output against the reference bits of each case. Test case directories are given
//! on the command line, and the results are saved to a JSON file.
//!
//! Build the executable with `cargo build --release` and then run `./target/release/dlenc -h` for
//! help on the command-line interface.

#![warn(
    clippy::complexity,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_allocation,
    unused_import_braces,
    unused_qualifications
)]

use anyhow::{bail, Result};
use clap::{crate_name, crate_version, value_parser, Arg, ArgAction, ArgMatches, Command};
use dlenc::testcase;
use std::path::PathBuf;
use std::time::Instant;
use tracing::Level;

/// Main function
fn main() -> Result<()> {
    let timer = Instant::now();
    let matches = command_line_parser().get_matches();
    tracing_subscriber::fmt()
        .with_max_level(log_level_from_matches(&matches))
        .with_writer(std::io::stderr)
        .init();
    let dirs = testcase_dirs_from_matches(&matches);
    let json_filename = &json_filename_from_matches(&matches);
    let reports = testcase::run_test_cases(&dirs, json_filename)?;
    for report in &reports {
        println!("{}: nDiffBits = {}", report.name, report.num_diff_bits);
    }
    eprintln!("Elapsed time: {:.3?}", timer.elapsed());
    let num_failed = reports.iter().filter(|r| !r.passed).count();
    if num_failed > 0 {
        bail!(
            "{num_failed} of {} test cases did not reproduce their reference bits",
            reports.len()
        );
    }
    Ok(())
}

/// Returns command line parser.
fn command_line_parser() -> Command {
    Command::new(crate_name!())
        .version(crate_version!())
        .about("Checks the downlink polar encoding chain against reference test cases")
        .arg(testcase_dirs())
        .arg(json_filename())
        .arg(verbose())
}

/// Returns argument for test case directories.
fn testcase_dirs() -> Arg {
    Arg::new("testcase_dirs")
        .value_parser(value_parser!(PathBuf))
        .num_args(1 ..)
        .required(true)
        .help("Test case directories")
}

/// Returns argument for name of JSON file to which results must be saved.
fn json_filename() -> Arg {
    Arg::new("json_filename")
        .short('f')
        .default_value("results.json")
        .help("Name of JSON file to which results must be saved")
}

/// Returns argument for logging verbosity.
fn verbose() -> Arg {
    Arg::new("verbose")
        .short('v')
        .action(ArgAction::Count)
        .help("Logging verbosity (repeat for more detail)")
}

/// Returns test case directories.
fn testcase_dirs_from_matches(matches: &ArgMatches) -> Vec<PathBuf> {
    matches
        .get_many::<PathBuf>("testcase_dirs")
        .map(|dirs| dirs.cloned().collect())
        .unwrap_or_default()
}

/// Returns name of JSON file to which results must be saved.
fn json_filename_from_matches(matches: &ArgMatches) -> String {
    matches
        .get_one::<String>("json_filename")
        .cloned()
        .unwrap_or_default()
}

/// Returns maximum logging level.
fn log_level_from_matches(matches: &ArgMatches) -> Level {
    match matches.get_count("verbose") {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command_line_for_test() -> Vec<&'static str> {
        vec![
            crate_name!(),
            "-f",
            "out.json",
            "-vv",
            "cases/pdcch_0",
            "cases/pbch_0",
        ]
    }

    #[test]
    fn test_command_line_parser() {
        assert!(command_line_parser()
            .try_get_matches_from(command_line_for_test())
            .is_ok());
        // At least one test case directory is required.
        assert!(command_line_parser()
            .try_get_matches_from([crate_name!()])
            .is_err());
    }

    #[test]
    fn test_values_from_matches() {
        let matches = command_line_parser().get_matches_from(command_line_for_test());
        assert_eq!(
            testcase_dirs_from_matches(&matches),
            [PathBuf::from("cases/pdcch_0"), PathBuf::from("cases/pbch_0")]
        );
        assert_eq!(json_filename_from_matches(&matches), "out.json");
        assert_eq!(log_level_from_matches(&matches), Level::DEBUG);
        let matches = command_line_parser().get_matches_from([crate_name!(), "case"]);
        assert_eq!(json_filename_from_matches(&matches), "results.json");
        assert_eq!(log_level_from_matches(&matches), Level::WARN);
    }
}

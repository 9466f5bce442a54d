use legalink::command_argument_builder;
use legalink::handlers::*;
use legalink_core::check::{CanonicalEntry, CanonicalGroup};
use legalink_core::config::{CheckOptions, DEFAULT_THREADS, DEFAULT_TIMEOUT, LogLevel};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

fn parse(args: &[&str]) -> clap::ArgMatches {
    command_argument_builder()
        .try_get_matches_from(args)
        .unwrap()
}

// ============================================================================
// Command Parsing Tests
// ============================================================================

#[test]
fn test_no_subcommand_runs_everything() {
    let matches = parse(&["legalink"]);
    assert_eq!(mode_from_matches(&matches), Mode::All);
}

#[test]
fn test_subcommands() {
    assert_eq!(mode_from_matches(&parse(&["legalink", "legalcode"])), Mode::Legalcode);
    assert_eq!(mode_from_matches(&parse(&["legalink", "deeds"])), Mode::Deeds);
    assert_eq!(
        mode_from_matches(&parse(&["legalink", "rdf"])),
        Mode::Rdf { index: false }
    );
    assert_eq!(
        mode_from_matches(&parse(&["legalink", "rdf", "--index"])),
        Mode::Rdf { index: true }
    );
    assert_eq!(mode_from_matches(&parse(&["legalink", "all"])), Mode::All);
    assert_eq!(mode_from_matches(&parse(&["legalink", "canonical"])), Mode::Canonical);
}

#[test]
fn test_unknown_subcommand_is_usage_error() {
    let result = command_argument_builder().try_get_matches_from(["legalink", "licenses"]);
    let err = result.unwrap_err();
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn test_defaults() {
    let options = options_from_matches(&parse(&["legalink", "legalcode"]));
    assert_eq!(options.root_url, "https://creativecommons.org");
    assert_eq!(options.log_level, LogLevel::Warning);
    assert!(!options.local);
    assert_eq!(options.limit, None);
    assert_eq!(options.output_errors, None);
    assert_eq!(options.threads, 32);
    assert_eq!(options.timeout, Duration::from_secs(5));
    assert!(options.show_progress);
}

#[test]
fn test_unset_limits_use_shared_defaults() {
    let options = options_from_matches(&parse(&["legalink", "rdf"]));
    assert_eq!(options.threads, DEFAULT_THREADS);
    assert_eq!(options.timeout, DEFAULT_TIMEOUT);
    assert_eq!(options.threads, CheckOptions::default().threads);
    assert_eq!(options.timeout, CheckOptions::default().timeout);
}

#[test]
fn test_global_flags_after_subcommand() {
    let options = options_from_matches(&parse(&[
        "legalink",
        "deeds",
        "--local",
        "--limit",
        "10",
        "--root-url",
        "http://localhost:8000/",
        "-t",
        "4",
        "--timeout",
        "2",
        "--no-progress",
    ]));
    assert!(options.local);
    assert_eq!(options.limit, Some(10));
    assert_eq!(options.root_url, "http://localhost:8000");
    assert_eq!(options.threads, 4);
    assert_eq!(options.timeout, Duration::from_secs(2));
    assert!(!options.show_progress);
}

#[test]
fn test_output_errors_default_path() {
    let options = options_from_matches(&parse(&["legalink", "legalcode", "--output-errors"]));
    assert_eq!(options.output_errors, Some(PathBuf::from("errorlog.txt")));

    let options = options_from_matches(&parse(&["legalink", "--output-errors=broken.txt"]));
    assert_eq!(options.output_errors, Some(PathBuf::from("broken.txt")));
}

// ============================================================================
// Verbosity Tests
// ============================================================================

#[test]
fn test_verbosity_flags() {
    assert_eq!(log_level_from_matches(&parse(&["legalink", "-v"])), LogLevel::Info);
    assert_eq!(log_level_from_matches(&parse(&["legalink", "-vv"])), LogLevel::Debug);
    assert_eq!(log_level_from_matches(&parse(&["legalink", "-q"])), LogLevel::Error);
    assert_eq!(
        log_level_from_matches(&parse(&["legalink", "-qqqq"])),
        LogLevel::Critical
    );
    assert_eq!(
        log_level_from_matches(&parse(&["legalink", "-v", "-q"])),
        LogLevel::Warning
    );
}

#[test]
fn test_normalize_root_url() {
    let url = Url::parse("https://example.org/").unwrap();
    assert_eq!(normalize_root_url(Some(&url)), "https://example.org");
    assert_eq!(normalize_root_url(None), "https://creativecommons.org");
}

// ============================================================================
// Canonical Output Tests
// ============================================================================

#[test]
fn test_print_canonical() {
    colored::control::set_override(false);
    let groups = vec![CanonicalGroup {
        title: "by 4.0".to_string(),
        entries: vec![CanonicalEntry {
            document: "by_4.0.html".to_string(),
            legalcode: "https://creativecommons.org/licenses/by/4.0/legalcode".to_string(),
            deed: Some("https://creativecommons.org/licenses/by/4.0/".to_string()),
            rdf: None,
        }],
    }];

    let mut out = Vec::new();
    print_canonical(&mut out, &groups).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.contains("by 4.0\n"));
    assert!(text.contains("  by_4.0.html\n"));
    assert!(text.contains("    legalcode https://creativecommons.org/licenses/by/4.0/legalcode\n"));
    assert!(text.contains("    deed      https://creativecommons.org/licenses/by/4.0/\n"));
    assert!(!text.contains("rdf"));
}

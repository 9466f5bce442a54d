use clap::ArgMatches;
use colored::Colorize;
use legalink_core::check::{CanonicalGroup, Checker};
use legalink_core::config::{
    CheckOptions, DEFAULT_ROOT_URL, DEFAULT_THREADS, DEFAULT_TIMEOUT, LocalPaths, LogLevel,
};
use legalink_core::error::Result;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Which checks a run performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Legalcode,
    Deeds,
    Rdf { index: bool },
    All,
    Canonical,
}

pub fn mode_from_matches(matches: &ArgMatches) -> Mode {
    match matches.subcommand() {
        Some(("legalcode", _)) => Mode::Legalcode,
        Some(("deeds", _)) => Mode::Deeds,
        Some(("rdf", sub)) => Mode::Rdf {
            index: sub.get_flag("index"),
        },
        Some(("canonical", _)) => Mode::Canonical,
        _ => Mode::All,
    }
}

pub fn log_level_from_matches(matches: &ArgMatches) -> LogLevel {
    LogLevel::from_flags(matches.get_count("verbose"), matches.get_count("quiet"))
}

/// Root URL without a trailing slash, so derived paths never double up.
pub fn normalize_root_url(url: Option<&Url>) -> String {
    url.map(|u| u.as_str().trim_end_matches('/').to_string())
        .unwrap_or_else(|| DEFAULT_ROOT_URL.to_string())
}

pub fn options_from_matches(matches: &ArgMatches) -> CheckOptions {
    CheckOptions {
        root_url: normalize_root_url(matches.get_one::<Url>("root-url")),
        log_level: log_level_from_matches(matches),
        local: matches.get_flag("local"),
        limit: matches.get_one::<usize>("limit").copied(),
        output_errors: matches.get_one::<PathBuf>("output-errors").cloned(),
        threads: matches
            .get_one::<usize>("threads")
            .copied()
            .unwrap_or(DEFAULT_THREADS),
        timeout: matches
            .get_one::<u64>("timeout")
            .map(|secs| Duration::from_secs(*secs))
            .unwrap_or(DEFAULT_TIMEOUT),
        show_progress: !matches.get_flag("no-progress"),
        paths: LocalPaths::from_env(),
        ..CheckOptions::default()
    }
}

/// Run the selected checks and return the process exit code.
pub async fn run(mode: Mode, options: CheckOptions) -> Result<i32> {
    debug!("Running {:?} against {}", mode, options.root_url);
    let mut checker = Checker::new(options)?;

    match mode {
        Mode::Canonical => {
            let groups = checker.canonical_urls().await?;
            print_canonical(&mut io::stdout(), &groups)?;
            return Ok(0);
        }
        Mode::Legalcode => {
            checker.check_legalcode().await?;
        }
        Mode::Deeds => {
            checker.check_deeds().await?;
        }
        Mode::Rdf { index } => {
            checker.check_rdf(index).await?;
        }
        Mode::All => {
            checker.check_all().await?;
        }
    }

    let report = checker.finish()?;
    Ok(report.exit_code())
}

pub fn print_canonical<W: Write>(out: &mut W, groups: &[CanonicalGroup]) -> io::Result<()> {
    for group in groups {
        writeln!(out, "\n{}", group.title.bright_white().bold())?;
        for entry in &group.entries {
            writeln!(out, "  {}", entry.document.cyan())?;
            writeln!(out, "    {:<10}{}", "legalcode", entry.legalcode)?;
            if let Some(deed) = &entry.deed {
                writeln!(out, "    {:<10}{}", "deed", deed)?;
            }
            if let Some(rdf) = &entry.rdf {
                writeln!(out, "    {:<10}{}", "rdf", rdf)?;
            }
        }
    }
    Ok(())
}

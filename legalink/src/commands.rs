use crate::CLAP_STYLING;
use clap::{arg, command};
use legalink_core::config::{DEFAULT_ERROR_LOG, DEFAULT_ROOT_URL, DEFAULT_THREADS, DEFAULT_TIMEOUT};
use url::Url;

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("legalink")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("legalink")
        .about("Check for broken links in license legalcode, deeds and RDF")
        .styles(CLAP_STYLING)
        .arg(
            arg!(-v --"verbose")
                .help("Increase verbosity. Can be specified multiple times.")
                .action(clap::ArgAction::Count)
                .global(true),
        )
        .arg(
            arg!(-q --"quiet")
                .help("Decrease verbosity. Can be specified multiple times.")
                .action(clap::ArgAction::Count)
                .global(true),
        )
        .arg(
            arg!(--"root-url" <URL>)
                .required(false)
                .help(format!("Set root URL (default: {})", DEFAULT_ROOT_URL))
                .value_parser(clap::value_parser!(Url))
                .global(true),
        )
        .arg(
            arg!(--"limit" <N>)
                .required(false)
                .help("Only check the first N documents")
                .value_parser(clap::value_parser!(usize))
                .global(true),
        )
        .arg(
            arg!(--"local")
                .required(false)
                .help(
                    "Read legalcode files from the local file system. Set \
                LICENSE_LOCAL_PATH (and INDEX_RDF_LOCAL_PATH for index.rdf) to override the \
                default locations.",
                )
                .action(clap::ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            arg!(--"output-errors" [PATH])
                .required(false)
                .help(format!(
                    "Write all link errors to a file (default: {}) and create a JUnit summary \
                (test-summary/junit-xml-report.xml)",
                    DEFAULT_ERROR_LOG
                ))
                .value_parser(clap::value_parser!(std::path::PathBuf))
                .num_args(0..=1)
                .default_missing_value(DEFAULT_ERROR_LOG)
                .global(true),
        )
        .arg(
            arg!(-t --"threads" <NUM_REQUESTS>)
                .required(false)
                .help(format!(
                    "Maximum number of link checks in flight at once (default: {})",
                    DEFAULT_THREADS
                ))
                .value_parser(clap::value_parser!(usize))
                .global(true),
        )
        .arg(
            arg!(--"timeout" <SECONDS>)
                .required(false)
                .help(format!(
                    "Request timeout in seconds (default: {})",
                    DEFAULT_TIMEOUT.as_secs()
                ))
                .value_parser(clap::value_parser!(u64))
                .global(true),
        )
        .arg(
            arg!(--"no-progress")
                .required(false)
                .help("Do not show progress spinners")
                .action(clap::ArgAction::SetTrue)
                .global(true),
        )
        .subcommand_required(false)
        .subcommand(command!("legalcode").about("Check the links of legalcode documents"))
        .subcommand(
            command!("deeds")
                .about("Check the links of the deeds derived from the legalcode documents"),
        )
        .subcommand(
            command!("rdf")
                .about("Check the links of the RDF metadata of every license")
                .arg(
                    arg!(--"index")
                        .required(false)
                        .help(
                            "Check index.rdf instead of per-license RDF. With --local, reads \
                        INDEX_RDF_LOCAL_PATH (default: ./index.rdf).",
                        )
                        .action(clap::ArgAction::SetTrue),
                ),
        )
        .subcommand(
            command!("all")
                .about("Check legalcode, deeds, RDF and index.rdf (the default)"),
        )
        .subcommand(
            command!("canonical")
                .about("Print the canonical URLs of every document, grouped by license and version"),
        )
}

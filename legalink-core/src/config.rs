//! Run configuration: defaults, verbosity and local corpus paths.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_ROOT_URL: &str = "https://creativecommons.org";
pub use legalink_scanner::validate::{DEFAULT_TIMEOUT, USER_AGENT};
pub const DEFAULT_THREADS: usize = legalink_scanner::validate::DEFAULT_MAX_IN_FLIGHT;
pub const DEFAULT_ERROR_LOG: &str = "errorlog.txt";

/// Newest license versions are the most volatile, so they are checked first.
pub const TEST_ORDER: [&str; 6] = ["zero", "4.0", "3.0", "2.5", "2.1", "2.0"];

/// Directory listing of the legalcode corpus (GitHub contents API).
pub const GITHUB_LISTING_URL: &str =
    "https://api.github.com/repos/creativecommons/creativecommons.org/contents/docroot/legalcode";
pub const GITHUB_RAW_BASE: &str =
    "https://raw.githubusercontent.com/creativecommons/creativecommons.org/master/docroot/legalcode";

pub const JUNIT_REPORT_DIR: &str = "test-summary";
pub const JUNIT_REPORT_FILE: &str = "junit-xml-report.xml";

pub const LICENSE_LOCAL_PATH_VAR: &str = "LICENSE_LOCAL_PATH";
pub const INDEX_RDF_LOCAL_PATH_VAR: &str = "INDEX_RDF_LOCAL_PATH";
const DEFAULT_LICENSE_LOCAL_PATH: &str = "../creativecommons.org/docroot/legalcode";
const DEFAULT_INDEX_RDF_LOCAL_PATH: &str = "./index.rdf";

/// Console verbosity. Lower values print more.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogLevel {
    Debug = 10,
    Info = 20,
    #[default]
    Warning = 30,
    Error = 40,
    Critical = 50,
}

impl LogLevel {
    /// Start from `Warning`; each `-v` lowers the level by 10 and each `-q`
    /// raises it by 10, clamped to the known range.
    pub fn from_flags(verbose: u8, quiet: u8) -> Self {
        let value = LogLevel::Warning.value() + 10 * i32::from(quiet) - 10 * i32::from(verbose);
        Self::from_value(value)
    }

    pub fn from_value(value: i32) -> Self {
        match value {
            i32::MIN..=10 => LogLevel::Debug,
            11..=20 => LogLevel::Info,
            21..=30 => LogLevel::Warning,
            31..=40 => LogLevel::Error,
            _ => LogLevel::Critical,
        }
    }

    pub fn value(self) -> i32 {
        self as i32
    }

    /// Whether output tagged with `threshold` is shown at this level.
    pub fn shows(self, threshold: LogLevel) -> bool {
        self <= threshold
    }

    pub fn tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warning => tracing::Level::WARN,
            LogLevel::Error | LogLevel::Critical => tracing::Level::ERROR,
        }
    }
}

/// Locations used by `--local` runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalPaths {
    pub legalcode_dir: PathBuf,
    pub index_rdf: PathBuf,
}

impl Default for LocalPaths {
    fn default() -> Self {
        Self {
            legalcode_dir: PathBuf::from(DEFAULT_LICENSE_LOCAL_PATH),
            index_rdf: PathBuf::from(DEFAULT_INDEX_RDF_LOCAL_PATH),
        }
    }
}

impl LocalPaths {
    /// Read `LICENSE_LOCAL_PATH` and `INDEX_RDF_LOCAL_PATH`, expanding `~`.
    pub fn from_env() -> Self {
        Self::from_values(
            std::env::var(LICENSE_LOCAL_PATH_VAR).ok().as_deref(),
            std::env::var(INDEX_RDF_LOCAL_PATH_VAR).ok().as_deref(),
        )
    }

    pub fn from_values(legalcode_dir: Option<&str>, index_rdf: Option<&str>) -> Self {
        let expand = |value: &str| PathBuf::from(shellexpand::tilde(value).as_ref());
        Self {
            legalcode_dir: expand(legalcode_dir.unwrap_or(DEFAULT_LICENSE_LOCAL_PATH)),
            index_rdf: expand(index_rdf.unwrap_or(DEFAULT_INDEX_RDF_LOCAL_PATH)),
        }
    }
}

/// Everything a checker run needs, assembled by the binary from CLI flags.
#[derive(Debug, Clone)]
pub struct CheckOptions {
    pub root_url: String,
    pub log_level: LogLevel,
    pub local: bool,
    pub limit: Option<usize>,
    /// Error log path; also enables the JUnit report
    pub output_errors: Option<PathBuf>,
    pub report_dir: PathBuf,
    pub threads: usize,
    pub timeout: Duration,
    pub show_progress: bool,
    pub paths: LocalPaths,
    pub listing_url: String,
    pub raw_base: String,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            root_url: DEFAULT_ROOT_URL.to_string(),
            log_level: LogLevel::default(),
            local: false,
            limit: None,
            output_errors: None,
            report_dir: PathBuf::from(JUNIT_REPORT_DIR),
            threads: DEFAULT_THREADS,
            timeout: DEFAULT_TIMEOUT,
            show_progress: true,
            paths: LocalPaths::default(),
            listing_url: GITHUB_LISTING_URL.to_string(),
            raw_base: GITHUB_RAW_BASE.to_string(),
        }
    }
}

impl CheckOptions {
    pub fn index_rdf_url(&self) -> String {
        format!("{}/licenses/index.rdf", self.root_url.trim_end_matches('/'))
    }

    pub fn junit_report_path(&self) -> PathBuf {
        self.report_dir.join(JUNIT_REPORT_FILE)
    }
}

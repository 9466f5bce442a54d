pub mod check;
pub mod config;
pub mod error;
pub mod fetch;
pub mod report;
pub mod source;

pub use check::{CanonicalEntry, CanonicalGroup, Checker};
pub use config::{CheckOptions, LocalPaths, LogLevel};
pub use error::{CheckError, Result};
pub use report::{BrokenLinkIndex, Reporter, RunReport};

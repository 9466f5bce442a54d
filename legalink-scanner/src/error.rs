use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid document identifier '{0}': expected <family>_<version>[_<jurisdiction>][_<language>]")]
    InvalidIdentifier(String),
}

pub type Result<T> = std::result::Result<T, ScanError>;

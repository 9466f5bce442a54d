//! Retrieval of the documents under check and of the corpus listing.

use crate::config::USER_AGENT;
use crate::error::{CheckError, Result};
use legalink_scanner::ScanError;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

/// Fetches whole documents. Unlike link validation, a failure here is fatal.
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(ScanError::from)?;

        Ok(Self { client })
    }

    pub async fn fetch_text(&self, url: &str) -> Result<String> {
        debug!("Fetching {}", url);
        let fetch_failed = |e: reqwest::Error| CheckError::FetchFailed {
            url: url.to_string(),
            reason: describe(&e),
        };

        let response = self.client.get(url).send().await.map_err(fetch_failed)?;
        if !response.status().is_success() {
            warn!("{} answered with status {}", url, response.status());
        }
        response.text().await.map_err(fetch_failed)
    }

    /// GET a JSON document. Anything but a successful, well-formed response
    /// means the listing is unavailable.
    pub async fn fetch_listing<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!("Fetching listing {}", url);
        let unavailable = |reason: String| CheckError::ListingUnavailable {
            url: url.to_string(),
            reason,
        };

        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| unavailable(describe(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(unavailable(format!("HTTP {}", status.as_u16())));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| unavailable(describe(&e)))
    }
}

pub fn read_local(path: &Path) -> Result<String> {
    debug!("Reading {}", path.display());
    std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => CheckError::LocalPathMissing(path.to_path_buf()),
        _ => CheckError::Io(e),
    })
}

fn describe(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "Timeout".to_string()
    } else if error.is_connect() {
        "ConnectionError".to_string()
    } else if error.is_decode() {
        format!("malformed response: {}", error)
    } else {
        error.to_string()
    }
}

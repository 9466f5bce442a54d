//! The ordered list of legalcode documents to check, local or remote.

use crate::config::{CheckOptions, TEST_ORDER};
use crate::error::{CheckError, Result};
use crate::fetch::{Fetcher, read_local};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// One entry of a GitHub contents API directory listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ListingEntry {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

#[derive(Debug, Clone)]
pub enum DocumentSource {
    Local { dir: PathBuf },
    Remote { listing_url: String, raw_base: String },
}

impl DocumentSource {
    pub fn from_options(options: &CheckOptions) -> Self {
        if options.local {
            DocumentSource::Local {
                dir: options.paths.legalcode_dir.clone(),
            }
        } else {
            DocumentSource::Remote {
                listing_url: options.listing_url.clone(),
                raw_base: options.raw_base.clone(),
            }
        }
    }

    /// Legalcode file names, volatility first, truncated to `limit`.
    pub async fn list_documents(
        &self,
        fetcher: &Fetcher,
        limit: Option<usize>,
    ) -> Result<Vec<String>> {
        let names = match self {
            DocumentSource::Local { dir } => list_directory(dir)?,
            DocumentSource::Remote { listing_url, .. } => {
                let entries: Vec<ListingEntry> = fetcher.fetch_listing(listing_url).await?;
                entries
                    .into_iter()
                    .filter(|entry| entry.kind.as_deref().is_none_or(|kind| kind == "file"))
                    .map(|entry| entry.name)
                    .collect()
            }
        };

        let mut ordered = order_documents(names);
        if let Some(limit) = limit {
            ordered.truncate(limit);
        }
        info!("{} documents to check", ordered.len());
        Ok(ordered)
    }

    /// Raw content of one legalcode document.
    pub async fn read_document(&self, fetcher: &Fetcher, name: &str) -> Result<String> {
        match self {
            DocumentSource::Local { dir } => read_local(&dir.join(name)),
            DocumentSource::Remote { raw_base, .. } => {
                fetcher
                    .fetch_text(&format!("{}/{}", raw_base.trim_end_matches('/'), name))
                    .await
            }
        }
    }
}

fn list_directory(dir: &Path) -> Result<Vec<String>> {
    let entries = std::fs::read_dir(dir).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => CheckError::LocalPathMissing(dir.to_path_buf()),
        _ => CheckError::Io(e),
    })?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    Ok(names)
}

/// Keep `.html` names, sort them, then pull every name matching an entry of
/// [`TEST_ORDER`] to the front in priority order.
pub fn order_documents(names: Vec<String>) -> Vec<String> {
    let mut sorted: Vec<String> = names
        .into_iter()
        .filter(|name| name.ends_with(".html"))
        .collect();
    sorted.sort();
    sorted.dedup();

    let mut taken = vec![false; sorted.len()];
    let mut ordered = Vec::with_capacity(sorted.len());

    for marker in TEST_ORDER {
        for (idx, name) in sorted.iter().enumerate() {
            if !taken[idx] && name.contains(marker) {
                taken[idx] = true;
                ordered.push(name.clone());
            }
        }
    }
    for (idx, name) in sorted.into_iter().enumerate() {
        if !taken[idx] {
            ordered.push(name);
        }
    }
    ordered
}

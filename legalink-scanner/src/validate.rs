use crate::error::Result;
use crate::result::ValidationResult;
use futures::future::join_all;
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::{debug, info};
use url::Url;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_MAX_IN_FLIGHT: usize = 32;

pub const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux i686 on x86_64; rv:10.0) Gecko/20100101 Firefox/10.0";

/// Results of every link validated during one run, keyed by absolute URL.
#[derive(Debug, Clone, Default)]
pub struct LinkCache {
    entries: HashMap<String, ValidationResult>,
}

impl LinkCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, link: &str) -> Option<&ValidationResult> {
        self.entries.get(link)
    }

    pub fn insert(&mut self, link: String, result: ValidationResult) {
        self.entries.insert(link, result);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Checks links with lightweight HEAD requests, fanning out one task per
/// uncached link.
pub struct Validator {
    client: Client,
    max_in_flight: usize,
}

impl Validator {
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .pool_max_idle_per_host(DEFAULT_MAX_IN_FLIGHT)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            // 301/302 must reach the classifier untouched
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self {
            client,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
        })
    }

    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight.max(1);
        self
    }

    /// Validate `links`, answering from `cache` where possible.
    ///
    /// Results come back in input order. Every freshly fetched result is
    /// stored in the cache; network failures are classified, never returned
    /// as errors.
    pub async fn validate_batch(
        &self,
        cache: &mut LinkCache,
        links: &[String],
    ) -> Vec<ValidationResult> {
        let mut slots: Vec<Option<ValidationResult>> = vec![None; links.len()];
        let mut pending: Vec<String> = Vec::new();
        let mut pending_positions: HashMap<&str, Vec<usize>> = HashMap::new();

        for (idx, link) in links.iter().enumerate() {
            if let Some(result) = cache.get(link) {
                slots[idx] = Some(result.clone());
                continue;
            }
            let positions = pending_positions.entry(link.as_str()).or_default();
            if positions.is_empty() {
                pending.push(link.clone());
            }
            positions.push(idx);
        }

        debug!(
            "Batch of {} links: {} cached, {} to fetch",
            links.len(),
            links.len() - pending_positions.values().map(Vec::len).sum::<usize>(),
            pending.len()
        );

        if !pending.is_empty() {
            let fetched = self.fetch_all(&pending).await;
            for (link, result) in pending.iter().zip(fetched) {
                if let Some(positions) = pending_positions.get(link.as_str()) {
                    for &idx in positions {
                        slots[idx] = Some(result.clone());
                    }
                }
                cache.insert(link.clone(), result);
            }
        }

        slots
            .into_iter()
            .map(|slot| slot.unwrap_or_else(|| ValidationResult::Other("NotChecked".to_string())))
            .collect()
    }

    async fn fetch_all(&self, links: &[String]) -> Vec<ValidationResult> {
        info!(
            "Validating {} links with up to {} in flight",
            links.len(),
            self.max_in_flight
        );

        let semaphore = Arc::new(Semaphore::new(self.max_in_flight));
        let mut handles = Vec::with_capacity(links.len());

        for link in links {
            let client = self.client.clone();
            let semaphore = semaphore.clone();
            let link = link.clone();

            handles.push(tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                check_link(&client, &link).await
            }));
        }

        join_all(handles)
            .await
            .into_iter()
            .map(|joined| {
                joined.unwrap_or_else(|e| {
                    ValidationResult::Other(if e.is_cancelled() {
                        "Cancelled".to_string()
                    } else {
                        "WorkerPanic".to_string()
                    })
                })
            })
            .collect()
    }
}

/// Issue one HEAD request and classify the outcome.
pub async fn check_link(client: &Client, link: &str) -> ValidationResult {
    let url = match Url::parse(link) {
        Ok(url) => url,
        Err(_) => return ValidationResult::Other("MissingSchema".to_string()),
    };
    if !matches!(url.scheme(), "http" | "https") {
        return ValidationResult::InvalidSchema;
    }

    match client.head(url).send().await {
        Ok(response) => ValidationResult::StatusCode(response.status().as_u16()),
        Err(e) => {
            debug!("Request to {} failed: {}", link, e);
            classify_error(&e)
        }
    }
}

fn classify_error(error: &reqwest::Error) -> ValidationResult {
    if error.is_timeout() {
        ValidationResult::TimeoutError
    } else if error.is_connect() {
        ValidationResult::ConnectionError
    } else if error.is_redirect() {
        ValidationResult::Other("TooManyRedirects".to_string())
    } else if error.is_builder() {
        ValidationResult::Other("InvalidURL".to_string())
    } else if error.is_body() || error.is_decode() {
        ValidationResult::Other("ContentDecodingError".to_string())
    } else if error.is_request() {
        ValidationResult::Other("RequestError".to_string())
    } else {
        ValidationResult::Other("HTTPError".to_string())
    }
}

use crate::config::CheckOptions;
use crate::error::Result;
use crate::fetch::{Fetcher, read_local};
use crate::report::{
    BrokenLinkIndex, DocumentHeader, Reporter, RunReport, write_junit_report,
};
use crate::source::DocumentSource;
use indicatif::{ProgressBar, ProgressStyle};
use legalink_scanner::extract::{extract_record, parse_records};
use legalink_scanner::{
    ContentKind, DocumentId, Extraction, LinkCache, UrlKind, Validator, canonical_url, extract,
};
use std::collections::HashSet;
use std::io::{self, Stdout, Write};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Canonical URLs of one legalcode document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalEntry {
    pub document: String,
    pub legalcode: String,
    pub deed: Option<String>,
    pub rdf: Option<String>,
}

/// Documents sharing a license family and version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalGroup {
    pub title: String,
    pub entries: Vec<CanonicalEntry>,
}

/// Drives a checking run: documents are processed one at a time, each
/// document's links are validated as one concurrent batch.
pub struct Checker<W: Write> {
    options: CheckOptions,
    source: DocumentSource,
    fetcher: Fetcher,
    validator: Validator,
    cache: LinkCache,
    reporter: Reporter<W>,
    documents_checked: usize,
    errors_total: usize,
    started: Instant,
}

impl Checker<Stdout> {
    pub fn new(options: CheckOptions) -> Result<Self> {
        Self::with_console(options, io::stdout())
    }
}

impl<W: Write> Checker<W> {
    pub fn with_console(options: CheckOptions, console: W) -> Result<Self> {
        let source = DocumentSource::from_options(&options);
        let fetcher = Fetcher::new(options.timeout)?;
        let validator = Validator::with_timeout(options.timeout)?.with_max_in_flight(options.threads);

        let mut reporter = Reporter::new(console, options.log_level);
        if let Some(path) = &options.output_errors {
            reporter = reporter.with_error_log(path)?;
        }

        Ok(Self {
            options,
            source,
            fetcher,
            validator,
            cache: LinkCache::new(),
            reporter,
            documents_checked: 0,
            errors_total: 0,
            started: Instant::now(),
        })
    }

    pub fn broken_links(&self) -> &BrokenLinkIndex {
        self.reporter.broken_links()
    }

    pub fn cache(&self) -> &LinkCache {
        &self.cache
    }

    pub fn errors_total(&self) -> usize {
        self.errors_total
    }

    /// Check the links of every legalcode document. Returns the number of
    /// broken links found in this section.
    pub async fn check_legalcode(&mut self) -> Result<usize> {
        let section_start = Instant::now();
        self.reporter.start_section("Checking LegalCode License...")?;

        let names = self.list_documents().await?;
        self.reporter
            .section_size("Number of files to be checked", names.len())?;

        let mut section_errors = 0;
        for name in &names {
            let Some(id) = parse_document_id(name) else {
                continue;
            };
            let Some(base_url) = canonical_url(&self.options.root_url, &id, UrlKind::Legalcode)
            else {
                continue;
            };

            let content = self.source.read_document(&self.fetcher, name).await?;
            let extraction = extract(ContentKind::Markup, &content, &base_url);
            section_errors += self
                .check_document(DocumentHeader::new(name.as_str(), base_url), extraction)
                .await?;
        }

        self.reporter.finish_section(section_start.elapsed())?;
        Ok(section_errors)
    }

    /// Check the deed page derived from every legalcode document. Deeds are
    /// always fetched from the live site.
    pub async fn check_deeds(&mut self) -> Result<usize> {
        let section_start = Instant::now();
        self.reporter.start_section("Checking Deeds...")?;

        let names = self.list_documents().await?;
        self.reporter
            .section_size("Number of files to be checked", names.len())?;

        let mut section_errors = 0;
        for name in &names {
            let Some(id) = parse_document_id(name) else {
                continue;
            };
            let Some(deed_url) = canonical_url(&self.options.root_url, &id, UrlKind::Deed) else {
                debug!("{} has no deed page", name);
                continue;
            };

            let content = self.fetcher.fetch_text(&deed_url).await?;
            let extraction = extract(ContentKind::Markup, &content, &deed_url);
            section_errors += self
                .check_document(DocumentHeader::new(name.as_str(), deed_url), extraction)
                .await?;
        }

        self.reporter.finish_section(section_start.elapsed())?;
        Ok(section_errors)
    }

    /// Check RDF metadata: one record per license, or every record of the
    /// aggregate `index.rdf` when `index` is set.
    pub async fn check_rdf(&mut self, index: bool) -> Result<usize> {
        let section_start = Instant::now();
        if index {
            self.reporter.start_section("Checking index.rdf...")?;
        } else {
            self.reporter.start_section("Checking RDFs...")?;
        }

        let documents = if index {
            self.index_records().await?
        } else {
            self.license_records().await?
        };
        let description = if index {
            "Number of rdf objects/sections to be checked in index.rdf"
        } else {
            "Number of rdf files to be checked"
        };
        self.reporter.section_size(description, documents.len())?;

        let mut section_errors = 0;
        for (header, extraction) in documents {
            section_errors += self.check_document(header, extraction).await?;
        }

        self.reporter.finish_section(section_start.elapsed())?;
        Ok(section_errors)
    }

    /// Legalcode, deeds, per-license RDF and `index.rdf`, in that order.
    pub async fn check_all(&mut self) -> Result<usize> {
        writeln!(
            self.reporter.console(),
            "\nRunning Full Inspection: Checking Links for LegalCode, Deed, RDF, and index.rdf files"
        )?;

        let mut errors = self.check_legalcode().await?;
        errors += self.check_deeds().await?;
        errors += self.check_rdf(false).await?;
        errors += self.check_rdf(true).await?;
        Ok(errors)
    }

    /// Canonical legalcode, deed and RDF URLs, grouped by family and version
    /// in listing order. Nothing is validated.
    pub async fn canonical_urls(&self) -> Result<Vec<CanonicalGroup>> {
        let names = self.list_documents().await?;
        let root = &self.options.root_url;

        let mut groups: Vec<CanonicalGroup> = Vec::new();
        for name in &names {
            let Some(id) = parse_document_id(name) else {
                continue;
            };
            let Some(legalcode) = canonical_url(root, &id, UrlKind::Legalcode) else {
                continue;
            };
            let entry = CanonicalEntry {
                document: name.clone(),
                legalcode,
                deed: canonical_url(root, &id, UrlKind::Deed),
                rdf: canonical_url(root, &id, UrlKind::Rdf),
            };

            let title = format!("{} {}", id.family, id.version);
            match groups.iter_mut().find(|group| group.title == title) {
                Some(group) => group.entries.push(entry),
                None => groups.push(CanonicalGroup {
                    title,
                    entries: vec![entry],
                }),
            }
        }
        Ok(groups)
    }

    /// Write the summary and JUnit report when an error log was requested,
    /// and return the totals of the run.
    pub fn finish(&mut self) -> Result<RunReport> {
        let report = RunReport {
            documents_checked: self.documents_checked,
            errors_total: self.errors_total,
            unique_broken: self.reporter.broken_links().len(),
            elapsed: self.started.elapsed(),
        };

        if self.options.output_errors.is_some() {
            self.reporter.write_summary(&report)?;
            write_junit_report(&self.options.junit_report_path(), &report)?;
            if let Some(path) = self.reporter.error_log_path() {
                let path = path.display().to_string();
                writeln!(self.reporter.console(), "\nError file present at: {}", path)?;
            }
        }
        self.reporter.flush()?;
        Ok(report)
    }

    pub fn into_console(self) -> W {
        self.reporter.into_console()
    }

    async fn list_documents(&self) -> Result<Vec<String>> {
        self.source
            .list_documents(&self.fetcher, self.options.limit)
            .await
    }

    async fn license_records(&self) -> Result<Vec<(DocumentHeader, Extraction)>> {
        let names = self.list_documents().await?;

        let mut seen = HashSet::new();
        let mut rdf_urls = Vec::new();
        for name in &names {
            if let Some(id) = parse_document_id(name)
                && let Some(url) = canonical_url(&self.options.root_url, &id, UrlKind::Rdf)
                && seen.insert(url.clone())
            {
                rdf_urls.push(url);
            }
        }

        let mut documents = Vec::with_capacity(rdf_urls.len());
        for url in rdf_urls {
            let content = self.fetcher.fetch_text(&url).await?;
            let Some(record) = parse_records(&content).into_iter().next() else {
                warn!("No license record found in {}", url);
                continue;
            };
            let base_url = record
                .about
                .as_ref()
                .map(|about| format!("{}rdf", about))
                .unwrap_or_else(|| url.clone());
            let extraction = extract_record(&record, &base_url);
            documents.push((DocumentHeader::new(url, base_url), extraction));
        }
        Ok(documents)
    }

    async fn index_records(&self) -> Result<Vec<(DocumentHeader, Extraction)>> {
        let (location, content) = if self.options.local {
            let path = &self.options.paths.index_rdf;
            (path.display().to_string(), read_local(path)?)
        } else {
            let url = self.options.index_rdf_url();
            let content = self.fetcher.fetch_text(&url).await?;
            (url, content)
        };

        let mut records = parse_records(&content);
        if let Some(limit) = self.options.limit {
            records.truncate(limit);
        }
        info!("{} license records in {}", records.len(), location);

        Ok(records
            .into_iter()
            .map(|record| {
                let base_url = record.about.clone().unwrap_or_else(|| location.clone());
                let extraction = extract_record(&record, &base_url);
                let header = DocumentHeader::new(location.as_str(), base_url).with_label("RDF_ABOUT");
                (header, extraction)
            })
            .collect())
    }

    async fn check_document(
        &mut self,
        header: DocumentHeader,
        extraction: Extraction,
    ) -> Result<usize> {
        self.documents_checked += 1;
        let links = extraction.urls();

        let results = if links.is_empty() {
            Vec::new()
        } else {
            let spinner = self.spinner(&header, links.len());
            let results = self.validator.validate_batch(&mut self.cache, &links).await;
            if let Some(spinner) = spinner {
                spinner.finish_and_clear();
            }
            results
        };

        let caught_errors = self
            .reporter
            .report_document(&header, &extraction, &results)?;
        self.errors_total += caught_errors;
        Ok(caught_errors)
    }

    fn spinner(&self, header: &DocumentHeader, link_count: usize) -> Option<ProgressBar> {
        if !self.options.show_progress {
            return None;
        }
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(format!(
            "Validating {} links in {}",
            link_count, header.base_url
        ));
        spinner.enable_steady_tick(Duration::from_millis(100));
        Some(spinner)
    }
}

fn parse_document_id(name: &str) -> Option<DocumentId> {
    match DocumentId::from_filename(name) {
        Ok(id) => Some(id),
        Err(e) => {
            warn!("Skipping {}: {}", name, e);
            None
        }
    }
}

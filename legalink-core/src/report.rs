// Console output, error log, run summary and JUnit report

use crate::config::LogLevel;
use crate::error::Result;
use chrono::Local;
use colored::Colorize;
use legalink_scanner::{Extraction, ValidationResult};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Broken links mapped to the documents they were found in, in the order
/// they were first seen.
#[derive(Debug, Clone, Default)]
pub struct BrokenLinkIndex {
    links: Vec<(String, Vec<String>)>,
    positions: HashMap<String, usize>,
}

impl BrokenLinkIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Note that `link` is broken in `document_url`. Repeats are ignored.
    pub fn record(&mut self, link: &str, document_url: &str) {
        match self.positions.get(link) {
            Some(&idx) => {
                let documents = &mut self.links[idx].1;
                if !documents.iter().any(|url| url == document_url) {
                    documents.push(document_url.to_string());
                }
            }
            None => {
                self.positions.insert(link.to_string(), self.links.len());
                self.links
                    .push((link.to_string(), vec![document_url.to_string()]));
            }
        }
    }

    pub fn get(&self, link: &str) -> Option<&[String]> {
        self.positions
            .get(link)
            .map(|&idx| self.links[idx].1.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.links
            .iter()
            .map(|(link, documents)| (link.as_str(), documents.as_slice()))
    }

    /// Number of unique broken links.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

/// Identifies the document being reported on.
#[derive(Debug, Clone)]
pub struct DocumentHeader {
    pub name: String,
    pub base_url: String,
    pub label: &'static str,
}

impl DocumentHeader {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            label: "URL",
        }
    }

    pub fn with_label(mut self, label: &'static str) -> Self {
        self.label = label;
        self
    }

    fn context(&self) -> String {
        format!("\n\nChecking: {}\n{}: {}", self.name, self.label, self.base_url)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub documents_checked: usize,
    /// Broken link occurrences, counted per document
    pub errors_total: usize,
    pub unique_broken: usize,
    pub elapsed: Duration,
}

impl RunReport {
    pub fn exit_code(&self) -> i32 {
        if self.errors_total == 0 { 0 } else { 1 }
    }
}

pub struct Reporter<W: Write> {
    console: W,
    log_level: LogLevel,
    error_log: Option<(PathBuf, BufWriter<File>)>,
    broken: BrokenLinkIndex,
}

impl<W: Write> Reporter<W> {
    pub fn new(console: W, log_level: LogLevel) -> Self {
        Self {
            console,
            log_level,
            error_log: None,
            broken: BrokenLinkIndex::new(),
        }
    }

    /// Also write broken links and the run summary to `path`, truncating it.
    pub fn with_error_log(mut self, path: &Path) -> Result<Self> {
        let file = File::create(path)?;
        self.error_log = Some((path.to_path_buf(), BufWriter::new(file)));
        Ok(self)
    }

    pub fn error_log_path(&self) -> Option<&Path> {
        self.error_log.as_ref().map(|(path, _)| path.as_path())
    }

    pub fn log_level(&self) -> LogLevel {
        self.log_level
    }

    pub fn broken_links(&self) -> &BrokenLinkIndex {
        &self.broken
    }

    pub fn console(&mut self) -> &mut W {
        &mut self.console
    }

    pub fn into_console(self) -> W {
        self.console
    }

    pub fn record_broken(&mut self, link: &str, document_url: &str) {
        self.broken.record(link, document_url);
    }

    pub fn start_section(&mut self, title: &str) -> Result<()> {
        writeln!(self.console, "\n\n{}\n", title.bold())?;
        Ok(())
    }

    /// Informational count line, shown at `Info` and below.
    pub fn section_size(&mut self, description: &str, count: usize) -> Result<()> {
        if self.log_level.shows(LogLevel::Info) {
            writeln!(self.console, "{}: {}", description, count)?;
        }
        Ok(())
    }

    pub fn finish_section(&mut self, elapsed: Duration) -> Result<()> {
        writeln!(self.console, "\nCompleted in: {:.3}s", elapsed.as_secs_f64())?;
        Ok(())
    }

    /// Report one document's links against their validation results, which
    /// must be in the same order. Returns the number of broken links.
    pub fn report_document(
        &mut self,
        header: &DocumentHeader,
        extraction: &Extraction,
        results: &[ValidationResult],
    ) -> Result<usize> {
        let context = header.context();
        let mut context_printed = false;

        if self.log_level.shows(LogLevel::Info) {
            writeln!(
                self.console,
                "{}\nNumber of links found: {}",
                context, extraction.anchors_found
            )?;
            context_printed = true;
        }

        if !extraction.warnings.is_empty() && self.log_level.shows(LogLevel::Warning) {
            if !context_printed {
                writeln!(self.console, "{}", context)?;
                context_printed = true;
            }
            writeln!(self.console, "{}", "Warnings:".yellow().bold())?;
            for warning in &extraction.warnings {
                writeln!(self.console, "{}", warning)?;
            }
        }

        let mut caught_errors = 0;
        for (link, result) in extraction.links.iter().zip(results) {
            if result.is_good() {
                continue;
            }
            self.broken.record(&link.url, &header.base_url);
            caught_errors += 1;

            if caught_errors == 1 {
                if self.log_level.shows(LogLevel::Error) {
                    if !context_printed {
                        writeln!(self.console, "{}", context)?;
                    }
                    writeln!(self.console, "{}", "Errors:".red().bold())?;
                }
                if let Some((_, log)) = self.error_log.as_mut() {
                    writeln!(log, "\n{}\nURL: {}", header.name, header.base_url)?;
                }
            }

            let status = format!("{:<24}", result.to_string());
            if self.log_level.shows(LogLevel::Error) {
                writeln!(
                    self.console,
                    "  {}{}\n{}{}",
                    status.red(),
                    link.url,
                    " ".repeat(26),
                    link.anchor.dimmed()
                )?;
            }
            if let Some((_, log)) = self.error_log.as_mut() {
                writeln!(log, "{}", format_entry(result, &link.url, &link.anchor))?;
            }
        }

        Ok(caught_errors)
    }

    /// Append the run summary to the error log, if one is open.
    pub fn write_summary(&mut self, report: &RunReport) -> Result<()> {
        let Some((_, log)) = self.error_log.as_mut() else {
            return Ok(());
        };

        let stars = "*".repeat(39);
        writeln!(log, "\n\n{}\n{} SUMMARY\n{}\n", stars, " ".repeat(15), stars)?;
        writeln!(log, "Timestamp: {}", Local::now().format("%a %b %e %H:%M:%S %Y"))?;
        writeln!(log, "Total files checked: {}", report.documents_checked)?;
        writeln!(log, "Number of error links: {}", report.errors_total)?;
        writeln!(log, "Number of unique broken links: {}\n", report.unique_broken)?;
        for (link, documents) in self.broken.iter() {
            writeln!(log, "\nBroken link - {} found in:", link)?;
            for url in documents {
                writeln!(log, "{}", url)?;
            }
        }
        log.flush()?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.console.flush()?;
        if let Some((_, log)) = self.error_log.as_mut() {
            log.flush()?;
        }
        Ok(())
    }
}

/// One broken-link entry: status, link, then the anchor on its own line.
pub fn format_entry(result: &ValidationResult, link: &str, anchor: &str) -> String {
    format!(
        "  {:<24}{}\n{}{}",
        result.to_string(),
        link,
        " ".repeat(26),
        anchor
    )
}

fn xml_escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Render the whole run as a single JUnit test case.
pub fn render_junit(report: &RunReport) -> String {
    let time = format!("{:.6}", report.elapsed.as_secs_f64());
    let failures = usize::from(report.errors_total != 0);

    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
    xml.push_str(&format!(
        "<testsuites disabled=\"0\" errors=\"0\" failures=\"{failures}\" tests=\"1\" time=\"{time}\">\n"
    ));
    xml.push_str(&format!(
        "\t<testsuite disabled=\"0\" errors=\"0\" failures=\"{failures}\" name=\"legalink\" skipped=\"0\" tests=\"1\" time=\"{time}\">\n"
    ));
    xml.push_str(&format!(
        "\t\t<testcase name=\"{}\" classname=\"{}\" time=\"{time}\"",
        xml_escape("Broken links checker"),
        xml_escape("License files"),
    ));

    if report.errors_total == 0 {
        xml.push_str("/>\n");
    } else {
        let message = format!("{} broken links found", report.errors_total);
        let body = format!(
            "Number of error links: {}\nNumber of unique broken links: {}",
            report.errors_total, report.unique_broken
        );
        xml.push_str(">\n");
        xml.push_str(&format!(
            "\t\t\t<failure type=\"failure\" message=\"{}\">{}</failure>\n",
            xml_escape(&message),
            xml_escape(&body)
        ));
        xml.push_str("\t\t</testcase>\n");
    }

    xml.push_str("\t</testsuite>\n</testsuites>\n");
    xml
}

/// Write the JUnit report to `path`, creating its directory if needed.
pub fn write_junit_report(path: &Path, report: &RunReport) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, render_junit(report))?;
    Ok(())
}

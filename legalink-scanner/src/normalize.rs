//! Canonical URL derivation for license documents and href normalization.

use crate::error::{Result, ScanError};
use std::fmt;
use std::str::FromStr;
use url::Url;

/// Families without a deed or RDF page of their own.
const EXCLUDED_FAMILIES: [&str; 2] = ["zero-assert", "zero-waive"];

/// Which public page of a license to derive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlKind {
    Legalcode,
    Deed,
    Rdf,
}

/// A legalcode document identifier such as `by-nc-nd_3.0_rs_sr-Latn`.
///
/// Segments are `family`, `version`, then an optional jurisdiction (only for
/// ported licenses older than 4.0) and an optional language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentId {
    raw: String,
    pub family: String,
    pub version: String,
    pub jurisdiction: Option<String>,
    pub language: Option<String>,
}

impl DocumentId {
    pub fn parse(identifier: &str) -> Result<Self> {
        let invalid = || ScanError::InvalidIdentifier(identifier.to_string());

        let mut parts = identifier.split('_');
        let family = parts.next().filter(|s| !s.is_empty()).ok_or_else(invalid)?;
        let version = parts.next().filter(|s| !s.is_empty()).ok_or_else(invalid)?;
        let mut rest: Vec<&str> = parts.collect();
        rest.reverse();

        let mut jurisdiction = None;
        if !family.starts_with("zero") && !rest.is_empty() && version_below_4(version) {
            jurisdiction = rest.pop().map(str::to_string);
        }
        let language = rest.pop().map(str::to_string);

        Ok(Self {
            raw: identifier.to_string(),
            family: family.to_string(),
            version: version.to_string(),
            jurisdiction,
            language,
        })
    }

    /// Parse a legalcode filename, dropping its `.html` extension.
    pub fn from_filename(filename: &str) -> Result<Self> {
        Self::parse(filename.strip_suffix(".html").unwrap_or(filename))
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_public_domain(&self) -> bool {
        self.family.starts_with("zero")
    }

    /// The family as it appears in a URL path.
    pub fn path_family(&self) -> &str {
        if self.family == "samplingplus" {
            "sampling+"
        } else {
            &self.family
        }
    }

    pub fn has_deed(&self) -> bool {
        !EXCLUDED_FAMILIES.contains(&self.family.as_str())
    }

    /// Only 4.0 licenses and the public domain tools publish translated deeds.
    pub fn has_translated_deed(&self) -> bool {
        self.is_public_domain() || self.version == "4.0"
    }

    fn path_prefix(&self, root: &str) -> String {
        let path_base = if self.is_public_domain() {
            "publicdomain"
        } else {
            "licenses"
        };
        let mut prefix = format!(
            "{}/{}/{}/{}/",
            root.trim_end_matches('/'),
            path_base,
            self.path_family(),
            self.version
        );
        if let Some(jurisdiction) = &self.jurisdiction {
            prefix.push_str(jurisdiction);
            prefix.push('/');
        }
        prefix
    }
}

impl FromStr for DocumentId {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn version_below_4(version: &str) -> bool {
    version.parse::<f64>().map(|v| v < 4.0).unwrap_or(false)
}

/// Derive the public URL of a document. Returns `None` for deed and RDF
/// pages that do not exist.
pub fn canonical_url(root: &str, id: &DocumentId, kind: UrlKind) -> Option<String> {
    let prefix = id.path_prefix(root);
    match kind {
        UrlKind::Legalcode => {
            let legalcode = match &id.language {
                Some(language) => format!("legalcode.{}", language),
                None => "legalcode".to_string(),
            };
            Some(format!("{}{}", prefix, legalcode))
        }
        UrlKind::Deed if !id.has_deed() => None,
        UrlKind::Deed => match &id.language {
            Some(language) if id.has_translated_deed() => {
                Some(format!("{}deed.{}", prefix, language))
            }
            _ => Some(prefix),
        },
        UrlKind::Rdf if !id.has_deed() => None,
        UrlKind::Rdf => Some(format!("{}rdf", prefix)),
    }
}

struct HrefParts<'a> {
    scheme: &'a str,
    host: &'a str,
    path: &'a str,
}

fn is_scheme(candidate: &str) -> bool {
    let mut chars = candidate.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

fn split_href(href: &str) -> HrefParts<'_> {
    let (scheme, rest) = match href.split_once(':') {
        Some((candidate, rest)) if is_scheme(candidate) => (candidate, rest),
        _ => ("", href),
    };

    let (host, rest) = match rest.strip_prefix("//") {
        Some(authority) => {
            let end = authority.find(['/', '?', '#']).unwrap_or(authority.len());
            authority.split_at(end)
        }
        None => ("", rest),
    };

    let path_end = rest.find(['?', '#']).unwrap_or(rest.len());
    HrefParts {
        scheme,
        host,
        path: &rest[..path_end],
    }
}

/// Turn an href found in a document into an absolute URL.
///
/// Relative paths are joined against `base`, scheme-less network paths
/// (`//host/path`) get `https`, and everything else is returned as is.
pub fn absolute(base: &str, href: &str) -> String {
    let parts = split_href(href);

    if parts.scheme.is_empty() && parts.host.is_empty() && !parts.path.is_empty() {
        return Url::parse(base)
            .and_then(|base_url| base_url.join(href))
            .map(String::from)
            .unwrap_or_else(|_| href.to_string());
    }

    if parts.scheme.is_empty() && !parts.host.is_empty() {
        return format!("https:{}", href);
    }

    href.to_string()
}

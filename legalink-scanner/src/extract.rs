//! Link extraction from legalcode/deed markup and RDF license records.

use crate::normalize::absolute;
use scraper::node::Element;
use scraper::{ElementRef, Html};
use tracing::debug;

/// Element holding one license description in an RDF document.
const RECORD_ELEMENT: &str = "cc:license";

/// Attributes that point an RDF node at another resource.
const RESOURCE_ATTRIBUTES: [&str; 2] = ["rdf:resource", "rdf:about"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// HTML legalcode or deed pages
    Markup,
    /// RDF/XML license metadata
    Record,
}

/// A link worth validating, together with the element it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapedLink {
    pub url: String,
    pub anchor: String,
}

#[derive(Debug, Clone, Default)]
pub struct Extraction {
    /// Number of anchor-like elements seen, scrapable or not
    pub anchors_found: usize,
    pub links: Vec<ScrapedLink>,
    pub warnings: Vec<String>,
}

impl Extraction {
    pub fn urls(&self) -> Vec<String> {
        self.links.iter().map(|link| link.url.clone()).collect()
    }
}

/// A resource reference inside a license record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRef {
    pub href: String,
    pub element: String,
}

/// One `cc:License` element of an RDF document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseRecord {
    pub about: Option<String>,
    pub references: Vec<ResourceRef>,
}

/// Same-page anchors and mail links are valid but never checked.
fn is_out_of_scope(href: &str) -> bool {
    href.starts_with('#') || href.starts_with("mailto:")
}

fn render_start_tag(element: &Element) -> String {
    let mut tag = format!("<{}", element.name());
    for (name, value) in element.attrs() {
        tag.push_str(&format!(" {}=\"{}\"", name, value));
    }
    tag.push('>');
    tag
}

pub fn extract(kind: ContentKind, content: &str, base_url: &str) -> Extraction {
    match kind {
        ContentKind::Markup => extract_markup(content, base_url),
        ContentKind::Record => {
            let mut extraction = Extraction::default();
            for record in parse_records(content) {
                let found = extract_record(&record, base_url);
                extraction.anchors_found += found.anchors_found;
                extraction.links.extend(found.links);
            }
            extraction
        }
    }
}

/// Collect every scrapable `<a>` link of an HTML document.
pub fn extract_markup(html: &str, base_url: &str) -> Extraction {
    let document = Html::parse_document(html);
    let mut extraction = Extraction::default();

    let anchors = document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|element| element.value().name() == "a");

    for anchor in anchors {
        extraction.anchors_found += 1;
        let element = anchor.value();

        let Some(href) = element.attr("href") else {
            if element.attr("id").is_some_and(|id| !id.is_empty()) {
                continue;
            }
            let reason = if element.attr("name").is_some() {
                "Anchor uses name"
            } else {
                "Anchor w/o href or id"
            };
            extraction
                .warnings
                .push(format!("  {:<24}{}", reason, anchor.html()));
            continue;
        };

        if is_out_of_scope(href) {
            continue;
        }

        extraction.links.push(ScrapedLink {
            url: absolute(base_url, href),
            anchor: anchor.html(),
        });
    }

    debug!(
        "Extracted {} of {} anchors from {}",
        extraction.links.len(),
        extraction.anchors_found,
        base_url
    );
    extraction
}

/// Split an RDF document into its license records.
pub fn parse_records(content: &str) -> Vec<LicenseRecord> {
    let document = Html::parse_document(content);

    document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|element| element.value().name() == RECORD_ELEMENT)
        .map(|record| {
            let references = record
                .descendants()
                .skip(1)
                .filter_map(ElementRef::wrap)
                .flat_map(|node| {
                    let element = node.value();
                    RESOURCE_ATTRIBUTES.iter().filter_map(move |attribute| {
                        element.attr(attribute).map(|href| ResourceRef {
                            href: href.to_string(),
                            element: render_start_tag(element),
                        })
                    })
                })
                .collect();

            LicenseRecord {
                about: record.value().attr("rdf:about").map(str::to_string),
                references,
            }
        })
        .collect()
}

pub fn extract_record(record: &LicenseRecord, base_url: &str) -> Extraction {
    let links = record
        .references
        .iter()
        .filter(|reference| !is_out_of_scope(&reference.href))
        .map(|reference| ScrapedLink {
            url: absolute(base_url, &reference.href),
            anchor: reference.element.clone(),
        })
        .collect();

    Extraction {
        anchors_found: record.references.len(),
        links,
        warnings: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://www.demourl.com/dir1/dir2";

    const LICENSE_RDF: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<rdf:RDF xmlns:cc="http://creativecommons.org/ns#" xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
  <cc:License rdf:about="http://creativecommons.org/licenses/by/4.0/">
    <dc:title xml:lang="en">Attribution 4.0 International</dc:title>
    <cc:legalcode rdf:resource="http://creativecommons.org/licenses/by/4.0/legalcode"/>
    <cc:permits rdf:resource="http://creativecommons.org/ns#Reproduction"/>
    <cc:requires rdf:resource="mailto:info@creativecommons.org"/>
    <cc:jurisdiction rdf:about="http://creativecommons.org/international/"/>
  </cc:License>
  <cc:License rdf:about="http://creativecommons.org/licenses/by-sa/4.0/">
    <cc:licenseClass rdf:resource="/license/"/>
  </cc:License>
</rdf:RDF>"#;

    #[test]
    fn test_markup_scrapable_links() {
        let html = "<a name='hello'>without href</a>, <a href='#hello'>internal link</a>, \
                    <a href='mailto:abc@gmail.com'>mailto protocol</a>, \
                    <a href='https://example.org'>Absolute link</a>, \
                    <a href='/index'>Relative Link</a>";

        let extraction = extract(ContentKind::Markup, html, BASE);

        let urls = extraction.urls();
        assert_eq!(urls, vec!["https://example.org", "https://www.demourl.com/index"]);
        assert_eq!(extraction.warnings.len(), 1);
        assert!(extraction.warnings[0].contains("Anchor uses name"));
        assert_eq!(extraction.anchors_found, 5);
        assert_eq!(
            extraction.links[1].anchor,
            r#"<a href="/index">Relative Link</a>"#
        );
    }

    #[test]
    fn test_markup_anchor_with_id_is_silent() {
        let html = r#"<a id="s1"></a><a>bare</a>"#;
        let extraction = extract_markup(html, BASE);

        assert!(extraction.links.is_empty());
        assert_eq!(extraction.warnings.len(), 1);
        assert!(extraction.warnings[0].starts_with("  Anchor w/o href or id"));
    }

    #[test]
    fn test_markup_preserves_document_order_and_duplicates() {
        let html = r#"<p><a href="/b">b</a><a href="/a">a</a><a href="/b">b again</a></p>"#;
        let urls = extract_markup(html, BASE).urls();
        assert_eq!(
            urls,
            vec![
                "https://www.demourl.com/b",
                "https://www.demourl.com/a",
                "https://www.demourl.com/b"
            ]
        );
    }

    #[test]
    fn test_parse_records() {
        let records = parse_records(LICENSE_RDF);
        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0].about.as_deref(),
            Some("http://creativecommons.org/licenses/by/4.0/")
        );
        assert_eq!(records[0].references.len(), 4);
        assert_eq!(records[1].references.len(), 1);
        assert_eq!(
            records[0].references[0].element,
            r#"<cc:legalcode rdf:resource="http://creativecommons.org/licenses/by/4.0/legalcode">"#
        );
    }

    #[test]
    fn test_extract_record_filters_mailto_and_resolves_relative() {
        let records = parse_records(LICENSE_RDF);

        let first = extract_record(&records[0], "http://creativecommons.org/licenses/by/4.0/rdf");
        assert_eq!(
            first.urls(),
            vec![
                "http://creativecommons.org/licenses/by/4.0/legalcode",
                "http://creativecommons.org/ns#Reproduction",
                "http://creativecommons.org/international/",
            ]
        );
        assert!(first.warnings.is_empty());

        let second = extract_record(&records[1], "https://creativecommons.org/licenses/by-sa/4.0/");
        assert_eq!(second.urls(), vec!["https://creativecommons.org/license/"]);
    }

    #[test]
    fn test_extract_record_kind_merges_records() {
        let extraction = extract(ContentKind::Record, LICENSE_RDF, BASE);
        assert_eq!(extraction.links.len(), 4);
        assert_eq!(extraction.anchors_found, 5);
    }
}

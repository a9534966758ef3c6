//! Document extraction from validated geoLink trees
//!
//! [`DocumentExtractor`] walks a validated parse tree and produces the
//! ordered list of [`Document`] records: duplicate ids are suppressed
//! (first occurrence wins), date attributes are parsed, relative file
//! hrefs are resolved against the configured host URL. Extraction is
//! all-or-nothing; the first failure aborts the whole call.

use chrono::NaiveDate;
use indexmap::IndexSet;

use crate::entity::{Document, File};
use crate::error::{Error, Result};
use crate::schema::{DOCUMENT_ELEMENT, FILE_ELEMENT};
use crate::tree::Element;

/// Format of date values in geoLink XML
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Extractor turning validated parse trees into document records
#[derive(Debug, Default)]
pub struct DocumentExtractor {
    host_url: Option<String>,
}

impl DocumentExtractor {
    /// Create an extractor. `host_url` is the OEREBlex host used to resolve
    /// relative file hrefs; it has to be supplied without a trailing slash.
    pub fn new(host_url: Option<String>) -> Self {
        Self { host_url }
    }

    /// The configured host URL, if any
    pub fn host_url(&self) -> Option<&str> {
        self.host_url.as_deref()
    }

    /// Extract all document records from a validated tree, in document order
    ///
    /// `document` elements are collected depth-first at any nesting depth.
    /// Documents carrying an already-seen `id` are skipped entirely;
    /// documents without an `id` are always kept.
    pub fn extract(&self, root: &Element) -> Result<Vec<Document>> {
        let mut seen_ids: IndexSet<String> = IndexSet::new();
        let mut documents = Vec::new();

        for document_el in root.descendants_named(DOCUMENT_ELEMENT) {
            if let Some(id) = document_el.attribute("id") {
                if !seen_ids.insert(id.to_string()) {
                    continue;
                }
            }
            documents.push(self.extract_document(document_el)?);
        }

        Ok(documents)
    }

    fn extract_document(&self, element: &Element) -> Result<Document> {
        let files = self.extract_files(element)?;
        let mut document = Document::new(files);

        if let Some(id) = element.attribute("id") {
            document = document.with_id(id);
        }
        if let Some(title) = element.attribute("title") {
            document = document.with_title(title);
        }
        if let Some(category) = element.attribute("category") {
            document = document.with_category(category);
        }
        if let Some(doctype) = element.attribute("doctype") {
            document = document.with_doctype(doctype);
        }
        if let Some(federal_level) = element.attribute("federal_level") {
            document = document.with_federal_level(federal_level);
        }
        if let Some(authority) = element.attribute("authority") {
            document = document.with_authority(authority);
        }
        if let Some(authority_url) = element.attribute("authority_url") {
            document = document.with_authority_url(authority_url);
        }
        if let Some(doc_type) = element.attribute("type") {
            document = document.with_doc_type(doc_type);
        }
        if let Some(subtype) = element.attribute("subtype") {
            document = document.with_subtype(subtype);
        }
        if let Some(number) = element.attribute("number") {
            document = document.with_number(number);
        }
        if let Some(abbreviation) = element.attribute("abbreviation") {
            document = document.with_abbreviation(abbreviation);
        }
        if let Some(instance) = element.attribute("instance") {
            document = document.with_instance(instance);
        }
        if let Some(cycle) = element.attribute("cycle") {
            document = document.with_cycle(cycle);
        }

        if let Some(date) = self.parse_date(element, "decree_date")? {
            document = document.with_decree_date(date);
        }
        if let Some(date) = self.parse_date(element, "enactment_date")? {
            document = document.with_enactment_date(date);
        }
        if let Some(date) = self.parse_date(element, "abrogation_date")? {
            document = document.with_abrogation_date(date);
        }

        Ok(document)
    }

    fn extract_files(&self, document_el: &Element) -> Result<Vec<File>> {
        let mut files = Vec::new();
        for file_el in document_el.descendants_named(FILE_ELEMENT) {
            let mut file = File::new();
            if let Some(title) = file_el.attribute("title") {
                file = file.with_title(title);
            }
            if let Some(href) = file_el.attribute("href") {
                file = file.with_href(self.resolve_href(href));
            }
            if let Some(category) = file_el.attribute("category") {
                file = file.with_category(category.parse()?);
            }
            if let Some(description) = file_el.attribute("description") {
                file = file.with_description(description);
            }
            files.push(file);
        }
        Ok(files)
    }

    /// Resolve a file href against the configured host URL
    ///
    /// Deliberately plain string concatenation without URL-joining, so the
    /// resolved values stay exactly what downstream consumers have always
    /// seen. Absolute hrefs are left untouched.
    fn resolve_href(&self, href: &str) -> String {
        match &self.host_url {
            Some(host) if !href.starts_with("http://") && !href.starts_with("https://") => {
                format!("{}{}", host, href)
            }
            _ => href.to_string(),
        }
    }

    /// Parse a date attribute, surfacing the attribute name and document id
    /// on malformed values
    fn parse_date(&self, element: &Element, attribute: &str) -> Result<Option<NaiveDate>> {
        match element.attribute(attribute) {
            Some(value) => {
                let date = NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| {
                    Error::InvalidDate {
                        attribute: attribute.to_string(),
                        document_id: element.attribute("id").unwrap_or("").to_string(),
                        value: value.to_string(),
                    }
                })?;
                Ok(Some(date))
            }
            None => Ok(None),
        }
    }
}

//! HTML rendering of extracted document records
//!
//! [`Html`] renders a list of [`Document`] records into a single nested
//! `<ul>` fragment for embedding in web pages. Rendering is a pure function
//! of its input and byte-stable; the markup grammar is fixed, whitespace
//! included. Source text is passed through without HTML escaping.

use crate::entity::{Document, File};

/// Format of dates in the rendered output
const DATE_FORMAT: &str = "%d.%m.%Y";

/// HTML formatter for document records
#[derive(Debug, Default)]
pub struct Html;

impl Html {
    /// Create a new HTML formatter
    pub fn new() -> Self {
        Self
    }

    /// Format a list of documents as a nested HTML list
    pub fn format(&self, documents: &[Document]) -> String {
        let items: String = documents.iter().map(Self::format_document).collect();
        format!("<ul class=\"geolink-formatter\">{}</ul>", items)
    }

    /// Format one document as an HTML list item
    ///
    /// Abrogated documents are struck through with their file list
    /// suppressed and the abrogation date appended after the strike.
    fn format_document(document: &Document) -> String {
        let enactment_date = match document.enactment_date() {
            Some(date) => format!("({})", date.format(DATE_FORMAT)),
            None => String::new(),
        };

        let (strike_start, strike_end, abrogation_date, files) =
            match document.abrogation_date() {
                Some(date) => (
                    "<strike>",
                    "</strike>",
                    format!("({})", date.format(DATE_FORMAT)),
                    String::new(),
                ),
                None => ("", "", String::new(), Self::format_files(document.files())),
            };

        let doc_type = non_empty(document.doc_type());
        let subtype = non_empty(document.subtype());
        let type_prefix = if doc_type.is_some() || subtype.is_some() {
            let subtype_suffix = match subtype {
                Some(subtype) => format!(" ({})", subtype),
                None => String::new(),
            };
            format!("{}{}: ", doc_type.unwrap_or(""), subtype_suffix)
        } else {
            String::new()
        };

        format!(
            "<li class=\"geolink-formatter-document\">\
             {strike_start}{type_prefix}{title} {enactment_date}{strike_end} \
             {abrogation_date}{files}</li>",
            strike_start = strike_start,
            type_prefix = type_prefix,
            title = document.title().unwrap_or(""),
            enactment_date = enactment_date,
            strike_end = strike_end,
            abrogation_date = abrogation_date,
            files = files,
        )
    }

    /// Format a document's files as a nested HTML list, or nothing if the
    /// document has no files
    fn format_files(files: &[File]) -> String {
        if files.is_empty() {
            return String::new();
        }
        let items: String = files.iter().map(Self::format_file).collect();
        format!("<ul class=\"geolink-formatter\">{}</ul>", items)
    }

    /// Format one file as an HTML list item, displaying the description and
    /// falling back on the title
    fn format_file(file: &File) -> String {
        format!(
            "<li class=\"geolink-formatter-file\"><a href=\"{}\" target=\"_blank\">{}</a></li>",
            file.href().unwrap_or(""),
            file.display_title(),
        )
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

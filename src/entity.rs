//! geoLink entity records
//!
//! [`Document`] and [`File`] are the immutable value records produced by the
//! extraction stage. They are constructed through builder-style factories
//! and never mutated afterwards; a document exclusively owns its files.

use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::Error;

/// Category of a file attachment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    /// The main file of a document
    Main,
    /// An additional file
    Additional,
}

impl FileCategory {
    /// Get the category as its attribute value
    pub fn as_str(&self) -> &'static str {
        match self {
            FileCategory::Main => "main",
            FileCategory::Additional => "additional",
        }
    }
}

impl FromStr for FileCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "main" => Ok(FileCategory::Main),
            "additional" => Ok(FileCategory::Additional),
            _ => Err(Error::InvalidArgument(format!(
                "invalid file category: '{}'. Must be 'main' or 'additional'",
                s
            ))),
        }
    }
}

impl std::fmt::Display for FileCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One file attachment of a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct File {
    title: Option<String>,
    href: Option<String>,
    category: Option<FileCategory>,
    description: Option<String>,
}

impl File {
    /// Create a new file record
    pub fn new() -> Self {
        Self {
            title: None,
            href: None,
            category: None,
            description: None,
        }
    }

    /// Set the file title (typically the filename)
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the URL to access the file
    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }

    /// Set the file category
    pub fn with_category(mut self, category: FileCategory) -> Self {
        self.category = Some(category);
        self
    }

    /// Set the file description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The file's title
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// The URL to access the file
    pub fn href(&self) -> Option<&str> {
        self.href.as_deref()
    }

    /// The file's category
    pub fn category(&self) -> Option<FileCategory> {
        self.category
    }

    /// The file's description
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The name to display for this file: the description, falling back on
    /// the title if no description is present
    pub fn display_title(&self) -> &str {
        match self.description.as_deref() {
            Some(description) if !description.is_empty() => description,
            _ => self.title.as_deref().unwrap_or(""),
        }
    }
}

impl Default for File {
    fn default() -> Self {
        Self::new()
    }
}

/// One legal/administrative act extracted from a `document` element
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    id: Option<String>,
    title: Option<String>,
    category: Option<String>,
    doctype: Option<String>,
    federal_level: Option<String>,
    authority: Option<String>,
    authority_url: Option<String>,
    doc_type: Option<String>,
    subtype: Option<String>,
    number: Option<String>,
    abbreviation: Option<String>,
    instance: Option<String>,
    cycle: Option<String>,
    decree_date: Option<NaiveDate>,
    enactment_date: Option<NaiveDate>,
    abrogation_date: Option<NaiveDate>,
    files: Vec<File>,
}

impl Document {
    /// Create a new document owning the given files
    pub fn new(files: Vec<File>) -> Self {
        Self {
            id: None,
            title: None,
            category: None,
            doctype: None,
            federal_level: None,
            authority: None,
            authority_url: None,
            doc_type: None,
            subtype: None,
            number: None,
            abbreviation: None,
            instance: None,
            cycle: None,
            decree_date: None,
            enactment_date: None,
            abrogation_date: None,
            files,
        }
    }

    /// Set the document identifier
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the document title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the document category
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the internal type of the document
    pub fn with_doctype(mut self, doctype: impl Into<String>) -> Self {
        self.doctype = Some(doctype.into());
        self
    }

    /// Set the federal level of the document
    pub fn with_federal_level(mut self, federal_level: impl Into<String>) -> Self {
        self.federal_level = Some(federal_level.into());
        self
    }

    /// Set the name of the responsible authority
    pub fn with_authority(mut self, authority: impl Into<String>) -> Self {
        self.authority = Some(authority.into());
        self
    }

    /// Set the URL of the authority's website
    pub fn with_authority_url(mut self, authority_url: impl Into<String>) -> Self {
        self.authority_url = Some(authority_url.into());
        self
    }

    /// Set the official type of the document
    pub fn with_doc_type(mut self, doc_type: impl Into<String>) -> Self {
        self.doc_type = Some(doc_type.into());
        self
    }

    /// Set the document subtype
    pub fn with_subtype(mut self, subtype: impl Into<String>) -> Self {
        self.subtype = Some(subtype.into());
        self
    }

    /// Set the document number
    pub fn with_number(mut self, number: impl Into<String>) -> Self {
        self.number = Some(number.into());
        self
    }

    /// Set the document abbreviation
    pub fn with_abbreviation(mut self, abbreviation: impl Into<String>) -> Self {
        self.abbreviation = Some(abbreviation.into());
        self
    }

    /// Set the document instance
    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }

    /// Set the document cycle
    pub fn with_cycle(mut self, cycle: impl Into<String>) -> Self {
        self.cycle = Some(cycle.into());
        self
    }

    /// Set the date of decree
    pub fn with_decree_date(mut self, date: NaiveDate) -> Self {
        self.decree_date = Some(date);
        self
    }

    /// Set the date of enactment
    pub fn with_enactment_date(mut self, date: NaiveDate) -> Self {
        self.enactment_date = Some(date);
        self
    }

    /// Set the date of abrogation
    pub fn with_abrogation_date(mut self, date: NaiveDate) -> Self {
        self.abrogation_date = Some(date);
        self
    }

    /// The document identifier
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// The document title
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// The document category
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// The internal type of the document
    pub fn doctype(&self) -> Option<&str> {
        self.doctype.as_deref()
    }

    /// The federal level of the document
    pub fn federal_level(&self) -> Option<&str> {
        self.federal_level.as_deref()
    }

    /// The name of the responsible authority
    pub fn authority(&self) -> Option<&str> {
        self.authority.as_deref()
    }

    /// The URL of the authority's website
    pub fn authority_url(&self) -> Option<&str> {
        self.authority_url.as_deref()
    }

    /// The official type of the document
    pub fn doc_type(&self) -> Option<&str> {
        self.doc_type.as_deref()
    }

    /// The document subtype
    pub fn subtype(&self) -> Option<&str> {
        self.subtype.as_deref()
    }

    /// The document number
    pub fn number(&self) -> Option<&str> {
        self.number.as_deref()
    }

    /// The document abbreviation
    pub fn abbreviation(&self) -> Option<&str> {
        self.abbreviation.as_deref()
    }

    /// The document instance
    pub fn instance(&self) -> Option<&str> {
        self.instance.as_deref()
    }

    /// The document cycle
    pub fn cycle(&self) -> Option<&str> {
        self.cycle.as_deref()
    }

    /// The date of decree
    pub fn decree_date(&self) -> Option<NaiveDate> {
        self.decree_date
    }

    /// The date of enactment
    pub fn enactment_date(&self) -> Option<NaiveDate> {
        self.enactment_date
    }

    /// The date of abrogation
    pub fn abrogation_date(&self) -> Option<NaiveDate> {
        self.abrogation_date
    }

    /// The files owned by the document
    pub fn files(&self) -> &[File] {
        &self.files
    }

    /// Whether the document has been abrogated
    pub fn is_abrogated(&self) -> bool {
        self.abrogation_date.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_category_from_str() {
        assert_eq!("main".parse::<FileCategory>().unwrap(), FileCategory::Main);
        assert_eq!(
            "additional".parse::<FileCategory>().unwrap(),
            FileCategory::Additional
        );
        assert!(matches!(
            "bogus".parse::<FileCategory>(),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_file_empty() {
        let file = File::new();
        assert_eq!(file.title(), None);
        assert_eq!(file.href(), None);
        assert_eq!(file.category(), None);
        assert_eq!(file.description(), None);
    }

    #[test]
    fn test_file_display_title_prefers_description() {
        let file = File::new()
            .with_title("700.pdf")
            .with_description("Planungs- und Baugesetz");
        assert_eq!(file.display_title(), "Planungs- und Baugesetz");

        let file = File::new().with_title("700.pdf");
        assert_eq!(file.display_title(), "700.pdf");

        let file = File::new().with_title("700.pdf").with_description("");
        assert_eq!(file.display_title(), "700.pdf");
    }

    #[test]
    fn test_document_full() {
        let date = NaiveDate::from_ymd_opt(2017, 1, 15).unwrap();
        let file = File::new()
            .with_title("test.pdf")
            .with_href("http://my.link.to/file")
            .with_category(FileCategory::Main);
        let document = Document::new(vec![file])
            .with_id("1")
            .with_title("Test")
            .with_category("main")
            .with_doctype("decree")
            .with_federal_level("Gemeinde")
            .with_authority("Authority")
            .with_authority_url("http://my.link.to/authority")
            .with_doc_type("testtype")
            .with_subtype("testsubtype")
            .with_number("123")
            .with_abbreviation("abbr")
            .with_instance("INST")
            .with_cycle("cycle")
            .with_decree_date(date)
            .with_enactment_date(date)
            .with_abrogation_date(date);

        assert_eq!(document.id(), Some("1"));
        assert_eq!(document.title(), Some("Test"));
        assert_eq!(document.category(), Some("main"));
        assert_eq!(document.doctype(), Some("decree"));
        assert_eq!(document.federal_level(), Some("Gemeinde"));
        assert_eq!(document.authority(), Some("Authority"));
        assert_eq!(document.authority_url(), Some("http://my.link.to/authority"));
        assert_eq!(document.doc_type(), Some("testtype"));
        assert_eq!(document.subtype(), Some("testsubtype"));
        assert_eq!(document.number(), Some("123"));
        assert_eq!(document.abbreviation(), Some("abbr"));
        assert_eq!(document.instance(), Some("INST"));
        assert_eq!(document.cycle(), Some("cycle"));
        assert_eq!(document.decree_date(), Some(date));
        assert_eq!(document.enactment_date(), Some(date));
        assert_eq!(document.abrogation_date(), Some(date));
        assert!(document.is_abrogated());
        assert_eq!(document.files().len(), 1);
    }

    #[test]
    fn test_document_empty() {
        let document = Document::new(Vec::new());
        assert_eq!(document.id(), None);
        assert_eq!(document.title(), None);
        assert!(document.files().is_empty());
        assert!(!document.is_abrogated());
    }

    #[test]
    fn test_document_serialize() {
        let document = Document::new(Vec::new())
            .with_id("1")
            .with_title("Test")
            .with_enactment_date(NaiveDate::from_ymd_opt(2017, 1, 15).unwrap());
        let json = serde_json::to_value(&document).unwrap();
        assert_eq!(json["id"], "1");
        assert_eq!(json["enactment_date"], "2017-01-15");
    }
}

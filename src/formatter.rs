//! High-level geoLink formatting facade
//!
//! [`GeoLinkFormatter`] combines the validating parser and the HTML
//! renderer behind one call: give it inline XML or a URL and get back the
//! rendered HTML fragment.

use crate::entity::Document;
use crate::error::Result;
use crate::fetch::FetchGeoLink;
use crate::format::Html;
use crate::parser::XmlParser;
use crate::schema::SchemaVersion;

/// Facade turning geoLink sources into rendered HTML
#[derive(Debug)]
pub struct GeoLinkFormatter {
    host_url: Option<String>,
    version: SchemaVersion,
    dtd_validation: bool,
}

impl GeoLinkFormatter {
    /// Create a formatter for the latest schema version, without host URL
    /// and with DTD validation disabled
    pub fn new() -> Self {
        Self {
            host_url: None,
            version: SchemaVersion::latest(),
            dtd_validation: false,
        }
    }

    /// Set the OEREBlex host URL used to resolve relative file hrefs.
    /// The complete URL until but without the */api* part has to be set,
    /// starting with *http://* or *https://*.
    pub fn with_host_url(mut self, host_url: impl Into<String>) -> Self {
        self.host_url = Some(host_url.into());
        self
    }

    /// Select the geoLink schema version to validate against
    pub fn with_version(mut self, version: SchemaVersion) -> Self {
        self.version = version;
        self
    }

    /// Enable or disable validation of the document type definition (DTD)
    pub fn with_dtd_validation(mut self, enabled: bool) -> Self {
        self.dtd_validation = enabled;
        self
    }

    /// Render the geoLink behind `source` as HTML
    ///
    /// A source starting with `http://` or `https://` is fetched through
    /// the collaborator; anything else is parsed as inline XML.
    pub fn html(&self, source: &str, fetcher: &dyn FetchGeoLink) -> Result<String> {
        if source.starts_with("http://") || source.starts_with("https://") {
            self.html_from_url(source, fetcher)
        } else {
            self.html_from_string(source)
        }
    }

    /// Parse inline geoLink XML and render it as HTML
    pub fn html_from_string(&self, xml: &str) -> Result<String> {
        Ok(self.render(self.parser().documents_from_str(xml)?))
    }

    /// Parse raw geoLink XML bytes and render them as HTML
    pub fn html_from_bytes(&self, xml: &[u8]) -> Result<String> {
        Ok(self.render(self.parser().documents_from_bytes(xml)?))
    }

    /// Fetch a geoLink feed and render it as HTML
    pub fn html_from_url(&self, url: &str, fetcher: &dyn FetchGeoLink) -> Result<String> {
        Ok(self.render(self.parser().documents_from_url(url, fetcher)?))
    }

    fn parser(&self) -> XmlParser {
        let mut parser = XmlParser::new()
            .with_version(self.version)
            .with_dtd_validation(self.dtd_validation);
        if let Some(host_url) = &self.host_url {
            parser = parser.with_host_url(host_url.clone());
        }
        parser
    }

    fn render(&self, documents: Vec<Document>) -> String {
        Html::new().format(&documents)
    }
}

impl Default for GeoLinkFormatter {
    fn default() -> Self {
        Self::new()
    }
}

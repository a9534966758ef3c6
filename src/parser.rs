//! Validating geoLink XML parser
//!
//! [`XmlParser`] parses geoLink XML content and validates it against a
//! registered schema version in a single pass over the event stream.
//! Well-formedness failures surface as [`Error::MalformedXml`], schema
//! violations as [`Error::SchemaValidation`]; there is no partial output.
//!
//! String input is standardized to big-endian UTF-16 bytes before parsing,
//! so encoding declarations inside the document never interfere with the
//! actual byte encoding. Byte input is parsed as-is, with UTF-16 input
//! detected by BOM or byte pattern.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::entity::Document;
use crate::error::{Error, Result, SchemaViolation};
use crate::extractor::DocumentExtractor;
use crate::fetch::FetchGeoLink;
use crate::schema::{
    SchemaDefinition, SchemaRegistry, SchemaVersion, DOCUMENT_ELEMENT, FILE_ELEMENT, ROOT_ELEMENT,
};
use crate::tree::Element;

/// Validating parser for geoLink XML content
///
/// Holds the resolved schema definition for the configured version plus the
/// extraction configuration (host URL for relative href resolution). The
/// parser is stateless across calls and safe to reuse.
#[derive(Debug)]
pub struct XmlParser {
    schema: &'static SchemaDefinition,
    host_url: Option<String>,
    dtd_validation: bool,
}

impl XmlParser {
    /// Create a parser for the latest schema version, without host URL and
    /// with DTD validation disabled
    pub fn new() -> Self {
        Self {
            schema: SchemaRegistry::resolve(SchemaVersion::latest()),
            host_url: None,
            dtd_validation: false,
        }
    }

    /// Select the schema version to validate against
    pub fn with_version(mut self, version: SchemaVersion) -> Self {
        self.schema = SchemaRegistry::resolve(version);
        self
    }

    /// Set the OEREBlex host URL used to resolve relative file hrefs.
    /// The URL has to be supplied without a trailing slash.
    pub fn with_host_url(mut self, host_url: impl Into<String>) -> Self {
        self.host_url = Some(host_url.into());
        self
    }

    /// Enable or disable validation of the document type definition (DTD)
    pub fn with_dtd_validation(mut self, enabled: bool) -> Self {
        self.dtd_validation = enabled;
        self
    }

    /// The schema definition this parser validates against
    pub fn schema(&self) -> &'static SchemaDefinition {
        self.schema
    }

    /// The configured host URL, if any
    pub fn host_url(&self) -> Option<&str> {
        self.host_url.as_deref()
    }

    /// Parse and validate a geoLink XML string
    ///
    /// The string is first encoded to its standardized big-endian UTF-16
    /// byte form, then parsed like byte input.
    pub fn parse_str(&self, xml: &str) -> Result<Element> {
        self.parse_bytes(&encode_utf16be(xml))
    }

    /// Parse and validate raw geoLink XML bytes
    pub fn parse_bytes(&self, xml: &[u8]) -> Result<Element> {
        let text = decode_input(xml)?;
        self.parse_validated(&text)
    }

    /// Parse a geoLink XML string into its extracted document records
    pub fn documents_from_str(&self, xml: &str) -> Result<Vec<Document>> {
        let root = self.parse_str(xml)?;
        self.extractor().extract(&root)
    }

    /// Parse raw geoLink XML bytes into their extracted document records
    pub fn documents_from_bytes(&self, xml: &[u8]) -> Result<Vec<Document>> {
        let root = self.parse_bytes(xml)?;
        self.extractor().extract(&root)
    }

    /// Fetch a geoLink feed through the given collaborator and parse the
    /// payload into its extracted document records
    pub fn documents_from_url(
        &self,
        url: &str,
        fetcher: &dyn FetchGeoLink,
    ) -> Result<Vec<Document>> {
        let payload = fetcher.fetch(url)?;
        self.documents_from_bytes(&payload)
    }

    fn extractor(&self) -> DocumentExtractor {
        DocumentExtractor::new(self.host_url.clone())
    }

    /// Run the quick-xml event loop, validating each element against the
    /// schema while building the tree
    fn parse_validated(&self, xml: &str) -> Result<Element> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);

        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;
        let mut doctype_name: Option<String> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => {
                    if root.is_some() && stack.is_empty() {
                        return Err(Error::MalformedXml(
                            "content after the root element".to_string(),
                        ));
                    }
                    let element = self.validated_element(&e, stack.last(), doctype_name.as_deref())?;
                    stack.push(element);
                }
                Ok(Event::Empty(e)) => {
                    if root.is_some() && stack.is_empty() {
                        return Err(Error::MalformedXml(
                            "content after the root element".to_string(),
                        ));
                    }
                    let element = self.validated_element(&e, stack.last(), doctype_name.as_deref())?;
                    self.validate_closed(&element)?;
                    match stack.last_mut() {
                        Some(parent) => parent.add_child(element),
                        None => root = Some(element),
                    }
                }
                Ok(Event::End(_)) => {
                    if let Some(element) = stack.pop() {
                        self.validate_closed(&element)?;
                        match stack.last_mut() {
                            Some(parent) => parent.add_child(element),
                            None => root = Some(element),
                        }
                    }
                }
                Ok(Event::Text(e)) => {
                    let text = e.unescape().map_err(|e| {
                        Error::MalformedXml(format!("failed to unescape text: {}", e))
                    })?;
                    if !text.trim().is_empty() {
                        return Err(self.text_violation(&stack));
                    }
                }
                // CDATA carries literal text and is subject to the same
                // empty-content rule as plain character data.
                Ok(Event::CData(e)) => {
                    let text = String::from_utf8_lossy(&e);
                    if !text.trim().is_empty() {
                        return Err(self.text_violation(&stack));
                    }
                }
                Ok(Event::DocType(e)) => {
                    let content = e.unescape().map_err(|e| {
                        Error::MalformedXml(format!("failed to read DOCTYPE: {}", e))
                    })?;
                    doctype_name = Some(doctype_root_name(&content).to_string());
                }
                Ok(Event::Eof) => break,
                Ok(_) => {} // Declarations, comments, PIs
                Err(e) => {
                    return Err(Error::MalformedXml(format!(
                        "error at position {}: {}",
                        reader.buffer_position(),
                        e
                    )))
                }
            }
        }

        root.ok_or_else(|| Error::MalformedXml("no root element found".to_string()))
    }

    /// Build an element from a start tag, validating its name, nesting and
    /// attributes against the active schema
    fn validated_element(
        &self,
        start: &BytesStart,
        parent: Option<&Element>,
        doctype_name: Option<&str>,
    ) -> Result<Element> {
        let name = std::str::from_utf8(start.name().as_ref())
            .map_err(|e| Error::MalformedXml(format!("invalid element name: {}", e)))?
            .to_string();

        match parent {
            None => {
                if name != ROOT_ELEMENT {
                    return Err(SchemaViolation::new(format!(
                        "unexpected root element '{}', expected '{}'",
                        name, ROOT_ELEMENT
                    ))
                    .with_element(name)
                    .with_schema_version(self.schema.version.as_str())
                    .into());
                }
                if self.dtd_validation {
                    if let Some(doctype) = doctype_name {
                        if doctype != name {
                            return Err(Error::MalformedXml(format!(
                                "DOCTYPE name '{}' does not match root element '{}'",
                                doctype, name
                            )));
                        }
                    }
                }
            }
            Some(parent) => {
                let parent_rule = self
                    .schema
                    .rule(&parent.name)
                    .ok_or_else(|| self.unknown_element(&parent.name))?;
                if !parent_rule.allows_child(&name) {
                    return Err(SchemaViolation::new(format!(
                        "element '{}' is not allowed inside '{}'",
                        name, parent.name
                    ))
                    .with_element(name)
                    .with_schema_version(self.schema.version.as_str())
                    .into());
                }
            }
        }

        let rule = self
            .schema
            .rule(&name)
            .ok_or_else(|| self.unknown_element(&name))?;

        let mut element = Element::new(name);
        for attr_result in start.attributes() {
            let attr = attr_result
                .map_err(|e| Error::MalformedXml(format!("failed to parse attribute: {}", e)))?;
            let attr_name = std::str::from_utf8(attr.key.as_ref())
                .map_err(|e| Error::MalformedXml(format!("invalid attribute name: {}", e)))?
                .to_string();
            let attr_value = attr
                .unescape_value()
                .map_err(|e| {
                    Error::MalformedXml(format!("failed to unescape attribute value: {}", e))
                })?
                .to_string();

            if !rule.allows_attribute(&attr_name) {
                return Err(SchemaViolation::new("attribute is not allowed")
                    .with_element(&element.name)
                    .with_attribute(attr_name)
                    .with_schema_version(self.schema.version.as_str())
                    .into());
            }
            if !rule.allows_value(&attr_name, &attr_value) {
                return Err(SchemaViolation::new("invalid enumerated attribute value")
                    .with_element(&element.name)
                    .with_attribute(attr_name)
                    .with_value(attr_value)
                    .with_schema_version(self.schema.version.as_str())
                    .into());
            }
            element.set_attribute(attr_name, attr_value);
        }

        for required in &rule.required_attributes {
            if element.attribute(required).is_none() {
                return Err(SchemaViolation::new("missing required attribute")
                    .with_element(&element.name)
                    .with_attribute(*required)
                    .with_schema_version(self.schema.version.as_str())
                    .into());
            }
        }

        Ok(element)
    }

    /// Structural checks that need the complete element, run when its end
    /// tag is reached
    fn validate_closed(&self, element: &Element) -> Result<()> {
        if element.name == DOCUMENT_ELEMENT
            && self.schema.file_required
            && element.find_children(FILE_ELEMENT).is_empty()
        {
            return Err(SchemaViolation::new("document requires at least one file")
                .with_element(DOCUMENT_ELEMENT)
                .with_value(element.attribute("id").unwrap_or("").to_string())
                .with_schema_version(self.schema.version.as_str())
                .into());
        }
        Ok(())
    }

    fn text_violation(&self, stack: &[Element]) -> Error {
        let element = stack.last().map(|e| e.name.clone()).unwrap_or_default();
        SchemaViolation::new("text content is not allowed")
            .with_element(element)
            .with_schema_version(self.schema.version.as_str())
            .into()
    }

    fn unknown_element(&self, name: &str) -> Error {
        SchemaViolation::new("unknown element")
            .with_element(name)
            .with_schema_version(self.schema.version.as_str())
            .into()
    }
}

impl Default for XmlParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode a string to its standardized big-endian UTF-16 byte form
pub(crate) fn encode_utf16be(text: &str) -> Vec<u8> {
    text.encode_utf16()
        .flat_map(|unit| unit.to_be_bytes())
        .collect()
}

/// Decode raw input bytes to text, detecting UTF-16 by BOM or byte pattern
/// and falling back to UTF-8
pub(crate) fn decode_input(bytes: &[u8]) -> Result<String> {
    match bytes {
        [0xFE, 0xFF, rest @ ..] => decode_utf16(rest, true),
        [0xFF, 0xFE, rest @ ..] => decode_utf16(rest, false),
        // An XML document starts with '<' (0x3C); a leading or trailing zero
        // byte in the first 16-bit unit identifies declaration-less UTF-16.
        [0x00, _, ..] => decode_utf16(bytes, true),
        [_, 0x00, ..] => decode_utf16(bytes, false),
        [0xEF, 0xBB, 0xBF, rest @ ..] => decode_utf8(rest),
        _ => decode_utf8(bytes),
    }
}

fn decode_utf8(bytes: &[u8]) -> Result<String> {
    String::from_utf8(bytes.to_vec())
        .map_err(|e| Error::MalformedXml(format!("input is not valid UTF-8: {}", e)))
}

fn decode_utf16(bytes: &[u8], big_endian: bool) -> Result<String> {
    if bytes.len() % 2 != 0 {
        return Err(Error::MalformedXml(
            "UTF-16 input has an odd number of bytes".to_string(),
        ));
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| {
            let pair = [pair[0], pair[1]];
            if big_endian {
                u16::from_be_bytes(pair)
            } else {
                u16::from_le_bytes(pair)
            }
        })
        .collect();
    char::decode_utf16(units)
        .collect::<std::result::Result<String, _>>()
        .map_err(|e| Error::MalformedXml(format!("input is not valid UTF-16: {}", e)))
}

/// Extract the root element name from DOCTYPE content
fn doctype_root_name(content: &str) -> &str {
    content
        .trim_start()
        .split(|c: char| c.is_whitespace() || c == '[' || c == '>')
        .next()
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const VALID_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
    <geolinks>
        <document authority="Example Authority" authority_url="http://www.example.com"
                  category="main" cycle="Example Cycle" doctype="decree" enactment_date="1999-10-18"
                  federal_level="Gemeinde" id="1" subtype="Example Subtype" title="Example"
                  type="Example Type" decree_date="1999-11-01">
            <file category="main" href="/api/attachments/1" title="example1.pdf"></file>
            <file category="additional" href="/api/attachments/2" title="example2.pdf"></file>
            <file category="additional" href="/api/attachments/3" title="example3.pdf"></file>
        </document>
        <document authority="Another authority" authority_url="http://www.example.com" category="related"
                  doctype="edict" enactment_date="2016-01-01" federal_level="Bund" id="2"
                  title="Another example">
            <file category="main" href="http://www.example.com/example" title="example.pdf"></file>
        </document>
    </geolinks>
    "#;

    #[test]
    fn test_parse_str() {
        let root = XmlParser::new().parse_str(VALID_XML).unwrap();
        assert_eq!(root.name, "geolinks");
        assert_eq!(root.find_children("document").len(), 2);
        let document = root.find_children("document")[0];
        assert_eq!(document.attribute("category"), Some("main"));
        assert_eq!(document.find_children("file").len(), 3);
    }

    #[test]
    fn test_parse_bytes_utf16be() {
        let bytes = encode_utf16be(VALID_XML);
        let root = XmlParser::new().parse_bytes(&bytes).unwrap();
        assert_eq!(root.name, "geolinks");
        assert_eq!(root.find_children("document").len(), 2);
    }

    #[test]
    fn test_parse_bytes_utf8() {
        let root = XmlParser::new().parse_bytes(VALID_XML.as_bytes()).unwrap();
        assert_eq!(root.find_children("document").len(), 2);
    }

    #[test]
    fn test_invalid_root_element() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?><invalidTag></invalidTag>"#;
        let err = XmlParser::new().parse_str(xml).unwrap_err();
        assert!(matches!(err, Error::SchemaValidation(_)));
    }

    #[test]
    fn test_malformed_xml_is_not_a_schema_violation() {
        let xml = r#"<geolinks><document id="1">"#;
        let err = XmlParser::new().parse_str(xml).unwrap_err();
        assert!(matches!(err, Error::MalformedXml(_)));
    }

    #[test]
    fn test_mismatched_end_tag() {
        let xml = r#"<geolinks><document id="1"></geolinks></document>"#;
        let err = XmlParser::new().parse_str(xml).unwrap_err();
        assert!(matches!(err, Error::MalformedXml(_)));
    }

    #[test]
    fn test_unknown_attribute_rejected() {
        let xml = r#"<geolinks><document id="1" bogus="x"/></geolinks>"#;
        let err = XmlParser::new().parse_str(xml).unwrap_err();
        match err {
            Error::SchemaValidation(violation) => {
                assert_eq!(violation.attribute.as_deref(), Some("bogus"));
            }
            other => panic!("expected schema violation, got {:?}", other),
        }
    }

    #[test]
    fn test_v1_1_attributes_rejected_by_v1_0_0() {
        let xml = r#"<geolinks>
            <document id="1" title="Example" abrogation_date="2019-01-01">
                <file category="main" href="/api/attachments/1" title="example.pdf"/>
            </document>
        </geolinks>"#;

        let parser = XmlParser::new().with_version(SchemaVersion::V1_0_0);
        let err = parser.parse_str(xml).unwrap_err();
        match err {
            Error::SchemaValidation(violation) => {
                assert_eq!(violation.attribute.as_deref(), Some("abrogation_date"));
                assert_eq!(violation.schema_version.as_deref(), Some("1.0.0"));
            }
            other => panic!("expected schema violation, got {:?}", other),
        }

        // The same content is fine for 1.1.0 and 1.1.1.
        assert!(XmlParser::new()
            .with_version(SchemaVersion::V1_1_0)
            .parse_str(xml)
            .is_ok());
        assert!(XmlParser::new().parse_str(xml).is_ok());
    }

    #[test]
    fn test_invalid_enumerated_value() {
        let xml = r#"<geolinks>
            <document id="1">
                <file category="bogus" href="/api/attachments/1" title="example.pdf"/>
            </document>
        </geolinks>"#;
        let err = XmlParser::new().parse_str(xml).unwrap_err();
        match err {
            Error::SchemaValidation(violation) => {
                assert_eq!(violation.attribute.as_deref(), Some("category"));
                assert_eq!(violation.value.as_deref(), Some("bogus"));
            }
            other => panic!("expected schema violation, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_required_href() {
        let xml = r#"<geolinks>
            <document id="1">
                <file category="main" title="example.pdf"/>
            </document>
        </geolinks>"#;
        let err = XmlParser::new().parse_str(xml).unwrap_err();
        match err {
            Error::SchemaValidation(violation) => {
                assert_eq!(violation.attribute.as_deref(), Some("href"));
            }
            other => panic!("expected schema violation, got {:?}", other),
        }
    }

    #[test]
    fn test_file_element_outside_document() {
        let xml = r#"<geolinks><file href="/api/attachments/1"/></geolinks>"#;
        let err = XmlParser::new().parse_str(xml).unwrap_err();
        assert!(matches!(err, Error::SchemaValidation(_)));
    }

    #[test]
    fn test_file_required_in_1_0_0() {
        let xml = r#"<geolinks><document id="1" title="Example"/></geolinks>"#;

        let err = XmlParser::new()
            .with_version(SchemaVersion::V1_0_0)
            .parse_str(xml)
            .unwrap_err();
        assert!(matches!(err, Error::SchemaValidation(_)));

        // File-optional variants accept the same document.
        assert!(XmlParser::new()
            .with_version(SchemaVersion::V1_1_0)
            .parse_str(xml)
            .is_ok());
    }

    #[test]
    fn test_text_content_rejected() {
        let xml = r#"<geolinks><document id="1">unexpected</document></geolinks>"#;
        let err = XmlParser::new().parse_str(xml).unwrap_err();
        assert!(matches!(err, Error::SchemaValidation(_)));
    }

    #[test]
    fn test_cdata_text_content_rejected() {
        let xml = r#"<geolinks><document id="1"><![CDATA[unexpected]]></document></geolinks>"#;
        let err = XmlParser::new().parse_str(xml).unwrap_err();
        match err {
            Error::SchemaValidation(violation) => {
                assert_eq!(violation.element.as_deref(), Some("document"));
            }
            other => panic!("expected schema violation, got {:?}", other),
        }

        // Whitespace-only CDATA is as harmless as whitespace text.
        let xml = "<geolinks><document id=\"1\"><![CDATA[  ]]></document></geolinks>";
        assert!(XmlParser::new().parse_str(xml).is_ok());
    }

    #[test]
    fn test_doctype_checked_only_when_enabled() {
        let xml = r#"<!DOCTYPE wrongname><geolinks></geolinks>"#;

        assert!(XmlParser::new().parse_str(xml).is_ok());

        let err = XmlParser::new()
            .with_dtd_validation(true)
            .parse_str(xml)
            .unwrap_err();
        assert!(matches!(err, Error::MalformedXml(_)));

        let xml = r#"<!DOCTYPE geolinks><geolinks></geolinks>"#;
        assert!(XmlParser::new()
            .with_dtd_validation(true)
            .parse_str(xml)
            .is_ok());
    }

    #[test]
    fn test_encode_decode_utf16be_round_trip() {
        let text = "<geolinks title=\"Ä Übung\"/>";
        let bytes = encode_utf16be(text);
        assert_eq!(decode_input(&bytes).unwrap(), text);
    }

    #[test]
    fn test_decode_utf16_bom() {
        let mut be = vec![0xFE, 0xFF];
        be.extend(encode_utf16be("<a/>"));
        assert_eq!(decode_input(&be).unwrap(), "<a/>");

        let mut le = vec![0xFF, 0xFE];
        le.extend("<a/>".encode_utf16().flat_map(|u| u.to_le_bytes()));
        assert_eq!(decode_input(&le).unwrap(), "<a/>");
    }

    #[test]
    fn test_decode_odd_length_utf16() {
        let mut bytes = encode_utf16be("<a/>");
        bytes.pop();
        assert!(matches!(
            decode_input(&bytes),
            Err(Error::MalformedXml(_))
        ));
    }

    #[test]
    fn test_doctype_root_name() {
        assert_eq!(doctype_root_name("geolinks SYSTEM \"geolinks.dtd\""), "geolinks");
        assert_eq!(doctype_root_name(" geolinks [ <!ELEMENT a EMPTY> ]"), "geolinks");
        assert_eq!(doctype_root_name("geolinks"), "geolinks");
    }
}

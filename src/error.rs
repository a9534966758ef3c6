//! Error types for geolink-formatter
//!
//! This module defines all error types used throughout the library.
//! Every stage surfaces failures as a typed error; no stage recovers
//! internally and there are no partial results on failure.

use std::fmt;
use thiserror::Error;

/// Result type alias using the geolink-formatter Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for geolink-formatter operations
#[derive(Error, Debug)]
pub enum Error {
    /// Requested geoLink schema version has no registered definition
    #[error("unknown geoLink schema version: {0}")]
    UnknownSchemaVersion(String),

    /// Input is not well-formed XML
    #[error("malformed XML: {0}")]
    MalformedXml(String),

    /// Well-formed XML violating the active schema version
    #[error("schema validation error: {0}")]
    SchemaValidation(#[from] SchemaViolation),

    /// A date attribute is present but not parseable as `YYYY-MM-DD`
    #[error("invalid date '{value}' in attribute '{attribute}' of document '{document_id}'")]
    InvalidDate {
        /// Name of the offending attribute
        attribute: String,
        /// Identifier of the document carrying the attribute, or empty
        document_id: String,
        /// The unparseable attribute value
        value: String,
    },

    /// Caller supplied a value of the wrong shape
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The fetch collaborator failed to retrieve remote XML
    #[error("fetch error: {0}")]
    Fetch(String),
}

/// Structured description of a schema violation
///
/// Built up during the validating parse with context about where the
/// violation occurred, in which element and attribute, and against which
/// schema version.
#[derive(Debug, Clone)]
pub struct SchemaViolation {
    /// Violation message
    pub message: String,
    /// Element where the violation occurred
    pub element: Option<String>,
    /// Offending attribute, if the violation concerns one
    pub attribute: Option<String>,
    /// Offending attribute value, if any
    pub value: Option<String>,
    /// Schema version the content was validated against
    pub schema_version: Option<String>,
}

impl SchemaViolation {
    /// Create a new schema violation
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            element: None,
            attribute: None,
            value: None,
            schema_version: None,
        }
    }

    /// Set the element where the violation occurred
    pub fn with_element(mut self, element: impl Into<String>) -> Self {
        self.element = Some(element.into());
        self
    }

    /// Set the offending attribute
    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }

    /// Set the offending attribute value
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Set the schema version the content was validated against
    pub fn with_schema_version(mut self, version: impl Into<String>) -> Self {
        self.schema_version = Some(version.into());
        self
    }
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(ref element) = self.element {
            write!(f, " (element '{}'", element)?;
            if let Some(ref attribute) = self.attribute {
                write!(f, ", attribute '{}'", attribute)?;
            }
            if let Some(ref value) = self.value {
                write!(f, ", value '{}'", value)?;
            }
            write!(f, ")")?;
        }

        if let Some(ref version) = self.schema_version {
            write!(f, " [schema {}]", version)?;
        }

        Ok(())
    }
}

impl std::error::Error for SchemaViolation {}

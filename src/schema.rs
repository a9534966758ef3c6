//! geoLink schema versions and validation rulesets
//!
//! Each released geoLink schema version is modeled as an immutable
//! [`SchemaDefinition`] describing the allowed structure, the recognized
//! attributes per element and the enumerated attribute values. Definitions
//! are built once per process and shared read-only across parses.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;

use crate::error::Error;

/// Root element name of a geoLink feed
pub const ROOT_ELEMENT: &str = "geolinks";

/// Element name of a document record
pub const DOCUMENT_ELEMENT: &str = "document";

/// Element name of a file attachment
pub const FILE_ELEMENT: &str = "file";

/// Released geoLink schema versions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaVersion {
    /// geoLink schema version 1.0.0
    V1_0_0,
    /// geoLink schema version 1.1.0
    V1_1_0,
    /// geoLink schema version 1.1.1
    V1_1_1,
}

impl SchemaVersion {
    /// The latest stable schema version, used as default
    pub fn latest() -> Self {
        SchemaVersion::V1_1_1
    }

    /// Get the version as its literal version string
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaVersion::V1_0_0 => "1.0.0",
            SchemaVersion::V1_1_0 => "1.1.0",
            SchemaVersion::V1_1_1 => "1.1.1",
        }
    }
}

impl Default for SchemaVersion {
    fn default() -> Self {
        Self::latest()
    }
}

impl FromStr for SchemaVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1.0.0" => Ok(SchemaVersion::V1_0_0),
            "1.1.0" => Ok(SchemaVersion::V1_1_0),
            "1.1.1" => Ok(SchemaVersion::V1_1_1),
            _ => Err(Error::UnknownSchemaVersion(s.to_string())),
        }
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Validation rules for one element kind
#[derive(Debug, Clone, Default)]
pub struct ElementRule {
    /// Attributes recognized on this element
    pub allowed_attributes: Vec<&'static str>,
    /// Attributes that must be present
    pub required_attributes: Vec<&'static str>,
    /// Enumerated attributes mapped to their allowed values
    pub enumerations: HashMap<&'static str, Vec<&'static str>>,
    /// Child element names allowed below this element
    pub allowed_children: Vec<&'static str>,
}

impl ElementRule {
    /// Check whether an attribute name is recognized
    pub fn allows_attribute(&self, name: &str) -> bool {
        self.allowed_attributes.iter().any(|a| *a == name)
    }

    /// Check whether a value is allowed for an enumerated attribute.
    /// Attributes without an enumeration accept any value.
    pub fn allows_value(&self, attribute: &str, value: &str) -> bool {
        match self.enumerations.get(attribute) {
            Some(values) => values.iter().any(|v| *v == value),
            None => true,
        }
    }

    /// Check whether a child element name is allowed
    pub fn allows_child(&self, name: &str) -> bool {
        self.allowed_children.iter().any(|c| *c == name)
    }
}

/// Immutable ruleset for one geoLink schema version
#[derive(Debug)]
pub struct SchemaDefinition {
    /// The version this ruleset belongs to
    pub version: SchemaVersion,
    /// Rules per element name
    rules: HashMap<&'static str, ElementRule>,
    /// Whether a document must contain at least one file
    pub file_required: bool,
}

impl SchemaDefinition {
    /// Get the rule for an element name, if the element is known at all
    pub fn rule(&self, element: &str) -> Option<&ElementRule> {
        self.rules.get(element)
    }

    /// Check whether an element name is part of this schema
    pub fn knows_element(&self, element: &str) -> bool {
        self.rules.contains_key(element)
    }
}

/// Document attributes recognized by every schema version
const DOCUMENT_ATTRIBUTES_BASE: &[&str] = &[
    "id",
    "title",
    "category",
    "doctype",
    "federal_level",
    "authority",
    "authority_url",
    "type",
    "subtype",
    "instance",
    "cycle",
    "decree_date",
    "enactment_date",
];

/// Document attributes added with schema 1.1.0
const DOCUMENT_ATTRIBUTES_1_1: &[&str] = &["number", "abbreviation", "abrogation_date"];

fn document_rule(version: SchemaVersion) -> ElementRule {
    let mut allowed: Vec<&'static str> = DOCUMENT_ATTRIBUTES_BASE.to_vec();
    if version != SchemaVersion::V1_0_0 {
        allowed.extend_from_slice(DOCUMENT_ATTRIBUTES_1_1);
    }
    let mut enumerations = HashMap::new();
    enumerations.insert("category", vec!["main", "related"]);
    ElementRule {
        allowed_attributes: allowed,
        required_attributes: Vec::new(),
        enumerations,
        allowed_children: vec![FILE_ELEMENT],
    }
}

fn file_rule(version: SchemaVersion) -> ElementRule {
    let mut allowed = vec!["title", "href", "category"];
    if version != SchemaVersion::V1_0_0 {
        allowed.push("description");
    }
    let mut enumerations = HashMap::new();
    enumerations.insert("category", vec!["main", "additional"]);
    ElementRule {
        allowed_attributes: allowed,
        required_attributes: vec!["href"],
        enumerations,
        allowed_children: Vec::new(),
    }
}

fn root_rule() -> ElementRule {
    ElementRule {
        allowed_children: vec![DOCUMENT_ELEMENT],
        ..ElementRule::default()
    }
}

fn build_definition(version: SchemaVersion) -> SchemaDefinition {
    let mut rules = HashMap::new();
    rules.insert(ROOT_ELEMENT, root_rule());
    rules.insert(DOCUMENT_ELEMENT, document_rule(version));
    rules.insert(FILE_ELEMENT, file_rule(version));
    SchemaDefinition {
        version,
        rules,
        // 1.0.0 required at least one file per document; later versions
        // relaxed the requirement.
        file_required: version == SchemaVersion::V1_0_0,
    }
}

static DEFINITIONS: Lazy<HashMap<SchemaVersion, SchemaDefinition>> = Lazy::new(|| {
    let versions = [
        SchemaVersion::V1_0_0,
        SchemaVersion::V1_1_0,
        SchemaVersion::V1_1_1,
    ];
    versions
        .iter()
        .map(|&v| (v, build_definition(v)))
        .collect()
});

/// Registry resolving schema versions to their cached definitions
///
/// Definitions are built lazily on first access and reused for the process
/// lifetime; they are immutable and safe to share across threads.
#[derive(Debug, Default)]
pub struct SchemaRegistry;

impl SchemaRegistry {
    /// Resolve a version to its definition
    pub fn resolve(version: SchemaVersion) -> &'static SchemaDefinition {
        // Every enum variant has an entry in the static table.
        &DEFINITIONS[&version]
    }

    /// Resolve a version string to its definition
    pub fn resolve_str(version: &str) -> crate::error::Result<&'static SchemaDefinition> {
        let version = SchemaVersion::from_str(version)?;
        Ok(Self::resolve(version))
    }
}

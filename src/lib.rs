//! # geolink-formatter
//!
//! Parser and HTML formatter for OEREBlex geoLink XML feeds.
//!
//! A geoLink feed describes legal/administrative documents and their file
//! attachments. This library validates such feeds against a registered
//! schema version, extracts them into typed [`Document`]/[`File`] records
//! and renders the records as a nested HTML list for embedding in web
//! pages.
//!
//! ## Example
//!
//! ```rust,ignore
//! use geolink_formatter::{GeoLinkFormatter, SchemaVersion};
//!
//! let formatter = GeoLinkFormatter::new()
//!     .with_host_url("http://oereblex.example.com")
//!     .with_version(SchemaVersion::V1_1_1);
//!
//! let html = formatter.html_from_string(xml)?;
//! ```
//!
//! The pipeline stages are also usable on their own: [`XmlParser`] for the
//! validating parse, [`DocumentExtractor`] for record extraction and
//! [`Html`] for rendering. HTTP retrieval is pluggable through the
//! [`FetchGeoLink`] trait.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod entity;
pub mod error;
pub mod extractor;
pub mod fetch;
pub mod format;
pub mod formatter;
pub mod parser;
pub mod schema;
pub mod tree;

// Re-exports for convenience
pub use entity::{Document, File, FileCategory};
pub use error::{Error, Result};
pub use extractor::DocumentExtractor;
pub use fetch::FetchGeoLink;
pub use format::Html;
pub use formatter::GeoLinkFormatter;
pub use parser::XmlParser;
pub use schema::{SchemaDefinition, SchemaRegistry, SchemaVersion};

/// Version of the geolink-formatter library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

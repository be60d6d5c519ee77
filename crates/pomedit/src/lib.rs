//! pomedit - layout-preserving reader and version editor for `pom.xml`
//!
//! # Quick Start
//!
//! ```
//! use pomedit::PomFile;
//! # fn main() -> Result<(), pomedit::Error> {
//! let xml = "<project>\n  <parent>\n    <groupId>org.example</groupId>\n    \
//!            <artifactId>parent</artifactId>\n    <version>1.0.0</version>\n  \
//!            </parent>\n  <artifactId>app</artifactId>\n  <name>App</name>\n</project>\n";
//!
//! let mut pom = PomFile::parse(xml.as_bytes())?;
//! assert_eq!(pom.version(), Some("1.0.0"));
//! assert_eq!(pom.group_id()?, "org.example");
//!
//! pom.set_version("1.1.0");
//! let out = String::from_utf8_lossy(&pom.to_bytes()).into_owned();
//! assert!(out.contains("<artifactId>app</artifactId>\n  <version>1.1.0</version>\n  <name>"));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod config;
pub use config::Config;

pub mod error;
pub use error::{Error, ErrorKind, Pos, Result, Span};

pub mod input;
pub use input::Input;

pub mod lexer;

pub mod xml;
pub use xml::{
    Document as XmlDocument, Element as XmlElement, Node as XmlNode, Parser as XmlParser,
    TrailingText,
};

pub mod pom;
pub use pom::{
    Build, Coordinate, DEFAULT_PACKAGING, DependencyManagement, Gav, Plugin, PluginManagement,
    PomFile, Profile, ProjectCoordinates, Property, Resource,
};

/// Parse XML from string
pub fn from_xml_str(s: &str) -> Result<XmlDocument> {
    xml::parse(&Input::from_str(s), Config::default())
}

/// Parse XML from bytes, honouring the declared encoding
pub fn from_xml_bytes(bytes: &[u8]) -> Result<XmlDocument> {
    xml::parse(&Input::from_bytes(bytes), Config::default())
}

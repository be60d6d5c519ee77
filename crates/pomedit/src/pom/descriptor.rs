//! Editable `pom.xml` with version inheritance
//!
//! The project version is the one field this type rewrites. It is kept as a
//! plain value while the descriptor is in memory; only when the descriptor is
//! written does it decide whether the `<version>` element should be present:
//!
//! | explicit at load | version == parent version | on write            |
//! |------------------|---------------------------|---------------------|
//! | yes              | either                    | write `<version>`   |
//! | no               | yes                       | remove `<version>`  |
//! | no               | no                        | write `<version>`   |
//!
//! A document that stated its version explicitly keeps doing so even when the
//! value happens to equal the parent's.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use tracing::{debug, instrument};

use crate::config::Config;
use crate::error::{Error, ErrorKind, Result, Span};
use crate::input::Input;
use crate::pom::build::Build;
use crate::pom::dependencies::{self, DependencyManagement};
use crate::pom::gav::Gav;
use crate::pom::profile::{self, Profile};
use crate::pom::property::{self, Property};
use crate::pom::{element_value, modules};
use crate::xml::{self, Document, Element, Node, TrailingText};

/// Packaging Maven assumes when `<packaging>` is absent
pub const DEFAULT_PACKAGING: &str = "jar";

const VERSION: &str = "version";
const PARENT_VERSION: &str = "parent/version";

/// Elements after which a new `<version>` is placed, in order of preference
const VERSION_ANCHORS: [&str; 3] = ["artifactId", "groupId", "parent"];

/// A parsed project descriptor
#[derive(Clone, Debug)]
pub struct PomFile {
    document: Document,
    /// Effective project version; written back on [`write`](Self::write)
    version: Option<String>,
    prefer_explicit_version: bool,
}

/// Effective project identity handed to packaging
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ProjectCoordinates {
    pub group_id: String,
    pub artifact_id: String,
    pub version: Option<String>,
    pub packaging: String,
}

impl PomFile {
    pub const POM_XML: &'static str = "pom.xml";

    /// Wrap a parsed document
    ///
    /// Fails with [`ErrorKind::DuplicateElement`] when the root holds more
    /// than one `<version>`: there would be no single element to edit.
    pub fn from_document(document: Document) -> Result<Self> {
        if document.root.count_children_named(VERSION) > 1 {
            return Err(Error::new(
                ErrorKind::DuplicateElement {
                    name: VERSION.to_string(),
                },
                Span::empty(),
            ));
        }

        let explicit = element_value(&document.root, VERSION);
        let prefer_explicit_version = explicit.is_some();
        let mut pom = Self {
            document,
            version: explicit,
            prefer_explicit_version,
        };
        if !prefer_explicit_version {
            pom.version = pom.parent_version();
        }
        debug!(
            version = pom.version.as_deref(),
            explicit = prefer_explicit_version,
            "loaded descriptor"
        );
        Ok(pom)
    }

    pub fn parse(bytes: &[u8]) -> Result<Self> {
        Self::parse_with_config(bytes, Config::default())
    }

    pub fn parse_with_config(bytes: &[u8], config: Config) -> Result<Self> {
        Self::from_document(xml::parse(&Input::from_bytes(bytes), config)?)
    }

    pub fn read<R: Read>(reader: R) -> Result<Self> {
        Self::read_with_config(reader, Config::default())
    }

    pub fn read_with_config<R: Read>(mut reader: R, config: Config) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::parse_with_config(&bytes, config)
    }

    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn read_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::read_file_with_config(path, Config::default())
    }

    pub fn read_file_with_config(path: impl AsRef<Path>, config: Config) -> Result<Self> {
        let path = path.as_ref();
        let mut bytes = Vec::new();
        BufReader::new(File::open(path)?).read_to_end(&mut bytes)?;

        let filename = path.to_string_lossy();
        let input = Input::from_bytes(&bytes).with_filename(&filename);
        Self::from_document(xml::parse(&input, config)?)
    }

    /// Apply the version policy to the tree and serialize it
    pub fn to_bytes(&mut self) -> Vec<u8> {
        self.write_version_element();
        self.document.to_bytes()
    }

    pub fn write<W: Write>(&mut self, writer: W) -> Result<()> {
        self.write_version_element();
        self.document.write_to(writer)
    }

    /// Write to `path`; the file is only created once the output is rendered
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn write_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.to_bytes();
        let mut out = BufWriter::new(File::create(path)?);
        out.write_all(&bytes)?;
        out.flush()?;
        Ok(())
    }

    pub const fn document(&self) -> &Document {
        &self.document
    }

    fn project(&self) -> &Element {
        &self.document.root
    }

    /// Effective project version: explicit, else inherited from the parent
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Set the project version; the tree is updated on write
    pub fn set_version(&mut self, version: impl Into<String>) {
        self.version = Some(version.into());
    }

    /// Whether `<version>` stays explicit even when it equals the parent's
    pub const fn prefers_explicit_version(&self) -> bool {
        self.prefer_explicit_version
    }

    pub fn parent(&self) -> Option<Gav<'_>> {
        self.project().child("parent").map(Gav::new)
    }

    pub fn parent_version(&self) -> Option<String> {
        self.parent().and_then(|parent| parent.version())
    }

    /// Set `<parent><version>`, which must already exist
    ///
    /// This never changes the effective version of the project itself.
    pub fn set_parent_version(&mut self, version: &str) -> Result<()> {
        let element = self
            .document
            .root
            .child_path_mut(PARENT_VERSION)
            .ok_or_else(|| Error::missing_element(PARENT_VERSION))?;
        element.set_text(version);
        Ok(())
    }

    pub fn packaging(&self) -> String {
        element_value(self.project(), "packaging").unwrap_or_else(|| DEFAULT_PACKAGING.to_string())
    }

    /// Effective groupId: explicit, else the parent's
    pub fn group_id(&self) -> Result<String> {
        element_value(self.project(), "groupId")
            .or_else(|| self.parent().and_then(|parent| parent.group_id()))
            .ok_or_else(|| Error::missing_value("groupId"))
    }

    pub fn artifact_id(&self) -> Result<String> {
        element_value(self.project(), "artifactId").ok_or_else(|| Error::missing_value("artifactId"))
    }

    pub fn coordinates(&self) -> Result<ProjectCoordinates> {
        Ok(ProjectCoordinates {
            group_id: self.group_id()?,
            artifact_id: self.artifact_id()?,
            version: self.version.clone(),
            packaging: self.packaging(),
        })
    }

    pub fn modules(&self) -> Vec<String> {
        modules(self.project())
    }

    pub fn profiles(&self) -> Vec<Profile<'_>> {
        profile::profiles(self.project())
    }

    pub fn dependency_management(&self) -> Option<DependencyManagement<'_>> {
        DependencyManagement::of(self.project())
    }

    pub fn dependencies(&self) -> Vec<Gav<'_>> {
        dependencies::dependencies(self.project())
    }

    pub fn build(&self) -> Option<Build<'_>> {
        Build::of(self.project())
    }

    pub fn properties(&self) -> Vec<Property<'_>> {
        property::properties(self.project())
    }

    fn write_version_element(&mut self) {
        let parent_version = self.parent_version();
        let explicit = self.prefer_explicit_version || self.version != parent_version;

        match (explicit, self.version.clone()) {
            (true, Some(version)) => {
                debug!(%version, "writing explicit project version");
                materialize_version(&mut self.document.root, &version);
            }
            // nothing to write: no version was ever known
            (true, None) => {}
            (false, _) => {
                debug!(parent = parent_version.as_deref(), "eliding inherited project version");
                elide_version(&mut self.document.root);
            }
        }
    }
}

fn materialize_version(project: &mut Element, version: &str) {
    if let Some(element) = project.child_mut(VERSION) {
        // an equal value keeps its original spelling and padding
        if element.trimmed_text() != version {
            element.set_text(version);
        }
        return;
    }

    let anchor = VERSION_ANCHORS
        .iter()
        .find_map(|name| project.position_of(name));
    let element = Element::with_text(VERSION, version);

    match anchor {
        // <version> plus one trailing text node; removing both gives back
        // the previous bytes
        Some(index) => match project.nodes().get(index + 1) {
            Some(next @ Node::Text(_)) if next.is_whitespace() => {
                let trailing = next.clone();
                project.insert_node(index + 2, element);
                project.insert_node(index + 3, trailing);
            }
            _ => {
                let trailing = index
                    .checked_sub(1)
                    .and_then(|prev| project.nodes().get(prev))
                    .and_then(line_indent)
                    .unwrap_or_else(|| "\n".to_string());
                project.insert_node(index + 1, element);
                project.insert_node(index + 2, Node::Text(trailing));
            }
        },
        None => {
            project.push_node(element);
            project.push_node(Node::text("\n"));
        }
    }
}

fn elide_version(project: &mut Element) {
    if let Some(index) = project.position_of(VERSION) {
        project.remove_child(index, TrailingText::Remove);
    }
}

/// Line break plus indentation ending a whitespace text node
fn line_indent(node: &Node) -> Option<String> {
    match node {
        Node::Text(raw) if node.is_whitespace() => {
            let start = raw.rfind('\n')?;
            raw.get(start..).map(str::to_string)
        }
        _ => None,
    }
}

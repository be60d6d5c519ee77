//! groupId/artifactId/version view

use crate::pom::element_value;
use crate::xml::Element;

/// Coordinates read from an element such as `<parent>` or `<dependency>`
#[derive(Clone, Copy, Debug)]
pub struct Gav<'a> {
    element: &'a Element,
}

impl<'a> Gav<'a> {
    pub const fn new(element: &'a Element) -> Self {
        Self { element }
    }

    pub const fn element(&self) -> &'a Element {
        self.element
    }

    /// Absent when inherited
    pub fn group_id(&self) -> Option<String> {
        element_value(self.element, "groupId")
    }

    pub fn artifact_id(&self) -> Option<String> {
        element_value(self.element, "artifactId")
    }

    /// Absent when inherited or managed elsewhere
    pub fn version(&self) -> Option<String> {
        element_value(self.element, "version")
    }

    pub fn to_coordinate(&self) -> Coordinate {
        Coordinate {
            group_id: self.group_id(),
            artifact_id: self.artifact_id(),
            version: self.version(),
        }
    }
}

/// Owned copy of a [`Gav`]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Coordinate {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
}

//! `<dependencies>` and `<dependencyManagement>` sections

use crate::pom::gav::Gav;
use crate::xml::Element;

/// Every `<dependencies>/<dependency>` under `element`, duplicates included
pub fn dependencies(element: &Element) -> Vec<Gav<'_>> {
    element
        .children_named("dependencies")
        .flat_map(|block| block.children_named("dependency"))
        .map(Gav::new)
        .collect()
}

#[derive(Clone, Copy, Debug)]
pub struct DependencyManagement<'a> {
    element: &'a Element,
}

impl<'a> DependencyManagement<'a> {
    /// The `<dependencyManagement>` child of `parent`, if present
    pub fn of(parent: &'a Element) -> Option<Self> {
        parent
            .child("dependencyManagement")
            .map(|element| Self { element })
    }

    pub fn dependencies(&self) -> Vec<Gav<'a>> {
        dependencies(self.element)
    }
}

//! `<profiles>/<profile>` entries
//!
//! A profile carries the same list-shaped sections as the project itself.

use crate::pom::build::Build;
use crate::pom::dependencies::{self, DependencyManagement};
use crate::pom::gav::Gav;
use crate::pom::property::{self, Property};
use crate::pom::{element_value, modules};
use crate::xml::Element;

#[derive(Clone, Copy, Debug)]
pub struct Profile<'a> {
    element: &'a Element,
}

impl<'a> Profile<'a> {
    pub const fn new(element: &'a Element) -> Self {
        Self { element }
    }

    pub fn id(&self) -> Option<String> {
        element_value(self.element, "id")
    }

    pub fn modules(&self) -> Vec<String> {
        modules(self.element)
    }

    pub fn dependencies(&self) -> Vec<Gav<'a>> {
        dependencies::dependencies(self.element)
    }

    pub fn dependency_management(&self) -> Option<DependencyManagement<'a>> {
        DependencyManagement::of(self.element)
    }

    pub fn build(&self) -> Option<Build<'a>> {
        Build::of(self.element)
    }

    pub fn properties(&self) -> Vec<Property<'a>> {
        property::properties(self.element)
    }
}

/// Profiles across all `<profiles>` blocks, in declaration order
pub fn profiles(element: &Element) -> Vec<Profile<'_>> {
    element
        .children_named("profiles")
        .flat_map(|block| block.children_named("profile"))
        .map(Profile::new)
        .collect()
}

//! `<build>` section

use crate::pom::gav::Gav;
use crate::pom::{element_value, nested_values};
use crate::xml::Element;

/// groupId Maven assumes for plugins that omit it
pub const DEFAULT_PLUGIN_GROUP_ID: &str = "org.apache.maven.plugins";

#[derive(Clone, Copy, Debug)]
pub struct Build<'a> {
    element: &'a Element,
}

impl<'a> Build<'a> {
    /// The `<build>` child of `parent`, if present
    pub fn of(parent: &'a Element) -> Option<Self> {
        parent.child("build").map(|element| Self { element })
    }

    pub fn plugins(&self) -> Vec<Plugin<'a>> {
        plugins(self.element)
    }

    pub fn plugin_management(&self) -> Option<PluginManagement<'a>> {
        self.element
            .child("pluginManagement")
            .map(|element| PluginManagement { element })
    }

    pub fn resources(&self) -> Vec<Resource<'a>> {
        self.element
            .children_named("resources")
            .flat_map(|block| block.children_named("resource"))
            .map(|element| Resource { element })
            .collect()
    }

    pub fn final_name(&self) -> Option<String> {
        element_value(self.element, "finalName")
    }

    pub fn directory(&self) -> Option<String> {
        element_value(self.element, "directory")
    }
}

fn plugins(element: &Element) -> Vec<Plugin<'_>> {
    element
        .children_named("plugins")
        .flat_map(|block| block.children_named("plugin"))
        .map(|element| Plugin { element })
        .collect()
}

#[derive(Clone, Copy, Debug)]
pub struct PluginManagement<'a> {
    element: &'a Element,
}

impl<'a> PluginManagement<'a> {
    pub fn plugins(&self) -> Vec<Plugin<'a>> {
        plugins(self.element)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Plugin<'a> {
    element: &'a Element,
}

impl<'a> Plugin<'a> {
    pub const fn gav(&self) -> Gav<'a> {
        Gav::new(self.element)
    }

    /// Declared groupId, else Maven's default plugin group
    pub fn group_id(&self) -> String {
        self.gav()
            .group_id()
            .unwrap_or_else(|| DEFAULT_PLUGIN_GROUP_ID.to_string())
    }
}

/// A `<resource>` entry of the build
#[derive(Clone, Copy, Debug)]
pub struct Resource<'a> {
    element: &'a Element,
}

impl Resource<'_> {
    pub fn directory(&self) -> Option<String> {
        element_value(self.element, "directory")
    }

    pub fn target_path(&self) -> Option<String> {
        element_value(self.element, "targetPath")
    }

    pub fn includes(&self) -> Vec<String> {
        nested_values(self.element, "includes", "include")
    }

    pub fn excludes(&self) -> Vec<String> {
        nested_values(self.element, "excludes", "exclude")
    }
}

//! Maven project descriptor model
//!
//! [`PomFile`] owns a parsed document and the project's effective version.
//! The other types are borrowed views over one element each; they read the
//! tree on every call and never cache.

pub mod build;
pub mod dependencies;
pub mod descriptor;
pub mod gav;
pub mod profile;
pub mod property;

pub use build::{Build, Plugin, PluginManagement, Resource};
pub use dependencies::DependencyManagement;
pub use descriptor::{DEFAULT_PACKAGING, PomFile, ProjectCoordinates};
pub use gav::{Coordinate, Gav};
pub use profile::Profile;
pub use property::Property;

use indexmap::IndexSet;

use crate::xml::Element;

/// Trimmed text of the first child named `name`
pub(crate) fn element_value(element: &Element, name: &str) -> Option<String> {
    element.child(name).map(Element::trimmed_text)
}

/// Trimmed text of every `<outer><inner>` grandchild, in document order
pub(crate) fn nested_values(element: &Element, outer: &str, inner: &str) -> Vec<String> {
    element
        .children_named(outer)
        .flat_map(|block| block.children_named(inner))
        .map(Element::trimmed_text)
        .collect()
}

/// Module names across all `<modules>` blocks; repeats keep their first position
pub(crate) fn modules(element: &Element) -> Vec<String> {
    nested_values(element, "modules", "module")
        .into_iter()
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::Parser;

    #[test]
    fn test_modules_deduplicated_in_order() -> crate::Result<()> {
        let doc = Parser::new(
            b"<project>\
                <modules><module>a</module><module> b </module></modules>\
                <modules><module>a</module><module>c</module></modules>\
              </project>",
        )
        .parse()?;
        assert_eq!(modules(&doc.root), vec!["a", "b", "c"]);
        Ok(())
    }

    #[test]
    fn test_element_value_trims() -> crate::Result<()> {
        let doc = Parser::new(b"<p><packaging>\n  pom\n</packaging></p>").parse()?;
        assert_eq!(element_value(&doc.root, "packaging"), Some("pom".to_string()));
        assert_eq!(element_value(&doc.root, "version"), None);
        Ok(())
    }
}

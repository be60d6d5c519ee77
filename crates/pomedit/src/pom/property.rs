//! `<properties>` entries

use crate::xml::Element;

/// One `<properties>` child, e.g. `<java.version>17</java.version>`
#[derive(Clone, Copy, Debug)]
pub struct Property<'a> {
    element: &'a Element,
}

impl<'a> Property<'a> {
    pub const fn new(element: &'a Element) -> Self {
        Self { element }
    }

    pub fn name(&self) -> &'a str {
        self.element.name()
    }

    pub fn value(&self) -> String {
        self.element.trimmed_text()
    }
}

/// Properties across all `<properties>` blocks, in declaration order
pub fn properties(element: &Element) -> Vec<Property<'_>> {
    element
        .children_named("properties")
        .flat_map(Element::elements)
        .map(Property::new)
        .collect()
}

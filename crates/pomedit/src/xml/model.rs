//! Layout-preserving XML data model
//!
//! Every byte of the source is owned by some node: whitespace between
//! elements is kept as [`Node::Text`], start tags keep their raw attribute
//! text, and comments, CDATA sections and processing instructions are nodes
//! of their own. Serializing an unmodified tree therefore reproduces the
//! input exactly.

use indexmap::IndexMap;

use crate::xml::encoding::{DEFAULT_ENCODING, Encoding};
use crate::xml::escape::{decode_entities, escape_text};

/// XML document
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    /// Nodes before the root element: declaration, comments, whitespace
    pub prolog: Vec<Node>,
    pub root: Element,
    /// Nodes after the root element
    pub epilog: Vec<Node>,
    pub(crate) bom: bool,
    pub(crate) encoding: Option<String>,
}

impl Document {
    pub fn new(root: Element) -> Self {
        Self {
            prolog: Vec::new(),
            root,
            epilog: Vec::new(),
            bom: false,
            encoding: None,
        }
    }

    /// Encoding label from the XML declaration, if any
    pub fn declared_encoding(&self) -> Option<&str> {
        self.encoding.as_deref()
    }

    /// Encoding used for writing: the declared one, else UTF-8
    pub fn encoding(&self) -> Encoding {
        self.encoding
            .as_deref()
            .and_then(Encoding::from_label)
            .unwrap_or(DEFAULT_ENCODING)
    }

    /// Whether the source started with a UTF-8 byte-order mark
    pub const fn has_bom(&self) -> bool {
        self.bom
    }
}

/// XML content node
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Element(Element),
    /// Character data exactly as written, entity references included
    Text(String),
    /// Contents of `<![CDATA[...]]>`
    CData(String),
    /// Contents of `<!--...-->`
    Comment(String),
    /// Contents of `<?...?>`
    ProcessingInstruction(String),
    /// Contents of `<!...>`, e.g. a DOCTYPE
    Declaration(String),
}

impl Node {
    pub fn text(raw: impl Into<String>) -> Self {
        Self::Text(raw.into())
    }

    pub const fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Self::Element(element) => Some(element),
            _ => None,
        }
    }

    pub const fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    /// Text node made only of whitespace
    pub fn is_whitespace(&self) -> bool {
        matches!(self, Self::Text(raw) if raw.trim().is_empty())
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

/// What to do with the node after a removed child
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrailingText {
    /// Leave the following sibling alone
    Keep,
    /// Also remove the following sibling if, and only if, it is a text node
    Remove,
}

/// Outcome of [`Element::remove_child`]
#[derive(Clone, Debug, PartialEq)]
pub struct Removed {
    pub node: Node,
    /// The text node removed along with `node`
    pub trailing: Option<Node>,
}

/// XML element
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    name: String,
    attributes: IndexMap<String, String>,
    /// Source text between the tag name and `>`/`/>`; `None` once edited
    raw_attributes: Option<String>,
    self_closing: bool,
    /// Whitespace between the name and `>` in the closing tag
    close_padding: String,
    children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: IndexMap::new(),
            raw_attributes: None,
            self_closing: false,
            close_padding: String::new(),
            children: Vec::new(),
        }
    }

    /// Element holding a single escaped text child
    pub fn with_text(name: impl Into<String>, value: &str) -> Self {
        let mut element = Self::new(name);
        element.set_text(value);
        element
    }

    pub(crate) fn from_parts(
        name: String,
        attributes: IndexMap<String, String>,
        raw_attributes: String,
        self_closing: bool,
        close_padding: String,
        children: Vec<Node>,
    ) -> Self {
        Self {
            name,
            attributes,
            raw_attributes: Some(raw_attributes),
            self_closing,
            close_padding,
            children,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub const fn attributes(&self) -> &IndexMap<String, String> {
        &self.attributes
    }

    /// Set an attribute; the start tag is re-rendered on output
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.raw_attributes = None;
        self.attributes.insert(name.into(), value.into())
    }

    pub(crate) fn raw_attributes(&self) -> Option<&str> {
        self.raw_attributes.as_deref()
    }

    pub(crate) fn is_self_closing(&self) -> bool {
        self.self_closing && self.children.is_empty()
    }

    pub(crate) fn close_padding(&self) -> &str {
        &self.close_padding
    }

    /// All child nodes in document order
    pub fn nodes(&self) -> &[Node] {
        &self.children
    }

    /// Child elements in document order
    pub fn elements(&self) -> impl Iterator<Item = &Self> + '_ {
        self.children.iter().filter_map(Node::as_element)
    }

    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut Self> + '_ {
        self.children.iter_mut().filter_map(Node::as_element_mut)
    }

    /// Child elements with the given name
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Self> + 'a {
        self.elements().filter(move |e| e.name == name)
    }

    pub fn count_children_named(&self, name: &str) -> usize {
        self.children_named(name).count()
    }

    /// First child element with the given name
    pub fn child(&self, name: &str) -> Option<&Self> {
        self.elements().find(|e| e.name == name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut Self> {
        self.elements_mut().find(|e| e.name == name)
    }

    /// Follow a `/`-separated path of child names, e.g. `parent/version`
    pub fn child_path(&self, path: &str) -> Option<&Self> {
        path.split('/')
            .try_fold(self, |element, name| element.child(name))
    }

    pub fn child_path_mut(&mut self, path: &str) -> Option<&mut Self> {
        path.split('/')
            .try_fold(self, |element, name| element.child_mut(name))
    }

    /// Index into [`nodes`](Self::nodes) of the first child element named `name`
    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.children
            .iter()
            .position(|node| node.as_element().is_some_and(|e| e.name == name))
    }

    /// Decoded character data of the direct text and CDATA children
    ///
    /// References to entities declared in the DOCTYPE are returned as written.
    pub fn text(&self) -> String {
        let mut text = String::new();
        for node in &self.children {
            match node {
                Node::Text(raw) => match decode_entities(raw) {
                    Ok(decoded) => text.push_str(&decoded),
                    Err(_) => text.push_str(raw),
                },
                Node::CData(data) => text.push_str(data),
                _ => {}
            }
        }
        text
    }

    pub fn trimmed_text(&self) -> String {
        self.text().trim().to_string()
    }

    /// Replace all children with a single text node
    pub fn set_text(&mut self, value: &str) {
        self.children = vec![Node::Text(escape_text(value))];
    }

    /// Insert a node before position `index`; past-the-end appends
    pub fn insert_node(&mut self, index: usize, node: impl Into<Node>) {
        let index = index.min(self.children.len());
        self.children.insert(index, node.into());
    }

    pub fn push_node(&mut self, node: impl Into<Node>) {
        self.children.push(node.into());
    }

    /// Remove the child node at `index`
    ///
    /// With [`TrailingText::Remove`] the node now at `index` (the former
    /// next sibling) is removed too when it is a text node. At most one
    /// extra node is ever removed.
    pub fn remove_child(&mut self, index: usize, trailing: TrailingText) -> Option<Removed> {
        if index >= self.children.len() {
            return None;
        }
        let node = self.children.remove(index);
        let trailing = match trailing {
            TrailingText::Remove if self.children.get(index).is_some_and(Node::is_text) => {
                Some(self.children.remove(index))
            }
            _ => None,
        };
        Some(Removed { node, trailing })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Element {
        let mut project = Element::new("project");
        project.push_node(Node::text("\n  "));
        project.push_node(Element::with_text("artifactId", "demo"));
        project.push_node(Node::text("\n  "));
        project.push_node(Element::with_text("version", "1.0"));
        project.push_node(Node::text("\n  "));
        project.push_node(Element::with_text("packaging", "pom"));
        project.push_node(Node::text("\n"));
        project
    }

    #[test]
    fn test_child_lookup() {
        let project = sample();
        assert_eq!(project.child("version").map(Element::trimmed_text), Some("1.0".to_string()));
        assert_eq!(project.position_of("version"), Some(3));
        assert!(project.child("missing").is_none());
    }

    #[test]
    fn test_child_path() {
        let mut project = Element::new("project");
        let mut parent = Element::new("parent");
        parent.push_node(Element::with_text("version", "2"));
        project.push_node(parent);

        assert_eq!(
            project.child_path("parent/version").map(Element::text),
            Some("2".to_string())
        );
        assert!(project.child_path("parent/groupId").is_none());
        if let Some(version) = project.child_path_mut("parent/version") {
            version.set_text("3");
        }
        assert_eq!(
            project.child_path("parent/version").map(Element::text),
            Some("3".to_string())
        );
    }

    #[test]
    fn test_remove_child_takes_trailing_text() {
        let mut project = sample();
        let removed = project.remove_child(3, TrailingText::Remove);
        assert_eq!(removed.and_then(|r| r.trailing), Some(Node::text("\n  ")));
        assert_eq!(project.nodes().len(), 5);
        assert_eq!(project.position_of("packaging"), Some(3));
    }

    #[test]
    fn test_remove_child_keeps_following_element() {
        let mut project = Element::new("project");
        project.push_node(Element::with_text("version", "1"));
        project.push_node(Element::with_text("packaging", "jar"));

        let removed = project.remove_child(0, TrailingText::Remove);
        assert_eq!(removed.map(|r| r.trailing.is_none()), Some(true));
        assert_eq!(project.position_of("packaging"), Some(0));
    }

    #[test]
    fn test_remove_child_keep_policy() {
        let mut project = sample();
        let removed = project.remove_child(3, TrailingText::Keep);
        assert_eq!(removed.map(|r| r.trailing), Some(None));
        assert_eq!(project.nodes().len(), 6);
    }

    #[test]
    fn test_remove_child_out_of_range() {
        let mut project = sample();
        assert!(project.remove_child(99, TrailingText::Remove).is_none());
    }

    #[test]
    fn test_text_decodes_entities_and_cdata() {
        let mut element = Element::new("name");
        element.push_node(Node::text(" a &amp; "));
        element.push_node(Node::CData("<b>".to_string()));
        assert_eq!(element.text(), " a & <b>");
        assert_eq!(element.trimmed_text(), "a & <b>");
    }

    #[test]
    fn test_set_text_escapes() {
        let element = Element::with_text("v", "1 < 2");
        assert_eq!(element.nodes(), &[Node::text("1 &lt; 2")]);
        assert_eq!(element.text(), "1 < 2");
    }
}

//! XML serialization

use std::io::Write;

use crate::error::Result;
use crate::xml::escape::escape_attribute;
use crate::xml::model::{Document, Element, Node};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

impl Document {
    /// Render the document as text, before encoding
    pub fn to_xml_string(&self) -> String {
        let mut out = String::new();
        for node in &self.prolog {
            write_node(&mut out, node);
        }
        write_element(&mut out, &self.root);
        for node in &self.epilog {
            write_node(&mut out, node);
        }
        out
    }

    /// Render the document in its own encoding
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        if self.bom {
            bytes.extend_from_slice(UTF8_BOM);
        }
        bytes.extend(self.encoding().encode(&self.to_xml_string()));
        bytes
    }

    pub fn write_to<W: Write>(&self, mut out: W) -> Result<()> {
        out.write_all(&self.to_bytes())?;
        out.flush()?;
        Ok(())
    }
}

fn write_node(out: &mut String, node: &Node) {
    match node {
        Node::Element(element) => write_element(out, element),
        Node::Text(raw) => out.push_str(raw),
        Node::CData(data) => {
            out.push_str("<![CDATA[");
            out.push_str(data);
            out.push_str("]]>");
        }
        Node::Comment(body) => {
            out.push_str("<!--");
            out.push_str(body);
            out.push_str("-->");
        }
        Node::ProcessingInstruction(body) => {
            out.push_str("<?");
            out.push_str(body);
            out.push_str("?>");
        }
        Node::Declaration(body) => {
            out.push_str("<!");
            out.push_str(body);
            out.push('>');
        }
    }
}

fn write_element(out: &mut String, element: &Element) {
    out.push('<');
    out.push_str(element.name());
    match element.raw_attributes() {
        Some(raw) => out.push_str(raw),
        None => {
            for (name, value) in element.attributes() {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                out.push_str(&escape_attribute(value));
                out.push('"');
            }
        }
    }

    if element.is_self_closing() {
        out.push_str("/>");
        return;
    }
    out.push('>');

    for child in element.nodes() {
        write_node(out, child);
    }

    out.push_str("</");
    out.push_str(element.name());
    out.push_str(element.close_padding());
    out.push('>');
}
